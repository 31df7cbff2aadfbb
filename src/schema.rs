// Diesel table definitions. Keep in sync with repository/schema_sqlite.sql.

diesel::table! {
    known_sources (id) {
        id -> Integer,
        domain -> Text,
        name -> Text,
        url -> Text,
        description -> Text,
        source_origin -> Nullable<Text>,
        enrichment -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    new_sources (id) {
        id -> Integer,
        domain -> Text,
        url -> Text,
        title -> Text,
        description -> Text,
        source_origin -> Text,
        enrichment -> Nullable<Text>,
        found_at -> Text,
        is_verified -> Bool,
        verified_at -> Nullable<Text>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(known_sources, new_sources);
