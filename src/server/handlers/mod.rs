//! HTTP request handlers for the web server.

mod api;
mod search;
mod sources;

// Re-export handlers for use by the router
pub use api::health;
pub use search::search_media;
pub use sources::{
    list_known_sources, list_new_sources, promote_source, sync_sources, verify_source,
};
