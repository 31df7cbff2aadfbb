//! SQLite connection handle.
//!
//! Each `get` opens a fresh connection; SQLite serializes writers itself.

use std::path::Path;

use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::AsyncConnection;

use super::to_diesel_error;

pub type DieselError = diesel::result::Error;

/// Async wrapper around a blocking SQLite connection.
pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

#[derive(Clone, Debug)]
pub struct SqlitePool {
    database_url: String,
}

impl SqlitePool {
    /// Accepts a bare path or a `sqlite:` / `sqlite://` URL.
    pub fn new(database_url: &str) -> Self {
        let path = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .unwrap_or(database_url);
        Self {
            database_url: path.to_string(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(&path.display().to_string())
    }

    pub async fn get(&self) -> Result<SqliteConn, DieselError> {
        SqliteConn::establish(&self.database_url)
            .await
            .map_err(to_diesel_error)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_prefixes_are_stripped() {
        assert_eq!(SqlitePool::new("sqlite:media.db").database_url(), "media.db");
        assert_eq!(SqlitePool::new("sqlite:///tmp/m.db").database_url(), "/tmp/m.db");
        assert_eq!(SqlitePool::new("/tmp/m.db").database_url(), "/tmp/m.db");
    }
}
