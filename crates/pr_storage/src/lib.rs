use pr_core::{ArticleStorage, Error, Result};
use std::path::Path;
use std::sync::Arc;

pub mod backends;

pub use backends::*;

/// Build the backend named by `kind`. `path` is the SQLite database file and
/// is ignored by the memory backend.
pub async fn create_storage(kind: &str, path: &Path) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Arc::new(SQLiteStorage::new_with_path(path).await?)),
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => {
            let _ = path;
            Err(Error::Config("SQLite storage requires the `sqlite` feature".to_string()))
        }
        other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
    }
}
