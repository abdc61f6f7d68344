pub mod accessors;
pub mod backend;
pub mod error;
pub mod kv;
pub mod paths;
pub mod schema;
pub mod transfer;

pub use accessors::{FavoriteOutcome, keys};
pub use backend::{Backend, MemoryBackend, SqliteBackend};
pub use error::{Result, StoreError};
pub use kv::{DEFAULT_PREFIX, KvStore, StorageInfo};
pub use paths::{DB_FILE, db_path, default_base_dir};
