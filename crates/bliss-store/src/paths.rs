use std::env;
use std::path::{Path, PathBuf};

/// SQLite file name inside the data directory.
pub const DB_FILE: &str = "bliss.db";

/// `$HOME/.holy-bliss`, or `./.holy-bliss` when no home is known.
pub fn default_base_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".holy-bliss")
}

pub fn db_path(base: &Path) -> PathBuf {
    base.join(DB_FILE)
}
