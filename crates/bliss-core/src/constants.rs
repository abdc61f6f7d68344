/// Version tag written into every export document.
pub const EXPORT_VERSION: &str = "1.0";

/// Default lower bound on remote quote length (characters).
pub const DEFAULT_MIN_LENGTH: u32 = 50;

/// Default upper bound on remote quote length (characters).
pub const DEFAULT_MAX_LENGTH: u32 = 300;

/// Reading speed used for reading-time estimates.
pub const WORDS_PER_MINUTE: usize = 200;
