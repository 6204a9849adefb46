pub mod fingerprint;
pub mod fs;
pub mod logger;
pub mod parsers;
pub mod progress;
pub mod serde;

pub use fingerprint::{fingerprint_file, sha256_hex};
pub use fs::{atomic_write, validate_dir};
pub use progress::ProgressReporter;
