//! Filesystem primitives for rules-adapter
//!
//! Provides path handling, locked atomic writes for the managed rule file,
//! format-agnostic configuration loading and content checksums.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
