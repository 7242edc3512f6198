//! dirsync core — error taxonomy, configuration, natural-key matching.

pub mod config;
pub mod error;
pub mod key;

pub use config::SyncConfig;
pub use error::{Error, Result};
pub use key::{normalize, same_key};
