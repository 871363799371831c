//! # Utility Modules
//!
//! Supporting utilities for content hashing and logging.
//!
//! ## Components
//! - **Checksum**: MD5 content hashing for transfer deduplication
//! - **Logging**: Structured logging configuration

pub mod checksum;
pub mod logging;

// Re-export public helpers for advanced users
pub use checksum::{checksum_matches, file_md5_hex, md5_hex};
