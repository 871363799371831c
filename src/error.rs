//! # Error Types
//!
//! Comprehensive error handling for the resource distribution and command
//! dispatch core.
//!
//! This module defines all error variants that can occur while driving a
//! transfer session or dispatching commands, from low-level I/O failures to
//! invalid command declarations.
//!
//! ## Error Categories
//! - **I/O Errors**: File system failures while staging transferred content
//! - **Format Errors**: Undecodable map payloads, malformed configuration
//! - **Declaration Errors**: Command bindings that cannot be constructed
//! - **Synchronization Errors**: Poisoned registry locks
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use modnet_core::error::{CoreError, Result};
//!
//! fn read_script(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).map_err(CoreError::Io)
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Registry lock errors
    pub const ERR_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on command registry";
    pub const ERR_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on command registry";

    /// Transfer errors
    pub const ERR_TRANSFER_BUSY: &str = "A transfer is already in progress";
    pub const ERR_MAP_DECODE: &str = "Map payload could not be decoded";

    /// Command declaration errors
    pub const ERR_MISSING_COMMAND_NAME: &str =
        "Command has no explicit name and no Command_ prefix to derive one from";
    pub const ERR_SIGNATURE_NO_SENDER: &str =
        "Command signature must start with a sender parameter";
    pub const ERR_SIGNATURE_GREEDY_PLACEMENT: &str =
        "Greedy parameter is only legal as the last parameter of a greedy command";
}

// CoreError is the primary error type for all transfer and dispatch operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Map format error: {0}")]
    MapFormat(#[from] bincode::Error),

    #[error("Invalid transfer path: {0}")]
    InvalidPath(String),

    #[error("Invalid command declaration: {0}")]
    InvalidCommand(String),

    #[error("Command handler failed: {0}")]
    Handler(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),

    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
