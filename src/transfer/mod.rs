//! # Resource Transfer
//!
//! Chunked binary transfer of server-authored content, staged for activation.
//!
//! This module receives files a connected server pushes to the peer: opaque
//! resource files persisted to disk, scripts accumulated for batch
//! activation, and maps decoded from the binary map format at completion.
//!
//! ## Components
//! - **Session**: the mutable state of one in-flight transfer
//! - **Coordinator**: single-slot session manager driving start/chunk/end
//! - **Staging**: ordered holding area for scripts awaiting batch activation
//!
//! ## Concurrency
//! The coordinator is the single concurrency gate for transfers: at most one
//! session exists at a time and there is no internal locking. All calls must
//! come from one logical sequence (the transport event loop); the `&mut self`
//! API makes that contract explicit in the type system.

pub mod coordinator;
pub mod session;
pub mod staging;

pub use coordinator::{TransferCoordinator, TransferDelegate};
pub use session::{FileKind, TransferSession};
pub use staging::{ScriptStaging, StagedScript};
