//! # Command Dispatch
//!
//! Dynamically registered command dispatch with typed argument coercion and
//! access gating.
//!
//! Each loaded resource registers a list of [`CommandBinding`]s built from
//! declarative [`CommandSpec`] metadata plus an explicit parameter signature.
//! Inbound chat/console lines fan out through the [`CommandRegistry`] to
//! every binding of every registered resource; multiple resources may define
//! the same command name and each receives the invocation.
//!
//! ## Concurrency
//! The registry is safe for concurrent use: registration, unregistration and
//! dispatch all go through one registry-wide lock, and handler invocation
//! happens on a snapshot taken under that lock, so a long-running handler
//! stalls only the thread that dispatched it.

pub mod binding;
pub mod registry;
pub mod spec;


pub use binding::{CommandBinding, CommandHandler};
pub use registry::CommandRegistry;
pub use spec::{ArgValue, CoercionError, CommandSpec, ParamKind, ParamSpec, PrimitiveKind};

use std::sync::Arc;

/// A connected peer as the command layer sees it: an opaque id plus the
/// display name used for roster lookups and log context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientHandle {
    pub id: u64,
    pub name: String,
}

impl ClientHandle {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The slice of the surrounding server this module consumes: a chat sink for
/// user-facing messages, name lookup against currently connected peers, and
/// the on/off state of ACL enforcement.
pub trait ServerApi: Send + Sync {
    /// Deliver a message to one connected peer.
    fn send_chat_message(&self, target: &ClientHandle, message: &str);

    /// Resolve a connected peer by display name. `None` when nobody matches.
    fn client_by_name(&self, name: &str) -> Option<ClientHandle>;

    /// Whether ACL enforcement is currently active.
    fn acl_enabled(&self) -> bool;
}

/// Shared reference to the server surface, cloned into each registry.
pub type SharedServerApi = Arc<dyn ServerApi>;
