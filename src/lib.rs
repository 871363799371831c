//! # modnet-core
//!
//! Resource distribution and command dispatch core for client-server
//! game-mod frameworks.
//!
//! This crate implements the two load-bearing subsystems of a mod framework:
//! a chunked binary transfer protocol that ships server-authored content
//! (maps, scripts, arbitrary files) to a connected peer and stages it for
//! activation, and a dynamically registered command dispatch registry that
//! binds declaratively described handlers to chat/console input with typed
//! argument coercion and access gating.
//!
//! ## Components
//! - **Transfer**: single-slot session coordination, checksum deduplication,
//!   per-kind finalization, script staging
//! - **Command**: per-resource binding registries, ordered fan-out dispatch,
//!   per-kind argument coercion, ACL gating
//! - **Content**: the binary map format delivered over transfers
//! - **Config/Utils**: TOML configuration, content hashing, logging setup
//!
//! ## External Collaborators
//! The scripting engine host, world registry, chat sink, player roster and
//! ACL flag are consumed through the [`transfer::TransferDelegate`] and
//! [`command::ServerApi`] traits; this crate never implements them.
//!
//! ## Example
//! ```no_run
//! use modnet_core::command::{ClientHandle, CommandRegistry, ServerApi};
//! use std::sync::Arc;
//!
//! struct Server;
//! impl ServerApi for Server {
//!     fn send_chat_message(&self, _target: &ClientHandle, message: &str) {
//!         println!("{message}");
//!     }
//!     fn client_by_name(&self, _name: &str) -> Option<ClientHandle> {
//!         None
//!     }
//!     fn acl_enabled(&self) -> bool {
//!         false
//!     }
//! }
//!
//! let registry = CommandRegistry::new(Arc::new(Server));
//! let sender = ClientHandle::new(1, "console");
//! let matched = registry.parse(&sender, "/help").expect("registry lock");
//! assert!(!matched);
//! ```

pub mod command;
pub mod config;
pub mod content;
pub mod error;
pub mod transfer;
pub mod utils;

// Re-export the primary surface at the crate root
pub use command::{ClientHandle, CommandBinding, CommandRegistry, CommandSpec, ServerApi};
pub use config::CoreConfig;
pub use content::ServerMap;
pub use error::{CoreError, Result};
pub use transfer::{FileKind, ScriptStaging, StagedScript, TransferCoordinator, TransferDelegate};
