//! Command registry.
//!
//! Per-resource collections of bindings plus the registry-wide dispatch
//! entry point. Registration order is dispatch order; dispatch never
//! short-circuits, so every resource defining a matching command receives
//! the invocation.

use crate::command::binding::CommandBinding;
use crate::command::{ClientHandle, ServerApi, SharedServerApi};
use crate::error::{constants, CoreError, Result};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// One registered resource's bindings, in discovery order.
struct ResourceCommands {
    resource: String,
    bindings: Vec<Arc<CommandBinding>>,
}

/// Registry of command bindings keyed by resource, safe for concurrent use.
///
/// All mutation and dispatch goes through one registry-wide lock. Dispatch
/// snapshots the binding list under the read lock and releases it before any
/// handler runs, so a slow handler never serializes dispatch for unrelated
/// resources.
pub struct CommandRegistry {
    api: SharedServerApi,
    resources: RwLock<Vec<ResourceCommands>>,
}

impl CommandRegistry {
    pub fn new(api: SharedServerApi) -> Self {
        Self {
            api,
            resources: RwLock::new(Vec::new()),
        }
    }

    /// Register a resource's bindings, stamping each with the owner name.
    ///
    /// Re-registering a loaded resource replaces its binding list in place,
    /// keeping its position in dispatch order.
    pub fn register(&self, resource: &str, bindings: Vec<CommandBinding>) -> Result<()> {
        let bindings: Vec<Arc<CommandBinding>> = bindings
            .into_iter()
            .map(|mut binding| {
                binding.set_owner(resource);
                Arc::new(binding)
            })
            .collect();

        let mut resources = self
            .resources
            .write()
            .map_err(|_| CoreError::LockPoisoned(constants::ERR_REGISTRY_WRITE_LOCK))?;

        debug!(resource, commands = bindings.len(), "registering resource commands");

        match resources.iter_mut().find(|rc| rc.resource == resource) {
            Some(existing) => existing.bindings = bindings,
            None => resources.push(ResourceCommands {
                resource: resource.to_string(),
                bindings,
            }),
        }

        Ok(())
    }

    /// Remove exactly the named resource's bindings.
    pub fn unregister(&self, resource: &str) -> Result<()> {
        let mut resources = self
            .resources
            .write()
            .map_err(|_| CoreError::LockPoisoned(constants::ERR_REGISTRY_WRITE_LOCK))?;

        resources.retain(|rc| rc.resource != resource);
        debug!(resource, "unregistered resource commands");
        Ok(())
    }

    /// Dispatch one inbound line to every binding of every registered
    /// resource, in stable order (resource registration order, then binding
    /// discovery order). Returns whether any binding matched.
    ///
    /// Matching is OR-folded without short-circuiting: resources sharing a
    /// command name each receive the invocation. Handlers run on the calling
    /// thread after the registry lock is released.
    pub fn parse(&self, sender: &ClientHandle, raw: &str) -> Result<bool> {
        let snapshot: Vec<Arc<CommandBinding>> = {
            let resources = self
                .resources
                .read()
                .map_err(|_| CoreError::LockPoisoned(constants::ERR_REGISTRY_READ_LOCK))?;

            resources
                .iter()
                .flat_map(|rc| rc.bindings.iter().cloned())
                .collect()
        };

        let mut matched = false;
        for binding in &snapshot {
            matched |= binding.parse(self.api.as_ref(), sender, raw);
        }

        Ok(matched)
    }

    /// Names of currently registered resources, in registration order.
    pub fn registered_resources(&self) -> Result<Vec<String>> {
        let resources = self
            .resources
            .read()
            .map_err(|_| CoreError::LockPoisoned(constants::ERR_REGISTRY_READ_LOCK))?;
        Ok(resources.iter().map(|rc| rc.resource.clone()).collect())
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let resources = self
            .registered_resources()
            .unwrap_or_else(|_| vec!["<poisoned>".to_string()]);
        f.debug_struct("CommandRegistry")
            .field("resources", &resources)
            .finish_non_exhaustive()
    }
}
