//! Script staging.
//!
//! Scripts do not activate one by one as they arrive; they collect here in
//! arrival order until the end-of-batch sentinel flushes the whole set to the
//! scripting engine host at once, so cross-script references resolve no
//! matter which file the server happened to send first.

use tracing::debug;

/// A decoded script payload awaiting batch activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedScript {
    /// Logical name: the transfer filename's stem with `.` replaced by `_`
    pub filename: String,
    /// Resource the script belongs to
    pub resource: String,
    /// UTF-8 script source
    pub source: String,
}

impl StagedScript {
    pub fn new(
        filename: impl Into<String>,
        resource: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            resource: resource.into(),
            source: source.into(),
        }
    }
}

/// Ordered holding area for scripts awaiting the batch-activation signal.
#[derive(Debug, Default)]
pub struct ScriptStaging {
    scripts: Vec<StagedScript>,
}

impl ScriptStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a script; staging order is activation order.
    pub fn push(&mut self, script: StagedScript) {
        debug!(
            filename = %script.filename,
            resource = %script.resource,
            staged = self.scripts.len() + 1,
            "script staged"
        );
        self.scripts.push(script);
    }

    /// Take the whole batch in staging order, leaving staging empty.
    pub fn drain(&mut self) -> Vec<StagedScript> {
        std::mem::take(&mut self.scripts)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
