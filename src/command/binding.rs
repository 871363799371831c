//! Command bindings.
//!
//! A [`CommandBinding`] is a [`CommandSpec`] bound to a concrete handler and
//! its parameter signature. It knows how to match an inbound line, coerce the
//! tokens into typed arguments, and invoke the handler, reporting every
//! malformed invocation back to the sender instead of surfacing it as an
//! error.

use crate::command::spec::{ArgValue, CommandSpec, ParamKind, ParamSpec};
use crate::command::{ClientHandle, ServerApi};
use crate::error::{constants, CoreError, Result};
use std::sync::Arc;
use tracing::{error, warn};

/// Handler invoked with the assembled argument list. A returned error is
/// logged with resource/command context and swallowed; it never reaches the
/// sender.
pub type CommandHandler = Arc<dyn Fn(&[ArgValue]) -> Result<()> + Send + Sync>;

/// Handler identifier prefix that yields a command name when the spec does
/// not carry an explicit one: `Command_Kick` becomes `kick`.
const NAME_CONVENTION_PREFIX: &str = "Command_";

/// One dispatchable command: metadata, signature and handler.
pub struct CommandBinding {
    command: String,
    greedy: bool,
    sensitive: bool,
    acl_required: bool,
    params: Vec<ParamSpec>,
    handler: CommandHandler,
    /// Owning resource, stamped at registration
    resource: String,
}

impl CommandBinding {
    /// Build a binding, validating the declaration.
    ///
    /// The command name comes from the spec when present (leading `/`
    /// stripped, lowercased), otherwise from the `Command_` suffix of
    /// `handler_id`. The signature must start with a sender slot, carry the
    /// sender nowhere else, and may end in a greedy slot only when the spec
    /// is greedy.
    pub fn new(
        spec: CommandSpec,
        handler_id: &str,
        params: Vec<ParamSpec>,
        handler: CommandHandler,
    ) -> Result<Self> {
        let command = match spec.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.trim_start_matches('/').to_ascii_lowercase(),
            _ => match handler_id.strip_prefix(NAME_CONVENTION_PREFIX) {
                Some(suffix) if !suffix.is_empty() => suffix.to_ascii_lowercase(),
                _ => {
                    return Err(CoreError::InvalidCommand(format!(
                        "{}: {handler_id}",
                        constants::ERR_MISSING_COMMAND_NAME
                    )))
                }
            },
        };

        if params.first().map(|p| p.kind) != Some(ParamKind::Sender) {
            return Err(CoreError::InvalidCommand(format!(
                "{}: {command}",
                constants::ERR_SIGNATURE_NO_SENDER
            )));
        }

        for (i, param) in params.iter().enumerate() {
            let last = i == params.len() - 1;
            if param.kind == ParamKind::Sender && i != 0 {
                return Err(CoreError::InvalidCommand(format!(
                    "{}: {command}",
                    constants::ERR_SIGNATURE_NO_SENDER
                )));
            }
            if param.kind == ParamKind::Greedy && (!last || !spec.greedy) {
                return Err(CoreError::InvalidCommand(format!(
                    "{}: {command}",
                    constants::ERR_SIGNATURE_GREEDY_PLACEMENT
                )));
            }
        }

        Ok(Self {
            command,
            greedy: spec.greedy,
            sensitive: spec.sensitive,
            acl_required: spec.acl_required,
            params,
            handler,
            resource: String::new(),
        })
    }

    /// Lowercase command name this binding matches.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Resource that registered this binding; empty until registration.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub(crate) fn set_owner(&mut self, resource: &str) {
        self.resource = resource.to_string();
    }

    /// Match and dispatch one inbound line.
    ///
    /// Returns `false` only when the line's command token is not this
    /// command; every matched line returns `true`, including malformed
    /// invocations that were answered with a usage or refusal message
    /// instead of an invocation.
    pub fn parse(&self, api: &dyn ServerApi, sender: &ClientHandle, raw: &str) -> bool {
        if raw.trim().is_empty() {
            return false;
        }
        let args: Vec<&str> = raw.split_whitespace().collect();

        let Some(first) = args.first() else {
            return false;
        };
        if !first
            .trim_start_matches('/')
            .eq_ignore_ascii_case(&self.command)
        {
            return false;
        }

        // The command token stands in for the sender slot, so the raw token
        // count is compared against the full signature length
        if args.len() < self.params.len() || (args.len() > self.params.len() && !self.greedy) {
            api.send_chat_message(sender, &self.usage());
            return true;
        }

        if self.acl_required && !api.acl_enabled() {
            api.send_chat_message(sender, "ERROR: ACL must be running!");
            return true;
        }

        let mut arguments: Vec<ArgValue> = Vec::with_capacity(self.params.len());
        arguments.push(ArgValue::Sender(sender.clone()));

        for i in 1..self.params.len() {
            let param = &self.params[i];
            match param.kind {
                ParamKind::Sender => {
                    // Ruled out at construction
                    arguments.push(ArgValue::Sender(sender.clone()));
                }
                ParamKind::Player => match api.client_by_name(args[i]) {
                    Some(target) => arguments.push(ArgValue::Player(target)),
                    None => {
                        api.send_chat_message(
                            sender,
                            &format!(
                                "ERROR: No player named \"{}\" has been found for {}.",
                                args[i], param.name
                            ),
                        );
                        return true;
                    }
                },
                ParamKind::Greedy => {
                    arguments.push(ArgValue::Text(args[i..].join(" ")));
                }
                ParamKind::Primitive(kind) => match kind.parse(args[i]) {
                    Ok(value) => arguments.push(value),
                    Err(coercion) => {
                        let logged_line = if self.sensitive {
                            "[SENSITIVE INFO]"
                        } else {
                            raw
                        };
                        warn!(
                            command = %self.command,
                            sender = %sender.name,
                            line = logged_line,
                            %coercion,
                            "command argument failed to coerce"
                        );
                        api.send_chat_message(sender, &self.usage());
                        return true;
                    }
                },
            }
        }

        if let Err(e) = (self.handler)(&arguments) {
            error!(
                command = %self.command,
                resource = %self.resource,
                error = %e,
                "unhandled error in command handler"
            );
        }

        true
    }

    /// Usage line listing the parameter names: the first (sender) slot bare,
    /// user-supplied slots bracketed.
    fn usage(&self) -> String {
        let mut rendered = String::new();
        for (i, param) in self.params.iter().enumerate() {
            if i == 0 {
                rendered.push_str(&param.name);
            } else {
                rendered.push_str(" [");
                rendered.push_str(&param.name);
                rendered.push(']');
            }
        }
        format!("USAGE: /{} {}", self.command, rendered)
    }
}

impl std::fmt::Debug for CommandBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBinding")
            .field("command", &self.command)
            .field("greedy", &self.greedy)
            .field("sensitive", &self.sensitive)
            .field("acl_required", &self.acl_required)
            .field("params", &self.params)
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}
