//! Command declarations and argument typing.
//!
//! A [`CommandSpec`] is the declarative metadata a resource attaches to a
//! handler; [`ParamSpec`] describes one slot of the handler's signature.
//! Tokens coerce into [`ArgValue`]s through per-kind parsers that return a
//! structured [`CoercionError`] instead of relying on a generic
//! convert-to-anything primitive.

use crate::command::ClientHandle;
use serde::{Deserialize, Serialize};

/// Declarative metadata for one command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Explicit command name; when absent the name is derived from the
    /// handler identifier's `Command_` suffix at binding construction
    pub name: Option<String>,
    /// Final parameter absorbs all remaining input as one string
    pub greedy: bool,
    /// Raw input is redacted from failure logs
    pub sensitive: bool,
    /// Dispatch refuses unless ACL enforcement is active
    pub acl_required: bool,
}

impl CommandSpec {
    /// Spec with an explicit name; a leading `/` is stripped.
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.trim_start_matches('/').to_string()),
            ..Self::default()
        }
    }

    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn acl_required(mut self) -> Self {
        self.acl_required = true;
        self
    }
}

/// Primitive argument types a token can coerce into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Int,
    Float,
    Bool,
    Text,
}

impl PrimitiveKind {
    /// Human-readable name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Text => "text",
        }
    }

    /// Coerce one token into a typed value.
    pub fn parse(self, token: &str) -> Result<ArgValue, CoercionError> {
        let fail = || CoercionError {
            token: token.to_string(),
            expected: self,
        };

        match self {
            PrimitiveKind::Int => token.parse::<i64>().map(ArgValue::Int).map_err(|_| fail()),
            PrimitiveKind::Float => token
                .parse::<f64>()
                .map(ArgValue::Float)
                .map_err(|_| fail()),
            PrimitiveKind::Bool => {
                if token.eq_ignore_ascii_case("true") {
                    Ok(ArgValue::Bool(true))
                } else if token.eq_ignore_ascii_case("false") {
                    Ok(ArgValue::Bool(false))
                } else {
                    Err(fail())
                }
            }
            PrimitiveKind::Text => Ok(ArgValue::Text(token.to_string())),
        }
    }
}

/// Kind of one parameter slot in a command signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    /// The invoking peer; always the first slot, never user-supplied
    Sender,
    /// Resolved by name lookup against currently connected peers
    Player,
    /// Coerced from the token text
    Primitive(PrimitiveKind),
    /// Consumes all remaining tokens joined by single spaces; only legal as
    /// the last slot of a greedy command
    Greedy,
}

/// A named parameter slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The conventional first slot.
    pub fn sender() -> Self {
        Self::new("sender", ParamKind::Sender)
    }
}

/// A typed argument handed to a command handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Sender(ClientHandle),
    Player(ClientHandle),
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl ArgValue {
    /// The text content of a `Text` argument, if that is what this is.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A token failed to coerce into its declared primitive kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionError {
    pub token: String,
    pub expected: PrimitiveKind,
}

impl std::fmt::Display for CoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "token {:?} is not a valid {}",
            self.token,
            self.expected.name()
        )
    }
}

impl std::error::Error for CoercionError {}
