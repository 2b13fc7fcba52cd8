//! Error kinds raised while building descriptors.
//!
//! Everything here fails fast: a constructor either returns a complete value
//! or one of these, never a half-built tree.

use std::fmt;

/// Which wrapping descriptor rejected its inner type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapper {
    List,
    Set,
    Tuple,
    Optional,
    Dict,
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Wrapper::List => "List",
            Wrapper::Set => "Set",
            Wrapper::Tuple => "Tuple",
            Wrapper::Optional => "Optional",
            Wrapper::Dict => "Dict",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WrapError {
    /// A `Nothing` type showed up where a wrapper needs a value type.
    #[error("Type Nothing can not be wrapped in {wrapper}")]
    Definition { wrapper: Wrapper },

    /// A required inner-type argument was missing (or over-supplied).
    #[error("invalid argument `{param}`: {reason}")]
    InvalidArgument { param: &'static str, reason: String },

    #[error("invariant violated for `{param}`: {message}")]
    InvariantViolation { param: &'static str, message: String },
}

impl WrapError {
    pub(crate) fn nothing_in(wrapper: Wrapper) -> Self {
        WrapError::Definition { wrapper }
    }
}
