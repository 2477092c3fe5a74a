use crate::detect::Dialect;
use thiserror::Error;

/// Link-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// A dialect-mandatory field is missing or corrupt.
    #[error("malformed {dialect} link: {reason}")]
    Malformed { dialect: Dialect, reason: String },
    /// The scheme is not one of the supported dialects.
    #[error("unsupported link scheme `{0}`")]
    UnknownScheme(String),
}

impl LinkError {
    pub fn malformed(dialect: Dialect, reason: impl Into<String>) -> Self {
        Self::Malformed {
            dialect,
            reason: reason.into(),
        }
    }

    /// Stable identifier for structured reporting.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "malformed_link",
            Self::UnknownScheme(_) => "unknown_scheme",
        }
    }
}
