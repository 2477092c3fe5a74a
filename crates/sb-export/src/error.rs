use crate::format::TargetFormat;
use sb_link::{Dialect, LinkError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error(transparent)]
    Link(#[from] LinkError),
    /// The dialect has no mapping in the requested format.
    #[error("{dialect} links cannot be expressed in {format} configs")]
    UnsupportedDialect {
        dialect: Dialect,
        format: TargetFormat,
    },
    /// Every element of a batch failed or was unsupported.
    #[error("none of the {total} links could be converted to {format}")]
    NoConvertibleLinks { format: TargetFormat, total: usize },
    #[error("failed to render {format} config: {message}")]
    Render {
        format: TargetFormat,
        message: String,
    },
}

impl ExportError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Link(e) => e.kind(),
            Self::UnsupportedDialect { .. } => "unsupported_dialect",
            Self::NoConvertibleLinks { .. } => "no_convertible_links",
            Self::Render { .. } => "render_failed",
        }
    }
}
