//! Proxy share-link parsing.
//! 代理分享链接解析。
//!
//! # Pipeline / 流程
//! `raw text` -> [`detect_dialect`] -> [`protocol`] parser -> [`CanonicalLink`] -> sing-box outbound fragment
//!
//! Every supported scheme maps to one [`Dialect`]; each dialect has a sibling module under
//! [`protocol`] implementing the [`Protocol`] trait (parse + outbound fragment). Dispatch is a
//! plain `match` on the dialect tag, so adding a dialect is a compile error until every
//! parser table handles it.
//!
//! The crate is pure: no I/O, no caches, no shared state between calls.

pub mod b64;
pub mod detect;
pub mod error;
pub mod model;
pub mod outbound;
pub mod protocol;
pub mod uri;

pub use detect::{detect_dialect, Dialect};
pub use error::LinkError;
pub use model::{
    CanonicalLink, LinkParams, Network, Reality, Security, SecurityParams, SecurityTier, Transport,
};
pub use protocol::Protocol;

/// Parse a share link into its canonical record.
///
/// # Errors
/// [`LinkError::UnknownScheme`] when the scheme is not one of the supported dialects,
/// [`LinkError::Malformed`] when a dialect-mandatory field is missing or corrupt.
pub fn parse_link(text: &str) -> Result<CanonicalLink, LinkError> {
    CanonicalLink::parse(text)
}
