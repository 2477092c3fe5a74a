//! Per-dialect parsers.
//! 各协议解析器。
//!
//! Each module owns the dialect's parameter struct and implements [`Protocol`] for it:
//! `parse` builds a [`CanonicalLink`] from a split URI, `outbound` renders the sing-box
//! fragment, `share_link` writes the canonical share-link form back out.

use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{CanonicalLink, SecurityTier};
use crate::uri::{encode_component, encode_query, join_host_port, RawLink};
use serde_json::Value;

pub mod http;
pub mod hysteria;
pub mod hysteria2;
pub mod shadowsocks;
pub mod socks;
pub mod trojan;
pub mod tuic;
pub mod vless;
pub mod vmess;
pub mod wireguard;

/// Capability shared by every dialect.
pub trait Protocol: Sized {
    const DIALECT: Dialect;

    /// Build the canonical record.
    ///
    /// # Errors
    /// [`LinkError::Malformed`] when a field the dialect requires is missing or corrupt.
    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError>;

    /// sing-box outbound object for `link` (whose params are `self`).
    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError>;

    /// Canonical share link carrying the same endpoint and credentials.
    fn share_link(&self, link: &CanonicalLink) -> String;
}

/// `scheme://[cred@]host:port{query}#tag`
pub(crate) fn format_link(
    scheme: &str,
    cred: Option<&str>,
    link: &CanonicalLink,
    pairs: &[(&str, Option<String>)],
) -> String {
    let cred = cred
        .map(|c| format!("{c}@"))
        .unwrap_or_default();
    format!(
        "{scheme}://{cred}{}{}#{}",
        join_host_port(&link.server, link.port),
        encode_query(pairs),
        encode_component(&link.tag)
    )
}

/// Query pairs describing transport and security, in the common VLESS/Trojan vocabulary.
pub(crate) fn stream_pairs(link: &CanonicalLink) -> Vec<(&'static str, Option<String>)> {
    let t = &link.transport;
    let s = &link.security;
    let tier = match s.tier {
        SecurityTier::None => "none",
        SecurityTier::Tls => "tls",
        SecurityTier::Reality => "reality",
    };
    let reality = s.reality.as_ref();
    vec![
        ("type", Some(t.network.as_str().to_string())),
        ("path", t.path.clone()),
        ("host", t.host.clone()),
        ("serviceName", t.service_name.clone()),
        ("headerType", t.header_type.clone()),
        ("security", Some(tier.to_string())),
        ("sni", s.sni.clone()),
        ("fp", s.fingerprint.clone()),
        ("pbk", reality.and_then(|r| r.public_key.clone())),
        ("sid", reality.and_then(|r| r.short_id.clone())),
        ("alpn", (!s.alpn.is_empty()).then(|| s.alpn.join(","))),
        ("allowInsecure", s.insecure.then(|| "1".to_string())),
    ]
}
