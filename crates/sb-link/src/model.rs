//! Canonical link record.
//! 规范化链接记录。
//!
//! A [`CanonicalLink`] holds everything the emitters need: endpoint, display tag, the shared
//! transport and security descriptors, and the dialect-specific credentials in [`LinkParams`].

use crate::detect::{detect_dialect, scheme_of, Dialect};
use crate::error::LinkError;
use crate::protocol::{
    http::Http, hysteria::Hysteria, hysteria2::Hysteria2, shadowsocks::Shadowsocks,
    socks::Socks5, trojan::Trojan, tuic::Tuic, vless::Vless, vmess::Vmess,
    wireguard::WireGuard, Protocol,
};
use crate::uri::{split_list, Query, RawLink};
use serde::Serialize;
use serde_json::Value;

/// One parsed proxy endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalLink {
    pub tag: String,
    pub server: String,
    pub port: u16,
    pub transport: Transport,
    pub security: Security,
    #[serde(flatten)]
    pub params: LinkParams,
}

/// Dialect-specific fields. The variant is the dialect tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "dialect", rename_all = "lowercase")]
pub enum LinkParams {
    Hysteria2(Hysteria2),
    Vless(Vless),
    Vmess(Vmess),
    Trojan(Trojan),
    Shadowsocks(Shadowsocks),
    Socks5(Socks5),
    Http(Http),
    WireGuard(WireGuard),
    Tuic(Tuic),
    Hysteria(Hysteria),
}

impl CanonicalLink {
    /// Detect the dialect and run its parser.
    pub fn parse(text: &str) -> Result<Self, LinkError> {
        let text = text.trim();
        let dialect = detect_dialect(text).ok_or_else(|| {
            LinkError::UnknownScheme(scheme_of(text).unwrap_or_default().to_string())
        })?;
        let raw = RawLink::parse(text, dialect)?;
        match dialect {
            Dialect::Hysteria2 => Hysteria2::parse(&raw),
            Dialect::Vless => Vless::parse(&raw),
            Dialect::Vmess => Vmess::parse(&raw),
            Dialect::Trojan => Trojan::parse(&raw),
            Dialect::Shadowsocks => Shadowsocks::parse(&raw),
            Dialect::Socks5 => Socks5::parse(&raw),
            Dialect::Http => Http::parse(&raw),
            Dialect::WireGuard => WireGuard::parse(&raw),
            Dialect::Tuic => Tuic::parse(&raw),
            Dialect::Hysteria => Hysteria::parse(&raw),
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self.params {
            LinkParams::Hysteria2(_) => Dialect::Hysteria2,
            LinkParams::Vless(_) => Dialect::Vless,
            LinkParams::Vmess(_) => Dialect::Vmess,
            LinkParams::Trojan(_) => Dialect::Trojan,
            LinkParams::Shadowsocks(_) => Dialect::Shadowsocks,
            LinkParams::Socks5(_) => Dialect::Socks5,
            LinkParams::Http(_) => Dialect::Http,
            LinkParams::WireGuard(_) => Dialect::WireGuard,
            LinkParams::Tuic(_) => Dialect::Tuic,
            LinkParams::Hysteria(_) => Dialect::Hysteria,
        }
    }

    /// sing-box outbound fragment for this link.
    pub fn to_singbox_outbound(&self) -> Result<Value, LinkError> {
        match &self.params {
            LinkParams::Hysteria2(p) => p.outbound(self),
            LinkParams::Vless(p) => p.outbound(self),
            LinkParams::Vmess(p) => p.outbound(self),
            LinkParams::Trojan(p) => p.outbound(self),
            LinkParams::Shadowsocks(p) => p.outbound(self),
            LinkParams::Socks5(p) => p.outbound(self),
            LinkParams::Http(p) => p.outbound(self),
            LinkParams::WireGuard(p) => p.outbound(self),
            LinkParams::Tuic(p) => p.outbound(self),
            LinkParams::Hysteria(p) => p.outbound(self),
        }
    }

    /// Re-serialize into the dialect's canonical share-link form.
    pub fn to_share_link(&self) -> String {
        match &self.params {
            LinkParams::Hysteria2(p) => p.share_link(self),
            LinkParams::Vless(p) => p.share_link(self),
            LinkParams::Vmess(p) => p.share_link(self),
            LinkParams::Trojan(p) => p.share_link(self),
            LinkParams::Shadowsocks(p) => p.share_link(self),
            LinkParams::Socks5(p) => p.share_link(self),
            LinkParams::Http(p) => p.share_link(self),
            LinkParams::WireGuard(p) => p.share_link(self),
            LinkParams::Tuic(p) => p.share_link(self),
            LinkParams::Hysteria(p) => p.share_link(self),
        }
    }

    /// Name the TLS handshake should present.
    pub fn server_name(&self) -> &str {
        self.security.sni.as_deref().unwrap_or(&self.server)
    }
}

/// Transport network kind. Unknown values fall back to plain TCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Tcp,
    Ws,
    Grpc,
    Http,
    HttpUpgrade,
    Quic,
}

impl Network {
    pub fn from_param(v: &str) -> Self {
        match v.to_ascii_lowercase().as_str() {
            "ws" | "websocket" => Self::Ws,
            "grpc" | "gun" => Self::Grpc,
            "http" | "h2" => Self::Http,
            "httpupgrade" => Self::HttpUpgrade,
            "quic" => Self::Quic,
            _ => Self::Tcp,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Ws => "ws",
            Self::Grpc => "grpc",
            Self::Http => "http",
            Self::HttpUpgrade => "httpupgrade",
            Self::Quic => "quic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Transport {
    pub network: Network,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_type: Option<String>,
}

impl Transport {
    /// `type`, `path`, `host`, `serviceName`, `headerType` query keys.
    /// gRPC service names fall back to `path`, which older generators use.
    pub fn from_query(query: &Query) -> Self {
        let network = query.get("type").map(Network::from_param).unwrap_or_default();
        let path = query.owned("path");
        let service_name = query
            .owned("serviceName")
            .or_else(|| (network == Network::Grpc).then(|| path.clone()).flatten());
        Self {
            network,
            path,
            host: query.owned("host"),
            service_name,
            header_type: query.owned("headerType").filter(|h| h != "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityTier {
    #[default]
    None,
    Tls,
    Reality,
}

impl SecurityTier {
    /// `tls`/`xtls` are TLS, `reality` is Reality, anything else is none.
    pub fn from_param(v: &str) -> Self {
        match v.to_ascii_lowercase().as_str() {
            "tls" | "xtls" => Self::Tls,
            "reality" => Self::Reality,
            _ => Self::None,
        }
    }

    pub const fn is_tls(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Reality {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// Resolved security descriptor. With tier `None` every other field is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Security {
    pub tier: SecurityTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub insecure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reality: Option<Reality>,
}

impl Security {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_tls(&self) -> bool {
        self.tier.is_tls()
    }
}

/// Raw security inputs before the tier rule is applied.
///
/// Every dialect that carries a `none | tls | reality` choice funnels through
/// [`SecurityParams::resolve`] so the rule is applied identically.
#[derive(Debug, Clone, Default)]
pub struct SecurityParams {
    pub tier: SecurityTier,
    pub sni: Option<String>,
    pub fingerprint: Option<String>,
    pub alpn: Vec<String>,
    pub insecure: bool,
    pub public_key: Option<String>,
    pub short_id: Option<String>,
}

impl SecurityParams {
    /// Read `security`, `sni`, `fp`, `alpn`, `pbk`, `sid`, `allowInsecure`/`insecure`.
    pub fn from_query(query: &Query, default_tier: SecurityTier) -> Self {
        Self {
            tier: query
                .get("security")
                .map(SecurityTier::from_param)
                .unwrap_or(default_tier),
            sni: query.owned("sni").or_else(|| query.owned("peer")),
            fingerprint: query.owned("fp"),
            alpn: query.list("alpn"),
            insecure: query.flag("allowInsecure") || query.flag("insecure"),
            public_key: query.owned("pbk"),
            short_id: query.owned("sid"),
        }
    }

    /// Force a tier regardless of the link (TLS-only dialects).
    pub fn with_tier(mut self, tier: SecurityTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn resolve(self) -> Security {
        match self.tier {
            SecurityTier::None => Security::none(),
            SecurityTier::Tls => Security {
                tier: SecurityTier::Tls,
                sni: self.sni,
                fingerprint: self.fingerprint,
                alpn: self.alpn,
                insecure: self.insecure,
                reality: None,
            },
            SecurityTier::Reality => Security {
                tier: SecurityTier::Reality,
                sni: self.sni,
                fingerprint: self.fingerprint.clone(),
                alpn: self.alpn,
                insecure: self.insecure,
                reality: Some(Reality {
                    public_key: self.public_key,
                    short_id: self.short_id,
                    fingerprint: self.fingerprint,
                }),
            },
        }
    }
}

pub(crate) fn alpn_list(v: Option<&str>) -> Vec<String> {
    v.map(split_list).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(s: &str) -> Query {
        Query::parse(s)
    }

    #[test]
    fn tier_none_drops_tls_fields() {
        let sec = SecurityParams::from_query(&query("sni=a.com&fp=chrome&pbk=k"), SecurityTier::None)
            .resolve();
        assert_eq!(sec, Security::none());
    }

    #[test]
    fn reality_consumes_pbk_sid_fp() {
        let sec = SecurityParams::from_query(
            &query("security=reality&sni=a.com&fp=chrome&pbk=KEY&sid=ab"),
            SecurityTier::None,
        )
        .resolve();
        assert_eq!(sec.tier, SecurityTier::Reality);
        let reality = sec.reality.unwrap();
        assert_eq!(reality.public_key.as_deref(), Some("KEY"));
        assert_eq!(reality.short_id.as_deref(), Some("ab"));
        assert_eq!(reality.fingerprint.as_deref(), Some("chrome"));
    }

    #[test]
    fn tls_ignores_reality_keys() {
        let sec = SecurityParams::from_query(&query("security=tls&pbk=KEY"), SecurityTier::None)
            .resolve();
        assert_eq!(sec.tier, SecurityTier::Tls);
        assert!(sec.reality.is_none());
    }

    #[test]
    fn grpc_service_name_falls_back_to_path() {
        let t = Transport::from_query(&query("type=grpc&path=svc"));
        assert_eq!(t.network, Network::Grpc);
        assert_eq!(t.service_name.as_deref(), Some("svc"));
        let t = Transport::from_query(&query("type=weird"));
        assert_eq!(t.network, Network::Tcp);
    }
}
