//! Scheme -> dialect lookup.

use serde::Serialize;
use std::fmt;

/// One of the supported proxy link dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Hysteria2,
    Vless,
    Vmess,
    Trojan,
    Shadowsocks,
    Socks5,
    Http,
    WireGuard,
    Tuic,
    Hysteria,
}

/// Scheme table. Lookup is on the case-folded token before `://`.
pub const SCHEMES: &[(&str, Dialect)] = &[
    ("hy2", Dialect::Hysteria2),
    ("hysteria2", Dialect::Hysteria2),
    ("vless", Dialect::Vless),
    ("vmess", Dialect::Vmess),
    ("trojan", Dialect::Trojan),
    ("ss", Dialect::Shadowsocks),
    ("shadowsocks", Dialect::Shadowsocks),
    ("socks5", Dialect::Socks5),
    ("socks", Dialect::Socks5),
    ("http", Dialect::Http),
    ("https", Dialect::Http),
    ("wg", Dialect::WireGuard),
    ("wireguard", Dialect::WireGuard),
    ("tuic", Dialect::Tuic),
    ("hysteria", Dialect::Hysteria),
];

impl Dialect {
    pub const ALL: [Dialect; 10] = [
        Dialect::Hysteria2,
        Dialect::Vless,
        Dialect::Vmess,
        Dialect::Trojan,
        Dialect::Shadowsocks,
        Dialect::Socks5,
        Dialect::Http,
        Dialect::WireGuard,
        Dialect::Tuic,
        Dialect::Hysteria,
    ];

    /// Map a scheme token (without `://`) to its dialect.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        let scheme = scheme.to_ascii_lowercase();
        SCHEMES
            .iter()
            .find(|(s, _)| *s == scheme)
            .map(|(_, d)| *d)
    }

    /// Stable lowercase name, also used for default display tags (`{name}-{host}`).
    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Hysteria2 => "hysteria2",
            Dialect::Vless => "vless",
            Dialect::Vmess => "vmess",
            Dialect::Trojan => "trojan",
            Dialect::Shadowsocks => "shadowsocks",
            Dialect::Socks5 => "socks5",
            Dialect::Http => "http",
            Dialect::WireGuard => "wireguard",
            Dialect::Tuic => "tuic",
            Dialect::Hysteria => "hysteria",
        }
    }

    /// Port used when the link carries none or an unparsable one.
    pub const fn default_port(self) -> u16 {
        match self {
            Dialect::Shadowsocks => 8388,
            Dialect::Socks5 => 1080,
            Dialect::WireGuard => 51820,
            // plain http is handled by the http parser itself (80)
            _ => 443,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extract the scheme token before `://`, if any.
pub fn scheme_of(text: &str) -> Option<&str> {
    let (scheme, _) = text.trim_start().split_once("://")?;
    if scheme.is_empty()
        || !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }
    Some(scheme)
}

/// Recognise the dialect of a link. Unknown or missing schemes yield `None`.
pub fn detect_dialect(text: &str) -> Option<Dialect> {
    scheme_of(text).and_then(Dialect::from_scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_aliases_case_insensitively() {
        assert_eq!(detect_dialect("HY2://pw@h:1"), Some(Dialect::Hysteria2));
        assert_eq!(detect_dialect("hysteria2://h"), Some(Dialect::Hysteria2));
        assert_eq!(detect_dialect("Shadowsocks://x"), Some(Dialect::Shadowsocks));
        assert_eq!(detect_dialect("socks://h:1"), Some(Dialect::Socks5));
        assert_eq!(detect_dialect("https://h"), Some(Dialect::Http));
        assert_eq!(detect_dialect("wg://h"), Some(Dialect::WireGuard));
        assert_eq!(detect_dialect("hysteria://h"), Some(Dialect::Hysteria));
    }

    #[test]
    fn unknown_scheme_is_none() {
        assert_eq!(detect_dialect("ftp://h"), None);
        assert_eq!(detect_dialect("no scheme here"), None);
        assert_eq!(detect_dialect("://h"), None);
    }

    #[test]
    fn every_dialect_has_a_scheme() {
        for d in Dialect::ALL {
            assert!(SCHEMES.iter().any(|(_, x)| *x == d), "{d} missing");
        }
    }
}
