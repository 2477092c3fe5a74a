//! URI-shaped link splitting shared by all dialect parsers.
//!
//! `scheme://[credential@]host[:port][/path][?query][#fragment]`
//!
//! The splitting is deliberately looser than RFC 3986: share links routinely carry
//! unescaped characters in credentials, and the `@` separating the credential is the
//! last one in the authority.

use crate::detect::{scheme_of, Dialect};
use crate::error::LinkError;
use std::borrow::Cow;
use tracing::debug;

/// Query parameters, first occurrence of a repeated key wins. Blank values are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for part in raw.split('&').filter(|p| !p.is_empty()) {
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            let key = decode_component(k, true);
            let value = decode_component(v, true);
            if value.is_empty() || pairs.iter().any(|(existing, _)| *existing == key) {
                continue;
            }
            pairs.push((key, value));
        }
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First present key among aliases.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }

    pub fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_owned)
    }

    /// `1`, `true`, `yes` (any case) are true; everything else false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    pub fn number<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(leading_number)
    }

    /// Comma-separated list, empty items dropped.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key).map(split_list).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A link split into its URI parts.
#[derive(Debug, Clone)]
pub struct RawLink<'a> {
    /// Case-folded scheme.
    pub scheme: String,
    /// Everything after `://` up to `?` / `#` (path included).
    pub opaque: &'a str,
    /// Everything after `://` up to the first `/`, `?` or `#`.
    pub authority: &'a str,
    pub query: Query,
    /// Percent-decoded fragment.
    pub fragment: Option<String>,
}

impl<'a> RawLink<'a> {
    pub fn parse(text: &'a str, dialect: Dialect) -> Result<Self, LinkError> {
        let text = text.trim();
        let scheme = scheme_of(text).ok_or_else(|| LinkError::malformed(dialect, "missing scheme"))?;
        let rest = &text[scheme.len() + 3..];

        let (rest, fragment) = match rest.split_once('#') {
            Some((r, f)) => (r, Some(f)),
            None => (rest, None),
        };
        let (opaque, query) = match rest.split_once('?') {
            Some((o, q)) => (o, Query::parse(q)),
            None => (rest, Query::default()),
        };
        let authority = opaque.split('/').next().unwrap_or_default();
        let fragment = fragment
            .filter(|f| !f.is_empty())
            .map(|f| decode_component(f, false));

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            opaque,
            authority,
            query,
            fragment,
        })
    }

    /// Credential before the last `@` (percent-decoded) and the `host:port` part after it.
    pub fn credential(&self) -> (Option<String>, &'a str) {
        let (cred, host_port) = split_credential(self.authority);
        (cred.map(|c| decode_component(c, false)), host_port)
    }

    /// `user:pass@host:port` with each half decoded separately.
    pub fn user_pass(&self) -> (Option<String>, Option<String>, &'a str) {
        let (cred, host_port) = split_credential(self.authority);
        match cred {
            Some(cred) => {
                let (user, pass) = match cred.split_once(':') {
                    Some((u, p)) => (u, Some(p)),
                    None => (cred, None),
                };
                let user = Some(decode_component(user, false)).filter(|u| !u.is_empty());
                let pass = pass.map(|p| decode_component(p, false)).filter(|p| !p.is_empty());
                (user, pass, host_port)
            }
            None => (None, None, host_port),
        }
    }

    /// Display tag: decoded fragment, else `{dialect}-{host}`.
    pub fn tag(&self, dialect: Dialect, host: &str) -> String {
        self.fragment
            .clone()
            .unwrap_or_else(|| default_tag(dialect, host))
    }
}

pub fn default_tag(dialect: Dialect, host: &str) -> String {
    format!("{}-{}", dialect.name(), host)
}

/// Split `cred@host:port` at the last `@`, without decoding.
/// An empty credential counts as absent.
pub fn split_credential(authority: &str) -> (Option<&str>, &str) {
    match authority.rsplit_once('@') {
        Some((cred, host_port)) => ((!cred.is_empty()).then_some(cred), host_port),
        None => (None, authority),
    }
}

/// Bracket IPv6 literals and append the port.
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Percent-encode a component for re-serialized links.
pub fn encode_component(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Build `?k=v&...` from present pairs, or an empty string.
pub fn encode_query(pairs: &[(&str, Option<String>)]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| format!("{k}={}", encode_component(v))))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

/// Split `host:port`; an absent, unparsable or zero port falls back to `default_port`.
/// IPv6 literals in brackets are unwrapped.
pub fn split_host_port(host_port: &str, default_port: u16) -> (String, u16) {
    let (host, port) = if let Some(rest) = host_port.strip_prefix('[') {
        match rest.split_once(']') {
            Some((h, tail)) => (h, tail.strip_prefix(':')),
            None => (host_port, None),
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((h, p)) => (h, Some(p)),
            None => (host_port, None),
        }
    };
    let port = match port.map(str::parse::<u16>) {
        Some(Ok(p)) if p > 0 => p,
        Some(_) => {
            debug!(host_port, default_port, "unparsable port, using default");
            default_port
        }
        None => default_port,
    };
    (host.to_string(), port)
}

/// Percent-decode; `+` becomes a space in query components.
/// Invalid UTF-8 leaves the input untouched.
pub fn decode_component(raw: &str, form: bool) -> String {
    let raw: Cow<'_, str> = if form && raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    match urlencoding::decode(&raw) {
        Ok(s) => s.into_owned(),
        Err(_) => raw.into_owned(),
    }
}

pub fn is_truthy(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

pub fn split_list(v: &str) -> Vec<String> {
    v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse the leading digits of a value (`"100 mbps"` -> 100).
pub fn leading_number<T: std::str::FromStr>(v: &str) -> Option<T> {
    let v = v.trim();
    let end = v
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(v.len(), |(i, _)| i);
    v[..end].parse().ok()
}
