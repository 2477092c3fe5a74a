//! Subscription recognition heuristics.
//! 订阅识别启发式。

use sb_link::b64;
use tracing::debug;

/// Schemes the extractor looks for, longer or more specific names first so that a
/// shorter scheme never claims a match inside a longer one (`ss://` inside `vless://`).
/// Plain `http(s)://` is absent: inside a subscription those are web links, not proxies.
pub const LINK_SCHEMES: &[&str] = &[
    "hysteria2://",
    "shadowsocks://",
    "socks5://",
    "wireguard://",
    "hy2://",
    "vless://",
    "vmess://",
    "trojan://",
    "socks://",
    "tuic://",
    "hysteria://",
    "ss://",
    "wg://",
];

const MIN_BLOB_LEN: usize = 20;

/// `http://` or `https://` followed by a non-empty host.
pub fn is_http_url(text: &str) -> bool {
    let lower = text.trim().to_ascii_lowercase();
    let Some(rest) = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty()
}

fn starts_with_scheme(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || LINK_SCHEMES.iter().any(|s| lower.starts_with(s))
}

/// Contains any known link scheme.
pub fn mentions_scheme(text: &str) -> bool {
    LINK_SCHEMES.iter().any(|s| text.contains(s))
}

/// Longer than 20 chars, no whitespace, not already a link or URL.
pub fn is_base64_like(text: &str) -> bool {
    let t = text.trim();
    t.len() > MIN_BLOB_LEN && !t.contains(char::is_whitespace) && !starts_with_scheme(t)
}

/// Decode a base64 blob whose content mentions a known scheme.
///
/// Padding variants (0 to 3 trailing `=`) are tried in turn; the first decode that
/// contains a scheme wins.
pub fn decode_blob(text: &str) -> Option<String> {
    let t = text.trim();
    if !is_base64_like(t) {
        return None;
    }
    let decoded = b64::decode_padding_variants(t).find(|d| mentions_scheme(d));
    if decoded.is_some() {
        debug!(len = t.len(), "base64 subscription blob decoded");
    }
    decoded
}

/// Whether `text` should be treated as a subscription rather than a single link:
/// an http(s) URL, a base64 blob of links, or text holding more than one link.
pub fn is_subscription(text: &str) -> bool {
    let t = text.trim();
    is_http_url(t) || decode_blob(t).is_some() || crate::extract::extract_links(t).len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_like_rules() {
        assert!(!is_base64_like("short"));
        assert!(!is_base64_like("has some whitespace in the middle ok"));
        assert!(!is_base64_like("vless://aaaaaaaaaaaaaaaaaaaaaaaaa"));
        assert!(!is_base64_like("https://example.com/sub/aaaaaaaa"));
        assert!(is_base64_like("dHJvamFuOi8vcEBoOjQ0MyN0"));
    }

    #[test]
    fn url_and_blob_are_subscriptions() {
        assert!(is_subscription("https://sub.example.com/api?token=x"));
        assert!(is_subscription("dHJvamFuOi8vcEBoOjQ0MyN0"));
        assert!(!is_subscription("trojan://p@h:443#t"));
        assert!(!is_subscription("aGVsbG8gd29ybGQgdGhpcyBpcyBwbGFpbg"));
    }

    #[test]
    fn http_url_needs_a_host() {
        assert!(is_http_url("http://a"));
        assert!(is_subscription("http://a"));
        assert!(is_http_url(" HTTPS://sub.example/x "));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("http:///path"));
        assert!(!is_http_url("ftp://a.example"));
    }

    #[test]
    fn several_links_are_a_subscription() {
        assert!(is_subscription("vless://a@h:1#a\nvless://b@h:1#b"));
    }
}
