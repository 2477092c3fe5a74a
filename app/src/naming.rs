//! Output file names derived from the subscription host.

use crate::format::OutputFormat;
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_STEM_CHARS: usize = 50;

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("static regex"));

/// Host of an `http(s)://` URL with userinfo and port removed.
pub fn url_host(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let host = if let Some(v6) = host_port.strip_prefix('[') {
        v6.split(']').next().unwrap_or_default()
    } else {
        host_port.split(':').next().unwrap_or_default()
    };
    Some(host).filter(|h| !h.is_empty())
}

/// `<sanitized host>.<ext>`, or the format's fixed default when no host is usable.
pub fn file_name(source: Option<&str>, format: OutputFormat) -> String {
    let stem = source
        .and_then(url_host)
        .map(|host| {
            UNSAFE_CHARS
                .replace_all(host, "-")
                .chars()
                .take(MAX_STEM_CHARS)
                .collect::<String>()
        })
        .filter(|s| !s.trim_matches(['-', '.']).is_empty());
    match stem {
        Some(stem) => format!("{stem}.{}", format.extension()),
        None => format.default_file_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_from_url() {
        assert_eq!(url_host("https://sub.example.com:8443/api?token=x"), Some("sub.example.com"));
        assert_eq!(url_host("http://user:pw@h.example/x"), Some("h.example"));
        assert_eq!(url_host("https://[2001:db8::1]:443/"), Some("2001:db8::1"));
        assert_eq!(url_host("vless://id@h:443"), None);
    }

    #[test]
    fn names_from_host() {
        assert_eq!(
            file_name(Some("https://sub.example.com:8443/s"), OutputFormat::Clash),
            "sub.example.com.yaml"
        );
        assert_eq!(
            file_name(Some("https://[2001:db8::1]/s"), OutputFormat::Xray),
            "2001-db8--1.json"
        );
        assert_eq!(file_name(Some("https://h/s"), OutputFormat::Text), "h.txt");
    }

    #[test]
    fn long_hosts_are_truncated() {
        let host = "a".repeat(80);
        let name = file_name(Some(&format!("https://{host}/")), OutputFormat::SingBox);
        assert_eq!(name, format!("{}.json", "a".repeat(50)));
    }

    #[test]
    fn defaults_without_host() {
        assert_eq!(file_name(None, OutputFormat::Clash), "clash-config.yaml");
        assert_eq!(file_name(None, OutputFormat::SingBoxFull), "sing-box-config.json");
        assert_eq!(file_name(None, OutputFormat::Xray), "xray-config.json");
        assert_eq!(file_name(Some("trojan://pw@h:1"), OutputFormat::Text), "subscription.txt");
    }
}
