//! Markup stripping for scraped subscription pages.
//!
//! Structural pass: text between tags plus the `href` / `data-url` / `data-link` /
//! `data-subscription` attributes, entity-decoded, one item per line. When the page has
//! no recognisable tags the fallback replaces anything tag-shaped with a newline.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const LINK_ATTRS: &[&str] = &["href", "data-url", "data-link", "data-subscription"];

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("static regex"));
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<\s*/?\s*([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("static regex")
});
static ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][A-Za-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("static regex")
});
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

/// `<html`, `<body` or `<div`, case-insensitive.
pub fn looks_like_html(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    ["<html", "<body", "<div"].iter().any(|m| lower.contains(m))
}

/// Plain text for the link scanners.
pub fn strip(html: &str) -> String {
    match structural(html) {
        Some(text) => text,
        None => {
            debug!("html: no parsable tags, using fallback stripping");
            ANY_TAG.replace_all(html, "\n").into_owned()
        }
    }
}

fn structural(html: &str) -> Option<String> {
    let html = COMMENT.replace_all(html, "");
    let mut out: Vec<String> = Vec::new();
    let mut attrs: Vec<String> = Vec::new();
    let mut last = 0;
    let mut tags = 0usize;

    for cap in TAG.captures_iter(&html) {
        let Some(whole) = cap.get(0) else { continue };
        tags += 1;
        push_text(&mut out, &html[last..whole.start()]);
        last = whole.end();

        let Some(body) = cap.get(2) else { continue };
        for attr in ATTR.captures_iter(body.as_str()) {
            let name = attr.get(1).map(|m| m.as_str().to_ascii_lowercase());
            if !name.is_some_and(|n| LINK_ATTRS.contains(&n.as_str())) {
                continue;
            }
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .or_else(|| attr.get(4))
                .map(|m| decode_entities(m.as_str().trim()));
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                attrs.push(v);
            }
        }
    }
    if tags == 0 {
        return None;
    }
    push_text(&mut out, &html[last..]);
    out.extend(attrs);
    debug!(items = out.len(), tags, "html: structural extraction");
    Some(out.join("\n"))
}

fn push_text(out: &mut Vec<String>, raw: &str) {
    let text = decode_entities(raw.trim());
    if !text.is_empty() {
        out.push(text);
    }
}

/// The handful of entities that show up around links.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_markers() {
        assert!(looks_like_html("<!doctype html><HTML><body></body></HTML>"));
        assert!(looks_like_html("text <div>x</div>"));
        assert!(!looks_like_html("vless://a@b:1"));
    }

    #[test]
    fn keeps_text_and_link_attributes() {
        let page = r#"<html><body>
            <div class="node">vless://id@a.example:443?security=tls&amp;sni=s#A</div>
            <a href="trojan://pw@b.example:443#B">copy</a>
            <button data-link='ss://YWVzLTEyOC1nY206cA@c.example:8388#C'>x</button>
            <!-- <div>hysteria2://hidden@h:1</div> -->
        </body></html>"#;
        let text = strip(page);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.contains(&"vless://id@a.example:443?security=tls&sni=s#A"));
        assert!(lines.contains(&"trojan://pw@b.example:443#B"));
        assert!(lines.contains(&"ss://YWVzLTEyOC1nY206cA@c.example:8388#C"));
        assert!(lines.contains(&"copy"));
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn fallback_without_real_tags() {
        assert_eq!(strip("<div"), "<div");
        assert_eq!(strip("a<1 2>b"), "a\nb");
    }
}
