//! Link extraction from arbitrary subscription text.
//! 从任意订阅文本中提取链接。
//!
//! Pipeline:
//! 1. strip markup when the text looks like HTML;
//! 2. swap in the decoded text when it is a base64 blob of links;
//! 3. one regex pass per scheme in [`LINK_SCHEMES`] order;
//! 4. a line scan for links at line starts the regex pass may have cut short.
//!
//! Both passes feed one [`SubscriptionBatch`], so the result is ordered and duplicate-free.

use crate::detect::{decode_blob, LINK_SCHEMES};
use crate::html;
use crate::model::{SubsError, SubscriptionBatch};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use tracing::debug;

const TRAILING_PUNCT: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

static SCHEME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    LINK_SCHEMES
        .iter()
        .map(|scheme| {
            Regex::new(&format!(r#"\b{}[^\s<>"'`]+"#, regex::escape(scheme)))
                .expect("scheme pattern")
        })
        .collect()
});

static TOKEN_DELIM: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[\s<>"'`]"#).expect("static regex"));

fn clean(candidate: &str) -> &str {
    candidate.trim_end_matches(TRAILING_PUNCT).trim()
}

/// Ordered, de-duplicated link strings found in `text`.
pub fn extract_links(text: &str) -> Vec<String> {
    collect(text).into_vec()
}

/// Like [`extract_links`], but an empty result is an error.
pub fn collect_links(text: &str) -> Result<SubscriptionBatch, SubsError> {
    let batch = collect(text);
    if batch.is_empty() {
        return Err(SubsError::Unreadable);
    }
    Ok(batch)
}

pub fn collect(text: &str) -> SubscriptionBatch {
    let mut work: Cow<'_, str> = Cow::Borrowed(text);
    if html::looks_like_html(&work) {
        work = Cow::Owned(html::strip(&work));
    }
    if let Some(decoded) = decode_blob(&work) {
        work = Cow::Owned(decoded);
    }

    let mut batch = SubscriptionBatch::new();
    regex_pass(&work, &mut batch);
    let from_regex = batch.len();
    line_scan(&work, &mut batch);
    debug!(
        regex = from_regex,
        line_scan = batch.len() - from_regex,
        "subscription links extracted"
    );
    batch
}

fn regex_pass(text: &str, batch: &mut SubscriptionBatch) {
    for pattern in SCHEME_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            batch.push(clean(m.as_str()));
        }
    }
}

fn line_scan(text: &str, batch: &mut SubscriptionBatch) {
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(scheme) = LINK_SCHEMES.iter().find(|s| line.starts_with(*s)) else {
            continue;
        };
        // vmess payloads have no inner delimiters besides whitespace
        let token = if *scheme == "vmess://" {
            line.split_whitespace().next().unwrap_or(line)
        } else {
            TOKEN_DELIM.split(line).next().unwrap_or(line)
        };
        let token = clean(token);
        if token.contains('@') || token.contains("://") {
            batch.push(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_input_order() {
        assert_eq!(
            extract_links("vless://A#a\nvless://B#b"),
            ["vless://A#a", "vless://B#b"]
        );
    }

    #[test]
    fn short_scheme_does_not_match_inside_longer_one() {
        let links = extract_links("vless://id@h:443#x");
        assert_eq!(links, ["vless://id@h:443#x"]);
    }

    #[test]
    fn trims_trailing_punctuation_and_quotes() {
        let links = extract_links(r#"Try "trojan://pw@h:443#t". Or (ss://YWVzOnB3@h:8388)!"#);
        assert_eq!(links, ["trojan://pw@h:443#t", "ss://YWVzOnB3@h:8388"]);
    }

    #[test]
    fn line_scan_keeps_vmess_with_quotes() {
        let links = extract_links("vmess://abc\"def tail");
        assert_eq!(links, ["vmess://abc", "vmess://abc\"def"]);
    }

    #[test]
    fn empty_result_is_unreadable() {
        let err = collect_links("nothing to see here").unwrap_err();
        assert!(matches!(err, SubsError::Unreadable));
        assert_eq!(err.kind(), "subscription_unreadable");
    }
}
