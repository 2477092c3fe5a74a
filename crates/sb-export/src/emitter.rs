//! Emitter capability and the single / batch conversion drivers.
//!
//! Single-link conversion is strict: a parse failure or an unsupported dialect is returned
//! as is. Batch conversion skips such elements with a warning and only fails when nothing
//! survives.

use crate::error::ExportError;
use crate::format::TargetFormat;
use sb_link::{CanonicalLink, LinkError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Maps canonical links to one format's config tree.
pub trait Emitter {
    fn format(&self) -> TargetFormat;

    /// Per-link tree, `Ok(None)` when the dialect has no mapping in this format.
    fn outbound(&self, link: &CanonicalLink) -> Result<Option<Value>, LinkError>;

    /// Wrap converted entries (never empty) into the complete document.
    fn assemble(&self, entries: Vec<Value>) -> Value;

    /// Names the assembled document defines itself. Link tags never take one of them.
    fn reserved_tags(&self) -> &'static [&'static str] {
        &[]
    }
}

/// A batch element that did not make it into the output.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedLink {
    pub link: String,
    pub kind: &'static str,
    pub detail: String,
}

/// Config tree plus its rendered text.
#[derive(Debug, Clone)]
pub struct EmittedConfig {
    pub format: TargetFormat,
    pub tree: Value,
    pub text: String,
    pub converted: usize,
    pub skipped: Vec<SkippedLink>,
}

impl EmittedConfig {
    fn new(format: TargetFormat, tree: Value, converted: usize, skipped: Vec<SkippedLink>) -> Result<Self, ExportError> {
        let text = render(format, &tree)?;
        Ok(Self {
            format,
            tree,
            text,
            converted,
            skipped,
        })
    }
}

/// JSON with two-space indentation for sing-box / Xray, block YAML for Clash.
/// Key order follows insertion order.
pub fn render(format: TargetFormat, tree: &Value) -> Result<String, ExportError> {
    let rendered = match format {
        TargetFormat::SingBox | TargetFormat::Xray => {
            serde_json::to_string_pretty(tree).map_err(|e| e.to_string())
        }
        TargetFormat::Clash => serde_yaml::to_string(tree).map_err(|e| e.to_string()),
    };
    rendered.map_err(|message| ExportError::Render { format, message })
}

/// Convert one already-parsed link.
pub fn emit_link<E: Emitter>(emitter: &E, link: &CanonicalLink) -> Result<EmittedConfig, ExportError> {
    let format = emitter.format();
    let tag = unique_tag(&mut reserved(emitter), &link.tag);
    let renamed;
    let link = if tag == link.tag {
        link
    } else {
        debug!(%format, from = %link.tag, to = %tag, "tag collides with a reserved name");
        renamed = CanonicalLink {
            tag,
            ..link.clone()
        };
        &renamed
    };
    let entry = emitter
        .outbound(link)?
        .ok_or(ExportError::UnsupportedDialect {
            dialect: link.dialect(),
            format,
        })?;
    EmittedConfig::new(format, emitter.assemble(vec![entry]), 1, Vec::new())
}

/// Parse and convert one link.
pub fn convert_one<E: Emitter>(emitter: &E, text: &str) -> Result<EmittedConfig, ExportError> {
    let link = CanonicalLink::parse(text)?;
    emit_link(emitter, &link)
}

/// Parse and convert a batch, in order. Failing or unsupported links are skipped.
/// Repeated display tags get a `-2`, `-3`... suffix so group references stay unambiguous.
pub fn convert_many<E: Emitter, S: AsRef<str>>(emitter: &E, links: &[S]) -> Result<EmittedConfig, ExportError> {
    let format = emitter.format();
    let mut entries = Vec::with_capacity(links.len());
    let mut skipped = Vec::new();
    let mut tags = reserved(emitter);

    for text in links {
        let text = text.as_ref();
        let result = CanonicalLink::parse(text)
            .map_err(ExportError::from)
            .and_then(|mut link| {
                let dialect = link.dialect();
                link.tag = unique_tag(&mut tags, &link.tag);
                emitter
                    .outbound(&link)?
                    .ok_or(ExportError::UnsupportedDialect { dialect, format })
            });
        match result {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(%format, kind = e.kind(), error = %e, "skipping link");
                skipped.push(SkippedLink {
                    link: text.to_string(),
                    kind: e.kind(),
                    detail: e.to_string(),
                });
            }
        }
    }

    if entries.is_empty() {
        return Err(ExportError::NoConvertibleLinks {
            format,
            total: links.len(),
        });
    }
    debug!(%format, converted = entries.len(), skipped = skipped.len(), "batch converted");
    let converted = entries.len();
    EmittedConfig::new(format, emitter.assemble(entries), converted, skipped)
}

fn reserved<E: Emitter>(emitter: &E) -> HashMap<String, usize> {
    emitter
        .reserved_tags()
        .iter()
        .map(|t| (t.to_string(), 1))
        .collect()
}

fn unique_tag(seen: &mut HashMap<String, usize>, tag: &str) -> String {
    let count = seen.entry(tag.to_string()).or_insert(0);
    *count += 1;
    if *count == 1 {
        return tag.to_string();
    }
    let mut n = *count;
    loop {
        let candidate = format!("{tag}-{n}");
        if !seen.contains_key(&candidate) {
            seen.insert(candidate.clone(), 1);
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_made_unique() {
        let mut seen = HashMap::new();
        assert_eq!(unique_tag(&mut seen, "a"), "a");
        assert_eq!(unique_tag(&mut seen, "a"), "a-2");
        assert_eq!(unique_tag(&mut seen, "a-3"), "a-3");
        assert_eq!(unique_tag(&mut seen, "a"), "a-4");
    }

    #[test]
    fn reserved_names_are_never_taken() {
        let mut seen: HashMap<String, usize> = [("direct".to_string(), 1)].into_iter().collect();
        assert_eq!(unique_tag(&mut seen, "direct"), "direct-2");
        assert_eq!(unique_tag(&mut seen, "direct"), "direct-3");
    }
}
