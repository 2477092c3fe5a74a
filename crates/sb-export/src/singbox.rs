//! sing-box emitter. Every dialect maps; the per-link tree is the link's own outbound fragment.
//! sing-box 输出。

use crate::emitter::Emitter;
use crate::format::TargetFormat;
use sb_link::{CanonicalLink, LinkError};
use serde_json::{json, Value};

pub const MIXED_LISTEN: &str = "127.0.0.1";
pub const MIXED_PORT: u16 = 7890;
/// Selector tag used as the route target when several outbounds are present.
pub const SELECTOR_TAG: &str = "proxy";

#[derive(Debug, Clone, Copy, Default)]
pub struct SingBoxEmitter {
    /// Wrap outbounds in a runnable config (log, dns, inbounds, route).
    pub full_config: bool,
}

impl SingBoxEmitter {
    pub const fn outbounds_only() -> Self {
        Self { full_config: false }
    }

    pub const fn full() -> Self {
        Self { full_config: true }
    }
}

impl Emitter for SingBoxEmitter {
    fn format(&self) -> TargetFormat {
        TargetFormat::SingBox
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Option<Value>, LinkError> {
        link.to_singbox_outbound().map(Some)
    }

    fn reserved_tags(&self) -> &'static [&'static str] {
        &["direct", "block", SELECTOR_TAG]
    }

    fn assemble(&self, entries: Vec<Value>) -> Value {
        if !self.full_config {
            return json!({ "outbounds": entries });
        }
        full_config(entries)
    }
}

fn tag_of(outbound: &Value) -> String {
    outbound["tag"].as_str().unwrap_or_default().to_string()
}

fn full_config(mut outbounds: Vec<Value>) -> Value {
    let final_tag = if outbounds.len() == 1 {
        tag_of(&outbounds[0])
    } else {
        let tags: Vec<String> = outbounds.iter().map(tag_of).collect();
        outbounds.push(json!({
            "type": "selector",
            "tag": SELECTOR_TAG,
            "outbounds": tags,
            "default": tags.first(),
        }));
        SELECTOR_TAG.to_string()
    };
    outbounds.push(json!({ "type": "direct", "tag": "direct" }));
    outbounds.push(json!({ "type": "block", "tag": "block" }));

    json!({
        "log": {
            "level": "info",
            "timestamp": true,
        },
        "dns": {
            "servers": [
                {
                    "tag": "dns_proxy",
                    "address": "8.8.8.8",
                    "address_resolver": "dns_ip",
                },
                {
                    "tag": "dns_ip",
                    "address": "223.5.5.5",
                    "detour": "direct",
                },
            ],
        },
        "inbounds": [
            {
                "type": "mixed",
                "tag": "mixed-in",
                "listen": MIXED_LISTEN,
                "listen_port": MIXED_PORT,
            },
        ],
        "outbounds": outbounds,
        "route": {
            "rules": [
                { "ip_is_private": true, "outbound": "direct" },
            ],
            "final": final_tag,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::convert_one;

    #[test]
    fn outbounds_only_has_single_key() {
        let cfg = convert_one(&SingBoxEmitter::outbounds_only(), "trojan://pw@h:443#T").unwrap();
        let obj = cfg.tree.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), ["outbounds"]);
        assert_eq!(cfg.tree["outbounds"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn full_config_routes_to_the_single_outbound() {
        let cfg = convert_one(&SingBoxEmitter::full(), "trojan://pw@h:443#T").unwrap();
        for key in ["log", "dns", "inbounds", "outbounds", "route"] {
            assert!(cfg.tree.get(key).is_some(), "{key}");
        }
        assert_eq!(cfg.tree["route"]["final"], "T");
        assert_eq!(cfg.tree["inbounds"][0]["listen_port"], 7890);
        let tags: Vec<_> = cfg.tree["outbounds"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["tag"].as_str().unwrap())
            .collect();
        assert_eq!(tags, ["T", "direct", "block"]);
    }

    #[test]
    fn link_tag_cannot_shadow_direct() {
        let cfg = convert_one(&SingBoxEmitter::full(), "trojan://pw@t.example:443#direct").unwrap();
        assert_eq!(cfg.tree["route"]["final"], "direct-2");
        assert_eq!(cfg.tree["outbounds"][0]["tag"], "direct-2");
        assert_eq!(cfg.tree["outbounds"][1]["tag"], "direct");
    }

    #[test]
    fn json_is_two_space_indented() {
        let cfg = convert_one(&SingBoxEmitter::outbounds_only(), "socks5://h:1080#S").unwrap();
        assert!(cfg.text.starts_with("{\n  \"outbounds\": [\n    {"));
    }
}
