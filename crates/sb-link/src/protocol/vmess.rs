//! `vmess://base64(json)`
//!
//! The payload is the v2rayN JSON object (`add`, `port`, `id`, `aid`, `scy`, `net`, `type`,
//! `host`, `path`, `tls`, `sni`, `fp`, `pbk`, `sid`, `alpn`, `ps`). Generators disagree on
//! whether numbers are JSON numbers or strings, so both are accepted.

use super::Protocol;
use crate::b64;
use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{
    alpn_list, CanonicalLink, LinkParams, Network, SecurityParams, SecurityTier, Transport,
};
use crate::outbound::{finish, header};
use crate::uri::{is_truthy, RawLink};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vmess {
    pub uuid: String,
    pub alter_id: u32,
    /// `scy`; `auto` when absent.
    pub cipher: String,
}

/// String view of a JSON field; numbers are stringified, blanks are absent.
fn field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn decode_payload(raw: &RawLink<'_>) -> Result<Map<String, Value>, LinkError> {
    let text = b64::decode_utf8(raw.opaque)
        .ok_or_else(|| LinkError::malformed(Dialect::Vmess, "payload is not base64"))?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(_) => Err(LinkError::malformed(Dialect::Vmess, "payload is not a JSON object")),
        Err(e) => Err(LinkError::malformed(Dialect::Vmess, format!("payload JSON: {e}"))),
    }
}

impl Protocol for Vmess {
    const DIALECT: Dialect = Dialect::Vmess;

    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError> {
        let obj = decode_payload(raw)?;
        let server =
            field(&obj, "add").ok_or_else(|| LinkError::malformed(Self::DIALECT, "missing `add`"))?;
        let uuid =
            field(&obj, "id").ok_or_else(|| LinkError::malformed(Self::DIALECT, "missing `id`"))?;
        let port = field(&obj, "port")
            .and_then(|p| p.parse::<u16>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(Self::DIALECT.default_port());

        let network = field(&obj, "net")
            .map(|n| Network::from_param(&n))
            .unwrap_or_default();
        let path = field(&obj, "path");
        let transport = Transport {
            network,
            service_name: field(&obj, "serviceName")
                .or_else(|| (network == Network::Grpc).then(|| path.clone()).flatten()),
            path,
            host: field(&obj, "host"),
            header_type: field(&obj, "type").filter(|t| t != "none"),
        };

        let security = SecurityParams {
            tier: field(&obj, "tls")
                .map(|t| SecurityTier::from_param(&t))
                .unwrap_or_default(),
            sni: field(&obj, "sni"),
            fingerprint: field(&obj, "fp"),
            alpn: alpn_list(field(&obj, "alpn").as_deref()),
            insecure: field(&obj, "allowInsecure").is_some_and(|v| is_truthy(&v)),
            public_key: field(&obj, "pbk"),
            short_id: field(&obj, "sid"),
        }
        .resolve();

        Ok(CanonicalLink {
            tag: field(&obj, "ps").unwrap_or_else(|| format!("vmess-{server}")),
            server,
            port,
            transport,
            security,
            params: LinkParams::Vmess(Self {
                uuid,
                alter_id: field(&obj, "aid").and_then(|a| a.parse().ok()).unwrap_or(0),
                cipher: field(&obj, "scy")
                    .or_else(|| field(&obj, "security"))
                    .unwrap_or_else(|| "auto".into()),
            }),
        })
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError> {
        let mut obj = header("vmess", link);
        obj.insert("uuid".into(), json!(self.uuid));
        if self.cipher != "auto" {
            obj.insert("security".into(), json!(self.cipher));
        }
        if self.alter_id > 0 {
            obj.insert("alter_id".into(), json!(self.alter_id));
        }
        Ok(finish(obj, link))
    }

    fn share_link(&self, link: &CanonicalLink) -> String {
        let t = &link.transport;
        let s = &link.security;
        let reality = s.reality.as_ref();
        let tls = match s.tier {
            SecurityTier::None => "",
            SecurityTier::Tls => "tls",
            SecurityTier::Reality => "reality",
        };
        let payload = json!({
            "v": "2",
            "ps": link.tag,
            "add": link.server,
            "port": link.port.to_string(),
            "id": self.uuid,
            "aid": self.alter_id.to_string(),
            "scy": self.cipher,
            "net": t.network.as_str(),
            "type": t.header_type.as_deref().unwrap_or("none"),
            "host": t.host.as_deref().unwrap_or_default(),
            "path": t.path.as_deref().or(t.service_name.as_deref()).unwrap_or_default(),
            "tls": tls,
            "sni": s.sni.as_deref().unwrap_or_default(),
            "fp": s.fingerprint.as_deref().unwrap_or_default(),
            "pbk": reality.and_then(|r| r.public_key.as_deref()).unwrap_or_default(),
            "sid": reality.and_then(|r| r.short_id.as_deref()).unwrap_or_default(),
            "alpn": s.alpn.join(","),
        });
        format!("vmess://{}", STANDARD.encode(payload.to_string()))
    }
}
