//! Xray-core emitter: `vnext` for VLESS / VMess, `servers` for Trojan / Shadowsocks.
//! Xray 输出。

use crate::emitter::Emitter;
use crate::format::TargetFormat;
use sb_link::{CanonicalLink, LinkError, LinkParams, Network, SecurityTier};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct XrayEmitter;

fn put<T: Into<Value>>(obj: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        obj.insert(key.to_string(), v.into());
    }
}

fn stream_settings(link: &CanonicalLink) -> Value {
    let t = &link.transport;
    let s = &link.security;
    let mut stream = Map::new();
    stream.insert("network".into(), json!(t.network.as_str()));

    let security = match s.tier {
        SecurityTier::None => "none",
        SecurityTier::Tls => "tls",
        SecurityTier::Reality => "reality",
    };
    stream.insert("security".into(), json!(security));

    match s.tier {
        SecurityTier::None => {}
        SecurityTier::Tls => {
            let mut tls = Map::new();
            put(&mut tls, "serverName", s.sni.clone());
            put(&mut tls, "fingerprint", s.fingerprint.clone());
            if !s.alpn.is_empty() {
                tls.insert("alpn".into(), json!(s.alpn));
            }
            if s.insecure {
                tls.insert("allowInsecure".into(), json!(true));
            }
            stream.insert("tlsSettings".into(), Value::Object(tls));
        }
        SecurityTier::Reality => {
            let mut reality = Map::new();
            put(&mut reality, "serverName", s.sni.clone());
            put(&mut reality, "fingerprint", s.fingerprint.clone());
            if let Some(r) = &s.reality {
                put(&mut reality, "publicKey", r.public_key.clone());
                put(&mut reality, "shortId", r.short_id.clone());
            }
            stream.insert("realitySettings".into(), Value::Object(reality));
        }
    }

    match t.network {
        Network::Ws => {
            let mut ws = Map::new();
            put(&mut ws, "path", t.path.clone());
            if let Some(host) = &t.host {
                ws.insert("headers".into(), json!({ "Host": host }));
            }
            stream.insert("wsSettings".into(), Value::Object(ws));
        }
        Network::Grpc => {
            let mut grpc = Map::new();
            put(&mut grpc, "serviceName", t.service_name.clone());
            stream.insert("grpcSettings".into(), Value::Object(grpc));
        }
        Network::HttpUpgrade => {
            let mut hu = Map::new();
            put(&mut hu, "path", t.path.clone());
            put(&mut hu, "host", t.host.clone());
            stream.insert("httpupgradeSettings".into(), Value::Object(hu));
        }
        Network::Http => {
            let mut http = Map::new();
            put(&mut http, "path", t.path.clone());
            if let Some(host) = &t.host {
                http.insert("host".into(), json!([host]));
            }
            stream.insert("httpSettings".into(), Value::Object(http));
        }
        Network::Tcp => {
            if let Some(header) = &t.header_type {
                stream.insert("tcpSettings".into(), json!({ "header": { "type": header } }));
            }
        }
        Network::Quic => {}
    }
    Value::Object(stream)
}

fn vnext(link: &CanonicalLink, user: Value) -> Value {
    json!({
        "vnext": [{
            "address": link.server,
            "port": link.port,
            "users": [user],
        }],
    })
}

impl Emitter for XrayEmitter {
    fn format(&self) -> TargetFormat {
        TargetFormat::Xray
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Option<Value>, LinkError> {
        let (protocol, settings) = match &link.params {
            LinkParams::Vless(p) => {
                let mut user = Map::new();
                user.insert("id".into(), json!(p.uuid));
                user.insert("encryption".into(), json!(p.encryption));
                put(&mut user, "flow", p.flow.clone());
                ("vless", vnext(link, Value::Object(user)))
            }
            LinkParams::Vmess(p) => {
                let user = json!({
                    "id": p.uuid,
                    "alterId": p.alter_id,
                    "security": p.cipher,
                });
                ("vmess", vnext(link, user))
            }
            LinkParams::Trojan(p) => (
                "trojan",
                json!({
                    "servers": [{
                        "address": link.server,
                        "port": link.port,
                        "password": p.password,
                    }],
                }),
            ),
            LinkParams::Shadowsocks(p) => (
                "shadowsocks",
                json!({
                    "servers": [{
                        "address": link.server,
                        "port": link.port,
                        "method": p.method,
                        "password": p.password,
                    }],
                }),
            ),
            _ => return Ok(None),
        };

        let mut outbound = Map::new();
        outbound.insert("tag".into(), json!(link.tag));
        outbound.insert("protocol".into(), json!(protocol));
        outbound.insert("settings".into(), settings);
        // plain SS has no stream layer worth emitting
        if !matches!(link.params, LinkParams::Shadowsocks(_)) {
            outbound.insert("streamSettings".into(), stream_settings(link));
        }
        Ok(Some(Value::Object(outbound)))
    }

    fn reserved_tags(&self) -> &'static [&'static str] {
        &["direct", "block"]
    }

    fn assemble(&self, mut outbounds: Vec<Value>) -> Value {
        outbounds.push(json!({ "tag": "direct", "protocol": "freedom" }));
        outbounds.push(json!({ "tag": "block", "protocol": "blackhole" }));
        json!({
            "log": { "loglevel": "warning" },
            "outbounds": outbounds,
            "routing": {
                "domainStrategy": "IPIfNonMatch",
                "rules": [
                    { "type": "field", "ip": ["geoip:private"], "outboundTag": "direct" },
                    { "type": "field", "domain": ["geosite:private"], "outboundTag": "direct" },
                ],
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::convert_one;
    use crate::error::ExportError;

    #[test]
    fn vless_reality_stream() {
        let cfg = convert_one(
            &XrayEmitter,
            "vless://id@r.example:443?security=reality&sni=www.apple.com&fp=chrome&pbk=PUB&sid=0a&flow=xtls-rprx-vision#R",
        )
        .unwrap();
        let ob = &cfg.tree["outbounds"][0];
        assert_eq!(ob["protocol"], "vless");
        assert_eq!(ob["settings"]["vnext"][0]["users"][0]["flow"], "xtls-rprx-vision");
        let stream = &ob["streamSettings"];
        assert_eq!(stream["security"], "reality");
        assert_eq!(stream["realitySettings"]["publicKey"], "PUB");
        assert_eq!(stream["realitySettings"]["serverName"], "www.apple.com");
        assert!(stream.get("tlsSettings").is_none());
    }

    #[test]
    fn vmess_ws_tls() {
        use base64::Engine as _;
        let body = json!({
            "v": "2", "ps": "V", "add": "v.example", "port": "443", "id": "uuid",
            "aid": "0", "net": "ws", "path": "/ws", "host": "cdn.example", "tls": "tls",
        });
        let link = format!(
            "vmess://{}",
            base64::engine::general_purpose::STANDARD.encode(body.to_string())
        );
        let cfg = convert_one(&XrayEmitter, &link).unwrap();
        let ob = &cfg.tree["outbounds"][0];
        assert_eq!(ob["settings"]["vnext"][0]["users"][0]["security"], "auto");
        assert_eq!(ob["streamSettings"]["wsSettings"]["headers"]["Host"], "cdn.example");
        assert_eq!(ob["streamSettings"]["security"], "tls");
    }

    #[test]
    fn routing_and_fallback_outbounds() {
        let cfg = convert_one(&XrayEmitter, "trojan://pw@t.example:443#T").unwrap();
        let outbounds = cfg.tree["outbounds"].as_array().unwrap();
        assert_eq!(outbounds.len(), 3);
        assert_eq!(outbounds[1]["protocol"], "freedom");
        assert_eq!(outbounds[2]["protocol"], "blackhole");
        assert_eq!(cfg.tree["routing"]["domainStrategy"], "IPIfNonMatch");
        assert_eq!(cfg.tree["log"]["loglevel"], "warning");
    }

    #[test]
    fn socks_is_unsupported() {
        let err = convert_one(&XrayEmitter, "socks5://h:1080").unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedDialect { .. }));
    }
}
