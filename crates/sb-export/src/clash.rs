//! Clash (mihomo) emitter.
//!
//! Only VLESS, VMess, Trojan, Shadowsocks, SOCKS5 and HTTP(S) have a proxy mapping; QUIC
//! dialects (Hysteria, Hysteria2, TUIC) and WireGuard are skipped.

use crate::emitter::Emitter;
use crate::format::TargetFormat;
use sb_link::{CanonicalLink, LinkError, LinkParams, Network, SecurityTier};
use serde::Serialize;
use serde_json::{json, Map, Value};

pub const SELECT_GROUP: &str = "🚀 Proxy";
pub const AUTO_GROUP: &str = "🎯 Auto";
const HEALTH_CHECK_URL: &str = "http://www.gstatic.com/generate_204";
const HEALTH_CHECK_INTERVAL: u32 = 300;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClashEmitter;

#[derive(Debug, Serialize)]
struct ClashProxy {
    name: String,
    #[serde(rename = "type")]
    kind: &'static str,
    server: String,
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<String>,
    #[serde(rename = "alterId", skip_serializing_if = "Option::is_none")]
    alter_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cipher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    udp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    servername: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alpn: Option<Vec<String>>,
    #[serde(rename = "skip-cert-verify", skip_serializing_if = "Option::is_none")]
    skip_cert_verify: Option<bool>,
    #[serde(rename = "client-fingerprint", skip_serializing_if = "Option::is_none")]
    client_fingerprint: Option<String>,
    #[serde(rename = "reality-opts", skip_serializing_if = "Option::is_none")]
    reality_opts: Option<Value>,
    #[serde(rename = "ws-opts", skip_serializing_if = "Option::is_none")]
    ws_opts: Option<Value>,
    #[serde(rename = "grpc-opts", skip_serializing_if = "Option::is_none")]
    grpc_opts: Option<Value>,
    #[serde(rename = "h2-opts", skip_serializing_if = "Option::is_none")]
    h2_opts: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plugin: Option<String>,
    #[serde(rename = "plugin-opts", skip_serializing_if = "Option::is_none")]
    plugin_opts: Option<Value>,
}

impl ClashProxy {
    fn new(kind: &'static str, link: &CanonicalLink) -> Self {
        Self {
            name: link.tag.clone(),
            kind,
            server: link.server.clone(),
            port: link.port,
            uuid: None,
            alter_id: None,
            cipher: None,
            username: None,
            password: None,
            flow: None,
            udp: None,
            network: None,
            tls: None,
            servername: None,
            sni: None,
            alpn: None,
            skip_cert_verify: None,
            client_fingerprint: None,
            reality_opts: None,
            ws_opts: None,
            grpc_opts: None,
            h2_opts: None,
            plugin: None,
            plugin_opts: None,
        }
    }

    /// Transport options shared by VLESS / VMess / Trojan.
    fn with_transport(mut self, link: &CanonicalLink) -> Self {
        let t = &link.transport;
        match t.network {
            Network::Tcp => {}
            Network::Ws | Network::HttpUpgrade => {
                self.network = Some("ws");
                let mut opts = Map::new();
                if let Some(path) = &t.path {
                    opts.insert("path".into(), json!(path));
                }
                if let Some(host) = &t.host {
                    opts.insert("headers".into(), json!({ "Host": host }));
                }
                if t.network == Network::HttpUpgrade {
                    opts.insert("v2ray-http-upgrade".into(), json!(true));
                }
                self.ws_opts = (!opts.is_empty()).then_some(Value::Object(opts));
            }
            Network::Grpc => {
                self.network = Some("grpc");
                self.grpc_opts = t
                    .service_name
                    .as_ref()
                    .map(|s| json!({ "grpc-service-name": s }));
            }
            Network::Http => {
                self.network = Some("h2");
                let mut opts = Map::new();
                if let Some(path) = &t.path {
                    opts.insert("path".into(), json!(path));
                }
                if let Some(host) = &t.host {
                    opts.insert("host".into(), json!([host]));
                }
                self.h2_opts = (!opts.is_empty()).then_some(Value::Object(opts));
            }
            Network::Quic => self.network = Some("quic"),
        }
        self
    }

    /// TLS / Reality options. Trojan names the SNI `sni`, the V2Ray family `servername`.
    fn with_security(mut self, link: &CanonicalLink, sni_key_is_sni: bool) -> Self {
        let s = &link.security;
        if !s.is_tls() {
            return self;
        }
        self.tls = Some(true);
        if sni_key_is_sni {
            self.sni = s.sni.clone();
        } else {
            self.servername = s.sni.clone();
        }
        self.alpn = (!s.alpn.is_empty()).then(|| s.alpn.clone());
        self.skip_cert_verify = s.insecure.then_some(true);
        self.client_fingerprint = s.fingerprint.clone();
        if s.tier == SecurityTier::Reality {
            if let Some(r) = &s.reality {
                let mut opts = Map::new();
                if let Some(pk) = &r.public_key {
                    opts.insert("public-key".into(), json!(pk));
                }
                if let Some(sid) = &r.short_id {
                    opts.insert("short-id".into(), json!(sid));
                }
                self.reality_opts = Some(Value::Object(opts));
            }
        }
        self
    }
}

/// `obfs-local;obfs=http;obfs-host=x` style plugin options as a Clash map.
fn plugin_opts(plugin: &str, opts: Option<&str>) -> (String, Option<Value>) {
    let mut map = Map::new();
    for pair in opts.unwrap_or_default().split(';').filter(|p| !p.is_empty()) {
        let (k, v) = pair.split_once('=').unwrap_or((pair, "true"));
        map.insert(k.trim().to_string(), json!(v.trim()));
    }
    match plugin {
        "obfs-local" | "simple-obfs" | "obfs" => {
            let mut obfs = Map::new();
            if let Some(mode) = map.get("obfs") {
                obfs.insert("mode".into(), mode.clone());
            }
            if let Some(host) = map.get("obfs-host") {
                obfs.insert("host".into(), host.clone());
            }
            ("obfs".to_string(), Some(Value::Object(obfs)))
        }
        other => (other.to_string(), (!map.is_empty()).then_some(Value::Object(map))),
    }
}

fn proxy(link: &CanonicalLink) -> Option<ClashProxy> {
    let proxy = match &link.params {
        LinkParams::Vless(p) => {
            let mut proxy = ClashProxy::new("vless", link)
                .with_transport(link)
                .with_security(link, false);
            proxy.uuid = Some(p.uuid.clone());
            proxy.flow = p.flow.clone();
            proxy.udp = Some(true);
            proxy
        }
        LinkParams::Vmess(p) => {
            let mut proxy = ClashProxy::new("vmess", link)
                .with_transport(link)
                .with_security(link, false);
            proxy.uuid = Some(p.uuid.clone());
            proxy.alter_id = Some(p.alter_id);
            proxy.cipher = Some(p.cipher.clone());
            proxy.udp = Some(true);
            proxy
        }
        LinkParams::Trojan(p) => {
            let mut proxy = ClashProxy::new("trojan", link)
                .with_transport(link)
                .with_security(link, true);
            proxy.password = Some(p.password.clone());
            proxy.udp = Some(true);
            proxy
        }
        LinkParams::Shadowsocks(p) => {
            let mut proxy = ClashProxy::new("ss", link);
            proxy.cipher = Some(p.method.clone());
            proxy.password = Some(p.password.clone());
            proxy.udp = Some(true);
            if let Some(plugin) = &p.plugin {
                let (name, opts) = plugin_opts(plugin, p.plugin_opts.as_deref());
                proxy.plugin = Some(name);
                proxy.plugin_opts = opts;
            }
            proxy
        }
        LinkParams::Socks5(p) => {
            let mut proxy = ClashProxy::new("socks5", link);
            proxy.username = p.username.clone();
            proxy.password = p.password.clone();
            proxy
        }
        LinkParams::Http(p) => {
            let mut proxy = ClashProxy::new("http", link);
            proxy.username = p.username.clone();
            proxy.password = p.password.clone();
            proxy.tls = link.security.is_tls().then_some(true);
            proxy
        }
        LinkParams::Hysteria2(_)
        | LinkParams::Hysteria(_)
        | LinkParams::Tuic(_)
        | LinkParams::WireGuard(_) => return None,
    };
    Some(proxy)
}

impl Emitter for ClashEmitter {
    fn format(&self) -> TargetFormat {
        TargetFormat::Clash
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Option<Value>, LinkError> {
        proxy(link)
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| LinkError::malformed(link.dialect(), e.to_string()))
    }

    fn reserved_tags(&self) -> &'static [&'static str] {
        &["DIRECT", "REJECT", SELECT_GROUP, AUTO_GROUP]
    }

    fn assemble(&self, proxies: Vec<Value>) -> Value {
        let names: Vec<Value> = proxies.iter().map(|p| p["name"].clone()).collect();
        let mut select = names.clone();
        select.push(json!("DIRECT"));
        json!({
            "port": 7890,
            "socks-port": 7891,
            "allow-lan": false,
            "mode": "rule",
            "log-level": "info",
            "external-controller": "127.0.0.1:9090",
            "proxies": proxies,
            "proxy-groups": [
                {
                    "name": SELECT_GROUP,
                    "type": "select",
                    "proxies": select,
                },
                {
                    "name": AUTO_GROUP,
                    "type": "url-test",
                    "proxies": names,
                    "url": HEALTH_CHECK_URL,
                    "interval": HEALTH_CHECK_INTERVAL,
                },
            ],
            "rules": [
                "DOMAIN-SUFFIX,local,DIRECT",
                "IP-CIDR,127.0.0.0/8,DIRECT",
                "IP-CIDR,10.0.0.0/8,DIRECT",
                "IP-CIDR,172.16.0.0/12,DIRECT",
                "IP-CIDR,192.168.0.0/16,DIRECT",
                "GEOIP,CN,DIRECT",
                format!("MATCH,{SELECT_GROUP}"),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{convert_one, emit_link};
    use crate::error::ExportError;

    #[test]
    fn vless_reality_proxy() {
        let cfg = convert_one(
            &ClashEmitter,
            "vless://id@r.example:443?security=reality&sni=www.apple.com&fp=chrome&pbk=PUB&sid=0a&type=grpc&serviceName=svc#R",
        )
        .unwrap();
        let p = &cfg.tree["proxies"][0];
        assert_eq!(p["name"], "R");
        assert_eq!(p["type"], "vless");
        assert_eq!(p["servername"], "www.apple.com");
        assert_eq!(p["client-fingerprint"], "chrome");
        assert_eq!(p["reality-opts"]["public-key"], "PUB");
        assert_eq!(p["grpc-opts"]["grpc-service-name"], "svc");
        assert_eq!(p["network"], "grpc");
    }

    #[test]
    fn shadowsocks_obfs_plugin() {
        let link = sb_link::parse_link(
            "ss://aes-128-gcm:pw@s.example:8388?plugin=obfs-local%3Bobfs%3Dhttp%3Bobfs-host%3Dcdn.example#S",
        )
        .unwrap();
        let cfg = emit_link(&ClashEmitter, &link).unwrap();
        let p = &cfg.tree["proxies"][0];
        assert_eq!(p["type"], "ss");
        assert_eq!(p["cipher"], "aes-128-gcm");
        assert_eq!(p["plugin"], "obfs");
        assert_eq!(p["plugin-opts"]["mode"], "http");
        assert_eq!(p["plugin-opts"]["host"], "cdn.example");
    }

    #[test]
    fn quic_dialects_are_unsupported() {
        let err = convert_one(&ClashEmitter, "hy2://pw@h:443").unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedDialect { .. }));
        assert_eq!(err.kind(), "unsupported_dialect");
    }

    #[test]
    fn groups_and_rules() {
        let cfg = convert_one(&ClashEmitter, "socks5://h:1080#S").unwrap();
        assert_eq!(cfg.tree["proxy-groups"][0]["proxies"], json!(["S", "DIRECT"]));
        assert_eq!(cfg.tree["proxy-groups"][1]["type"], "url-test");
        assert_eq!(cfg.tree["proxy-groups"][1]["interval"], 300);
        assert_eq!(cfg.tree["rules"][6], "MATCH,🚀 Proxy");
        // block YAML, unicode kept as is, insertion order
        assert!(cfg.text.starts_with("port: 7890\nsocks-port: 7891\n"));
        assert!(cfg.text.contains("🚀 Proxy"));
        assert!(!cfg.text.contains("\\U"));
    }
}
