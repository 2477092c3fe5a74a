//! Shared sing-box outbound pieces: header, `tls` and `transport` objects.

use crate::model::{CanonicalLink, Network, Security, SecurityTier, Transport};
use serde_json::{json, Map, Value};

/// `{type, tag, server, server_port}`, the prefix every outbound starts with.
pub fn header(kind: &str, link: &CanonicalLink) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("type".into(), json!(kind));
    obj.insert("tag".into(), json!(link.tag));
    obj.insert("server".into(), json!(link.server));
    obj.insert("server_port".into(), json!(link.port));
    obj
}

/// Insert `key` only when the value is present.
pub fn put_opt<T: Into<Value>>(obj: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        obj.insert(key.into(), v.into());
    }
}

/// `tls` object, or `None` when the tier is `none`.
pub fn tls(link: &CanonicalLink) -> Option<Value> {
    let sec: &Security = &link.security;
    if !sec.is_tls() {
        return None;
    }
    let mut tls = Map::new();
    tls.insert("enabled".into(), json!(true));
    tls.insert("server_name".into(), json!(link.server_name()));
    if sec.insecure {
        tls.insert("insecure".into(), json!(true));
    }
    if !sec.alpn.is_empty() {
        tls.insert("alpn".into(), json!(sec.alpn));
    }
    if let Some(fp) = &sec.fingerprint {
        tls.insert("utls".into(), json!({ "enabled": true, "fingerprint": fp }));
    }
    if sec.tier == SecurityTier::Reality {
        let mut reality = Map::new();
        reality.insert("enabled".into(), json!(true));
        if let Some(r) = &sec.reality {
            put_opt(&mut reality, "public_key", r.public_key.clone());
            put_opt(&mut reality, "short_id", r.short_id.clone());
        }
        tls.insert("reality".into(), Value::Object(reality));
    }
    Some(Value::Object(tls))
}

/// `transport` object, or `None` for plain TCP.
pub fn transport(t: &Transport) -> Option<Value> {
    let mut obj = Map::new();
    obj.insert("type".into(), json!(t.network.as_str()));
    match t.network {
        Network::Tcp => return None,
        Network::Ws => {
            put_opt(&mut obj, "path", t.path.clone());
            if let Some(host) = &t.host {
                obj.insert("headers".into(), json!({ "Host": host }));
            }
        }
        Network::Grpc => {
            put_opt(&mut obj, "service_name", t.service_name.clone());
        }
        Network::Http => {
            put_opt(&mut obj, "path", t.path.clone());
            if let Some(host) = &t.host {
                obj.insert("host".into(), json!([host]));
            }
        }
        Network::HttpUpgrade => {
            put_opt(&mut obj, "path", t.path.clone());
            put_opt(&mut obj, "host", t.host.clone());
        }
        Network::Quic => {}
    }
    Some(Value::Object(obj))
}

/// Attach `tls` and `transport` when present and wrap into a JSON value.
pub fn finish(mut obj: Map<String, Value>, link: &CanonicalLink) -> Value {
    if let Some(t) = transport(&link.transport) {
        obj.insert("transport".into(), t);
    }
    if let Some(t) = tls(link) {
        obj.insert("tls".into(), t);
    }
    Value::Object(obj)
}
