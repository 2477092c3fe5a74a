//! `wg://[private_key@]host[:port]?public_key=..&private_key=..&psk=..&allowed_ips=..&mtu=..#tag`
//!
//! Parsing is lenient: every key is optional at parse time. The peer public key is only
//! demanded when an outbound is built.

use super::{format_link, Protocol};
use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{CanonicalLink, LinkParams, Security, Transport};
use crate::outbound::{finish, header, put_opt};
use crate::uri::{split_host_port, Query, RawLink};
use serde::Serialize;
use serde_json::{json, Value};

const DEFAULT_LOCAL_ADDRESS: &str = "10.0.0.2/32";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WireGuard {
    pub private_key: Option<String>,
    pub public_key: Option<String>,
    pub pre_shared_key: Option<String>,
    pub local_address: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
}

/// Keys are base64; an unescaped `+` arrives as a space after form decoding.
fn key(q: &Query, aliases: &[&str]) -> Option<String> {
    q.get_any(aliases).map(|k| k.replace(' ', "+"))
}

impl Protocol for WireGuard {
    const DIALECT: Dialect = Dialect::WireGuard;

    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError> {
        let (cred, host_port) = raw.credential();
        let (server, port) = split_host_port(host_port, Self::DIALECT.default_port());
        let q = &raw.query;
        let mut local_address = q.list("allowed_ips");
        if local_address.is_empty() {
            local_address = q.list("address");
        }
        if local_address.is_empty() {
            local_address.push(DEFAULT_LOCAL_ADDRESS.to_string());
        }
        Ok(CanonicalLink {
            tag: raw.tag(Self::DIALECT, &server),
            server,
            port,
            transport: Transport::default(),
            security: Security::none(),
            params: LinkParams::WireGuard(Self {
                private_key: key(q, &["private_key", "privkey", "privatekey"]).or(cred),
                public_key: key(q, &["public_key", "pubkey", "publickey"]),
                pre_shared_key: key(q, &["preshared_key", "psk", "presharedkey"]),
                local_address,
                dns: q.list("dns"),
                mtu: q.number("mtu"),
            }),
        })
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError> {
        let public_key = self
            .public_key
            .as_deref()
            .ok_or_else(|| LinkError::malformed(Self::DIALECT, "missing peer public_key"))?;
        let mut obj = header("wireguard", link);
        obj.insert("local_address".into(), json!(self.local_address));
        obj.insert(
            "private_key".into(),
            json!(self.private_key.as_deref().unwrap_or_default()),
        );
        obj.insert("peer_public_key".into(), json!(public_key));
        put_opt(&mut obj, "pre_shared_key", self.pre_shared_key.clone());
        put_opt(&mut obj, "mtu", self.mtu);
        Ok(finish(obj, link))
    }

    fn share_link(&self, link: &CanonicalLink) -> String {
        let local = (self.local_address.as_slice() != [DEFAULT_LOCAL_ADDRESS])
            .then(|| self.local_address.join(","));
        format_link(
            "wg",
            None,
            link,
            &[
                ("private_key", self.private_key.clone()),
                ("public_key", self.public_key.clone()),
                ("preshared_key", self.pre_shared_key.clone()),
                ("allowed_ips", local),
                ("dns", (!self.dns.is_empty()).then(|| self.dns.join(","))),
                ("mtu", self.mtu.map(|m| m.to_string())),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse_link, LinkError};

    #[test]
    fn full_link_to_outbound() {
        let link = parse_link(
            "wg://w.example:51821?publickey=PUB%2Bkey%3D&privkey=PRIV+key=&psk=PSK&allowed_ips=10.8.0.2/32,fd00::2/128&mtu=1280#WG",
        )
        .unwrap();
        let out = link.to_singbox_outbound().unwrap();
        assert_eq!(out["type"], "wireguard");
        assert_eq!(out["server_port"], 51821);
        assert_eq!(out["peer_public_key"], "PUB+key=");
        assert_eq!(out["private_key"], "PRIV+key=");
        assert_eq!(out["pre_shared_key"], "PSK");
        assert_eq!(out["local_address"][1], "fd00::2/128");
        assert_eq!(out["mtu"], 1280);
    }

    #[test]
    fn bare_host_parses_but_needs_public_key_for_outbound() {
        let link = parse_link("wg://host").unwrap();
        assert_eq!(link.port, 51820);
        assert!(matches!(
            link.to_singbox_outbound(),
            Err(LinkError::Malformed { .. })
        ));
    }
}
