//! `hy2://[password@]host[:port]?sni=..&insecure=1&obfs=salamander&obfs-password=..#tag`

use super::{format_link, Protocol};
use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{CanonicalLink, LinkParams, SecurityParams, SecurityTier, Transport};
use crate::outbound::{finish, header, put_opt};
use crate::uri::{encode_component, split_host_port, RawLink};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Hysteria2 {
    pub password: Option<String>,
    pub obfs: Option<String>,
    pub obfs_password: Option<String>,
    pub up_mbps: Option<u32>,
    pub down_mbps: Option<u32>,
}

impl Protocol for Hysteria2 {
    const DIALECT: Dialect = Dialect::Hysteria2;

    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError> {
        let (password, host_port) = raw.credential();
        let (server, port) = split_host_port(host_port, Self::DIALECT.default_port());
        let q = &raw.query;
        // QUIC-based: TLS is always on
        let security = SecurityParams::from_query(q, SecurityTier::Tls)
            .with_tier(SecurityTier::Tls)
            .resolve();
        Ok(CanonicalLink {
            tag: raw.tag(Self::DIALECT, &server),
            server,
            port,
            transport: Transport::default(),
            security,
            params: LinkParams::Hysteria2(Self {
                password,
                obfs: q.owned("obfs"),
                obfs_password: q.owned("obfs-password"),
                up_mbps: q.number("up").or_else(|| q.number("upmbps")),
                down_mbps: q.number("down").or_else(|| q.number("downmbps")),
            }),
        })
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError> {
        let mut obj = header("hysteria2", link);
        put_opt(&mut obj, "password", self.password.clone());
        if let Some(kind) = &self.obfs {
            let mut obfs = json!({ "type": kind });
            if let Some(pw) = &self.obfs_password {
                obfs["password"] = json!(pw);
            }
            obj.insert("obfs".into(), obfs);
        }
        put_opt(&mut obj, "up_mbps", self.up_mbps);
        put_opt(&mut obj, "down_mbps", self.down_mbps);
        Ok(finish(obj, link))
    }

    fn share_link(&self, link: &CanonicalLink) -> String {
        let s = &link.security;
        let cred = self.password.as_deref().map(encode_component);
        format_link(
            "hy2",
            cred.as_deref(),
            link,
            &[
                ("sni", s.sni.clone()),
                ("insecure", s.insecure.then(|| "1".to_string())),
                ("obfs", self.obfs.clone()),
                ("obfs-password", self.obfs_password.clone()),
                ("up", self.up_mbps.map(|v| v.to_string())),
                ("down", self.down_mbps.map(|v| v.to_string())),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_link;

    #[test]
    fn parses_password_sni_and_obfs() {
        let link =
            parse_link("hy2://secret@h.example:8443?sni=s.example&insecure=1&obfs=salamander&obfs-password=x#Node")
                .unwrap();
        assert_eq!(link.server, "h.example");
        assert_eq!(link.port, 8443);
        assert_eq!(link.tag, "Node");
        let out = link.to_singbox_outbound().unwrap();
        assert_eq!(out["type"], "hysteria2");
        assert_eq!(out["password"], "secret");
        assert_eq!(out["obfs"]["type"], "salamander");
        assert_eq!(out["obfs"]["password"], "x");
        assert_eq!(out["tls"]["server_name"], "s.example");
        assert_eq!(out["tls"]["insecure"], true);
    }

    #[test]
    fn password_is_optional_and_tls_defaults_to_server() {
        let link = parse_link("hysteria2://h.example").unwrap();
        assert_eq!(link.port, 443);
        assert_eq!(link.tag, "hysteria2-h.example");
        let out = link.to_singbox_outbound().unwrap();
        assert!(out.get("password").is_none());
        assert_eq!(out["tls"]["enabled"], true);
        assert_eq!(out["tls"]["server_name"], "h.example");
    }
}
