//! Hysteria v1: `hysteria://host:port?auth=..&upmbps=..&downmbps=..&obfs=xplus&obfsParam=..&peer=..#tag`

use super::{format_link, Protocol};
use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{CanonicalLink, LinkParams, SecurityParams, SecurityTier, Transport};
use crate::outbound::{finish, header, put_opt};
use crate::uri::{split_host_port, RawLink};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Hysteria {
    pub auth: Option<String>,
    pub up_mbps: Option<u32>,
    pub down_mbps: Option<u32>,
    pub obfs: Option<String>,
    /// `udp`, `wechat-video` or `faketcp`.
    pub protocol: String,
}

impl Protocol for Hysteria {
    const DIALECT: Dialect = Dialect::Hysteria;

    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError> {
        let (cred, host_port) = raw.credential();
        let (server, port) = split_host_port(host_port, Self::DIALECT.default_port());
        let q = &raw.query;
        let security = SecurityParams::from_query(q, SecurityTier::Tls)
            .with_tier(SecurityTier::Tls)
            .resolve();
        Ok(CanonicalLink {
            tag: raw.tag(Self::DIALECT, &server),
            server,
            port,
            transport: Transport::default(),
            security,
            params: LinkParams::Hysteria(Self {
                auth: q.owned("auth").or(cred),
                up_mbps: q.number("upmbps"),
                down_mbps: q.number("downmbps"),
                // `obfsParam` carries the obfuscation password; some generators put it in `obfs`
                obfs: q.owned("obfsParam").or_else(|| q.owned("obfs")),
                protocol: q.owned("protocol").unwrap_or_else(|| "udp".into()),
            }),
        })
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError> {
        let mut obj = header("hysteria", link);
        put_opt(&mut obj, "auth_str", self.auth.clone());
        put_opt(&mut obj, "up_mbps", self.up_mbps);
        put_opt(&mut obj, "down_mbps", self.down_mbps);
        put_opt(&mut obj, "obfs", self.obfs.clone());
        Ok(finish(obj, link))
    }

    fn share_link(&self, link: &CanonicalLink) -> String {
        let s = &link.security;
        format_link(
            "hysteria",
            None,
            link,
            &[
                ("protocol", Some(self.protocol.clone())),
                ("auth", self.auth.clone()),
                ("upmbps", self.up_mbps.map(|v| v.to_string())),
                ("downmbps", self.down_mbps.map(|v| v.to_string())),
                ("obfsParam", self.obfs.clone()),
                ("peer", s.sni.clone()),
                ("alpn", (!s.alpn.is_empty()).then(|| s.alpn.join(","))),
                ("insecure", s.insecure.then(|| "1".to_string())),
            ],
        )
    }
}
