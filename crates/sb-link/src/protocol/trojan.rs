//! `trojan://password@host:port?security=tls&type=ws&sni=..#tag`

use super::{format_link, stream_pairs, Protocol};
use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{CanonicalLink, LinkParams, SecurityParams, SecurityTier, Transport};
use crate::outbound::{finish, header};
use crate::uri::{encode_component, split_host_port, RawLink};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trojan {
    pub password: String,
}

impl Protocol for Trojan {
    const DIALECT: Dialect = Dialect::Trojan;

    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError> {
        let (password, host_port) = raw.credential();
        let password = password
            .ok_or_else(|| LinkError::malformed(Self::DIALECT, "missing password before `@`"))?;
        let (server, port) = split_host_port(host_port, Self::DIALECT.default_port());
        let q = &raw.query;
        Ok(CanonicalLink {
            tag: raw.tag(Self::DIALECT, &server),
            server,
            port,
            transport: Transport::from_query(q),
            security: SecurityParams::from_query(q, SecurityTier::Tls).resolve(),
            params: LinkParams::Trojan(Self { password }),
        })
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError> {
        let mut obj = header("trojan", link);
        obj.insert("password".into(), json!(self.password));
        Ok(finish(obj, link))
    }

    fn share_link(&self, link: &CanonicalLink) -> String {
        format_link(
            "trojan",
            Some(encode_component(&self.password).as_str()),
            link,
            &stream_pairs(link),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse_link, LinkError, SecurityTier};

    #[test]
    fn security_defaults_to_tls() {
        let link = parse_link("trojan://pw@t.example#T").unwrap();
        assert_eq!(link.port, 443);
        assert_eq!(link.security.tier, SecurityTier::Tls);
        let out = link.to_singbox_outbound().unwrap();
        assert_eq!(out["password"], "pw");
        assert_eq!(out["tls"]["server_name"], "t.example");
    }

    #[test]
    fn explicit_none_disables_tls() {
        let out = parse_link("trojan://pw@t.example:80?security=none&type=ws&path=%2Fws")
            .unwrap()
            .to_singbox_outbound()
            .unwrap();
        assert!(out.get("tls").is_none());
        assert_eq!(out["transport"]["path"], "/ws");
    }

    #[test]
    fn missing_password_is_malformed() {
        assert!(matches!(
            parse_link("trojan://t.example:443"),
            Err(LinkError::Malformed { .. })
        ));
    }
}
