//! `socks5://[user:pass@]host[:port]#tag`; anonymous access is allowed.

use super::{format_link, Protocol};
use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{CanonicalLink, LinkParams, Security, Transport};
use crate::outbound::{finish, header};
use crate::uri::{encode_component, split_host_port, RawLink};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Socks5 {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `user:pass` for re-serialization, only when both halves exist.
pub(crate) fn userinfo(username: &Option<String>, password: &Option<String>) -> Option<String> {
    match (username, password) {
        (Some(u), Some(p)) => Some(format!("{}:{}", encode_component(u), encode_component(p))),
        _ => None,
    }
}

impl Protocol for Socks5 {
    const DIALECT: Dialect = Dialect::Socks5;

    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError> {
        let (username, password, host_port) = raw.user_pass();
        let (server, port) = split_host_port(host_port, Self::DIALECT.default_port());
        Ok(CanonicalLink {
            tag: raw.tag(Self::DIALECT, &server),
            server,
            port,
            transport: Transport::default(),
            security: Security::none(),
            params: LinkParams::Socks5(Self { username, password }),
        })
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError> {
        let mut obj = header("socks", link);
        obj.insert("version".into(), json!("5"));
        if let (Some(u), Some(p)) = (&self.username, &self.password) {
            obj.insert("username".into(), json!(u));
            obj.insert("password".into(), json!(p));
        }
        Ok(finish(obj, link))
    }

    fn share_link(&self, link: &CanonicalLink) -> String {
        format_link(
            "socks5",
            userinfo(&self.username, &self.password).as_deref(),
            link,
            &[],
        )
    }
}
