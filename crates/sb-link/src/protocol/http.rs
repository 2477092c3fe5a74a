//! `http(s)://[user:pass@]host[:port]#tag`. `https` turns TLS on and moves the default port
//! from 80 to 443.

use super::socks::userinfo;
use super::{format_link, Protocol};
use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{CanonicalLink, LinkParams, Security, SecurityTier, Transport};
use crate::outbound::{finish, header};
use crate::uri::{split_host_port, RawLink};
use serde::Serialize;
use serde_json::{json, Value};

const PLAIN_PORT: u16 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Http {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Protocol for Http {
    const DIALECT: Dialect = Dialect::Http;

    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError> {
        let tls = raw.scheme == "https";
        let (username, password, host_port) = raw.user_pass();
        let default_port = if tls {
            Self::DIALECT.default_port()
        } else {
            PLAIN_PORT
        };
        let (server, port) = split_host_port(host_port, default_port);
        let security = if tls {
            Security {
                tier: SecurityTier::Tls,
                ..Security::none()
            }
        } else {
            Security::none()
        };
        Ok(CanonicalLink {
            tag: raw.tag(Self::DIALECT, &server),
            server,
            port,
            transport: Transport::default(),
            security,
            params: LinkParams::Http(Self { username, password }),
        })
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError> {
        let mut obj = header("http", link);
        if let (Some(u), Some(p)) = (&self.username, &self.password) {
            obj.insert("username".into(), json!(u));
            obj.insert("password".into(), json!(p));
        }
        Ok(finish(obj, link))
    }

    fn share_link(&self, link: &CanonicalLink) -> String {
        let scheme = if link.security.is_tls() { "https" } else { "http" };
        format_link(
            scheme,
            userinfo(&self.username, &self.password).as_deref(),
            link,
            &[],
        )
    }
}
