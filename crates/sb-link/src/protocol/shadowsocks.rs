//! Shadowsocks, in the three forms seen in the wild:
//!
//! - `ss://base64(method:password@host:port)#tag` (legacy, whole body encoded)
//! - `ss://base64url(method:password)@host:port/?plugin=..#tag` (SIP002)
//! - `ss://method:password@host:port#tag` (plain)
//!
//! The whole-body form is tried first; on failure the body is read as userinfo.

use super::{format_link, Protocol};
use crate::b64;
use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{CanonicalLink, LinkParams, Security, Transport};
use crate::outbound::{finish, header, put_opt};
use crate::uri::{decode_component, split_credential, split_host_port, RawLink};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shadowsocks {
    pub method: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_opts: Option<String>,
}

fn method_password(userinfo: &str) -> Result<(String, String), LinkError> {
    match userinfo.split_once(':') {
        Some((m, p)) if !m.is_empty() => Ok((m.to_string(), p.to_string())),
        _ => Err(LinkError::malformed(
            Dialect::Shadowsocks,
            "credential is not `method:password`",
        )),
    }
}

/// `(method, password, host:port)` from whichever form the link uses.
fn split_body(raw: &RawLink<'_>) -> Result<(String, String, String), LinkError> {
    let body = raw.opaque.trim_end_matches('/');
    if let Some(decoded) = b64::decode_utf8(body) {
        if let Some((userinfo, host_port)) = decoded.rsplit_once('@') {
            debug!("shadowsocks: whole-body base64 form");
            let (method, password) = method_password(userinfo)?;
            return Ok((method, password, host_port.trim().to_string()));
        }
    }

    let (userinfo, host_port) = split_credential(raw.authority);
    let userinfo = userinfo
        .ok_or_else(|| LinkError::malformed(Dialect::Shadowsocks, "missing credential before `@`"))?;
    let userinfo = decode_component(userinfo, false);
    let (method, password) = if userinfo.contains(':') {
        method_password(&userinfo)?
    } else {
        let decoded = b64::decode_utf8(&userinfo).ok_or_else(|| {
            LinkError::malformed(Dialect::Shadowsocks, "userinfo is neither plain nor base64")
        })?;
        method_password(&decoded)?
    };
    Ok((method, password, host_port.to_string()))
}

impl Protocol for Shadowsocks {
    const DIALECT: Dialect = Dialect::Shadowsocks;

    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError> {
        let (method, password, host_port) = split_body(raw)?;
        let (server, port) = split_host_port(&host_port, Self::DIALECT.default_port());
        let (plugin, plugin_opts) = match raw.query.get("plugin") {
            Some(p) => match p.split_once(';') {
                Some((name, opts)) => (Some(name.to_string()), Some(opts.to_string())),
                None => (Some(p.to_string()), None),
            },
            None => (None, None),
        };
        Ok(CanonicalLink {
            tag: raw.tag(Self::DIALECT, &server),
            server,
            port,
            transport: Transport::default(),
            security: Security::none(),
            params: LinkParams::Shadowsocks(Self {
                method,
                password,
                plugin,
                plugin_opts,
            }),
        })
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError> {
        let mut obj = header("shadowsocks", link);
        obj.insert("method".into(), json!(self.method));
        obj.insert("password".into(), json!(self.password));
        put_opt(&mut obj, "plugin", self.plugin.clone());
        put_opt(&mut obj, "plugin_opts", self.plugin_opts.clone());
        Ok(finish(obj, link))
    }

    fn share_link(&self, link: &CanonicalLink) -> String {
        let userinfo = URL_SAFE_NO_PAD.encode(format!("{}:{}", self.method, self.password));
        let plugin = self.plugin.as_ref().map(|p| match &self.plugin_opts {
            Some(opts) => format!("{p};{opts}"),
            None => p.clone(),
        });
        format_link("ss", Some(userinfo.as_str()), link, &[("plugin", plugin)])
    }
}
