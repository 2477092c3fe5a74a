//! `vless://uuid@host:port?type=ws&security=reality&pbk=..&sid=..&fp=..#tag`

use super::{format_link, stream_pairs, Protocol};
use crate::detect::Dialect;
use crate::error::LinkError;
use crate::model::{CanonicalLink, LinkParams, Network, SecurityParams, SecurityTier, Transport};
use crate::outbound::{finish, header, put_opt};
use crate::uri::{encode_component, split_host_port, RawLink};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vless {
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    pub encryption: String,
}

impl Protocol for Vless {
    const DIALECT: Dialect = Dialect::Vless;

    fn parse(raw: &RawLink<'_>) -> Result<CanonicalLink, LinkError> {
        let (uuid, host_port) = raw.credential();
        let uuid = uuid.ok_or_else(|| LinkError::malformed(Self::DIALECT, "missing UUID before `@`"))?;
        let (server, port) = split_host_port(host_port, Self::DIALECT.default_port());
        let q = &raw.query;
        Ok(CanonicalLink {
            tag: raw.tag(Self::DIALECT, &server),
            server,
            port,
            transport: Transport::from_query(q),
            security: SecurityParams::from_query(q, SecurityTier::None).resolve(),
            params: LinkParams::Vless(Self {
                uuid,
                flow: q.owned("flow"),
                encryption: q.owned("encryption").unwrap_or_else(|| "none".into()),
            }),
        })
    }

    fn outbound(&self, link: &CanonicalLink) -> Result<Value, LinkError> {
        let mut obj = header("vless", link);
        obj.insert("uuid".into(), json!(self.uuid));
        if self.encryption != "none" {
            obj.insert("encryption".into(), json!(self.encryption));
        }
        put_opt(&mut obj, "flow", self.flow.clone());
        if matches!(link.transport.network, Network::Ws | Network::Grpc) {
            obj.insert("packet_encoding".into(), json!("xudp"));
        }
        Ok(finish(obj, link))
    }

    fn share_link(&self, link: &CanonicalLink) -> String {
        let mut pairs = vec![
            ("encryption", Some(self.encryption.clone())),
            ("flow", self.flow.clone()),
        ];
        pairs.extend(stream_pairs(link));
        format_link("vless", Some(encode_component(&self.uuid).as_str()), link, &pairs)
    }
}
