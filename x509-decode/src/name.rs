// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Distinguished Name and GeneralName decoding.
//!
//! A Name is a SEQUENCE of RelativeDistinguishedName SETs, each
//! holding AttributeTypeAndValue pairs. GeneralName is the tagged
//! CHOICE used by subjectAltName, authorityKeyIdentifier and the CRL
//! distribution point extensions.

use crate::oid;
use crate::simplify::simplify_node;
use crate::tlv::Node;
use serde::Serialize;
use std::fmt;

/// One decoded AttributeTypeAndValue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NameAttribute {
    pub oid: String,
    pub label: String,
    pub value: String,
}

/// A decoded issuer or subject Name: the ordered attribute list plus
/// the `label=value, ...` formatted form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Name {
    pub formatted: String,
    pub attributes: Vec<NameAttribute>,
}

impl Name {
    /// Walk a Name SEQUENCE of RDN SETs. Attributes that do not have
    /// the expected `{type, value}` shape are skipped rather than
    /// failing the decode.
    pub fn from_node(node: &Node) -> Self {
        let mut attributes = Vec::new();

        for rdn in node.children() {
            for atv in rdn.children() {
                let children = atv.children();
                let (Some(type_node), Some(value_node)) =
                    (children.first(), children.get(1))
                else {
                    continue;
                };
                let Some(oid) = type_node.oid() else {
                    continue;
                };
                let value = match value_node.value() {
                    Some(value) => value.display_string(),
                    None => {
                        String::from_utf8_lossy(value_node.raw()).into_owned()
                    }
                };
                attributes.push(NameAttribute {
                    oid: oid.to_string(),
                    label: oid::label_of(oid),
                    value,
                });
            }
        }

        let formatted = attributes
            .iter()
            .map(|a| format!("{}={}", a.label, a.value))
            .collect::<Vec<_>>()
            .join(", ");

        Name { formatted, attributes }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.formatted)
    }
}

/// GeneralName CHOICE, dispatched by context-specific tag number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeneralName {
    /// [0] otherName, rendered as a JSON dump of its structure.
    Other(String),
    /// [1] rfc822Name
    Rfc822(String),
    /// [2] dNSName
    Dns(String),
    /// [4] directoryName
    Directory(String),
    /// [6] uniformResourceIdentifier
    Uri(String),
    /// [7] iPAddress
    Ip(String),
    /// [8] registeredID
    RegisteredId(String),
    Unknown { tag: u32, value: String },
}

impl GeneralName {
    pub fn from_node(node: &Node) -> Self {
        match node.tag.number {
            0 => GeneralName::Other(other_name_dump(node)),
            1 => GeneralName::Rfc822(raw_text(node)),
            2 => GeneralName::Dns(raw_text(node)),
            4 => {
                // explicit tag around the Name SEQUENCE
                let name = match node.children().first() {
                    Some(inner) => Name::from_node(inner).formatted,
                    None => raw_text(node),
                };
                GeneralName::Directory(name)
            }
            6 => GeneralName::Uri(raw_text(node)),
            7 => GeneralName::Ip(format_ip(node.raw())),
            8 => {
                let oid = crate::scalar::decode_oid(node.raw())
                    .unwrap_or_else(|| node.content_hex());
                GeneralName::RegisteredId(oid)
            }
            tag => GeneralName::Unknown {
                tag,
                value: raw_text(node),
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GeneralName::Other(_) => "otherName",
            GeneralName::Rfc822(_) => "email",
            GeneralName::Dns(_) => "DNS",
            GeneralName::Directory(_) => "DirName",
            GeneralName::Uri(_) => "URI",
            GeneralName::Ip(_) => "IP",
            GeneralName::RegisteredId(_) => "RID",
            GeneralName::Unknown { .. } => "Unknown",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            GeneralName::Other(v)
            | GeneralName::Rfc822(v)
            | GeneralName::Dns(v)
            | GeneralName::Directory(v)
            | GeneralName::Uri(v)
            | GeneralName::Ip(v)
            | GeneralName::RegisteredId(v)
            | GeneralName::Unknown { value: v, .. } => v,
        }
    }
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GeneralName::Unknown { tag, value } => {
                write!(f, "Unknown({tag}):{value}")
            }
            other => write!(f, "{}:{}", other.kind(), other.value()),
        }
    }
}

fn raw_text(node: &Node) -> String {
    String::from_utf8_lossy(node.raw()).into_owned()
}

fn other_name_dump(node: &Node) -> String {
    let parts: Vec<serde_json::Value> = node
        .children()
        .iter()
        .map(|child| serde_json::to_value(simplify_node(child)))
        .collect::<Result<_, _>>()
        .unwrap_or_default();
    if parts.is_empty() {
        node.content_hex()
    } else {
        serde_json::Value::Array(parts).to_string()
    }
}

/// 4 bytes render as dotted-decimal IPv4, 16 bytes as colon-grouped
/// IPv6 hextets, anything else as hex.
fn format_ip(raw: &[u8]) -> String {
    match raw.len() {
        4 => format!("{}.{}.{}.{}", raw[0], raw[1], raw[2], raw[3]),
        16 => raw
            .chunks(2)
            .map(|pair| format!("{:x}", u16::from_be_bytes([pair[0], pair[1]])))
            .collect::<Vec<_>>()
            .join(":"),
        _ => hex::encode(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv;

    fn tlv_bytes(tag: u8, content: &[u8]) -> Vec<u8> {
        assert!(content.len() < 128);
        let mut out = vec![tag, content.len() as u8];
        out.extend_from_slice(content);
        out
    }

    #[test]
    fn name_formats_label_value_pairs() {
        // SEQUENCE { SET { SEQUENCE { OID 2.5.4.3, UTF8 "Test CA" } },
        //            SET { SEQUENCE { OID 2.5.4.6, Printable "US" } } }
        let cn_atv = {
            let mut atv = tlv_bytes(0x06, &[0x55, 0x04, 0x03]);
            atv.extend(tlv_bytes(0x0c, b"Test CA"));
            tlv_bytes(0x30, &atv)
        };
        let c_atv = {
            let mut atv = tlv_bytes(0x06, &[0x55, 0x04, 0x06]);
            atv.extend(tlv_bytes(0x13, b"US"));
            tlv_bytes(0x30, &atv)
        };
        let mut rdns = tlv_bytes(0x31, &cn_atv);
        rdns.extend(tlv_bytes(0x31, &c_atv));
        let buf = tlv_bytes(0x30, &rdns);

        let node = tlv::decode_single(&buf).expect("decode Name");
        let name = Name::from_node(&node);

        assert_eq!(name.formatted, "commonName=Test CA, countryName=US");
        assert_eq!(name.attributes.len(), 2);
        assert_eq!(name.attributes[0].oid, "2.5.4.3");
        assert_eq!(name.attributes[1].value, "US");
    }

    #[test]
    fn general_name_dns() {
        let buf = tlv_bytes(0x82, b"example.com");
        let node = tlv::decode_single(&buf).expect("decode [2]");

        let gn = GeneralName::from_node(&node);
        assert_eq!(gn, GeneralName::Dns("example.com".to_string()));
        assert_eq!(gn.to_string(), "DNS:example.com");
    }

    #[test]
    fn general_name_ipv4() {
        let buf = tlv_bytes(0x87, &[192, 168, 0, 1]);
        let node = tlv::decode_single(&buf).expect("decode [7]");

        assert_eq!(
            GeneralName::from_node(&node),
            GeneralName::Ip("192.168.0.1".to_string())
        );
    }

    #[test]
    fn general_name_ipv6() {
        let raw = [
            0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x01,
        ];
        let buf = tlv_bytes(0x87, &raw);
        let node = tlv::decode_single(&buf).expect("decode [7]");

        assert_eq!(
            GeneralName::from_node(&node),
            GeneralName::Ip("2001:db8:0:0:0:0:0:1".to_string())
        );
    }

    #[test]
    fn general_name_registered_id() {
        let buf = tlv_bytes(0x88, &[0x2b, 0x65, 0x70]);
        let node = tlv::decode_single(&buf).expect("decode [8]");

        assert_eq!(
            GeneralName::from_node(&node),
            GeneralName::RegisteredId("1.3.101.112".to_string())
        );
    }

    #[test]
    fn general_name_unknown_tag() {
        let buf = tlv_bytes(0x83, b"x400");
        let node = tlv::decode_single(&buf).expect("decode [3]");

        let gn = GeneralName::from_node(&node);
        assert_eq!(
            gn,
            GeneralName::Unknown {
                tag: 3,
                value: "x400".to_string()
            }
        );
        assert_eq!(gn.to_string(), "Unknown(3):x400");
    }
}
