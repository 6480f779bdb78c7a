// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extension dispatch.
//!
//! Each extnValue is an OCTET STRING whose content is itself ASN.1,
//! so decoding an extension means re-entering the TLV decoder on the
//! value bytes and interpreting the fresh tree per the extension's
//! own grammar. An unknown OID, or any failure along the way, falls
//! back to the raw hex of the value; extension decoding is never
//! fatal to the certificate decode.

use crate::cert::Provenance;
use crate::name::GeneralName;
use crate::oid::{OidEntry, KEY_USAGE_BITS};
use crate::scalar::{Int, Value};
use crate::tlv::{self, Node};
use log::debug;
use serde::Serialize;
use serde_json::json;

pub const SUBJECT_ALT_NAME: &str = "2.5.29.17";
pub const KEY_USAGE: &str = "2.5.29.15";
pub const BASIC_CONSTRAINTS: &str = "2.5.29.19";
pub const CERTIFICATE_POLICIES: &str = "2.5.29.32";
pub const AUTHORITY_KEY_IDENTIFIER: &str = "2.5.29.35";
pub const EXTENDED_KEY_USAGE: &str = "2.5.29.37";
pub const CRL_DISTRIBUTION_POINTS: &str = "2.5.29.31";
pub const AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
pub const QC_STATEMENTS: &str = "1.3.6.1.5.5.7.1.3";

const QC_PDS: &str = "0.4.0.1862.1.5";
const QC_TYPE: &str = "0.4.0.1862.1.6";

/// One certificate extension with its decoded (or raw) value.
#[derive(Clone, Debug)]
pub struct Extension {
    pub oid: OidEntry,
    pub critical: bool,
    pub value: ExtensionValue,
    pub provenance: Provenance,
}

/// Closed set of known extension shapes plus the raw-hex fallback.
#[derive(Clone, Debug, PartialEq)]
pub enum ExtensionValue {
    SubjectAltName(Vec<GeneralName>),
    KeyUsage(KeyUsage),
    BasicConstraints(BasicConstraints),
    CertificatePolicies(Vec<PolicyInformation>),
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    ExtendedKeyUsage(Vec<OidEntry>),
    AuthorityInfoAccess(Vec<AccessDescription>),
    CrlDistributionPoints(Vec<String>),
    QcStatements(Vec<QcStatement>),
    RawHex(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KeyUsage {
    #[serde(rename = "digitalSignature")]
    pub digital_signature: bool,
    #[serde(rename = "nonRepudiation")]
    pub non_repudiation: bool,
    #[serde(rename = "keyEncipherment")]
    pub key_encipherment: bool,
    #[serde(rename = "dataEncipherment")]
    pub data_encipherment: bool,
    #[serde(rename = "keyAgreement")]
    pub key_agreement: bool,
    #[serde(rename = "keyCertSign")]
    pub key_cert_sign: bool,
    #[serde(rename = "cRLSign")]
    pub crl_sign: bool,
    #[serde(rename = "encipherOnly")]
    pub encipher_only: bool,
    #[serde(rename = "decipherOnly")]
    pub decipher_only: bool,
}

impl KeyUsage {
    /// Interpret BIT STRING data MSB-first: bit `i` of the trimmed
    /// string maps to `KEY_USAGE_BITS[i]`.
    pub fn from_bits(data: &[u8], unused_bits: u8) -> Self {
        let total_bits = data.len() * 8;
        let total_bits = total_bits.saturating_sub(usize::from(unused_bits));
        let bit = |i: usize| -> bool {
            i < total_bits && data[i / 8] & (0x80 >> (i % 8)) != 0
        };
        Self {
            digital_signature: bit(0),
            non_repudiation: bit(1),
            key_encipherment: bit(2),
            data_encipherment: bit(3),
            key_agreement: bit(4),
            key_cert_sign: bit(5),
            crl_sign: bit(6),
            encipher_only: bit(7),
            decipher_only: bit(8),
        }
    }

    /// Names of the set bits, in bit order.
    pub fn set_bits(&self) -> Vec<&'static str> {
        let flags = [
            self.digital_signature,
            self.non_repudiation,
            self.key_encipherment,
            self.data_encipherment,
            self.key_agreement,
            self.key_cert_sign,
            self.crl_sign,
            self.encipher_only,
            self.decipher_only,
        ];
        flags
            .iter()
            .zip(KEY_USAGE_BITS.iter())
            .filter_map(|(&set, &name)| set.then_some(name))
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub ca: bool,
    /// Absent and zero are different things; absent stays `None`.
    pub path_len: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyInformation {
    pub policy: OidEntry,
    pub qualifiers: Vec<PolicyQualifier>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyQualifier {
    pub id: OidEntry,
    pub qualifier: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    /// [0] keyIdentifier, uppercase hex.
    pub key_id: Option<String>,
    /// [1] authorityCertIssuer, formatted GeneralNames.
    pub cert_issuer: Option<String>,
    /// [2] authorityCertSerialNumber, uppercase hex.
    pub cert_serial: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessDescription {
    pub method: OidEntry,
    pub location: GeneralName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdsLocation {
    pub url: String,
    pub language: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QcStatementInfo {
    PdsLocations(Vec<PdsLocation>),
    Types(Vec<OidEntry>),
    /// Generic recursive decode for statement IDs without bespoke
    /// handling: nested SEQUENCEs as arrays, leaves as values.
    Other(serde_json::Value),
    None,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QcStatement {
    pub id: OidEntry,
    pub info: QcStatementInfo,
}

/// Decode a known extension value, falling back to raw hex for
/// unknown OIDs and for any content that does not match the expected
/// grammar.
pub fn decode_extension(oid: &OidEntry, value_node: &Node) -> ExtensionValue {
    let raw = value_node.raw();

    let known = matches!(
        oid.oid.as_str(),
        SUBJECT_ALT_NAME
            | KEY_USAGE
            | BASIC_CONSTRAINTS
            | CERTIFICATE_POLICIES
            | AUTHORITY_KEY_IDENTIFIER
            | EXTENDED_KEY_USAGE
            | AUTHORITY_INFO_ACCESS
            | CRL_DISTRIBUTION_POINTS
            | QC_STATEMENTS
    );
    if !known {
        return ExtensionValue::RawHex(hex::encode(raw));
    }

    // the extnValue OCTET STRING wraps a fresh ASN.1 buffer
    let inner = match tlv::decode_single(raw) {
        Ok(node) => node,
        Err(e) => {
            debug!("extension {} content failed to decode: {e}", oid.oid);
            return ExtensionValue::RawHex(hex::encode(raw));
        }
    };

    let decoded = match oid.oid.as_str() {
        SUBJECT_ALT_NAME => subject_alt_name(&inner),
        KEY_USAGE => key_usage(&inner),
        BASIC_CONSTRAINTS => basic_constraints(&inner),
        CERTIFICATE_POLICIES => certificate_policies(&inner),
        AUTHORITY_KEY_IDENTIFIER => authority_key_identifier(&inner),
        EXTENDED_KEY_USAGE => extended_key_usage(&inner),
        AUTHORITY_INFO_ACCESS => authority_info_access(&inner),
        CRL_DISTRIBUTION_POINTS => crl_distribution_points(&inner),
        QC_STATEMENTS => qc_statements(&inner),
        _ => None,
    };

    decoded.unwrap_or_else(|| {
        debug!("extension {} did not match its grammar", oid.oid);
        ExtensionValue::RawHex(hex::encode(raw))
    })
}

fn subject_alt_name(node: &Node) -> Option<ExtensionValue> {
    if !node.is_sequence() {
        return None;
    }
    let names = node.children().iter().map(GeneralName::from_node).collect();
    Some(ExtensionValue::SubjectAltName(names))
}

fn key_usage(node: &Node) -> Option<ExtensionValue> {
    let Some(Value::BitString { unused_bits, hex }) = node.value() else {
        return None;
    };
    let data = hex::decode(hex).ok()?;
    Some(ExtensionValue::KeyUsage(KeyUsage::from_bits(
        &data,
        *unused_bits,
    )))
}

fn basic_constraints(node: &Node) -> Option<ExtensionValue> {
    if !node.is_sequence() {
        return None;
    }
    let mut constraints = BasicConstraints::default();
    for child in node.children() {
        match child.value() {
            Some(Value::Boolean(ca)) => constraints.ca = *ca,
            Some(Value::Integer(Int::Small(len))) => {
                constraints.path_len = u64::try_from(*len).ok();
            }
            _ => {}
        }
    }
    Some(ExtensionValue::BasicConstraints(constraints))
}

fn certificate_policies(node: &Node) -> Option<ExtensionValue> {
    if !node.is_sequence() {
        return None;
    }
    let mut policies = Vec::new();
    for info in node.children() {
        let children = info.children();
        let policy = OidEntry::new(children.first()?.oid()?);

        let mut qualifiers = Vec::new();
        if let Some(list) = children.get(1) {
            for qual in list.children() {
                let parts = qual.children();
                let Some(id) = parts.first().and_then(Node::oid) else {
                    continue;
                };
                let qualifier = parts
                    .get(1)
                    .map(qualifier_text)
                    .unwrap_or_default();
                qualifiers.push(PolicyQualifier {
                    id: OidEntry::new(id),
                    qualifier,
                });
            }
        }
        policies.push(PolicyInformation { policy, qualifiers });
    }
    Some(ExtensionValue::CertificatePolicies(policies))
}

/// Qualifier payloads are usually an IA5String CPS URI but can be a
/// nested userNotice SEQUENCE; render whatever text is reachable.
fn qualifier_text(node: &Node) -> String {
    if let Some(value) = node.value() {
        return value.display_string();
    }
    let texts: Vec<String> = node
        .children()
        .iter()
        .filter_map(|child| child.value().map(Value::display_string))
        .collect();
    if texts.is_empty() {
        node.content_hex()
    } else {
        texts.join(" ")
    }
}

fn authority_key_identifier(node: &Node) -> Option<ExtensionValue> {
    if !node.is_sequence() {
        return None;
    }
    let mut aki = AuthorityKeyIdentifier::default();
    for child in node.children() {
        match child.tag.number {
            0 if !child.tag.constructed => {
                aki.key_id = Some(hex::encode_upper(child.raw()));
            }
            1 => {
                let names: Vec<String> = child
                    .children()
                    .iter()
                    .map(|n| GeneralName::from_node(n).to_string())
                    .collect();
                aki.cert_issuer = Some(names.join(", "));
            }
            2 => {
                aki.cert_serial = Some(hex::encode_upper(child.raw()));
            }
            _ => {}
        }
    }
    Some(ExtensionValue::AuthorityKeyIdentifier(aki))
}

fn extended_key_usage(node: &Node) -> Option<ExtensionValue> {
    if !node.is_sequence() {
        return None;
    }
    let purposes = node
        .children()
        .iter()
        .filter_map(Node::oid)
        .map(OidEntry::new)
        .collect();
    Some(ExtensionValue::ExtendedKeyUsage(purposes))
}

fn authority_info_access(node: &Node) -> Option<ExtensionValue> {
    if !node.is_sequence() {
        return None;
    }
    let mut descriptions = Vec::new();
    for access in node.children() {
        let children = access.children();
        let method = OidEntry::new(children.first()?.oid()?);
        let location = GeneralName::from_node(children.get(1)?);
        descriptions.push(AccessDescription { method, location });
    }
    Some(ExtensionValue::AuthorityInfoAccess(descriptions))
}

/// Collect the URI GeneralNames inside each DistributionPoint's
/// nested `[0] distributionPoint / [0] fullName` choice.
fn crl_distribution_points(node: &Node) -> Option<ExtensionValue> {
    if !node.is_sequence() {
        return None;
    }
    let mut uris = Vec::new();
    for point in node.children() {
        for dp_name in point.children() {
            if !dp_name.tag.is_context(0) {
                continue;
            }
            for full_name in dp_name.children() {
                if !full_name.tag.is_context(0) {
                    continue;
                }
                for name in full_name.children() {
                    if let GeneralName::Uri(uri) =
                        GeneralName::from_node(name)
                    {
                        uris.push(uri);
                    }
                }
            }
        }
    }
    Some(ExtensionValue::CrlDistributionPoints(uris))
}

fn qc_statements(node: &Node) -> Option<ExtensionValue> {
    if !node.is_sequence() {
        return None;
    }
    let mut statements = Vec::new();
    for stmt in node.children() {
        let children = stmt.children();
        let id = OidEntry::new(children.first()?.oid()?);
        let info = match children.get(1) {
            None => QcStatementInfo::None,
            Some(info_node) => match id.oid.as_str() {
                QC_PDS => QcStatementInfo::PdsLocations(pds_locations(
                    info_node,
                )),
                QC_TYPE => QcStatementInfo::Types(
                    info_node
                        .children()
                        .iter()
                        .filter_map(Node::oid)
                        .map(OidEntry::new)
                        .collect(),
                ),
                _ => QcStatementInfo::Other(generic_value(info_node)),
            },
        };
        statements.push(QcStatement { id, info });
    }
    Some(ExtensionValue::QcStatements(statements))
}

/// PdsLocation entries carry a URL and a language code; the URL is
/// the IA5String child and the language the PrintableString child.
fn pds_locations(node: &Node) -> Vec<PdsLocation> {
    let mut locations = Vec::new();
    for entry in node.children() {
        let mut url = None;
        let mut language = None;
        for child in entry.children() {
            match (child.tag.number, child.text()) {
                (22, Some(text)) => url = Some(text.to_string()),
                (19, Some(text)) => language = Some(text.to_string()),
                _ => {}
            }
        }
        if let (Some(url), Some(language)) = (url, language) {
            locations.push(PdsLocation { url, language });
        }
    }
    locations
}

/// Generic recursive projection: SEQUENCEs become arrays, leaves
/// their decoded value or a lossy string of the raw bytes.
fn generic_value(node: &Node) -> serde_json::Value {
    if node.tag.constructed {
        let items: Vec<serde_json::Value> =
            node.children().iter().map(generic_value).collect();
        serde_json::Value::Array(items)
    } else {
        match node.value() {
            Some(value) => value.to_json(),
            None => serde_json::Value::from(
                String::from_utf8_lossy(node.raw()).into_owned(),
            ),
        }
    }
}

impl ExtensionValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ExtensionValue::SubjectAltName(names) => {
                let names: Vec<String> =
                    names.iter().map(ToString::to_string).collect();
                json!(names)
            }
            ExtensionValue::KeyUsage(ku) => {
                serde_json::to_value(ku).unwrap_or_default()
            }
            ExtensionValue::BasicConstraints(bc) => {
                let mut obj = serde_json::Map::new();
                obj.insert("cA".to_string(), json!(bc.ca));
                if let Some(len) = bc.path_len {
                    obj.insert("pathLenConstraint".to_string(), json!(len));
                }
                serde_json::Value::Object(obj)
            }
            ExtensionValue::CertificatePolicies(policies) => {
                let items: Vec<serde_json::Value> = policies
                    .iter()
                    .map(|p| {
                        json!({
                            "policyId": p.policy.oid,
                            "label": p.policy.label,
                            "qualifiers": p
                                .qualifiers
                                .iter()
                                .map(|q| {
                                    json!({
                                        "policyQualifierId": q.id.oid,
                                        "label": q.id.label,
                                        "qualifier": q.qualifier,
                                    })
                                })
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                json!(items)
            }
            ExtensionValue::AuthorityKeyIdentifier(aki) => {
                let mut obj = serde_json::Map::new();
                if let Some(id) = &aki.key_id {
                    obj.insert("keyIdentifier".to_string(), json!(id));
                }
                if let Some(issuer) = &aki.cert_issuer {
                    obj.insert(
                        "authorityCertIssuer".to_string(),
                        json!(issuer),
                    );
                }
                if let Some(serial) = &aki.cert_serial {
                    obj.insert(
                        "authorityCertSerialNumber".to_string(),
                        json!(serial),
                    );
                }
                serde_json::Value::Object(obj)
            }
            ExtensionValue::ExtendedKeyUsage(purposes) => {
                serde_json::to_value(purposes).unwrap_or_default()
            }
            ExtensionValue::AuthorityInfoAccess(descriptions) => {
                let items: Vec<serde_json::Value> = descriptions
                    .iter()
                    .map(|d| {
                        json!({
                            "method": d.method.label,
                            "location": d.location.to_string(),
                        })
                    })
                    .collect();
                json!(items)
            }
            ExtensionValue::CrlDistributionPoints(uris) => json!(uris),
            ExtensionValue::QcStatements(statements) => {
                let items: Vec<serde_json::Value> = statements
                    .iter()
                    .map(|s| {
                        let info = match &s.info {
                            QcStatementInfo::PdsLocations(locs) => {
                                let locs: Vec<serde_json::Value> = locs
                                    .iter()
                                    .map(|l| {
                                        json!({
                                            "url": l.url,
                                            "language": l.language,
                                        })
                                    })
                                    .collect();
                                json!(locs)
                            }
                            QcStatementInfo::Types(types) => {
                                serde_json::to_value(types)
                                    .unwrap_or_default()
                            }
                            QcStatementInfo::Other(value) => value.clone(),
                            QcStatementInfo::None => serde_json::Value::Null,
                        };
                        json!({
                            "statementId": s.id.oid,
                            "label": s.id.label,
                            "statementInfo": info,
                        })
                    })
                    .collect();
                json!(items)
            }
            ExtensionValue::RawHex(hex) => json!(hex),
        }
    }

    /// Short single-line form for the text rendering.
    pub fn summary(&self) -> String {
        match self {
            ExtensionValue::SubjectAltName(names) => names
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            ExtensionValue::KeyUsage(ku) => ku.set_bits().join(", "),
            ExtensionValue::BasicConstraints(bc) => match bc.path_len {
                Some(len) => format!("cA={}, pathLenConstraint={len}", bc.ca),
                None => format!("cA={}", bc.ca),
            },
            other => other.to_json().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tlv_bytes(tag: u8, content: &[u8]) -> Vec<u8> {
        assert!(content.len() < 128);
        let mut out = vec![tag, content.len() as u8];
        out.extend_from_slice(content);
        out
    }

    fn decode_value(oid: &str, content: &[u8]) -> ExtensionValue {
        let buf = tlv_bytes(0x04, content);
        let node = tlv::decode_single(&buf).expect("decode OCTET STRING");
        decode_extension(&OidEntry::new(oid), &node)
    }

    #[test]
    fn key_usage_digital_signature_only() {
        // BIT STRING, 0 unused bits, one 0x80 data byte
        let content = tlv_bytes(0x03, &[0x00, 0x80]);
        let value = decode_value(KEY_USAGE, &content);

        let ExtensionValue::KeyUsage(ku) = value else {
            panic!("expected KeyUsage, got {value:?}");
        };
        assert!(ku.digital_signature);
        assert!(!ku.non_repudiation);
        assert!(!ku.decipher_only);
        assert_eq!(ku.set_bits(), vec!["digitalSignature"]);
    }

    #[test]
    fn key_usage_honors_unused_bits() {
        // 7 unused bits: only bit 0 is real even though more are set
        let content = tlv_bytes(0x03, &[0x07, 0xff]);
        let ExtensionValue::KeyUsage(ku) =
            decode_value(KEY_USAGE, &content)
        else {
            panic!("expected KeyUsage");
        };
        assert!(ku.digital_signature);
        assert!(!ku.non_repudiation);
    }

    #[test]
    fn key_usage_cert_sign_and_crl_sign() {
        // 0x06 = 00000110: keyCertSign + cRLSign
        let content = tlv_bytes(0x03, &[0x01, 0x06]);
        let ExtensionValue::KeyUsage(ku) =
            decode_value(KEY_USAGE, &content)
        else {
            panic!("expected KeyUsage");
        };
        assert_eq!(ku.set_bits(), vec!["keyCertSign", "cRLSign"]);
    }

    #[test]
    fn basic_constraints_ca_without_path_len() {
        // SEQUENCE { BOOLEAN TRUE }
        let content = tlv_bytes(0x30, &tlv_bytes(0x01, &[0xff]));
        let value = decode_value(BASIC_CONSTRAINTS, &content);

        assert_eq!(
            value,
            ExtensionValue::BasicConstraints(BasicConstraints {
                ca: true,
                path_len: None,
            })
        );
    }

    #[test]
    fn basic_constraints_with_path_len() {
        let mut inner = tlv_bytes(0x01, &[0xff]);
        inner.extend(tlv_bytes(0x02, &[0x03]));
        let content = tlv_bytes(0x30, &inner);
        let value = decode_value(BASIC_CONSTRAINTS, &content);

        assert_eq!(
            value,
            ExtensionValue::BasicConstraints(BasicConstraints {
                ca: true,
                path_len: Some(3),
            })
        );
    }

    #[test]
    fn basic_constraints_empty_sequence_defaults() {
        let content = tlv_bytes(0x30, &[]);
        assert_eq!(
            decode_value(BASIC_CONSTRAINTS, &content),
            ExtensionValue::BasicConstraints(BasicConstraints::default())
        );
    }

    #[test]
    fn subject_alt_name_mixed_entries() {
        let mut inner = tlv_bytes(0x82, b"example.com");
        inner.extend(tlv_bytes(0x81, b"admin@example.com"));
        inner.extend(tlv_bytes(0x87, &[10, 0, 0, 1]));
        let content = tlv_bytes(0x30, &inner);
        let value = decode_value(SUBJECT_ALT_NAME, &content);

        assert_eq!(
            value,
            ExtensionValue::SubjectAltName(vec![
                GeneralName::Dns("example.com".to_string()),
                GeneralName::Rfc822("admin@example.com".to_string()),
                GeneralName::Ip("10.0.0.1".to_string()),
            ])
        );
    }

    #[test]
    fn extended_key_usage_labels() {
        let mut inner = tlv_bytes(
            0x06,
            &[0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x01],
        );
        inner.extend(tlv_bytes(
            0x06,
            &[0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x02],
        ));
        let content = tlv_bytes(0x30, &inner);
        let value = decode_value(EXTENDED_KEY_USAGE, &content);

        let ExtensionValue::ExtendedKeyUsage(purposes) = value else {
            panic!("expected ExtendedKeyUsage");
        };
        assert_eq!(purposes.len(), 2);
        assert_eq!(purposes[0].label, "serverAuth");
        assert_eq!(purposes[1].label, "clientAuth");
    }

    #[test]
    fn authority_key_identifier_key_id() {
        // SEQUENCE { [0] keyIdentifier }
        let content =
            tlv_bytes(0x30, &tlv_bytes(0x80, &[0xde, 0xad, 0xbe, 0xef]));
        let value = decode_value(AUTHORITY_KEY_IDENTIFIER, &content);

        assert_eq!(
            value,
            ExtensionValue::AuthorityKeyIdentifier(AuthorityKeyIdentifier {
                key_id: Some("DEADBEEF".to_string()),
                cert_issuer: None,
                cert_serial: None,
            })
        );
    }

    #[test]
    fn crl_distribution_point_uris() {
        // DistributionPoint { [0] { [0] { URI } } }
        let uri = tlv_bytes(0x86, b"http://crl.example.com/ca.crl");
        let full_name = tlv_bytes(0xa0, &uri);
        let dp_name = tlv_bytes(0xa0, &full_name);
        let point = tlv_bytes(0x30, &dp_name);
        let content = tlv_bytes(0x30, &point);
        let value = decode_value(CRL_DISTRIBUTION_POINTS, &content);

        assert_eq!(
            value,
            ExtensionValue::CrlDistributionPoints(vec![
                "http://crl.example.com/ca.crl".to_string()
            ])
        );
    }

    #[test]
    fn authority_info_access_ocsp() {
        let mut access = tlv_bytes(
            0x06,
            &[0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x01],
        );
        access.extend(tlv_bytes(0x86, b"http://ocsp.example.com"));
        let content = tlv_bytes(0x30, &tlv_bytes(0x30, &access));
        let value = decode_value(AUTHORITY_INFO_ACCESS, &content);

        let ExtensionValue::AuthorityInfoAccess(descriptions) = value else {
            panic!("expected AuthorityInfoAccess");
        };
        assert_eq!(descriptions.len(), 1);
        assert_eq!(descriptions[0].method.label, "ocsp");
        assert_eq!(
            descriptions[0].location,
            GeneralName::Uri("http://ocsp.example.com".to_string())
        );
    }

    #[test]
    fn qc_statements_pds_and_type() {
        // QCStatement { QcPDS, SEQ { SEQ { IA5 url, Printable "en" } } }
        let mut pds_entry = tlv_bytes(0x16, b"https://example.com/pds");
        pds_entry.extend(tlv_bytes(0x13, b"en"));
        let pds_list = tlv_bytes(0x30, &tlv_bytes(0x30, &pds_entry));
        let mut pds_stmt =
            tlv_bytes(0x06, &[0x04, 0x00, 0x8e, 0x46, 0x01, 0x05]);
        pds_stmt.extend(pds_list);

        // QCStatement { QcType, SEQ { id-etsi-qct-web } }
        let mut type_stmt =
            tlv_bytes(0x06, &[0x04, 0x00, 0x8e, 0x46, 0x01, 0x06]);
        type_stmt.extend(tlv_bytes(
            0x30,
            &tlv_bytes(0x06, &[0x04, 0x00, 0x8e, 0x46, 0x01, 0x06, 0x03]),
        ));

        let mut stmts = tlv_bytes(0x30, &pds_stmt);
        stmts.extend(tlv_bytes(0x30, &type_stmt));
        let content = tlv_bytes(0x30, &stmts);
        let value = decode_value(QC_STATEMENTS, &content);

        let ExtensionValue::QcStatements(statements) = value else {
            panic!("expected QcStatements");
        };
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].id.label, "id-etsi-qcs-QcPDS");
        assert_eq!(
            statements[0].info,
            QcStatementInfo::PdsLocations(vec![PdsLocation {
                url: "https://example.com/pds".to_string(),
                language: "en".to_string(),
            }])
        );
        assert_eq!(statements[1].id.label, "id-etsi-qcs-QcType");
        let QcStatementInfo::Types(types) = &statements[1].info else {
            panic!("expected Types");
        };
        assert_eq!(types[0].label, "id-etsi-qct-web");
    }

    #[test]
    fn unknown_oid_falls_back_to_raw_hex() {
        let content = tlv_bytes(0x30, &tlv_bytes(0x02, &[0x01]));
        let value = decode_value("1.2.3.4", &content);
        assert_eq!(value, ExtensionValue::RawHex(hex::encode(&content)));
    }

    #[test]
    fn malformed_known_extension_falls_back_to_raw_hex() {
        // keyUsage whose content is not valid ASN.1
        let value = decode_value(KEY_USAGE, &[0xff, 0xff]);
        assert_eq!(value, ExtensionValue::RawHex("ffff".to_string()));
    }
}
