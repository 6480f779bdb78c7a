// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! X.509 structural mapper.
//!
//! Walks a decoded ASN.1 node tree assuming the RFC 5280 Certificate
//! schema. TBSCertificate fields are consumed positionally: ASN.1
//! SEQUENCE is ordered, not named, so a wrong shape at any position
//! is a fatal structural error. Extension content, by contrast, is
//! decoded best-effort (see the extension module).

use crate::extension::{self, Extension};
use crate::name::Name;
use crate::oid::OidEntry;
use crate::scalar::{Int, TimeValue, Value};
use crate::tlv::{DecodeError, Node, TagInfo};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CertError {
    #[error("input is empty")]
    EmptyInput,

    #[error("no ASN.1 element found in input")]
    NoElement,

    #[error("root element is not a SEQUENCE")]
    RootNotSequence,

    #[error("certificate SEQUENCE has {0} children, expected 3")]
    BadShape(usize),

    #[error("tbsCertificate is not a SEQUENCE")]
    TbsNotSequence,

    #[error("tbsCertificate is missing the {0} field")]
    MissingField(&'static str),

    #[error("{0} is not the expected shape")]
    BadField(&'static str),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("PEM: {0}")]
    Pem(String),
}

/// Where a decoded field came from: byte offset, hex of the full TLV
/// span and the tag it was decoded from. Attached to every field for
/// auditing; never used for equality or logic.
#[derive(Clone, Debug)]
pub struct Provenance {
    pub offset: usize,
    pub full_hex: String,
    pub tag: TagInfo,
}

impl Provenance {
    pub fn of(node: &Node) -> Self {
        Self {
            offset: node.offset,
            full_hex: node.full_hex.clone(),
            tag: node.tag.clone(),
        }
    }
}

/// A decoded value paired with its provenance.
#[derive(Clone, Debug)]
pub struct Sourced<T> {
    pub value: T,
    pub provenance: Provenance,
}

fn sourced<T>(value: T, node: &Node) -> Sourced<T> {
    Sourced {
        value,
        provenance: Provenance::of(node),
    }
}

#[derive(Clone, Debug)]
pub struct Validity {
    pub not_before: Sourced<TimeValue>,
    pub not_after: Sourced<TimeValue>,
}

#[derive(Clone, Debug)]
pub struct SubjectPublicKeyInfo {
    pub algorithm: OidEntry,
    /// Key material as hex, unused-bits byte stripped. Kept raw.
    pub key_hex: String,
}

/// Read-only view over one decoded certificate SEQUENCE.
#[derive(Clone, Debug)]
pub struct Certificate {
    /// 1, 2 or 3. An absent explicit version tag means 1.
    pub version: Sourced<u32>,
    /// Raw hex, arbitrary length.
    pub serial_number: Sourced<String>,
    /// Algorithm from the outer signatureAlgorithm field.
    pub signature_algorithm: Sourced<OidEntry>,
    /// Algorithm from inside TBSCertificate. Encoded twice in a
    /// certificate; both copies are captured independently.
    pub signature_algorithm_cert: Sourced<OidEntry>,
    pub issuer: Sourced<Name>,
    pub validity: Validity,
    pub subject: Sourced<Name>,
    pub subject_public_key_info: Sourced<SubjectPublicKeyInfo>,
    pub extensions: Vec<Extension>,
    /// Raw hex of the signature BIT STRING data.
    pub signature_value: Sourced<String>,
}

/// Map the root node of a decoded buffer to a [`Certificate`].
///
/// The root must be a SEQUENCE with exactly three children:
/// tbsCertificate, signatureAlgorithm and signatureValue.
pub fn map_certificate(root: &Node) -> Result<Certificate, CertError> {
    if !root.is_sequence() {
        return Err(CertError::RootNotSequence);
    }
    let children = root.children();
    if children.len() != 3 {
        return Err(CertError::BadShape(children.len()));
    }

    let tbs = &children[0];
    if !tbs.is_sequence() {
        return Err(CertError::TbsNotSequence);
    }

    let signature_algorithm = sourced(
        algorithm_identifier(&children[1], "signatureAlgorithm")?,
        &children[1],
    );
    let signature_value =
        sourced(bit_string_hex(&children[2]), &children[2]);

    let fields = tbs.children();
    let mut index = 0;

    // 1. optional explicit [0] version; absent means v1
    let version = match fields.first() {
        Some(node) if node.tag.is_context(0) && node.tag.constructed => {
            index += 1;
            let inner = node
                .children()
                .first()
                .ok_or(CertError::BadField("version"))?;
            let value = match inner.value() {
                Some(Value::Integer(Int::Small(v))) => v
                    .checked_add(1)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or(CertError::BadField("version"))?,
                _ => return Err(CertError::BadField("version")),
            };
            sourced(value, node)
        }
        _ => sourced(1, tbs),
    };

    // 2. serialNumber, kept as raw hex to preserve arbitrary precision
    let serial_node = next_field(fields, &mut index, "serialNumber")?;
    if !serial_node.tag.is_universal(2) {
        return Err(CertError::BadField("serialNumber"));
    }
    let serial_number = sourced(serial_node.content_hex(), serial_node);

    // 3. signature algorithm identifier (TBS copy)
    let alg_node = next_field(fields, &mut index, "signature")?;
    let signature_algorithm_cert =
        sourced(algorithm_identifier(alg_node, "signature")?, alg_node);

    // 4. issuer Name
    let issuer_node = next_field(fields, &mut index, "issuer")?;
    if !issuer_node.is_sequence() {
        return Err(CertError::BadField("issuer"));
    }
    let issuer = sourced(Name::from_node(issuer_node), issuer_node);

    // 5. validity: SEQUENCE of two time values
    let validity_node = next_field(fields, &mut index, "validity")?;
    let times = validity_node.children();
    let (Some(before_node), Some(after_node)) =
        (times.first(), times.get(1))
    else {
        return Err(CertError::BadField("validity"));
    };
    let validity = Validity {
        not_before: sourced(time_value(before_node), before_node),
        not_after: sourced(time_value(after_node), after_node),
    };

    // 6. subject Name
    let subject_node = next_field(fields, &mut index, "subject")?;
    if !subject_node.is_sequence() {
        return Err(CertError::BadField("subject"));
    }
    let subject = sourced(Name::from_node(subject_node), subject_node);

    // 7. subjectPublicKeyInfo: algorithm identifier then BIT STRING
    let spki_node = next_field(fields, &mut index, "subjectPublicKeyInfo")?;
    let spki = spki_node.children();
    let (Some(spki_alg), Some(spki_key)) = (spki.first(), spki.get(1)) else {
        return Err(CertError::BadField("subjectPublicKeyInfo"));
    };
    let subject_public_key_info = sourced(
        SubjectPublicKeyInfo {
            algorithm: algorithm_identifier(
                spki_alg,
                "subjectPublicKeyInfo",
            )?,
            key_hex: bit_string_hex(spki_key),
        },
        spki_node,
    );

    // 8. trailing optionals, scanned by context tag number. [3] holds
    // the extensions; [1]/[2] unique identifiers are not extracted.
    let mut extensions = Vec::new();
    for node in &fields[index..] {
        if node.tag.is_context(3) && node.tag.constructed {
            extensions = map_extensions(node);
        }
    }

    Ok(Certificate {
        version,
        serial_number,
        signature_algorithm,
        signature_algorithm_cert,
        issuer,
        validity,
        subject,
        subject_public_key_info,
        extensions,
        signature_value,
    })
}

fn next_field<'a>(
    fields: &'a [Node],
    index: &mut usize,
    name: &'static str,
) -> Result<&'a Node, CertError> {
    let node = fields.get(*index).ok_or(CertError::MissingField(name))?;
    *index += 1;
    Ok(node)
}

/// AlgorithmIdentifier: a SEQUENCE whose first child is the algorithm
/// OID. Parameters are not interpreted.
fn algorithm_identifier(
    node: &Node,
    field: &'static str,
) -> Result<OidEntry, CertError> {
    let oid = node
        .children()
        .first()
        .and_then(Node::oid)
        .ok_or(CertError::BadField(field))?;
    Ok(OidEntry::new(oid))
}

/// Hex of a BIT STRING's data bytes; falls back to the raw content
/// hex when the node is not a decoded BIT STRING.
fn bit_string_hex(node: &Node) -> String {
    match node.value() {
        Some(Value::BitString { hex, .. }) => hex.clone(),
        _ => node.content_hex(),
    }
}

fn time_value(node: &Node) -> TimeValue {
    match node.value() {
        Some(Value::Time(time)) => time.clone(),
        Some(other) => TimeValue::Raw(other.display_string()),
        None => TimeValue::Raw(String::from_utf8_lossy(node.raw()).into_owned()),
    }
}

/// The [3] wrapper holds one SEQUENCE of extension SEQUENCEs, each
/// `{extnID, [critical], extnValue}`. critical is present iff the
/// extension has three children; the value is always the last child.
fn map_extensions(wrapper: &Node) -> Vec<Extension> {
    let Some(list) = wrapper.children().first() else {
        return Vec::new();
    };

    let mut extensions = Vec::new();
    for ext in list.children() {
        let children = ext.children();
        let (Some(id_node), Some(value_node)) =
            (children.first(), children.last())
        else {
            continue;
        };
        let Some(oid) = id_node.oid() else {
            continue;
        };
        let critical = children.len() == 3
            && children.get(1).and_then(Node::boolean).unwrap_or(false);

        let oid = OidEntry::new(oid);
        let value = extension::decode_extension(&oid, value_node);
        extensions.push(Extension {
            oid,
            critical,
            value,
            provenance: Provenance::of(ext),
        });
    }
    extensions
}
