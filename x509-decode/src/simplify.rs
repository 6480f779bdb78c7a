// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Provenance-stripping projections and rendering.
//!
//! Nothing here decodes anything: these types are plain views over an
//! already decoded tree or certificate, suitable for serde output or
//! text display.

use crate::cert::Certificate;
use crate::tlv::{Content, Node};
use serde::Serialize;
use std::fmt::Write;

/// Minimal projection of a generic ASN.1 node.
#[derive(Debug, Serialize)]
pub struct SimplifiedNode {
    #[serde(rename = "type")]
    pub type_name: String,
    pub class: &'static str,
    pub offset: usize,
    pub value: serde_json::Value,
}

pub fn simplify_node(node: &Node) -> SimplifiedNode {
    let value = match &node.content {
        Content::Constructed(children) => {
            let items: Vec<serde_json::Value> = children
                .iter()
                .map(|child| {
                    serde_json::to_value(simplify_node(child))
                        .unwrap_or_default()
                })
                .collect();
            serde_json::Value::Array(items)
        }
        Content::Primitive { raw, value } => match value {
            Some(value) => value.to_json(),
            None => serde_json::Value::from(hex::encode(raw)),
        },
    };

    SimplifiedNode {
        type_name: node.tag.type_name.clone(),
        class: node.tag.class.name(),
        offset: node.offset,
        value,
    }
}

#[derive(Debug, Serialize)]
pub struct SimplifiedExtension {
    pub oid: String,
    pub name: String,
    pub critical: bool,
    pub value: serde_json::Value,
}

/// A certificate with provenance stripped: only semantic values,
/// ready for JSON or text output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedCertificate {
    pub version: u32,
    pub serial_number: String,
    pub signature_algorithm: String,
    pub signature_algorithm_cert: String,
    pub issuer: String,
    pub subject: String,
    pub not_before: String,
    pub not_after: String,
    pub public_key_algorithm: String,
    pub public_key: String,
    pub extensions: Vec<SimplifiedExtension>,
    pub signature: String,
}

pub fn simplify(cert: &Certificate) -> SimplifiedCertificate {
    SimplifiedCertificate {
        version: cert.version.value,
        serial_number: cert.serial_number.value.clone(),
        signature_algorithm: cert.signature_algorithm.value.to_string(),
        signature_algorithm_cert: cert
            .signature_algorithm_cert
            .value
            .to_string(),
        issuer: cert.issuer.value.formatted.clone(),
        subject: cert.subject.value.formatted.clone(),
        not_before: cert.validity.not_before.value.to_string(),
        not_after: cert.validity.not_after.value.to_string(),
        public_key_algorithm: cert
            .subject_public_key_info
            .value
            .algorithm
            .to_string(),
        public_key: cert.subject_public_key_info.value.key_hex.clone(),
        extensions: cert
            .extensions
            .iter()
            .map(|ext| SimplifiedExtension {
                oid: ext.oid.oid.clone(),
                name: ext.oid.label.clone(),
                critical: ext.critical,
                value: ext.value.to_json(),
            })
            .collect(),
        signature: cert.signature_value.value.clone(),
    }
}

/// openssl-style indented text rendering.
pub fn render_text(cert: &SimplifiedCertificate) -> String {
    let mut out = String::new();

    // writing to a String cannot fail
    let _ = writeln!(out, "Certificate:");
    let _ = writeln!(out, "    Version: {}", cert.version);
    let _ = writeln!(out, "    Serial Number: {}", cert.serial_number);
    let _ = writeln!(
        out,
        "    Signature Algorithm: {}",
        cert.signature_algorithm
    );
    let _ = writeln!(out, "    Issuer: {}", cert.issuer);
    let _ = writeln!(out, "    Validity:");
    let _ = writeln!(out, "        Not Before: {}", cert.not_before);
    let _ = writeln!(out, "        Not After:  {}", cert.not_after);
    let _ = writeln!(out, "    Subject: {}", cert.subject);
    let _ = writeln!(out, "    Subject Public Key Info:");
    let _ = writeln!(
        out,
        "        Algorithm: {}",
        cert.public_key_algorithm
    );
    let _ = writeln!(out, "        Public Key: {}", cert.public_key);

    if !cert.extensions.is_empty() {
        let _ = writeln!(out, "    Extensions:");
        for ext in &cert.extensions {
            let critical = if ext.critical { " critical" } else { "" };
            let _ = writeln!(
                out,
                "        {} ({}){critical}:",
                ext.name, ext.oid
            );
            let _ = writeln!(out, "            {}", ext.value);
        }
    }
    let _ = writeln!(out, "    Signature: {}", cert.signature);

    out
}

/// Pretty-printed JSON for a list of certificates.
pub fn render_json(
    certs: &[SimplifiedCertificate],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(certs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv;

    #[test]
    fn simplified_node_keeps_type_and_offset() {
        // SEQUENCE { INTEGER 5 }
        let buf = [0x30, 0x03, 0x02, 0x01, 0x05];
        let node = tlv::decode_single(&buf).expect("decode");
        let simple = simplify_node(&node);

        assert_eq!(simple.type_name, "SEQUENCE");
        assert_eq!(simple.class, "UNIVERSAL");
        assert_eq!(simple.offset, 0);
        let json = serde_json::to_value(&simple).expect("serialize");
        assert_eq!(json["value"][0]["type"], "INTEGER");
        assert_eq!(json["value"][0]["value"], 5);
    }

    #[test]
    fn undecoded_primitive_renders_as_hex() {
        let buf = [0x85, 0x02, 0xab, 0xcd];
        let node = tlv::decode_single(&buf).expect("decode");
        let simple = simplify_node(&node);

        assert_eq!(simple.class, "CONTEXT-SPECIFIC");
        assert_eq!(simple.value, serde_json::Value::from("abcd"));
    }
}
