// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Self-contained ASN.1 BER/DER decoder and X.509 certificate
//! inspector.
//!
//! The crate is a two-layer decoder. The `tlv` module turns raw bytes
//! into a generic node tree; the `cert` module walks that tree per
//! the X.509 schema, re-entering the TLV decoder on nested extension
//! payloads. Decoding only inspects structure: no signature
//! verification, no chain building, no trust decisions.

pub mod cert;
pub mod cursor;
pub mod encoding;
pub mod extension;
pub mod name;
pub mod oid;
pub mod scalar;
pub mod simplify;
pub mod tlv;

pub use crate::cert::{
    map_certificate, CertError, Certificate, Provenance, Sourced,
};
pub use crate::extension::{Extension, ExtensionValue};
pub use crate::name::{GeneralName, Name};
pub use crate::simplify::{
    render_json, render_text, simplify, SimplifiedCertificate,
};
pub use crate::tlv::{
    decode, decode_single, DecodeError, DecodeOptions, Decoded, Node,
};

use log::info;

/// Decode one certificate from PEM or raw DER input. PEM input with
/// multiple blocks yields the first.
pub fn decode_one(input: &[u8]) -> Result<Certificate, CertError> {
    if input.is_empty() {
        return Err(CertError::EmptyInput);
    }
    if encoding::looks_like_pem(input) {
        // looks_like_pem only matches valid UTF-8
        let text = std::str::from_utf8(input)
            .map_err(|e| CertError::Pem(e.to_string()))?;
        let der = encoding::pem_blocks(text)?
            .into_iter()
            .next()
            .ok_or(CertError::NoElement)?;
        decode_der(&der)
    } else {
        decode_der(input)
    }
}

/// Decode every certificate in the input. PEM blocks are decoded
/// independently and any block failure fails the call; raw DER input
/// holds exactly one certificate.
pub fn decode_all(input: &[u8]) -> Result<Vec<Certificate>, CertError> {
    if input.is_empty() {
        return Err(CertError::EmptyInput);
    }
    if encoding::looks_like_pem(input) {
        let text = std::str::from_utf8(input)
            .map_err(|e| CertError::Pem(e.to_string()))?;
        let blocks = encoding::pem_blocks(text)?;
        info!("input holds {} PEM block(s)", blocks.len());
        if blocks.is_empty() {
            return Err(CertError::NoElement);
        }
        blocks.iter().map(|der| decode_der(der)).collect()
    } else {
        Ok(vec![decode_der(input)?])
    }
}

fn decode_der(der: &[u8]) -> Result<Certificate, CertError> {
    if der.is_empty() {
        return Err(CertError::EmptyInput);
    }
    let opts = DecodeOptions {
        decode_all: false,
        ..Default::default()
    };
    let decoded = tlv::decode(der, &opts);
    match decoded.nodes.first() {
        Some(root) => map_certificate(root),
        None => match decoded.errors.into_iter().next() {
            Some(e) => Err(e.into()),
            None => Err(CertError::NoElement),
        },
    }
}
