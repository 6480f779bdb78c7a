// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PEM/DER framing.
//!
//! Input holding one or more `-----BEGIN CERTIFICATE-----` blocks is
//! split into per-block DER buffers; anything else is treated as a
//! single raw DER certificate by the callers in lib.rs.

use crate::cert::CertError;

pub const PEM_CERT_TAG: &str = "CERTIFICATE";

const BEGIN_BOUNDARY: &str = "-----BEGIN CERTIFICATE-----";
const END_BOUNDARY: &str = "-----END CERTIFICATE-----";

/// True when the input is text carrying at least one certificate
/// PEM envelope.
pub fn looks_like_pem(input: &[u8]) -> bool {
    match std::str::from_utf8(input) {
        Ok(text) => text.contains(BEGIN_BOUNDARY),
        Err(_) => false,
    }
}

/// Split concatenated PEM text into its CERTIFICATE blocks and decode
/// each base64 body to DER independently.
pub fn pem_blocks(text: &str) -> Result<Vec<Vec<u8>>, CertError> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut inside = false;

    for line in text.lines() {
        let line = line.trim();
        if line.contains(BEGIN_BOUNDARY) {
            inside = true;
            current.clear();
        }
        if inside {
            current.push_str(line);
            current.push('\n');
        }
        if line.contains(END_BOUNDARY) {
            inside = false;
            let (label, der) = pem_rfc7468::decode_vec(current.as_bytes())
                .map_err(|e| CertError::Pem(e.to_string()))?;
            if label != PEM_CERT_TAG {
                return Err(CertError::Pem(format!(
                    "unexpected PEM label {label}"
                )));
            }
            blocks.push(der);
        }
    }

    Ok(blocks)
}
