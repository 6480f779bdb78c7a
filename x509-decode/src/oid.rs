// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static lookup tables: dotted OID strings to human readable labels
//! and the keyUsage bit position names. Read-only, process-wide.

use serde::Serialize;
use std::fmt;

/// keyUsage BIT STRING position names, MSB first.
pub const KEY_USAGE_BITS: [&str; 9] = [
    "digitalSignature",
    "nonRepudiation",
    "keyEncipherment",
    "dataEncipherment",
    "keyAgreement",
    "keyCertSign",
    "cRLSign",
    "encipherOnly",
    "decipherOnly",
];

/// Total lookup: unrecognized input gets an `Unknown OID (...)` label
/// rather than an error.
pub fn label_of(oid: &str) -> String {
    match label(oid) {
        Some(label) => label.to_string(),
        None => format!("Unknown OID ({oid})"),
    }
}

fn label(oid: &str) -> Option<&'static str> {
    let label = match oid {
        // signature & public key algorithms
        "1.2.840.113549.1.1.1" => "rsaEncryption",
        "1.2.840.113549.1.1.4" => "md5WithRSAEncryption",
        "1.2.840.113549.1.1.5" => "sha1WithRSAEncryption",
        "1.2.840.113549.1.1.10" => "rsassaPss",
        "1.2.840.113549.1.1.11" => "sha256WithRSAEncryption",
        "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption",
        "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption",
        "1.2.840.10040.4.1" => "dsa",
        "1.2.840.10045.2.1" => "ecPublicKey",
        "1.2.840.10045.4.3.2" => "ecdsa-with-SHA256",
        "1.2.840.10045.4.3.3" => "ecdsa-with-SHA384",
        "1.2.840.10045.4.3.4" => "ecdsa-with-SHA512",
        "1.3.101.112" => "ed25519",
        "1.3.101.113" => "ed448",
        "1.2.840.10045.3.1.7" => "prime256v1",
        "1.3.132.0.34" => "secp384r1",
        "1.3.132.0.35" => "secp521r1",
        "2.16.840.1.101.3.4.2.1" => "sha256",
        "2.16.840.1.101.3.4.2.2" => "sha384",
        "2.16.840.1.101.3.4.2.3" => "sha512",

        // distinguished name attributes
        "2.5.4.3" => "commonName",
        "2.5.4.4" => "surname",
        "2.5.4.5" => "serialNumber",
        "2.5.4.6" => "countryName",
        "2.5.4.7" => "localityName",
        "2.5.4.8" => "stateOrProvinceName",
        "2.5.4.9" => "streetAddress",
        "2.5.4.10" => "organizationName",
        "2.5.4.11" => "organizationalUnitName",
        "2.5.4.12" => "title",
        "2.5.4.15" => "businessCategory",
        "2.5.4.17" => "postalCode",
        "2.5.4.42" => "givenName",
        "2.5.4.97" => "organizationIdentifier",
        "0.9.2342.19200300.100.1.1" => "userId",
        "0.9.2342.19200300.100.1.25" => "domainComponent",
        "1.2.840.113549.1.9.1" => "emailAddress",

        // certificate extensions
        "2.5.29.14" => "subjectKeyIdentifier",
        "2.5.29.15" => "keyUsage",
        "2.5.29.17" => "subjectAltName",
        "2.5.29.18" => "issuerAltName",
        "2.5.29.19" => "basicConstraints",
        "2.5.29.30" => "nameConstraints",
        "2.5.29.31" => "cRLDistributionPoints",
        "2.5.29.32" => "certificatePolicies",
        "2.5.29.35" => "authorityKeyIdentifier",
        "2.5.29.37" => "extKeyUsage",
        "1.3.6.1.5.5.7.1.1" => "authorityInfoAccess",
        "1.3.6.1.5.5.7.1.3" => "qcStatements",
        "1.3.6.1.4.1.11129.2.4.2" => "signedCertificateTimestampList",

        // extended key usage purposes
        "1.3.6.1.5.5.7.3.1" => "serverAuth",
        "1.3.6.1.5.5.7.3.2" => "clientAuth",
        "1.3.6.1.5.5.7.3.3" => "codeSigning",
        "1.3.6.1.5.5.7.3.4" => "emailProtection",
        "1.3.6.1.5.5.7.3.8" => "timeStamping",
        "1.3.6.1.5.5.7.3.9" => "OCSPSigning",

        // authority info access methods
        "1.3.6.1.5.5.7.48.1" => "ocsp",
        "1.3.6.1.5.5.7.48.2" => "caIssuers",

        // policy qualifiers & CA/Browser Forum policies
        "1.3.6.1.5.5.7.2.1" => "cps",
        "1.3.6.1.5.5.7.2.2" => "unotice",
        "2.23.140.1.1" => "ev-guidelines",
        "2.23.140.1.2.1" => "domain-validated",
        "2.23.140.1.2.2" => "organization-validated",
        "2.23.140.1.2.3" => "individual-validated",

        // ETSI qualified certificate statements
        "0.4.0.1862.1.1" => "id-etsi-qcs-QcCompliance",
        "0.4.0.1862.1.2" => "id-etsi-qcs-QcLimitValue",
        "0.4.0.1862.1.3" => "id-etsi-qcs-QcRetentionPeriod",
        "0.4.0.1862.1.4" => "id-etsi-qcs-QcSSCD",
        "0.4.0.1862.1.5" => "id-etsi-qcs-QcPDS",
        "0.4.0.1862.1.6" => "id-etsi-qcs-QcType",
        "0.4.0.1862.1.6.1" => "id-etsi-qct-esign",
        "0.4.0.1862.1.6.2" => "id-etsi-qct-eseal",
        "0.4.0.1862.1.6.3" => "id-etsi-qct-web",

        _ => return None,
    };
    Some(label)
}

/// A dotted OID paired with its resolved label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OidEntry {
    pub oid: String,
    pub label: String,
}

impl OidEntry {
    pub fn new(oid: impl Into<String>) -> Self {
        let oid = oid.into();
        let label = label_of(&oid);
        Self { oid, label }
    }
}

impl fmt::Display for OidEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_oid_labels() {
        assert_eq!(label_of("1.2.840.113549.1.1.1"), "rsaEncryption");
        assert_eq!(label_of("2.5.4.3"), "commonName");
        assert_eq!(label_of("2.5.29.15"), "keyUsage");
    }

    #[test]
    fn unknown_oid_gets_placeholder() {
        assert_eq!(label_of("1.2.3.4"), "Unknown OID (1.2.3.4)");
    }

    #[test]
    fn entry_display() {
        let entry = OidEntry::new("1.3.6.1.5.5.7.3.1");
        assert_eq!(entry.to_string(), "serverAuth (1.3.6.1.5.5.7.3.1)");
    }
}
