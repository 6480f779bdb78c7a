// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoders for primitive ASN.1 values.
//!
//! These are pure functions from raw content bytes to a typed
//! [`Value`]. A malformed scalar never fails the surrounding
//! structural decode: decoders either fall back to a string form of
//! the input or return `None` so the node keeps its raw bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

/// Decoded INTEGER / ENUMERATED. Values wider than 16 content bytes
/// (RSA moduli, some serial numbers) are preserved as hex instead of
/// being squeezed into a native integer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Int {
    Small(i128),
    Big(String),
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Int::Small(value) => write!(f, "{value}"),
            Int::Big(hex) => write!(f, "0x{hex}"),
        }
    }
}

/// A time value that either parsed cleanly or is carried as the raw
/// string from the certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeValue {
    Parsed(DateTime<Utc>),
    Raw(String),
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeValue::Parsed(dt) => {
                write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ"))
            }
            TimeValue::Raw(raw) => write!(f, "{raw}"),
        }
    }
}

/// Decoded leaf payload of a primitive node.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(Int),
    /// BIT STRING: unused trailing bit count plus the data as hex.
    BitString { unused_bits: u8, hex: String },
    /// OCTET STRING content as base64. Not decoded further here;
    /// callers that know the schema re-decode it.
    Bytes(String),
    Oid(String),
    Text(String),
    Time(TimeValue),
    Real(f64),
    Null,
}

impl Value {
    /// Single-line rendering, used for RDN values and qualifier text.
    pub fn display_string(&self) -> String {
        match self {
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::BitString { hex, .. } => hex.clone(),
            Value::Bytes(b64) => b64.clone(),
            Value::Oid(oid) => oid.clone(),
            Value::Text(text) => text.clone(),
            Value::Time(time) => time.to_string(),
            Value::Real(r) => r.to_string(),
            Value::Null => "NULL".to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(Int::Small(i)) => match i64::try_from(*i) {
                Ok(small) => serde_json::Value::from(small),
                Err(_) => serde_json::Value::from(i.to_string()),
            },
            Value::Integer(Int::Big(hex)) => {
                serde_json::Value::from(format!("0x{hex}"))
            }
            Value::Real(r) if r.is_finite() => serde_json::Value::from(*r),
            Value::Null => serde_json::Value::Null,
            other => serde_json::Value::from(other.display_string()),
        }
    }
}

/// Decode the content bytes of a primitive UNIVERSAL element. Returns
/// `None` for tags with no scalar decoding (the node keeps its raw
/// bytes) and for malformed OIDs.
pub(crate) fn decode(tag_number: u32, raw: &[u8]) -> Option<Value> {
    match tag_number {
        1 => Some(decode_boolean(raw)),
        2 | 10 => Some(Value::Integer(decode_integer(raw))),
        3 => Some(decode_bit_string(raw)),
        4 => Some(Value::Bytes(STANDARD.encode(raw))),
        5 => Some(Value::Null),
        6 => decode_oid(raw).map(Value::Oid),
        9 => Some(decode_real(raw)),
        12 | 18..=22 | 25..=27 | 30 => {
            Some(Value::Text(String::from_utf8_lossy(raw).into_owned()))
        }
        23 => {
            let text = String::from_utf8_lossy(raw);
            Some(Value::Time(decode_utc_time(&text)))
        }
        24 => {
            let text = String::from_utf8_lossy(raw);
            Some(Value::Time(decode_generalized_time(&text)))
        }
        _ => None,
    }
}

/// Lenient BOOLEAN: exactly one nonzero byte is true, anything else
/// (wrong length included) is false.
pub fn decode_boolean(raw: &[u8]) -> Value {
    Value::Boolean(raw.len() == 1 && raw[0] != 0)
}

/// Big-endian two's complement over the full byte string.
pub fn decode_integer(raw: &[u8]) -> Int {
    if raw.is_empty() {
        return Int::Small(0);
    }
    if raw.len() > 16 {
        return Int::Big(hex::encode(raw));
    }
    // sign comes from the high bit of the first byte
    let mut value = i128::from(raw[0] as i8);
    for &byte in &raw[1..] {
        value = (value << 8) | i128::from(byte);
    }
    Int::Small(value)
}

pub fn decode_bit_string(raw: &[u8]) -> Value {
    match raw.split_first() {
        Some((&unused_bits, data)) => Value::BitString {
            unused_bits,
            hex: hex::encode(data),
        },
        None => Value::BitString {
            unused_bits: 0,
            hex: String::new(),
        },
    }
}

/// Dotted OID string from the base-128 arc encoding. Returns `None`
/// on an empty input or an arc cut off mid-encoding.
pub fn decode_oid(raw: &[u8]) -> Option<String> {
    let (&first, rest) = raw.split_first()?;
    let mut arcs = vec![u64::from(first / 40), u64::from(first % 40)];

    let mut arc: u64 = 0;
    let mut mid_arc = false;
    for &byte in rest {
        arc = (arc << 7) | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            arcs.push(arc);
            arc = 0;
            mid_arc = false;
        } else {
            mid_arc = true;
        }
    }
    if mid_arc {
        return None;
    }

    let arcs: Vec<String> = arcs.iter().map(|a| a.to_string()).collect();
    Some(arcs.join("."))
}

/// REAL: the special byte encodings, the binary form, or an ASCII
/// decimal literal. Anything unparseable comes back as text.
pub fn decode_real(raw: &[u8]) -> Value {
    let Some((&first, rest)) = raw.split_first() else {
        return Value::Real(0.0);
    };

    if first & 0x80 != 0 {
        return decode_binary_real(first, rest)
            .unwrap_or_else(|| text_fallback(raw));
    }

    if first & 0x40 != 0 {
        return match first {
            0x40 => Value::Real(f64::INFINITY),
            0x41 => Value::Real(f64::NEG_INFINITY),
            0x42 => Value::Real(f64::NAN),
            0x43 => Value::Real(-0.0),
            _ => text_fallback(raw),
        };
    }

    // decimal form: the bytes are an ASCII literal, possibly behind a
    // one byte representation marker
    let text = String::from_utf8_lossy(raw);
    if let Ok(value) = text.trim().parse::<f64>() {
        return Value::Real(value);
    }
    let body = String::from_utf8_lossy(rest);
    match body.trim().parse::<f64>() {
        Ok(value) => Value::Real(value),
        Err(_) => text_fallback(raw),
    }
}

fn decode_binary_real(first: u8, rest: &[u8]) -> Option<Value> {
    let sign = if first & 0x40 != 0 { -1.0 } else { 1.0 };
    let base = match (first >> 4) & 0x03 {
        0b00 => 2.0f64,
        0b01 => 8.0,
        0b10 => 16.0,
        _ => return None,
    };
    let scale = i32::from((first >> 2) & 0x03);
    let exp_len = usize::from(first & 0x03) + 1;
    if rest.len() < exp_len + 1 {
        return None;
    }

    let exponent = match decode_integer(&rest[..exp_len]) {
        Int::Small(e) => e as f64,
        Int::Big(_) => return None,
    };
    let mut mantissa = 0.0f64;
    for &byte in &rest[exp_len..] {
        mantissa = mantissa * 256.0 + f64::from(byte);
    }

    let value =
        sign * mantissa * 2.0f64.powi(scale * 3) * base.powf(exponent);
    Some(Value::Real(value))
}

fn text_fallback(raw: &[u8]) -> Value {
    Value::Text(String::from_utf8_lossy(raw).into_owned())
}

/// UTCTime `YYMMDDhhmm[ss]Z`. Two-digit years below 50 land in 20xx,
/// the rest in 19xx. Only the UTC (`Z`) form is supported; local
/// offset forms come back as the raw string.
pub fn decode_utc_time(text: &str) -> TimeValue {
    parse_time(text, false)
        .map(TimeValue::Parsed)
        .unwrap_or_else(|| TimeValue::Raw(text.to_string()))
}

/// GeneralizedTime `YYYYMMDDhhmm[ss]Z`, four-digit year, `Z` only.
pub fn decode_generalized_time(text: &str) -> TimeValue {
    parse_time(text, true)
        .map(TimeValue::Parsed)
        .unwrap_or_else(|| TimeValue::Raw(text.to_string()))
}

fn parse_time(text: &str, four_digit_year: bool) -> Option<DateTime<Utc>> {
    let body = text.strip_suffix('Z')?;
    if !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year_len = if four_digit_year { 4 } else { 2 };
    let with_seconds = year_len + 10;
    if body.len() != year_len + 8 && body.len() != with_seconds {
        return None;
    }

    let year: i32 = body[..year_len].parse().ok()?;
    let year = if four_digit_year {
        year
    } else if year < 50 {
        2000 + year
    } else {
        1900 + year
    };

    let field = |start: usize| -> Option<u32> {
        body[year_len + start..year_len + start + 2].parse().ok()
    };
    let month = field(0)?;
    let day = field(2)?;
    let hour = field(4)?;
    let minute = field(6)?;
    let second = if body.len() == with_seconds { field(8)? } else { 0 };

    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_is_lenient() {
        assert_eq!(decode_boolean(&[0xff]), Value::Boolean(true));
        assert_eq!(decode_boolean(&[0x01]), Value::Boolean(true));
        assert_eq!(decode_boolean(&[0x00]), Value::Boolean(false));
        assert_eq!(decode_boolean(&[]), Value::Boolean(false));
        assert_eq!(decode_boolean(&[0x01, 0x01]), Value::Boolean(false));
    }

    #[test]
    fn integer_twos_complement() {
        assert_eq!(decode_integer(&[0x00]), Int::Small(0));
        assert_eq!(decode_integer(&[0x7f]), Int::Small(127));
        assert_eq!(decode_integer(&[0x80]), Int::Small(-128));
        assert_eq!(decode_integer(&[0xff]), Int::Small(-1));
        assert_eq!(decode_integer(&[0x00, 0xff]), Int::Small(255));
        assert_eq!(decode_integer(&[0xff, 0x7f]), Int::Small(-129));
        assert_eq!(decode_integer(&[0x01, 0x00, 0x00]), Int::Small(65536));
    }

    #[test]
    fn integer_wider_than_native_keeps_hex() {
        let raw = [0x5a; 24];
        assert_eq!(decode_integer(&raw), Int::Big(hex::encode(raw)));
    }

    #[test]
    fn oid_rsa_encryption() {
        let raw = [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];
        assert_eq!(decode_oid(&raw).as_deref(), Some("1.2.840.113549.1.1.1"));
    }

    #[test]
    fn oid_first_byte_splits_into_two_arcs() {
        assert_eq!(decode_oid(&[0x55, 0x04, 0x03]).as_deref(), Some("2.5.4.3"));
        assert_eq!(decode_oid(&[0x2b, 0x65, 0x70]).as_deref(), Some("1.3.101.112"));
    }

    #[test]
    fn oid_truncated_arc_is_rejected() {
        assert_eq!(decode_oid(&[]), None);
        assert_eq!(decode_oid(&[0x2a, 0x86]), None);
    }

    #[test]
    fn bit_string_splits_unused_count() {
        assert_eq!(
            decode_bit_string(&[0x04, 0xde, 0xad, 0xb0]),
            Value::BitString {
                unused_bits: 4,
                hex: "deadb0".to_string()
            }
        );
    }

    #[test]
    fn utc_time_century_pivot() {
        assert_eq!(
            decode_utc_time("230101120000Z"),
            TimeValue::Parsed(
                Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap()
            )
        );
        assert_eq!(
            decode_utc_time("700101000000Z"),
            TimeValue::Parsed(
                Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
            )
        );
        assert_eq!(
            decode_utc_time("490101000000Z"),
            TimeValue::Parsed(
                Utc.with_ymd_and_hms(2049, 1, 1, 0, 0, 0).unwrap()
            )
        );
    }

    #[test]
    fn utc_time_seconds_are_optional() {
        assert_eq!(
            decode_utc_time("2301011200Z"),
            TimeValue::Parsed(
                Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap()
            )
        );
    }

    #[test]
    fn utc_time_offset_form_stays_raw() {
        assert_eq!(
            decode_utc_time("230101120000+0100"),
            TimeValue::Raw("230101120000+0100".to_string())
        );
    }

    #[test]
    fn generalized_time_four_digit_year() {
        assert_eq!(
            decode_generalized_time("99991231235959Z"),
            TimeValue::Parsed(
                Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap()
            )
        );
        assert_eq!(
            decode_generalized_time("bogus"),
            TimeValue::Raw("bogus".to_string())
        );
    }

    #[test]
    fn real_specials() {
        assert_eq!(decode_real(&[0x40]), Value::Real(f64::INFINITY));
        assert_eq!(decode_real(&[0x41]), Value::Real(f64::NEG_INFINITY));
        assert!(matches!(decode_real(&[0x42]), Value::Real(v) if v.is_nan()));
        assert!(
            matches!(decode_real(&[0x43]), Value::Real(v) if v == 0.0 && v.is_sign_negative())
        );
    }

    #[test]
    fn real_binary_base_two() {
        // base 2, scale 0, 1 exponent byte: 3 * 2^2 = 12
        assert_eq!(decode_real(&[0x80, 0x02, 0x03]), Value::Real(12.0));
        // negative mantissa sign bit: -1 * 2^0
        assert_eq!(decode_real(&[0xc0, 0x00, 0x01]), Value::Real(-1.0));
    }

    #[test]
    fn real_binary_base_sixteen() {
        // base 16, scale 0: 1 * 16^1 = 16
        assert_eq!(decode_real(&[0xa0, 0x01, 0x01]), Value::Real(16.0));
    }

    #[test]
    fn real_decimal_literal() {
        assert_eq!(decode_real(b"\x03-1.5"), Value::Real(-1.5));
        assert_eq!(decode_real(&[]), Value::Real(0.0));
    }

    #[test]
    fn octet_string_exposed_as_base64() {
        assert_eq!(
            decode(4, &[0x01, 0x02, 0x03]),
            Some(Value::Bytes("AQID".to_string()))
        );
    }
}
