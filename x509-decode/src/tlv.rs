// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic ASN.1 tag-length-value decoder.
//!
//! Turns a raw byte buffer into a tree of [`Node`]s. Only
//! definite-length BER/DER is supported; indefinite lengths and
//! length fields wider than 4 bytes are rejected. The decoder is
//! strict about length accounting: a constructed node's children must
//! exactly fill its declared content range, and a declared length
//! that runs past the end of the buffer fails before any content is
//! read.

use crate::cursor::Cursor;
use crate::scalar::{self, Value};
use thiserror::Error;

/// Nesting deeper than this is rejected unless the caller overrides
/// [`DecodeOptions::max_depth`]. Keeps attacker-supplied nesting from
/// exhausting the call stack.
pub const MAX_DEPTH: usize = 64;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("read past end of buffer at offset {offset}")]
    Bounds { offset: usize },

    #[error(
        "element at offset {offset} declares {declared} content bytes \
         but only {remaining} remain"
    )]
    Truncated {
        offset: usize,
        declared: usize,
        remaining: usize,
    },

    #[error(
        "element at offset {offset} uses a {len_bytes} byte length \
         field, only 1-4 are supported"
    )]
    UnsupportedLength { offset: usize, len_bytes: usize },

    #[error("element at offset {offset} uses an indefinite length")]
    IndefiniteLength { offset: usize },

    #[error("element at offset {offset} uses a tag number wider than 32 bits")]
    OversizedTag { offset: usize },

    #[error("element at offset {offset} nests deeper than {max} levels")]
    DepthExceeded { offset: usize, max: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    fn from_first_byte(byte: u8) -> Self {
        match byte >> 6 {
            0b00 => TagClass::Universal,
            0b01 => TagClass::Application,
            0b10 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagClass::Universal => "UNIVERSAL",
            TagClass::Application => "APPLICATION",
            TagClass::ContextSpecific => "CONTEXT-SPECIFIC",
            TagClass::Private => "PRIVATE",
        }
    }
}

/// Type names for the UNIVERSAL tag numbers we can put a name to.
fn universal_type_name(number: u32) -> Option<&'static str> {
    let name = match number {
        0 => "EOC",
        1 => "BOOLEAN",
        2 => "INTEGER",
        3 => "BIT STRING",
        4 => "OCTET STRING",
        5 => "NULL",
        6 => "OBJECT IDENTIFIER",
        7 => "ObjectDescriptor",
        8 => "EXTERNAL",
        9 => "REAL",
        10 => "ENUMERATED",
        11 => "EMBEDDED PDV",
        12 => "UTF8String",
        13 => "RELATIVE-OID",
        16 => "SEQUENCE",
        17 => "SET",
        18 => "NumericString",
        19 => "PrintableString",
        20 => "T61String",
        21 => "VideotexString",
        22 => "IA5String",
        23 => "UTCTime",
        24 => "GeneralizedTime",
        25 => "GraphicString",
        26 => "VisibleString",
        27 => "GeneralString",
        28 => "UniversalString",
        29 => "CHARACTER STRING",
        30 => "BMPString",
        _ => return None,
    };
    Some(name)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagInfo {
    pub number: u32,
    pub class: TagClass,
    pub constructed: bool,
    /// Resolved type name for UNIVERSAL tags, best-effort label
    /// (e.g. `CONTEXT-SPECIFIC [0]`) otherwise.
    pub type_name: String,
}

impl TagInfo {
    fn new(number: u32, class: TagClass, constructed: bool) -> Self {
        let type_name = match class {
            TagClass::Universal => match universal_type_name(number) {
                Some(name) => name.to_string(),
                None => format!("UNIVERSAL [{number}]"),
            },
            _ => format!("{} [{number}]", class.name()),
        };
        Self {
            number,
            class,
            constructed,
            type_name,
        }
    }

    pub fn is_universal(&self, number: u32) -> bool {
        self.class == TagClass::Universal && self.number == number
    }

    pub fn is_context(&self, number: u32) -> bool {
        self.class == TagClass::ContextSpecific && self.number == number
    }
}

/// Declared content length plus the raw bytes of the length field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LengthInfo {
    pub value: usize,
    pub raw: Vec<u8>,
}

/// A node is leaf-only or constructed-only, never both.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Constructed(Vec<Node>),
    Primitive {
        raw: Vec<u8>,
        /// Decoded scalar for UNIVERSAL tags with a known decoding.
        /// `None` for context-specific primitives (schema-dependent,
        /// resolved by the X.509 layer) and for malformed scalars.
        value: Option<Value>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub tag: TagInfo,
    pub length: LengthInfo,
    pub content: Content,
    /// Starting byte position of the element in the original buffer.
    pub offset: usize,
    /// Hex of the complete TLV span, header included.
    pub full_hex: String,
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Constructed(children) => children,
            Content::Primitive { .. } => &[],
        }
    }

    /// Raw content bytes of a primitive node, empty for constructed.
    pub fn raw(&self) -> &[u8] {
        match &self.content {
            Content::Primitive { raw, .. } => raw,
            Content::Constructed(_) => &[],
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.content {
            Content::Primitive { value, .. } => value.as_ref(),
            Content::Constructed(_) => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        self.tag.is_universal(16) && self.tag.constructed
    }

    pub fn is_set(&self) -> bool {
        self.tag.is_universal(17) && self.tag.constructed
    }

    /// Dotted OID string if this node is an OBJECT IDENTIFIER.
    pub fn oid(&self) -> Option<&str> {
        match self.value() {
            Some(Value::Oid(oid)) => Some(oid),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self.value() {
            Some(Value::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn boolean(&self) -> Option<bool> {
        match self.value() {
            Some(Value::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Hex of the raw content bytes. Used for serial numbers, key
    /// material and other fields kept undecoded.
    pub fn content_hex(&self) -> String {
        hex::encode(self.raw())
    }
}

#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Decode elements until the buffer is exhausted; when false stop
    /// after the first element.
    pub decode_all: bool,
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            decode_all: true,
            max_depth: MAX_DEPTH,
        }
    }
}

/// Result of a top-level decode: whatever was decoded before the
/// first error, plus the error if one occurred.
#[derive(Debug)]
pub struct Decoded {
    pub nodes: Vec<Node>,
    pub errors: Vec<DecodeError>,
}

/// Decode elements from `buf` until exhaustion or the first error.
pub fn decode(buf: &[u8], opts: &DecodeOptions) -> Decoded {
    let mut cursor = Cursor::new(buf);
    let mut nodes = Vec::new();
    let mut errors = Vec::new();

    while !cursor.is_done() {
        match decode_element(&mut cursor, 0, opts.max_depth) {
            Ok(node) => nodes.push(node),
            Err(e) => {
                errors.push(e);
                break;
            }
        }
        if !opts.decode_all {
            break;
        }
    }

    Decoded { nodes, errors }
}

/// Decode exactly one element from the start of `buf`.
pub fn decode_single(buf: &[u8]) -> Result<Node, DecodeError> {
    let mut cursor = Cursor::new(buf);
    decode_element(&mut cursor, 0, MAX_DEPTH)
}

fn decode_element(
    cursor: &mut Cursor,
    depth: usize,
    max_depth: usize,
) -> Result<Node, DecodeError> {
    let start = cursor.position();
    if depth > max_depth {
        return Err(DecodeError::DepthExceeded {
            offset: start,
            max: max_depth,
        });
    }

    let first = cursor.read_byte()?;
    let class = TagClass::from_first_byte(first);
    let constructed = first & 0x20 != 0;
    let mut number = u32::from(first & 0x1f);
    if number == 0x1f {
        // multi-byte tag number, base-128 with continuation bit
        number = 0;
        loop {
            let byte = cursor.read_byte()?;
            // the next 7 bits must still fit in the accumulator
            if number > u32::MAX >> 7 {
                return Err(DecodeError::OversizedTag { offset: start });
            }
            number = (number << 7) | u32::from(byte & 0x7f);
            if byte & 0x80 == 0 {
                break;
            }
        }
    }
    let tag = TagInfo::new(number, class, constructed);

    let len_start = cursor.position();
    let len_first = cursor.read_byte()?;
    let length = if len_first & 0x80 == 0 {
        usize::from(len_first)
    } else {
        let count = usize::from(len_first & 0x7f);
        if count == 0 {
            return Err(DecodeError::IndefiniteLength { offset: start });
        }
        if count > 4 {
            return Err(DecodeError::UnsupportedLength {
                offset: start,
                len_bytes: count,
            });
        }
        let mut value = 0usize;
        for &byte in cursor.read_bytes(count)? {
            value = (value << 8) | usize::from(byte);
        }
        value
    };
    let length_raw = cursor.bytes()[len_start..cursor.position()].to_vec();

    // Check the declared length against the remaining buffer before
    // recursing or reading content.
    if length > cursor.remaining() {
        return Err(DecodeError::Truncated {
            offset: start,
            declared: length,
            remaining: cursor.remaining(),
        });
    }

    let content_start = cursor.position();
    let content_end = content_start + length;

    let content = if constructed {
        let mut children = Vec::new();
        let mut inner = cursor.slice(content_start, content_end);
        while !inner.is_done() {
            children.push(decode_element(&mut inner, depth + 1, max_depth)?);
        }
        Content::Constructed(children)
    } else {
        let raw = cursor.bytes()[content_start..content_end].to_vec();
        let value = if class == TagClass::Universal {
            scalar::decode(number, &raw)
        } else {
            None
        };
        Content::Primitive { raw, value }
    };

    // advance past the content we walked through above
    let _ = cursor.read_bytes(length)?;

    Ok(Node {
        tag,
        length: LengthInfo {
            value: length,
            raw: length_raw,
        },
        content,
        offset: start,
        full_hex: hex::encode(&cursor.bytes()[start..content_end]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_integer() {
        let buf = [0x02, 0x01, 0x2a];
        let node = decode_single(&buf).expect("decode INTEGER");

        assert!(node.tag.is_universal(2));
        assert!(!node.tag.constructed);
        assert_eq!(node.tag.type_name, "INTEGER");
        assert_eq!(node.length.value, 1);
        assert_eq!(node.length.raw, vec![0x01]);
        assert_eq!(node.offset, 0);
        assert_eq!(node.full_hex, "02012a");
    }

    #[test]
    fn constructed_children_fill_content_range() {
        // SEQUENCE { INTEGER 1, INTEGER 2 }
        let buf = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02];
        let node = decode_single(&buf).expect("decode SEQUENCE");

        assert!(node.is_sequence());
        let children = node.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].offset, 2);
        assert_eq!(children[1].offset, 5);
    }

    #[test]
    fn sibling_offsets_are_contiguous() {
        // three INTEGERs back to back
        let buf = [0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0xff, 0x02, 0x01, 0x03];
        let decoded = decode(&buf, &DecodeOptions::default());

        assert!(decoded.errors.is_empty());
        assert_eq!(decoded.nodes.len(), 3);
        let mut expected = 0;
        for node in &decoded.nodes {
            assert_eq!(node.offset, expected);
            // header = tag byte + length field
            expected += 1 + node.length.raw.len() + node.length.value;
        }
        assert_eq!(expected, buf.len());
    }

    #[test]
    fn decode_all_false_stops_after_first() {
        let buf = [0x02, 0x01, 0x01, 0x02, 0x01, 0x02];
        let opts = DecodeOptions {
            decode_all: false,
            ..Default::default()
        };
        let decoded = decode(&buf, &opts);

        assert_eq!(decoded.nodes.len(), 1);
        assert!(decoded.errors.is_empty());
    }

    #[test]
    fn multi_byte_tag_number() {
        // context-specific primitive, tag number 0x1234 = 0b10_0100_0110100
        let buf = [0x9f, 0xa4, 0x34, 0x01, 0xab];
        let node = decode_single(&buf).expect("decode multi-byte tag");

        assert_eq!(node.tag.number, 0x1234);
        assert_eq!(node.tag.class, TagClass::ContextSpecific);
        assert_eq!(node.raw(), &[0xab]);
    }

    #[test]
    fn tag_number_wider_than_u32_rejected() {
        // five continuation bytes carry 35 significant bits
        let buf = [0x9f, 0xff, 0xff, 0xff, 0xff, 0x7f, 0x00];
        assert_eq!(
            decode_single(&buf),
            Err(DecodeError::OversizedTag { offset: 0 })
        );
    }

    #[test]
    fn long_form_length() {
        let mut buf = vec![0x04, 0x81, 0x80];
        buf.extend(std::iter::repeat(0x5a).take(0x80));
        let node = decode_single(&buf).expect("decode long-form length");

        assert_eq!(node.length.value, 0x80);
        assert_eq!(node.length.raw, vec![0x81, 0x80]);
        assert_eq!(node.raw().len(), 0x80);
    }

    #[test]
    fn truncated_element_names_start_offset() {
        // INTEGER at offset 3 declares 5 content bytes, only 1 left
        let buf = [0x02, 0x01, 0x01, 0x02, 0x05, 0xff];
        let decoded = decode(&buf, &DecodeOptions::default());

        assert_eq!(decoded.nodes.len(), 1);
        assert_eq!(
            decoded.errors,
            vec![DecodeError::Truncated {
                offset: 3,
                declared: 5,
                remaining: 1
            }]
        );
    }

    #[test]
    fn indefinite_length_rejected() {
        let buf = [0x30, 0x80, 0x00, 0x00];
        assert_eq!(
            decode_single(&buf),
            Err(DecodeError::IndefiniteLength { offset: 0 })
        );
    }

    #[test]
    fn oversized_length_field_rejected() {
        let buf = [0x04, 0x85, 0x01, 0x01, 0x01, 0x01, 0x01];
        assert_eq!(
            decode_single(&buf),
            Err(DecodeError::UnsupportedLength {
                offset: 0,
                len_bytes: 5
            })
        );
    }

    #[test]
    fn nesting_depth_is_bounded() {
        // SEQUENCEs nested 8 deep around one INTEGER
        let mut buf = vec![0x02, 0x01, 0x01];
        for _ in 0..8 {
            let mut outer = vec![0x30, buf.len() as u8];
            outer.extend_from_slice(&buf);
            buf = outer;
        }

        let mut cursor = Cursor::new(&buf);
        assert_eq!(
            decode_element(&mut cursor, 0, 4),
            Err(DecodeError::DepthExceeded { offset: 10, max: 4 })
        );
        assert!(decode_single(&buf).is_ok());
    }

    #[test]
    fn context_specific_primitive_stays_raw() {
        let buf = [0x82, 0x03, 0x66, 0x6f, 0x6f];
        let node = decode_single(&buf).expect("decode [2] primitive");

        assert!(node.tag.is_context(2));
        assert_eq!(node.value(), None);
        assert_eq!(node.raw(), b"foo");
        assert_eq!(node.tag.type_name, "CONTEXT-SPECIFIC [2]");
    }
}
