// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::tlv::DecodeError;

/// Sequential, bounds-checked reader over an immutable byte buffer.
///
/// Positions are absolute offsets into the original buffer even when
/// the cursor is restricted to the content range of a constructed
/// element, so every node decoded through it can report where in the
/// input it came from.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            end: buf.len(),
        }
    }

    /// A cursor over `[start, end)` of the same buffer. Offsets
    /// reported by the child cursor remain absolute.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            buf: self.buf,
            pos: start,
            end,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.end
    }

    /// The underlying buffer. Used to slice out full TLV spans for
    /// provenance once an element's extent is known.
    pub fn bytes(&self) -> &'a [u8] {
        self.buf
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        if self.pos >= self.end {
            return Err(DecodeError::Bounds { offset: self.pos });
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::Bounds { offset: self.pos });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}
