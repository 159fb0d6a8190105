// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked MessagePack writer over a caller-provided buffer.

use super::{WireError, WireResult};
use rmp::encode::{self, ValueWriteError};
use std::io;

/// Longest encoding the writer emits: a marker plus an 8-byte payload.
const MAX_VALUE_LEN: usize = 9;

type Staged = Result<(), ValueWriteError<io::Error>>;

/// Writes values sequentially into a fixed-capacity slice.
///
/// A value is either written whole or not at all; on `BufferExhausted` the
/// position is left before the value that did not fit.
pub struct WireWriter<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> WireWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    /// Encode one value into scratch space, then copy it out if it fits.
    fn put<F>(&mut self, emit: F) -> WireResult<()>
    where
        F: FnOnce(&mut &mut [u8]) -> Staged,
    {
        let mut scratch = [0u8; MAX_VALUE_LEN];
        let mut cursor: &mut [u8] = &mut scratch;
        emit(&mut cursor).map_err(|_| WireError::BufferExhausted {
            need: MAX_VALUE_LEN + 1,
            have: MAX_VALUE_LEN,
        })?;
        let need = MAX_VALUE_LEN - cursor.len();
        if need > self.remaining() {
            return Err(WireError::BufferExhausted {
                need,
                have: self.remaining(),
            });
        }
        self.buffer[self.offset..self.offset + need].copy_from_slice(&scratch[..need]);
        self.offset += need;
        Ok(())
    }

    pub fn write_array_len(&mut self, len: u32) -> WireResult<()> {
        self.put(|w| encode::write_array_len(w, len).map(drop))
    }

    /// Most compact unsigned form.
    pub fn write_uint(&mut self, value: u64) -> WireResult<()> {
        self.put(|w| encode::write_uint(w, value).map(drop))
    }

    /// Most compact form; non-negative values use the unsigned forms.
    pub fn write_int(&mut self, value: i64) -> WireResult<()> {
        self.put(|w| encode::write_sint(w, value).map(drop))
    }

    pub fn write_f32(&mut self, value: f32) -> WireResult<()> {
        self.put(|w| encode::write_f32(w, value))
    }

    pub fn write_f64(&mut self, value: f64) -> WireResult<()> {
        self.put(|w| encode::write_f64(w, value))
    }

    pub fn write_bool(&mut self, value: bool) -> WireResult<()> {
        self.put(|w| encode::write_bool(w, value).map_err(ValueWriteError::InvalidMarkerWrite))
    }
}
