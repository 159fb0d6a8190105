// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native memory -> wire.

use super::walk::{Direction, LengthField};
use super::TranscodeError;
use crate::native;
use crate::schema::{Column, WidthClass};
use crate::wire::{Scalar, WireWriter};

pub(crate) struct Encoder<'s, 'o> {
    source: &'s [u8],
    out: WireWriter<'o>,
}

impl<'s, 'o> Encoder<'s, 'o> {
    pub(crate) fn new(source: &'s [u8], out: &'o mut [u8]) -> Self {
        Self {
            source,
            out: WireWriter::new(out),
        }
    }

    /// Bytes written.
    pub(crate) fn finish(self) -> usize {
        self.out.position()
    }

    fn write_header(&mut self, arity: usize) -> Result<(), TranscodeError> {
        let len = u32::try_from(arity).map_err(|_| TranscodeError::ArityTooLarge { arity })?;
        self.out.write_array_len(len)?;
        Ok(())
    }
}

impl Direction for Encoder<'_, '_> {
    fn number(&mut self, width: WidthClass, at: usize) -> Result<(), TranscodeError> {
        match native::read(self.source, at, width)? {
            Scalar::Int(v) => self.out.write_int(v)?,
            Scalar::UInt(v) => self.out.write_uint(v)?,
            Scalar::F32(v) => self.out.write_f32(v)?,
            Scalar::F64(v) => self.out.write_f64(v)?,
            Scalar::Bool(v) => self.out.write_bool(v)?,
        }
        Ok(())
    }

    fn composite(&mut self, arity: usize) -> Result<(), TranscodeError> {
        self.write_header(arity)
    }

    fn flexible(
        &mut self,
        column: &Column,
        length: LengthField,
        capacity: usize,
    ) -> Result<usize, TranscodeError> {
        let count = native::read_count(self.source, length.at, length.width)?;
        let count = match usize::try_from(count) {
            Ok(count) if count <= capacity => count,
            _ => {
                return Err(TranscodeError::CountExceedsCapacity {
                    column: column.name().to_string(),
                    count,
                    capacity,
                })
            }
        };
        self.write_header(count)?;
        Ok(count)
    }
}
