// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire -> native memory.

use super::walk::{Direction, LengthField};
use super::TranscodeError;
use crate::native;
use crate::schema::{Column, WidthClass};
use crate::wire::{WireError, WireReader};

pub(crate) struct Decoder<'d, 'i> {
    destination: &'d mut [u8],
    input: WireReader<'i>,
}

impl<'d, 'i> Decoder<'d, 'i> {
    pub(crate) fn new(destination: &'d mut [u8], input: &'i [u8]) -> Self {
        Self {
            destination,
            input: WireReader::new(input),
        }
    }

    /// Bytes consumed.
    pub(crate) fn finish(self) -> usize {
        self.input.position()
    }

    fn read_header(&mut self, expected: impl FnOnce() -> String) -> Result<usize, TranscodeError> {
        match self.input.read_array_len() {
            Ok(len) => Ok(len),
            Err(WireError::UnexpectedShape { found, .. }) => Err(TranscodeError::ShapeMismatch {
                expected: expected(),
                found: found.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

impl Direction for Decoder<'_, '_> {
    fn number(&mut self, width: WidthClass, at: usize) -> Result<(), TranscodeError> {
        let value = match self.input.read_scalar() {
            Ok(value) => value,
            Err(WireError::UnexpectedShape { found, .. }) => {
                return Err(TranscodeError::ShapeMismatch {
                    expected: format!("{} scalar", width),
                    found: found.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        native::write(self.destination, at, width, value)
    }

    fn composite(&mut self, arity: usize) -> Result<(), TranscodeError> {
        let len = self.read_header(|| format!("composite of {}", arity))?;
        if len != arity {
            return Err(TranscodeError::ShapeMismatch {
                expected: format!("composite of {}", arity),
                found: format!("composite of {}", len),
            });
        }
        Ok(())
    }

    fn flexible(
        &mut self,
        column: &Column,
        length: LengthField,
        capacity: usize,
    ) -> Result<usize, TranscodeError> {
        // the arity must also fit the length field it is written back into
        let limit = match length.width.max_count() {
            Some(max) if max < capacity as u64 => max as usize,
            _ => capacity,
        };
        let expected = || format!("composite of at most {} for {}", limit, column.name());
        let len = self.read_header(expected)?;
        if len > limit {
            return Err(TranscodeError::ShapeMismatch {
                expected: expected(),
                found: format!("composite of {}", len),
            });
        }
        native::write_count(self.destination, length.at, length.width, len)?;
        Ok(len)
    }
}
