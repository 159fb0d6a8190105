// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked MessagePack reader.

use super::{Scalar, Shape, WireError, WireResult};
use rmp::decode::{self, NumValueReadError, ValueReadError};
use rmp::Marker;
use std::io;

/// Reads values sequentially from the front of an input slice.
pub struct WireReader<'a> {
    buffer: &'a [u8],
    rest: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            rest: buffer,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.buffer.len() - self.rest.len()
    }

    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    fn truncated(&self) -> WireError {
        WireError::Truncated {
            offset: self.buffer.len(),
        }
    }

    /// Look at the next marker without consuming it, rejecting the never-used byte.
    fn peek_marker(&self) -> WireResult<(usize, Marker)> {
        let at = self.position();
        let byte = *self.rest.first().ok_or_else(|| self.truncated())?;
        match Marker::from_u8(byte) {
            Marker::Reserved => Err(WireError::Malformed {
                offset: at,
                marker: byte,
            }),
            m => Ok((at, m)),
        }
    }

    fn value_error(&self, at: usize, err: ValueReadError<io::Error>) -> WireError {
        match err {
            ValueReadError::TypeMismatch(m) => WireError::UnexpectedShape {
                offset: at,
                found: Shape::of_marker(m),
            },
            ValueReadError::InvalidMarkerRead(_) | ValueReadError::InvalidDataRead(_) => {
                self.truncated()
            }
        }
    }

    fn num_error(&self, at: usize, err: NumValueReadError<io::Error>) -> WireError {
        match err {
            NumValueReadError::TypeMismatch(m) => WireError::UnexpectedShape {
                offset: at,
                found: Shape::of_marker(m),
            },
            NumValueReadError::OutOfRange => WireError::UnexpectedShape {
                offset: at,
                found: Shape::Scalar,
            },
            NumValueReadError::InvalidMarkerRead(_) | NumValueReadError::InvalidDataRead(_) => {
                self.truncated()
            }
        }
    }

    /// Read a composite header and return its arity.
    pub fn read_array_len(&mut self) -> WireResult<usize> {
        let (at, m) = self.peek_marker()?;
        let found = Shape::of_marker(m);
        if found != Shape::Composite {
            return Err(WireError::UnexpectedShape { offset: at, found });
        }
        let len = decode::read_array_len(&mut self.rest).map_err(|e| self.value_error(at, e))?;
        Ok(len as usize)
    }

    /// Read one integer, float or boolean.
    pub fn read_scalar(&mut self) -> WireResult<Scalar> {
        let (at, m) = self.peek_marker()?;
        let scalar = match m {
            Marker::FixPos(_) | Marker::U8 | Marker::U16 | Marker::U32 | Marker::U64 => {
                let v = decode::read_int::<u64, _>(&mut self.rest)
                    .map_err(|e| self.num_error(at, e))?;
                Scalar::UInt(v)
            }
            Marker::FixNeg(_) | Marker::I8 | Marker::I16 | Marker::I32 | Marker::I64 => {
                let v = decode::read_int::<i64, _>(&mut self.rest)
                    .map_err(|e| self.num_error(at, e))?;
                Scalar::Int(v)
            }
            Marker::True | Marker::False => {
                let v = decode::read_bool(&mut self.rest).map_err(|e| self.value_error(at, e))?;
                Scalar::Bool(v)
            }
            Marker::F32 => {
                let v = decode::read_f32(&mut self.rest).map_err(|e| self.value_error(at, e))?;
                Scalar::F32(v)
            }
            Marker::F64 => {
                let v = decode::read_f64(&mut self.rest).map_err(|e| self.value_error(at, e))?;
                Scalar::F64(v)
            }
            other => {
                return Err(WireError::UnexpectedShape {
                    offset: at,
                    found: Shape::of_marker(other),
                })
            }
        };
        Ok(scalar)
    }
}
