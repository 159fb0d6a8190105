// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The schema walk shared by both directions.
//!
//! Offsets are absolute positions in the native block: a table is walked at
//! its base, each column at `base + column.offset`, union members at the
//! union field's own offset and array elements at `offset + i * stride`.

use super::TranscodeError;
use crate::schema::{Column, ColumnKind, ColumnTable, Element, Object, WidthClass};

/// Location and width of a flexible array's length field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LengthField {
    pub width: WidthClass,
    pub at: usize,
}

/// Leaf operations that differ between encode and decode.
pub(crate) trait Direction {
    /// Transcode one scalar stored at `at`.
    fn number(&mut self, width: WidthClass, at: usize) -> Result<(), TranscodeError>;

    /// Open a composite holding exactly `arity` children.
    fn composite(&mut self, arity: usize) -> Result<(), TranscodeError>;

    /// Open a flexible array's composite and return how many elements follow.
    fn flexible(
        &mut self,
        column: &Column,
        length: LengthField,
        capacity: usize,
    ) -> Result<usize, TranscodeError>;
}

pub(crate) fn walk_object<D: Direction>(
    dir: &mut D,
    object: &Object,
    at: usize,
) -> Result<(), TranscodeError> {
    dir.composite(object.columns().wire_arity())?;
    walk_table(dir, object.columns(), at)
}

fn walk_table<D: Direction>(
    dir: &mut D,
    table: &ColumnTable,
    base: usize,
) -> Result<(), TranscodeError> {
    for index in 0..table.len() {
        walk_column(dir, table, index, base)?;
    }
    Ok(())
}

fn walk_column<D: Direction>(
    dir: &mut D,
    table: &ColumnTable,
    index: usize,
    base: usize,
) -> Result<(), TranscodeError> {
    let Some(column) = table.column(index) else {
        return Ok(());
    };
    let at = base + column.offset();

    match column.kind() {
        ColumnKind::Number(width) => dir.number(*width, at),
        ColumnKind::Object(object) => walk_object(dir, object, at),
        ColumnKind::Union(members) => walk_table(dir, members, at),
        ColumnKind::FixedArray { capacity, element } => {
            dir.composite(*capacity)?;
            walk_elements(dir, element, at, *capacity)
        }
        ColumnKind::FlexibleArray { capacity, element } => {
            let length = table
                .preceding(index)
                .and_then(|prev| {
                    prev.width().map(|width| LengthField {
                        width,
                        at: base + prev.offset(),
                    })
                })
                .ok_or_else(|| TranscodeError::MissingLengthField {
                    column: column.name().to_string(),
                })?;
            let count = dir.flexible(column, length, *capacity)?;
            walk_elements(dir, element, at, count)
        }
    }
}

fn walk_elements<D: Direction>(
    dir: &mut D,
    element: &Element,
    at: usize,
    count: usize,
) -> Result<(), TranscodeError> {
    match element {
        Element::Number(width) => {
            let stride = width
                .size()
                .ok_or(TranscodeError::UnsupportedWidthClass(*width))?;
            for i in 0..count {
                dir.number(*width, at + i * stride)?;
            }
        }
        Element::Object(object) => {
            for i in 0..count {
                walk_object(dir, object, at + i * object.size())?;
            }
        }
    }
    Ok(())
}
