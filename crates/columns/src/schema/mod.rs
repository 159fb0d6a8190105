// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema model: width classes, columns, column tables and objects.
//!
//! A record is described by one [`ColumnTable`] (its fields in declaration
//! order) and, unless it is a union, one [`Object`] wrapping that table with
//! the record's native size. Tables are immutable once built and are shared
//! through `Arc`, so any number of encode/decode calls may read them
//! concurrently.

mod builder;
mod registry;

pub use builder::{ObjectBuilder, UnionBuilder};
pub use registry::Registry;

use std::fmt;
use std::sync::Arc;

/// Scalar representation of a `Number` column.
///
/// The 128/256-bit integers, the minifloats, the wide floats and `Half` are
/// representable so that schemas can name them, but no engine supports
/// them: tables referencing one are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum WidthClass {
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Int256,
    #[cfg_attr(feature = "serde", serde(rename = "uint8"))]
    UInt8,
    #[cfg_attr(feature = "serde", serde(rename = "uint16"))]
    UInt16,
    #[cfg_attr(feature = "serde", serde(rename = "uint32"))]
    UInt32,
    #[cfg_attr(feature = "serde", serde(rename = "uint64"))]
    UInt64,
    #[cfg_attr(feature = "serde", serde(rename = "uint128"))]
    UInt128,
    #[cfg_attr(feature = "serde", serde(rename = "uint256"))]
    UInt256,
    Float8,
    Float16,
    Float32,
    Float64,
    Float128,
    Float256,
    Half,
    Bool,
}

impl WidthClass {
    /// Native size in bytes, `None` for reserved classes.
    pub const fn size(self) -> Option<usize> {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bool => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::Int128
            | Self::Int256
            | Self::UInt128
            | Self::UInt256
            | Self::Float8
            | Self::Float16
            | Self::Float128
            | Self::Float256
            | Self::Half => None,
        }
    }

    pub const fn is_supported(self) -> bool {
        self.size().is_some()
    }

    /// Supported integer classes, the only ones usable as a length field.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// Largest element count an integer class can hold, `None` for
    /// non-integer classes.
    pub const fn max_count(self) -> Option<u64> {
        match self {
            Self::Int8 => Some(i8::MAX as u64),
            Self::Int16 => Some(i16::MAX as u64),
            Self::Int32 => Some(i32::MAX as u64),
            Self::Int64 => Some(i64::MAX as u64),
            Self::UInt8 => Some(u8::MAX as u64),
            Self::UInt16 => Some(u16::MAX as u64),
            Self::UInt32 => Some(u32::MAX as u64),
            Self::UInt64 => Some(u64::MAX),
            _ => None,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 | Self::Int128 | Self::Int256
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Int128 => "int128",
            Self::Int256 => "int256",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::UInt128 => "uint128",
            Self::UInt256 => "uint256",
            Self::Float8 => "float8",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Float128 => "float128",
            Self::Float256 => "float256",
            Self::Half => "half",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for WidthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element of a fixed or flexible array.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Number(WidthClass),
    Object(Arc<Object>),
}

impl Element {
    /// Byte distance between consecutive elements.
    pub fn stride(&self) -> Option<usize> {
        match self {
            Self::Number(width) => width.size(),
            Self::Object(object) => Some(object.size()),
        }
    }
}

/// Kind-specific payload of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Number(WidthClass),
    Object(Arc<Object>),
    /// Members are spliced into the parent's child sequence, all at the
    /// union field's offset.
    Union(Arc<ColumnTable>),
    FixedArray {
        capacity: usize,
        element: Element,
    },
    /// Element count lives in the immediately preceding column of the same
    /// table; `capacity` is the inline storage reserved for the tail.
    FlexibleArray {
        capacity: usize,
        element: Element,
    },
}

/// One field's serialization descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    offset: usize,
    kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, offset: usize, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            offset,
            kind,
        }
    }

    pub fn number(name: impl Into<String>, offset: usize, width: WidthClass) -> Self {
        Self::new(name, offset, ColumnKind::Number(width))
    }

    pub fn object(name: impl Into<String>, offset: usize, object: Arc<Object>) -> Self {
        Self::new(name, offset, ColumnKind::Object(object))
    }

    pub fn union(name: impl Into<String>, offset: usize, members: Arc<ColumnTable>) -> Self {
        Self::new(name, offset, ColumnKind::Union(members))
    }

    pub fn fixed_array(
        name: impl Into<String>,
        offset: usize,
        capacity: usize,
        element: Element,
    ) -> Self {
        Self::new(name, offset, ColumnKind::FixedArray { capacity, element })
    }

    pub fn flexible_array(
        name: impl Into<String>,
        offset: usize,
        capacity: usize,
        element: Element,
    ) -> Self {
        Self::new(name, offset, ColumnKind::FlexibleArray { capacity, element })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset within the enclosing record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    /// Width class of a `Number` column.
    pub fn width(&self) -> Option<WidthClass> {
        match self.kind {
            ColumnKind::Number(width) => Some(width),
            _ => None,
        }
    }

    /// Bytes covered by the field starting at its offset.
    pub fn extent(&self) -> Option<usize> {
        match &self.kind {
            ColumnKind::Number(width) => width.size(),
            ColumnKind::Object(object) => Some(object.size()),
            ColumnKind::Union(members) => members.extent(),
            ColumnKind::FixedArray { capacity, element }
            | ColumnKind::FlexibleArray { capacity, element } => {
                element.stride()?.checked_mul(*capacity)
            }
        }
    }

    fn unsupported_width(&self) -> Option<WidthClass> {
        let width = match &self.kind {
            ColumnKind::Number(width) => *width,
            ColumnKind::FixedArray {
                element: Element::Number(width),
                ..
            }
            | ColumnKind::FlexibleArray {
                element: Element::Number(width),
                ..
            } => *width,
            _ => return None,
        };
        (!width.is_supported()).then_some(width)
    }
}

/// Ordered sibling columns of one record.
///
/// "Preceding sibling" is a plain index lookup into this table, which is
/// how a flexible array finds its length field.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTable {
    name: String,
    columns: Vec<Column>,
}

impl ColumnTable {
    /// Validate and build a table.
    ///
    /// Rejects reserved width classes and array capacities that cannot be
    /// framed on the wire. A flexible array needs an integer `Number` column
    /// immediately before it, wide enough to count up to its capacity.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, SchemaError> {
        let name = name.into();
        for (index, column) in columns.iter().enumerate() {
            if let Some(width) = column.unsupported_width() {
                return Err(SchemaError::UnsupportedWidthClass {
                    column: column.name.clone(),
                    width,
                });
            }

            match &column.kind {
                ColumnKind::FixedArray { capacity, .. } => {
                    check_capacity(column, *capacity)?;
                }
                ColumnKind::FlexibleArray { capacity, .. } => {
                    check_capacity(column, *capacity)?;
                    let length = index
                        .checked_sub(1)
                        .and_then(|i| columns.get(i))
                        .ok_or_else(|| SchemaError::MissingLengthField {
                            table: name.clone(),
                            column: column.name.clone(),
                        })?;
                    match length.width().and_then(WidthClass::max_count) {
                        Some(max) if *capacity as u64 <= max => {}
                        Some(max) => {
                            return Err(SchemaError::LengthFieldTooNarrow {
                                column: column.name.clone(),
                                length: length.name.clone(),
                                capacity: *capacity,
                                max,
                            })
                        }
                        None => {
                            return Err(SchemaError::LengthFieldNotInteger {
                                column: column.name.clone(),
                                length: length.name.clone(),
                            })
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(Self { name, columns })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Column immediately before `index`, if any.
    pub fn preceding(&self, index: usize) -> Option<&Column> {
        index.checked_sub(1).and_then(|i| self.columns.get(i))
    }

    /// Number of wire children this table contributes to its composite.
    pub fn wire_arity(&self) -> usize {
        self.columns
            .iter()
            .map(|column| match &column.kind {
                ColumnKind::Union(members) => members.wire_arity(),
                _ => 1,
            })
            .sum()
    }

    /// Highest byte touched by any column, relative to the table base.
    pub fn extent(&self) -> Option<usize> {
        let mut end = 0;
        for column in &self.columns {
            end = end.max(column.offset.checked_add(column.extent()?)?);
        }
        Some(end)
    }
}

fn check_capacity(column: &Column, capacity: usize) -> Result<(), SchemaError> {
    if u32::try_from(capacity).is_err() {
        return Err(SchemaError::CapacityTooLarge {
            column: column.name.clone(),
            capacity,
        });
    }
    Ok(())
}

/// Full schema of a non-union record.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    name: String,
    type_name: String,
    size: usize,
    columns: Arc<ColumnTable>,
}

impl Object {
    /// Wrap a table, checking every column fits inside `size` bytes.
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        size: usize,
        columns: Arc<ColumnTable>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        for column in columns.columns() {
            let end = column
                .extent()
                .and_then(|extent| column.offset.checked_add(extent));
            match end {
                Some(end) if end <= size => {}
                _ => {
                    return Err(SchemaError::ColumnOutOfBounds {
                        object: name,
                        column: column.name.clone(),
                        end: end.unwrap_or(usize::MAX),
                        size,
                    })
                }
            }
        }

        Ok(Self {
            name,
            type_name: type_name.into(),
            size,
            columns,
        })
    }

    /// Record display name (`stJson`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Native type spelling (`struct stJson`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Native size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn columns(&self) -> &Arc<ColumnTable> {
        &self.columns
    }
}

/// Errors raised while assembling a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    MissingLengthField { table: String, column: String },
    LengthFieldNotInteger { column: String, length: String },
    UnsupportedWidthClass { column: String, width: WidthClass },
    ColumnOutOfBounds {
        object: String,
        column: String,
        end: usize,
        size: usize,
    },
    CapacityTooLarge { column: String, capacity: usize },
    /// The length field's width cannot hold the flexible array's capacity.
    LengthFieldTooNarrow {
        column: String,
        length: String,
        capacity: usize,
        max: u64,
    },
    DuplicateName(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLengthField { table, column } => write!(
                f,
                "flexible array {} is the first column of {} and has no length field",
                column, table
            ),
            Self::LengthFieldNotInteger { column, length } => write!(
                f,
                "flexible array {} needs an integer length field, {} is not one",
                column, length
            ),
            Self::UnsupportedWidthClass { column, width } => {
                write!(f, "column {} uses unsupported width class {}", column, width)
            }
            Self::ColumnOutOfBounds {
                object,
                column,
                end,
                size,
            } => write!(
                f,
                "column {} of {} ends at byte {} past object size {}",
                column, object, end, size
            ),
            Self::CapacityTooLarge { column, capacity } => {
                write!(f, "array {} capacity {} exceeds u32::MAX", column, capacity)
            }
            Self::LengthFieldTooNarrow {
                column,
                length,
                capacity,
                max,
            } => write!(
                f,
                "flexible array {} holds up to {} elements but length field {} stops at {}",
                column, capacity, length, max
            ),
            Self::DuplicateName(name) => write!(f, "schema name {} registered twice", name),
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn union_table() -> Arc<ColumnTable> {
        Arc::new(
            ColumnTable::new(
                "stJsonUnion",
                vec![
                    Column::number("i64", 0, WidthClass::Int64),
                    Column::number("u64", 0, WidthClass::UInt64),
                    Column::number("f64", 0, WidthClass::Float64),
                ],
            )
            .expect("union table"),
        )
    }

    #[test]
    fn test_width_class_sizes() {
        assert_eq!(WidthClass::Bool.size(), Some(1));
        assert_eq!(WidthClass::UInt16.size(), Some(2));
        assert_eq!(WidthClass::Float32.size(), Some(4));
        assert_eq!(WidthClass::Int64.size(), Some(8));
        assert_eq!(WidthClass::Int128.size(), None);
        assert_eq!(WidthClass::Half.size(), None);
        assert!(!WidthClass::Float16.is_supported());
        assert!(WidthClass::UInt8.is_integer());
        assert!(!WidthClass::Float64.is_integer());
        assert!(!WidthClass::Bool.is_integer());
        assert_eq!(WidthClass::Int16.max_count(), Some(32767));
        assert_eq!(WidthClass::UInt64.max_count(), Some(u64::MAX));
        assert_eq!(WidthClass::Float32.max_count(), None);
    }

    #[test]
    fn test_union_splices_into_wire_arity() {
        let table = ColumnTable::new(
            "stJson",
            vec![
                Column::number("kind", 0, WidthClass::UInt8),
                Column::union("via", 8, union_table()),
            ],
        )
        .expect("table");

        assert_eq!(table.len(), 2);
        assert_eq!(table.wire_arity(), 4);
        assert_eq!(table.extent(), Some(16));
    }

    #[test]
    fn test_flexible_array_requires_length_field() {
        let err = ColumnTable::new(
            "Packet",
            vec![Column::flexible_array(
                "data",
                0,
                8,
                Element::Number(WidthClass::UInt8),
            )],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::MissingLengthField { .. }));

        let err = ColumnTable::new(
            "Packet",
            vec![
                Column::number("ratio", 0, WidthClass::Float32),
                Column::flexible_array("data", 4, 8, Element::Number(WidthClass::UInt8)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::LengthFieldNotInteger { .. }));
    }

    #[test]
    fn test_length_field_must_count_to_capacity() {
        let err = ColumnTable::new(
            "Bytes",
            vec![
                Column::number("len", 0, WidthClass::UInt8),
                Column::flexible_array("data", 1, 300, Element::Number(WidthClass::UInt8)),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::LengthFieldTooNarrow {
                column: "data".into(),
                length: "len".into(),
                capacity: 300,
                max: 255,
            }
        );

        let err = ColumnTable::new(
            "Bytes",
            vec![
                Column::number("len", 0, WidthClass::Int8),
                Column::flexible_array("data", 1, 200, Element::Number(WidthClass::UInt8)),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "flexible array data holds up to 200 elements but length field len stops at 127"
        );

        for (width, capacity) in [(WidthClass::UInt8, 255), (WidthClass::Int8, 127)] {
            ColumnTable::new(
                "Bytes",
                vec![
                    Column::number("len", 0, width),
                    Column::flexible_array("data", 1, capacity, Element::Number(WidthClass::UInt8)),
                ],
            )
            .expect("capacity at the length field maximum");
        }
    }

    #[test]
    fn test_preceding_is_index_lookup() {
        let table = ColumnTable::new(
            "Packet",
            vec![
                Column::number("len", 0, WidthClass::UInt32),
                Column::flexible_array("data", 4, 8, Element::Number(WidthClass::UInt8)),
            ],
        )
        .expect("table");

        assert!(table.preceding(0).is_none());
        assert_eq!(table.preceding(1).map(Column::name), Some("len"));
    }

    #[test]
    fn test_reserved_width_rejected() {
        let err = ColumnTable::new(
            "Wide",
            vec![Column::fixed_array(
                "lanes",
                0,
                2,
                Element::Number(WidthClass::UInt128),
            )],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnsupportedWidthClass {
                column: "lanes".into(),
                width: WidthClass::UInt128,
            }
        );
    }

    #[test]
    fn test_object_rejects_column_past_size() {
        let table = Arc::new(
            ColumnTable::new("Pair", vec![Column::number("b", 4, WidthClass::UInt64)])
                .expect("table"),
        );
        let err = Object::new("Pair", "struct Pair", 8, table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "column b of Pair ends at byte 12 past object size 8"
        );
    }
}
