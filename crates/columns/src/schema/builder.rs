// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for objects and union tables.

use super::{Column, ColumnTable, Element, Object, SchemaError, WidthClass};
use std::sync::Arc;

/// Builder for a non-union record's [`Object`].
///
/// Offsets are the native byte offsets of each field, typically
/// `core::mem::offset_of!` on a `#[repr(C)]` mirror of the record.
#[derive(Debug)]
pub struct ObjectBuilder {
    name: String,
    type_name: String,
    size: usize,
    columns: Vec<Column>,
}

impl ObjectBuilder {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        let name = name.into();
        Self {
            type_name: format!("struct {}", name),
            name,
            size,
            columns: Vec::new(),
        }
    }

    /// Override the native type spelling (defaults to `struct <name>`).
    #[must_use]
    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn number(self, name: impl Into<String>, offset: usize, width: WidthClass) -> Self {
        self.column(Column::number(name, offset, width))
    }

    #[must_use]
    pub fn object(self, name: impl Into<String>, offset: usize, object: Arc<Object>) -> Self {
        self.column(Column::object(name, offset, object))
    }

    #[must_use]
    pub fn union(self, name: impl Into<String>, offset: usize, members: Arc<ColumnTable>) -> Self {
        self.column(Column::union(name, offset, members))
    }

    #[must_use]
    pub fn fixed_array(
        self,
        name: impl Into<String>,
        offset: usize,
        width: WidthClass,
        capacity: usize,
    ) -> Self {
        self.column(Column::fixed_array(
            name,
            offset,
            capacity,
            Element::Number(width),
        ))
    }

    #[must_use]
    pub fn object_fixed_array(
        self,
        name: impl Into<String>,
        offset: usize,
        element: Arc<Object>,
        capacity: usize,
    ) -> Self {
        self.column(Column::fixed_array(
            name,
            offset,
            capacity,
            Element::Object(element),
        ))
    }

    /// Array whose count is held by the column added just before it.
    #[must_use]
    pub fn flexible_array(
        self,
        name: impl Into<String>,
        offset: usize,
        width: WidthClass,
        capacity: usize,
    ) -> Self {
        self.column(Column::flexible_array(
            name,
            offset,
            capacity,
            Element::Number(width),
        ))
    }

    #[must_use]
    pub fn object_flexible_array(
        self,
        name: impl Into<String>,
        offset: usize,
        element: Arc<Object>,
        capacity: usize,
    ) -> Self {
        self.column(Column::flexible_array(
            name,
            offset,
            capacity,
            Element::Object(element),
        ))
    }

    pub fn build(self) -> Result<Object, SchemaError> {
        let table = ColumnTable::new(self.name.clone(), self.columns)?;
        Object::new(self.name, self.type_name, self.size, Arc::new(table))
    }
}

/// Builder for a union's bare column table; every member sits at offset 0.
#[derive(Debug)]
pub struct UnionBuilder {
    name: String,
    columns: Vec<Column>,
}

impl UnionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn number(mut self, name: impl Into<String>, width: WidthClass) -> Self {
        self.columns.push(Column::number(name, 0, width));
        self
    }

    #[must_use]
    pub fn object(mut self, name: impl Into<String>, object: Arc<Object>) -> Self {
        self.columns.push(Column::object(name, 0, object));
        self
    }

    #[must_use]
    pub fn fixed_array(mut self, name: impl Into<String>, width: WidthClass, capacity: usize) -> Self {
        self.columns
            .push(Column::fixed_array(name, 0, capacity, Element::Number(width)));
        self
    }

    pub fn build(self) -> Result<ColumnTable, SchemaError> {
        ColumnTable::new(self.name, self.columns)
    }
}
