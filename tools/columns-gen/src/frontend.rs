// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarations as reported by a C/C++ front end.
//!
//! The compiler does not parse source text. A front end resolves types,
//! layouts and base classes and hands over one [`TranslationUnit`], usually
//! as JSON:
//!
//! ```json
//! { "records": [ {
//!     "name": "Bag", "kind": "struct", "size": 20,
//!     "location": { "file": "./bag.h", "line": 3, "column": 8 },
//!     "members": [
//!       { "member": "field", "name": "itemCount", "offset": 0,
//!         "type": { "kind": "number", "width": "uint32" } },
//!       { "member": "field", "name": "items", "offset": 4,
//!         "type": { "kind": "array", "len": 8,
//!                   "element": { "kind": "number", "width": "uint16" } } }
//!     ] } ] }
//! ```
//!
//! Offsets and sizes are optional. Without them only the textual artifact
//! can be produced.

use columns::WidthClass;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    #[serde(default)]
    pub records: Vec<RecordDecl>,
}

impl TranslationUnit {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Record definition by display name.
    pub fn record(&self, name: &str) -> Option<&RecordDecl> {
        self.records.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    Struct,
    Class,
    Union,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDecl {
    /// Display name (`stJson`).
    pub name: String,
    /// Type spelling used in generated code; derived from `kind` when absent.
    #[serde(default)]
    pub type_spelling: Option<String>,
    #[serde(default)]
    pub kind: RecordKind,
    pub location: SourceLocation,
    /// Native size in bytes.
    #[serde(default)]
    pub size: Option<usize>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl RecordDecl {
    pub fn is_union(&self) -> bool {
        self.kind == RecordKind::Union
    }

    /// `struct stJson` for C records, the bare name for classes.
    pub fn spelling(&self) -> String {
        if let Some(spelling) = &self.type_spelling {
            return spelling.clone();
        }
        match self.kind {
            RecordKind::Struct => format!("struct {}", self.name),
            RecordKind::Union => format!("union {}", self.name),
            RecordKind::Class => self.name.clone(),
        }
    }
}

/// One child of a record, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Field(FieldDecl),
    /// Base class specifier; its fields are inlined at this position.
    Base {
        record: String,
        #[serde(default)]
        offset: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default)]
    pub offset: Option<usize>,
    /// Canonical type spelling, used in error markers.
    #[serde(default)]
    pub spelling: Option<String>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            offset: None,
            spelling: None,
        }
    }

    #[must_use]
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn type_spelling(&self) -> String {
        self.spelling.clone().unwrap_or_else(|| self.ty.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    /// Integer, float, bool or enum resolved to a width class.
    Number { width: WidthClass },
    /// Nested struct, class or union, by display name.
    Record {
        name: String,
        #[serde(default)]
        union: bool,
    },
    /// Constant-size array.
    Array { element: Box<FieldType>, len: usize },
    /// Pointers, function types and anything else the front end cannot map.
    Unsupported { spelling: String },
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { width } => write!(f, "{}", width),
            Self::Record { name, union: true } => write!(f, "union {}", name),
            Self::Record { name, union: false } => write!(f, "struct {}", name),
            Self::Array { element, len } => write!(f, "{}[{}]", element, len),
            Self::Unsupported { spelling } => f.write_str(spelling),
        }
    }
}
