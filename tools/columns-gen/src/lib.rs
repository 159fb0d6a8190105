// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # columns-gen - column table compiler
//!
//! Turns record declarations reported by a C/C++ front end into the
//! generated column tables consumed by the `columns` runtime header, and,
//! when layouts are known, into [`columns::Registry`] schemas usable by the
//! Rust transcoder directly.
//!
//! ```rust
//! use columns_gen::{GeneratorConfig, SchemaCompiler, TranslationUnit};
//!
//! let unit = TranslationUnit::from_json(r#"{ "records": [ {
//!     "name": "Pair", "size": 4,
//!     "location": { "file": "./pair.h", "line": 1, "column": 8 },
//!     "members": [
//!       { "member": "field", "name": "a", "offset": 0,
//!         "type": { "kind": "number", "width": "uint8" } },
//!       { "member": "field", "name": "b", "offset": 2,
//!         "type": { "kind": "number", "width": "int16" } } ] } ] }"#).unwrap();
//!
//! let mut compiler = SchemaCompiler::new(&GeneratorConfig::default()).unwrap();
//! compiler.include("messages.h");
//! compiler.compile_unit(&unit).unwrap();
//! let out = compiler.finish();
//!
//! assert!(out.source.contains("DEFINE_COLUMN_NUMBER(struct Pair, b),"));
//! assert!(out.header.contains("extern const struct clColumn PairObject[];"));
//! assert_eq!(out.registry.object("Pair").unwrap().size(), 4);
//! ```

pub mod classify;
pub mod compiler;
pub mod config;
pub mod emit;
pub mod frontend;

pub use classify::{classify, ElementClass, FieldClass, LengthFieldMatcher, Preceding, Unsupported};
pub use compiler::{CompileError, CompileOutput, Diagnostic, SchemaCompiler};
pub use config::{ConfigError, GeneratorConfig, DEFAULT_LENGTH_SUFFIXES};
pub use emit::{strip_dot_prefix, ArtifactWriter};
pub use frontend::{FieldDecl, FieldType, Member, RecordDecl, RecordKind, SourceLocation, TranslationUnit};
