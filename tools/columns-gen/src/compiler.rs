// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema compiler.
//!
//! Consumes `enter_record` / `field` / `leave_record` events, classifies each
//! field against the one before it and appends the record's tables to the
//! artifacts. When the front end supplied offsets and sizes, the same pass
//! builds runtime schemas into a [`Registry`].
//!
//! Unsupported fields never abort the run: they leave an `#error` marker in
//! the source artifact and a [`Diagnostic`], and compilation moves on.

use crate::classify::{classify, ElementClass, FieldClass, LengthFieldMatcher, Preceding};
use crate::config::{ConfigError, GeneratorConfig};
use crate::emit::ArtifactWriter;
use crate::frontend::{FieldDecl, Member, RecordDecl, SourceLocation, TranslationUnit};
use columns::{Column, ColumnTable, Element, Object, Registry};
use std::fmt;
use std::sync::Arc;

/// Non-fatal problem found while compiling a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub record: String,
    pub field: Option<String>,
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(
                f,
                "{}: {}.{}: {}",
                self.location, self.record, field, self.message
            ),
            None => write!(f, "{}: {}: {}", self.location, self.record, self.message),
        }
    }
}

/// Event sequence violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    RecordOpen { record: String },
    NoOpenRecord,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecordOpen { record } => write!(f, "record {} is still open", record),
            Self::NoOpenRecord => f.write_str("no record is open"),
        }
    }
}

impl std::error::Error for CompileError {}

/// Artifacts and schemas produced by one compiler run.
#[derive(Debug)]
pub struct CompileOutput {
    pub source: String,
    pub header: String,
    pub registry: Registry,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
struct OpenRecord {
    name: String,
    spelling: String,
    is_union: bool,
    size: Option<usize>,
    location: SourceLocation,
    preceding: Option<Preceding>,
    fields: usize,
    /// Runtime columns so far, or why the record cannot get a runtime schema.
    layout: Result<Vec<Column>, String>,
}

#[derive(Debug)]
enum CompilerState {
    Idle,
    InRecord(OpenRecord),
}

#[derive(Debug)]
pub struct SchemaCompiler {
    matcher: LengthFieldMatcher,
    writer: ArtifactWriter,
    state: CompilerState,
    registry: Registry,
    diagnostics: Vec<Diagnostic>,
}

impl SchemaCompiler {
    pub fn new(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            matcher: config.length_matcher()?,
            writer: ArtifactWriter::new(config),
            state: CompilerState::Idle,
            registry: Registry::new(),
            diagnostics: Vec::new(),
        })
    }

    /// Register a header the source artifact includes after the runtime header.
    pub fn include(&mut self, header: &str) {
        self.writer.include(header);
    }

    pub fn enter_record(&mut self, record: &RecordDecl) -> Result<(), CompileError> {
        if let CompilerState::InRecord(open) = &self.state {
            return Err(CompileError::RecordOpen {
                record: open.name.clone(),
            });
        }

        self.writer.open_table(&record.name, &record.location);
        self.state = CompilerState::InRecord(OpenRecord {
            name: record.name.clone(),
            spelling: record.spelling(),
            is_union: record.is_union(),
            size: record.size,
            location: record.location.clone(),
            preceding: None,
            fields: 0,
            layout: Ok(Vec::new()),
        });
        Ok(())
    }

    pub fn field(&mut self, field: &FieldDecl) -> Result<(), CompileError> {
        let CompilerState::InRecord(record) = &mut self.state else {
            return Err(CompileError::NoOpenRecord);
        };
        record.fields += 1;

        let is_number = match classify(field, record.preceding.as_ref(), &self.matcher) {
            Ok(class) => {
                self.writer.column(&record.spelling, &field.name, &class);
                let column = record
                    .layout
                    .is_ok()
                    .then(|| runtime_column(&self.registry, record.is_union, field, &class));
                match column {
                    Some(Ok(column)) => {
                        if let Ok(columns) = &mut record.layout {
                            columns.push(column);
                        }
                    }
                    Some(Err(reason)) => record.layout = Err(reason),
                    None => {}
                }
                class.is_number()
            }
            Err(unsupported) => {
                tracing::warn!(
                    "Unsupported field {}.{}: {}",
                    record.name,
                    field.name,
                    unsupported.spelling
                );
                self.writer.error_marker(&unsupported.spelling, &field.name);
                self.diagnostics.push(Diagnostic {
                    record: record.name.clone(),
                    field: Some(field.name.clone()),
                    message: unsupported.to_string(),
                    location: record.location.clone(),
                });
                if record.layout.is_ok() {
                    record.layout = Err(format!("field {} has no column", field.name));
                }
                false
            }
        };

        record.preceding = Some(Preceding {
            name: field.name.clone(),
            is_number,
        });
        Ok(())
    }

    pub fn leave_record(&mut self) -> Result<(), CompileError> {
        let CompilerState::InRecord(record) = std::mem::replace(&mut self.state, CompilerState::Idle)
        else {
            return Err(CompileError::NoOpenRecord);
        };
        let OpenRecord {
            name,
            spelling,
            is_union,
            size,
            location,
            fields,
            layout,
            ..
        } = record;

        self.writer.close_table(&name, &spelling, is_union);
        tracing::info!("Compiled record {} ({} fields)", name, fields);

        let registered = layout.and_then(|columns| {
            let table = ColumnTable::new(name.as_str(), columns).map_err(|e| e.to_string())?;
            let table = Arc::new(table);
            if is_union {
                return self.registry.register_union(table).map_err(|e| e.to_string());
            }
            let size = size.ok_or_else(|| "record has no size".to_string())?;
            let object = Object::new(name.as_str(), spelling.as_str(), size, table)
                .map_err(|e| e.to_string())?;
            self.registry
                .register_object(Arc::new(object))
                .map_err(|e| e.to_string())
        });

        if let Err(reason) = registered {
            tracing::debug!("No runtime schema for {}: {}", name, reason);
            self.diagnostics.push(Diagnostic {
                record: name,
                field: None,
                message: format!("no runtime schema: {}", reason),
                location,
            });
        }
        Ok(())
    }

    /// Compile every record of `unit` in declaration order.
    ///
    /// Records with an empty name or without any field, inherited ones
    /// included, are skipped. Base class fields are inlined where the base
    /// specifier appears.
    pub fn compile_unit(&mut self, unit: &TranslationUnit) -> Result<(), CompileError> {
        for record in &unit.records {
            let mut visiting = vec![record.name.clone()];
            if record.name.is_empty() || !has_fields(unit, record, &mut visiting) {
                tracing::debug!("Skipping record {:?} without fields", record.name);
                continue;
            }

            self.enter_record(record)?;
            let mut visiting = vec![record.name.clone()];
            self.members(unit, record, Some(0), &mut visiting)?;
            self.leave_record()?;
        }
        Ok(())
    }

    fn members(
        &mut self,
        unit: &TranslationUnit,
        record: &RecordDecl,
        base: Option<usize>,
        visiting: &mut Vec<String>,
    ) -> Result<(), CompileError> {
        for member in &record.members {
            match member {
                Member::Field(field) => {
                    let placed = FieldDecl {
                        offset: field.offset.and_then(|o| base.map(|b| b + o)),
                        ..field.clone()
                    };
                    self.field(&placed)?;
                }
                Member::Base {
                    record: parent,
                    offset,
                } => {
                    if visiting.contains(parent) {
                        self.layout_gap(format!("base {} inherits from itself", parent));
                        continue;
                    }
                    let Some(decl) = unit.record(parent) else {
                        self.layout_gap(format!("base {} is not declared", parent));
                        continue;
                    };
                    visiting.push(parent.clone());
                    let nested = base.zip(*offset).map(|(b, o)| b + o);
                    self.members(unit, decl, nested, visiting)?;
                    visiting.pop();
                }
            }
        }
        Ok(())
    }

    fn layout_gap(&mut self, reason: String) {
        if let CompilerState::InRecord(record) = &mut self.state {
            tracing::warn!("Record {}: {}", record.name, reason);
            self.diagnostics.push(Diagnostic {
                record: record.name.clone(),
                field: None,
                message: reason.clone(),
                location: record.location.clone(),
            });
            if record.layout.is_ok() {
                record.layout = Err(reason);
            }
        }
    }

    pub fn source(&self) -> String {
        self.writer.source()
    }

    pub fn header(&self) -> String {
        self.writer.header()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn finish(self) -> CompileOutput {
        CompileOutput {
            source: self.writer.source(),
            header: self.writer.header(),
            registry: self.registry,
            diagnostics: self.diagnostics,
        }
    }
}

fn has_fields(unit: &TranslationUnit, record: &RecordDecl, visiting: &mut Vec<String>) -> bool {
    record.members.iter().any(|member| match member {
        Member::Field(_) => true,
        Member::Base { record: parent, .. } => {
            if visiting.contains(parent) {
                return false;
            }
            let Some(decl) = unit.record(parent) else {
                return false;
            };
            visiting.push(parent.clone());
            let found = has_fields(unit, decl, visiting);
            visiting.pop();
            found
        }
    })
}

fn runtime_column(
    registry: &Registry,
    is_union: bool,
    field: &FieldDecl,
    class: &FieldClass,
) -> Result<Column, String> {
    // union members all live at the union's own address
    let offset = match (field.offset, is_union) {
        (Some(offset), _) => offset,
        (None, true) => 0,
        (None, false) => return Err(format!("field {} has no offset", field.name)),
    };
    let name = field.name.as_str();

    let column = match class {
        FieldClass::Number(width) => Column::number(name, offset, *width),
        FieldClass::Object { record } => Column::object(name, offset, lookup_object(registry, record)?),
        FieldClass::Union { record } => {
            let members = registry
                .union(record)
                .cloned()
                .ok_or_else(|| format!("union {} has no runtime schema", record))?;
            Column::union(name, offset, members)
        }
        FieldClass::FixedArray { element, len } => {
            Column::fixed_array(name, offset, *len, runtime_element(registry, element)?)
        }
        FieldClass::FlexibleArray { element, len } => {
            Column::flexible_array(name, offset, *len, runtime_element(registry, element)?)
        }
    };
    Ok(column)
}

fn runtime_element(registry: &Registry, element: &ElementClass) -> Result<Element, String> {
    match element {
        ElementClass::Number(width) => Ok(Element::Number(*width)),
        ElementClass::Object { record } => Ok(Element::Object(lookup_object(registry, record)?)),
    }
}

fn lookup_object(registry: &Registry, record: &str) -> Result<Arc<Object>, String> {
    registry
        .object(record)
        .cloned()
        .ok_or_else(|| format!("record {} has no runtime schema", record))
}
