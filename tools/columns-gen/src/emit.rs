// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Textual artifacts: the column tables source and its header.
//!
//! Output contains no timestamps or paths beyond what the declarations
//! carry, so the same input always renders the same bytes.

use crate::classify::{ElementClass, FieldClass};
use crate::config::GeneratorConfig;
use crate::frontend::SourceLocation;

/// Drop a leading `./` or `.\`.
pub fn strip_dot_prefix(path: &str) -> &str {
    path.strip_prefix("./")
        .or_else(|| path.strip_prefix(".\\"))
        .unwrap_or(path)
}

#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    banner: String,
    runtime_header: String,
    column_type: String,
    includes: Vec<String>,
    source: String,
    header: String,
}

impl ArtifactWriter {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            banner: format!("// generated by the {}. DO NOT EDIT!\n\n", config.tool_name),
            runtime_header: config.runtime_header.clone(),
            column_type: config.column_type.clone(),
            includes: Vec::new(),
            source: String::new(),
            header: String::new(),
        }
    }

    pub fn include(&mut self, header: &str) {
        self.includes.push(strip_dot_prefix(header).to_string());
    }

    pub fn open_table(&mut self, name: &str, location: &SourceLocation) {
        self.source.push_str(&format!(
            "\n// line {}:{}:{}\nstatic const {} {}Columns[] = {{\n",
            strip_dot_prefix(&location.file),
            location.line,
            location.column,
            self.column_type,
            name
        ));
    }

    pub fn column(&mut self, owner: &str, field: &str, class: &FieldClass) {
        let line = match class {
            FieldClass::Number(_) => format!("DEFINE_COLUMN_NUMBER({}, {})", owner, field),
            FieldClass::Object { record } => {
                format!("DEFINE_COLUMN_OBJECT({}, {}, {}Object)", owner, field, record)
            }
            FieldClass::Union { record } => {
                format!("DEFINE_COLUMN_UNION({}, {}, {}Columns)", owner, field, record)
            }
            FieldClass::FixedArray { element, .. } => array_column("FIXED", owner, field, element),
            FieldClass::FlexibleArray { element, .. } => {
                array_column("FLEXIBLE", owner, field, element)
            }
        };
        self.source.push_str(&format!("    {},\n", line));
    }

    pub fn error_marker(&mut self, spelling: &str, field: &str) {
        self.source
            .push_str(&format!("#error {} {}\n", spelling, field));
    }

    /// Close the columns table; non-unions also get an object table and a
    /// header declaration.
    pub fn close_table(&mut self, name: &str, type_spelling: &str, is_union: bool) {
        self.source.push_str("};\n");
        if is_union {
            return;
        }
        self.source.push_str(&format!(
            "const {} {}Object[] = {{\n    DEFINE_OBJECT({}, {}Columns),\n}};\n",
            self.column_type, name, type_spelling, name
        ));
        self.header.push_str(&format!(
            "extern const struct {} {}Object[];\n",
            self.column_type, name
        ));
    }

    pub fn source(&self) -> String {
        let mut out = self.banner.clone();
        out.push_str(&format!("#include <{}>\n", self.runtime_header));
        for include in &self.includes {
            out.push_str(&format!("\n#include \"{}\"", include));
        }
        out.push('\n');
        out.push_str(&self.source);
        out
    }

    pub fn header(&self) -> String {
        format!(
            "{}#pragma once\n\nstruct {};\n\n{}",
            self.banner, self.column_type, self.header
        )
    }
}

fn array_column(flavor: &str, owner: &str, field: &str, element: &ElementClass) -> String {
    match element {
        ElementClass::Number(_) => {
            format!("DEFINE_COLUMN_{}_ARRAY({}, {})", flavor, owner, field)
        }
        ElementClass::Object { record } => format!(
            "DEFINE_COLUMN_OBJECT_{}_ARRAY({}, {}, {}Object)",
            flavor, owner, field, record
        ),
    }
}
