// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field classification.
//!
//! An array field becomes a flexible array when the field just before it is
//! a `Number` whose name ends with one of the length suffixes (`itemCount`,
//! `data_len`, `numSize`). Otherwise it is a fixed array. The rule only
//! looks at names, so `itemColor` followed by an array stays fixed.

use crate::frontend::{FieldDecl, FieldType};
use columns::WidthClass;
use regex::Regex;
use std::fmt;

/// Array element as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementClass {
    Number(WidthClass),
    Object { record: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldClass {
    Number(WidthClass),
    Object { record: String },
    Union { record: String },
    FixedArray { element: ElementClass, len: usize },
    FlexibleArray { element: ElementClass, len: usize },
}

impl FieldClass {
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

/// The sibling declared immediately before the field being classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preceding {
    pub name: String,
    pub is_number: bool,
}

/// Field type the schema cannot describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
    pub spelling: String,
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported field type {}", self.spelling)
    }
}

impl std::error::Error for Unsupported {}

/// Case-insensitive suffix test for length field names.
#[derive(Debug, Clone)]
pub struct LengthFieldMatcher {
    pattern: Option<Regex>,
}

impl LengthFieldMatcher {
    /// Empty suffixes are ignored; with none left nothing matches.
    pub fn new<S: AsRef<str>>(suffixes: &[S]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = suffixes
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = Regex::new(&format!("(?i)(?:{})$", alternatives.join("|")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(name))
    }
}

/// Decide the column kind of `field`.
pub fn classify(
    field: &FieldDecl,
    preceding: Option<&Preceding>,
    matcher: &LengthFieldMatcher,
) -> Result<FieldClass, Unsupported> {
    let unsupported = || Unsupported {
        spelling: field.type_spelling(),
    };

    match &field.ty {
        FieldType::Number { width } if width.is_supported() => Ok(FieldClass::Number(*width)),
        FieldType::Record { name, union: false } => Ok(FieldClass::Object {
            record: name.clone(),
        }),
        FieldType::Record { name, union: true } => Ok(FieldClass::Union {
            record: name.clone(),
        }),
        FieldType::Array { element, len } => {
            let element = match element.as_ref() {
                FieldType::Number { width } if width.is_supported() => {
                    ElementClass::Number(*width)
                }
                FieldType::Record { name, union: false } => ElementClass::Object {
                    record: name.clone(),
                },
                _ => return Err(unsupported()),
            };
            let len = *len;
            let flexible = preceding.is_some_and(|p| p.is_number && matcher.matches(&p.name));
            if flexible {
                Ok(FieldClass::FlexibleArray { element, len })
            } else {
                Ok(FieldClass::FixedArray { element, len })
            }
        }
        FieldType::Number { .. } | FieldType::Unsupported { .. } => Err(unsupported()),
    }
}
