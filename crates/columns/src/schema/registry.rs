// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named lookup of compiled objects and union tables.

use super::{ColumnTable, Object, SchemaError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry of every record compiled in one pass.
///
/// Objects and unions share one namespace, as record names do in the
/// declarations they come from.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    objects: BTreeMap<String, Arc<Object>>,
    unions: BTreeMap<String, Arc<ColumnTable>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_free(&self, name: &str) -> Result<(), SchemaError> {
        if self.objects.contains_key(name) || self.unions.contains_key(name) {
            return Err(SchemaError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    pub fn register_object(&mut self, object: Arc<Object>) -> Result<(), SchemaError> {
        self.check_free(object.name())?;
        self.objects.insert(object.name().to_string(), object);
        Ok(())
    }

    pub fn register_union(&mut self, members: Arc<ColumnTable>) -> Result<(), SchemaError> {
        self.check_free(members.name())?;
        self.unions.insert(members.name().to_string(), members);
        Ok(())
    }

    pub fn object(&self, name: &str) -> Option<&Arc<Object>> {
        self.objects.get(name)
    }

    pub fn union(&self, name: &str) -> Option<&Arc<ColumnTable>> {
        self.unions.get(name)
    }

    /// Objects in name order.
    pub fn objects(&self) -> impl Iterator<Item = &Arc<Object>> {
        self.objects.values()
    }

    pub fn unions(&self) -> impl Iterator<Item = &Arc<ColumnTable>> {
        self.unions.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len() + self.unions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.unions.is_empty()
    }
}
