// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Generator configuration
//
// Loaded from YAML. Every key is optional; missing keys fall back to the
// values the runtime header expects.

use crate::classify::LengthFieldMatcher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Name suffixes that mark a `Number` field as the length of the array after it.
pub const DEFAULT_LENGTH_SUFFIXES: [&str; 4] = ["len", "num", "size", "count"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Name printed in the "generated by" banner.
    pub tool_name: String,
    /// Runtime header included first by the source artifact.
    pub runtime_header: String,
    /// C type of one column descriptor.
    pub column_type: String,
    /// Case-insensitive suffixes for the flexible-array heuristic.
    pub length_suffixes: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tool_name: "columns-gen".to_string(),
            runtime_header: "columns.h".to_string(),
            column_type: "clColumn".to_string(),
            length_suffixes: DEFAULT_LENGTH_SUFFIXES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text).map_err(ConfigError::Parse)?;
        config.length_matcher()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("Loading generator config from: {:?}", path);
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_yaml_str(&text)
    }

    /// Compile `length_suffixes` into the classifier's matcher.
    pub fn length_matcher(&self) -> Result<LengthFieldMatcher, ConfigError> {
        LengthFieldMatcher::new(&self.length_suffixes).map_err(ConfigError::Pattern)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Pattern(regex::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read generator config: {}", e),
            Self::Parse(e) => write!(f, "failed to parse generator config: {}", e),
            Self::Pattern(e) => write!(f, "invalid length suffix pattern: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Pattern(e) => Some(e),
        }
    }
}
