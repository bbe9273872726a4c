//! Descriptive metadata carried by meshes and point clouds

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name, provenance and free-form string properties of an aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Format the data was read from or derived from (`"obj"`, `"mesh"`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_source_format<S: Into<String>>(mut self, format: S) -> Self {
        self.source_format = Some(format.into());
        self
    }

    pub fn with_property<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key.into(), value.to_string());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
