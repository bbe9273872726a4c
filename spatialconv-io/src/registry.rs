//! Unified IO registry for format-agnostic reading and writing
//!
//! This module provides a registry-based approach to IO operations,
//! allowing downstream crates to work with any supported format
//! without knowing the specific implementation details. Codecs are keyed by
//! lowercase file extension.

use crate::{json, obj, ply};
use spatialconv_core::{Error, Geometry, GeometryReader, GeometryWriter, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// IO registry that manages format handlers and provides unified access
#[derive(Default, Clone)]
pub struct IoRegistry {
    readers: HashMap<String, Arc<dyn GeometryReader>>,
    writers: HashMap<String, Arc<dyn GeometryWriter>>,
}

impl IoRegistry {
    /// Create a new empty IO registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the OBJ, PLY and JSON codecs
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_reader(obj::ObjReader);
        registry.register_writer(obj::ObjWriter::default());
        registry.register_reader(ply::PlyReader);
        registry.register_writer(ply::PlyWriter);
        registry.register_reader(json::JsonReader);
        registry.register_writer(json::JsonWriter::default());
        registry
    }

    /// Register a reader under every extension it supports, replacing earlier ones
    pub fn register_reader<R: GeometryReader + 'static>(&mut self, reader: R) {
        let reader: Arc<dyn GeometryReader> = Arc::new(reader);
        for extension in reader.supported_extensions() {
            self.readers.insert(extension.to_lowercase(), Arc::clone(&reader));
        }
    }

    /// Register a writer under every extension it supports, replacing earlier ones
    pub fn register_writer<W: GeometryWriter + 'static>(&mut self, writer: W) {
        let writer: Arc<dyn GeometryWriter> = Arc::new(writer);
        for extension in writer.supported_extensions() {
            self.writers.insert(extension.to_lowercase(), Arc::clone(&writer));
        }
    }

    pub fn reader_for(&self, extension: &str) -> Result<&dyn GeometryReader> {
        self.readers
            .get(&extension.to_lowercase())
            .map(|reader| reader.as_ref())
            .ok_or_else(|| Error::UnsupportedFormat(format!("no reader for '{}'", extension)))
    }

    pub fn writer_for(&self, extension: &str) -> Result<&dyn GeometryWriter> {
        self.writers
            .get(&extension.to_lowercase())
            .map(|writer| writer.as_ref())
            .ok_or_else(|| Error::UnsupportedFormat(format!("no writer for '{}'", extension)))
    }

    /// Parse `content` with the reader registered for `extension`
    pub fn read_str(&self, content: &str, extension: &str) -> Result<Geometry> {
        self.reader_for(extension)?.read(content)
    }

    /// Serialize `geometry` with the writer registered for `extension`
    pub fn write_string(&self, geometry: &Geometry, extension: &str) -> Result<String> {
        self.writer_for(extension)?.write(geometry)
    }

    /// Read a file, choosing the codec from its extension
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Geometry> {
        let path = path.as_ref();
        let reader = self.reader_for(extension_of(path)?)?;
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(
            path = %path.display(),
            format = reader.format_name(),
            bytes = content.len(),
            "Reading geometry"
        );
        reader.read(&content)
    }

    /// Write a file, choosing the codec from its extension
    pub fn write_file<P: AsRef<Path>>(&self, geometry: &Geometry, path: P) -> Result<()> {
        let path = path.as_ref();
        let writer = self.writer_for(extension_of(path)?)?;
        let content = writer.write(geometry)?;
        tracing::debug!(
            path = %path.display(),
            format = writer.format_name(),
            bytes = content.len(),
            "Writing geometry"
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a sorted list of extensions that can be read
    pub fn supported_read_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.readers.keys().cloned().collect();
        extensions.sort();
        extensions
    }

    /// Get a sorted list of extensions that can be written
    pub fn supported_write_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.writers.keys().cloned().collect();
        extensions.sort();
        extensions
    }

    pub fn supports_reading(&self, extension: &str) -> bool {
        self.readers.contains_key(&extension.to_lowercase())
    }

    pub fn supports_writing(&self, extension: &str) -> bool {
        self.writers.contains_key(&extension.to_lowercase())
    }
}

fn extension_of(path: &Path) -> Result<&str> {
    path.extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| Error::UnsupportedFormat(format!("no file extension on {}", path.display())))
}
