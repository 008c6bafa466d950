//! Loader backed by compiled `FileDescriptorSet`s
//!
//! `protoc --include_imports --descriptor_set_out=schema.pb order.proto`
//! produces a set holding `order.proto` and everything it imports. Several
//! sets may be merged; a file seen again replaces the earlier copy.

use std::path::Path;

use indexmap::IndexMap;
use prost::Message;
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use tracing::{debug, trace};

use super::descriptor::schema_file;
use crate::core::{resolve_identifier, DiagramError, Result, SchemaFile, SchemaLoader};

/// Schema loader over decoded file descriptors
#[derive(Debug, Default, Clone)]
pub struct DescriptorSetLoader {
    files: IndexMap<String, FileDescriptorProto>,
}

impl DescriptorSetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a loader from an already decoded descriptor set
    pub fn from_set(set: FileDescriptorSet) -> Self {
        let mut loader = Self::new();
        loader.add_set(set);
        loader
    }

    /// Decode a serialized `FileDescriptorSet`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut loader = Self::new();
        loader.add_bytes(bytes)?;
        Ok(loader)
    }

    /// Read and decode one or more descriptor set files
    pub fn from_paths<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Self> {
        let mut loader = Self::new();
        for path in paths {
            let path = path.as_ref();
            let bytes = std::fs::read(path).map_err(|e| {
                DiagramError::load_error(path.display().to_string(), e.to_string())
            })?;
            debug!(path = %path.display(), bytes = bytes.len(), "Read descriptor set");
            loader.add_bytes(&bytes)?;
        }
        Ok(loader)
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let set = FileDescriptorSet::decode(bytes)?;
        self.add_set(set);
        Ok(())
    }

    pub fn add_set(&mut self, set: FileDescriptorSet) {
        for file in set.file {
            self.add_file(file);
        }
    }

    pub fn add_file(&mut self, file: FileDescriptorProto) {
        trace!(file = file.name(), "Registered file descriptor");
        self.files.insert(file.name().to_string(), file);
    }

    /// Names of the registered files, in registration order
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.files.contains_key(&resolve_identifier(identifier))
    }
}

impl SchemaLoader for DescriptorSetLoader {
    fn load(&self, identifier: &str) -> Result<SchemaFile> {
        let name = resolve_identifier(identifier);
        let file = self.files.get(&name).ok_or_else(|| {
            DiagramError::load_error(
                identifier,
                format!(
                    "'{}' is not in the descriptor set (was it compiled with --include_imports?)",
                    name
                ),
            )
        })?;
        Ok(schema_file(file))
    }
}
