//! Descriptor mapping builder
//!
//! Walks the import closure of a root schema file and collects the three
//! tables the template generator needs: every message type by name, the
//! display name of each primitive type code, and a node index per message
//! type.

use std::collections::{BTreeMap, HashSet};

use indexmap::IndexMap;
use tracing::{debug, info, span, trace, warn, Level};

use super::descriptor::primitive_type_names;
use crate::core::{MessageType, Result, SchemaFile, SchemaLoader};

/// First node index handed out; 0 and 1 are left to the renderer
pub const FIRST_NODE_INDEX: usize = 2;

/// Primitive type code to display name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCodeTable {
    names: BTreeMap<i32, String>,
}

impl TypeCodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table covering every protobuf field type code
    pub fn protobuf() -> Self {
        let mut table = Self::new();
        table.refresh();
        table
    }

    /// Fill the table from the protobuf type enumeration (idempotent)
    pub fn refresh(&mut self) {
        self.names.extend(primitive_type_names());
    }

    pub fn name(&self, code: i32) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Message type name to diagram node index
///
/// Indices are handed out once, in first-seen order, and never change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIndexTable {
    indices: IndexMap<String, usize>,
}

impl NodeIndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for `name`, assigning the next free one on first sight
    pub fn assign(&mut self, name: &str) -> usize {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }
        let index = FIRST_NODE_INDEX + self.indices.len();
        self.indices.insert(name.to_string(), index);
        index
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.indices.iter().map(|(name, &index)| (name.as_str(), index))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// The tables built for one render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mappings {
    pub type_codes: TypeCodeTable,
    /// Message types by name, in first-discovery order
    pub types: IndexMap<String, MessageType>,
    pub node_indices: NodeIndexTable,
    /// File that supplied each type's current definition
    pub origins: IndexMap<String, String>,
    /// Files visited, in traversal order
    pub files: Vec<String>,
}

impl Mappings {
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Merge one file's message types into the tables
    fn merge(&mut self, file: &SchemaFile) {
        for message in &file.messages {
            if let Some(previous) = self.origins.get(&message.name) {
                warn!(
                    type_name = %message.name,
                    previous = %previous,
                    file = %file.name,
                    "Duplicate message name, later definition wins"
                );
            }
            self.types.insert(message.name.clone(), message.clone());
            self.origins.insert(message.name.clone(), file.name.clone());
            let index = self.node_indices.assign(&message.name);
            trace!(type_name = %message.name, index, "Mapped message type");
        }
        self.files.push(file.name.clone());
    }
}

/// Builds [`Mappings`] for a root schema and its import closure
///
/// Files are visited depth first in import order. Each file is visited once,
/// so import cycles terminate.
pub struct MappingBuilder<L> {
    loader: L,
}

impl<L: SchemaLoader> MappingBuilder<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Build the tables for `root` and every file it transitively imports
    ///
    /// Fails with the loader's error if any dependency cannot be loaded; no
    /// partial tables are returned.
    pub fn build(&self, root: &SchemaFile) -> Result<Mappings> {
        let build_span = span!(Level::INFO, "build_mappings", root = %root.name);
        let _enter = build_span.enter();

        let mut mappings = Mappings {
            type_codes: TypeCodeTable::protobuf(),
            ..Default::default()
        };

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(root.name.clone());
        mappings.merge(root);

        let mut pending: Vec<String> = root.dependencies.iter().rev().cloned().collect();
        while let Some(identifier) = pending.pop() {
            if visited.contains(&identifier) {
                trace!(file = %identifier, "Already visited");
                continue;
            }

            let file = self.loader.load(&identifier)?;
            debug!(
                file = %file.name,
                messages = file.messages.len(),
                dependencies = file.dependencies.len(),
                "Loaded dependency"
            );

            let first_visit = visited.insert(file.name.clone());
            visited.insert(identifier);
            if !first_visit {
                // Reached under a second identifier, e.g. module form
                continue;
            }

            mappings.merge(&file);
            pending.extend(file.dependencies.iter().rev().cloned());
        }

        info!(
            files = mappings.file_count(),
            types = mappings.type_count(),
            "Mappings built"
        );
        Ok(mappings)
    }
}
