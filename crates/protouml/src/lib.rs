//! Protouml - UML class diagrams from compiled protobuf schemas
//!
//! Reads a `FileDescriptorSet` (as written by
//! `protoc --include_imports --descriptor_set_out=...`), collects every message
//! type reachable from a root `.proto` file and produces a Graphviz DOT class
//! diagram. Rendering the DOT into an image is left to Graphviz.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! let bytes = std::fs::read("schema.pb").unwrap();
//! let dot = protouml::render_dot(&bytes, "shop/order.proto").unwrap();
//! println!("{}", dot);
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust,no_run
//! use protouml::prelude::*;
//!
//! let loader = DescriptorSetLoader::from_paths(["schema.pb"]).unwrap();
//! let root = loader.load("shop/order.proto").unwrap();
//!
//! // Build the lookup tables for the whole import closure
//! let mappings = MappingBuilder::new(&loader).build(&root).unwrap();
//! println!("{} message types", mappings.type_count());
//!
//! // Generate the DOT document
//! let document = UmlTemplate::new().generate(&mappings).unwrap();
//!
//! // Hand it to Graphviz
//! let renderer = GraphvizRenderer::new();
//! renderer
//!     .render(&document.to_dot(), std::path::Path::new("out/order"), "png")
//!     .unwrap();
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        DiagramError, Field, GraphRenderer, MessageType, OutputFormat, RenderConfig, SchemaFile,
        SchemaLoader,
    };
    pub use crate::plugins::protobuf::{
        DescriptorSetLoader, GraphDocument, MappingBuilder, Mappings, UmlTemplate,
    };
    pub use crate::plugins::{Diagram, GraphvizRenderer};
}

/// Generate the DOT class diagram for `root` from a serialized descriptor set
///
/// # Example
/// ```rust
/// use prost::Message;
/// use prost_types::{DescriptorProto, FileDescriptorProto, FileDescriptorSet};
///
/// let set = FileDescriptorSet {
///     file: vec![FileDescriptorProto {
///         name: Some("empty.proto".to_string()),
///         message_type: vec![DescriptorProto {
///             name: Some("Empty".to_string()),
///             ..Default::default()
///         }],
///         ..Default::default()
///     }],
/// };
///
/// let dot = protouml::render_dot(&set.encode_to_vec(), "empty.proto").unwrap();
/// assert!(dot.contains("{Empty|}"));
/// ```
pub fn render_dot(descriptor_set: &[u8], root: &str) -> anyhow::Result<String> {
    let loader = plugins::protobuf::DescriptorSetLoader::from_bytes(descriptor_set)?;
    Ok(document(&loader, root)?.to_dot())
}

/// Load `root` through `loader` and generate its graph document
pub fn document<L: SchemaLoader>(
    loader: &L,
    root: &str,
) -> anyhow::Result<plugins::protobuf::GraphDocument> {
    use crate::plugins::protobuf::{MappingBuilder, UmlTemplate};

    let root = loader.load(root)?;
    let mappings = MappingBuilder::new(loader).build(&root)?;
    Ok(UmlTemplate::new().generate(&mappings)?)
}

/// Build only the mapping tables for `root`
pub fn mappings<L: SchemaLoader>(
    loader: &L,
    root: &str,
) -> anyhow::Result<plugins::protobuf::Mappings> {
    let root = loader.load(root)?;
    Ok(plugins::protobuf::MappingBuilder::new(loader).build(&root)?)
}
