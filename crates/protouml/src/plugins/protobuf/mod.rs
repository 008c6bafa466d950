//! Protobuf schema plugin
//!
//! Loads compiled descriptor sets, maps their message types and generates the
//! UML class diagram template.

mod descriptor;
mod loader;
mod mapping;
mod template;

pub use descriptor::{primitive_type_names, schema_file, short_name};
pub use loader::DescriptorSetLoader;
pub use mapping::{MappingBuilder, Mappings, NodeIndexTable, TypeCodeTable, FIRST_NODE_INDEX};
pub use template::{GraphDocument, UmlTemplate};
