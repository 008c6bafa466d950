//! Core loader trait for compiled schema units
//!
//! A loader resolves a schema identifier to a [`SchemaFile`]. The mapping
//! builder calls it once per file in the import closure.

use super::{Result, SchemaFile};

/// Core trait for schema loaders
///
/// # Example
/// ```
/// use protouml::core::SchemaLoader;
/// use protouml::plugins::protobuf::DescriptorSetLoader;
///
/// let loader = DescriptorSetLoader::new();
/// assert!(loader.load("missing.proto").is_err());
/// ```
pub trait SchemaLoader {
    /// Load the schema unit named by `identifier`
    fn load(&self, identifier: &str) -> Result<SchemaFile>;
}

impl<L: SchemaLoader + ?Sized> SchemaLoader for &L {
    fn load(&self, identifier: &str) -> Result<SchemaFile> {
        (**self).load(identifier)
    }
}

/// Resolve a schema identifier to a descriptor file name
///
/// Identifiers ending in `.proto` are already file names. Anything else is a
/// namespaced module name: `.` separators become directory separators and the
/// `.proto` suffix is appended. A trailing `_pb2` (the name of a generated
/// Python module) is dropped first.
///
/// ```
/// use protouml::core::resolve_identifier;
///
/// assert_eq!(resolve_identifier("shop/order.proto"), "shop/order.proto");
/// assert_eq!(resolve_identifier("shop.order"), "shop/order.proto");
/// assert_eq!(resolve_identifier("shop.order_pb2"), "shop/order.proto");
/// ```
pub fn resolve_identifier(identifier: &str) -> String {
    let identifier = identifier.trim();
    if identifier.ends_with(".proto") {
        identifier.replace('\\', "/")
    } else {
        let module = identifier.strip_suffix("_pb2").unwrap_or(identifier);
        format!("{}.proto", module.replace('.', "/"))
    }
}
