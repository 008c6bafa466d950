//! Conversion from protobuf descriptors to the schema model

use prost_types::field_descriptor_proto::Type;
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};

use crate::core::{Field, MessageType, SchemaFile};

/// Lowest and highest `FieldDescriptorProto.Type` numbers
const TYPE_CODES: std::ops::RangeInclusive<i32> = 1..=18;

/// Display names for every protobuf field type code
///
/// `TYPE_STRING` (9) becomes `"string"`, `TYPE_MESSAGE` (11) becomes
/// `"message"`.
pub fn primitive_type_names() -> impl Iterator<Item = (i32, String)> {
    TYPE_CODES.filter_map(|code| {
        let ty = Type::try_from(code).ok()?;
        let name = ty.as_str_name().to_lowercase();
        let name = name.strip_prefix("type_").unwrap_or(&name).to_string();
        Some((code, name))
    })
}

/// Convert a file descriptor into a [`SchemaFile`]
///
/// Nested message types are flattened after their parent, depth first, so a
/// field referencing `Outer.Inner` can be resolved by name.
pub fn schema_file(file: &FileDescriptorProto) -> SchemaFile {
    let mut messages = Vec::new();
    for message in &file.message_type {
        flatten_message(message, &mut messages);
    }

    SchemaFile {
        name: file.name().to_string(),
        messages,
        dependencies: file.dependency.clone(),
    }
}

fn flatten_message(message: &DescriptorProto, out: &mut Vec<MessageType>) {
    out.push(MessageType {
        name: message.name().to_string(),
        fields: message.field.iter().map(field).collect(),
    });
    for nested in &message.nested_type {
        flatten_message(nested, out);
    }
}

fn field(field: &FieldDescriptorProto) -> Field {
    let type_code = field.r#type.unwrap_or_default();
    let message_type = match Type::try_from(type_code) {
        Ok(Type::Message | Type::Group) if !field.type_name().is_empty() => {
            Some(short_name(field.type_name()).to_string())
        }
        _ => None,
    };

    Field {
        name: field.name().to_string(),
        type_code,
        message_type,
    }
}

/// Last segment of a fully qualified type name
///
/// `.shop.Order.Item` becomes `Item`.
pub fn short_name(type_name: &str) -> &str {
    type_name.rsplit('.').next().unwrap_or(type_name)
}
