//! Schema data model
//!
//! Plain values describing a loaded schema unit: the file, the message types
//! it declares and their fields. Loaders produce these; the mapping builder
//! and template generator only read them.

/// A field belonging to a [`MessageType`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Primitive type code (the protobuf `FieldDescriptorProto.Type` number)
    pub type_code: i32,
    /// Name of the referenced message type, if any
    pub message_type: Option<String>,
}

impl Field {
    /// Create a primitive field
    pub fn primitive(name: impl Into<String>, type_code: i32) -> Self {
        Self {
            name: name.into(),
            type_code,
            message_type: None,
        }
    }

    /// Create a field referencing another message type
    pub fn message(name: impl Into<String>, type_code: i32, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_code,
            message_type: Some(target.into()),
        }
    }

    /// Returns true if this field points at another message type
    pub fn is_reference(&self) -> bool {
        self.message_type.is_some()
    }
}

/// A message (record) definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageType {
    pub name: String,
    pub fields: Vec<Field>,
}

impl MessageType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Iterate over the names of message types this one references
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter_map(|field| field.message_type.as_deref())
    }
}

/// A loaded schema unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFile {
    /// Identifier the file is known by, e.g. `shop/order.proto`
    pub name: String,
    pub messages: Vec<MessageType>,
    /// Identifiers of imported schema files, in declaration order
    pub dependencies: Vec<String>,
}

impl SchemaFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: MessageType) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// Base name of the file without directories or extension
    ///
    /// `shop/order.proto` becomes `order`.
    pub fn stem(&self) -> &str {
        let base = self.name.rsplit(['/', '\\']).next().unwrap_or(&self.name);
        match base.rfind('.') {
            Some(dot) if dot > 0 => &base[..dot],
            _ => base,
        }
    }
}
