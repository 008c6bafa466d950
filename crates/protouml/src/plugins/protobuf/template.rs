//! Graph template generator
//!
//! Turns [`Mappings`] into a Graphviz DOT document: one record-shaped node
//! per message type listing its fields, and one edge per message-typed field.

use std::fmt;

use tracing::{debug, enabled, info, span, Level};

use super::mapping::Mappings;
use crate::core::{DiagramError, Field, MessageType, Result};

const GRAPH_HEADER: &str = r#"digraph "Protobuf UML class diagram" {
    fontname = "Bitstream Vera Sans"
    fontsize = 8

    node [
        fontname = "Bitstream Vera Sans"
        fontsize = 8
        shape = "record"
        style=filled
        fillcolor=gray95
    ]

    edge [
        fontname = "Bitstream Vera Sans"
        fontsize = 8
    ]
"#;

/// A generated graph description
///
/// `classes` holds one node statement per message type, `relationships` one
/// `source->target` pair per message-typed field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphDocument {
    pub classes: Vec<String>,
    pub relationships: Vec<String>,
}

impl GraphDocument {
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Complete DOT source
    pub fn to_dot(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GraphDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", GRAPH_HEADER)?;
        for class in &self.classes {
            writeln!(f, "    {}", class)?;
        }
        writeln!(f)?;
        for relationship in &self.relationships {
            writeln!(f, "    {}", relationship)?;
        }
        writeln!(f, "}}")
    }
}

/// Generates a [`GraphDocument`] from built mappings
#[derive(Debug, Clone, Copy, Default)]
pub struct UmlTemplate;

impl UmlTemplate {
    pub fn new() -> Self {
        Self
    }

    /// Generate the document
    ///
    /// Node labels and edge endpoints both come from the mapping's node
    /// index table. A type or type code missing from the tables is a
    /// [`DiagramError::Lookup`].
    pub fn generate(&self, mappings: &Mappings) -> Result<GraphDocument> {
        let template_span = span!(
            Level::INFO,
            "generate_template",
            types = mappings.type_count()
        );
        let _enter = template_span.enter();

        let mut document = GraphDocument::default();

        for (name, message) in &mappings.types {
            let index = node_index(mappings, name)?;
            let mut lines = Vec::with_capacity(message.fields.len());

            for field in &message.fields {
                let type_name = match &field.message_type {
                    Some(target) => {
                        let target_index = node_index(mappings, target)?;
                        document
                            .relationships
                            .push(format!("{}->{}", index, target_index));
                        target.as_str()
                    }
                    None => primitive_name(mappings, message, field)?,
                };
                lines.push(format!("+ {}:{}", field.name, type_name));
            }

            document.classes.push(format!(
                "{}[label = \"{{{}|{}}}\"]",
                index,
                escape_label(name),
                lines
                    .iter()
                    .map(|line| escape_label(line))
                    .collect::<Vec<_>>()
                    .join("\\n")
            ));
        }

        info!(
            classes = document.class_count(),
            relationships = document.relationship_count(),
            "Template generated"
        );
        if enabled!(Level::DEBUG) {
            debug!(dot = %document, "UML template");
        }

        Ok(document)
    }
}

fn node_index(mappings: &Mappings, name: &str) -> Result<usize> {
    mappings
        .node_indices
        .get(name)
        .ok_or_else(|| DiagramError::lookup_error(format!("no node index for message '{}'", name)))
}

fn primitive_name<'a>(
    mappings: &'a Mappings,
    message: &MessageType,
    field: &Field,
) -> Result<&'a str> {
    mappings.type_codes.name(field.type_code).ok_or_else(|| {
        DiagramError::lookup_error(format!(
            "unknown type code {} for field '{}.{}'",
            field.type_code, message.name, field.name
        ))
    })
}

/// Escape characters with meaning inside a record label
fn escape_label(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>' | '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::protobuf::mapping::TypeCodeTable;

    fn mappings(types: Vec<MessageType>) -> Mappings {
        let mut mappings = Mappings {
            type_codes: TypeCodeTable::protobuf(),
            ..Default::default()
        };
        for message in types {
            mappings.node_indices.assign(&message.name);
            mappings.types.insert(message.name.clone(), message);
        }
        mappings
    }

    #[test]
    fn test_primitive_fields() {
        let doc = UmlTemplate::new()
            .generate(&mappings(vec![MessageType::new("Customer")
                .with_field(Field::primitive("name", 9))
                .with_field(Field::primitive("score", 1))]))
            .unwrap();

        assert_eq!(
            doc.classes,
            vec![r#"2[label = "{Customer|+ name:string\n+ score:double}"]"#]
        );
        assert!(doc.relationships.is_empty());
    }

    #[test]
    fn test_message_field_creates_edge() {
        let doc = UmlTemplate::new()
            .generate(&mappings(vec![
                MessageType::new("Order").with_field(Field::message("customer", 11, "Customer")),
                MessageType::new("Customer"),
            ]))
            .unwrap();

        assert_eq!(doc.relationships, vec!["2->3"]);
        assert!(doc.classes[0].contains("+ customer:Customer"));
        assert!(!doc.classes[0].contains("message"));
        assert_eq!(doc.classes[1], r#"3[label = "{Customer|}"]"#);
    }

    #[test]
    fn test_self_reference() {
        let doc = UmlTemplate::new()
            .generate(&mappings(vec![
                MessageType::new("Node").with_field(Field::message("parent", 11, "Node"))
            ]))
            .unwrap();
        assert_eq!(doc.relationships, vec!["2->2"]);
    }

    #[test]
    fn test_unknown_target_is_lookup_error() {
        let result = UmlTemplate::new().generate(&mappings(vec![
            MessageType::new("Order").with_field(Field::message("customer", 11, "Customer"))
        ]));
        assert!(matches!(result, Err(DiagramError::Lookup { .. })));
    }

    #[test]
    fn test_unknown_type_code_is_lookup_error() {
        let result = UmlTemplate::new().generate(&mappings(vec![
            MessageType::new("Order").with_field(Field::primitive("odd", 99))
        ]));
        match result {
            Err(DiagramError::Lookup { message }) => assert!(message.contains("Order.odd")),
            other => panic!("Expected lookup error, got {:?}", other),
        }
    }

    #[test]
    fn test_dot_skeleton() {
        let doc = GraphDocument {
            classes: vec!["2[label = \"{A|}\"]".to_string()],
            relationships: vec!["2->2".to_string()],
        };
        let dot = doc.to_dot();

        assert!(dot.starts_with("digraph \"Protobuf UML class diagram\" {"));
        assert!(dot.contains("shape = \"record\""));
        assert!(dot.contains("fillcolor=gray95"));
        assert!(dot.contains("    2[label = \"{A|}\"]\n"));
        assert!(dot.contains("    2->2\n"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.find("label").unwrap() < dot.find("2->2").unwrap());
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("+ id:int32"), "+ id:int32");
        assert_eq!(escape_label("a|b"), "a\\|b");
        assert_eq!(escape_label("{x}"), "\\{x\\}");
    }
}
