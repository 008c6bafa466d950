//! Diagram orchestrator
//!
//! Sequences the pipeline for one render request:
//! Loader → MappingBuilder → UmlTemplate → GraphRenderer

use std::path::{Path, PathBuf};

use tracing::{debug, info, span, Level};

use crate::core::{DiagramError, GraphRenderer, Result, SchemaFile, SchemaLoader};
use crate::plugins::protobuf::{GraphDocument, MappingBuilder, Mappings, UmlTemplate};

/// A diagram being built for one root schema
///
/// Each step checks that the previous ones ran and fails with
/// [`DiagramError::MissingInput`] otherwise.
///
/// ```no_run
/// use protouml::plugins::protobuf::DescriptorSetLoader;
/// use protouml::plugins::{Diagram, GraphvizRenderer};
///
/// let loader = DescriptorSetLoader::from_paths(["schema.pb"]).unwrap();
/// let written = Diagram::new(&loader)
///     .from_file("shop/order.proto").unwrap()
///     .to_file("out").unwrap()
///     .build(&GraphvizRenderer::new(), "png")
///     .unwrap();
/// println!("{}", written.display());
/// ```
pub struct Diagram<L> {
    loader: L,
    root: Option<SchemaFile>,
    destination: Option<PathBuf>,
    mappings: Option<Mappings>,
    document: Option<GraphDocument>,
}

impl<L: SchemaLoader> Diagram<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            root: None,
            destination: None,
            mappings: None,
            document: None,
        }
    }

    /// Load the root schema
    pub fn from_file(mut self, identifier: &str) -> Result<Self> {
        if identifier.trim().is_empty() {
            return Err(DiagramError::missing_input("Missing proto file!"));
        }
        let root = self.loader.load(identifier)?;
        info!(file = %root.name, messages = root.messages.len(), "Imported");

        self.root = Some(root);
        self.mappings = None;
        self.document = None;
        Ok(self)
    }

    /// Write into `output_dir`, naming the file after the root schema
    pub fn to_file(mut self, output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        if output_dir.as_os_str().is_empty() {
            return Err(DiagramError::missing_input("Missing output location!"));
        }
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| DiagramError::missing_input("No proto file loaded!"))?;

        self.destination = Some(output_dir.join(root.stem()));
        Ok(self)
    }

    pub fn root(&self) -> Option<&SchemaFile> {
        self.root.as_ref()
    }

    /// Output path without the format extension
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn mappings(&self) -> Option<&Mappings> {
        self.mappings.as_ref()
    }

    pub fn document(&self) -> Option<&GraphDocument> {
        self.document.as_ref()
    }

    /// Build the mapping tables for the root's import closure
    pub fn build_mappings(&mut self) -> Result<&Mappings> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| DiagramError::missing_input("No proto file loaded!"))?;

        let mappings = MappingBuilder::new(&self.loader).build(root)?;
        Ok(self.mappings.insert(mappings))
    }

    /// Generate the graph document from the built mappings
    pub fn build_document(&mut self) -> Result<&GraphDocument> {
        let mappings = self
            .mappings
            .as_ref()
            .ok_or_else(|| DiagramError::missing_input("Mappings have not been built!"))?;

        let document = UmlTemplate::new().generate(mappings)?;
        Ok(self.document.insert(document))
    }

    /// Run any remaining steps and render the diagram
    ///
    /// Returns the path the renderer wrote.
    pub fn build<R: GraphRenderer>(mut self, renderer: &R, format: &str) -> Result<PathBuf> {
        let build_span = span!(Level::INFO, "build_diagram", format, renderer = renderer.name());
        let _enter = build_span.enter();

        if self.root.is_none() {
            return Err(DiagramError::missing_input("No proto file loaded!"));
        }
        let destination = self
            .destination
            .clone()
            .ok_or_else(|| DiagramError::missing_input("No output location!"))?;

        if self.mappings.is_none() {
            self.build_mappings()?;
        }
        if self.document.is_none() {
            self.build_document()?;
        }
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| DiagramError::missing_input("Graph document has not been built!"))?;

        info!(
            output = %destination.display(),
            format,
            "Writing diagram"
        );
        let written = renderer.render(&document.to_dot(), &destination, format)?;
        debug!(written = %written.display(), "Render finished");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Field, MessageType};
    use std::cell::RefCell;

    struct OneFileLoader(SchemaFile);

    impl SchemaLoader for OneFileLoader {
        fn load(&self, identifier: &str) -> Result<SchemaFile> {
            if identifier == self.0.name {
                Ok(self.0.clone())
            } else {
                Err(DiagramError::load_error(identifier, "unknown"))
            }
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<(String, PathBuf, String)>>,
    }

    impl GraphRenderer for RecordingRenderer {
        fn render(&self, document: &str, destination: &Path, format: &str) -> Result<PathBuf> {
            self.calls.borrow_mut().push((
                document.to_string(),
                destination.to_path_buf(),
                format.to_string(),
            ));
            Ok(crate::core::output_path(destination, format))
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn order_file() -> SchemaFile {
        SchemaFile::new("shop/order.proto")
            .with_message(MessageType::new("Order").with_field(Field::primitive("id", 5)))
    }

    #[test]
    fn test_empty_identifier_is_missing_input() {
        let result = Diagram::new(OneFileLoader(order_file())).from_file("");
        assert!(matches!(result, Err(DiagramError::MissingInput { .. })));
    }

    #[test]
    fn test_to_file_without_root_is_missing_input() {
        let result = Diagram::new(OneFileLoader(order_file())).to_file("out");
        assert!(matches!(result, Err(DiagramError::MissingInput { .. })));
    }

    #[test]
    fn test_empty_output_is_missing_input() {
        let result = Diagram::new(OneFileLoader(order_file()))
            .from_file("shop/order.proto")
            .unwrap()
            .to_file("");
        assert!(matches!(result, Err(DiagramError::MissingInput { .. })));
    }

    #[test]
    fn test_destination_named_after_root_stem() {
        let diagram = Diagram::new(OneFileLoader(order_file()))
            .from_file("shop/order.proto")
            .unwrap()
            .to_file("out")
            .unwrap();
        assert_eq!(diagram.destination(), Some(Path::new("out/order")));
    }

    #[test]
    fn test_build_document_before_mappings_is_missing_input() {
        let mut diagram = Diagram::new(OneFileLoader(order_file()))
            .from_file("shop/order.proto")
            .unwrap();
        assert!(matches!(
            diagram.build_document(),
            Err(DiagramError::MissingInput { .. })
        ));
    }

    #[test]
    fn test_build_runs_pipeline_and_renders_once() {
        let renderer = RecordingRenderer::default();
        let written = Diagram::new(OneFileLoader(order_file()))
            .from_file("shop/order.proto")
            .unwrap()
            .to_file("out")
            .unwrap()
            .build(&renderer, "svg")
            .unwrap();

        assert_eq!(written, PathBuf::from("out/order.svg"));
        let calls = renderer.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("+ id:int32"));
        assert_eq!(calls[0].1, PathBuf::from("out/order"));
        assert_eq!(calls[0].2, "svg");
    }

    #[test]
    fn test_build_without_output_does_not_render() {
        let renderer = RecordingRenderer::default();
        let result = Diagram::new(OneFileLoader(order_file()))
            .from_file("shop/order.proto")
            .unwrap()
            .build(&renderer, "png");

        assert!(matches!(result, Err(DiagramError::MissingInput { .. })));
        assert!(renderer.calls.borrow().is_empty());
    }
}
