//! Core error types for diagram generation
//!
//! Every stage of the pipeline (loading, mapping, template generation and
//! rendering) reports failures through [`DiagramError`].

use thiserror::Error;

/// Core error types for diagram generation
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Missing input: {message}")]
    MissingInput { message: String },

    #[error("Load error: cannot load '{identifier}': {message}")]
    Load { identifier: String, message: String },

    #[error("Decode error: {source}")]
    Decode {
        #[from]
        source: prost::DecodeError,
    },

    #[error("Lookup error: {message}")]
    Lookup { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new missing input error
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::MissingInput {
            message: message.into(),
        }
    }

    /// Create a new load error for the given schema identifier
    pub fn load_error(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create a new lookup error
    pub fn lookup_error(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

/// Result alias used across the crate
pub type Result<T, E = DiagramError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_error() {
        let error = DiagramError::missing_input("Missing proto file!");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Missing input"));
        assert!(error_msg.contains("Missing proto file!"));
    }

    #[test]
    fn test_load_error() {
        let error = DiagramError::load_error("shop/order.proto", "not in descriptor set");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Load error"));
        assert!(error_msg.contains("shop/order.proto"));
        assert!(error_msg.contains("not in descriptor set"));
    }

    #[test]
    fn test_lookup_error() {
        let error = DiagramError::lookup_error("Customer has no node index");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Lookup error"));
        assert!(error_msg.contains("Customer"));
    }

    #[test]
    fn test_render_error() {
        let error = DiagramError::render_error("dot exited with status 1");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Render error"));
        assert!(error_msg.contains("status 1"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: DiagramError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
