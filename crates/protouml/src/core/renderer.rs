//! Core renderer trait for diagram output
//!
//! A renderer turns a finished graph description into an image file. The
//! pipeline only calls it once the document is fully assembled.

use std::path::{Path, PathBuf};

use super::Result;

/// Core trait for graph renderers
///
/// `destination` is the output path without extension; implementations append
/// the format and return the path they wrote.
pub trait GraphRenderer {
    /// Render `document` in `format` to `destination`
    fn render(&self, document: &str, destination: &Path, format: &str) -> Result<PathBuf>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;
}

impl<R: GraphRenderer + ?Sized> GraphRenderer for &R {
    fn render(&self, document: &str, destination: &Path, format: &str) -> Result<PathBuf> {
        (**self).render(document, destination, format)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Output path for `destination` rendered as `format`
///
/// The format is appended rather than substituted, so dotted stems survive:
/// `out/v1.order` becomes `out/v1.order.png`.
pub fn output_path(destination: &Path, format: &str) -> PathBuf {
    let mut path = destination.as_os_str().to_owned();
    path.push(".");
    path.push(format);
    PathBuf::from(path)
}
