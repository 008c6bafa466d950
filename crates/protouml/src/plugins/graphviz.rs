//! Graphviz renderer
//!
//! Pipes the DOT document into the `dot` executable and lets it write the
//! image.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, span, warn, Level};

use crate::core::{output_path, DiagramError, GraphRenderer, RenderConfig, Result};

/// Renders DOT documents by running Graphviz
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    command: PathBuf,
}

impl GraphvizRenderer {
    /// Renderer running `dot` from `PATH`
    pub fn new() -> Self {
        Self::with_command("dot")
    }

    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::with_command(&config.dot_command)
    }

    pub fn command(&self) -> &Path {
        &self.command
    }
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render(&self, document: &str, destination: &Path, format: &str) -> Result<PathBuf> {
        let render_span = span!(
            Level::INFO,
            "render_graphviz",
            format,
            destination = %destination.display()
        );
        let _enter = render_span.enter();

        if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(DiagramError::render_error(format!(
                "invalid output format '{}'",
                format
            )));
        }

        let output = output_path(destination, format);
        debug!(command = %self.command.display(), output = %output.display(), "Running Graphviz");

        let mut child = Command::new(&self.command)
            .arg(format!("-T{}", format))
            .arg("-o")
            .arg(&output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DiagramError::render_error(format!(
                    "failed to run '{}': {}",
                    self.command.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A write failure here means dot exited early; its status says why.
            if let Err(e) = stdin.write_all(document.as_bytes()) {
                debug!(error = %e, "Graphviz closed stdin early");
            }
        }

        let result = child.wait_with_output()?;
        if !result.status.success() {
            if output.exists() {
                if let Err(e) = std::fs::remove_file(&output) {
                    warn!(output = %output.display(), error = %e, "Could not remove partial output");
                }
            }
            return Err(DiagramError::render_error(format!(
                "'{}' exited with {}: {}",
                self.command.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        info!(output = %output.display(), "Diagram written");
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "graphviz"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_defaults() {
        let renderer = GraphvizRenderer::default();
        assert_eq!(renderer.command(), Path::new("dot"));
        assert_eq!(renderer.name(), "graphviz");
    }

    #[test]
    fn test_from_config() {
        let config = RenderConfig::default().with_dot_command("/opt/graphviz/bin/dot");
        let renderer = GraphvizRenderer::from_config(&config);
        assert_eq!(renderer.command(), Path::new("/opt/graphviz/bin/dot"));
    }

    #[test]
    fn test_missing_executable_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = GraphvizRenderer::with_command(dir.path().join("no-such-dot"));
        let result = renderer.render("digraph {}", &dir.path().join("out"), "png");

        assert!(matches!(result, Err(DiagramError::Render { .. })));
        assert!(!dir.path().join("out.png").exists());
    }

    #[test]
    fn test_invalid_format_is_rejected_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = GraphvizRenderer::new();
        let result = renderer.render("digraph {}", &dir.path().join("out"), "png -o /tmp/x");
        match result {
            Err(DiagramError::Render { message }) => assert!(message.contains("invalid output format")),
            other => panic!("Expected render error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_dot_removes_partial_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-dot");
        std::fs::write(
            &script,
            "#!/bin/sh\ncat > /dev/null\necho partial > \"$3\"\necho 'syntax error in line 1' >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let renderer = GraphvizRenderer::with_command(&script);
        let result = renderer.render("digraph {", &dir.path().join("out"), "png");

        match result {
            Err(DiagramError::Render { message }) => {
                assert!(message.contains("syntax error in line 1"));
            }
            other => panic!("Expected render error, got {:?}", other),
        }
        assert!(!dir.path().join("out.png").exists());
    }
}
