//! Render configuration
//!
//! Holds the settings that select how the finished graph is turned into a
//! file: the output format and the Graphviz executable to run.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable overriding the output format
pub const FORMAT_ENV: &str = "PROTOUML_FORMAT";

/// Environment variable overriding the Graphviz executable
pub const DOT_COMMAND_ENV: &str = "PROTOUML_DOT";

/// Common Graphviz output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    Pdf,
    Jpg,
    Gif,
    /// Laid-out DOT with positions, as produced by `dot -Tdot`
    Dot,
}

impl OutputFormat {
    /// Graphviz `-T` token for this format
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Gif => "gif",
            OutputFormat::Dot => "dot",
        }
    }

    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["png", "svg", "pdf", "jpg", "gif", "dot"]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "gif" => Ok(OutputFormat::Gif),
            "dot" | "gv" => Ok(OutputFormat::Dot),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for rendering a diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub dot_command: PathBuf,
}

impl RenderConfig {
    pub fn new(format: OutputFormat, dot_command: impl Into<PathBuf>) -> Self {
        Self {
            format,
            dot_command: dot_command.into(),
        }
    }

    /// Defaults overlaid with `PROTOUML_FORMAT` and `PROTOUML_DOT`
    ///
    /// An unparseable `PROTOUML_FORMAT` is ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(FORMAT_ENV) {
            match value.parse() {
                Ok(format) => config.format = format,
                Err(e) => tracing::warn!(variable = FORMAT_ENV, error = %e, "Ignoring format"),
            }
        }

        if let Some(command) = std::env::var_os(DOT_COMMAND_ENV).filter(|v| !v.is_empty()) {
            config.dot_command = PathBuf::from(command);
        }

        config
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_dot_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.dot_command = command.into();
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(OutputFormat::default(), "dot")
    }
}
