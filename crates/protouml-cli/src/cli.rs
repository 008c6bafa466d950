//! Command-line interface for the protouml utility
//!
//! Provides a CLI to turn compiled protobuf descriptor sets into UML class
//! diagrams.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use protouml::plugins::protobuf::{DescriptorSetLoader, Mappings};
use protouml::plugins::{Diagram, GraphvizRenderer};
use protouml::{OutputFormat, RenderConfig};

/// Protouml - Draw UML class diagrams from compiled protobuf schemas
#[derive(Parser)]
#[command(name = "protouml")]
#[command(about = "Generate UML class diagrams with Graphviz from compiled protobuf schemas")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Where the schema comes from
#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Compiled descriptor set (protoc --include_imports --descriptor_set_out)
    #[arg(short = 'd', long = "descriptor-set", required = true, num_args = 1..)]
    pub descriptor_sets: Vec<PathBuf>,

    /// Root schema, e.g. shop/order.proto or shop.order
    #[arg(short, long)]
    pub proto: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the class diagram to an image with Graphviz
    Render {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Image format passed to Graphviz
        #[arg(short, long, value_enum)]
        format: Option<FormatChoice>,

        /// Graphviz executable
        #[arg(long)]
        dot_command: Option<PathBuf>,
    },

    /// Print the Graphviz DOT document without rendering it
    Dot {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Output file for the DOT document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the message types reachable from the root schema
    Types {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Supported image formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatChoice {
    Png,
    Svg,
    Pdf,
    Jpg,
    Gif,
    Dot,
}

impl From<FormatChoice> for OutputFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => OutputFormat::Png,
            FormatChoice::Svg => OutputFormat::Svg,
            FormatChoice::Pdf => OutputFormat::Pdf,
            FormatChoice::Jpg => OutputFormat::Jpg,
            FormatChoice::Gif => OutputFormat::Gif,
            FormatChoice::Dot => OutputFormat::Dot,
        }
    }
}

/// One row of the `types` listing
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TypeEntry {
    pub name: String,
    pub index: usize,
    pub file: String,
    pub fields: usize,
}

/// Main CLI application
pub struct ProtoumlApp {
    config: RenderConfig,
}

impl ProtoumlApp {
    /// Create a new application instance configured from the environment
    pub fn new() -> Self {
        Self::with_config(RenderConfig::from_env())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        if cli.verbose {
            eprintln!("Protouml v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                schema,
                output,
                format,
                dot_command,
            } => self.render_command(schema, output, format, dot_command, cli.verbose),
            Commands::Dot { schema, output } => self.dot_command(schema, output, cli.verbose),
            Commands::Types { schema, json } => self.types_command(schema, json),
        }
    }

    /// Handle the render command
    fn render_command(
        &self,
        schema: SchemaArgs,
        output: PathBuf,
        format: Option<FormatChoice>,
        dot_command: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let mut config = self.config.clone();
        if let Some(format) = format {
            config = config.with_format(format.into());
        }
        if let Some(command) = dot_command {
            config = config.with_dot_command(command);
        }
        debug!(?config, "Render configuration");

        let loader = self.loader(&schema)?;
        let renderer = GraphvizRenderer::from_config(&config);
        let diagram = Diagram::new(&loader).from_file(&schema.proto)?;

        // Only create the destination once the root schema has loaded
        prepare_output_dir(&output)?;
        let written = diagram
            .to_file(&output)?
            .build(&renderer, config.format.as_str())?;

        if verbose {
            eprintln!("Successfully rendered {}", written.display());
        }
        println!("{}", written.display());
        Ok(())
    }

    /// Handle the dot command
    fn dot_command(&self, schema: SchemaArgs, output: Option<PathBuf>, verbose: bool) -> Result<()> {
        let loader = self.loader(&schema)?;
        let document = protouml::document(&loader, &schema.proto)?;

        if verbose {
            eprintln!(
                "Generated {} classes and {} relationships",
                document.class_count(),
                document.relationship_count()
            );
        }

        self.write_output(output, &document.to_dot())
    }

    /// Handle the types command
    fn types_command(&self, schema: SchemaArgs, json: bool) -> Result<()> {
        let loader = self.loader(&schema)?;
        let mappings = protouml::mappings(&loader, &schema.proto)?;
        let entries = type_entries(&mappings);

        if json {
            let listing = serde_json::json!({
                "root": schema.proto,
                "files": mappings.files,
                "types": entries,
                "total": entries.len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Message types reachable from {}:", schema.proto);
            let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
            for entry in &entries {
                println!(
                    "  {:>3}  {:<width$}  {} field(s)  [{}]",
                    entry.index,
                    entry.name,
                    entry.fields,
                    entry.file,
                    width = width
                );
            }
            println!();
            println!(
                "Total: {} message type(s) in {} file(s)",
                entries.len(),
                mappings.file_count()
            );
        }

        Ok(())
    }

    fn loader(&self, schema: &SchemaArgs) -> Result<DescriptorSetLoader> {
        if schema.proto.trim().is_empty() {
            return Err(anyhow!("Missing proto file!"));
        }
        let loader = DescriptorSetLoader::from_paths(&schema.descriptor_sets)
            .context("Failed to read descriptor set")?;
        info!(files = loader.file_count(), "Descriptor sets loaded");
        Ok(loader)
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ProtoumlApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Create `path` if missing; reject it if it exists and is not a directory
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(anyhow!("Missing output location!"));
    }
    if path.exists() && !path.is_dir() {
        return Err(anyhow!(
            "Output location '{}' is not a directory",
            path.display()
        ));
    }
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create output directory '{}'", path.display()))?;
    Ok(())
}

/// Rows for the `types` listing, in node index order
pub fn type_entries(mappings: &Mappings) -> Vec<TypeEntry> {
    mappings
        .node_indices
        .iter()
        .filter_map(|(name, index)| {
            let message = mappings.types.get(name)?;
            Some(TypeEntry {
                name: name.to_string(),
                index,
                file: mappings.origins.get(name).cloned().unwrap_or_default(),
                fields: message.fields.len(),
            })
        })
        .collect()
}
