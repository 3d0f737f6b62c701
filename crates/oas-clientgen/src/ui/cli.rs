use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, ThemeMode};
use crate::generator::emitter::ClientVariant;

#[derive(Parser, Debug)]
#[command(name = "oas-clientgen")]
#[command(author, version, about = "OpenAPI to TypeScript and C# client generator")]
#[command(styles = super::Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate client services and models from an OpenAPI document
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path to the OpenAPI document (JSON, or YAML with a .yaml/.yml extension)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory the generated files are written to
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Client variants to generate (comma-separated: reactive, promise, csharp).
  /// With more than one variant each is written to its own subdirectory
  #[arg(long = "variant", value_name = "VARIANTS", value_delimiter = ',')]
  pub variants: Vec<ClientVariant>,

  /// Root C# namespace (default: the document title in PascalCase)
  #[arg(long, value_name = "NAME")]
  pub root_namespace: Option<String>,

  /// Name of the aggregating C# client class (default: <Namespace>Client)
  #[arg(long, value_name = "NAME")]
  pub client_name: Option<String>,

  /// Generate every schema, including those no operation references
  #[arg(long, default_value_t = false)]
  pub all_models: bool,

  /// Also overwrite write-once files such as derived services and project files
  #[arg(long, default_value_t = false)]
  pub force: bool,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations with their generated function name and tag
  Operations {
    /// Path to the OpenAPI document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
