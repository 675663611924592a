use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::generator::overrides::OverrideMode;

#[derive(Parser, Debug)]
#[command(name = "highsystems-gen")]
#[command(author, version, about = "High Systems API to TypeScript client generator")]
#[command(styles = Colors::clap_styles())]
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
  /// List information from the API document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate the TypeScript client from the API document
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path to the API JSON document
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Path to the client template containing the insertion markers
  #[arg(short, long, value_name = "FILE")]
  pub template: PathBuf,

  /// Path where the generated client will be written
  #[arg(short, long, value_name = "FILE")]
  pub output: PathBuf,

  /// JSON file with per-operation argument renames and schema patches
  #[arg(long, value_name = "FILE")]
  pub overrides: Option<PathBuf>,

  /// Whether an argument rename applies on every lookup or only the first
  #[arg(long, value_enum, default_value = "persistent")]
  pub override_mode: OverrideModeArg,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverrideModeArg {
  /// Renames apply to every lookup
  #[default]
  Persistent,
  /// A rename is used once, later lookups keep the original name
  Consume,
}

impl From<OverrideModeArg> for OverrideMode {
  fn from(mode: OverrideModeArg) -> Self {
    match mode {
      OverrideModeArg::Persistent => Self::Persistent,
      OverrideModeArg::Consume => Self::Consume,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations defined in the API document
  Operations {
    /// Path to the API JSON document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
