use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{
    document::ApiDocument,
    metrics::GenerationStats,
    orchestrator::{CodegenConfig, Orchestrator},
    overrides::{OverrideConfig, OverrideMode},
    template::Template,
  },
  ui::{Colors, GenerateCommand},
  utils::spec::{DocumentLoader, load_template},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub template: PathBuf,
  pub output: PathBuf,
  pub overrides: Option<PathBuf>,
  pub override_mode: OverrideMode,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      template,
      output,
      overrides,
      override_mode,
      verbose,
      quiet,
    } = command;

    if input == output || template == output {
      anyhow::bail!("Output path {} would overwrite one of the inputs", output.display());
    }

    Ok(Self {
      input,
      template,
      output,
      overrides,
      override_mode: override_mode.into(),
      verbose,
      quiet,
    })
  }

  async fn load_document(&self) -> anyhow::Result<ApiDocument> {
    DocumentLoader::open(&self.input).await?.parse()
  }

  async fn read_template(&self) -> anyhow::Result<Template> {
    load_template(&self.template).await
  }

  async fn load_overrides(&self) -> anyhow::Result<OverrideConfig> {
    match &self.overrides {
      Some(path) => OverrideConfig::load(path).await,
      None => Ok(OverrideConfig::default()),
    }
  }

  fn create_orchestrator(&self, document: ApiDocument, template: Template, overrides: OverrideConfig) -> Orchestrator {
    let config = CodegenConfig::builder()
      .overrides(overrides)
      .override_mode(self.override_mode)
      .build();
    Orchestrator::new(document, template, config)
  }

  async fn write_output(&self, code: String) -> anyhow::Result<()> {
    if let Some(parent) = self.output.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    tokio::fs::write(&self.output, code)
      .await
      .with_context(|| format!("failed to write {}", self.output.display()))?;
    Ok(())
  }
}

fn entry_count(overrides: &OverrideConfig) -> String {
  if overrides.is_empty() {
    "no".to_string()
  } else {
    overrides.len().to_string()
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading API document from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_document(&self, document: &ApiDocument) {
    if let Some(base_url) = document.base_url() {
      self.stat("API:", base_url);
    }
    self.stat("Paths:", document.paths.len().to_string());
  }

  fn log_overrides(&self, overrides: &OverrideConfig) {
    if let Some(path) = &self.config.overrides {
      self.info(
        &format!("Loaded {} override entries from: {}", entry_count(overrides), path.display())
          .with(self.colors.primary())
          .to_string(),
      );
    }
  }

  fn log_generating(&self) {
    self.info(&"Generating TypeScript client...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Paths visited:", stats.paths_visited.to_string());
    self.stat("Methods generated:", stats.operations_compiled.to_string());
    self.stat("", format!("{} with a request body", stats.operations_with_body));
    self.stat("Request types:", stats.request_types_generated.to_string());
    self.stat("Response types:", stats.response_types_generated.to_string());
    if stats.arguments_renamed > 0 {
      self.stat("Arguments renamed:", stats.arguments_renamed.to_string());
    }
    self.stat("Warnings:", stats.warnings.len().to_string());

    self.print_warnings(stats);
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    if stats.warnings.is_empty() || self.config.quiet {
      return;
    }

    let mut printed_header = false;
    for warning in &stats.warnings {
      if !(warning.is_skipped_item() || self.config.verbose) {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated TypeScript client".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let document = config.load_document().await?;
  logger.log_document(&document);
  let template = config.read_template().await?;
  let overrides = config.load_overrides().await?;
  logger.log_overrides(&overrides);

  logger.log_generating();
  let output = config.create_orchestrator(document, template, overrides).generate();
  logger.print_statistics(&output.stats);

  logger.log_writing();
  config.write_output(output.code).await?;

  logger.log_success();
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::{
    cli::OverrideModeArg,
    colors::{Colors, Theme},
  };

  fn command(dir: &std::path::Path, output: &str) -> GenerateCommand {
    GenerateCommand {
      input: dir.join("api.json"),
      template: dir.join("base.ts"),
      output: dir.join(output),
      overrides: None,
      override_mode: OverrideModeArg::Persistent,
      verbose: false,
      quiet: true,
    }
  }

  #[test]
  fn test_from_command_rejects_output_over_input() {
    let dir = std::path::Path::new("work");
    let result = GenerateConfig::from_command(command(dir, "api.json"));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("would overwrite"));
  }

  #[test]
  fn test_from_command_maps_override_mode() {
    let dir = std::path::Path::new("work");
    let mut cmd = command(dir, "out.ts");
    cmd.override_mode = OverrideModeArg::Consume;
    let config = GenerateConfig::from_command(cmd).unwrap();
    assert_eq!(config.override_mode, OverrideMode::Consume);
  }

  #[tokio::test]
  async fn test_generate_code_writes_output_into_new_directory() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("api.json"), include_str!("../../../fixtures/widgets.json"))
      .await
      .unwrap();
    tokio::fs::write(dir.path().join("base.ts"), include_str!("../../../fixtures/base.ts"))
      .await
      .unwrap();
    let overrides_path = dir.path().join("overrides.json");
    tokio::fs::write(&overrides_path, include_str!("../../../fixtures/overrides.json"))
      .await
      .unwrap();

    let mut cmd = command(dir.path(), "dist/client/highsystems.ts");
    cmd.overrides = Some(overrides_path);
    let config = GenerateConfig::from_command(cmd).unwrap();
    let colors = Colors::new(false, Theme::Dark);
    generate_code(config, &colors).await.unwrap();

    let code = tokio::fs::read_to_string(dir.path().join("dist/client/highsystems.ts"))
      .await
      .unwrap();
    assert!(code.contains("public async getWidget("));
    assert!(code.contains("export type HighSystemsRequestGetWidget = {"));
    assert!(!code.contains("//** METHODS **//"));
    assert!(!code.contains("@generator-remove"));
  }

  #[tokio::test]
  async fn test_generate_code_fails_on_bad_template() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("api.json"), include_str!("../../../fixtures/widgets.json"))
      .await
      .unwrap();
    tokio::fs::write(dir.path().join("base.ts"), "export class HighSystems {}\n")
      .await
      .unwrap();

    let config = GenerateConfig::from_command(command(dir.path(), "out.ts")).unwrap();
    let colors = Colors::new(false, Theme::Dark);
    let err = generate_code(config, &colors).await.unwrap_err();
    assert!(format!("{err:#}").contains("marker"));
    assert!(!dir.path().join("out.ts").exists());
  }
}
