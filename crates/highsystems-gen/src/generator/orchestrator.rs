//! The generation pipeline: compile every operation, then splice the results into the template.
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! let document = DocumentLoader::open("highsystems.json".as_ref()).await?.parse()?;
//! let template = load_template("base.ts".as_ref()).await?;
//!
//! let output = Orchestrator::new(document, template, CodegenConfig::default()).generate();
//! println!("{} methods, {} warnings", output.stats.operations_compiled, output.stats.warnings.len());
//! tokio::fs::write("highsystems.ts", output.code).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;

use itertools::Itertools;

use super::{
  document::ApiDocument,
  metrics::{GenerationStats, GenerationWarning},
  naming::method_name,
  operation_compiler::{Fragment, OperationCompiler},
  overrides::{OverrideConfig, OverrideMode, OverrideResolver},
  schema_walker::INDENT,
  template::{SlotContent, Template},
};

const TYPE_EXPORT_PREFIX: &str = "export type ";
const FRAGMENT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Default, bon::Builder)]
pub struct CodegenConfig {
  #[builder(default)]
  pub overrides: OverrideConfig,
  #[builder(default)]
  pub override_mode: OverrideMode,
}

#[derive(Debug, Clone)]
pub struct GeneratedOutput {
  pub code: String,
  pub stats: GenerationStats,
}

pub struct Orchestrator {
  document: ApiDocument,
  template: Template,
  config: CodegenConfig,
}

impl Orchestrator {
  pub fn new(document: ApiDocument, template: Template, config: CodegenConfig) -> Self {
    Self {
      document,
      template,
      config,
    }
  }

  /// Compiles every operation and renders the client source.
  ///
  /// Paths are visited in document order and verbs in `delete`, `get`, `post`, `put`
  /// order, so the output depends only on the inputs.
  pub fn generate(&self) -> GeneratedOutput {
    let mut stats = GenerationStats::default();
    let fragments = self.compile_fragments(&mut stats);

    let content = SlotContent {
      methods: fragments
        .iter()
        .map(|fragment| indent_block(&fragment.function_definition))
        .join(FRAGMENT_SEPARATOR),
      request_types: export_types(fragments.iter().map(|fragment| fragment.types.req.as_str())),
      response_types: export_types(fragments.iter().map(|fragment| fragment.types.res.as_str())),
    };

    GeneratedOutput {
      code: self.template.render(&content),
      stats,
    }
  }

  fn compile_fragments(&self, stats: &mut GenerationStats) -> Vec<Fragment> {
    let mut resolver = OverrideResolver::new(&self.config.overrides, self.config.override_mode);
    let mut compiler = OperationCompiler::new(&mut resolver);
    let mut seen_methods = HashSet::new();
    let mut fragments = vec![];

    stats.record_paths(self.document.paths.len());

    for (path, method, operation) in self.document.operations() {
      let name = method_name(&operation.operation_id);
      if !seen_methods.insert(name.clone()) {
        stats.record_warning(GenerationWarning::DuplicateMethod {
          operation_id: operation.operation_id.clone(),
          method_name: name,
        });
        continue;
      }

      let compiled = compiler.compile(path, method, operation);
      stats.record_operation(
        !compiled.fragment.types.req.is_empty(),
        !compiled.fragment.types.res.is_empty(),
        compiled.has_body,
      );
      stats.record_renames(compiled.renamed_arguments);
      stats.record_warnings(compiled.warnings);
      fragments.push(compiled.fragment);
    }

    let known_ids = self
      .document
      .operations()
      .map(|(_, _, operation)| operation.operation_id.as_str())
      .collect::<HashSet<_>>();
    stats.record_warnings(
      self
        .config
        .overrides
        .operation_ids()
        .filter(|id| !known_ids.contains(id))
        .map(|id| GenerationWarning::UnusedOverride {
          operation_id: id.to_string(),
        }),
    );

    fragments
  }
}

/// Indents every non-empty line by one level.
fn indent_block(block: &str) -> String {
  block
    .lines()
    .map(|line| {
      if line.is_empty() {
        String::new()
      } else {
        format!("{INDENT}{line}")
      }
    })
    .join("\n")
}

fn export_types<'a>(types: impl Iterator<Item = &'a str>) -> String {
  types
    .filter(|ty| !ty.is_empty())
    .map(|ty| format!("{TYPE_EXPORT_PREFIX}{ty}"))
    .join(FRAGMENT_SEPARATOR)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_indent_block_leaves_blank_lines_empty() {
    assert_eq!(indent_block("a() {\n\tb;\n\n}"), "\ta() {\n\t\tb;\n\n\t}");
  }

  #[test]
  fn test_export_types_skips_empty_fragments() {
    assert_eq!(
      export_types(["A = {};", "", "B = {};"].into_iter()),
      "export type A = {};\n\nexport type B = {};"
    );
    assert_eq!(export_types(std::iter::empty()), "");
  }

  #[test]
  fn test_config_builder_defaults() {
    let config = CodegenConfig::builder().build();
    assert!(config.overrides.is_empty());
    assert_eq!(config.override_mode, OverrideMode::Persistent);

    let config = CodegenConfig::builder().override_mode(OverrideMode::Consume).build();
    assert_eq!(config.override_mode, OverrideMode::Consume);
  }
}
