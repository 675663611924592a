use std::path::Path;

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};

use crate::generator::{document::ApiDocument, template::Template};

/// Memory-maps the API document and parses it on demand.
pub struct DocumentLoader {
  file: AsyncMmapFile,
}

impl DocumentLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open API document {}", path.display()))?;
    Ok(Self { file })
  }

  pub fn parse(&self) -> anyhow::Result<ApiDocument> {
    parse_document(self.file.as_slice())
  }
}

/// Parses a JSON API document, reporting the JSON path of the first offending value.
pub fn parse_document(content: &[u8]) -> anyhow::Result<ApiDocument> {
  let deserializer = &mut serde_json::Deserializer::from_slice(content);
  serde_path_to_error::deserialize(deserializer).context("failed to parse API document")
}

pub async fn load_template(path: &Path) -> anyhow::Result<Template> {
  let source = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read template {}", path.display()))?;
  Template::parse(&source).with_context(|| format!("invalid template {}", path.display()))
}
