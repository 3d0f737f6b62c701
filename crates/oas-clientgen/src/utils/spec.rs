use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use strum::Display;

use crate::generator::document::SchemaDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SpecFormat {
  #[default]
  #[strum(to_string = "JSON")]
  Json,
  #[strum(to_string = "YAML")]
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext.to_ascii_lowercase().as_str() {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }
}

/// Memory-mapped input document.
pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(SpecFormat::default(), SpecFormat::from_extension);

    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("cannot read '{}'", path.display()))?;

    Ok(Self { file, format })
  }

  pub fn format(&self) -> SpecFormat {
    self.format
  }

  /// Deserializes the document; JSON errors carry the path of the offending field.
  pub fn parse(&self) -> anyhow::Result<SchemaDocument> {
    let bytes = self.file.as_slice();
    match self.format {
      SpecFormat::Json => {
        let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(deserializer)
          .map_err(|err| anyhow::anyhow!("invalid document at '{}': {}", err.path(), err.inner()))
      }
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(bytes).context("document is not valid UTF-8")?;
        serde_yaml::from_str(content).context("invalid YAML document")
      }
    }
  }
}
