use std::{
  collections::HashSet,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use anyhow::Context;
use strum::Display;

use crate::generator::emitter::{GenFile, OverwritePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum WriteOutcome {
  #[strum(to_string = "created")]
  Created,
  #[strum(to_string = "updated")]
  Updated,
  #[strum(to_string = "unchanged")]
  Unchanged,
  /// A write-once file that already exists.
  #[strum(to_string = "kept")]
  Kept,
  #[strum(to_string = "merged")]
  Merged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
  pub created: usize,
  pub updated: usize,
  pub unchanged: usize,
  pub kept: usize,
  pub merged: usize,
}

impl WriteSummary {
  fn record(&mut self, outcome: WriteOutcome) {
    match outcome {
      WriteOutcome::Created => self.created += 1,
      WriteOutcome::Updated => self.updated += 1,
      WriteOutcome::Unchanged => self.unchanged += 1,
      WriteOutcome::Kept => self.kept += 1,
      WriteOutcome::Merged => self.merged += 1,
    }
  }

  pub fn total(&self) -> usize {
    self.created + self.updated + self.unchanged + self.kept + self.merged
  }
}

/// Writes generated files below one root directory, honoring each file's
/// [`OverwritePolicy`]. `force` also replaces write-once files.
#[derive(Debug, Clone)]
pub struct FileWriter {
  root: PathBuf,
  force: bool,
}

impl FileWriter {
  pub fn new(root: impl Into<PathBuf>, force: bool) -> Self {
    Self {
      root: root.into(),
      force,
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub async fn write_all(&self, files: &[GenFile]) -> anyhow::Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    for file in files {
      summary.record(self.write(file).await?);
    }
    Ok(summary)
  }

  pub async fn write(&self, file: &GenFile) -> anyhow::Result<WriteOutcome> {
    let path = self.root.join(file.relative_path());
    let existing = read_existing(&path).await?;

    let (content, outcome) = match (existing, file.overwrite_policy) {
      (None, _) => (file.content.clone(), WriteOutcome::Created),
      (Some(existing), _) if existing == file.content => return Ok(WriteOutcome::Unchanged),
      (Some(_), OverwritePolicy::WriteOnce) if !self.force => return Ok(WriteOutcome::Kept),
      (Some(existing), OverwritePolicy::Merge) => match merge_lines(&existing, &file.content) {
        Some(merged) => (merged, WriteOutcome::Merged),
        None => return Ok(WriteOutcome::Unchanged),
      },
      (Some(_), OverwritePolicy::Always | OverwritePolicy::WriteOnce) => (file.content.clone(), WriteOutcome::Updated),
    };

    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .with_context(|| format!("cannot create '{}'", parent.display()))?;
    }
    tokio::fs::write(&path, content)
      .await
      .with_context(|| format!("cannot write '{}'", path.display()))?;
    Ok(outcome)
  }
}

async fn read_existing(path: &Path) -> anyhow::Result<Option<String>> {
  match tokio::fs::read_to_string(path).await {
    Ok(content) => Ok(Some(content)),
    Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
    Err(err) => Err(err).with_context(|| format!("cannot read '{}'", path.display())),
  }
}

/// Appends the non-blank lines of `incoming` missing from `existing`;
/// `None` when nothing is missing.
fn merge_lines(existing: &str, incoming: &str) -> Option<String> {
  let present = existing.lines().map(str::trim).collect::<HashSet<_>>();
  let mut seen = HashSet::new();
  let missing = incoming
    .lines()
    .filter(|line| !line.trim().is_empty())
    .filter(|line| !present.contains(line.trim()) && seen.insert(line.trim()))
    .collect::<Vec<_>>();
  if missing.is_empty() {
    return None;
  }

  let mut merged = existing.to_string();
  if !merged.is_empty() && !merged.ends_with('\n') {
    merged.push('\n');
  }
  for line in missing {
    merged.push_str(line);
    merged.push('\n');
  }
  Some(merged)
}
