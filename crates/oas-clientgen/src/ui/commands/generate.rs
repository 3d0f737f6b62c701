use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use itertools::Itertools;
use num_format::{Locale, ToFormattedString};
use strum::IntoEnumIterator;

use crate::{
  generator::{
    GeneratorConfig,
    emitter::ClientVariant,
    metrics::GenerationStats,
    orchestrator::{Orchestrator, VariantOutput},
  },
  ui::{Colors, GenerateCommand},
  utils::{
    spec::{SpecFormat, SpecLoader},
    writer::{FileWriter, WriteSummary},
  },
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

fn format_count(count: usize) -> String {
  count.to_formatted_string(&Locale::en)
}

#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub variants: Vec<ClientVariant>,
  pub root_namespace: Option<String>,
  pub client_name: Option<String>,
  pub all_models: bool,
  pub force: bool,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> Self {
    let GenerateCommand {
      input,
      output,
      variants,
      root_namespace,
      client_name,
      all_models,
      force,
      verbose,
      quiet,
    } = command;

    let variants = if variants.is_empty() {
      ClientVariant::iter().collect()
    } else {
      variants.into_iter().unique().collect()
    };

    Self {
      input,
      output,
      variants,
      root_namespace: root_namespace.filter(|name| !name.trim().is_empty()),
      client_name: client_name.filter(|name| !name.trim().is_empty()),
      all_models,
      force,
      verbose,
      quiet,
    }
  }

  pub fn generator_config(&self) -> GeneratorConfig {
    GeneratorConfig::builder()
      .maybe_root_namespace(self.root_namespace.clone())
      .maybe_client_name(self.client_name.clone())
      .all_models(self.all_models)
      .variants(self.variants.clone())
      .build()
  }

  /// `<output>` for a single variant, `<output>/<variant>` otherwise.
  pub fn variant_root(&self, variant: ClientVariant) -> PathBuf {
    if self.variants.len() > 1 {
      self.output.join(variant.to_string())
    } else {
      self.output.clone()
    }
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

  fn log_loading(&self, format: SpecFormat) {
    self.info(
      &format!("Loading {format} OpenAPI document from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    let variants = self.config.variants.iter().join(", ");
    self.info(
      &format!("Generating clients: {variants}")
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Types parsed:", format_count(stats.types_parsed));
    self.stat("", format!("{} models", format_count(stats.models_parsed)));
    self.stat("", format!("{} enums", format_count(stats.enums_parsed)));
    if stats.aliases_parsed > 0 {
      self.stat("", format!("{} aliases", format_count(stats.aliases_parsed)));
    }
    if stats.generic_types_parsed > 0 {
      self.stat("", format!("{} generic", format_count(stats.generic_types_parsed)));
    }
    self.stat("Operations converted:", format_count(stats.operations_converted));
    self.stat("Models emitted:", format_count(stats.models_emitted));
    self.stat("Services emitted:", format_count(stats.services_emitted));
    self.stat("Files generated:", format_count(stats.files_generated));
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", format_count(stats.warnings.len()));
    }

    self.print_cycles(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", format_count(stats.cycles_detected));

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  /// Skipped items always; other warnings only in verbose mode.
  fn print_warnings(&self, stats: &GenerationStats) {
    let printable = stats
      .warnings
      .iter()
      .filter(|warning| warning.is_skipped_item() || self.config.verbose)
      .collect::<Vec<_>>();
    if printable.is_empty() {
      return;
    }

    println!();
    for warning in printable {
      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_written(&self, output: &VariantOutput, root: &std::path::Path, summary: &WriteSummary) {
    self.info(
      &format!(
        "Wrote {} {} files to: {}",
        format_count(summary.total()),
        output.variant,
        root.display()
      )
        .with(self.colors.primary())
        .to_string(),
    );
    self.stat(
      "",
      format!(
        "{} created, {} updated, {} unchanged",
        format_count(summary.created),
        format_count(summary.updated),
        format_count(summary.unchanged)
      ),
    );
    if summary.kept > 0 || summary.merged > 0 {
      self.stat(
        "",
        format!(
          "{} kept, {} merged",
          format_count(summary.kept),
          format_count(summary.merged)
        ),
      );
    }
    if self.config.verbose {
      for file in &output.files {
        println!(
          "              {} ({})",
          file.relative_path().display().to_string().with(self.colors.info()),
          file.overwrite_policy
        );
      }
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated clients".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  let loader = SpecLoader::open(&config.input).await?;
  logger.log_loading(loader.format());
  let document = loader.parse()?;

  logger.log_generating();
  let source_path = config.input.display().to_string();
  let orchestrator = Orchestrator::new(document, config.generator_config(), source_path);
  let (outputs, stats) = orchestrator.generate();
  logger.print_statistics(&stats);

  for output in &outputs {
    let root = config.variant_root(output.variant);
    let writer = FileWriter::new(&root, config.force);
    let summary = writer.write_all(&output.files).await?;
    logger.log_written(output, writer.root(), &summary);
  }

  logger.log_success();
  Ok(())
}
