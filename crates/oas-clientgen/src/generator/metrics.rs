use strum::Display;

use crate::generator::type_model::{RequestFunction, TypeMeta};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_parsed: usize,
  pub models_parsed: usize,
  pub enums_parsed: usize,
  pub aliases_parsed: usize,
  pub generic_types_parsed: usize,
  pub operations_converted: usize,
  pub models_emitted: usize,
  pub services_emitted: usize,
  pub files_generated: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_type(&mut self, meta: &TypeMeta) {
    self.types_parsed += 1;
    if meta.is_enum {
      self.enums_parsed += 1;
    } else if meta.alias_of.is_some() {
      self.aliases_parsed += 1;
    } else {
      self.models_parsed += 1;
    }
    if meta.is_generic() {
      self.generic_types_parsed += 1;
    }
  }

  pub fn record_operations(&mut self, functions: &[RequestFunction]) {
    self.operations_converted += functions.len();
  }

  pub fn record_models_emitted(&mut self, count: usize) {
    self.models_emitted += count;
  }

  pub fn record_services_emitted(&mut self, count: usize) {
    self.services_emitted += count;
  }

  pub fn record_files(&mut self, count: usize) {
    self.files_generated += count;
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Failed to convert schema '{schema_name}': {error}")]
  SchemaConversionFailed { schema_name: String, error: String },
  #[strum(to_string = "Failed to convert operation '{method} {path}': {error}")]
  OperationConversionFailed {
    method: String,
    path: String,
    error: String,
  },
  #[strum(to_string = "Unresolved reference '{reference}' in {context}, falling back to an untyped value")]
  UnresolvedReference { context: String, reference: String },
  #[strum(to_string = "Type name '{name}' is declared by both '{existing}' and '{duplicate}'; keeping the first")]
  DuplicateTypeName {
    name: String,
    existing: String,
    duplicate: String,
  },
  #[strum(to_string = "[{function}] path '{path}' has no parameter named '{parameter}'; the segment is kept literally")]
  UnmatchedPathParameter {
    function: String,
    path: String,
    parameter: String,
  },
  #[strum(to_string = "[{function}] {location} parameter '{name}' is not supported and was skipped")]
  UnsupportedParameter {
    function: String,
    name: String,
    location: String,
  },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(
      self,
      Self::SchemaConversionFailed { .. } | Self::OperationConversionFailed { .. }
    )
  }
}
