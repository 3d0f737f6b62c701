pub(crate) mod descriptor;
pub(crate) mod document;
pub(crate) mod emitter;
pub(crate) mod formatter;
pub(crate) mod generic_name;
pub(crate) mod metrics;
pub(crate) mod naming;
pub(crate) mod operation_parser;
pub mod orchestrator;
pub(crate) mod path_template;
pub(crate) mod schema_parser;
pub(crate) mod type_model;
pub(crate) mod type_registry;

#[cfg(test)]
mod tests;

use strum::IntoEnumIterator;

use crate::generator::emitter::ClientVariant;

/// Options of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GeneratorConfig {
  /// Root C# namespace; derived from the document title when absent.
  #[builder(into)]
  pub root_namespace: Option<String>,
  /// Emit every declaration instead of only those reachable from operations.
  #[builder(default)]
  pub all_models: bool,
  /// Name of the aggregating C# client class; `<Root>Client` when absent.
  #[builder(into)]
  pub client_name: Option<String>,
  #[builder(default = ClientVariant::iter().collect())]
  pub variants: Vec<ClientVariant>,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}
