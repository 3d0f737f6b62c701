//! Orchestration of the schema-to-client pipeline.
//!
//! Schemas are parsed into one [`TypeRegistry`], operations are parsed once per
//! target language against the complete registry, and every requested variant
//! renders its models and services into [`GenFile`]s. Nothing here touches the
//! filesystem; writing is left to the caller.
//!
//! ## Usage
//!
//! ```text
//! let document = SpecLoader::open(Path::new("openapi.json")).await?.parse()?;
//! let orchestrator = Orchestrator::new(document, GeneratorConfig::default(), "openapi.json");
//! let (outputs, stats) = orchestrator.generate();
//! ```

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::generator::{
  GeneratorConfig,
  document::SchemaDocument,
  emitter::{
    ClientVariant, EmitContext, FileHeader, GenFile, group_by_tag, imports::referenced_type_names, models::emit_models,
    syntax::Language,
  },
  metrics::GenerationStats,
  naming::identifiers::to_type_name,
  operation_parser::OperationParser,
  type_model::RequestFunction,
  type_registry::TypeRegistry,
};

const FALLBACK_NAMESPACE: &str = "ApiClient";

/// Files rendered for one client variant, relative to that variant's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOutput {
  pub variant: ClientVariant,
  pub files: Vec<GenFile>,
}

pub struct Orchestrator {
  document: SchemaDocument,
  config: GeneratorConfig,
  source_path: String,
}

impl Orchestrator {
  pub fn new(document: SchemaDocument, config: GeneratorConfig, source_path: impl Into<String>) -> Self {
    Self {
      document,
      config,
      source_path: source_path.into(),
    }
  }

  pub fn header(&self) -> FileHeader {
    FileHeader {
      title: self.document.info.title.clone(),
      version: self.document.info.version.clone(),
      source: self.source_path.clone(),
    }
  }

  /// Configured root namespace, else the document title in `PascalCase`.
  pub fn root_namespace(&self) -> String {
    if let Some(namespace) = self.config.root_namespace.as_deref().filter(|n| !n.trim().is_empty()) {
      return namespace.trim().to_string();
    }
    if self.document.info.title.trim().is_empty() {
      return FALLBACK_NAMESPACE.to_string();
    }
    to_type_name(&self.document.info.title)
  }

  pub fn client_name(&self) -> String {
    if let Some(name) = self.config.client_name.as_deref().filter(|n| !n.trim().is_empty()) {
      return to_type_name(name);
    }
    let root = self.root_namespace();
    let last_segment = root.rsplit('.').next().unwrap_or(FALLBACK_NAMESPACE);
    format!("{}Client", to_type_name(last_segment))
  }

  /// Parsed operations with TypeScript type text, for listing.
  pub fn operations(&self) -> (Vec<RequestFunction>, GenerationStats) {
    let mut stats = GenerationStats::default();
    let registry = TypeRegistry::build(&self.document, &mut stats);
    let functions = OperationParser::new(&self.document, &registry, Language::TypeScript.formatter()).parse_all(&mut stats);
    (functions, stats)
  }

  /// Runs the pipeline for every configured variant.
  ///
  /// Operations are parsed once per target language; parse warnings are
  /// recorded once even when several languages are rendered.
  pub fn generate(&self) -> (Vec<VariantOutput>, GenerationStats) {
    let mut stats = GenerationStats::default();
    let registry = TypeRegistry::build(&self.document, &mut stats);
    stats.record_cycles(registry.detect_cycles());

    let header = self.header();
    let root_namespace = self.root_namespace();
    let client_name = self.client_name();
    let ctx = EmitContext {
      registry: &registry,
      header: &header,
      root_namespace: &root_namespace,
      client_name: &client_name,
    };

    let mut functions_by_language = BTreeMap::<Language, Vec<RequestFunction>>::new();
    let mut outputs = vec![];

    for variant in self.config.variants.iter().copied().unique() {
      let language = variant.language();
      if !functions_by_language.contains_key(&language) {
        let parser = OperationParser::new(&self.document, &registry, language.formatter());
        let functions = if functions_by_language.is_empty() {
          parser.parse_all(&mut stats)
        } else {
          parser.parse_all(&mut GenerationStats::default())
        };
        functions_by_language.insert(language, functions);
      }
      let Some(functions) = functions_by_language.get(&language) else {
        continue;
      };

      let models = if self.config.all_models {
        registry.declarations().collect::<Vec<_>>()
      } else {
        registry.reachable(&referenced_type_names(functions))
      };
      let groups = group_by_tag(functions);

      let mut files = emit_models(language, &models, &ctx);
      files.extend(variant.emitter().emit_services(&groups, &ctx));

      stats.record_models_emitted(models.len());
      stats.record_services_emitted(groups.len());
      stats.record_files(files.len());
      outputs.push(VariantOutput { variant, files });
    }

    (outputs, stats)
  }
}
