//! Name-keyed table of every [`TypeMeta`] of one generation run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use indexmap::IndexMap;
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap, visit::Dfs};

use crate::generator::{
  descriptor::Descriptor,
  document::SchemaDocument,
  generic_name::is_placeholder,
  metrics::{GenerationStats, GenerationWarning},
  naming::operations::trim_common_namespace,
  schema_parser::{SchemaKey, SchemaParser},
  type_model::{Primitive, TypeMeta},
};

/// Alias chains longer than this resolve to an untyped value.
const MAX_ALIAS_DEPTH: usize = 8;

/// One instantiation's view of a member type, next to the concrete generic
/// arguments of that instantiation.
struct Sample<'a> {
  descriptor: &'a Descriptor,
  arguments: &'a [Descriptor],
}

/// Rewrites a member type into the declaration's placeholder form.
///
/// A position becomes placeholder `k` when every instantiation holds its own
/// `k`th argument there. When all instantiations share that argument and it is
/// a primitive, only nested positions (list items, generic arguments,
/// dictionary values) are rewritten so unrelated scalar members keep their type.
fn generic_template(samples: &[Sample<'_>], params: &[String], nested: bool) -> Descriptor {
  let Some(first) = samples.first() else {
    return Descriptor::default();
  };
  let first = first.descriptor;

  for (index, param) in params.iter().enumerate() {
    let holds_argument = samples
      .iter()
      .all(|sample| sample.arguments.get(index) == Some(sample.descriptor));
    if !holds_argument {
      continue;
    }
    let varies = samples
      .iter()
      .any(|sample| sample.arguments.get(index) != samples[0].arguments.get(index));
    if varies || nested || first.primitive().is_none() {
      return Descriptor::named(param.clone());
    }
  }

  let same_shape = samples
    .iter()
    .all(|sample| sample.descriptor.name == first.name && sample.descriptor.args.len() == first.args.len());
  if !same_shape {
    return first.clone();
  }

  let is_dictionary = first.dictionary_value().is_some();
  let args = (0..first.args.len())
    .map(|position| {
      if is_dictionary && position == 0 {
        return first.args[0].clone();
      }
      let column = samples
        .iter()
        .map(|sample| Sample {
          descriptor: &sample.descriptor.args[position],
          arguments: sample.arguments,
        })
        .collect::<Vec<_>>();
      generic_template(&column, params, true)
    })
    .collect();
  Descriptor {
    name: first.name.clone(),
    args,
  }
}

fn generic_arguments(meta: &TypeMeta) -> Vec<Descriptor> {
  meta
    .generic_params
    .iter()
    .map(|param| Descriptor::parse(&param.full_name))
    .collect()
}

/// Placeholder text for one member of `meta`, given the same member's text in
/// each other instantiation (`None` where that instantiation lacks it).
fn template_text(
  own: &str,
  own_arguments: &[Descriptor],
  others: &[(Option<&str>, &[Descriptor])],
  params: &[String],
) -> String {
  let own = Descriptor::parse(own);
  let others = others
    .iter()
    .filter_map(|&(text, arguments)| text.map(|text| (Descriptor::parse(text), arguments)))
    .collect::<Vec<_>>();
  let samples = std::iter::once(Sample {
    descriptor: &own,
    arguments: own_arguments,
  })
  .chain(others.iter().map(|(descriptor, arguments)| Sample {
    descriptor,
    arguments: *arguments,
  }))
  .collect::<Vec<_>>();
  generic_template(&samples, params, false).to_string()
}

/// Rewrites the properties and alias of a generic declaration, built from its
/// first instantiation, into placeholder form using every instantiation.
fn apply_generic_template(meta: &mut TypeMeta, others: &[TypeMeta]) {
  let params = meta.generic_params.iter().map(|param| param.name.clone()).collect::<Vec<_>>();
  let own_arguments = generic_arguments(meta);
  let other_arguments = others.iter().map(generic_arguments).collect::<Vec<_>>();

  let property_texts = meta
    .properties
    .iter()
    .map(|property| {
      let others = others
        .iter()
        .zip(&other_arguments)
        .map(|(other, arguments)| {
          let text = other
            .properties
            .iter()
            .find(|candidate| candidate.name == property.name)
            .map(|candidate| candidate.source_type_text.as_str());
          (text, arguments.as_slice())
        })
        .collect::<Vec<_>>();
      template_text(&property.source_type_text, &own_arguments, &others, &params)
    })
    .collect::<Vec<_>>();

  let alias = meta.alias_of.as_deref().map(|alias| {
    let others = others
      .iter()
      .zip(&other_arguments)
      .map(|(other, arguments)| (other.alias_of.as_deref(), arguments.as_slice()))
      .collect::<Vec<_>>();
    template_text(alias, &own_arguments, &others, &params)
  });

  for (property, text) in meta.properties.iter_mut().zip(property_texts) {
    property.source_type_text = text;
  }
  meta.alias_of = alias;
}

fn dependency_graph(dependencies: &BTreeMap<String, BTreeSet<String>>) -> DiGraphMap<&str, ()> {
  let mut graph = DiGraphMap::<&str, ()>::new();
  for (node, deps) in dependencies {
    graph.add_node(node.as_str());
    for dep in deps {
      graph.add_edge(node.as_str(), dep.as_str(), ());
    }
  }
  graph
}

/// A descriptor with aliases inlined and unknown names replaced by `object`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDescriptor {
  pub descriptor: Descriptor,
  pub unresolved: Vec<String>,
}

impl ResolvedDescriptor {
  pub fn text(&self) -> String {
    self.descriptor.to_string()
  }
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
  types: IndexMap<String, TypeMeta>,
  by_name: HashMap<String, String>,
  by_raw_key: HashMap<String, String>,
}

impl TypeRegistry {
  /// Parses every component schema once. Later instantiations of an already
  /// registered generic type map onto the first one and only inform which
  /// member positions become placeholders; a failing schema is kept as an
  /// untyped alias and reported.
  pub fn build(document: &SchemaDocument, stats: &mut GenerationStats) -> Self {
    let parser = SchemaParser::new(document);
    let mut registry = Self::default();
    let mut instantiations: HashMap<String, Vec<TypeMeta>> = HashMap::new();

    for (raw_key, node) in &document.components.schemas {
      let key = SchemaKey::parse(raw_key);
      if registry.types.contains_key(&key.full_name) {
        if key.generic.is_some()
          && let Ok(instantiation) = parser.parse_schema(raw_key, node)
        {
          instantiations.entry(key.full_name.clone()).or_default().push(instantiation);
        }
        registry.by_raw_key.insert(raw_key.clone(), key.full_name);
        continue;
      }
      if let Some(existing) = registry.by_name.get(&key.name) {
        let existing = registry.types[existing].raw_key.clone();
        stats.record_warning(GenerationWarning::DuplicateTypeName {
          name: key.name.clone(),
          existing,
          duplicate: raw_key.clone(),
        });
        let full_name = registry.by_name[&key.name].clone();
        registry.by_raw_key.insert(raw_key.clone(), full_name);
        continue;
      }

      let meta = parser.parse_schema(raw_key, node).unwrap_or_else(|error| {
        stats.record_warning(GenerationWarning::SchemaConversionFailed {
          schema_name: raw_key.clone(),
          error: error.to_string(),
        });
        TypeMeta {
          name: key.name.clone(),
          full_name: key.full_name.clone(),
          raw_key: raw_key.clone(),
          alias_of: Some(Primitive::Object.to_string()),
          ..Default::default()
        }
      });
      registry.insert(meta);
    }

    for meta in registry.types.values_mut().filter(|meta| meta.is_generic()) {
      let others = instantiations.remove(&meta.full_name).unwrap_or_default();
      apply_generic_template(meta, &others);
    }

    registry.trim_namespaces();
    for meta in registry.types.values() {
      stats.record_type(meta);
    }
    registry
  }

  pub fn insert(&mut self, meta: TypeMeta) {
    self.by_name.insert(meta.name.clone(), meta.full_name.clone());
    self.by_raw_key.insert(meta.raw_key.clone(), meta.full_name.clone());
    self.types.insert(meta.full_name.clone(), meta);
  }

  fn trim_namespaces(&mut self) {
    let hints = self.types.values().map(|meta| meta.namespace_hint.clone()).collect::<Vec<_>>();
    for (meta, hint) in self.types.values_mut().zip(trim_common_namespace(&hints)) {
      meta.namespace_hint = hint;
    }
  }

  #[cfg(test)]
  pub fn get(&self, full_name: &str) -> Option<&TypeMeta> {
    self.types.get(full_name)
  }

  pub fn by_name(&self, name: &str) -> Option<&TypeMeta> {
    self.by_name.get(name).and_then(|full_name| self.types.get(full_name))
  }

  pub fn by_raw_key(&self, raw_key: &str) -> Option<&TypeMeta> {
    self.by_raw_key.get(raw_key).and_then(|full_name| self.types.get(full_name))
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.types.len()
  }

  /// Whether a reference to `meta` is replaced by what it aliases instead of
  /// pointing at an emitted declaration.
  pub fn is_inlined(meta: &TypeMeta) -> bool {
    meta.is_primitive_alias() || (meta.is_reference && !meta.is_enum && meta.alias_of.is_some())
  }

  /// Types that are emitted as their own declaration.
  pub fn declarations(&self) -> impl Iterator<Item = &TypeMeta> {
    self.types.values().filter(|meta| !Self::is_inlined(meta))
  }

  pub fn resolve_descriptor(&self, text: &str) -> ResolvedDescriptor {
    self.resolve(&Descriptor::parse(text))
  }

  pub fn resolve(&self, descriptor: &Descriptor) -> ResolvedDescriptor {
    let mut unresolved = vec![];
    let descriptor = self.resolve_in(descriptor, &mut unresolved, 0);
    ResolvedDescriptor { descriptor, unresolved }
  }

  fn resolve_in(&self, descriptor: &Descriptor, unresolved: &mut Vec<String>, depth: usize) -> Descriptor {
    descriptor.map_names(&mut |name| {
      if Primitive::is_primitive(name) || is_placeholder(name) {
        return Descriptor::named(name);
      }
      match self.by_name(name) {
        Some(meta) if Self::is_inlined(meta) => match meta.alias_of.as_deref() {
          Some(alias) if depth < MAX_ALIAS_DEPTH => self.resolve_in(&Descriptor::parse(alias), unresolved, depth + 1),
          _ => Descriptor::named(Primitive::Object.to_string()),
        },
        Some(_) => Descriptor::named(name),
        None => {
          if !unresolved.iter().any(|known| known == name) {
            unresolved.push(name.to_string());
          }
          Descriptor::named(Primitive::Object.to_string())
        }
      }
    })
  }

  /// Names of emitted declarations that `meta` refers to. Generic arguments
  /// are already placeholders and contribute nothing.
  pub fn dependencies_of(&self, meta: &TypeMeta) -> BTreeSet<String> {
    let mut dependencies = BTreeSet::new();
    if meta.is_enum {
      return dependencies;
    }

    let descriptors = meta
      .properties
      .iter()
      .map(|property| property.source_type_text.as_str())
      .chain(meta.alias_of.as_deref());

    for text in descriptors {
      let resolved = self.resolve_in(&Descriptor::parse(text), &mut vec![], 0);
      for name in resolved.referenced_names() {
        if self.by_name(&name).is_some() {
          dependencies.insert(name);
        }
      }
    }
    dependencies
  }

  fn dependency_map(&self) -> BTreeMap<String, BTreeSet<String>> {
    self
      .declarations()
      .map(|meta| (meta.name.clone(), self.dependencies_of(meta)))
      .collect()
  }

  /// Declarations reachable from `roots` (type names), in registry order.
  pub fn reachable<'r>(&'r self, roots: &BTreeSet<String>) -> Vec<&'r TypeMeta> {
    let dependencies = self.dependency_map();
    let graph = dependency_graph(&dependencies);

    let mut expanded = BTreeSet::new();
    for start in roots {
      if graph.contains_node(start.as_str()) {
        let mut dfs = Dfs::new(&graph, start.as_str());
        while let Some(node) = dfs.next(&graph) {
          expanded.insert(node.to_string());
        }
      }
    }

    self.declarations().filter(|meta| expanded.contains(&meta.name)).collect()
  }

  /// Strongly connected groups of declarations, including self-references.
  pub fn detect_cycles(&self) -> Vec<Vec<String>> {
    let dependencies = self.dependency_map();
    let graph = dependency_graph(&dependencies);

    let mut cycles = kosaraju_scc(&graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
      .map(|scc| {
        let mut names = scc.into_iter().map(String::from).collect::<Vec<_>>();
        names.sort();
        names
      })
      .collect::<Vec<_>>();
    cycles.sort();
    cycles
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn registry(schemas: serde_json::Value) -> (TypeRegistry, GenerationStats) {
    let document: SchemaDocument =
      serde_json::from_value(json!({ "components": { "schemas": schemas } })).expect("valid document");
    let mut stats = GenerationStats::default();
    let registry = TypeRegistry::build(&document, &mut stats);
    (registry, stats)
  }

  fn names(metas: &[&TypeMeta]) -> Vec<String> {
    metas.iter().map(|meta| meta.name.clone()).collect()
  }

  #[test]
  fn test_generic_instantiations_are_memoized() {
    let (registry, stats) = registry(json!({
      "NS.PageList`1[[NS.Item, App]]": {
        "type": "object",
        "properties": { "items": { "type": "array", "items": { "$ref": "#/components/schemas/NS.Item" } } }
      },
      "NS.PageList`1[[NS.Order, App]]": {
        "type": "object",
        "properties": { "items": { "type": "array", "items": { "$ref": "#/components/schemas/NS.Order" } } }
      },
      "NS.Item": { "type": "object" },
      "NS.Order": { "type": "object" }
    }));

    assert_eq!(registry.len(), 3);
    let page = registry.get("PageList<T>").expect("generic registered");
    assert_eq!(page.generic_params[0].full_name, "Item");
    assert_eq!(
      registry.by_raw_key("NS.PageList`1[[NS.Order, App]]").map(|m| m.full_name.as_str()),
      Some("PageList<T>")
    );
    assert_eq!(stats.generic_types_parsed, 1);
    assert!(stats.warnings.is_empty());
  }

  fn property_texts(meta: &TypeMeta) -> Vec<(&str, &str)> {
    meta
      .properties
      .iter()
      .map(|property| (property.name.as_str(), property.source_type_text.as_str()))
      .collect()
  }

  #[test]
  fn test_primitive_argument_only_replaces_nested_positions() {
    let (registry, _) = registry(json!({
      "NS.PageList`1[[System.Int32, System.Private.CoreLib]]": {
        "type": "object",
        "properties": {
          "items": { "type": "array", "items": { "type": "integer", "format": "int32" } },
          "total": { "type": "integer", "format": "int32" },
          "pageIndex": { "type": "integer", "format": "int32" }
        }
      }
    }));
    let page = registry.get("PageList<T>").expect("generic registered");
    assert_eq!(page.generic_params[0].full_name, "int32");
    assert_eq!(
      property_texts(page),
      [("items", "List<T>"), ("total", "int32"), ("pageIndex", "int32")]
    );
  }

  #[test]
  fn test_later_instantiations_decide_placeholder_positions() {
    let (registry, _) = registry(json!({
      "NS.ApiResult`1[[System.Boolean, System.Private.CoreLib]]": {
        "type": "object",
        "properties": {
          "data": { "type": "boolean" },
          "success": { "type": "boolean" },
          "message": { "type": "string" }
        }
      },
      "NS.ApiResult`1[[NS.Item, App]]": {
        "type": "object",
        "properties": {
          "data": { "$ref": "#/components/schemas/NS.Item" },
          "success": { "type": "boolean" },
          "message": { "type": "string" }
        }
      },
      "NS.ApiResult`1[[System.String, System.Private.CoreLib]]": {
        "type": "object",
        "properties": {
          "data": { "type": "string" },
          "success": { "type": "boolean" },
          "message": { "type": "string" }
        }
      },
      "NS.Item": { "type": "object" }
    }));
    let result = registry.get("ApiResult<T>").expect("generic registered");
    assert_eq!(result.raw_key, "NS.ApiResult`1[[System.Boolean, System.Private.CoreLib]]");
    assert_eq!(
      property_texts(result),
      [("data", "T"), ("success", "boolean"), ("message", "string")]
    );
    assert!(registry.dependencies_of(result).is_empty());
  }

  #[test]
  fn test_dictionary_keys_are_never_placeholders() {
    let (registry, _) = registry(json!({
      "NS.Lookup`1[[System.String, System.Private.CoreLib]]": {
        "type": "object",
        "properties": {
          "entries": { "type": "object", "additionalProperties": { "type": "string" } },
          "name": { "type": "string" }
        }
      }
    }));
    let lookup = registry.get("Lookup<T>").expect("generic registered");
    assert_eq!(
      property_texts(lookup),
      [("entries", "Dictionary<string, T>"), ("name", "string")]
    );
  }

  #[test]
  fn test_namespaces_are_trimmed() {
    let (registry, _) = registry(json!({
      "Shop.Api.Dtos.Item": { "type": "object" },
      "Shop.Api.Dtos.Orders.Order": { "type": "object" }
    }));
    assert_eq!(registry.by_name("Item").and_then(|m| m.namespace_hint.clone()), None);
    assert_eq!(
      registry.by_name("Order").and_then(|m| m.namespace_hint.clone()).as_deref(),
      Some("Orders")
    );
  }

  #[test]
  fn test_duplicate_short_names_keep_the_first() {
    let (registry, stats) = registry(json!({
      "A.Item": { "type": "object", "properties": { "a": { "type": "string" } } },
      "B.Item": { "type": "object", "properties": { "b": { "type": "string" } } }
    }));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.by_name("Item").map(|m| m.raw_key.as_str()), Some("A.Item"));
    assert!(matches!(
      stats.warnings.as_slice(),
      [GenerationWarning::DuplicateTypeName { .. }]
    ));
  }

  #[test]
  fn test_failed_schema_becomes_untyped() {
    let (registry, stats) = registry(json!({
      "Ratio": { "type": "number", "enum": [0.5] }
    }));
    let meta = registry.by_name("Ratio").expect("fallback registered");
    assert!(meta.is_primitive_alias());
    assert!(stats.warnings[0].is_skipped_item());
    assert_eq!(registry.resolve_descriptor("List<Ratio>").text(), "List<object>");
  }

  #[test]
  fn test_resolve_descriptor_inlines_aliases_and_reports_unknowns() {
    let (registry, _) = registry(json!({
      "Code": { "type": "string", "format": "uuid" },
      "CodeRef": { "$ref": "#/components/schemas/Code" },
      "Tags": { "type": "array", "items": { "type": "string" } },
      "Item": { "type": "object" }
    }));

    let resolved = registry.resolve_descriptor("Dictionary<string, List<CodeRef>>");
    assert_eq!(resolved.text(), "Dictionary<string, List<uuid>>");
    assert!(resolved.unresolved.is_empty());

    assert_eq!(registry.resolve_descriptor("Tags").text(), "Tags");

    let resolved = registry.resolve_descriptor("List<Missing>");
    assert_eq!(resolved.text(), "List<object>");
    assert_eq!(resolved.unresolved, ["Missing"]);

    let resolved = registry.resolve_descriptor("Pair<Item, Missing>");
    assert_eq!(resolved.text(), "object");
    assert_eq!(resolved.unresolved, ["Missing", "Pair"]);
  }

  #[test]
  fn test_reachable_follows_properties_but_not_generic_arguments() {
    let (registry, _) = registry(json!({
      "NS.PageList`1[[NS.Item, App]]": {
        "type": "object",
        "properties": {
          "items": { "type": "array", "items": { "$ref": "#/components/schemas/NS.Item" } },
          "meta": { "$ref": "#/components/schemas/NS.PageMeta" }
        }
      },
      "NS.Item": { "type": "object", "properties": { "color": { "$ref": "#/components/schemas/NS.Color" } } },
      "NS.PageMeta": { "type": "object" },
      "NS.Color": { "type": "integer", "enum": [0, 1] },
      "NS.Unused": { "type": "object" }
    }));

    let page = registry.get("PageList<T>").unwrap();
    assert_eq!(
      registry.dependencies_of(page).into_iter().collect::<Vec<_>>(),
      ["PageMeta"]
    );

    let roots = BTreeSet::from(["PageList".to_string(), "Item".to_string()]);
    assert_eq!(
      names(&registry.reachable(&roots)),
      ["PageList", "Item", "PageMeta", "Color"]
    );
  }

  #[test]
  fn test_detect_cycles() {
    let (registry, _) = registry(json!({
      "Node": {
        "type": "object",
        "properties": { "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } } }
      },
      "A": { "type": "object", "properties": { "b": { "$ref": "#/components/schemas/B" } } },
      "B": { "type": "object", "properties": { "a": { "$ref": "#/components/schemas/A" } } },
      "Leaf": { "type": "object" }
    }));
    assert_eq!(
      registry.detect_cycles(),
      vec![vec!["A".to_string(), "B".to_string()], vec!["Node".to_string()]]
    );
  }
}
