//! Import resolution shared by every variant.

use std::collections::{BTreeMap, BTreeSet};

use crate::generator::{
  descriptor::Descriptor,
  emitter::{
    layout::{model_location, relative_module},
    syntax::Language,
  },
  type_model::{ParameterLocation, RequestFunction, TypeMeta},
  type_registry::TypeRegistry,
};

/// Declared type names mentioned by the request, response and parameters of
/// `functions`, generic arguments included. Form fields travel inside the
/// form data argument and are not part of any signature.
pub(crate) fn referenced_type_names<'f>(functions: impl IntoIterator<Item = &'f RequestFunction>) -> BTreeSet<String> {
  let mut names = BTreeSet::new();
  for function in functions {
    let params = function
      .params
      .iter()
      .filter(|param| param.location != ParameterLocation::Form)
      .map(|param| param.source_type_text.as_str());
    let descriptors = [
      function.request_source_text.as_deref(),
      function.response_source_text.as_deref(),
    ]
    .into_iter()
    .flatten()
    .chain(params);

    for text in descriptors {
      names.extend(Descriptor::parse(text).referenced_names());
    }
  }
  names
}

/// Emitted declarations for `names`, without `own_name`, deduplicated by full
/// name and sorted by display name. Unknown and inlined names are dropped.
pub(crate) fn resolve_imports<'r>(
  registry: &'r TypeRegistry,
  names: &BTreeSet<String>,
  own_name: Option<&str>,
) -> Vec<&'r TypeMeta> {
  let mut by_full_name = BTreeMap::new();
  for name in names {
    if Some(name.as_str()) == own_name {
      continue;
    }
    if let Some(meta) = registry.by_name(name).filter(|meta| !TypeRegistry::is_inlined(meta)) {
      by_full_name.entry(meta.full_name.as_str()).or_insert(meta);
    }
  }
  let mut metas = by_full_name.into_values().collect::<Vec<_>>();
  metas.sort_by(|a, b| a.name.cmp(&b.name));
  metas
}

/// One `import { Name } from '...';` per type, relative to `from_dir`.
pub(crate) fn typescript_imports(metas: &[&TypeMeta], from_dir: &str) -> Vec<String> {
  metas
    .iter()
    .map(|meta| {
      let location = model_location(Language::TypeScript, meta, "");
      format!(
        "import {{ {} }} from '{}';",
        meta.name,
        relative_module(from_dir, &location.module)
      )
    })
    .collect()
}

/// One `using` per namespace, skipping `current_namespace`.
pub(crate) fn csharp_usings(metas: &[&TypeMeta], root_namespace: &str, current_namespace: Option<&str>) -> Vec<String> {
  metas
    .iter()
    .map(|meta| model_location(Language::CSharp, meta, root_namespace).module)
    .filter(|namespace| Some(namespace.as_str()) != current_namespace)
    .collect::<BTreeSet<_>>()
    .into_iter()
    .map(|namespace| format!("using {namespace};"))
    .collect()
}
