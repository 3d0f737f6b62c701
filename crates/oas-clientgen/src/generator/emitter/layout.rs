//! Where generated models live and how files refer to each other.

use crate::generator::{
  emitter::syntax::Language,
  naming::identifiers::{to_file_stem, to_type_name},
  type_model::TypeMeta,
};

pub(crate) const TS_MODELS_DIR: &str = "models";
pub(crate) const TS_SERVICES_DIR: &str = "services";
pub(crate) const CS_MODELS_DIR: &str = "Models";
pub(crate) const CS_SERVICES_DIR: &str = "Services";
const ENUMS_DIR: &str = "enums";
const CS_ENUMS_DIR: &str = "Enums";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModelLocation {
  pub(crate) directory: String,
  pub(crate) file_name: String,
  /// Module path for TypeScript imports, namespace for C# usings.
  pub(crate) module: String,
}

/// Enums go under an `enums` directory; other models are bucketed by their
/// trimmed namespace hint.
pub(crate) fn model_location(language: Language, meta: &TypeMeta, root_namespace: &str) -> ModelLocation {
  let hint_segments = meta
    .namespace_hint
    .as_deref()
    .map(|hint| hint.split('.').filter(|s| !s.is_empty()).collect::<Vec<_>>())
    .unwrap_or_default();

  match language {
    Language::TypeScript => {
      let directory = if meta.is_enum {
        format!("{TS_MODELS_DIR}/{ENUMS_DIR}")
      } else {
        std::iter::once(TS_MODELS_DIR.to_string())
          .chain(hint_segments.iter().map(|segment| to_file_stem(segment)))
          .collect::<Vec<_>>()
          .join("/")
      };
      let stem = to_file_stem(&meta.name);
      ModelLocation {
        module: format!("{directory}/{stem}"),
        file_name: format!("{stem}.ts"),
        directory,
      }
    }
    Language::CSharp => {
      let segments = if meta.is_enum {
        vec![CS_ENUMS_DIR.to_string()]
      } else {
        hint_segments.iter().map(|segment| to_type_name(segment)).collect()
      };
      let directory = std::iter::once(CS_MODELS_DIR.to_string())
        .chain(segments.iter().cloned())
        .collect::<Vec<_>>()
        .join("/");
      let module = std::iter::once(root_namespace.to_string())
        .chain(std::iter::once(CS_MODELS_DIR.to_string()))
        .chain(segments)
        .collect::<Vec<_>>()
        .join(".");
      ModelLocation {
        directory,
        file_name: format!("{}.cs", meta.name),
        module,
      }
    }
  }
}

/// Relative ES module specifier from a file in `from_dir` to `target_module`.
///
/// # Example
///
/// ```text
/// services/base -> models/item       => ../../models/item
/// models        -> models/enums/color => ./enums/color
/// ```
pub(crate) fn relative_module(from_dir: &str, target_module: &str) -> String {
  let from = from_dir.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>();
  let target = target_module.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>();
  let target_dir = &target[..target.len().saturating_sub(1)];

  let common = from.iter().zip(target_dir).take_while(|(a, b)| a == b).count();
  let ups = from.len() - common;

  let mut parts = if ups == 0 {
    vec![".".to_string()]
  } else {
    vec!["..".to_string(); ups]
  };
  parts.extend(target[common..].iter().map(|s| (*s).to_string()));
  parts.join("/")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn meta(name: &str, hint: Option<&str>, is_enum: bool) -> TypeMeta {
    TypeMeta::builder()
      .name(name)
      .full_name(name)
      .maybe_namespace_hint(hint)
      .is_enum(is_enum)
      .build()
  }

  #[test]
  fn test_typescript_locations() {
    let location = model_location(Language::TypeScript, &meta("OrderLine", Some("Sales.Orders"), false), "Api");
    assert_eq!(location.directory, "models/sales/orders");
    assert_eq!(location.file_name, "order-line.ts");
    assert_eq!(location.module, "models/sales/orders/order-line");

    let location = model_location(Language::TypeScript, &meta("Color", Some("Sales"), true), "Api");
    assert_eq!(location.module, "models/enums/color");
  }

  #[test]
  fn test_csharp_locations() {
    let location = model_location(Language::CSharp, &meta("OrderLine", Some("sales.orders"), false), "Shop");
    assert_eq!(location.directory, "Models/Sales/Orders");
    assert_eq!(location.file_name, "OrderLine.cs");
    assert_eq!(location.module, "Shop.Models.Sales.Orders");

    let location = model_location(Language::CSharp, &meta("Item", None, false), "Shop");
    assert_eq!(location.directory, "Models");
    assert_eq!(location.module, "Shop.Models");

    let location = model_location(Language::CSharp, &meta("Color", None, true), "Shop");
    assert_eq!(location.module, "Shop.Models.Enums");
  }

  #[test]
  fn test_relative_module() {
    assert_eq!(relative_module("services/base", "models/item"), "../../models/item");
    assert_eq!(relative_module("services", "models/enums/color"), "../models/enums/color");
    assert_eq!(relative_module("models", "models/enums/color"), "./enums/color");
    assert_eq!(relative_module("models/enums", "models/item"), "../item");
    assert_eq!(relative_module("models", "models/item"), "./item");
    assert_eq!(relative_module("", "request"), "./request");
  }
}
