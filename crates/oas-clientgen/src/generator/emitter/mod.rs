//! Renders parsed operations and types into target-language source files.
//!
//! All variants share [`function_builder`] and [`imports`]; a variant only
//! supplies wrapper syntax through its [`ClientEmitter`] implementation.

pub(crate) mod csharp_client;
pub(crate) mod function_builder;
pub(crate) mod imports;
pub(crate) mod layout;
pub(crate) mod models;
pub(crate) mod promise;
pub(crate) mod reactive;
pub(crate) mod syntax;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use indexmap::IndexMap;
use strum::{Display, EnumIter, EnumString};

use crate::generator::{
  operation_parser::DEFAULT_TAG,
  type_model::RequestFunction,
  type_registry::TypeRegistry,
};

use self::syntax::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum ClientVariant {
  /// RxJS `Observable` services with a regenerated base class and a write-once subclass.
  #[strum(serialize = "reactive")]
  Reactive,
  /// `Promise` services calling a standalone `request` helper.
  #[strum(serialize = "promise")]
  Promise,
  /// `HttpClient` services, an aggregating client class and project files.
  #[strum(serialize = "csharp")]
  CSharp,
}

impl ClientVariant {
  pub fn language(self) -> Language {
    self.emitter().language()
  }

  pub(crate) fn emitter(self) -> &'static dyn ClientEmitter {
    match self {
      Self::Reactive => &reactive::ReactiveEmitter,
      Self::Promise => &promise::PromiseEmitter,
      Self::CSharp => &csharp_client::CSharpClientEmitter,
    }
  }
}

/// How the writer treats a file that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OverwritePolicy {
  #[strum(to_string = "always")]
  Always,
  /// Created once and then left to hand edits.
  #[strum(to_string = "write-once")]
  WriteOnce,
  /// Unique lines are appended to the existing file.
  #[strum(to_string = "merge")]
  Merge,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GenFile {
  #[builder(into, default)]
  pub relative_directory: String,
  #[builder(into)]
  pub file_name: String,
  #[builder(into)]
  pub content: String,
  #[builder(default = OverwritePolicy::Always)]
  pub overwrite_policy: OverwritePolicy,
}

impl GenFile {
  pub fn relative_path(&self) -> PathBuf {
    let mut path = PathBuf::new();
    for segment in self.relative_directory.split('/').filter(|s| !s.is_empty()) {
      path.push(segment);
    }
    path.push(&self.file_name);
    path
  }
}

/// Identifies the input in the banner of regenerated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
  pub title: String,
  pub version: String,
  pub source: String,
}

impl FileHeader {
  /// `//` banner shared by TypeScript and C# files, ending in a blank line.
  pub fn comment(&self) -> String {
    let title = if self.title.is_empty() { "Untitled API" } else { &self.title };
    let version = if self.version.is_empty() {
      String::new()
    } else {
      format!(" {}", self.version)
    };
    format!(
      "// <auto-generated>\n\
       //   AUTO-GENERATED CODE - DO NOT EDIT!\n\
       //   {title}{version}\n\
       //   Source: {}\n\
       //   Generated by `oas-clientgen`\n\
       // </auto-generated>\n\n",
      self.source
    )
  }
}

/// Everything a renderer reads besides the functions it renders.
pub(crate) struct EmitContext<'a> {
  pub(crate) registry: &'a TypeRegistry,
  pub(crate) header: &'a FileHeader,
  /// Root C# namespace; also names the project file.
  pub(crate) root_namespace: &'a str,
  pub(crate) client_name: &'a str,
}

/// One client flavor. Implementations only decide file layout and wrapper
/// syntax; names, signatures, URLs and imports come from the shared builders.
pub(crate) trait ClientEmitter {
  fn language(&self) -> Language;

  /// Service and runtime files for the tag groups.
  fn emit_services(&self, groups: &TagGroups<'_>, ctx: &EmitContext<'_>) -> Vec<GenFile>;
}

pub(crate) type TagGroups<'f> = IndexMap<String, Vec<&'f RequestFunction>>;

/// Functions grouped by tag in order of first appearance.
pub(crate) fn group_by_tag(functions: &[RequestFunction]) -> TagGroups<'_> {
  let mut groups = TagGroups::new();
  for function in functions {
    let tag = function.tag.clone().unwrap_or_else(|| DEFAULT_TAG.to_string());
    groups.entry(tag).or_default().push(function);
  }
  groups
}
