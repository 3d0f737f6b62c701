//! Structural view of source descriptors (`List<Item>`, `Dictionary<string, V>`,
//! `PageList<ItemDto>`) shared by the registry, formatters and emitters.

use std::fmt;

use crate::generator::{generic_name::is_placeholder, type_model::Primitive};

const LIST: &str = "List";
const DICTIONARY: &str = "Dictionary";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Descriptor {
  pub name: String,
  pub args: Vec<Descriptor>,
}

impl Descriptor {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      args: vec![],
    }
  }

  /// Lenient parse: unbalanced brackets are closed implicitly and empty input
  /// yields an empty name, which every formatter maps to its untyped fallback.
  pub fn parse(text: &str) -> Self {
    let text = text.trim();
    let Some(open) = text.find('<') else {
      return Self::named(text);
    };
    let inner = &text[open + 1..];
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    Self {
      name: text[..open].trim().to_string(),
      args: split_top_level_args(inner).into_iter().map(Self::parse).collect(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_empty() && self.args.is_empty()
  }

  pub fn list_item(&self) -> Option<&Descriptor> {
    self.single_generic_argument().filter(|_| self.name == LIST)
  }

  pub fn dictionary_value(&self) -> Option<&Descriptor> {
    match self.args.as_slice() {
      [_, value] if self.name == DICTIONARY => Some(value),
      _ => None,
    }
  }

  pub fn is_collection(&self) -> bool {
    self.list_item().is_some() || self.dictionary_value().is_some()
  }

  pub fn primitive(&self) -> Option<Primitive> {
    if self.args.is_empty() {
      Primitive::parse(&self.name)
    } else {
      None
    }
  }

  pub fn single_generic_argument(&self) -> Option<&Descriptor> {
    match self.args.as_slice() {
      [arg] => Some(arg),
      _ => None,
    }
  }

  /// Named types this descriptor mentions, outermost first, without
  /// primitives, placeholders or the `List`/`Dictionary` shapes.
  pub fn referenced_names(&self) -> Vec<String> {
    let mut names = vec![];
    self.collect_names(&mut names);
    names
  }

  fn collect_names(&self, names: &mut Vec<String>) {
    let is_shape = self.is_collection();
    let is_named = !self.name.is_empty() && self.primitive().is_none() && !is_placeholder(&self.name);
    if !is_shape && is_named && !names.contains(&self.name) {
      names.push(self.name.clone());
    }
    for arg in &self.args {
      arg.collect_names(names);
    }
  }

  /// Rewrites every named leaf or generic base through `map`, leaving the
  /// collection shapes in place. A generic base mapped to a primitive drops
  /// its arguments.
  pub fn map_names(&self, map: &mut impl FnMut(&str) -> Descriptor) -> Descriptor {
    let args = self.args.iter().map(|arg| arg.map_names(map)).collect::<Vec<_>>();
    if self.is_collection() || self.name.is_empty() {
      return Self {
        name: self.name.clone(),
        args,
      };
    }
    let mapped = map(&self.name);
    if args.is_empty() || mapped.primitive().is_some() {
      mapped
    } else {
      Self {
        name: mapped.name,
        args,
      }
    }
  }
}

impl fmt::Display for Descriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)?;
    if self.args.is_empty() {
      return Ok(());
    }
    write!(f, "<")?;
    for (index, arg) in self.args.iter().enumerate() {
      if index > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{arg}")?;
    }
    write!(f, ">")
  }
}

/// Splits on commas that are not nested inside `<...>`.
pub fn split_top_level_args(text: &str) -> Vec<&str> {
  let mut args = vec![];
  let mut depth = 0usize;
  let mut start = 0;
  for (index, ch) in text.char_indices() {
    match ch {
      '<' => depth += 1,
      '>' => depth = depth.saturating_sub(1),
      ',' if depth == 0 => {
        args.push(text[start..index].trim());
        start = index + 1;
      }
      _ => {}
    }
  }
  args.push(text[start..].trim());
  args.into_iter().filter(|arg| !arg.is_empty()).collect()
}
