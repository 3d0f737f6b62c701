//! Parser for generic schema keys emitted by .NET tooling.
//!
//! Grammar (whitespace around separators is ignored):
//!
//! ```text
//! key      = name [ "`" arity [ "[" arg ( "," arg )* "]" ] ]
//! arg      = "[" qualified "]" | qualified
//! qualified = key ( "," assembly-qualifier )*
//! ```
//!
//! Assembly qualifiers (`App, Version=1.0.0.0, Culture=neutral, ...`) are
//! dropped. Arguments may themselves be generic.

use strum::Display;

use crate::generator::naming::identifiers::to_type_name;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenericNameError {
  #[strum(to_string = "empty type name in '{key}'")]
  EmptyName { key: String },
  #[strum(to_string = "missing generic arity after '`' in '{key}'")]
  MissingArity { key: String },
  #[strum(to_string = "unclosed '[' in '{key}'")]
  UnclosedBracket { key: String },
  #[strum(to_string = "expected '[' after generic arity in '{key}', found '{found}'")]
  UnexpectedCharacter { key: String, found: char },
  #[strum(to_string = "'{key}' declares {expected} generic argument(s) but lists {found}")]
  ArityMismatch { key: String, expected: usize, found: usize },
}

impl std::error::Error for GenericNameError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericName {
  pub namespace: Option<String>,
  pub base_name: String,
  pub arity: usize,
  pub args: Vec<GenericName>,
}

/// Placeholder name for the generic parameter at `index`: `T`, `T2`, `T3`, ...
pub fn placeholder(index: usize) -> String {
  if index == 0 {
    "T".to_string()
  } else {
    format!("T{}", index + 1)
  }
}

/// `T`, `T1`, `T2`, ... but not `Type` or `Tx`.
pub fn is_placeholder(token: &str) -> bool {
  token
    .strip_prefix('T')
    .is_some_and(|rest| rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Argument position a placeholder stands for: `T` and `T1` are the first, `T2` the second.
pub fn placeholder_index(token: &str) -> Option<usize> {
  if !is_placeholder(token) {
    return None;
  }
  match token[1..].parse::<usize>() {
    Ok(0) => None,
    Ok(number) => Some(number - 1),
    Err(_) => Some(0),
  }
}

pub fn parse_generic_name(key: &str) -> Result<GenericName, GenericNameError> {
  parse_qualified(key, key)
}

/// Renders `Base<Arg1, Arg2>` using short names and no descriptor mapping.
pub fn render_generic_name(name: &GenericName) -> String {
  if name.args.is_empty() {
    return name.base_name.clone();
  }
  let args = name.args.iter().map(render_generic_name).collect::<Vec<_>>();
  format!("{}<{}>", name.base_name, args.join(", "))
}

impl GenericName {
  fn plain(qualified: &str) -> Self {
    let (namespace, base_name) = split_namespace(qualified);
    Self {
      namespace,
      base_name,
      arity: 0,
      args: vec![],
    }
  }

  pub fn is_generic(&self) -> bool {
    self.arity > 0
  }

  /// The base name as a target-language type identifier.
  pub fn type_name(&self) -> String {
    to_type_name(&self.base_name)
  }

  /// `Outer<T>` for one argument, `Outer<T,T2,...>` for more; the bare base name otherwise.
  pub fn normalized_full_name(&self) -> String {
    if self.arity == 0 {
      return self.type_name();
    }
    let params = (0..self.arity).map(placeholder).collect::<Vec<_>>();
    format!("{}<{}>", self.type_name(), params.join(","))
  }

  /// Source descriptor for this name: well-known system types become primitives
  /// or collection shapes, everything else renders as `Base<Args>`.
  pub fn descriptor(&self) -> String {
    if let Some(descriptor) = self.system_descriptor() {
      return descriptor;
    }
    if self.args.is_empty() {
      return self.type_name();
    }
    let args = self.args.iter().map(Self::descriptor).collect::<Vec<_>>();
    format!("{}<{}>", self.type_name(), args.join(", "))
  }

  fn system_descriptor(&self) -> Option<String> {
    let namespace = self.namespace.as_deref()?;
    if namespace != "System" && !namespace.starts_with("System.") {
      return None;
    }

    let primitive = match self.base_name.as_str() {
      "String" | "Char" | "TimeSpan" | "Uri" => "string",
      "Int16" | "UInt16" | "Int32" | "Byte" | "SByte" => "int32",
      "Int64" | "UInt32" | "UInt64" => "int64",
      "Boolean" => "boolean",
      "Single" => "float",
      "Double" => "double",
      "Decimal" => "decimal",
      "Guid" => "uuid",
      "DateTime" | "DateTimeOffset" => "date-time",
      "DateOnly" => "date",
      "TimeOnly" => "time",
      "Object" => "object",
      _ => "",
    };
    if !primitive.is_empty() {
      return Some(primitive.to_string());
    }

    match (self.base_name.as_str(), self.args.as_slice()) {
      ("Nullable", [inner]) => Some(inner.descriptor()),
      (
        "List" | "IList" | "ICollection" | "IEnumerable" | "IReadOnlyList" | "IReadOnlyCollection" | "HashSet"
        | "ISet",
        [item],
      ) => Some(format!("List<{}>", item.descriptor())),
      ("Dictionary" | "IDictionary" | "IReadOnlyDictionary", [_, value]) => {
        Some(format!("Dictionary<string, {}>", value.descriptor()))
      }
      _ => None,
    }
  }
}

fn split_namespace(qualified: &str) -> (Option<String>, String) {
  let qualified = qualified.trim();
  let (namespace, name) = match qualified.rsplit_once('.') {
    Some((namespace, name)) if !namespace.is_empty() => (Some(namespace.to_string()), name),
    _ => (None, qualified),
  };
  let name = name.rsplit_once('+').map_or(name, |(_, nested)| nested);
  (namespace, name.to_string())
}

fn parse_qualified(text: &str, key: &str) -> Result<GenericName, GenericNameError> {
  let text = text.trim();
  if text.is_empty() {
    return Err(GenericNameError::EmptyName { key: key.to_string() });
  }

  let Some(tick) = text.find('`') else {
    let name = text.split(',').next().unwrap_or(text).trim();
    if name.is_empty() {
      return Err(GenericNameError::EmptyName { key: key.to_string() });
    }
    return Ok(GenericName::plain(name));
  };

  let head = &text[..tick];
  if head.trim().is_empty() {
    return Err(GenericNameError::EmptyName { key: key.to_string() });
  }
  let rest = &text[tick + 1..];
  let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
  let arity = rest[..digits]
    .parse::<usize>()
    .map_err(|_| GenericNameError::MissingArity { key: key.to_string() })?;

  let mut name = GenericName {
    arity,
    ..GenericName::plain(head)
  };

  let after = rest[digits..].trim_start();
  match after.chars().next() {
    None | Some(',') => return Ok(name),
    Some('[') => {}
    Some(found) => {
      return Err(GenericNameError::UnexpectedCharacter {
        key: key.to_string(),
        found,
      });
    }
  }

  let close = matching_bracket(after).ok_or_else(|| GenericNameError::UnclosedBracket { key: key.to_string() })?;
  for item in split_top_level(&after[1..close]) {
    let item = item.trim();
    let inner = match item.strip_prefix('[') {
      Some(stripped) => stripped
        .strip_suffix(']')
        .ok_or_else(|| GenericNameError::UnclosedBracket { key: key.to_string() })?,
      None => item,
    };
    name.args.push(parse_qualified(inner, key)?);
  }

  if name.args.len() != arity {
    return Err(GenericNameError::ArityMismatch {
      key: key.to_string(),
      expected: arity,
      found: name.args.len(),
    });
  }

  Ok(name)
}

/// Index of the `]` closing the `[` at the start of `text`.
fn matching_bracket(text: &str) -> Option<usize> {
  let mut depth = 0usize;
  for (index, byte) in text.bytes().enumerate() {
    match byte {
      b'[' => depth += 1,
      b']' => {
        depth = depth.checked_sub(1)?;
        if depth == 0 {
          return Some(index);
        }
      }
      _ => {}
    }
  }
  None
}

/// Splits on commas that are not nested inside brackets.
fn split_top_level(text: &str) -> Vec<&str> {
  let mut items = vec![];
  let mut depth = 0usize;
  let mut start = 0;
  for (index, byte) in text.bytes().enumerate() {
    match byte {
      b'[' => depth += 1,
      b']' => depth = depth.saturating_sub(1),
      b',' if depth == 0 => {
        items.push(&text[start..index]);
        start = index + 1;
      }
      _ => {}
    }
  }
  items.push(&text[start..]);
  items.into_iter().filter(|item| !item.trim().is_empty()).collect()
}
