use std::{
  collections::{BTreeSet, HashSet},
  sync::LazyLock,
};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

static TYPESCRIPT_RESERVED: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do", "else", "enum",
    "export", "extends", "false", "finally", "for", "function", "if", "import", "in", "instanceof", "new", "null",
    "return", "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "as",
    "implements", "interface", "let", "package", "private", "protected", "public", "static", "yield", "await",
  ]
  .into_iter()
  .collect()
});

static CSHARP_KEYWORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class", "const",
    "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event", "explicit", "extern",
    "false", "finally", "fixed", "float", "for", "foreach", "goto", "if", "implicit", "in", "int", "interface",
    "internal", "is", "lock", "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc",
    "static", "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong", "unchecked",
    "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());
static JS_IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Transliterates to ASCII, replaces invalid characters with underscores,
/// collapses consecutive underscores and trims them from both ends.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Ensures a name is unique within a set of used names, appending a numeric suffix if needed.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !used_names.contains(&new_name) {
      return new_name;
    }
    i += 1;
  }
}

/// `PascalCase` type, member or class name.
///
/// Each separated segment that is already mixed case (`ItemDto`, `getItem`)
/// keeps its inner capitalization; single-case segments are re-cased.
/// Names starting with a digit get a leading `_`; empty input becomes `Unnamed`.
pub(crate) fn to_type_name(name: &str) -> String {
  let mut ident = sanitize(name).split('_').map(pascal_segment).collect::<String>();

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  ident
}

fn pascal_segment(segment: &str) -> String {
  let has_upper = segment.chars().any(|c| c.is_ascii_uppercase());
  let has_lower = segment.chars().any(|c| c.is_ascii_lowercase());
  let segment = if has_upper && has_lower {
    segment.to_string()
  } else {
    segment.to_ascii_lowercase()
  };

  let mut chars = segment.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
  }
}

/// `camelCase` identifier, suffixed with `_` when it collides with a TypeScript keyword.
pub(crate) fn to_camel_name(name: &str) -> String {
  let pascal = to_type_name(name);
  let mut chars = pascal.chars();
  let mut ident = match chars.next() {
    None => return "unnamed".to_string(),
    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
  };
  if TYPESCRIPT_RESERVED.contains(ident.as_str()) {
    ident.push('_');
  }
  ident
}

/// A TypeScript parameter or variable name derived from a wire name.
pub(crate) fn to_ts_identifier(name: &str) -> String {
  if JS_IDENTIFIER_RE.is_match(name) && !TYPESCRIPT_RESERVED.contains(name) {
    return name.to_string();
  }
  to_camel_name(name)
}

/// Object key for a TypeScript interface member; quoted when not a bare identifier.
pub(crate) fn to_ts_property_key(name: &str) -> String {
  if JS_IDENTIFIER_RE.is_match(name) {
    name.to_string()
  } else {
    format!("'{}'", name.replace('\'', "\\'"))
  }
}

/// A C# local/parameter name: `camelCase`, escaped with `@` when it is a keyword.
pub(crate) fn to_csharp_parameter(name: &str) -> String {
  let pascal = to_type_name(name);
  let mut chars = pascal.chars();
  let ident = match chars.next() {
    None => return "value".to_string(),
    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
  };
  if CSHARP_KEYWORDS.contains(ident.as_str()) {
    format!("@{ident}")
  } else {
    ident
  }
}

/// File stem in `kebab-case`, e.g. `PageList` -> `page-list`.
pub(crate) fn to_file_stem(name: &str) -> String {
  let stem = sanitize(name).to_kebab_case();
  if stem.is_empty() { "unnamed".to_string() } else { stem }
}
