#[inline]
#[must_use]
fn process_doc_text(input: &str) -> String {
  input.replace("\\n", "\n").replace("\r\n", "\n")
}

/// Description text split into lines, with trailing whitespace and blank
/// leading/trailing lines removed.
#[inline]
#[must_use]
pub(crate) fn doc_lines(input: &str) -> Vec<String> {
  let lines = process_doc_text(input)
    .lines()
    .map(|line| line.trim_end().to_string())
    .collect::<Vec<_>>();
  let start = lines.iter().position(|line| !line.is_empty()).unwrap_or(lines.len());
  let end = lines.iter().rposition(|line| !line.is_empty()).map_or(start, |index| index + 1);
  lines[start..end].to_vec()
}

/// `/** ... */` block for TypeScript declarations; single-line when possible.
#[must_use]
pub(crate) fn jsdoc_lines(input: &str, indent: &str) -> Vec<String> {
  let lines = doc_lines(input)
    .into_iter()
    .map(|line| line.replace("*/", "*\\/"))
    .collect::<Vec<_>>();
  match lines.as_slice() {
    [] => vec![],
    [line] => vec![format!("{indent}/** {line} */")],
    _ => {
      let mut block = vec![format!("{indent}/**")];
      block.extend(lines.iter().map(|line| {
        if line.is_empty() {
          format!("{indent} *")
        } else {
          format!("{indent} * {line}")
        }
      }));
      block.push(format!("{indent} */"));
      block
    }
  }
}

/// `/// <summary>` block for C# declarations.
#[must_use]
pub(crate) fn xml_summary_lines(input: &str, indent: &str) -> Vec<String> {
  let lines = doc_lines(input);
  if lines.is_empty() {
    return vec![];
  }
  let mut block = vec![format!("{indent}/// <summary>")];
  block.extend(lines.iter().map(|line| {
    if line.is_empty() {
      format!("{indent}///")
    } else {
      format!("{indent}/// {}", xml_escape(line))
    }
  }));
  block.push(format!("{indent}/// </summary>"));
  block
}

#[inline]
#[must_use]
pub(crate) fn xml_escape(input: &str) -> String {
  input.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escapes a value for a single-quoted TypeScript string literal.
#[inline]
#[must_use]
pub(crate) fn ts_string_literal(input: &str) -> String {
  format!("'{}'", input.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Escapes a value for a regular C# string literal.
#[inline]
#[must_use]
pub(crate) fn csharp_string_literal(input: &str) -> String {
  format!("\"{}\"", input.replace('\\', "\\\\").replace('"', "\\\""))
}
