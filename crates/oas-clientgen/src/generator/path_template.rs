//! `{name}` placeholders in operation paths.

/// Placeholder names in order of appearance; empty `{}` pairs are skipped.
pub(crate) fn extract_template_params(path: &str) -> impl Iterator<Item = &str> {
  TemplateParamIter { rest: path }
}

/// Rebuilds `path`, replacing each `{name}` with `render(name)`. Placeholders
/// for which `render` returns `None` are kept literally.
pub(crate) fn render_template(path: &str, mut render: impl FnMut(&str) -> Option<String>) -> String {
  let mut output = String::with_capacity(path.len());
  let mut rest = path;
  while let Some(open) = rest.find('{') {
    let after_open = &rest[open + 1..];
    let Some(close) = after_open.find('}') else {
      break;
    };
    let name = &after_open[..close];
    output.push_str(&rest[..open]);
    match render(name).filter(|_| !name.is_empty()) {
      Some(rendered) => output.push_str(&rendered),
      None => {
        output.push('{');
        output.push_str(name);
        output.push('}');
      }
    }
    rest = &after_open[close + 1..];
  }
  output.push_str(rest);
  output
}

struct TemplateParamIter<'a> {
  rest: &'a str,
}

impl<'a> Iterator for TemplateParamIter<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    let open_pos = self.rest.find('{')?;
    let after_open = &self.rest[open_pos + 1..];
    let close_pos = after_open.find('}')?;
    let param = &after_open[..close_pos];
    self.rest = &after_open[close_pos + 1..];

    if param.is_empty() { self.next() } else { Some(param) }
  }
}
