use http::Method;

use crate::generator::naming::identifiers::to_type_name;

/// Function name for an operation without an explicit id: the lowercase method
/// followed by the last literal path segment, plus `By{Param}` when the path
/// ends in a parameter.
///
/// # Example
///
/// ```text
/// GET /api/items/{id}  => getItemsById
/// POST /api/items      => postItems
/// GET /                => get
/// ```
pub(crate) fn synthesize_function_name(method: &Method, path: &str) -> String {
  let segments = path.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>();
  let is_param = |segment: &&str| segment.starts_with('{') && segment.ends_with('}');

  let mut name = method.as_str().to_lowercase();
  if let Some(literal) = segments.iter().rev().find(|segment| !is_param(segment)) {
    name.push_str(&to_type_name(literal));
  }
  if let Some(last) = segments.last().filter(|segment| is_param(segment)) {
    name.push_str("By");
    name.push_str(&to_type_name(last.trim_start_matches('{').trim_end_matches('}')));
  }
  name
}

/// Removes a leading `"{tag}_"` from an operation name, as produced by tooling
/// that namespaces operation ids by controller.
pub(crate) fn strip_tag_prefix<'a>(name: &'a str, tag: Option<&str>) -> &'a str {
  let Some(tag) = tag.filter(|t| !t.is_empty()) else {
    return name;
  };

  [tag.to_string(), to_type_name(tag)]
    .iter()
    .find_map(|candidate| {
      name
        .strip_prefix(candidate.as_str())
        .and_then(|rest| rest.strip_prefix('_'))
        .filter(|rest| !rest.is_empty())
    })
    .unwrap_or(name)
}

/// Counts namespace segments shared at the start of every list.
pub(crate) fn common_prefix_len<S: AsRef<str>>(first: &[S], rest: &[Vec<S>]) -> usize {
  first
    .iter()
    .enumerate()
    .take_while(|(i, seg)| {
      let seg_str = seg.as_ref();
      rest
        .iter()
        .all(|other| other.get(*i).map(AsRef::as_ref) == Some(seg_str))
    })
    .count()
}

/// Strips the namespace prefix shared by every hint so generated directories stay shallow.
///
/// # Example
///
/// ```text
/// [Shop.Api.Dtos, Shop.Api.Dtos.Orders, None] => [None, Orders, None]
/// ```
pub(crate) fn trim_common_namespace(hints: &[Option<String>]) -> Vec<Option<String>> {
  let segments = hints
    .iter()
    .flatten()
    .map(|hint| hint.split('.').collect::<Vec<_>>())
    .collect::<Vec<_>>();

  let prefix_len = match segments.split_first() {
    Some((first, rest)) => common_prefix_len(first, rest),
    None => 0,
  };

  hints
    .iter()
    .map(|hint| {
      hint.as_ref().and_then(|hint| {
        let trimmed = hint.split('.').skip(prefix_len).collect::<Vec<_>>().join(".");
        (!trimmed.is_empty()).then_some(trimmed)
      })
    })
    .collect()
}
