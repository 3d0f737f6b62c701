use http::Method;

use crate::generator::naming::operations::{
  common_prefix_len, strip_tag_prefix, synthesize_function_name, trim_common_namespace,
};

#[test]
fn test_synthesized_names() {
  let cases = [
    (Method::GET, "/api/items/{id}", "getItemsById"),
    (Method::POST, "/api/items", "postItems"),
    (Method::DELETE, "/api/orders/{orderId}/lines/{line_no}", "deleteLinesByLineNo"),
    (Method::PUT, "/api/{tenant}/settings", "putSettings"),
    (Method::GET, "/", "get"),
    (Method::GET, "/{id}", "getById"),
  ];
  for (method, path, expected) in cases {
    assert_eq!(
      synthesize_function_name(&method, path),
      expected,
      "failed for {method} {path}"
    );
  }
}

#[test]
fn test_strip_tag_prefix() {
  assert_eq!(strip_tag_prefix("Items_GetItem", Some("Items")), "GetItem");
  assert_eq!(strip_tag_prefix("order_lines_list", Some("order lines")), "order_lines_list");
  assert_eq!(strip_tag_prefix("OrderLines_List", Some("order lines")), "List");
  assert_eq!(strip_tag_prefix("GetItem", Some("Items")), "GetItem");
  assert_eq!(strip_tag_prefix("Items_", Some("Items")), "Items_");
  assert_eq!(strip_tag_prefix("Items_GetItem", None), "Items_GetItem");
}

#[test]
fn test_common_prefix_len() {
  let first = ["Shop", "Api", "Dtos"];
  let rest = vec![vec!["Shop", "Api", "Dtos", "Orders"], vec!["Shop", "Api", "Models"]];
  assert_eq!(common_prefix_len(&first, &rest), 2);
  assert_eq!(common_prefix_len(&first, &[]), 3);
}

#[test]
fn test_trim_common_namespace() {
  let hints = vec![
    Some("Shop.Api.Dtos".to_string()),
    Some("Shop.Api.Dtos.Orders".to_string()),
    None,
  ];
  assert_eq!(
    trim_common_namespace(&hints),
    vec![None, Some("Orders".to_string()), None]
  );
}

#[test]
fn test_trim_common_namespace_without_shared_prefix() {
  let hints = vec![Some("Billing".to_string()), Some("Shop.Orders".to_string())];
  assert_eq!(trim_common_namespace(&hints), hints);
}
