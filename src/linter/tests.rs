#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the catalog linter

use crate::linter::{fail_if_errors, lint_catalog, LintIssue, LintSeverity};
use std::io::Write;
use tempfile::NamedTempFile;

/// Helper to create a temp file with YAML content and run lint_catalog on it
fn lint_yaml(content: &str) -> Vec<LintIssue> {
    let mut temp = NamedTempFile::with_suffix(".yaml").expect("create temp file");
    temp.write_all(content.as_bytes()).expect("write catalog");
    temp.flush().expect("flush");
    lint_catalog(temp.path(), None).expect("lint catalog")
}

fn of_kind<'a>(issues: &'a [LintIssue], kind: &str) -> Vec<&'a LintIssue> {
    issues.iter().filter(|i| i.kind == kind).collect()
}

#[test]
fn test_clean_catalog() {
    let catalog = r#"
types:
  - id: shop.Orders
    markers:
      - { name: CrudResource, values: { value: /orders, entity: shop.Order } }
  - id: shop.Order
    fields:
      - { name: id, type: i64, markers: [{ name: Id }] }
"#;
    let issues = lint_yaml(catalog);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    assert!(fail_if_errors(&issues).is_ok());
}

#[test]
fn test_lint_missing_and_unknown_entity() {
    let catalog = r#"
types:
  - id: shop.Orders
    markers:
      - { name: CrudResource, values: { value: /orders } }
      - { name: CrudResource, values: { value: /ghosts, entity: shop.Ghost } }
"#;
    let issues = lint_yaml(catalog);

    let missing = of_kind(&issues, "missing_entity");
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, LintSeverity::Error);
    assert!(missing[0].suggestion.is_some());

    let unknown = of_kind(&issues, "unknown_entity_type");
    assert_eq!(unknown.len(), 1);
    assert!(unknown[0].message.contains("shop.Ghost"));

    assert!(fail_if_errors(&issues).is_err());
}

#[test]
fn test_lint_duplicate_relation() {
    let catalog = r#"
types:
  - id: shop.Orders
    markers:
      - { name: CrudResource, values: { entity: shop.Order } }
  - id: shop.Order
    fields:
      - { name: id, type: i64, markers: [{ name: Id }] }
      - { name: lines, type: "List<shop.Line>", markers: [{ name: OneToMany }] }
      - { name: extraLines, type: "List<shop.Line>", markers: [{ name: Relation, values: { name: lines } }] }
  - id: shop.Line
    fields:
      - { name: id, type: i32, markers: [{ name: Id }] }
"#;
    let issues = lint_yaml(catalog);
    let duplicates = of_kind(&issues, "duplicate_relation");
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].location, "shop.Order");
    assert!(duplicates[0].message.contains("lines"));
}

#[test]
fn test_lint_unresolved_related_type_is_warning() {
    let catalog = r#"
types:
  - id: shop.Orders
    markers:
      - { name: CrudResource, values: { entity: shop.Order } }
  - id: shop.Order
    fields:
      - { name: id, type: i64, markers: [{ name: Id }] }
      - { name: coupon, type: shop.Coupon, markers: [{ name: ManyToOne }] }
"#;
    let issues = lint_yaml(catalog);
    let unresolved = of_kind(&issues, "unresolved_related_type");
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].severity, LintSeverity::Warning);
    assert!(unresolved[0].location.contains("coupon"));
    assert!(fail_if_errors(&issues).is_ok());
}

#[test]
fn test_lint_fully_hand_written_resource() {
    let catalog = r#"
types:
  - id: shop.Orders
    markers:
      - { name: CrudResource, values: { value: /orders, entity: shop.Order } }
    methods:
      - { name: create, markers: [{ name: PostMapping, values: { value: /orders } }] }
      - { name: list, markers: [{ name: GetMapping, values: { value: /orders } }] }
      - { name: search, markers: [{ name: GetMapping, values: { value: /orders/search } }] }
      - { name: read, markers: [{ name: GetMapping, values: { value: "/orders/{id}" } }] }
      - { name: patch, markers: [{ name: PatchMapping, values: { value: "/orders/{id}" } }] }
      - { name: put, markers: [{ name: PutMapping, values: { value: "/orders/{id}" } }] }
      - { name: delete, markers: [{ name: DeleteMapping, values: { value: "/orders/{id}" } }] }
  - id: shop.Order
    fields:
      - { name: id, type: i64, markers: [{ name: Id }] }
"#;
    let issues = lint_yaml(catalog);
    let empty = of_kind(&issues, "no_operations");
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].severity, LintSeverity::Info);
}

#[test]
fn test_lint_undeclared_accessors() {
    let catalog = r#"
types:
  - id: shop.Orders
    markers:
      - { name: CrudResource, values: { entity: shop.Order } }
  - id: shop.Order
    fields:
      - { name: id, type: i64, markers: [{ name: Id }] }
      - { name: products, type: "List<shop.Product>", markers: [{ name: ManyToMany }] }
    methods:
      - { name: getProducts }
      - { name: addProduct }
  - id: shop.Product
    fields:
      - { name: id, type: i32, markers: [{ name: Id }] }
"#;
    let issues = lint_yaml(catalog);
    let undeclared = of_kind(&issues, "accessor_not_declared");
    assert_eq!(undeclared.len(), 1);
    assert_eq!(undeclared[0].location, "shop.Order#products");
    assert!(undeclared[0].message.contains("removeProduct"));
}
