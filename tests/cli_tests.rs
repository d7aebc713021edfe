#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::fixtures::{ORDERS, SHOP};
use common::temp_files::{cleanup_temp_dirs, create_temp_yaml};
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_brrtcrud-gen");
    Command::new(exe)
        .args(args)
        .env_remove("RUST_LOG")
        .env("BRRTCRUD_LOG_LEVEL", "warn")
        .output()
        .expect("run cli")
}

#[test]
fn test_cli_generate_writes_controllers() {
    let catalog = create_temp_yaml(ORDERS);
    let dir = catalog.parent().unwrap().to_path_buf();
    let out = dir.join("src").join("generated");

    let output = run(&[
        "generate",
        "--spec",
        catalog.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
        "--no-format",
    ]);
    assert!(output.status.success(), "{output:?}");
    assert!(out.join("generated_order_model.rs").exists());
    assert!(out.join("mod.rs").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("12 operation(s)"));
    cleanup_temp_dirs(&[dir]);
}

#[test]
fn test_cli_inspect_prints_operation_table() {
    let catalog = create_temp_yaml(ORDERS);
    let dir = catalog.parent().unwrap().to_path_buf();

    let output = run(&[
        "inspect",
        "--spec",
        catalog.to_str().unwrap(),
        "--resource",
        "shop.OrderModel",
    ]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("add_product_by_id"));
    assert!(stdout.contains("POST|PUT|PATCH /orders/{id}/products/{relationId}"));
    assert!(stdout.contains("204"));

    let missing = run(&[
        "inspect",
        "--spec",
        catalog.to_str().unwrap(),
        "--resource",
        "Nothing",
    ]);
    assert!(!missing.status.success());
    cleanup_temp_dirs(&[dir]);
}

#[test]
fn test_cli_lint_fail_on_error() {
    let catalog = create_temp_yaml(SHOP);
    let dir = catalog.parent().unwrap().to_path_buf();

    let lenient = run(&["lint", "--spec", catalog.to_str().unwrap()]);
    assert!(lenient.status.success());
    let stdout = String::from_utf8_lossy(&lenient.stdout);
    assert!(stdout.contains("unknown_entity_type"));

    let strict = run(&[
        "lint",
        "--spec",
        catalog.to_str().unwrap(),
        "--fail-on-error",
        "--errors-only",
    ]);
    assert!(!strict.status.success());
    cleanup_temp_dirs(&[dir]);
}

#[test]
fn test_cli_missing_catalog_fails() {
    let output = run(&["generate", "--spec", "/definitely/not/here.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read catalog"));
}
