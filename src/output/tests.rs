//! Tests for output module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn users() -> Vec<serde_json::Value> {
    vec![
        json!({
            "primaryEmail": "alice@example.com",
            "name": {"fullName": "Alice Liddell"},
            "suspended": false,
            "emails": [{"address": "alice@example.com"}, {"address": "al@example.com"}]
        }),
        json!({
            "primaryEmail": "bob@example.com",
            "name": {"fullName": "Bob"},
            "suspended": true
        }),
    ]
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn render(items: &[serde_json::Value], format: OutputFormat, columns: &[String]) -> String {
    let mut out = Vec::new();
    write_items(&mut out, items, format, columns).unwrap();
    String::from_utf8(out).unwrap()
}

// ============================================================================
// Field Selection
// ============================================================================

#[test]
fn test_select_paths() {
    let user = &users()[0];
    assert_eq!(select(user, "name.fullName"), Some(&json!("Alice Liddell")));
    assert_eq!(
        select(user, "emails.1.address"),
        Some(&json!("al@example.com"))
    );
    assert_eq!(select(user, "emails.9.address"), None);
    assert_eq!(select(user, "primaryEmail.length"), None);
    assert_eq!(select(user, "missing"), None);
}

// ============================================================================
// Formats
// ============================================================================

#[test]
fn test_json_output_is_an_array() {
    let out = render(&users(), OutputFormat::Json, &[]);
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, users());
    assert!(out.ends_with('\n'));
}

#[test]
fn test_json_output_with_fields_projects() {
    let out = render(
        &users(),
        OutputFormat::Json,
        &fields(&["primaryEmail", "name.fullName", "orgUnitPath"]),
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        parsed[1],
        json!({"primaryEmail": "bob@example.com", "name.fullName": "Bob", "orgUnitPath": null})
    );
}

#[test]
fn test_jsonl_one_item_per_line() {
    let out = render(&users(), OutputFormat::Jsonl, &fields(&["primaryEmail"]));
    assert_eq!(
        out,
        "{\"primaryEmail\":\"alice@example.com\"}\n{\"primaryEmail\":\"bob@example.com\"}\n"
    );
}

#[test]
fn test_pretty_table_aligns_columns() {
    let out = render(
        &users(),
        OutputFormat::Pretty,
        &fields(&["primaryEmail", "name.fullName", "suspended"]),
    );
    assert_eq!(
        out,
        "primaryEmail       name.fullName  suspended\n\
         alice@example.com  Alice Liddell  false\n\
         bob@example.com    Bob            true\n"
    );
}

#[test]
fn test_pretty_table_infers_scalar_columns() {
    let items = vec![json!({"id": "format24HourTime", "value": "true", "etag": "\"e1\""})];
    let out = render(&items, OutputFormat::Pretty, &[]);
    let header = out.lines().next().unwrap();
    assert_eq!(header, "etag  id                value");
}

#[test]
fn test_pretty_table_missing_values_are_blank() {
    let items = vec![json!({"id": "1"}), json!({"id": "2", "summary": "Standup"})];
    let out = render(&items, OutputFormat::Pretty, &fields(&["id", "summary"]));
    assert_eq!(out, "id  summary\n1\n2   Standup\n");
}

#[test]
fn test_empty_items() {
    assert_eq!(render(&[], OutputFormat::Json, &[]), "[]\n");
    assert_eq!(render(&[], OutputFormat::Jsonl, &[]), "");
    assert_eq!(render(&[], OutputFormat::Pretty, &[]), "");
    assert_eq!(
        render(&[], OutputFormat::Pretty, &fields(&["id"])),
        "id\n"
    );
}

#[test]
fn test_write_items_returns_count() {
    let mut out = Vec::new();
    let written = write_items(&mut out, &users(), OutputFormat::Jsonl, &[]).unwrap();
    assert_eq!(written, 2);
}
