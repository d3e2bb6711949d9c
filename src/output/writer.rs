//! Item writers
//!
//! Renders retrieved items as a JSON document, JSON lines, or a text table.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use clap::ValueEnum;
use std::io::Write;

/// How retrieved items are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One pretty-printed JSON array
    Json,
    /// One compact JSON object per line
    Jsonl,
    /// Aligned text table of selected fields
    #[default]
    Pretty,
}

/// Look up a dot-separated path in a JSON value
///
/// Numeric segments index into arrays (`emails.0.address`).
pub fn select<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.').try_fold(value, |current, part| match current {
        JsonValue::Object(map) => map.get(part),
        JsonValue::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Render one table cell
fn cell(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.replace(['\n', '\t'], " "),
        Some(other) => other.to_string(),
    }
}

/// Keep only `fields` of an item, keyed by their paths
fn project(item: &JsonValue, fields: &[String]) -> JsonValue {
    let object: JsonObject = fields
        .iter()
        .map(|field| {
            (
                field.clone(),
                select(item, field).cloned().unwrap_or(JsonValue::Null),
            )
        })
        .collect();
    JsonValue::Object(object)
}

/// Top-level scalar keys of the first item, in key order
fn inferred_columns(items: &[JsonValue]) -> Vec<String> {
    match items.first() {
        Some(JsonValue::Object(map)) => map
            .iter()
            .filter(|(_, v)| !v.is_object() && !v.is_array())
            .map(|(k, _)| k.clone())
            .collect(),
        _ => Vec::new(),
    }
}

/// Write `items` to `writer` in `format`
///
/// With an empty `fields`, JSON formats print items unchanged and the table
/// shows the first item's scalar fields. Returns the number of items written.
pub fn write_items<W: Write + ?Sized>(
    writer: &mut W,
    items: &[JsonValue],
    format: OutputFormat,
    fields: &[String],
) -> Result<usize> {
    match format {
        OutputFormat::Json => {
            if fields.is_empty() {
                serde_json::to_writer_pretty(&mut *writer, items).map_err(json_error)?;
            } else {
                let projected: Vec<_> = items.iter().map(|i| project(i, fields)).collect();
                serde_json::to_writer_pretty(&mut *writer, &projected).map_err(json_error)?;
            }
            writeln!(writer)?;
        }
        OutputFormat::Jsonl => {
            for item in items {
                if fields.is_empty() {
                    serde_json::to_writer(&mut *writer, item).map_err(json_error)?;
                } else {
                    serde_json::to_writer(&mut *writer, &project(item, fields)).map_err(json_error)?;
                }
                writeln!(writer)?;
            }
        }
        OutputFormat::Pretty => {
            let columns = if fields.is_empty() {
                inferred_columns(items)
            } else {
                fields.to_vec()
            };
            write_table(writer, items, &columns)?;
        }
    }

    writer
        .flush()
        .map_err(|e| Error::output(format!("Failed to flush output: {e}")))?;
    Ok(items.len())
}

fn json_error(e: serde_json::Error) -> Error {
    Error::output(format!("Failed to write JSON: {e}"))
}

fn write_table<W: Write + ?Sized>(
    writer: &mut W,
    items: &[JsonValue],
    columns: &[String],
) -> Result<()> {
    if columns.is_empty() {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| columns.iter().map(|c| cell(select(item, c))).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    write_row(writer, columns, &widths)?;
    for row in &rows {
        write_row(writer, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write + ?Sized>(writer: &mut W, values: &[String], widths: &[usize]) -> Result<()> {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, &width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}
