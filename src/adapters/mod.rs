//! File-format adapters.
//!
//! Convert uploaded bytes into a sequence of plain-text blocks, one per
//! record candidate. Supported formats: `.txt`, `.md` (line-based),
//! `.csv` (one block per data row), `.json` (top-level array of rows).
//! Anything else is rejected up front, before any enrichment calls.

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while parsing an uploaded file.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("file is not valid UTF-8")]
    InvalidEncoding,

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON upload must be a top-level array of rows")]
    JsonShape,
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Lines at or below this length carry no extractable term and are
/// dropped during line-based parsing.
const MIN_LINE_CHARS: usize = 5;

/// Parses uploaded file content into text blocks.
///
/// The format is chosen by the file name's extension. Returns one
/// string per record candidate; blocks are trimmed and never empty.
pub fn parse(file_name: &str, bytes: &[u8]) -> AdapterResult<Vec<String>> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "md" => parse_lines(as_text(bytes)?),
        "csv" => parse_csv(as_text(bytes)?),
        "json" => parse_json(bytes),
        _ => Err(AdapterError::UnsupportedFormat(file_name.to_string())),
    }
}

fn as_text(bytes: &[u8]) -> AdapterResult<&str> {
    std::str::from_utf8(bytes).map_err(|_| AdapterError::InvalidEncoding)
}

/// One block per line; short lines are noise (page numbers, stray
/// punctuation) and are dropped.
fn parse_lines(text: &str) -> AdapterResult<Vec<String>> {
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_LINE_CHARS)
        .map(str::to_string)
        .collect())
}

/// One block per data row. The first line is treated as a header and
/// skipped; each row's fields are joined into a single text block.
fn parse_csv(text: &str) -> AdapterResult<Vec<String>> {
    Ok(text
        .lines()
        .skip(1)
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|block| !block.is_empty())
        .collect())
}

/// A top-level JSON array; string rows pass through, object rows
/// contribute their values joined with spaces.
fn parse_json(bytes: &[u8]) -> AdapterResult<Vec<String>> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Array(rows) = value else {
        return Err(AdapterError::JsonShape);
    };

    Ok(rows
        .iter()
        .map(row_to_text)
        .map(|block| block.trim().to_string())
        .filter(|block| !block.is_empty())
        .collect())
}

fn row_to_text(row: &Value) -> String {
    match row {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .values()
            .filter_map(scalar_to_text)
            .collect::<Vec<_>>()
            .join(" "),
        other => scalar_to_text(other).unwrap_or_default(),
    }
}

fn scalar_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
