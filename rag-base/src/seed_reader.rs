//! Seed file reader.
//!
//! Accepts either a mapping of `key -> {title, body, link}` or a plain
//! sequence of such records. JSON works too, since it is parsed as YAML.
//! Iteration order of the file is preserved and becomes the document id.

use std::path::Path;

use serde_yml::Value;
use tracing::debug;

use crate::errors::rag_base_error::RagBaseError;
use crate::structs::rag_store::Document;

/// Raw record as written in the seed file. Numeric or boolean scalars
/// (`title: 2024`) are taken as their text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    pub title: String,
    pub body: String,
    pub link: String,
}

/// Reads and parses the seed file at `path` into documents.
///
/// # Errors
/// - `SeedRead` if the file is missing or unreadable
/// - `Yaml` / `SeedFormat` if its content is unusable
pub fn read_seed_file(path: &Path) -> Result<Vec<Document>, RagBaseError> {
    let text = std::fs::read_to_string(path).map_err(|source| RagBaseError::SeedRead {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_seed(&text)?;
    debug!(path = %path.display(), entries = entries.len(), "seed file parsed");
    Ok(into_documents(entries))
}

/// Parses seed file content, keeping file order.
///
/// # Errors
/// `SeedFormat` when the top level is neither a mapping nor a sequence, or
/// an entry lacks a non-empty `title`, `body` or `link`.
pub fn parse_seed(text: &str) -> Result<Vec<SeedEntry>, RagBaseError> {
    let root: Value = serde_yml::from_str(text)?;

    let labelled: Vec<(String, Value)> = match root {
        Value::Mapping(map) => map.into_iter().map(|(k, v)| (key_label(&k), v)).collect(),
        Value::Sequence(seq) => seq
            .into_iter()
            .enumerate()
            .map(|(i, v)| (format!("#{i}"), v))
            .collect(),
        Value::Null => Vec::new(),
        _ => {
            return Err(RagBaseError::SeedFormat(
                "expected a mapping or a list of {title, body, link} records".into(),
            ));
        }
    };

    labelled
        .into_iter()
        .map(|(label, value)| entry_from_value(&label, &value))
        .collect()
}

fn entry_from_value(label: &str, value: &Value) -> Result<SeedEntry, RagBaseError> {
    let fail = |msg: String| RagBaseError::SeedFormat(format!("entry '{label}': {msg}"));

    let Value::Mapping(map) = value else {
        return Err(fail("expected a {title, body, link} record".into()));
    };
    let field = |name: &str| match map.get(name) {
        None | Some(Value::Null) => Err(fail(format!("field `{name}` is missing"))),
        Some(v) => match scalar_text(v) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err(fail(format!("field `{name}` is empty"))),
            None => Err(fail(format!("field `{name}` must be text, not a list or mapping"))),
        },
    };

    Ok(SeedEntry {
        title: field("title")?,
        body: field("body")?,
        link: field("link")?,
    })
}

/// Assigns sequential ids `"0".."N-1"` and maps `link` to `source`.
pub fn into_documents(entries: Vec<SeedEntry>) -> Vec<Document> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| Document {
            id: i.to_string(),
            title: e.title,
            source: e.link,
            body: e.body,
        })
        .collect()
}

fn key_label(key: &Value) -> String {
    scalar_text(key).unwrap_or_else(|| format!("{key:?}"))
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
