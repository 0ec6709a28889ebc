// Museum - core/export.rs
//
// Text and JSON listings of catalog entries, used by the headless `--list`
// mode. Core layer: writes to any Write trait object.

use crate::core::model::{Container, Entry, UnitId};
use crate::util::constants;
use crate::util::error::MuseumError;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Serialisable view of one entry.
#[derive(Debug, Serialize)]
pub struct ListedExhibit<'a> {
    pub unit: &'a UnitId,
    pub title: &'a str,
    pub path: String,
    pub tags: Vec<&'a str>,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: &'a str,
}

impl<'a> ListedExhibit<'a> {
    pub fn from_entry<C: Container>(entry: &'a Entry<C>) -> Self {
        Self {
            unit: entry.unit().id(),
            title: entry.title(),
            path: entry.path(),
            tags: entry.tags().iter().map(String::as_str).collect(),
            description: entry.description(),
        }
    }
}

/// One line per entry: `Path › Components › Title [tag, tag]`.
pub fn format_line<C: Container>(entry: &Entry<C>) -> String {
    let separator = format!(" {} ", constants::BREADCRUMB_SEPARATOR);
    let mut parts: Vec<&str> = entry
        .path_components()
        .iter()
        .map(String::as_str)
        .filter(|c| !c.is_empty())
        .collect();
    parts.push(entry.title());

    let mut line = parts.join(&separator);
    if !entry.tags().is_empty() {
        let tags: Vec<&str> = entry.tags().iter().map(String::as_str).collect();
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    line
}

/// Write entries as plain text lines.
pub fn write_text<C: Container, W: Write>(
    entries: &[&Entry<C>],
    mut writer: W,
) -> Result<usize, MuseumError> {
    for entry in entries {
        writeln!(writer, "{}", format_line(*entry)).map_err(|e| stdout_error(e, "write listing"))?;
    }
    writer.flush().map_err(|e| stdout_error(e, "flush listing"))?;
    Ok(entries.len())
}

/// Write entries as a pretty-printed JSON array.
pub fn write_json<C: Container, W: Write>(
    entries: &[&Entry<C>],
    mut writer: W,
) -> Result<usize, MuseumError> {
    let listed: Vec<ListedExhibit<'_>> = entries
        .iter()
        .map(|e| ListedExhibit::from_entry(*e))
        .collect();
    serde_json::to_writer_pretty(&mut writer, &listed)?;
    writeln!(writer).map_err(|e| stdout_error(e, "write listing"))?;
    Ok(listed.len())
}

fn is_blank(text: &&str) -> bool {
    text.trim().is_empty()
}

fn stdout_error(source: std::io::Error, operation: &'static str) -> MuseumError {
    MuseumError::Io {
        path: PathBuf::from("<stdout>"),
        operation,
        source,
    }
}
