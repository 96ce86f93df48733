use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};
use crate::models::{Category, Snippet};

/// Export file structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportData {
    pub snippets: Vec<Snippet>,
    pub categories: Vec<Category>,
}

/// Borrowed view used when writing, so exporting never clones the store.
#[derive(Serialize)]
struct ExportView<'a> {
    snippets: &'a [Snippet],
    categories: &'a [Category],
}

/// What an import brought in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub snippets: usize,
    pub categories: usize,
}

/// Render both collections as a pretty-printed (2-space) JSON document.
pub fn render_export(snippets: &[Snippet], categories: &[Category]) -> Result<String> {
    let view = ExportView {
        snippets,
        categories,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Parse and validate an export document.
///
/// Both top-level keys must be present and every record must decode. Ids
/// must be unique within each collection. Records come back normalized
/// (duplicate tags dropped).
pub fn parse_export(text: &str) -> Result<ExportData> {
    let data: ExportData = serde_json::from_str(text)
        .map_err(|e| ShelfError::MalformedImport(e.to_string()))?;

    ensure_unique_ids("snippet", data.snippets.iter().map(|s| s.id.as_str()))?;
    ensure_unique_ids("category", data.categories.iter().map(|c| c.id.as_str()))?;

    Ok(ExportData {
        snippets: data.snippets.into_iter().map(Snippet::normalize).collect(),
        categories: data.categories,
    })
}

fn ensure_unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ShelfError::MalformedImport(format!(
                "duplicate {} id '{}'",
                kind, id
            )));
        }
    }
    Ok(())
}

/// `code-snippets-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("code-snippets-{}.json", date.format("%Y-%m-%d"))
}

/// File name for an export taken today
pub fn default_export_file_name() -> String {
    export_file_name(Utc::now().date_naive())
}

/// Write an export document to a file
pub fn write_export_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Read the full text of an import file
pub fn read_import_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}
