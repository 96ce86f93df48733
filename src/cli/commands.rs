use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use crate::clipboard;
use crate::directory::SnippetDirectory;
use crate::error::ShelfError;
use crate::models::export;
use crate::models::{CategoryUpdate, KeyValueStore, Snippet, SnippetLanguage, SnippetUpdate};

/// Arguments of `add`
#[derive(Debug)]
pub struct NewSnippet {
    pub title: String,
    pub code: Option<String>,
    pub file: Option<PathBuf>,
    pub language: Option<SnippetLanguage>,
    pub category: String,
    pub tags: Option<String>,
}

/// Arguments of `edit`
#[derive(Debug, Default)]
pub struct SnippetEdits {
    pub title: Option<String>,
    pub code: Option<String>,
    pub file: Option<PathBuf>,
    pub language: Option<SnippetLanguage>,
    pub category: Option<String>,
    pub tags: Option<String>,
}

/// Split a comma separated tag list, trimming and dropping empty entries
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Turn a category id or name into the id to store. Unknown values are kept
/// verbatim, a snippet may point at a category that does not exist.
pub fn resolve_category<S: KeyValueStore>(directory: &SnippetDirectory<S>, value: &str) -> String {
    if let Some(category) = directory.get_category_by_id(value) {
        return category.id.clone();
    }
    match directory.find_category_by_name(value) {
        Some(category) => category.id.clone(),
        None => value.to_string(),
    }
}

/// Find a snippet by id, then exact title, then partial title (case insensitive)
pub fn find_snippet<'a, S: KeyValueStore>(
    directory: &'a SnippetDirectory<S>,
    name_or_id: &str,
) -> Option<&'a Snippet> {
    if let Some(snippet) = directory.get_snippet_by_id(name_or_id) {
        return Some(snippet);
    }

    let name = name_or_id.to_lowercase();
    directory
        .iter_snippets()
        .find(|s| s.title.to_lowercase() == name)
        .or_else(|| {
            directory
                .iter_snippets()
                .find(|s| s.title.to_lowercase().contains(&name))
        })
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local)
        .format("%b %-d, %Y, %H:%M")
        .to_string()
}

/// Category name for display, or the raw reference if it dangles
fn category_label<S: KeyValueStore>(directory: &SnippetDirectory<S>, snippet: &Snippet) -> String {
    match directory.get_category_by_id(&snippet.category) {
        Some(category) => category.name.clone(),
        None => format!("{} (missing)", snippet.category),
    }
}

fn read_code_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn snippet_not_found(name_or_id: &str) -> anyhow::Error {
    ShelfError::NotFound(format!("no snippet matches '{}'", name_or_id)).into()
}

fn category_not_found(id: &str) -> anyhow::Error {
    ShelfError::NotFound(format!("no category with id '{}'", id)).into()
}

fn print_snippet_line<S: KeyValueStore>(
    directory: &SnippetDirectory<S>,
    idx: usize,
    snippet: &Snippet,
) {
    println!(
        "{}  {}. {} [{}]",
        "┃".bright_magenta(),
        (idx + 1).to_string().bright_yellow(),
        snippet.title.bright_white().bold(),
        snippet.language.display_name().bright_green()
    );
    println!(
        "{}     {}: {}",
        "┃".bright_magenta(),
        "Category".bright_blue(),
        category_label(directory, snippet)
    );
    if !snippet.tags.is_empty() {
        println!(
            "{}     {}: {}",
            "┃".bright_magenta(),
            "Tags".bright_cyan(),
            snippet.tags.join(", ")
        );
    }
    println!(
        "{}     {}: {}",
        "┃".bright_magenta(),
        "ID".bright_black(),
        snippet.id
    );
}

fn print_separator(idx: usize, total: usize) {
    if idx + 1 < total {
        println!("{}  {}", "┃".bright_magenta(), "─".repeat(40).bright_black());
    }
}

pub fn list_snippets<S: KeyValueStore>(
    directory: &SnippetDirectory<S>,
    category: Option<&str>,
    language: Option<SnippetLanguage>,
    tag: Option<&str>,
) -> Result<()> {
    let mut snippets = match category {
        Some(category) => directory.filter_by_category(&resolve_category(directory, category)),
        None => directory.get_all_snippets(),
    };
    if let Some(language) = language {
        snippets.retain(|s| s.language == language);
    }
    if let Some(tag) = tag {
        snippets.retain(|s| s.has_tag(tag));
    }

    if snippets.is_empty() {
        println!("{}  No snippets found.", "┃".bright_magenta());
        return Ok(());
    }

    println!("{}  {} snippets:", "┃".bright_magenta(), snippets.len());
    println!("{}", "─".repeat(60).bright_magenta());
    for (idx, snippet) in snippets.iter().enumerate() {
        print_snippet_line(directory, idx, snippet);
        print_separator(idx, snippets.len());
    }
    Ok(())
}

/// Shows the content of a specific snippet by ID or name
pub fn show_snippet<S: KeyValueStore>(
    directory: &SnippetDirectory<S>,
    name_or_id: &str,
) -> Result<()> {
    let Some(snippet) = find_snippet(directory, name_or_id) else {
        println!(
            "{}  No snippet found with name: {}",
            "┃".bright_magenta(),
            name_or_id
        );
        let snippets = directory.get_all_snippets();
        if !snippets.is_empty() {
            println!("{}  Available snippets:", "┃".bright_magenta());
            println!("{}", "─".repeat(60).bright_magenta());
            for (idx, snippet) in snippets.iter().enumerate().take(10) {
                println!(
                    "{}  {}. {}",
                    "┃".bright_magenta(),
                    (idx + 1).to_string().yellow(),
                    snippet.title.bright_white()
                );
            }
            if snippets.len() > 10 {
                println!(
                    "{}  ... and {} more",
                    "┃".bright_magenta(),
                    snippets.len() - 10
                );
            }
        }
        return Err(snippet_not_found(name_or_id));
    };

    println!(
        "{}  {} {}",
        "┃".bright_magenta(),
        "SNIPPET".bright_green().bold(),
        snippet.title.bold()
    );
    println!("{}", "─".repeat(60).bright_magenta());
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Category".bright_blue(),
        category_label(directory, snippet)
    );
    println!(
        "{}  {}: {} ({} lines)",
        "┃".bright_magenta(),
        "Language".bright_yellow(),
        snippet.language.display_name(),
        snippet.line_count()
    );
    if !snippet.tags.is_empty() {
        println!(
            "{}  {}: {}",
            "┃".bright_magenta(),
            "Tags".bright_cyan(),
            snippet.tags.join(", ")
        );
    }
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Created".bright_black(),
        format_date(&snippet.created_at)
    );
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Updated".bright_black(),
        format_date(&snippet.updated_at)
    );
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "ID".bright_black(),
        snippet.id
    );
    println!("{}", "─".repeat(60).bright_magenta());

    for line in snippet.code.lines() {
        println!("{}  {}", "┃".bright_magenta(), line);
    }
    Ok(())
}

/// Searches for snippets matching a query string
pub fn search_snippets<S: KeyValueStore>(
    directory: &SnippetDirectory<S>,
    query: &str,
) -> Result<()> {
    let hits = directory.search_hits(query);

    println!(
        "{}  {} '{}'",
        "┃".bright_magenta(),
        "SEARCH RESULTS FOR".bold(),
        query.bright_white()
    );

    if hits.is_empty() {
        println!(
            "{}  No snippets found matching query: {}",
            "┃".bright_magenta(),
            query
        );
        return Ok(());
    }

    println!(
        "{}  Found {} snippets matching '{}':",
        "┃".bright_magenta(),
        hits.len(),
        query
    );
    println!("{}", "─".repeat(60).bright_magenta());

    for (idx, hit) in hits.iter().enumerate() {
        println!(
            "{}  {}. {} (match in: {})",
            "┃".bright_magenta(),
            (idx + 1).to_string().bright_yellow(),
            hit.snippet.title.bright_white().bold(),
            hit.field.label().bright_green()
        );
        println!("{}     {}", "┃".bright_magenta(), hit.match_context.bright_black());
        println!(
            "{}     {}: {}",
            "┃".bright_magenta(),
            "ID".bright_black(),
            hit.snippet.id
        );
        print_separator(idx, hits.len());
    }
    Ok(())
}

pub fn add_snippet<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    new: NewSnippet,
) -> Result<()> {
    let code = match (&new.code, &new.file) {
        (Some(code), _) => code.clone(),
        (None, Some(path)) => read_code_file(path)?,
        (None, None) => bail!("Please provide the code with --code or --file"),
    };

    let language = new.language.or_else(|| {
        new.file
            .as_deref()
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .map(SnippetLanguage::from_extension)
    });

    if new.title.trim().is_empty() || code.is_empty() || new.category.trim().is_empty() {
        bail!("Please fill in all required fields (title, code, category)");
    }
    let Some(language) = language else {
        bail!("Please choose a language with --language");
    };

    let category = resolve_category(directory, new.category.trim());
    let tags = new.tags.as_deref().map(parse_tags).unwrap_or_default();
    let snippet = directory.create_snippet(new.title, code, language, category, tags);

    println!(
        "{}  {} {}",
        "┃".bright_magenta(),
        "Snippet created successfully!".bright_green(),
        snippet.id.bright_black()
    );
    Ok(())
}

pub fn edit_snippet<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    id: &str,
    edits: SnippetEdits,
) -> Result<()> {
    let code = match (edits.code, &edits.file) {
        (Some(code), _) => Some(code),
        (None, Some(path)) => Some(read_code_file(path)?),
        (None, None) => None,
    };

    let update = SnippetUpdate {
        title: edits.title,
        code,
        language: edits.language,
        category: edits
            .category
            .as_deref()
            .map(|c| resolve_category(directory, c.trim())),
        tags: edits.tags.as_deref().map(parse_tags),
    };

    if update.is_empty() {
        bail!("Nothing to change, pass at least one field to edit");
    }
    if !directory.update_snippet(id, update) {
        return Err(snippet_not_found(id));
    }

    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "Snippet updated successfully".bright_green()
    );
    Ok(())
}

pub fn delete_snippet<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    id: &str,
) -> Result<()> {
    if !directory.delete_snippet(id) {
        return Err(snippet_not_found(id));
    }
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "Snippet deleted successfully".bright_green()
    );
    Ok(())
}

pub fn add_tag<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    id: &str,
    tag: &str,
) -> Result<()> {
    if directory.get_snippet_by_id(id).is_none() {
        return Err(snippet_not_found(id));
    }
    let tag = tag.trim();
    if directory.add_snippet_tag(id, tag) {
        println!("{}  Tagged with {}", "┃".bright_magenta(), tag.bright_cyan());
    } else {
        println!("{}  Already tagged with {}", "┃".bright_magenta(), tag.bright_cyan());
    }
    Ok(())
}

pub fn remove_tag<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    id: &str,
    tag: &str,
) -> Result<()> {
    if directory.get_snippet_by_id(id).is_none() {
        return Err(snippet_not_found(id));
    }
    let tag = tag.trim();
    if directory.remove_snippet_tag(id, tag) {
        println!("{}  Removed tag {}", "┃".bright_magenta(), tag.bright_cyan());
    } else {
        println!("{}  Not tagged with {}", "┃".bright_magenta(), tag.bright_cyan());
    }
    Ok(())
}

pub fn list_tags<S: KeyValueStore>(directory: &SnippetDirectory<S>) -> Result<()> {
    let tags = directory.get_all_tags();
    if tags.is_empty() {
        println!("{}  No tags in use.", "┃".bright_magenta());
        return Ok(());
    }

    for tag in tags {
        let count = directory.get_snippets_by_tag(&tag).len();
        println!(
            "{}  {} {}",
            "┃".bright_magenta(),
            format!("#{}", tag).bright_cyan(),
            format!("({})", count).bright_black()
        );
    }
    Ok(())
}

pub fn add_category<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    name: String,
    description: String,
    color: String,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Category name cannot be empty");
    }
    let category = directory.create_category(name, description, color);
    println!(
        "{}  {} {}",
        "┃".bright_magenta(),
        "Category created successfully!".bright_green(),
        category.id.bright_black()
    );
    Ok(())
}

pub fn list_categories<S: KeyValueStore>(directory: &SnippetDirectory<S>) -> Result<()> {
    let categories = directory.get_all_categories();
    if categories.is_empty() {
        println!(
            "{}  No categories found. Create categories to organize your snippets!",
            "┃".bright_magenta()
        );
        return Ok(());
    }

    let counts = directory.get_snippet_count_by_category();
    for (idx, category) in categories.iter().enumerate() {
        let count = counts.get(&category.id).copied().unwrap_or(0);
        println!(
            "{}  {}. {} {} {}",
            "┃".bright_magenta(),
            (idx + 1).to_string().bright_yellow(),
            category.name.bright_white().bold(),
            format!("({} snippets)", count).bright_black(),
            category.color.bright_black()
        );
        if !category.description.is_empty() {
            println!("{}     {}", "┃".bright_magenta(), category.description);
        }
        println!(
            "{}     {}: {}",
            "┃".bright_magenta(),
            "ID".bright_black(),
            category.id
        );
    }
    Ok(())
}

pub fn edit_category<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    name_or_id: &str,
    name: Option<String>,
    description: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let id = resolve_category(directory, name_or_id.trim());
    let update = CategoryUpdate {
        name,
        description,
        color,
    };
    if !directory.update_category(&id, update) {
        return Err(category_not_found(name_or_id));
    }
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "Category updated successfully".bright_green()
    );
    Ok(())
}

pub fn delete_category<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    name_or_id: &str,
) -> Result<()> {
    let id = resolve_category(directory, name_or_id.trim());
    if !directory.delete_category(&id) {
        return Err(category_not_found(name_or_id));
    }

    let orphans = directory.filter_by_category(&id).len();
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "Category deleted successfully".bright_green()
    );
    if orphans > 0 {
        println!(
            "{}  {} snippets still reference it",
            "┃".bright_magenta(),
            orphans.to_string().bright_yellow()
        );
    }
    Ok(())
}

pub fn export_data<S: KeyValueStore>(
    directory: &SnippetDirectory<S>,
    output: Option<&Path>,
    to_stdout: bool,
) -> Result<()> {
    let data = directory.export_data().context("Failed to serialize snippets")?;

    if to_stdout {
        println!("{}", data);
        return Ok(());
    }

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(export::default_export_file_name()));
    export::write_export_file(&path, &data)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{}  {} {}",
        "┃".bright_magenta(),
        "Data exported successfully to".bright_green(),
        path.display()
    );
    Ok(())
}

pub fn import_data<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    path: &Path,
) -> Result<()> {
    let data = export::read_import_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let summary = directory
        .import_data(&data)
        .context("Invalid data format")?;

    println!(
        "{}  {} ({} snippets, {} categories)",
        "┃".bright_magenta(),
        "Data imported successfully!".bright_green(),
        summary.snippets,
        summary.categories
    );
    Ok(())
}

pub fn copy_snippet<S: KeyValueStore>(
    directory: &SnippetDirectory<S>,
    name_or_id: &str,
) -> Result<()> {
    let snippet = find_snippet(directory, name_or_id).ok_or_else(|| snippet_not_found(name_or_id))?;
    clipboard::copy_to_clipboard(&snippet.code).context("Failed to copy code")?;
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "Code copied to clipboard!".bright_green()
    );
    Ok(())
}

pub fn clear_all<S: KeyValueStore>(
    directory: &mut SnippetDirectory<S>,
    confirmed: bool,
) -> Result<()> {
    if !confirmed {
        bail!("Refusing to delete everything without --yes");
    }
    directory.clear_all();
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "All snippets and categories deleted".bright_green()
    );
    Ok(())
}
