use crate::directory::SnippetDirectory;
use crate::models::{KeyValueStore, Snippet};
use anyhow::Result;
use colored::Colorize;

/// A top-level node of the tree: a category, or the bucket of snippets whose
/// category reference points nowhere.
#[derive(Debug, PartialEq, Eq)]
pub struct TreeGroup<'a> {
    pub name: String,
    pub color: Option<String>,
    pub snippets: Vec<&'a Snippet>,
}

/// Group snippets under their categories, in category order. Snippets with a
/// dangling reference end up in a trailing "Uncategorized" group.
pub fn build_groups<S: KeyValueStore>(directory: &SnippetDirectory<S>) -> Vec<TreeGroup<'_>> {
    let categories = directory.get_all_categories();

    let mut groups: Vec<TreeGroup<'_>> = categories
        .iter()
        .map(|category| TreeGroup {
            name: category.name.clone(),
            color: Some(category.color.clone()),
            snippets: directory
                .iter_snippets()
                .filter(|s| s.category == category.id)
                .collect(),
        })
        .collect();

    let orphans: Vec<&Snippet> = directory
        .iter_snippets()
        .filter(|s| directory.get_category_by_id(&s.category).is_none())
        .collect();
    if !orphans.is_empty() {
        groups.push(TreeGroup {
            name: "Uncategorized".to_string(),
            color: None,
            snippets: orphans,
        });
    }

    groups
}

/// Displays categories and their snippets in a tree-like structure
pub fn display_tree<S: KeyValueStore>(directory: &SnippetDirectory<S>) -> Result<()> {
    let groups = build_groups(directory);
    if groups.is_empty() {
        println!("{}  No categories or snippets found.", "┃".bright_magenta());
        return Ok(());
    }

    let count = groups.len();
    for (idx, group) in groups.iter().enumerate() {
        let is_last_group = idx == count - 1;
        let color = group.color.as_deref().unwrap_or("");
        println!(
            "{}  {} {} {}",
            "┃".bright_magenta(),
            "■".bright_blue(),
            group.name.bold(),
            color.bright_black()
        );

        for (i, snippet) in group.snippets.iter().enumerate() {
            let is_last_item = i == group.snippets.len() - 1;

            print!("{}  ", "┃".bright_magenta());
            // Guide line for the following groups
            if is_last_group {
                print!("   ");
            } else {
                print!("┃  ");
            }
            if is_last_item {
                print!("└── ");
            } else {
                print!("├── ");
            }

            let tags = if snippet.tags.is_empty() {
                String::new()
            } else {
                format!(" #{}", snippet.tags.join(" #"))
            };
            println!(
                "{} [{}]{}",
                snippet.title.bright_white(),
                snippet.language.file_extension().bright_black(),
                tags.bright_cyan()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageKeys;
    use crate::models::{MemoryStore, SnippetLanguage, StorageManager};

    #[test]
    fn orphans_are_grouped_last() {
        let mut dir =
            SnippetDirectory::new(StorageManager::new(MemoryStore::new(), StorageKeys::default()));
        let css = dir.create_category("CSS".into(), String::new(), "#264de4".into());
        dir.create_category("Empty".into(), String::new(), "#000".into());
        dir.create_snippet(
            "Grid".into(),
            "display: grid;".into(),
            SnippetLanguage::Css,
            css.id.clone(),
            vec![],
        );
        dir.create_snippet(
            "Lost".into(),
            "x".into(),
            SnippetLanguage::Other,
            "gone".into(),
            vec![],
        );

        let groups = build_groups(&dir);
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["CSS", "Empty", "Uncategorized"]);
        assert_eq!(groups[0].snippets[0].title, "Grid");
        assert!(groups[1].snippets.is_empty());
        assert_eq!(groups[2].snippets[0].title, "Lost");
        assert_eq!(groups[2].color, None);
    }
}
