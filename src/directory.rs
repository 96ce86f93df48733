//! The snippet directory: owns every snippet and category, and writes a full
//! snapshot of both collections through the [`StorageManager`] after each
//! change.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::models::export::{self, ImportSummary};
use crate::models::{
    Category, CategoryUpdate, KeyValueStore, Snippet, SnippetLanguage, SnippetUpdate,
    StorageManager,
};
use crate::search::{self, SearchHit};

/// Categories created on first run: (name, description, color)
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 5] = [
    ("JavaScript", "JavaScript code snippets", "#f1c40f"),
    ("TypeScript", "TypeScript code snippets", "#2980b9"),
    ("Python", "Python code snippets", "#3498db"),
    ("HTML/CSS", "Frontend code snippets", "#e74c3c"),
    ("Utilities", "Utility functions and helpers", "#2ecc71"),
];

#[derive(Debug)]
pub struct SnippetDirectory<S: KeyValueStore> {
    snippets: Vec<Snippet>,
    categories: Vec<Category>,
    storage: StorageManager<S>,
}

impl<S: KeyValueStore> SnippetDirectory<S> {
    /// Load both collections from storage.
    pub fn new(storage: StorageManager<S>) -> Self {
        let snippets: Vec<Snippet> = storage
            .load_snippets()
            .into_iter()
            .map(Snippet::normalize)
            .collect();
        let categories = storage.load_categories();

        log::debug!(
            "loaded {} snippets and {} categories",
            snippets.len(),
            categories.len()
        );

        Self {
            snippets,
            categories,
            storage,
        }
    }

    pub fn storage(&self) -> &StorageManager<S> {
        &self.storage
    }

    fn persist(&mut self) {
        log::debug!(
            "saving {} snippets and {} categories",
            self.snippets.len(),
            self.categories.len()
        );
        self.storage.save_snippets(&self.snippets);
        self.storage.save_categories(&self.categories);
    }

    // ----- snippets -----

    pub fn create_snippet(
        &mut self,
        title: String,
        code: String,
        language: SnippetLanguage,
        category: String,
        tags: Vec<String>,
    ) -> Snippet {
        let snippet = Snippet::new(title, code, language, category, tags);
        log::debug!("created snippet {} ({})", snippet.id, snippet.title);
        self.snippets.push(snippet.clone());
        self.persist();
        snippet
    }

    pub fn get_all_snippets(&self) -> Vec<Snippet> {
        self.snippets.clone()
    }

    /// Borrowing view over the snippets, in insertion order
    pub fn iter_snippets(&self) -> impl Iterator<Item = &Snippet> {
        self.snippets.iter()
    }

    pub fn get_snippet_by_id(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    fn snippet_mut(&mut self, id: &str) -> Option<&mut Snippet> {
        self.snippets.iter_mut().find(|s| s.id == id)
    }

    /// Returns false if no snippet has this id.
    pub fn update_snippet(&mut self, id: &str, update: SnippetUpdate) -> bool {
        let Some(snippet) = self.snippet_mut(id) else {
            return false;
        };
        snippet.apply_update(update);
        self.persist();
        true
    }

    /// Returns true only if the tag was actually added.
    pub fn add_snippet_tag(&mut self, id: &str, tag: &str) -> bool {
        let added = match self.snippet_mut(id) {
            Some(snippet) => snippet.add_tag(tag),
            None => return false,
        };
        self.persist();
        added
    }

    /// Returns true only if the tag was actually removed.
    pub fn remove_snippet_tag(&mut self, id: &str, tag: &str) -> bool {
        let removed = match self.snippet_mut(id) {
            Some(snippet) => snippet.remove_tag(tag),
            None => return false,
        };
        self.persist();
        removed
    }

    pub fn delete_snippet(&mut self, id: &str) -> bool {
        let Some(index) = self.snippets.iter().position(|s| s.id == id) else {
            return false;
        };
        self.snippets.remove(index);
        self.persist();
        true
    }

    pub fn search_snippets(&self, query: &str) -> Vec<Snippet> {
        search::search_snippets(&self.snippets, query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn search_hits(&self, query: &str) -> Vec<SearchHit> {
        search::search_hits(&self.snippets, query)
    }

    pub fn filter_by_category(&self, category_id: &str) -> Vec<Snippet> {
        self.snippets
            .iter()
            .filter(|s| s.category == category_id)
            .cloned()
            .collect()
    }

    pub fn filter_by_language(&self, language: SnippetLanguage) -> Vec<Snippet> {
        self.snippets
            .iter()
            .filter(|s| s.language == language)
            .cloned()
            .collect()
    }

    /// Every distinct tag, in order of first appearance
    pub fn get_all_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for snippet in &self.snippets {
            for tag in &snippet.tags {
                if seen.insert(tag.as_str()) {
                    tags.push(tag.clone());
                }
            }
        }
        tags
    }

    pub fn get_snippets_by_tag(&self, tag: &str) -> Vec<Snippet> {
        self.snippets
            .iter()
            .filter(|s| s.has_tag(tag))
            .cloned()
            .collect()
    }

    // ----- categories -----

    pub fn create_category(
        &mut self,
        name: String,
        description: String,
        color: String,
    ) -> Category {
        let category = Category::new(name, description, color);
        log::debug!("created category {} ({})", category.id, category.name);
        self.categories.push(category.clone());
        self.persist();
        category
    }

    pub fn get_all_categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    pub fn get_category_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// First category whose name matches, ignoring case
    pub fn find_category_by_name(&self, name: &str) -> Option<&Category> {
        let name = name.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.name.to_lowercase() == name)
    }

    pub fn update_category(&mut self, id: &str, update: CategoryUpdate) -> bool {
        let Some(category) = self.categories.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        category.apply_update(update);
        self.persist();
        true
    }

    /// Snippets pointing at the category keep their (now dangling) reference.
    pub fn delete_category(&mut self, id: &str) -> bool {
        let Some(index) = self.categories.iter().position(|c| c.id == id) else {
            return false;
        };
        self.categories.remove(index);
        self.persist();
        true
    }

    /// Snippet count per referenced category id. Categories without snippets
    /// are absent; dangling ids are counted like any other.
    pub fn get_snippet_count_by_category(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for snippet in &self.snippets {
            *counts.entry(snippet.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Create the stock categories if there are none yet.
    pub fn seed_default_categories(&mut self) -> usize {
        if !self.categories.is_empty() {
            return 0;
        }

        self.categories.extend(
            DEFAULT_CATEGORIES
                .iter()
                .map(|(name, description, color)| {
                    Category::new(name.to_string(), description.to_string(), color.to_string())
                }),
        );
        log::info!("seeded {} default categories", self.categories.len());
        self.persist();
        self.categories.len()
    }

    // ----- export / import -----

    pub fn export_data(&self) -> Result<String> {
        export::render_export(&self.snippets, &self.categories)
    }

    /// Replace the whole state with the contents of an export document.
    /// Nothing changes unless the document is valid.
    pub fn import_data(&mut self, data: &str) -> Result<ImportSummary> {
        let parsed = export::parse_export(data).inspect_err(|e| {
            log::warn!("rejected import: {}", e);
        })?;

        self.snippets = parsed.snippets;
        self.categories = parsed.categories;
        self.persist();

        let summary = ImportSummary {
            snippets: self.snippets.len(),
            categories: self.categories.len(),
        };
        log::info!(
            "imported {} snippets and {} categories",
            summary.snippets,
            summary.categories
        );
        Ok(summary)
    }

    /// Drop everything, in memory and in the store.
    pub fn clear_all(&mut self) {
        self.snippets.clear();
        self.categories.clear();
        self.storage.clear_all();
        log::info!("cleared all snippets and categories");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageKeys;
    use crate::models::MemoryStore;
    use crate::models::storage::tests::BrokenStore;

    fn directory() -> SnippetDirectory<MemoryStore> {
        SnippetDirectory::new(StorageManager::new(MemoryStore::new(), StorageKeys::default()))
    }

    fn add(dir: &mut SnippetDirectory<MemoryStore>, title: &str, category: &str) -> Snippet {
        dir.create_snippet(
            title.into(),
            format!("// {}", title),
            SnippetLanguage::JavaScript,
            category.into(),
            vec![],
        )
    }

    #[test]
    fn create_then_get_returns_same_fields() {
        let mut dir = directory();
        let created = dir.create_snippet(
            "Sum".into(),
            "a + b".into(),
            SnippetLanguage::Python,
            "c1".into(),
            vec!["math".into()],
        );

        let found = dir.get_snippet_by_id(&created.id).unwrap();
        assert_eq!(found, &created);
        assert_eq!(found.created_at, found.updated_at);
    }

    #[test]
    fn every_mutation_persists() {
        let mut dir = directory();
        let snippet = add(&mut dir, "One", "c1");
        assert_eq!(dir.storage().load_snippets().len(), 1);

        dir.add_snippet_tag(&snippet.id, "x");
        assert_eq!(dir.storage().load_snippets()[0].tags, vec!["x"]);

        let update = SnippetUpdate {
            title: Some("Renamed".into()),
            ..Default::default()
        };
        assert!(dir.update_snippet(&snippet.id, update));
        assert_eq!(dir.storage().load_snippets()[0].title, "Renamed");

        assert!(dir.remove_snippet_tag(&snippet.id, "x"));
        assert!(dir.storage().load_snippets()[0].tags.is_empty());

        let category = dir.create_category("Go".into(), String::new(), "#00add8".into());
        assert_eq!(dir.storage().load_categories()[0].id, category.id);

        let update = CategoryUpdate {
            name: Some("Golang".into()),
            ..Default::default()
        };
        assert!(dir.update_category(&category.id, update));
        assert_eq!(dir.storage().load_categories()[0].name, "Golang");

        assert!(dir.delete_category(&category.id));
        assert!(dir.storage().load_categories().is_empty());

        dir.delete_snippet(&snippet.id);
        assert!(dir.storage().load_snippets().is_empty());
    }

    #[test]
    fn update_missing_snippet_fails_without_side_effects() {
        let mut dir = directory();
        assert!(!dir.update_snippet("nope", SnippetUpdate::default()));
        assert!(dir.storage().store().is_empty());
    }

    #[test]
    fn update_without_fields_bumps_timestamp() {
        let mut dir = directory();
        let snippet = add(&mut dir, "One", "c1");
        assert!(dir.update_snippet(&snippet.id, SnippetUpdate::default()));
        let updated = dir.get_snippet_by_id(&snippet.id).unwrap();
        assert!(updated.updated_at >= snippet.updated_at);
        assert_eq!(updated.title, "One");
    }

    #[test]
    fn delete_unknown_id_keeps_collection() {
        let mut dir = directory();
        add(&mut dir, "One", "c1");
        assert!(!dir.delete_snippet("missing"));
        assert_eq!(dir.get_all_snippets().len(), 1);
    }

    #[test]
    fn tag_operations_on_missing_snippet_fail() {
        let mut dir = directory();
        assert!(!dir.add_snippet_tag("missing", "t"));
        assert!(!dir.remove_snippet_tag("missing", "t"));
    }

    #[test]
    fn filters_keep_original_order() {
        let mut dir = directory();
        add(&mut dir, "First", "a");
        dir.create_snippet("Py".into(), "pass".into(), SnippetLanguage::Python, "b".into(), vec![]);
        add(&mut dir, "Third", "a");

        let titles: Vec<_> = dir.filter_by_category("a").into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["First", "Third"]);
        assert_eq!(dir.filter_by_language(SnippetLanguage::Python).len(), 1);
        assert!(dir.filter_by_language(SnippetLanguage::Css).is_empty());
    }

    #[test]
    fn tags_are_listed_once_in_first_seen_order() {
        let mut dir = directory();
        dir.create_snippet(
            "a".into(),
            "".into(),
            SnippetLanguage::Other,
            "c".into(),
            vec!["y".into(), "x".into()],
        );
        dir.create_snippet(
            "b".into(),
            "".into(),
            SnippetLanguage::Other,
            "c".into(),
            vec!["x".into(), "z".into()],
        );

        assert_eq!(dir.get_all_tags(), vec!["y", "x", "z"]);
        assert_eq!(dir.get_snippets_by_tag("x").len(), 2);
        assert!(dir.get_snippets_by_tag("X").is_empty());
    }

    #[test]
    fn counts_skip_empty_categories() {
        let mut dir = directory();
        add(&mut dir, "1", "A");
        add(&mut dir, "2", "A");
        add(&mut dir, "3", "B");

        let counts = dir.get_snippet_count_by_category();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["A"], 2);
        assert_eq!(counts["B"], 1);
        assert!(!counts.contains_key("C"));
    }

    #[test]
    fn category_crud() {
        let mut dir = directory();
        let category = dir.create_category("Rust".into(), "Crabs".into(), "#dea584".into());

        assert_eq!(dir.find_category_by_name("rust").unwrap().id, category.id);
        assert!(dir.update_category(
            &category.id,
            CategoryUpdate {
                color: Some("#000000".into()),
                ..Default::default()
            }
        ));
        assert_eq!(dir.get_category_by_id(&category.id).unwrap().color, "#000000");
        assert!(!dir.update_category("missing", CategoryUpdate::default()));

        assert!(dir.delete_category(&category.id));
        assert!(!dir.delete_category(&category.id));
        assert!(dir.get_all_categories().is_empty());
    }

    #[test]
    fn seeding_only_happens_once() {
        let mut dir = directory();
        assert_eq!(dir.seed_default_categories(), 5);
        assert_eq!(dir.seed_default_categories(), 0);
        let names: Vec<_> = dir.get_all_categories().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["JavaScript", "TypeScript", "Python", "HTML/CSS", "Utilities"]);
    }

    #[test]
    fn failed_import_leaves_state_alone() {
        let mut dir = directory();
        let kept = add(&mut dir, "Keep me", "c");

        assert!(dir.import_data("{\"snippets\": []}").is_err());
        assert!(dir.import_data("garbage").is_err());
        assert_eq!(dir.get_all_snippets(), vec![kept]);
    }

    #[test]
    fn import_replaces_instead_of_merging() {
        let mut source = directory();
        let imported = add(&mut source, "Imported", "c");
        let text = source.export_data().unwrap();

        let mut target = directory();
        add(&mut target, "Old", "c");
        target.create_category("Old".into(), String::new(), "#fff".into());

        let summary = target.import_data(&text).unwrap();
        assert_eq!(summary, ImportSummary { snippets: 1, categories: 0 });
        assert_eq!(target.get_all_snippets(), vec![imported]);
        assert!(target.get_all_categories().is_empty());
        assert_eq!(target.storage().load_snippets().len(), 1);
    }

    #[test]
    fn clear_all_empties_memory_and_store() {
        let mut dir = directory();
        add(&mut dir, "One", "c");
        dir.seed_default_categories();
        dir.clear_all();

        assert!(dir.get_all_snippets().is_empty());
        assert!(dir.get_all_categories().is_empty());
        assert!(dir.storage().store().is_empty());
    }

    #[test]
    fn broken_store_does_not_block_operations() {
        let mut dir = SnippetDirectory::new(
            StorageManager::new(BrokenStore, StorageKeys::default()),
        );
        let snippet = dir.create_snippet(
            "Still works".into(),
            "x".into(),
            SnippetLanguage::Other,
            "c".into(),
            vec![],
        );
        assert!(dir.get_snippet_by_id(&snippet.id).is_some());
        assert!(dir.delete_snippet(&snippet.id));
    }
}
