use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ShelfError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub code: String,
    pub language: SnippetLanguage,
    /// Id of a [`Category`](crate::models::Category). Never validated, may dangle.
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetLanguage {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Html,
    Css,
    #[serde(other)]
    Other,
}

impl SnippetLanguage {
    pub const ALL: [SnippetLanguage; 7] = [
        SnippetLanguage::JavaScript,
        SnippetLanguage::TypeScript,
        SnippetLanguage::Python,
        SnippetLanguage::Java,
        SnippetLanguage::Html,
        SnippetLanguage::Css,
        SnippetLanguage::Other,
    ];

    /// Name used in stored records and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetLanguage::JavaScript => "javascript",
            SnippetLanguage::TypeScript => "typescript",
            SnippetLanguage::Python => "python",
            SnippetLanguage::Java => "java",
            SnippetLanguage::Html => "html",
            SnippetLanguage::Css => "css",
            SnippetLanguage::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SnippetLanguage::JavaScript => "JavaScript",
            SnippetLanguage::TypeScript => "TypeScript",
            SnippetLanguage::Python => "Python",
            SnippetLanguage::Java => "Java",
            SnippetLanguage::Html => "HTML",
            SnippetLanguage::Css => "CSS",
            SnippetLanguage::Other => "Other",
        }
    }

    /// Get file extension for the language
    pub fn file_extension(&self) -> &'static str {
        match self {
            SnippetLanguage::JavaScript => "js",
            SnippetLanguage::TypeScript => "ts",
            SnippetLanguage::Python => "py",
            SnippetLanguage::Java => "java",
            SnippetLanguage::Html => "html",
            SnippetLanguage::Css => "css",
            SnippetLanguage::Other => "txt",
        }
    }

    /// Get language from a file extension, falling back to `Other`
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "jsx" => SnippetLanguage::JavaScript,
            "ts" | "tsx" => SnippetLanguage::TypeScript,
            "py" => SnippetLanguage::Python,
            "java" => SnippetLanguage::Java,
            "html" | "htm" => SnippetLanguage::Html,
            "css" => SnippetLanguage::Css,
            _ => SnippetLanguage::Other,
        }
    }
}

impl fmt::Display for SnippetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnippetLanguage {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "javascript" | "js" => Ok(SnippetLanguage::JavaScript),
            "typescript" | "ts" => Ok(SnippetLanguage::TypeScript),
            "python" | "py" => Ok(SnippetLanguage::Python),
            "java" => Ok(SnippetLanguage::Java),
            "html" => Ok(SnippetLanguage::Html),
            "css" => Ok(SnippetLanguage::Css),
            "other" => Ok(SnippetLanguage::Other),
            other => Err(ShelfError::InvalidInput(format!(
                "unknown language '{}' (expected one of: {})",
                other,
                SnippetLanguage::ALL.map(|l| l.as_str()).join(", ")
            ))),
        }
    }
}

/// Fields to overwrite on a snippet. `None` leaves a field alone; `Some`
/// replaces it, even with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetUpdate {
    pub title: Option<String>,
    pub code: Option<String>,
    pub language: Option<SnippetLanguage>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl SnippetUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.code.is_none()
            && self.language.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }
}

impl Snippet {
    pub fn new(
        title: String,
        code: String,
        language: SnippetLanguage,
        category: String,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            title,
            code,
            language,
            category,
            tags: dedup_tags(tags),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. The timestamp moves even when nothing else does.
    pub fn apply_update(&mut self, update: SnippetUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(code) = update.code {
            self.code = code;
        }
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(tags) = update.tags {
            self.tags = dedup_tags(tags);
        }
        self.touch();
    }

    /// Returns true if the tag was not already present
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        self.touch();
        true
    }

    /// Returns true if the tag was present
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.remove(index);
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }

    /// Drop duplicate tags left by hand-edited or foreign records, and lift an
    /// `updated_at` that predates `created_at`.
    pub(crate) fn normalize(mut self) -> Self {
        self.tags = dedup_tags(self.tags);
        if self.updated_at < self.created_at {
            log::warn!(
                "snippet '{}' was updated ({}) before it was created ({}), using the creation time",
                self.id,
                self.updated_at.to_rfc3339(),
                self.created_at.to_rfc3339()
            );
            self.updated_at = self.created_at;
        }
        self
    }

    // updated_at never moves backwards, even if the wall clock does
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// Keep the first occurrence of every tag, preserving order.
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}
