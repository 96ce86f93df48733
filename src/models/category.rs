use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CATEGORY_COLOR: &str = "#3498db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
}

/// Same present-overwrites rule as [`SnippetUpdate`](crate::models::SnippetUpdate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl Category {
    pub fn new(name: String, description: String, color: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            color,
        }
    }

    pub fn with_default_color(name: String, description: String) -> Self {
        Self::new(name, description, default_color())
    }

    pub fn apply_update(&mut self, update: CategoryUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
    }
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}
