pub mod category;
pub mod export;
pub mod snippet;
pub mod storage;

pub use category::{Category, CategoryUpdate, DEFAULT_CATEGORY_COLOR};
pub use export::{ExportData, ImportSummary, parse_export, render_export};
pub use snippet::{Snippet, SnippetLanguage, SnippetUpdate};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageManager};
