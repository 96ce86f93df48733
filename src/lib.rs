//! codeshelf - code snippet manager
//!
//! Keeps short code samples with a language, a category and free-form tags,
//! and persists them as JSON collections in a key-value store.
//!
//! - [`directory::SnippetDirectory`] owns all snippets and categories and
//!   re-saves both collections after every change
//! - [`models::storage`] holds the key-value store trait, its file and
//!   in-memory implementations, and the persistence adapter
//! - [`models::export`] reads and writes the `{ snippets, categories }`
//!   backup document
//! - [`cli`] is the command-line front end used by the `codeshelf` binary

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod search;

pub use directory::SnippetDirectory;
pub use error::{Result, ShelfError};
