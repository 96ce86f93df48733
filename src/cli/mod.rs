//! Command-line front end.
//!
//! Parses arguments with clap, opens the snippet directory from the
//! configured data directory and hands off to the handlers in
//! [`commands`]. This is the only layer that prints.

pub mod commands;
pub mod tree;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::Config;
use crate::directory::SnippetDirectory;
use crate::models::{FileStore, SnippetLanguage, StorageManager};

#[derive(Debug, Parser)]
#[command(name = "codeshelf", version, about = "Store, tag and search code snippets")]
pub struct Cli {
    /// Directory holding the store and config.toml
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List snippets, optionally filtered
    #[command(visible_alias = "ls")]
    List {
        /// Category id or name
        #[arg(short = 'C', long)]
        category: Option<String>,
        #[arg(short, long)]
        language: Option<SnippetLanguage>,
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show categories with their snippets as a tree
    Tree,
    /// Display a snippet by id or title (partial titles work)
    #[command(visible_aliases = ["view", "cat"])]
    Show { snippet: String },
    /// Search titles, code and tags
    #[command(visible_alias = "find")]
    Search { query: String },
    /// Create a snippet
    Add {
        #[arg(short, long)]
        title: String,
        /// Inline code; use --file to read it from disk instead
        #[arg(short, long, conflicts_with = "file")]
        code: Option<String>,
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Inferred from the file extension when omitted
        #[arg(short, long)]
        language: Option<SnippetLanguage>,
        /// Category id or name
        #[arg(short = 'C', long)]
        category: String,
        /// Comma separated
        #[arg(long)]
        tags: Option<String>,
    },
    /// Change fields of a snippet; omitted fields stay as they are
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, conflicts_with = "file")]
        code: Option<String>,
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
        #[arg(short, long)]
        language: Option<SnippetLanguage>,
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Comma separated, replaces the whole tag list
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a snippet
    #[command(visible_alias = "delete")]
    Rm { id: String },
    /// Add or remove a single tag
    Tag {
        #[command(subcommand)]
        action: TagCommand,
    },
    /// List every tag in use
    Tags,
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryCommand,
    },
    /// Write all snippets and categories to a JSON file
    Export {
        /// Defaults to code-snippets-YYYY-MM-DD.json
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Replace everything with the contents of an export file
    Import { path: PathBuf },
    /// Copy a snippet's code to the clipboard
    Copy { snippet: String },
    /// Delete all snippets and categories
    Clear {
        /// Required, there is no undo
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    Add { id: String, tag: String },
    Rm { id: String, tag: String },
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Defaults to the configured colour
        #[arg(short, long)]
        color: Option<String>,
    },
    #[command(visible_alias = "ls")]
    List,
    Edit {
        /// Category id or name
        category: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    Rm {
        /// Category id or name
        category: String,
    },
}

/// Open the on-disk directory described by `config`
pub fn open_directory(config: &Config) -> SnippetDirectory<FileStore> {
    let store = FileStore::new(config.store_dir());
    SnippetDirectory::new(StorageManager::new(store, config.storage.clone()))
}

/// Executes a parsed command line
pub fn execute(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        print_help();
        return Ok(());
    };

    let config = Config::load(cli.data_dir.as_deref()).context("Failed to load configuration")?;
    let mut directory = open_directory(&config);

    let seeds = !matches!(command, Command::Import { .. } | Command::Clear { .. });
    if config.seed_default_categories && seeds {
        directory.seed_default_categories();
    }

    match command {
        Command::List {
            category,
            language,
            tag,
        } => commands::list_snippets(&directory, category.as_deref(), language, tag.as_deref()),
        Command::Tree => tree::display_tree(&directory),
        Command::Show { snippet } => commands::show_snippet(&directory, &snippet),
        Command::Search { query } => commands::search_snippets(&directory, &query),
        Command::Add {
            title,
            code,
            file,
            language,
            category,
            tags,
        } => commands::add_snippet(
            &mut directory,
            commands::NewSnippet {
                title,
                code,
                file,
                language,
                category,
                tags,
            },
        ),
        Command::Edit {
            id,
            title,
            code,
            file,
            language,
            category,
            tags,
        } => commands::edit_snippet(
            &mut directory,
            &id,
            commands::SnippetEdits {
                title,
                code,
                file,
                language,
                category,
                tags,
            },
        ),
        Command::Rm { id } => commands::delete_snippet(&mut directory, &id),
        Command::Tag { action } => match action {
            TagCommand::Add { id, tag } => commands::add_tag(&mut directory, &id, &tag),
            TagCommand::Rm { id, tag } => commands::remove_tag(&mut directory, &id, &tag),
        },
        Command::Tags => commands::list_tags(&directory),
        Command::Category { action } => match action {
            CategoryCommand::Add {
                name,
                description,
                color,
            } => {
                let color = color.unwrap_or_else(|| config.default_color.clone());
                commands::add_category(&mut directory, name, description, color)
            }
            CategoryCommand::List => commands::list_categories(&directory),
            CategoryCommand::Edit {
                category,
                name,
                description,
                color,
            } => commands::edit_category(&mut directory, &category, name, description, color),
            CategoryCommand::Rm { category } => {
                commands::delete_category(&mut directory, &category)
            }
        },
        Command::Export { output, stdout } => {
            commands::export_data(&directory, output.as_deref(), stdout)
        }
        Command::Import { path } => commands::import_data(&mut directory, &path),
        Command::Copy { snippet } => commands::copy_snippet(&directory, &snippet),
        Command::Clear { yes } => commands::clear_all(&mut directory, yes),
    }
}

/// Prints the help message with available commands
pub fn print_help() {
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "CODESHELF - SNIPPET MANAGER".bold()
    );
    println!("{}  {}", "┃".bright_magenta(), "USAGE:".bright_yellow());
    println!("{}  codeshelf [--data-dir DIR] <COMMAND>", "┃".bright_magenta());
    println!("{}  {}", "┃".bright_magenta(), "COMMANDS:".bright_yellow());

    let rows = [
        ("list, ls", "List snippets (--category, --language, --tag)"),
        ("tree", "Show categories with their snippets"),
        ("show, view <NAME>", "Display a snippet by id or title"),
        ("search, find <QUERY>", "Search titles, code and tags"),
        ("add", "Create a snippet"),
        ("edit <ID>", "Change fields of a snippet"),
        ("rm <ID>", "Delete a snippet"),
        ("tag add|rm <ID> <TAG>", "Add or remove one tag"),
        ("tags", "List every tag in use"),
        ("category add|list|edit|rm", "Manage categories"),
        ("export [-o PATH]", "Write everything to a JSON file"),
        ("import <PATH>", "Replace everything from a JSON file"),
        ("copy <NAME>", "Copy a snippet's code to the clipboard"),
        ("clear --yes", "Delete all snippets and categories"),
    ];
    for (command, description) in rows {
        println!(
            "{}  {:<27} {}",
            "┃".bright_magenta(),
            command.bright_white(),
            description
        );
    }

    println!("{}  {}", "┃".bright_magenta(), "TIP:".bright_green());
    println!(
        "{}  Run `codeshelf <COMMAND> --help` for the options of a command",
        "┃".bright_magenta()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_aliases_and_tags() {
        let cli = Cli::try_parse_from([
            "codeshelf", "add", "-t", "Sort", "-c", "a.sort()", "-l", "js", "-C", "JavaScript",
            "--tags", "array, sort",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Add {
                title,
                language,
                category,
                tags,
                ..
            }) => {
                assert_eq!(title, "Sort");
                assert_eq!(language, Some(SnippetLanguage::JavaScript));
                assert_eq!(category, "JavaScript");
                assert_eq!(tags.as_deref(), Some("array, sort"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_language() {
        assert!(Cli::try_parse_from(["codeshelf", "list", "--language", "cobol"]).is_err());
    }

    #[test]
    fn code_and_file_conflict() {
        assert!(
            Cli::try_parse_from([
                "codeshelf", "add", "-t", "x", "-c", "y", "-f", "z.js", "-C", "c"
            ])
            .is_err()
        );
    }

    #[test]
    fn data_dir_is_global() {
        let cli = Cli::try_parse_from(["codeshelf", "tags", "--data-dir", "/tmp/shelf"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/shelf")));
    }
}
