use crate::models::Snippet;

/// Which part of a snippet a query matched first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Code,
    Tag,
}

impl MatchField {
    pub fn label(&self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Code => "code",
            MatchField::Tag => "tag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub snippet: Snippet,
    pub field: MatchField,
    pub match_context: String,
}

/// Case-insensitive substring match against title, code or any tag.
/// The empty query matches everything.
pub fn matches_query(snippet: &Snippet, query: &str) -> bool {
    match_field(snippet, &query.to_lowercase()).is_some()
}

/// All snippets matching `query`, in their original order
pub fn search_snippets<'a>(snippets: &'a [Snippet], query: &str) -> Vec<&'a Snippet> {
    let query = query.to_lowercase();
    snippets
        .iter()
        .filter(|snippet| match_field(snippet, &query).is_some())
        .collect()
}

/// Like [`search_snippets`], with the matched field and a line of context
pub fn search_hits(snippets: &[Snippet], query: &str) -> Vec<SearchHit> {
    let query = query.to_lowercase();

    snippets
        .iter()
        .filter_map(|snippet| {
            let field = match_field(snippet, &query)?;
            let match_context = match field {
                MatchField::Title => format!("Title: {}", snippet.title),
                MatchField::Code => code_context(&snippet.code, &query),
                MatchField::Tag => {
                    let tag = snippet
                        .tags
                        .iter()
                        .find(|tag| tag.to_lowercase().contains(&query))
                        .map(String::as_str)
                        .unwrap_or_default();
                    format!("Tag: {}", tag)
                }
            };

            Some(SearchHit {
                snippet: snippet.clone(),
                field,
                match_context,
            })
        })
        .collect()
}

// `query` must already be lowercased
fn match_field(snippet: &Snippet, query: &str) -> Option<MatchField> {
    if snippet.title.to_lowercase().contains(query) {
        Some(MatchField::Title)
    } else if snippet.code.to_lowercase().contains(query) {
        Some(MatchField::Code)
    } else if snippet
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(query))
    {
        Some(MatchField::Tag)
    } else {
        None
    }
}

/// First line of code containing the query, as `Line N: ...`
fn code_context(code: &str, query: &str) -> String {
    code.lines()
        .enumerate()
        .find(|(_, line)| line.to_lowercase().contains(query))
        .map(|(i, line)| format!("Line {}: {}", i + 1, line.trim()))
        // A match spanning a line break has no single line to show
        .unwrap_or_else(|| "Line 1: ...".to_string())
}
