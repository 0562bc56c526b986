//! Data model shared by the parsers, the integrator and the persisted JSON files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One `@param` line from a CSS documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocParam {
    pub name: String,
    pub description: String,
}

/// A documentation comment lifted from a CSS/SCSS file, tied to the rule after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocComment {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<DocParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
}

/// CSS docs keyed by source path, in discovery order.
///
/// Inserting an existing path replaces its comments but keeps the original position.
pub type CssDocs = IndexMap<String, Vec<DocComment>>;

/// Closed set of search entry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    Page,
    Heading,
    Component,
    CssClass,
}

impl EntryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Heading => "heading",
            Self::Component => "component",
            Self::CssClass => "css-class",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One indexable unit: a page, a heading, a component reference or a CSS selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub content: String,
    pub keywords: Vec<String>,
    /// Heading titles from level 1 down to this heading. Skipped levels are `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Vec<Option<String>>>,
}

/// Per-kind entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCounts {
    pub pages: usize,
    pub headings: usize,
    pub components: usize,
    pub css_classes: usize,
}

impl TypeCounts {
    /// Count entries by kind.
    pub fn tally(entries: &[SearchEntry]) -> Self {
        let count = |kind| entries.iter().filter(|e| e.kind == kind).count();
        Self {
            pages: count(EntryKind::Page),
            headings: count(EntryKind::Heading),
            components: count(EntryKind::Component),
            css_classes: count(EntryKind::CssClass),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMeta {
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub generated_at: String,
    pub total_entries: usize,
    pub types: TypeCounts,
}

/// The persisted search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub entries: Vec<SearchEntry>,
    pub meta: IndexMeta,
}

impl SearchIndex {
    /// Wrap entries with freshly computed metadata.
    pub fn new(entries: Vec<SearchEntry>, generated_at: String) -> Self {
        let meta = IndexMeta {
            generated_at,
            total_entries: entries.len(),
            types: TypeCounts::tally(&entries),
        };
        Self { entries, meta }
    }
}
