//! Projection of CSS doc comments into the search index.
//!
//! Inside one process the CSS doc map is handed over directly ([`integrate`]).
//! When the search index is built as a separate step, the persisted CSS doc JSON
//! is read back instead ([`integrate_file`]); a missing or broken file only costs
//! the `css-class` entries.

use crate::diagnostics::Diagnostics;
use crate::error::SourceError;
use crate::keywords::{KeywordSet, extract_keywords};
use crate::types::{CssDocs, DocComment, EntryKind, SearchEntry};
use std::path::Path;

const SECTION_SUFFIX: &str = "-components";

/// Tags added to every CSS entry.
const CSS_TAGS: &[&str] = &["css", "style", "class"];

/// Anchors derived for one documented selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssSection {
    /// Page section for the source file, e.g. `button-group-components`.
    pub section: String,
    /// Anchor for the selector itself, e.g. `btn-primary`.
    pub anchor: String,
}

impl CssSection {
    pub fn new(file_path: &str, selector: &str) -> Self {
        let stem = Path::new(file_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut hyphenated = String::with_capacity(stem.len() + SECTION_SUFFIX.len() + 4);
        for c in stem.chars() {
            if c.is_ascii_uppercase() {
                hyphenated.push('-');
            }
            hyphenated.push(c.to_ascii_lowercase());
        }
        hyphenated.push_str(SECTION_SUFFIX);
        let section = hyphenated
            .strip_prefix('-')
            .unwrap_or(&hyphenated)
            .to_string();

        let anchor = selector
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect::<String>()
            .to_ascii_lowercase();

        Self { section, anchor }
    }

    /// Section name without the `-components` suffix.
    pub fn base(&self) -> &str {
        self.section
            .strip_suffix(SECTION_SUFFIX)
            .unwrap_or(&self.section)
    }
}

/// Build `css-class` entries for every documented selector, in map order.
pub fn integrate(docs: &CssDocs, page_route: &str) -> Vec<SearchEntry> {
    docs.iter()
        .flat_map(|(file_path, comments)| {
            comments
                .iter()
                .filter_map(move |doc| css_entry(file_path, doc, page_route))
        })
        .collect()
}

fn css_entry(file_path: &str, doc: &DocComment, page_route: &str) -> Option<SearchEntry> {
    let selector = doc.selector.as_deref().filter(|s| !s.is_empty())?;
    let section = CssSection::new(file_path, selector);

    let mut keywords = KeywordSet::default();
    keywords.push(
        selector
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_ascii_lowercase(),
    );
    keywords.extend(CSS_TAGS.iter().copied());
    keywords.push(section.base());
    keywords.extend(extract_keywords(&doc.description));

    let content = if doc.description.is_empty() {
        format!("CSS class {}", selector)
    } else {
        doc.description.clone()
    };

    Some(SearchEntry {
        id: format!("css-{}-{}", file_path, selector),
        title: selector.to_string(),
        url: format!("{}#{}", page_route, section.anchor),
        kind: EntryKind::CssClass,
        content,
        keywords: keywords.into_vec(),
        hierarchy: None,
    })
}

/// Read a persisted CSS doc file.
pub fn load_css_docs(path: &Path) -> Result<CssDocs, SourceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SourceError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Build `css-class` entries from a persisted CSS doc file.
///
/// Any failure to read or decode the file is reported and yields no entries.
pub fn integrate_file(
    path: &Path,
    page_route: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<SearchEntry> {
    match load_css_docs(path) {
        Ok(docs) => {
            tracing::debug!(
                path = %path.display(),
                files = docs.len(),
                "Loaded CSS docs for search integration"
            );
            integrate(&docs, page_route)
        }
        Err(e) => {
            diagnostics.warn(
                e.path(),
                format!("Could not integrate CSS docs data: {}", e),
            );
            Vec::new()
        }
    }
}
