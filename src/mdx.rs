//! Search entries extracted from MDX pages.
//!
//! Scanning works on raw lines rather than a Markdown AST: ATX headings give the
//! page title and heading hierarchy, and capitalized tags give component references.

use crate::keywords::{KeywordSet, extract_keywords};
use crate::types::{EntryKind, SearchEntry};
use ahash::AHashSet;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// Characters of page text kept in the `page` entry preview.
const PREVIEW_CHARS: usize = 300;

const MAX_HEADING_LEVEL: usize = 6;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z0-9_]+)[^>]*>").expect("tag pattern is valid"));

/// Knobs for turning MDX files into search entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdxOptions {
    /// Prefix stripped from file paths when building page URLs.
    pub content_root: String,
    /// Component name to page anchor. An empty anchor links to the top of the page.
    pub component_anchors: IndexMap<String, String>,
}

impl Default for MdxOptions {
    fn default() -> Self {
        let component_anchors = [
            ("CssDoc", "button-components"),
            ("LiveExample", "live-code-examples"),
            ("HelloWorld", ""),
        ]
        .into_iter()
        .map(|(name, anchor)| (name.to_string(), anchor.to_string()))
        .collect();

        Self {
            content_root: "src/".to_string(),
            component_anchors,
        }
    }
}

/// An ATX heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Heading<'a> {
    level: usize,
    text: &'a str,
}

/// Recognize `#`..`######` followed by whitespace and non-empty text.
fn parse_heading(line: &str) -> Option<Heading<'_>> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > MAX_HEADING_LEVEL {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(Heading { level, text })
}

/// Lowercase and hyphenate a heading for use as an anchor.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Page route for an MDX file: content root and extension removed.
pub fn page_url(file_path: &str, content_root: &str) -> String {
    let relative = file_path.strip_prefix(content_root).unwrap_or(file_path);
    strip_extension(relative).to_string()
}

fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |slash| slash + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}

fn file_stem(file_path: &str) -> String {
    Path::new(file_path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string())
}

/// Build the `page`, `heading` and `component` entries for one MDX file.
///
/// Entries come out in that order: the page first, headings in document order,
/// then each distinct component in order of first use.
pub fn parse_mdx(content: &str, file_path: &str, options: &MdxOptions) -> Vec<SearchEntry> {
    let headings: Vec<Heading<'_>> = content.lines().filter_map(parse_heading).collect();

    let title = headings
        .iter()
        .find(|h| h.level == 1)
        .map_or_else(|| file_stem(file_path), |h| h.text.to_string());
    let url = page_url(file_path, &options.content_root);

    let mut entries = Vec::with_capacity(1 + headings.len());
    entries.push(SearchEntry {
        id: format!("page-{}", file_path),
        title: title.clone(),
        url: url.clone(),
        kind: EntryKind::Page,
        content: preview(content),
        keywords: extract_keywords(content),
        hierarchy: None,
    });

    let mut stack: Vec<Option<String>> = Vec::with_capacity(MAX_HEADING_LEVEL);
    for heading in &headings {
        if stack.len() < heading.level {
            stack.resize(heading.level, None);
        }
        stack[heading.level - 1] = Some(heading.text.to_string());
        stack.truncate(heading.level);

        let slug = slugify(heading.text);
        entries.push(SearchEntry {
            id: format!("heading-{}-{}", file_path, slug),
            title: heading.text.to_string(),
            url: format!("{}#{}", url, slug),
            kind: EntryKind::Heading,
            content: heading.text.to_string(),
            keywords: extract_keywords(heading.text),
            hierarchy: Some(stack.clone()),
        });
    }

    entries.extend(component_entries(content, file_path, &title, &url, options));
    entries
}

fn component_entries(
    content: &str,
    file_path: &str,
    title: &str,
    url: &str,
    options: &MdxOptions,
) -> Vec<SearchEntry> {
    let mut seen = AHashSet::new();
    let mut entries = Vec::new();

    for caps in TAG_RE.captures_iter(content) {
        let name = &caps[1];
        if !name.starts_with(|c: char| c.is_ascii_uppercase()) || !seen.insert(name.to_string()) {
            continue;
        }

        let component_url = match options.component_anchors.get(name) {
            Some(anchor) if !anchor.is_empty() => format!("{}#{}", url, anchor),
            _ => url.to_string(),
        };

        let mut keywords = KeywordSet::default();
        keywords.push(name.to_lowercase());
        keywords.push("component");
        keywords.extend(extract_keywords(name));

        entries.push(SearchEntry {
            id: format!("component-{}-{}", file_path, name),
            title: name.to_string(),
            url: component_url,
            kind: EntryKind::Component,
            content: format!("{} component used in {}", name, title),
            keywords: keywords.into_vec(),
            hierarchy: None,
        });
    }

    entries
}

/// Page text with Markdown markers removed, cut to [`PREVIEW_CHARS`].
fn preview(content: &str) -> String {
    content
        .chars()
        .filter(|c| !matches!(c, '#' | '*' | '`'))
        .take(PREVIEW_CHARS)
        .collect()
}
