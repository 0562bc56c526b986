//! Documentation comments in CSS/SCSS sources.
//!
//! A doc comment is a `/** ... */` block. The rule that follows it (up to the next
//! doc comment) supplies the selector, and the block body is read line by line:
//!
//! ```css
//! /**
//!  * Primary button style
//!  * @param size Size variant
//!  * @example <button class="btn-primary">Go</button>
//!  * @since 1.2
//!  */
//! .btn-primary { color: red; }
//! ```

use crate::types::{DocComment, DocParam};
use regex::Regex;
use std::sync::LazyLock;

const DOC_OPEN: &str = "/**";
const DOC_CLOSE: &str = "*/";

static PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@param\s+([A-Za-z0-9_]+)\s+(.+)").expect("param pattern is valid")
});

/// File extensions the CSS doc stage watches.
pub const CSS_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less"];

/// Which accumulator free-text lines go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Description,
    Param,
    Example,
}

/// Extract every doc comment in `content`, in source order.
///
/// Blocks with neither a description nor a selector are dropped.
pub fn parse_css_docs(content: &str) -> Vec<DocComment> {
    let mut docs = Vec::new();
    let mut cursor = 0;

    while let Some(open) = content[cursor..].find(DOC_OPEN) {
        let body_start = cursor + open + DOC_OPEN.len();
        let Some(close) = content[body_start..].find(DOC_CLOSE) else {
            break;
        };
        let body = &content[body_start..body_start + close];

        let after = body_start + close + DOC_CLOSE.len();
        let following_start = after + (content[after..].len() - content[after..].trim_start().len());
        let following_end = content[following_start..]
            .find(DOC_OPEN)
            .map_or(content.len(), |next| following_start + next);
        let following = &content[following_start..following_end];

        if let Some(doc) = parse_block(body, extract_selector(following)) {
            docs.push(doc);
        }
        cursor = following_end;
    }

    docs
}

/// The text before the first `{`, trimmed. `None` when there is no rule.
fn extract_selector(following: &str) -> Option<String> {
    let brace = following.find('{')?;
    let selector = following[..brace].trim();
    (!selector.is_empty()).then(|| selector.to_string())
}

/// Drop the leading `*` gutter from a comment line.
fn strip_gutter(line: &str) -> &str {
    let line = line.trim_start();
    let line = match line.strip_prefix('*') {
        Some(rest) => rest
            .strip_prefix(|c: char| c.is_whitespace())
            .unwrap_or(rest),
        None => line,
    };
    line.trim()
}

fn parse_block(body: &str, selector: Option<String>) -> Option<DocComment> {
    let mut description = String::new();
    let mut params = Vec::new();
    let mut example = String::new();
    let mut since = String::new();
    let mut deprecated = false;
    let mut section = Section::Description;

    for line in body.split('\n').map(strip_gutter) {
        if line.starts_with("@param") {
            section = Section::Param;
            if let Some(caps) = PARAM_RE.captures(line) {
                params.push(DocParam {
                    name: caps[1].to_string(),
                    description: caps[2].to_string(),
                });
            }
        } else if let Some(rest) = line.strip_prefix("@example") {
            section = Section::Example;
            example = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("@since") {
            since = rest.trim().to_string();
        } else if line.starts_with("@deprecated") {
            deprecated = true;
        } else if line.is_empty() {
            continue;
        } else {
            match section {
                Section::Description => {
                    if !description.is_empty() {
                        description.push(' ');
                    }
                    description.push_str(line);
                }
                Section::Example => {
                    example.push('\n');
                    example.push_str(line);
                }
                Section::Param => {}
            }
        }
    }

    if description.is_empty() && selector.is_none() {
        return None;
    }

    let example = example.trim();
    Some(DocComment {
        description: description.trim().to_string(),
        selector,
        params,
        example: (!example.is_empty()).then(|| example.to_string()),
        since: (!since.is_empty()).then_some(since),
        deprecated,
    })
}
