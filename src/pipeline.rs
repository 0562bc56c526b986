//! Build orchestration: discovery, parsing, merging and persistence.
//!
//! Two stages mirror the two generated artifacts:
//!
//! - [`CssDocsStage`] writes the CSS doc map (`css-docs.json`).
//! - [`SearchIndexStage`] writes the search index (`search-index.json`), pulling
//!   CSS entries either from an in-memory map or from the persisted CSS doc file.
//!
//! [`Pipeline`] runs both in one pass and hands the CSS map over in memory.
//! Every stage exposes `run_once` (initial build) and `on_file_change`
//! (regeneration for watched extensions). Neither ever returns an error: problems
//! end up in the returned [`BuildReport`] and in the log.

use crate::config::{CssDocsConfig, PipelineConfig, SearchIndexConfig};
use crate::css::{CSS_EXTENSIONS, parse_css_docs};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, SourceError};
use crate::integrate::{integrate, integrate_file};
use crate::mdx::parse_mdx;
use crate::types::{CssDocs, SearchEntry, SearchIndex};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Extensions that only affect the search index.
pub const MDX_EXTENSIONS: &[&str] = &["mdx"];

/// Outcome of one stage run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Per-file problems that were skipped over.
    pub diagnostics: Diagnostics,
    /// Set when the run failed before its output could be written.
    pub error: Option<String>,
}

impl BuildReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Log and record a top-level failure.
    fn fail(&mut self, stage: &str, error: &anyhow::Error) {
        tracing::error!("Error generating {}: {:#}", stage, error);
        self.error = Some(format!("{:#}", error));
    }
}

/// Whether `path` has one of `extensions` (case-sensitive, without the dot).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

/// `/`-separated form of a root-relative path, used as a key in generated files.
fn path_key(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::RootDir => Some("".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve include patterns to root-relative file paths.
///
/// Patterns are expanded in order and their results concatenated, so a file
/// matched by two patterns appears twice. A pattern that matches nothing
/// contributes nothing and is not reported.
pub fn discover(root: &Path, patterns: &[String], diagnostics: &mut Diagnostics) -> Vec<String> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let mut files = Vec::new();

    for pattern in patterns {
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            format!("{}/{}", escaped_root.trim_end_matches('/'), pattern)
        };

        let paths = match glob::glob(&full_pattern) {
            Ok(paths) => paths,
            Err(source) => {
                diagnostics.source_error(&SourceError::Pattern {
                    pattern: pattern.clone(),
                    source,
                });
                continue;
            }
        };

        let before = files.len();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    let relative = path.strip_prefix(root).unwrap_or(&path);
                    files.push(path_key(relative));
                }
                Ok(_) => {}
                Err(e) => diagnostics.warn(Some(e.path()), format!("Could not scan: {}", e.error())),
            }
        }
        tracing::debug!(pattern = %pattern, matched = files.len() - before, "Resolved include pattern");
    }

    files
}

fn read_source(root: &Path, file: &str) -> std::result::Result<String, SourceError> {
    let path = root.join(file);
    std::fs::read_to_string(&path).map_err(|source| SourceError::Read { path, source })
}

/// Serialize `value` as pretty JSON and replace `path` with it.
///
/// The JSON goes to a sibling temp file first, so a failed write never leaves a
/// truncated artifact behind.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> std::result::Result<(), SourceError> {
    let write_error = |source: std::io::Error| SourceError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| write_error(e.into()))?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, json).map_err(write_error)?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        write_error(e)
    })
}

/// Current time in the `generatedAt` format, e.g. `2024-05-01T12:00:00.000Z`.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Generates the CSS documentation map.
#[derive(Debug, Clone)]
pub struct CssDocsStage {
    root: PathBuf,
    config: CssDocsConfig,
}

impl CssDocsStage {
    pub fn new(root: impl Into<PathBuf>, config: CssDocsConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn config(&self) -> &CssDocsConfig {
        &self.config
    }

    /// Absolute location of the generated file.
    pub fn output_path(&self) -> PathBuf {
        self.root.join(self.config.output_path())
    }

    /// Whether a change to `path` should trigger a rebuild.
    pub fn watches(&self, path: &Path) -> bool {
        has_extension(path, CSS_EXTENSIONS)
    }

    /// Parse every matching file. Files without doc comments are left out.
    pub fn build(&self, diagnostics: &mut Diagnostics) -> CssDocs {
        let mut docs = CssDocs::new();

        for file in discover(&self.root, &self.config.include, diagnostics) {
            match read_source(&self.root, &file) {
                Ok(content) => {
                    let comments = parse_css_docs(&content);
                    tracing::debug!(file = %file, comments = comments.len(), "Parsed CSS file");
                    if !comments.is_empty() {
                        docs.insert(file, comments);
                    }
                }
                Err(e) => diagnostics.warn(
                    e.path(),
                    format!("Could not parse CSS file {}: {}", file, e),
                ),
            }
        }

        docs
    }

    pub fn persist(&self, docs: &CssDocs) -> Result<()> {
        write_json(&self.output_path(), docs)?;
        tracing::info!("Generated CSS documentation for {} files", docs.len());
        Ok(())
    }

    /// Build and persist, returning the map for in-process consumers.
    pub fn generate(&self, diagnostics: &mut Diagnostics) -> Result<CssDocs> {
        let docs = self.build(diagnostics);
        self.persist(&docs)?;
        Ok(docs)
    }

    pub fn run_once(&self) -> BuildReport {
        let mut report = BuildReport::default();
        if let Err(e) = self.generate(&mut report.diagnostics) {
            report.fail("CSS docs", &e);
        }
        report
    }

    /// Rebuild when `path` is a stylesheet. Returns `None` for ignored paths.
    pub fn on_file_change(&self, path: &Path) -> Option<BuildReport> {
        self.watches(path).then(|| self.run_once())
    }
}

/// Generates the combined search index.
#[derive(Debug, Clone)]
pub struct SearchIndexStage {
    root: PathBuf,
    config: SearchIndexConfig,
}

impl SearchIndexStage {
    pub fn new(root: impl Into<PathBuf>, config: SearchIndexConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn config(&self) -> &SearchIndexConfig {
        &self.config
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(self.config.output_path())
    }

    pub fn watches(&self, path: &Path) -> bool {
        has_extension(path, MDX_EXTENSIONS) || has_extension(path, CSS_EXTENSIONS)
    }

    /// Entries from every matching MDX file, in discovery order.
    pub fn build_pages(&self, diagnostics: &mut Diagnostics) -> Vec<SearchEntry> {
        let mut entries = Vec::new();

        for file in discover(&self.root, &self.config.include, diagnostics) {
            match read_source(&self.root, &file) {
                Ok(content) => {
                    let parsed = parse_mdx(&content, &file, &self.config.mdx);
                    tracing::debug!(file = %file, entries = parsed.len(), "Parsed MDX file");
                    entries.extend(parsed);
                }
                Err(e) => {
                    diagnostics.warn(e.path(), format!("Could not parse file {}: {}", file, e));
                }
            }
        }

        entries
    }

    /// Build the index. With `css_docs` the CSS entries come from memory;
    /// otherwise the persisted CSS doc file is read.
    pub fn build(&self, css_docs: Option<&CssDocs>, diagnostics: &mut Diagnostics) -> SearchIndex {
        let mut entries = self.build_pages(diagnostics);

        let css_entries = match css_docs {
            Some(docs) => integrate(docs, &self.config.css_page_route),
            None => integrate_file(
                &self.root.join(&self.config.css_docs_path),
                &self.config.css_page_route,
                diagnostics,
            ),
        };
        entries.extend(css_entries);

        SearchIndex::new(entries, timestamp())
    }

    pub fn generate(
        &self,
        css_docs: Option<&CssDocs>,
        diagnostics: &mut Diagnostics,
    ) -> Result<SearchIndex> {
        let index = self.build(css_docs, diagnostics);
        write_json(&self.output_path(), &index)?;

        let types = &index.meta.types;
        tracing::info!(
            "Generated search index with {} entries ({} pages, {} headings, {} components, {} CSS classes)",
            index.meta.total_entries,
            types.pages,
            types.headings,
            types.components,
            types.css_classes
        );
        Ok(index)
    }

    /// Standalone run: CSS entries come from the persisted CSS doc file.
    pub fn run_once(&self) -> BuildReport {
        let mut report = BuildReport::default();
        if let Err(e) = self.generate(None, &mut report.diagnostics) {
            report.fail("search index", &e);
        }
        report
    }

    pub fn on_file_change(&self, path: &Path) -> Option<BuildReport> {
        self.watches(path).then(|| self.run_once())
    }
}

/// Both stages in one process.
#[derive(Debug, Clone)]
pub struct Pipeline {
    css_docs: CssDocsStage,
    search_index: SearchIndexStage,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>, config: PipelineConfig) -> Self {
        let root = root.into();
        Self {
            css_docs: CssDocsStage::new(root.clone(), config.css_docs),
            search_index: SearchIndexStage::new(root, config.search_index),
        }
    }

    pub fn css_docs(&self) -> &CssDocsStage {
        &self.css_docs
    }

    pub fn search_index(&self) -> &SearchIndexStage {
        &self.search_index
    }

    pub fn watches(&self, path: &Path) -> bool {
        self.css_docs.watches(path) || self.search_index.watches(path)
    }

    /// Build the CSS docs, persist them, and feed the same map to the search index.
    ///
    /// A failure to write the CSS doc file is reported but does not stop the
    /// search index, which still receives the freshly parsed map.
    pub fn run_once(&self) -> BuildReport {
        let mut report = BuildReport::default();

        let docs = self.css_docs.build(&mut report.diagnostics);
        if let Err(e) = self.css_docs.persist(&docs) {
            report.fail("CSS docs", &e);
        }

        if let Err(e) = self
            .search_index
            .generate(Some(&docs), &mut report.diagnostics)
        {
            report.fail("search index", &e);
        }

        report
    }

    pub fn on_file_change(&self, path: &Path) -> Option<BuildReport> {
        self.watches(path).then(|| self.run_once())
    }
}
