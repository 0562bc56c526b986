//! Stage configuration, loadable from a `docsite.toml` file.
//!
//! ```toml
//! [css_docs]
//! include = ["src/**/*.css", "src/**/*.scss", "src/styles/**/*.css"]
//! output_dir = "src/generated"
//!
//! [search_index]
//! css_docs_path = "src/generated/css-docs.json"
//!
//! [search_index.component_anchors]
//! CssDoc = "button-components"
//! ```
//!
//! Every key is optional.

use crate::error::Result;
use crate::mdx::MdxOptions;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE: &str = "docsite.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub css_docs: CssDocsConfig,
    pub search_index: SearchIndexConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssDocsConfig {
    /// Glob patterns, relative to the project root.
    pub include: Vec<String>,
    pub output_dir: PathBuf,
    pub output_file: String,
}

impl Default for CssDocsConfig {
    fn default() -> Self {
        Self {
            include: vec!["src/**/*.css".to_string(), "src/**/*.scss".to_string()],
            output_dir: PathBuf::from("src/generated"),
            output_file: "css-docs.json".to_string(),
        }
    }
}

impl CssDocsConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchIndexConfig {
    /// Glob patterns for MDX pages, relative to the project root.
    pub include: Vec<String>,
    pub output_dir: PathBuf,
    pub output_file: String,
    /// Persisted CSS docs read when the search index is built on its own.
    pub css_docs_path: PathBuf,
    /// Route of the page that renders the CSS documentation.
    pub css_page_route: String,
    #[serde(flatten)]
    pub mdx: MdxOptions,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            include: vec!["src/**/*.mdx".to_string()],
            output_dir: PathBuf::from("public"),
            output_file: "search-index.json".to_string(),
            css_docs_path: PathBuf::from("public/css-docs.json"),
            css_page_route: "design-system-documentation".to_string(),
            mdx: MdxOptions::default(),
        }
    }
}

impl SearchIndexConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

impl PipelineConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid pipeline configuration")
    }

    /// Load configuration for a project.
    ///
    /// An explicit path must exist. Without one, `docsite.toml` in `root` is used
    /// when present and the defaults otherwise.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = root.join(CONFIG_FILE);
                if !candidate.is_file() {
                    tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, root.display());
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
