//! Shared test fixtures and utilities for integration tests.
//!
//! [`TempWorkspace`] is a throwaway project root. The `docs_site` fixture fills one
//! with a small design-system site: two stylesheets with doc comments, one
//! without, and two MDX pages.

use docsite_index::{PipelineConfig, SearchIndex};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BUTTON_CSS: &str = r#"/**
 * Primary button style
 * @since 1.2
 */
.btn-primary {
  color: white;
}

/**
 * Outline variant
 * @param size Size modifier
 * @deprecated
 */
.btn-outline {
  border: 1px solid;
}
"#;

pub const LAYOUT_SCSS: &str = r#"/** Responsive grid container */
.grid {
  display: grid;
}
/**
 *
 */
"#;

pub const PLAIN_CSS: &str = "/* not a doc comment */\nbody { margin: 0; }\n";

pub const GUIDE_MDX: &str = "# Getting Started\n## Installation\nUse <Button /> here.\n";

pub const DESIGN_MDX: &str = r#"# Design System
Tokens and components.

## Button Components
<CssDoc selector=".btn-primary" />

## Live Code Examples
<LiveExample />
"#;

/// A temporary project root, removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content, creating parent directories.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Creates a file whose bytes are not valid UTF-8.
    pub fn create_binary_file(&self, path: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, [0xff, 0xfe, 0x00, 0xc3])
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    pub fn exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }

    /// Reads a generated file as JSON.
    ///
    /// # Panics
    /// Panics if the file is missing or not JSON.
    pub fn read_json(&self, path: &str) -> serde_json::Value {
        let raw = self.read_string(path);
        serde_json::from_str(&raw).unwrap_or_else(|e| panic!("Invalid JSON in '{}': {}", path, e))
    }

    pub fn read_string(&self, path: &str) -> String {
        std::fs::read_to_string(self.root.join(path))
            .unwrap_or_else(|e| panic!("Failed to read '{}': {}", path, e))
    }

    pub fn read_index(&self, path: &str) -> SearchIndex {
        serde_json::from_str(&self.read_string(path))
            .unwrap_or_else(|e| panic!("Invalid search index in '{}': {}", path, e))
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Config used by the fixtures: CSS docs land next to the search index so the
/// standalone search stage finds them.
#[allow(dead_code)]
pub fn site_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.css_docs.output_dir = PathBuf::from("public");
    config
}

/// A small docs site: `src/styles/{button.css,layout.scss,reset.css}` and
/// `src/{guide,design-system-documentation}.mdx`.
#[fixture]
pub fn docs_site() -> TempWorkspace {
    let workspace = TempWorkspace::new();
    workspace.create_file("src/styles/button.css", BUTTON_CSS);
    workspace.create_file("src/styles/layout.scss", LAYOUT_SCSS);
    workspace.create_file("src/styles/reset.css", PLAIN_CSS);
    workspace.create_file("src/guide.mdx", GUIDE_MDX);
    workspace.create_file("src/design-system-documentation.mdx", DESIGN_MDX);
    workspace
}
