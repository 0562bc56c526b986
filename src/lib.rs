pub mod cli;
pub mod config;
pub mod css;
pub mod diagnostics;
pub mod error;
pub mod integrate;
pub mod keywords;
pub mod mdx;
pub mod pipeline;
pub mod tracing;
pub mod types;
pub mod watch;

pub use config::{CssDocsConfig, PipelineConfig, SearchIndexConfig};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use pipeline::{BuildReport, CssDocsStage, Pipeline, SearchIndexStage};
pub use types::{CssDocs, DocComment, DocParam, EntryKind, SearchEntry, SearchIndex};
