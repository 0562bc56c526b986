//! End-to-end builds over a temporary docs site.

mod common;

use assert2::{assert, check, let_assert};
use common::{TempWorkspace, docs_site, site_config};
use docsite_index::{
    CssDocsStage, EntryKind, Pipeline, PipelineConfig, SearchIndex, SearchIndexStage,
};
use rstest::rstest;
use serde_json::json;
use std::path::Path;

const CSS_DOCS: &str = "public/css-docs.json";
const SEARCH_INDEX: &str = "public/search-index.json";

fn titles(index: &SearchIndex, kind: EntryKind) -> Vec<&str> {
    index
        .entries
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.title.as_str())
        .collect()
}

fn check_meta(index: &SearchIndex) {
    let count = |kind| index.entries.iter().filter(|e| e.kind == kind).count();
    check!(index.meta.total_entries == index.entries.len());
    check!(index.meta.types.pages == count(EntryKind::Page));
    check!(index.meta.types.headings == count(EntryKind::Heading));
    check!(index.meta.types.components == count(EntryKind::Component));
    check!(index.meta.types.css_classes == count(EntryKind::CssClass));
}

#[rstest]
fn css_docs_stage_writes_documented_files_only(docs_site: TempWorkspace) {
    let stage = CssDocsStage::new(docs_site.path(), site_config().css_docs);
    let report = stage.run_once();
    check!(report.succeeded());
    check!(report.diagnostics.is_empty());

    let docs = docs_site.read_json(CSS_DOCS);
    let_assert!(Some(files) = docs.as_object());
    let keys: Vec<_> = files.keys().map(String::as_str).collect();
    check!(keys == vec!["src/styles/button.css", "src/styles/layout.scss"]);

    check!(
        docs["src/styles/button.css"][0]
            == json!({
                "description": "Primary button style",
                "selector": ".btn-primary",
                "since": "1.2",
                "deprecated": false
            })
    );
    check!(
        docs["src/styles/button.css"][1]
            == json!({
                "description": "Outline variant",
                "selector": ".btn-outline",
                "params": [{"name": "size", "description": "Size modifier"}],
                "deprecated": true
            })
    );
    let_assert!(Some(layout) = docs["src/styles/layout.scss"].as_array());
    check!(layout.len() == 1);
}

#[rstest]
fn css_docs_output_is_pretty_printed(docs_site: TempWorkspace) {
    CssDocsStage::new(docs_site.path(), site_config().css_docs).run_once();
    let raw = docs_site.read_string(CSS_DOCS);
    check!(raw.starts_with("{\n  \"src/styles/button.css\": [\n    {\n      \"description\""));
}

#[rstest]
fn pipeline_merges_mdx_and_css_entries(docs_site: TempWorkspace) {
    let report = Pipeline::new(docs_site.path(), site_config()).run_once();
    check!(report.succeeded());
    check!(report.diagnostics.is_empty());

    let index = docs_site.read_index(SEARCH_INDEX);
    check_meta(&index);
    check!(index.meta.types.pages == 2);
    check!(index.meta.types.headings == 5);
    check!(index.meta.types.components == 3);
    check!(index.meta.types.css_classes == 3);

    check!(titles(&index, EntryKind::Page) == vec!["Design System", "Getting Started"]);
    check!(titles(&index, EntryKind::Component) == vec!["CssDoc", "LiveExample", "Button"]);
    check!(titles(&index, EntryKind::CssClass) == vec![".btn-primary", ".btn-outline", ".grid"]);

    // MDX entries first, CSS entries appended.
    let first_css = index
        .entries
        .iter()
        .position(|e| e.kind == EntryKind::CssClass);
    let_assert!(Some(first_css) = first_css);
    check!(index.entries[first_css..].iter().all(|e| e.kind == EntryKind::CssClass));

    let_assert!(Some(grid) = index.entries.iter().find(|e| e.title == ".grid"));
    check!(grid.url == "design-system-documentation#grid");
    check!(grid.keywords.contains(&"layout".to_string()));
}

#[rstest]
fn pipeline_hands_css_over_in_memory(docs_site: TempWorkspace) {
    // CSS docs go to the default src/generated, the search stage would look in public/.
    let config = PipelineConfig::default();
    let report = Pipeline::new(docs_site.path(), config).run_once();

    check!(report.diagnostics.is_empty());
    check!(docs_site.exists("src/generated/css-docs.json"));
    check!(!docs_site.exists(CSS_DOCS));
    let index = docs_site.read_index(SEARCH_INDEX);
    check!(index.meta.types.css_classes == 3);
}

#[rstest]
fn search_stage_reads_persisted_css_docs(docs_site: TempWorkspace) {
    let config = site_config();
    CssDocsStage::new(docs_site.path(), config.css_docs).run_once();
    let report = SearchIndexStage::new(docs_site.path(), config.search_index).run_once();

    check!(report.diagnostics.is_empty());
    let index = docs_site.read_index(SEARCH_INDEX);
    check!(index.meta.types.css_classes == 3);
    check_meta(&index);
}

#[rstest]
fn missing_css_docs_still_writes_index(docs_site: TempWorkspace) {
    let report = SearchIndexStage::new(docs_site.path(), site_config().search_index).run_once();

    check!(report.succeeded());
    let_assert!([warning] = report.diagnostics.warnings());
    check!(warning.path.as_deref() == Some(docs_site.path().join(CSS_DOCS).as_path()));

    let index = docs_site.read_index(SEARCH_INDEX);
    check!(index.meta.types.css_classes == 0);
    check!(index.meta.types.pages == 2);
}

#[rstest]
fn unmatched_pattern_is_silent(docs_site: TempWorkspace) {
    let mut config = site_config();
    config.css_docs.include.push("src/**/*.less".to_string());
    config.search_index.include.push("content/**/*.mdx".to_string());

    let report = Pipeline::new(docs_site.path(), config).run_once();
    check!(report.succeeded());
    check!(report.diagnostics.is_empty());
}

#[test]
fn empty_project_produces_empty_outputs() {
    let workspace = TempWorkspace::new();
    let report = Pipeline::new(workspace.path(), site_config()).run_once();

    check!(report.succeeded());
    check!(workspace.read_json(CSS_DOCS) == json!({}));
    let index = workspace.read_index(SEARCH_INDEX);
    check!(index.entries.is_empty());
    check!(index.meta.total_entries == 0);
}

#[rstest]
fn invalid_pattern_is_reported(docs_site: TempWorkspace) {
    let mut config = site_config();
    config.search_index.include.insert(0, "src/[.mdx".to_string());

    let report = Pipeline::new(docs_site.path(), config).run_once();
    check!(report.succeeded());
    check!(report.diagnostics.warnings().len() == 1);
    check!(docs_site.read_index(SEARCH_INDEX).meta.types.pages == 2);
}

#[rstest]
fn overlapping_patterns_duplicate_mdx_entries(docs_site: TempWorkspace) {
    let mut config = site_config();
    config.search_index.include.push("src/guide.mdx".to_string());
    config.css_docs.include.push("src/styles/**/*.css".to_string());

    Pipeline::new(docs_site.path(), config).run_once();

    let index = docs_site.read_index(SEARCH_INDEX);
    check!(index.meta.types.pages == 3);
    check_meta(&index);

    // Keyed by path, so the CSS map keeps one entry per file.
    let docs = docs_site.read_json(CSS_DOCS);
    check!(docs.as_object().map(|o| o.len()) == Some(2));
    check!(index.meta.types.css_classes == 3);
}

#[rstest]
fn unreadable_file_is_skipped(docs_site: TempWorkspace) {
    docs_site.create_binary_file("src/broken.mdx");
    docs_site.create_binary_file("src/styles/broken.css");

    let report = Pipeline::new(docs_site.path(), site_config()).run_once();
    check!(report.succeeded());

    let warned: Vec<_> = report
        .diagnostics
        .warnings()
        .iter()
        .filter_map(|w| w.path.as_deref())
        .collect();
    check!(warned.len() == 2);
    check!(warned.iter().any(|p| p.ends_with("src/broken.mdx")));
    check!(warned.iter().any(|p| p.ends_with("src/styles/broken.css")));

    let index = docs_site.read_index(SEARCH_INDEX);
    check!(index.meta.types.pages == 2);
}

#[rstest]
fn unwritable_output_keeps_previous_file(docs_site: TempWorkspace) {
    let config = site_config();
    let stage = SearchIndexStage::new(docs_site.path(), config.search_index.clone());
    assert!(stage.run_once().succeeded());
    let before = docs_site.read_string(SEARCH_INDEX);

    // Output directory that cannot be created.
    docs_site.create_file("blocked", "not a directory");
    let mut blocked = config.search_index;
    blocked.output_dir = "blocked/out".into();
    let report = SearchIndexStage::new(docs_site.path(), blocked).run_once();

    check!(!report.succeeded());
    check!(docs_site.read_string(SEARCH_INDEX) == before);
}

#[rstest]
#[case("src/styles/button.css", true, true)]
#[case("src/theme.sass", true, true)]
#[case("src/theme.less", true, true)]
#[case("src/guide.mdx", false, true)]
#[case("src/main.ts", false, false)]
#[case("public/search-index.json", false, false)]
fn file_change_triggers(
    docs_site: TempWorkspace,
    #[case] changed: &str,
    #[case] css_rebuilds: bool,
    #[case] search_rebuilds: bool,
) {
    let config = site_config();
    let css = CssDocsStage::new(docs_site.path(), config.css_docs.clone());
    let search = SearchIndexStage::new(docs_site.path(), config.search_index.clone());
    let pipeline = Pipeline::new(docs_site.path(), config);
    let path = Path::new(changed);

    check!(css.on_file_change(path).is_some() == css_rebuilds);
    check!(search.on_file_change(path).is_some() == search_rebuilds);
    check!(pipeline.on_file_change(path).is_some() == search_rebuilds);
}

#[rstest]
fn regeneration_picks_up_changes(docs_site: TempWorkspace) {
    let pipeline = Pipeline::new(docs_site.path(), site_config());
    pipeline.run_once();
    check!(docs_site.read_index(SEARCH_INDEX).meta.types.css_classes == 3);

    docs_site.create_file(
        "src/styles/cards.css",
        "/** Elevated card */\n.card { box-shadow: none; }\n",
    );
    let_assert!(Some(report) = pipeline.on_file_change(Path::new("src/styles/cards.css")));
    check!(report.succeeded());

    let index = docs_site.read_index(SEARCH_INDEX);
    check!(index.meta.types.css_classes == 4);
    check!(docs_site.read_json(CSS_DOCS)["src/styles/cards.css"][0]["selector"] == ".card");
}

#[rstest]
fn persisted_index_roundtrips(docs_site: TempWorkspace) {
    Pipeline::new(docs_site.path(), site_config()).run_once();
    let index = docs_site.read_index(SEARCH_INDEX);

    let json = serde_json::to_string_pretty(&index).unwrap();
    let reparsed: SearchIndex = serde_json::from_str(&json).unwrap();
    check!(reparsed == index);
    check!(json == docs_site.read_string(SEARCH_INDEX));
}

#[rstest]
fn config_file_drives_pipeline(docs_site: TempWorkspace) {
    docs_site.create_file(
        "docsite.toml",
        r#"
[css_docs]
output_dir = "dist"

[search_index]
output_dir = "dist"
css_page_route = "styles"
"#,
    );
    let_assert!(Ok(config) = PipelineConfig::load(docs_site.path(), None));
    Pipeline::new(docs_site.path(), config).run_once();

    check!(docs_site.exists("dist/css-docs.json"));
    let index = docs_site.read_index("dist/search-index.json");
    let_assert!(Some(primary) = index.entries.iter().find(|e| e.title == ".btn-primary"));
    check!(primary.url == "styles#btn-primary");
}
