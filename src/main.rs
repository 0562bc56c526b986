use clap::Parser;
use docsite_index::cli::{Cli, Commands};
use docsite_index::watch::watch;
use docsite_index::{BuildReport, CssDocsStage, Pipeline, PipelineConfig, SearchIndexStage};
use tokio::time::Duration;

fn summarize(report: &BuildReport) {
    let warnings = report.diagnostics.warnings().len();
    if warnings > 0 {
        tracing::info!("Finished with {} warning(s)", warnings);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docsite_index::tracing::init(cli.verbose);

    let mut config = PipelineConfig::load(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Commands::Build => {
            let pipeline = Pipeline::new(cli.root, config);
            let report = tokio::task::spawn_blocking(move || pipeline.run_once()).await?;
            summarize(&report);
        }
        Commands::CssDocs { output_dir } => {
            if let Some(dir) = output_dir {
                config.css_docs.output_dir = dir;
            }
            let stage = CssDocsStage::new(cli.root, config.css_docs);
            let report = tokio::task::spawn_blocking(move || stage.run_once()).await?;
            summarize(&report);
        }
        Commands::SearchIndex {
            output_dir,
            css_docs,
        } => {
            if let Some(dir) = output_dir {
                config.search_index.output_dir = dir;
            }
            if let Some(path) = css_docs {
                config.search_index.css_docs_path = path;
            }
            let stage = SearchIndexStage::new(cli.root, config.search_index);
            let report = tokio::task::spawn_blocking(move || stage.run_once()).await?;
            summarize(&report);
        }
        Commands::Watch { debounce_ms } => {
            let pipeline = Pipeline::new(cli.root.clone(), config);
            watch(pipeline, cli.root, Duration::from_millis(debounce_ms)).await?;
        }
    }

    Ok(())
}
