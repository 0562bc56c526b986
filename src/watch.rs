//! Regeneration on file changes.
//!
//! A `notify` watcher feeds change events into a [`RebuildQueue`]: at most one
//! build runs at a time, and every request that arrives while a build is running
//! or while the debounce timer is pending collapses into a single follow-up build.

use crate::error::Result;
use crate::pipeline::Pipeline;
use anyhow::Context;
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Quiet period after a change before the rebuild starts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Single-slot rebuild queue.
#[derive(Debug)]
pub struct RebuildQueue {
    pending: Arc<AtomicBool>,
    wake: Arc<Notify>,
    worker: JoinHandle<()>,
}

impl RebuildQueue {
    /// Spawn the worker that runs `build` on the blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(debounce: Duration, build: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let pending = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());
        let build = Arc::new(build);

        let worker = {
            let pending = pending.clone();
            let wake = wake.clone();
            tokio::spawn(async move {
                loop {
                    wake.notified().await;
                    tokio::time::sleep(debounce).await;

                    // Requests made during the debounce window are folded into this run.
                    if !pending.swap(false, Ordering::AcqRel) {
                        continue;
                    }

                    let build = build.clone();
                    if let Err(e) = tokio::task::spawn_blocking(move || build()).await {
                        tracing::error!("Rebuild task failed: {}", e);
                    }
                }
            })
        };

        Self {
            pending,
            wake,
            worker,
        }
    }

    /// Ask for a rebuild. Never blocks.
    pub fn request(&self) {
        self.pending.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    /// Stop the worker. A build already on the blocking pool runs to completion.
    pub fn shutdown(self) {
        self.worker.abort();
    }
}

/// Run an initial build, then rebuild on every relevant change under `root`
/// until Ctrl-C.
pub async fn watch(pipeline: Pipeline, root: PathBuf, debounce: Duration) -> Result<()> {
    let initial = pipeline.clone();
    tokio::task::spawn_blocking(move || initial.run_once())
        .await
        .context("Initial build panicked")?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
        let _ = tx.send(result);
    })
    .context("Failed to create file watcher")?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", root.display()))?;

    let queue = {
        let pipeline = pipeline.clone();
        RebuildQueue::spawn(debounce, move || {
            let report = pipeline.run_once();
            if !report.diagnostics.is_empty() {
                tracing::debug!(
                    warnings = report.diagnostics.warnings().len(),
                    "Rebuild finished with warnings"
                );
            }
        })
    };

    tracing::info!("Watching {} for changes", root.display());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watcher");
                break;
            }
            maybe = rx.recv() => {
                let Some(result) = maybe else {
                    tracing::debug!("Watcher channel closed");
                    break;
                };
                match result {
                    Ok(event) => {
                        if !matches!(
                            event.kind,
                            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                        ) {
                            continue;
                        }
                        if let Some(path) = event.paths.iter().find(|p| pipeline.watches(p)) {
                            tracing::debug!(path = %path.display(), "Change detected, scheduling rebuild");
                            queue.request();
                        }
                    }
                    Err(e) => tracing::warn!("Watcher error: {}", e),
                }
            }
        }
    }

    queue.shutdown();
    Ok(())
}
