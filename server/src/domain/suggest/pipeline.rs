//! Builder pipeline
//!
//! fetch corpus -> build trie -> flatten -> persist, in one sequential pass.
//! The trie lives only for the duration of a run. At most one run is in
//! flight per pipeline, whether triggered over HTTP or by the schedule.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use utoipa::ToSchema;

use super::corpus::CorpusSource;
use super::error::BuildError;
use super::flatten::TrieFlattener;
use super::persist::BatchPersister;
use super::trie::TrieBuilder;
use crate::data::PrefixStore;

/// Outcome of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Corpus records inserted
    pub records: usize,
    /// Prefix documents written
    pub documents: usize,
    pub elapsed: Duration,
}

/// Wire form of [`BuildReport`]
#[derive(Debug, Serialize, ToSchema)]
pub struct BuildReportBody {
    pub records: usize,
    pub documents: usize,
    pub elapsed_ms: u64,
}

impl From<&BuildReport> for BuildReportBody {
    fn from(report: &BuildReport) -> Self {
        Self {
            records: report.records,
            documents: report.documents,
            elapsed_ms: u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

pub struct BuildPipeline {
    source: Arc<dyn CorpusSource>,
    persister: BatchPersister,
    /// Held for the duration of a run so concurrent triggers queue up
    running: Mutex<()>,
}

impl BuildPipeline {
    pub fn new(source: Arc<dyn CorpusSource>, store: Arc<dyn PrefixStore>) -> Self {
        Self {
            source,
            persister: BatchPersister::new(store),
            running: Mutex::new(()),
        }
    }

    /// Run one full build
    ///
    /// A fetch failure leaves the store untouched. A persistence failure may
    /// leave some documents already overwritten.
    pub async fn run(&self) -> Result<BuildReport, BuildError> {
        let _guard = self.running.lock().await;
        let started = Instant::now();
        tracing::info!(source = %self.source.describe(), "Build started");

        let records = self.source.fetch().await.inspect_err(|e| {
            tracing::error!(error = %e, "Corpus fetch failed");
        })?;
        tracing::debug!(
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Corpus fetched"
        );

        let stage = Instant::now();
        let mut builder = TrieBuilder::new();
        builder.extend(&records);
        tracing::debug!(
            records = builder.inserted(),
            nodes = builder.node_count(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Trie built"
        );

        let stage = Instant::now();
        let documents = TrieFlattener::flatten(builder.root());
        drop(builder);
        tracing::debug!(
            documents = documents.len(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Trie flattened"
        );

        let stage = Instant::now();
        let written = self.persister.persist(&documents).await?;
        tracing::debug!(
            documents = written,
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Documents persisted"
        );

        let report = BuildReport {
            records: records.len(),
            documents: written,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            records = report.records,
            documents = report.documents,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Build finished"
        );
        Ok(report)
    }

    /// Rebuild every `period` until shutdown
    ///
    /// The first run starts one period after the task. A failed run is logged
    /// and the schedule carries on; nothing is retried early.
    pub fn start_schedule_task(
        self: &Arc<Self>,
        period: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(period_secs = period.as_secs(), "Scheduled build task started");
            loop {
                tokio::select! {
                    biased;
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            tracing::debug!("Scheduled build task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = pipeline.run().await {
                            tracing::warn!(error = %e, "Scheduled build failed");
                        }
                    }
                }
            }
        })
    }
}
