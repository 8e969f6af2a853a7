//! Orchestrator for the catalog indexer pipeline.
//!
//! Drives one full synchronization cycle — checkpoint, producers, enrichers,
//! lockstep merge/transform/load rounds, checkpoint commit — and the outer
//! polling loop around it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{error, info, instrument};

use crate::bus::TopicBus;
use crate::descriptors::KindDescriptor;
use crate::enricher::RelationshipEnricher;
use crate::errors::PipelineError;
use crate::loader::SearchLoader;
use crate::merger::{BatchStream, Merger};
use crate::producer::ChangeProducer;
use crate::retry::{retry_transient, RetryPolicy};
use crate::transformer;
use catalog_indexer_repository::{CatalogStore, CheckpointStore, SearchEngineClient};
use catalog_indexer_shared::Watermark;

/// Outcome of one completed cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleReport {
    /// The watermark committed at the end of the cycle.
    pub watermark: Watermark,
    /// Documents upserted into the search index.
    pub documents_indexed: usize,
    /// Lockstep rounds executed.
    pub rounds: usize,
}

/// Orchestrator that coordinates the pipeline stages.
///
/// Stages never call each other: the orchestrator owns the cycle-scoped
/// topic bus and hands it to each stage in order. The stage list is declared
/// statically at construction, one descriptor per entity kind.
pub struct Orchestrator {
    store: Arc<dyn CatalogStore>,
    checkpoint: Arc<dyn CheckpointStore>,
    loader: SearchLoader,
    producers: Vec<ChangeProducer>,
    enrichers: Vec<RelationshipEnricher>,
    descriptors: Vec<KindDescriptor>,
    retry: RetryPolicy,
    shutdown_tx: broadcast::Sender<()>,
}

impl Orchestrator {
    /// Create an orchestrator over the given backends and stage list.
    ///
    /// Producers are built for every kind, enrichers for every kind that
    /// declares a join path back to the root. Descriptor validation errors
    /// surface here, at startup.
    pub fn new(
        store: Arc<dyn CatalogStore>,
        search: Arc<dyn SearchEngineClient>,
        checkpoint: Arc<dyn CheckpointStore>,
        descriptors: Vec<KindDescriptor>,
        retry: RetryPolicy,
    ) -> Result<Self, PipelineError> {
        if descriptors.is_empty() {
            return Err(PipelineError::config("no entity kinds declared"));
        }

        let producers = descriptors
            .iter()
            .map(|d| ChangeProducer::new(d.kind))
            .collect();
        let enrichers = descriptors
            .iter()
            .filter(|d| d.kind.join_path().is_some())
            .map(|d| RelationshipEnricher::new(d.kind))
            .collect::<Result<Vec<_>, _>>()?;

        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            store,
            checkpoint,
            loader: SearchLoader::new(search, retry.clone()),
            producers,
            enrichers,
            descriptors,
            retry,
            shutdown_tx,
        })
    }

    /// Run the synchronization loop until shutdown.
    ///
    /// Provisions the search indices once, then runs one cycle per poll
    /// interval. A failed cycle is logged and aborted; the watermark stays
    /// untouched and the next interval reprocesses the same window.
    /// Cancellation is honored only between cycles, never mid-cycle.
    #[instrument(skip(self))]
    pub async fn run(&self, poll_interval: Duration) -> Result<(), PipelineError> {
        info!("Starting catalog indexer orchestrator");

        self.loader.ensure_indices().await?;

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            match self.run_cycle().await {
                Ok(report) => info!(
                    watermark = %report.watermark,
                    documents = report.documents_indexed,
                    rounds = report.rounds,
                    "Cycle complete"
                ),
                Err(e) => error!(error = %e, "Cycle aborted, watermark left unchanged"),
            }

            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {}
                _ = shutdown_rx.recv() => {
                    info!("Shutdown requested, stopping between cycles");
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received interrupt, stopping between cycles");
                    break;
                }
            }
        }

        info!("Orchestrator shutdown complete");
        Ok(())
    }

    /// Run one full synchronization cycle.
    ///
    /// The watermark protocol is publish / stage / commit: the previous
    /// committed value is published for observers, the candidate is staged
    /// from the clock, and the candidate is committed only after every
    /// downstream write succeeded. Any failure in between leaves the
    /// previous watermark in place.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> Result<CycleReport, PipelineError> {
        let checkpoint = &self.checkpoint;

        let previous = retry_transient(&self.retry, "checkpoint load", || async move {
            checkpoint.load().await.map_err(Into::into)
        })
        .await?;

        retry_transient(&self.retry, "checkpoint publish", || async move {
            checkpoint.publish(previous).await.map_err(Into::into)
        })
        .await?;

        let candidate = checkpoint.stage_next();

        // The bus is rebuilt from scratch on every attempt, so a failed
        // produce/enrich pass cannot leak partial topic writes into the
        // attempt that eventually succeeds.
        let bus = retry_transient(&self.retry, "produce and enrich", || {
            self.produce_and_enrich(previous)
        })
        .await?;

        let (documents_indexed, rounds) = self.merge_transform_load(&bus).await?;

        retry_transient(&self.retry, "checkpoint commit", || async move {
            checkpoint.commit(candidate).await.map_err(Into::into)
        })
        .await?;

        Ok(CycleReport {
            watermark: candidate,
            documents_indexed,
            rounds,
        })
    }

    /// Run all producers, then all enrichers, over a fresh bus.
    async fn produce_and_enrich(&self, previous: Watermark) -> Result<TopicBus, PipelineError> {
        let mut bus = TopicBus::new(previous);

        for producer in &self.producers {
            producer.produce(self.store.as_ref(), &mut bus).await?;
        }
        for enricher in &self.enrichers {
            enricher.enrich(self.store.as_ref(), &mut bus).await?;
        }

        Ok(bus)
    }

    /// Lockstep batch rounds over every kind's merge stream.
    ///
    /// Each round pulls one batch from every stream (an exhausted stream
    /// contributes nothing, never stops the others) and immediately runs
    /// transform and load for each non-empty batch. Peak memory is bounded
    /// by the sum of the per-kind batch sizes, independent of how large the
    /// change set is, and a backlog in one kind cannot starve another.
    async fn merge_transform_load(&self, bus: &TopicBus) -> Result<(usize, usize), PipelineError> {
        let mut streams: Vec<Merger> = self
            .descriptors
            .iter()
            .map(|d| Merger::from_bus(d, self.store.clone(), self.retry.clone(), bus))
            .collect();

        let mut documents_indexed = 0;
        let mut rounds = 0;

        loop {
            let mut progressed = false;

            for stream in &mut streams {
                if let Some(batch) = stream.next_batch().await? {
                    progressed = true;
                    let documents = transformer::transform_batch(batch);
                    documents_indexed += documents.len();
                    self.loader.load(documents).await?;
                }
            }

            if !progressed {
                break;
            }
            rounds += 1;
        }

        Ok((documents_indexed, rounds))
    }

    /// Trigger a graceful shutdown at the next cycle boundary.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
