//! Sequential enrichment of a search result set with coverage classifications.
//!
//! An [`EnrichmentTask`] walks the businesses strictly in order, one lookup at
//! a time, and publishes a full snapshot of the list after every state change.
//! The task is spawned on the runtime and can be cancelled at any point; its
//! update stream then ends after the last snapshot it managed to publish.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use covscan_core::{BusinessRecord, CoverageState};
use futures::Stream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::service::{is_valid_lookup, CoverageService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentPhase {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Counts reported when a run finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub total: usize,
    /// Items that received a definitive classification.
    pub classified: usize,
    /// Items left unannotated: unusable address, or no usable credential.
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub enum EnrichmentUpdate {
    /// Full list after the item at `index` changed.
    Snapshot {
        index: usize,
        businesses: Vec<BusinessRecord>,
    },
    Completed(EnrichmentSummary),
}

/// Handle to a running enrichment. Dropping it aborts the run.
#[derive(Debug)]
pub struct EnrichmentTask {
    updates: mpsc::UnboundedReceiver<EnrichmentUpdate>,
    phase: Arc<watch::Sender<EnrichmentPhase>>,
    handle: JoinHandle<()>,
}

impl EnrichmentTask {
    /// Start enriching `businesses` on the current tokio runtime, sleeping
    /// `pause` between consecutive lookups.
    #[must_use]
    pub fn spawn(
        service: Arc<CoverageService>,
        businesses: Vec<BusinessRecord>,
        pause: Duration,
    ) -> Self {
        let (tx, updates) = mpsc::unbounded_channel();
        let phase = Arc::new(watch::Sender::new(EnrichmentPhase::Idle));
        let handle = tokio::spawn(run(service, businesses, pause, tx, Arc::clone(&phase)));
        Self {
            updates,
            phase,
            handle,
        }
    }

    #[must_use]
    pub fn phase(&self) -> EnrichmentPhase {
        *self.phase.borrow()
    }

    /// Next update, or `None` once the run has finished or been cancelled and
    /// every published update has been consumed.
    pub async fn next_update(&mut self) -> Option<EnrichmentUpdate> {
        self.updates.recv().await
    }

    /// Abort the run. Updates already published remain readable.
    pub fn cancel(&mut self) {
        self.handle.abort();
        let cancelled = self.phase.send_if_modified(|phase| {
            if matches!(phase, EnrichmentPhase::Idle | EnrichmentPhase::Running) {
                *phase = EnrichmentPhase::Cancelled;
                true
            } else {
                false
            }
        });
        if cancelled {
            tracing::info!("enrichment cancelled");
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for EnrichmentTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl Stream for EnrichmentTask {
    type Item = EnrichmentUpdate;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().updates.poll_recv(cx)
    }
}

async fn run(
    service: Arc<CoverageService>,
    mut businesses: Vec<BusinessRecord>,
    pause: Duration,
    tx: mpsc::UnboundedSender<EnrichmentUpdate>,
    phase: Arc<watch::Sender<EnrichmentPhase>>,
) {
    let started = phase.send_if_modified(|p| {
        if *p == EnrichmentPhase::Idle {
            *p = EnrichmentPhase::Running;
            true
        } else {
            false
        }
    });
    if !started {
        return;
    }

    let mut summary = EnrichmentSummary {
        total: businesses.len(),
        ..EnrichmentSummary::default()
    };
    tracing::info!(total = summary.total, "enrichment started");

    let mut looked_up_any = false;
    let mut credential_warned = false;

    for index in 0..businesses.len() {
        let address = businesses[index].lookup_address();
        let city = businesses[index].city().to_owned();
        if !is_valid_lookup(&address, &city) {
            tracing::debug!(id = businesses[index].id, "no usable address, skipping");
            summary.skipped += 1;
            continue;
        }

        if looked_up_any && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        looked_up_any = true;

        businesses[index].set_coverage(CoverageState::Checking, None);
        if !publish(&tx, index, &businesses) {
            return;
        }

        match service.classify(&city, &address).await {
            Ok(status) => {
                businesses[index].set_coverage(CoverageState::Classified(status), None);
            }
            Err(err) if err.is_credential() => {
                if !credential_warned {
                    tracing::warn!(error = %err, "coverage lookups skipped");
                    credential_warned = true;
                }
                businesses[index].clear_coverage();
            }
            Err(err) => {
                tracing::warn!(id = businesses[index].id, error = %err, "coverage lookup failed");
                businesses[index].set_coverage(CoverageState::Error, Some(err.to_string()));
            }
        }
        match businesses[index].coverage {
            Some(state) if state.is_definitive() => summary.classified += 1,
            Some(_) => summary.failed += 1,
            None => summary.skipped += 1,
        }

        if !publish(&tx, index, &businesses) {
            return;
        }
    }

    phase.send_if_modified(|p| {
        if *p == EnrichmentPhase::Running {
            *p = EnrichmentPhase::Completed;
            true
        } else {
            false
        }
    });
    tracing::info!(
        total = summary.total,
        classified = summary.classified,
        skipped = summary.skipped,
        failed = summary.failed,
        "enrichment completed"
    );
    // Receiver may already be gone.
    let _ = tx.send(EnrichmentUpdate::Completed(summary));
}

/// Send a snapshot. `false` when nobody is listening any more.
fn publish(
    tx: &mpsc::UnboundedSender<EnrichmentUpdate>,
    index: usize,
    businesses: &[BusinessRecord],
) -> bool {
    tx.send(EnrichmentUpdate::Snapshot {
        index,
        businesses: businesses.to_vec(),
    })
    .is_ok()
}
