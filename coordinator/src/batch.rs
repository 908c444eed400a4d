//! Batch orchestration entry point.
//!
//! Pipeline: concurrent prepare, seqno-ordered serial submit, then a wait
//! loop over the status feed bounded by the global deadline. The status
//! subscription is held by a guard so it is released on every exit path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, info_span, Instrument};

use lumenbatch_common::{
    BatchError, BatchId, BatchResult, ListenerId, PaymentRequest, Result, TimeMs,
};
use lumenbatch_ledger::{LedgerGateway, StatusFeed};

use crate::chat::ChatSender;
use crate::config::BatchConfig;
use crate::confirm::wait_for_payments;
use crate::metrics::{BatchMetrics, SharedMetrics};
use crate::note::NoteEncryptor;
use crate::prepare::prepare_batch;
use crate::resolver::RecipientResolver;
use crate::stats::calculate_stats;
use crate::submit::submit_batch;
use crate::wallet::SenderKeyProvider;

/// Arguments for one batch run.
#[derive(Debug, Clone)]
pub struct BatchArg {
    /// Opaque identifier carried on every log line for tracing.
    pub batch_id: BatchId,
    /// Wall-clock budget for the confirmation wait, measured from batch
    /// start. Zero falls back to the configured default.
    pub timeout_secs: u64,
    /// The payments to send, one result slot each.
    pub payments: Vec<PaymentRequest>,
}

impl BatchArg {
    /// Create batch arguments.
    pub fn new(batch_id: BatchId, timeout_secs: u64, payments: Vec<PaymentRequest>) -> Self {
        Self {
            batch_id,
            timeout_secs,
            payments,
        }
    }
}

/// External collaborators consumed by the coordinator.
#[derive(Clone)]
pub struct BatchCollaborators {
    /// The ledger gateway for queries and submissions.
    pub gateway: Arc<dyn LedgerGateway>,
    /// Recipient directory.
    pub resolver: Arc<dyn RecipientResolver>,
    /// Payment note sealing.
    pub note_encryptor: Arc<dyn NoteEncryptor>,
    /// Chat receipts for confirmed payments.
    pub chat: Arc<dyn ChatSender>,
    /// Sender credential lookup.
    pub wallet: Arc<dyn SenderKeyProvider>,
    /// Hub delivering on-ledger status updates.
    pub feed: Arc<StatusFeed>,
}

/// Drives batches of payments end to end.
pub struct BatchCoordinator {
    collab: BatchCollaborators,
    config: BatchConfig,
    metrics: SharedMetrics,
}

impl BatchCoordinator {
    /// Create a coordinator over the given collaborators.
    pub fn new(collab: BatchCollaborators, config: BatchConfig) -> Self {
        Self {
            collab,
            config,
            metrics: Arc::new(BatchMetrics::new()),
        }
    }

    /// Shared metrics handle.
    pub fn metrics(&self) -> SharedMetrics {
        self.metrics.clone()
    }

    /// Run a batch to completion and return the aggregate result.
    ///
    /// The only fatal failure is sender lookup; every per-payment failure
    /// is reported inside the result.
    pub async fn run(&self, arg: BatchArg) -> Result<BatchResult> {
        let span = info_span!("batch", BATCH = %arg.batch_id);
        self.run_inner(arg).instrument(span).await
    }

    async fn run_inner(&self, arg: BatchArg) -> Result<BatchResult> {
        self.validate_arg(&arg)?;

        let started_at = Instant::now();
        let mut res = BatchResult {
            start_time: TimeMs::now(),
            ..Default::default()
        };

        let sender = match self.collab.wallet.lookup_sender().await {
            Ok(sender) => sender,
            Err(e) => {
                self.metrics.record_fatal();
                return Err(e);
            }
        };
        debug!(sender = %sender.account_id, size = arg.payments.len(), "starting batch");

        let prepared = prepare_batch(
            self.collab.gateway.clone(),
            self.collab.resolver.clone(),
            self.collab.note_encryptor.clone(),
            &sender,
            &arg.payments,
        )
        .await;
        res.prepared_time = TimeMs::now();

        // Subscribe before the first submission so an update racing the
        // submit loop cannot be missed.
        let (listener_id, mut rx) = self.collab.feed.subscribe();
        let _guard = FeedGuard {
            feed: self.collab.feed.clone(),
            id: listener_id,
        };

        let outcome = submit_batch(
            self.collab.gateway.as_ref(),
            &sender.account_id,
            prepared,
        )
        .await?;
        let mut results = outcome.results;
        let mut waiting = outcome.waiting;
        res.all_submitted_time = TimeMs::now();

        let timeout_secs = if arg.timeout_secs > 0 {
            arg.timeout_secs
        } else {
            self.config.default_timeout_secs
        };
        wait_for_payments(
            self.collab.chat.clone(),
            &mut rx,
            &mut results,
            &mut waiting,
            started_at,
            Duration::from_secs(timeout_secs),
            self.config.tick,
        )
        .await;

        res.payments = results;
        res.end_time = TimeMs::now();
        calculate_stats(&mut res);
        self.metrics.record_batch(&res);

        info!(
            success = res.count_success,
            pending = res.count_pending,
            errors = res.count_error,
            duration_ms = res.overall_duration_ms,
            "batch complete"
        );

        Ok(res)
    }

    fn validate_arg(&self, arg: &BatchArg) -> Result<()> {
        if arg.payments.is_empty() {
            return Err(BatchError::Config("batch contains no payments".to_string()));
        }

        if arg.payments.len() > self.config.max_payments {
            return Err(BatchError::Config(format!(
                "batch of {} exceeds the maximum of {}",
                arg.payments.len(),
                self.config.max_payments
            )));
        }

        Ok(())
    }
}

/// Releases the status subscription when the batch run ends, on success and
/// on every early return.
struct FeedGuard {
    feed: Arc<StatusFeed>,
    id: ListenerId,
}

impl Drop for FeedGuard {
    fn drop(&mut self) {
        self.feed.unsubscribe(&self.id);
    }
}
