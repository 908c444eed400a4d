//! Confirmation tracking.
//!
//! Drains the status-update stream until every pending payment settles or
//! the global deadline passes. Confirmed payments trigger detached chat
//! receipts, joined through a barrier before the stage returns so the side
//! effects never outlive the batch call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use lumenbatch_common::{BatchPaymentResult, PaymentStatus, TransactionId};
use lumenbatch_ledger::TxStatusUpdate;

use crate::chat::ChatSender;

/// Wait for pending payments to settle. Returns true if the deadline fired
/// with entries still pending.
pub(crate) async fn wait_for_payments(
    chat: Arc<dyn ChatSender>,
    rx: &mut mpsc::UnboundedReceiver<TxStatusUpdate>,
    results: &mut [BatchPaymentResult],
    waiting: &mut HashMap<TransactionId, usize>,
    batch_started: Instant,
    timeout: Duration,
    tick: Duration,
) -> bool {
    debug!(count = waiting.len(), "waiting for payments to complete");

    let mut chat_tasks: JoinSet<()> = JoinSet::new();
    let mut timed_out = false;

    while !waiting.is_empty() && !timed_out {
        tokio::select! {
            _ = tokio::time::sleep(tick) => {
                if batch_started.elapsed() > timeout {
                    debug!(
                        remaining = waiting.len(),
                        "ran out of time waiting for tx status updates"
                    );
                    timed_out = true;
                }
            }
            update = rx.recv() => {
                match update {
                    None => {
                        warn!(remaining = waiting.len(), "status feed closed, abandoning wait");
                        break;
                    }
                    Some(update) => {
                        apply_update(&chat, &mut chat_tasks, results, waiting, update);
                    }
                }
            }
        }
    }

    debug!("done waiting for payments to complete");

    debug!("waiting for chat receipts to finish sending");
    while chat_tasks.join_next().await.is_some() {}
    debug!("done waiting for chat receipts");

    timed_out
}

fn apply_update(
    chat: &Arc<dyn ChatSender>,
    chat_tasks: &mut JoinSet<()>,
    results: &mut [BatchPaymentResult],
    waiting: &mut HashMap<TransactionId, usize>,
    update: TxStatusUpdate,
) {
    let Some(&index) = waiting.get(&update.tx_id) else {
        // not one of ours
        return;
    };

    debug!(tx_id = %update.tx_id, status = ?update.status, "received status update");

    let result = &mut results[index];
    if result.apply_update(update.status) {
        waiting.remove(&update.tx_id);
        debug!(
            tx_id = %update.tx_id,
            remaining = waiting.len(),
            "no longer waiting for status updates"
        );
    }

    if update.status == PaymentStatus::Completed {
        let chat = chat.clone();
        let recipient = result.username.clone();
        let tx_id = update.tx_id.clone();
        chat_tasks.spawn(async move {
            match chat.send_payment_message(&recipient, &tx_id).await {
                Ok(()) => {
                    debug!(recipient = %recipient, tx_id = %tx_id, "payment receipt sent")
                }
                Err(e) => {
                    debug!(recipient = %recipient, tx_id = %tx_id, error = %e, "payment receipt failed")
                }
            }
        });
    }
}
