//! Serial in-order submission.
//!
//! The ledger rejects out-of-order sequence numbers from one account, so
//! submissions run strictly one at a time over the seqno-sorted prepared
//! list. Each outcome is classified as terminal or pending; pending
//! payments enter the waiting set for the confirmer.

use std::collections::HashMap;

use tracing::debug;

use lumenbatch_common::{
    AccountId, BatchError, BatchPaymentResult, Result, Seqno, TimeMs, TransactionId,
};
use lumenbatch_ledger::LedgerGateway;

use crate::prepare::{PreparedKind, PreparedPayment};

/// Results in input order plus the waiting set mapping pending transaction
/// IDs to result indexes.
#[derive(Debug)]
pub(crate) struct SubmitOutcome {
    pub results: Vec<BatchPaymentResult>,
    pub waiting: HashMap<TransactionId, usize>,
}

/// Submit the prepared payments one at a time, in the order given.
pub(crate) async fn submit_batch(
    gateway: &dyn LedgerGateway,
    sender_account: &AccountId,
    prepared: Vec<PreparedPayment>,
) -> Result<SubmitOutcome> {
    let count = prepared.len();
    let mut slots: Vec<Option<BatchPaymentResult>> = (0..count).map(|_| None).collect();
    let mut waiting = HashMap::new();

    for payment in prepared {
        let index = payment.index;
        let mut result = BatchPaymentResult::new(payment.username.clone());

        match payment.kind {
            PreparedKind::Failed(err) => result.mark_error(&err),
            kind => {
                if let Some(pending_tx) =
                    submit_one(gateway, sender_account, kind, &mut result).await
                {
                    waiting.insert(pending_tx, index);
                }
            }
        }

        if index >= count || slots[index].is_some() {
            return Err(BatchError::Internal("batch prepare failed".to_string()));
        }
        slots[index] = Some(result);
    }

    let mut results = Vec::with_capacity(count);
    for slot in slots {
        results.push(slot.ok_or_else(|| BatchError::Internal("batch prepare failed".to_string()))?);
    }

    Ok(SubmitOutcome { results, waiting })
}

/// Submit a single prepared payment. Returns the transaction ID when the
/// ledger acknowledged it as pending.
async fn submit_one(
    gateway: &dyn LedgerGateway,
    sender_account: &AccountId,
    kind: PreparedKind,
    result: &mut BatchPaymentResult,
) -> Option<TransactionId> {
    let (seqno, tx_id) = match &kind {
        PreparedKind::Direct { seqno, tx_id, .. } | PreparedKind::Relay { seqno, tx_id, .. } => {
            (*seqno, tx_id.clone())
        }
        PreparedKind::Failed(_) => unreachable!("failures are filled before submission"),
    };

    debug!(seqno = %seqno, tx_id = %tx_id, "submitting batch payment");
    result.tx_id = Some(tx_id.clone());

    register_pending(gateway, sender_account, &tx_id, seqno).await;

    let submit_res = match kind {
        PreparedKind::Direct { post, .. } => gateway.submit_payment(post).await,
        PreparedKind::Relay { post, .. } => gateway.submit_relay_payment(post).await,
        PreparedKind::Failed(_) => unreachable!("failures are filled before submission"),
    };

    result.submitted_time = Some(TimeMs::now());

    match submit_res {
        Err(e) => {
            debug!(seqno = %seqno, tx_id = %tx_id, error = %e, "error submitting batch payment");
            result.mark_error(&e);
            None
        }
        Ok(res) => {
            result.tx_id = Some(res.tx_id.clone());
            if res.pending {
                result.mark_pending(res.tx_id.clone());
                Some(res.tx_id)
            } else {
                result.mark_completed();
                None
            }
        }
    }
}

/// Best-effort registration of the transaction with the wallet state;
/// failures are logged and ignored.
async fn register_pending(
    gateway: &dyn LedgerGateway,
    sender_account: &AccountId,
    tx_id: &TransactionId,
    seqno: Seqno,
) {
    if let Err(e) = gateway.add_pending_tx(sender_account, tx_id, seqno).await {
        debug!(tx_id = %tx_id, error = %e, "error registering pending tx");
    }
}
