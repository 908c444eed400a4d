//! Concurrent payment preparation.
//!
//! Every payment in the batch is prepared in parallel: recipient
//! resolution, funding checks, minimum-amount enforcement, signing, and
//! note or relay-box encryption. Prepared results are then ordered by the
//! sequence number each signing consumed, because submission must happen in
//! strictly ascending seqno order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use lumenbatch_common::{
    Amount, BatchError, PaymentRequest, Seqno, TransactionId, Username,
};
use lumenbatch_crypto::Seed;
use lumenbatch_ledger::{
    relay, sign_create_account, sign_payment, DirectPost, LedgerGateway, RelayPost, SeqnoProvider,
};

use crate::note::{NoteContents, NoteEncryptor};
use crate::resolver::{RecipientResolver, ResolvedRecipient};
use crate::wallet::SenderAccount;

/// One prepared payment, carrying the position of its request in the input
/// list so results can be reported in input order after the seqno sort.
#[derive(Debug)]
pub struct PreparedPayment {
    /// Index of the originating request in the batch input.
    pub index: usize,
    /// Recipient username, resolved when resolution succeeded, otherwise
    /// normalized from the raw input.
    pub username: Username,
    /// What preparation produced.
    pub kind: PreparedKind,
}

/// Outcome of preparing a single payment.
#[derive(Debug)]
pub enum PreparedKind {
    /// A signed direct payment (PAY or CREATE_ACCOUNT).
    Direct {
        post: DirectPost,
        seqno: Seqno,
        tx_id: TransactionId,
    },
    /// A signed relay payment funding an ephemeral escrow.
    Relay {
        post: RelayPost,
        seqno: Seqno,
        tx_id: TransactionId,
    },
    /// Preparation failed. No sequence slot is attached.
    Failed(BatchError),
}

impl PreparedPayment {
    /// The seqno consumed by this payment, absent for failures.
    pub fn seqno(&self) -> Option<Seqno> {
        match &self.kind {
            PreparedKind::Direct { seqno, .. } | PreparedKind::Relay { seqno, .. } => Some(*seqno),
            PreparedKind::Failed(_) => None,
        }
    }

    /// The transaction hash, absent for failures.
    pub fn tx_id(&self) -> Option<&TransactionId> {
        match &self.kind {
            PreparedKind::Direct { tx_id, .. } | PreparedKind::Relay { tx_id, .. } => Some(tx_id),
            PreparedKind::Failed(_) => None,
        }
    }

    fn failed(index: usize, username: Username, err: BatchError) -> Self {
        Self {
            index,
            username,
            kind: PreparedKind::Failed(err),
        }
    }
}

/// Prepare a batch of payments concurrently and return them in submission
/// order: ascending seqno, failures (which hold no seqno) last.
///
/// Individual failures never abort the batch; they flow through as
/// [`PreparedKind::Failed`] entries.
pub async fn prepare_batch(
    gateway: Arc<dyn LedgerGateway>,
    resolver: Arc<dyn RecipientResolver>,
    note_encryptor: Arc<dyn NoteEncryptor>,
    sender: &SenderAccount,
    payments: &[PaymentRequest],
) -> Vec<PreparedPayment> {
    debug!(count = payments.len(), "preparing batch payments");

    if payments.is_empty() {
        return Vec::new();
    }

    let sp = Arc::new(SeqnoProvider::new(
        gateway.clone(),
        sender.account_id.clone(),
    ));

    let (tx, mut rx) = mpsc::channel(payments.len());
    for (index, payment) in payments.iter().enumerate() {
        let gateway = gateway.clone();
        let resolver = resolver.clone();
        let note_encryptor = note_encryptor.clone();
        let sp = sp.clone();
        let seed = sender.seed.clone();
        let payment = payment.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            let prepared = prepare_payment(
                index,
                gateway.as_ref(),
                resolver.as_ref(),
                note_encryptor.as_ref(),
                &sp,
                &seed,
                payment,
            )
            .await;
            let _ = tx.send(prepared).await;
        });
    }
    drop(tx);

    let mut prepared = Vec::with_capacity(payments.len());
    while let Some(p) = rx.recv().await {
        prepared.push(p);
    }

    sort_for_submission(&mut prepared);
    prepared
}

/// Order by seqno ascending, entries without a seqno strictly last.
fn sort_for_submission(prepared: &mut [PreparedPayment]) {
    prepared.sort_by_key(|p| (p.seqno().is_none(), p.seqno()));
}

async fn prepare_payment(
    index: usize,
    gateway: &dyn LedgerGateway,
    resolver: &dyn RecipientResolver,
    note_encryptor: &dyn NoteEncryptor,
    sp: &SeqnoProvider,
    seed: &Seed,
    payment: PaymentRequest,
) -> PreparedPayment {
    let recipient = match resolver.resolve(&payment.recipient).await {
        Ok(r) => r,
        Err(e) => {
            debug!(recipient = %payment.recipient, error = %e, "recipient lookup failed");
            return PreparedPayment::failed(
                index,
                Username::new(&payment.recipient),
                BatchError::RecipientLookup,
            );
        }
    };
    let username = recipient.username.clone();

    let amount = match Amount::parse(&payment.amount) {
        Ok(a) => a,
        Err(e) => return PreparedPayment::failed(index, username, e),
    };

    match recipient.account_id.clone() {
        Some(account) => {
            prepare_direct(
                index, gateway, note_encryptor, sp, seed, &payment, recipient, account, amount,
            )
            .await
        }
        None => prepare_relay(index, sp, seed, &payment, recipient, amount).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn prepare_direct(
    index: usize,
    gateway: &dyn LedgerGateway,
    note_encryptor: &dyn NoteEncryptor,
    sp: &SeqnoProvider,
    seed: &Seed,
    payment: &PaymentRequest,
    recipient: ResolvedRecipient,
    account: lumenbatch_common::AccountId,
    amount: Amount,
) -> PreparedPayment {
    let username = recipient.username;

    let funded = match gateway.is_account_funded(&account).await {
        Ok(f) => f,
        Err(e) => return PreparedPayment::failed(index, username, e),
    };

    if !funded && amount < Amount::min_create_account() {
        return PreparedPayment::failed(
            index,
            username,
            BatchError::BelowMinimum {
                min: Amount::min_create_account().to_string(),
                recipient: payment.recipient.clone(),
            },
        );
    }

    let sign_result = if funded {
        sign_payment(seed, &account, &amount, "", sp).await
    } else {
        sign_create_account(seed, &account, &amount, "", sp).await
    };
    let sign_result = match sign_result {
        Ok(s) => s,
        Err(e) => return PreparedPayment::failed(index, username, e),
    };

    let mut note_box = None;
    if let Some(message) = payment.message.as_deref().filter(|m| !m.is_empty()) {
        let contents = NoteContents {
            note: message.to_string(),
            tx_id: sign_result.tx_id.clone(),
        };
        match note_encryptor.encrypt(&contents, Some(&username)).await {
            Ok(blob) => note_box = Some(blob),
            Err(e) => {
                // the signed transaction already consumed a seqno; the slot
                // is wasted and the ledger will skip it
                let cause = match e {
                    BatchError::NoteEncryption(m) => m,
                    other => other.to_string(),
                };
                return PreparedPayment::failed(
                    index,
                    username,
                    BatchError::NoteEncryption(cause),
                );
            }
        }
    }

    PreparedPayment {
        index,
        username: username.clone(),
        kind: PreparedKind::Direct {
            post: DirectPost {
                to: Some(username),
                signed_transaction: sign_result.signed,
                note_box,
                quick_return: true,
            },
            seqno: sign_result.seqno,
            tx_id: sign_result.tx_id,
        },
    }
}

async fn prepare_relay(
    index: usize,
    sp: &SeqnoProvider,
    seed: &Seed,
    payment: &PaymentRequest,
    recipient: ResolvedRecipient,
    amount: Amount,
) -> PreparedPayment {
    let username = recipient.username;

    if amount < Amount::min_relay() {
        return PreparedPayment::failed(
            index,
            username,
            BatchError::BelowMinimum {
                min: Amount::min_relay().to_string(),
                recipient: payment.recipient.clone(),
            },
        );
    }

    let (key, team_id) = match relay::relay_key(&recipient.assertion) {
        Ok(k) => k,
        Err(e) => return PreparedPayment::failed(index, username, e),
    };

    let relay = match relay::create(relay::RelayInput {
        from: seed,
        amount: &amount,
        note: payment.message.as_deref(),
        encrypt_for: key,
        sp,
    })
    .await
    {
        Ok(r) => r,
        Err(e) => return PreparedPayment::failed(index, username, e),
    };

    PreparedPayment {
        index,
        username: username.clone(),
        kind: PreparedKind::Relay {
            post: RelayPost {
                to: Some(username),
                to_assertion: recipient.assertion,
                relay_account: relay.relay_account,
                team_id,
                box_blob: relay.box_blob,
                signed_transaction: relay.fund_tx.signed,
                quick_return: true,
            },
            seqno: relay.fund_tx.seqno,
            tx_id: relay.fund_tx.tx_id,
        },
    }
}
