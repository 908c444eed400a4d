//! Lumenbatch Ledger Plumbing
//!
//! The contract against the ledger gateway (queries and submissions), the
//! shared sequence provider, the transaction builder that signs payment and
//! account-creation envelopes, relay escrow construction, and the hub that
//! fans ledger status updates out to listeners.

pub mod gateway;
pub mod listener;
pub mod relay;
pub mod seqno;
pub mod txbuild;
pub mod types;

pub use gateway::LedgerGateway;
pub use listener::StatusFeed;
pub use relay::{relay_key, Relay, RelayInput};
pub use seqno::SeqnoProvider;
pub use txbuild::{account_id_for, sign_create_account, sign_payment, SignResult};
pub use types::{DirectPost, RelayPost, SubmitResult, TxStatusUpdate};
