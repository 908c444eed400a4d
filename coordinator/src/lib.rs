//! Lumenbatch Coordinator
//!
//! Drives a batch of payments from one sender account to many recipients on
//! a sequenced ledger. Payments are prepared concurrently, submitted
//! serially in sequence-number order, and confirmed through a shared status
//! listener under a global deadline, with chat receipts sent for confirmed
//! payments.

pub mod batch;
pub mod chat;
pub mod config;
pub mod confirm;
pub mod metrics;
pub mod note;
pub mod prepare;
pub mod resolver;
pub mod stats;
pub mod submit;
pub mod wallet;

pub use batch::{BatchArg, BatchCollaborators, BatchCoordinator};
pub use config::BatchConfig;
pub use prepare::{prepare_batch, PreparedKind, PreparedPayment};
