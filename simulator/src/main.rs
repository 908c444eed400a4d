//! Lumenbatch Simulator
//!
//! Drives a payment batch against an in-memory ledger so the full pipeline
//! can be observed without a network.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod directory;
mod ledger;
mod scenario;

use lumenbatch_common::BatchId;
use lumenbatch_coordinator::batch::{BatchArg, BatchCollaborators, BatchCoordinator};
use lumenbatch_coordinator::config::BatchConfig;
use lumenbatch_coordinator::note::SealedNoteEncryptor;
use lumenbatch_ledger::StatusFeed;

use directory::{RecordingChat, SimulatedDirectory, SimulatedWallet};
use ledger::SimulatedLedger;
use scenario::{RecipientKind, Scenario};

/// Lumenbatch simulator CLI
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "Run a payment batch against an in-memory ledger")]
struct Args {
    /// Scenario to run: directs, mixed, sub-minimum
    #[arg(short, long, default_value = "mixed")]
    scenario: String,

    /// Number of payments (directs scenario only)
    #[arg(short, long, default_value = "4")]
    payments: usize,

    /// Batch confirmation timeout in seconds (0 = scenario default)
    #[arg(short, long, default_value = "0")]
    timeout_secs: u64,

    /// Simulated confirmation latency in milliseconds
    #[arg(long, default_value = "200")]
    status_delay_ms: u64,

    /// Swallow every Nth confirmation to exercise the deadline (0 = none)
    #[arg(long, default_value = "0")]
    drop_every: usize,

    /// Deadline check interval in milliseconds
    #[arg(long, default_value = "500")]
    tick_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let scenario = Scenario::load(&args.scenario, args.payments)?;

    info!("Starting lumenbatch simulator");
    info!("Scenario: {} - {}", scenario.name, scenario.description);

    // Assemble the simulated world
    let feed = Arc::new(StatusFeed::new());
    let ledger = Arc::new(SimulatedLedger::new(
        100,
        feed.clone(),
        Duration::from_millis(args.status_delay_ms),
        args.drop_every,
    ));
    let wallet = Arc::new(SimulatedWallet::new());
    ledger.fund_account(&wallet.account_id()).await;

    let mut directory = SimulatedDirectory::new();
    for (kind, payment) in &scenario.steps {
        match kind {
            RecipientKind::Funded => {
                let account = directory.add_direct(&payment.recipient);
                ledger.fund_account(&account).await;
            }
            RecipientKind::Unfunded => {
                directory.add_direct(&payment.recipient);
            }
            RecipientKind::RelayOnly => {
                directory.add_relay(&payment.recipient);
            }
        }
    }

    let chat = Arc::new(RecordingChat::new());
    let collab = BatchCollaborators {
        gateway: ledger.clone(),
        resolver: Arc::new(directory),
        note_encryptor: Arc::new(SealedNoteEncryptor),
        chat: chat.clone(),
        wallet,
        feed,
    };

    let config = BatchConfig {
        tick: Duration::from_millis(args.tick_ms),
        ..BatchConfig::from_env()
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let coordinator = BatchCoordinator::new(collab, config);

    let timeout_secs = if args.timeout_secs > 0 {
        args.timeout_secs
    } else {
        scenario.timeout_secs
    };
    let arg = BatchArg::new(
        BatchId::new(format!("sim-{}", scenario.name)),
        timeout_secs,
        scenario.payments(),
    );

    // Run the batch
    let result = coordinator.run(arg).await?;

    info!("Batch complete");
    info!(
        "Payments: {} ({} completed, {} pending, {} errors)",
        result.payments.len(),
        result.count_success,
        result.count_pending,
        result.count_error
    );
    info!(
        "Durations: overall {}ms, prepare {}ms, submit {}ms, wait {}ms",
        result.overall_duration_ms,
        result.prepare_duration_ms,
        result.submit_duration_ms,
        result.wait_duration_ms
    );
    if result.count_success > 0 {
        info!("Average completed payment: {}ms", result.avg_success_duration_ms);
    }

    for payment in &result.payments {
        match &payment.error {
            Some(err) => info!(
                "  {} -> {} ({})",
                payment.username, payment.status_description, err.message
            ),
            None => info!(
                "  {} -> {} (tx {})",
                payment.username,
                payment.status_description,
                payment
                    .tx_id
                    .as_ref()
                    .map(|t| t.as_str())
                    .unwrap_or("none")
            ),
        }
    }

    info!("Chat receipts delivered: {}", chat.sent_count());
    info!("Ledger submissions: {}", ledger.submission_count());

    print!("{}", coordinator.metrics().to_prometheus());

    Ok(())
}
