//! Batch scenarios.

use lumenbatch_common::PaymentRequest;

/// Shape of a recipient in a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
    /// Existing funded account; gets a PAY.
    Funded,
    /// Account known to the directory but not on the ledger; gets a
    /// CREATE_ACCOUNT.
    Unfunded,
    /// No account at all; gets a relay escrow.
    RelayOnly,
}

/// A batch scenario: the payments to send and the recipients behind them.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Confirmation budget for the batch.
    pub timeout_secs: u64,
    /// The payments, with the recipient shape each one expects.
    pub steps: Vec<(RecipientKind, PaymentRequest)>,
}

impl Scenario {
    /// Load a scenario by name.
    pub fn load(name: &str, payments: usize) -> anyhow::Result<Self> {
        match name {
            "directs" => Ok(Self::directs(payments)),
            "mixed" => Ok(Self::mixed()),
            "sub-minimum" => Ok(Self::sub_minimum()),
            _ => Err(anyhow::anyhow!("Unknown scenario: {}", name)),
        }
    }

    /// N direct payments to funded recipients.
    pub fn directs(count: usize) -> Self {
        let steps = (0..count.max(1))
            .map(|i| {
                (
                    RecipientKind::Funded,
                    PaymentRequest::new(format!("user{i}"), "5").with_message(format!("batch #{i}")),
                )
            })
            .collect();

        Self {
            name: "directs".to_string(),
            description: "Direct payments to funded recipients".to_string(),
            timeout_secs: 30,
            steps,
        }
    }

    /// Funded, unfunded, and relay recipients in one batch.
    pub fn mixed() -> Self {
        Self {
            name: "mixed".to_string(),
            description: "Funded PAY, unfunded CREATE_ACCOUNT, and a relay escrow".to_string(),
            timeout_secs: 30,
            steps: vec![
                (
                    RecipientKind::Funded,
                    PaymentRequest::new("alice", "5").with_message("lunch"),
                ),
                (
                    RecipientKind::Unfunded,
                    PaymentRequest::new("dave", "1.5"),
                ),
                (
                    RecipientKind::RelayOnly,
                    PaymentRequest::new("bob@rooter", "2.01").with_message("claim this"),
                ),
            ],
        }
    }

    /// Amounts straddling both funding minimums; two of the payments fail
    /// during prepare.
    pub fn sub_minimum() -> Self {
        Self {
            name: "sub-minimum".to_string(),
            description: "Boundary amounts around the create-account and relay minimums"
                .to_string(),
            timeout_secs: 30,
            steps: vec![
                (RecipientKind::Unfunded, PaymentRequest::new("ed", "0.99")),
                (RecipientKind::Unfunded, PaymentRequest::new("fay", "1")),
                (
                    RecipientKind::RelayOnly,
                    PaymentRequest::new("gil@rooter", "2.00"),
                ),
                (
                    RecipientKind::RelayOnly,
                    PaymentRequest::new("hal@rooter", "2.01"),
                ),
            ],
        }
    }

    /// Just the payment requests, in order.
    pub fn payments(&self) -> Vec<PaymentRequest> {
        self.steps.iter().map(|(_, p)| p.clone()).collect()
    }
}
