//! Settlement Receipt Types
//!
//! Per-round accounting of the settlement oracle calls a verified match
//! made, including whatever transaction references were obtained before a
//! failing step.

use serde::{Deserialize, Serialize};

/// A single settlement-oracle call and the transaction reference it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTx {
    /// Protocol step name: "create", "join", "commit", "reveal", "claim_timeout"
    pub step: String,
    /// Identity that signed the call
    pub signer: String,
    /// Transaction reference assigned by the oracle
    pub tx_id: String,
}

impl StepTx {
    pub fn new(
        step: impl Into<String>,
        signer: impl Into<String>,
        tx_id: impl Into<String>,
    ) -> Self {
        Self {
            step: step.into(),
            signer: signer.into(),
            tx_id: tx_id.into(),
        }
    }
}

/// Settlement trail attached to a verified match record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// Game identifier assigned by the oracle; absent when create failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<u64>,
    /// Transaction references in call order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<StepTx>,
    /// Error from the step that failed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True only when the oracle fully settled the game
    pub settled: bool,
}

impl SettlementReceipt {
    /// Record a successful oracle call.
    pub fn push_tx(&mut self, step: &str, signer: &str, tx_id: impl Into<String>) {
        self.transactions.push(StepTx::new(step, signer, tx_id));
    }

    /// Mark the receipt failed with the given step error.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.settled = false;
    }
}
