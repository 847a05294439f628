use alloy_primitives::TxHash;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

/// A submitted transaction. Transitions once from `Pending` to a terminal
/// status and is never reused for a second operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub hash: TxHash,
    pub status: TxStatus,
    pub submitted_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn pending(hash: TxHash) -> Self {
        Self {
            hash,
            status: TxStatus::Pending,
            submitted_at: Utc::now(),
        }
    }

    /// Marks the record confirmed. No-op if already terminal.
    pub fn confirm(&mut self) {
        if self.status == TxStatus::Pending {
            self.status = TxStatus::Confirmed;
        }
    }

    /// Marks the record failed. No-op if already terminal.
    pub fn fail(&mut self) {
        if self.status == TxStatus::Pending {
            self.status = TxStatus::Failed;
        }
    }
}
