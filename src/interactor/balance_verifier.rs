use crate::chain::{LedgerReader, NotificationSink};
use alloy_primitives::{Address, U256};
use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Bounded polling for a balance change that may lag the operation that
/// caused it (indexing/propagation delay after a mint or funding).
#[async_trait]
pub trait BalanceVerifier: Send + Sync {
    /// Polls until `owner`'s `token` balance reaches `minimum`. Succeeds
    /// immediately on the first read if already met. `Ok(false)` means the
    /// retries were exhausted: verification failed, NOT the operation that
    /// preceded it.
    async fn verify_balance_at_least(
        &self,
        owner: Address,
        token: Address,
        minimum: U256,
        max_retries: u32,
        delay: Duration,
    ) -> Result<bool>;
}

pub struct BalanceVerifierImpl {
    ledger: Arc<dyn LedgerReader>,
    notifier: Arc<dyn NotificationSink>,
}

impl BalanceVerifierImpl {
    pub fn new(ledger: Arc<dyn LedgerReader>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { ledger, notifier }
    }
}

#[async_trait]
impl BalanceVerifier for BalanceVerifierImpl {
    async fn verify_balance_at_least(
        &self,
        owner: Address,
        token: Address,
        minimum: U256,
        max_retries: u32,
        delay: Duration,
    ) -> Result<bool> {
        for attempt in 1..=max_retries {
            match self.ledger.read_balance(owner, token).await {
                Ok(balance) if balance >= minimum => {
                    info!(
                        "Balance verified on attempt {}/{}: {}",
                        attempt, max_retries, balance
                    );
                    return Ok(true);
                }
                Ok(balance) => {
                    info!(
                        "Balance {} below expected {} (attempt {}/{})",
                        balance, minimum, attempt, max_retries
                    );
                }
                // Read errors are transient here; the next attempt may see it
                Err(e) => warn!("Balance read failed during verification: {}", e),
            }

            if attempt < max_retries {
                self.notifier
                    .progress(&format!(
                        "Balance not visible yet, still checking ({}/{})",
                        attempt, max_retries
                    ))
                    .await;
                sleep(delay).await;
            }
        }

        Ok(false)
    }
}
