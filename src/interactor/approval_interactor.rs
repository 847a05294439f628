use crate::chain::{ContractCall, LedgerReader, TransactionClient, TxOutcome};
use crate::entity::{ClientError, TradeSide, TransactionRecord};
use alloy_primitives::{Address, U256};
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

/// True iff a Buy with a known cost would exceed the current allowance.
/// Sell trades spend the asset directly and never need an approval.
pub fn needs_approval(side: TradeSide, cost: Option<U256>, allowance: U256) -> bool {
    match (side, cost) {
        (TradeSide::Buy, Some(cost)) if !cost.is_zero() => allowance < cost,
        _ => false,
    }
}

#[async_trait]
pub trait ApprovalInteractor: Send + Sync {
    async fn current_allowance(&self, owner: Address, token: Address) -> Result<U256>;

    /// Makes sure the trading contract may pull `required` of `token`.
    /// Returns `None` when the existing allowance already covers it, or the
    /// confirmed approval transaction otherwise. Any failure aborts before
    /// the trade ever runs.
    async fn ensure_allowance(
        &self,
        owner: Address,
        token: Address,
        required: U256,
    ) -> Result<Option<TransactionRecord>>;
}

pub struct ApprovalInteractorImpl {
    ledger: Arc<dyn LedgerReader>,
    tx_client: Arc<dyn TransactionClient>,
    spender: Address,
}

impl ApprovalInteractorImpl {
    pub fn new(
        ledger: Arc<dyn LedgerReader>,
        tx_client: Arc<dyn TransactionClient>,
        spender: Address,
    ) -> Self {
        Self {
            ledger,
            tx_client,
            spender,
        }
    }
}

#[async_trait]
impl ApprovalInteractor for ApprovalInteractorImpl {
    async fn current_allowance(&self, owner: Address, token: Address) -> Result<U256> {
        self.ledger
            .read_allowance(owner, self.spender, token)
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()).into())
    }

    async fn ensure_allowance(
        &self,
        owner: Address,
        token: Address,
        required: U256,
    ) -> Result<Option<TransactionRecord>> {
        // Always re-read: the ledger owns this state, not us
        let allowance = self.current_allowance(owner, token).await?;
        if allowance >= required {
            return Ok(None);
        }

        let call = ContractCall::Approve {
            token,
            spender: self.spender,
            amount: required,
        };

        // Dry-run first so a revert costs no gas
        if let Some(reason) = self.tx_client.simulate(owner, &call).await? {
            return Err(ClientError::Simulation(reason).into());
        }

        let handle = self.tx_client.submit(owner, &call).await?;
        let mut record = TransactionRecord::pending(handle.hash);
        info!("Approval submitted: {}", handle.hash);

        match self.tx_client.await_confirmation(&handle).await? {
            TxOutcome::Confirmed(_) => {
                record.confirm();
                Ok(Some(record))
            }
            TxOutcome::Reverted(reason) => {
                record.fail();
                Err(ClientError::Confirmation(reason).into())
            }
        }
    }
}
