use alloy_primitives::{Address, TxHash, U256};
use anyhow::Result;
use async_trait::async_trait;

/// Semantic description of a contract write. The transaction client owns the
/// generated bindings and turns this into calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Buy {
        asset: Address,
        amount: U256,
    },
    Sell {
        asset: Address,
        amount: U256,
    },
    Mint {
        token: Address,
        recipient: Address,
        amount: U256,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHandle {
    pub hash: TxHash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub hash: TxHash,
    pub block_number: u64,
}

/// Terminal result of waiting on a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    Confirmed(Receipt),
    Reverted(String),
}

/// Transaction submission pipeline. `simulate` is a dry-run against current
/// chain state so a revert reason surfaces before any gas is spent.
/// `await_confirmation` has no client-side timeout; it is bounded only by
/// the underlying transport.
#[async_trait]
pub trait TransactionClient: Send + Sync {
    /// Ok(None) if the call would succeed, Ok(Some(reason)) if it would revert.
    async fn simulate(&self, from: Address, call: &ContractCall) -> Result<Option<String>>;

    async fn submit(&self, from: Address, call: &ContractCall) -> Result<TxHandle>;

    async fn await_confirmation(&self, handle: &TxHandle) -> Result<TxOutcome>;
}
