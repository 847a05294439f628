use crate::entity::TradeSide;
use alloy_primitives::{Address, U256};
use anyhow::Result;
use async_trait::async_trait;

/// Raw pricing-oracle response for one quote read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteReading {
    /// Cost (Buy) or proceeds (Sell) in payment-token smallest units.
    pub amount: U256,
    /// Fee already included in `amount`, informational.
    pub fee: U256,
}

/// Read-only ledger queries. All calls are pure reads against current chain
/// state; in-flight reads cannot be cancelled, only their results ignored.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn read_balance(&self, owner: Address, token: Address) -> Result<U256>;

    async fn read_allowance(
        &self,
        owner: Address,
        spender: Address,
        token: Address,
    ) -> Result<U256>;

    /// Asks the pricing oracle what `amount` of `asset` costs (Buy) or
    /// yields (Sell), in payment-token smallest units.
    async fn read_quote(
        &self,
        asset: Address,
        side: TradeSide,
        amount: U256,
    ) -> Result<QuoteReading>;
}
