use crate::entity::TradeSide;
use alloy_primitives::TxHash;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Everything the trade screen needs to draw itself, as plain data. The
/// rendering layer carries no trading logic of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeScreenState {
    pub side: TradeSide,
    pub amount: String,
    /// Human-formatted cost (Buy) or proceeds (Sell) of the current quote.
    pub quote_display: Option<String>,
    pub needs_approval: bool,
    pub is_processing: bool,
    pub can_submit: bool,
    /// Label for the action control, e.g. "Buy" or "Insufficient Balance".
    pub submit_label: String,
    pub asset_balance: String,
    pub payment_balance: String,
}

/// Implemented by the external presentation layer (cards, buttons, toasts
/// live there). Methods receive plain data only.
#[async_trait]
pub trait TradeView: Send + Sync {
    async fn render(&self, state: &TradeScreenState) -> Result<()>;

    async fn display_trade_success(
        &self,
        side: TradeSide,
        amount: &str,
        hash: &TxHash,
    ) -> Result<()>;

    async fn display_trade_error(&self, message: &str) -> Result<()>;

    async fn display_validation_error(&self, message: &str) -> Result<()>;
}
