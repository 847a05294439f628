use alloy_primitives::{Address, U256};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "Buy"),
            TradeSide::Sell => write!(f, "Sell"),
        }
    }
}

/// One edit of the trade form. Created per keystroke; only the intent with
/// the highest `id` is current, everything older is ignored when its
/// quote resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeIntent {
    pub id: u64,
    pub side: TradeSide,
    pub human_amount: String,
    pub asset: Address,
    pub payment_token: Address,
}

/// A priced trade. `intent_id` ties the quote to the intent it was computed
/// for; a quote whose intent is no longer current must never be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub intent_id: u64,
    pub side: TradeSide,
    /// Asset amount in smallest units (receive amount on Buy, sell amount on Sell).
    pub asset_amount: U256,
    /// Cost (Buy) or proceeds (Sell) in payment-token smallest units.
    pub value: U256,
    /// Fee portion of `value`, informational.
    pub fee: U256,
    /// Human-formatted `value` for display.
    pub display: String,
}

/// Steps of the composite buy flow. One user action ("Buy") can walk through
/// approval and trade as two separate on-chain transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeStep {
    Approving,
    Trading,
    Done,
    Failed,
}

impl std::fmt::Display for TradeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TradeStep::Approving => "approving",
            TradeStep::Trading => "trading",
            TradeStep::Done => "done",
            TradeStep::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
