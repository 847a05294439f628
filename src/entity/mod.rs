mod client_error;
mod readiness;
mod trade;
mod transaction;

pub use client_error::ClientError;
pub use readiness::{ReadinessFacts, ReadinessStage};
pub use trade::{Quote, TradeIntent, TradeSide, TradeStep};
pub use transaction::{TransactionRecord, TxStatus};
