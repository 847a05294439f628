// External collaborators, consumed through traits only. The contract
// bindings, wallet widgets and toast rendering all live outside this crate.
pub mod ledger;
pub mod notify;
pub mod tx;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

pub use ledger::{LedgerReader, QuoteReading};
pub use notify::NotificationSink;
pub use tx::{ContractCall, Receipt, TransactionClient, TxHandle, TxOutcome};
pub use wallet::{WalletSession, WalletSnapshot};
