pub mod approval_interactor;
pub mod balance_verifier;
pub mod quote_interactor;
pub mod readiness_interactor;
pub mod trade_interactor;

pub use approval_interactor::{needs_approval, ApprovalInteractor, ApprovalInteractorImpl};
pub use balance_verifier::{BalanceVerifier, BalanceVerifierImpl};
pub use quote_interactor::{QuoteInteractor, QuoteInteractorImpl};
pub use readiness_interactor::{derive_stage, ReadinessTracker};
pub use trade_interactor::{BalanceRefresh, TradeInteractor, TradeInteractorImpl, TradeOutcome};
