use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::chain::{LedgerReader, NotificationSink, TransactionClient, WalletSession};
use crate::config::Config;
use crate::interactor::approval_interactor::{ApprovalInteractor, ApprovalInteractorImpl};
use crate::interactor::balance_verifier::{BalanceVerifier, BalanceVerifierImpl};
use crate::interactor::quote_interactor::{QuoteInteractor, QuoteInteractorImpl};
use crate::interactor::readiness_interactor::ReadinessTracker;
use crate::interactor::trade_interactor::{TradeInteractor, TradeInteractorImpl};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // External collaborators
    ledger: Arc<dyn LedgerReader>,
    tx_client: Arc<dyn TransactionClient>,
    wallet: Arc<dyn WalletSession>,
    notifier: Arc<dyn NotificationSink>,

    // Core interactors
    quote_interactor: Arc<dyn QuoteInteractor>,
    approval_interactor: Arc<dyn ApprovalInteractor>,
    trade_interactor: Arc<dyn TradeInteractor>,
    balance_verifier: Arc<dyn BalanceVerifier>,

    // Shared readiness observations
    readiness_tracker: Arc<Mutex<ReadinessTracker>>,

    // Configuration
    config: Config,
}

impl ServiceContainer {
    /// Create a new service container with essential dependencies
    pub fn new(
        config: Config,
        ledger: Arc<dyn LedgerReader>,
        tx_client: Arc<dyn TransactionClient>,
        wallet: Arc<dyn WalletSession>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let quote_interactor = Arc::new(QuoteInteractorImpl::new(
            ledger.clone(),
            notifier.clone(),
            Duration::from_millis(config.quote_debounce_ms),
            config.asset_decimals,
            config.payment_decimals,
        )) as Arc<dyn QuoteInteractor>;

        let approval_interactor = Arc::new(ApprovalInteractorImpl::new(
            ledger.clone(),
            tx_client.clone(),
            config.spender_address,
        )) as Arc<dyn ApprovalInteractor>;

        let trade_interactor = Arc::new(TradeInteractorImpl::new(
            ledger.clone(),
            tx_client.clone(),
            approval_interactor.clone(),
            notifier.clone(),
            config.spender_address,
            config.asset_decimals,
        )) as Arc<dyn TradeInteractor>;

        let balance_verifier = Arc::new(BalanceVerifierImpl::new(
            ledger.clone(),
            notifier.clone(),
        )) as Arc<dyn BalanceVerifier>;

        let readiness_tracker = Arc::new(Mutex::new(ReadinessTracker::new(
            config.funding_threshold,
        )));

        Self {
            ledger,
            tx_client,
            wallet,
            notifier,
            quote_interactor,
            approval_interactor,
            trade_interactor,
            balance_verifier,
            readiness_tracker,
            config,
        }
    }

    // Accessor methods

    pub fn ledger(&self) -> Arc<dyn LedgerReader> {
        self.ledger.clone()
    }

    pub fn tx_client(&self) -> Arc<dyn TransactionClient> {
        self.tx_client.clone()
    }

    pub fn wallet(&self) -> Arc<dyn WalletSession> {
        self.wallet.clone()
    }

    pub fn notifier(&self) -> Arc<dyn NotificationSink> {
        self.notifier.clone()
    }

    pub fn quote_interactor(&self) -> Arc<dyn QuoteInteractor> {
        self.quote_interactor.clone()
    }

    pub fn approval_interactor(&self) -> Arc<dyn ApprovalInteractor> {
        self.approval_interactor.clone()
    }

    pub fn trade_interactor(&self) -> Arc<dyn TradeInteractor> {
        self.trade_interactor.clone()
    }

    pub fn balance_verifier(&self) -> Arc<dyn BalanceVerifier> {
        self.balance_verifier.clone()
    }

    pub fn readiness_tracker(&self) -> Arc<Mutex<ReadinessTracker>> {
        self.readiness_tracker.clone()
    }

    pub fn config(&self) -> Config {
        self.config.clone()
    }
}
