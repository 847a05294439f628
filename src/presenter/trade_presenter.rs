use crate::chain::{LedgerReader, WalletSession};
use crate::entity::{ClientError, Quote, TradeIntent, TradeSide};
use crate::interactor::approval_interactor::{needs_approval, ApprovalInteractor};
use crate::interactor::quote_interactor::QuoteInteractor;
use crate::interactor::trade_interactor::TradeInteractor;
use crate::utils::format_units;
use crate::view::{TradeScreenState, TradeView};
use alloy_primitives::{Address, U256};
use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// UI events of the trade form. The presenter owns the processing flag (a
/// UI-level lock: the control is disabled while true, nothing is queued) and
/// pushes plain-data screen states to the view.
#[async_trait]
pub trait TradePresenter: Send + Sync {
    /// Called on mount: loads balances and allowance, starts re-rendering
    /// on quote changes.
    async fn activate(&self) -> Result<()>;

    async fn amount_changed(&self, amount: String) -> Result<()>;

    async fn side_changed(&self, side: TradeSide) -> Result<()>;

    /// The single user-facing action. May run up to two on-chain
    /// transactions (approval, then trade).
    async fn submit(&self) -> Result<()>;

    fn screen_state(&self) -> TradeScreenState;
}

#[derive(Debug, Clone)]
struct FormState {
    side: TradeSide,
    amount: String,
    asset_balance: U256,
    payment_balance: U256,
    allowance: U256,
    is_processing: bool,
    last_intent_id: u64,
}

struct Shared<V> {
    ledger: Arc<dyn LedgerReader>,
    quote: Arc<dyn QuoteInteractor>,
    approval: Arc<dyn ApprovalInteractor>,
    trade: Arc<dyn TradeInteractor>,
    wallet: Arc<dyn WalletSession>,
    view: Arc<V>,
    asset: Address,
    payment_token: Address,
    asset_decimals: u32,
    payment_decimals: u32,
    form: Mutex<FormState>,
    next_intent_id: AtomicU64,
    watcher_started: AtomicBool,
}

pub struct TradePresenterImpl<V> {
    shared: Arc<Shared<V>>,
}

impl<V> TradePresenterImpl<V>
where
    V: TradeView + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ledger: Arc<dyn LedgerReader>,
        quote: Arc<dyn QuoteInteractor>,
        approval: Arc<dyn ApprovalInteractor>,
        trade: Arc<dyn TradeInteractor>,
        wallet: Arc<dyn WalletSession>,
        view: Arc<V>,
        asset: Address,
        payment_token: Address,
        asset_decimals: u32,
        payment_decimals: u32,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                ledger,
                quote,
                approval,
                trade,
                wallet,
                view,
                asset,
                payment_token,
                asset_decimals,
                payment_decimals,
                form: Mutex::new(FormState {
                    side: TradeSide::Buy,
                    amount: String::new(),
                    asset_balance: U256::ZERO,
                    payment_balance: U256::ZERO,
                    allowance: U256::ZERO,
                    is_processing: false,
                    last_intent_id: 0,
                }),
                next_intent_id: AtomicU64::new(0),
                watcher_started: AtomicBool::new(false),
            }),
        }
    }
}

impl<V> Shared<V>
where
    V: TradeView + 'static,
{
    fn form(&self) -> FormState {
        self.form.lock().unwrap().clone()
    }

    /// The quote only counts if it was computed for the intent currently on
    /// screen; anything else is stale and treated as absent.
    fn current_quote(&self) -> Option<Quote> {
        let quote = self.quote.current()?;
        let last_id = self.form.lock().unwrap().last_intent_id;
        (quote.intent_id == last_id).then_some(quote)
    }

    fn intent_from_form(&self, form: &FormState) -> TradeIntent {
        TradeIntent {
            id: form.last_intent_id,
            side: form.side,
            human_amount: form.amount.clone(),
            asset: self.asset,
            payment_token: self.payment_token,
        }
    }

    fn screen_state(&self) -> TradeScreenState {
        let form = self.form();
        let quote = self.current_quote();
        let snapshot = self.wallet.snapshot();
        let intent = self.intent_from_form(&form);

        let validation = self.trade.validate(
            &snapshot,
            &intent,
            quote.as_ref(),
            form.asset_balance,
            form.payment_balance,
        );

        let (can_submit, submit_label) = match &validation {
            Ok(_) => (
                quote.is_some() && !form.is_processing,
                form.side.to_string(),
            ),
            Err(ClientError::InsufficientBalance) => (false, "Insufficient Balance".to_string()),
            Err(_) => (false, form.side.to_string()),
        };

        TradeScreenState {
            side: form.side,
            amount: form.amount.clone(),
            quote_display: quote.as_ref().map(|q| q.display.clone()),
            needs_approval: needs_approval(
                form.side,
                quote.as_ref().map(|q| q.value),
                form.allowance,
            ),
            is_processing: form.is_processing,
            can_submit,
            submit_label,
            asset_balance: format_units(form.asset_balance, self.asset_decimals),
            payment_balance: format_units(form.payment_balance, self.payment_decimals),
        }
    }

    async fn render(&self) -> Result<()> {
        let state = self.screen_state();
        self.view.render(&state).await
    }

    /// Reads balances and allowance afresh. Each read fails independently;
    /// a failed read keeps the previous value rather than zeroing it.
    async fn refresh_from_ledger(&self, owner: Address) {
        let (asset_balance, payment_balance, allowance) = futures::join!(
            self.ledger.read_balance(owner, self.asset),
            self.ledger.read_balance(owner, self.payment_token),
            self.approval.current_allowance(owner, self.payment_token),
        );

        let mut form = self.form.lock().unwrap();
        match asset_balance {
            Ok(balance) => form.asset_balance = balance,
            Err(e) => warn!("Asset balance read failed: {}", e),
        }
        match payment_balance {
            Ok(balance) => form.payment_balance = balance,
            Err(e) => warn!("Payment balance read failed: {}", e),
        }
        match allowance {
            Ok(amount) => form.allowance = amount,
            Err(e) => warn!("Allowance read failed: {}", e),
        }
    }

    fn spawn_quote_watcher(shared: &Arc<Self>) {
        if shared.watcher_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let shared = shared.clone();
        tokio::spawn(async move {
            let mut rx = shared.quote.subscribe();
            while rx.changed().await.is_ok() {
                if let Err(e) = shared.render().await {
                    warn!("View render failed: {}", e);
                }
            }
        });
    }
}

#[async_trait]
impl<V> TradePresenter for TradePresenterImpl<V>
where
    V: TradeView + 'static,
{
    async fn activate(&self) -> Result<()> {
        Shared::spawn_quote_watcher(&self.shared);

        if let Some(owner) = self.shared.wallet.snapshot().connected_address() {
            self.shared.refresh_from_ledger(owner).await;
        }

        self.shared.render().await
    }

    async fn amount_changed(&self, amount: String) -> Result<()> {
        let intent = {
            let mut form = self.shared.form.lock().unwrap();
            form.amount = amount;
            form.last_intent_id = self.shared.next_intent_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.shared.intent_from_form(&form)
        };

        self.shared.quote.intent_changed(Some(intent)).await;
        self.shared.render().await
    }

    async fn side_changed(&self, side: TradeSide) -> Result<()> {
        let intent = {
            let mut form = self.shared.form.lock().unwrap();
            form.side = side;
            form.last_intent_id = self.shared.next_intent_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.shared.intent_from_form(&form)
        };

        // Switching to Buy re-reads the allowance for the approval gate
        if side == TradeSide::Buy {
            if let Some(owner) = self.shared.wallet.snapshot().connected_address() {
                match self
                    .shared
                    .approval
                    .current_allowance(owner, self.shared.payment_token)
                    .await
                {
                    Ok(amount) => self.shared.form.lock().unwrap().allowance = amount,
                    Err(e) => warn!("Allowance read failed: {}", e),
                }
            }
        }

        self.shared.quote.intent_changed(Some(intent)).await;
        self.shared.render().await
    }

    async fn submit(&self) -> Result<()> {
        let shared = &self.shared;

        let (intent, form) = {
            let form = shared.form.lock().unwrap();
            if form.is_processing {
                return Ok(());
            }
            (shared.intent_from_form(&form), form.clone())
        };

        let snapshot = shared.wallet.snapshot();

        let Some(quote) = shared.current_quote() else {
            shared
                .view
                .display_validation_error("No quote available yet")
                .await?;
            return Ok(());
        };

        if let Err(e) = shared.trade.validate(
            &snapshot,
            &intent,
            Some(&quote),
            form.asset_balance,
            form.payment_balance,
        ) {
            shared.view.display_validation_error(&e.to_string()).await?;
            return Ok(());
        }

        let Some(owner) = snapshot.connected_address() else {
            shared
                .view
                .display_validation_error(&ClientError::WalletNotConnected.to_string())
                .await?;
            return Ok(());
        };

        shared.form.lock().unwrap().is_processing = true;
        if let Err(e) = shared.render().await {
            warn!("View render failed: {}", e);
        }

        let result = shared.trade.execute(owner, &intent, &quote).await;

        // Processing clears on every path before anything can early-return
        {
            let mut form = shared.form.lock().unwrap();
            form.is_processing = false;

            if let Ok(outcome) = &result {
                if let Some(refreshed) = &outcome.refreshed {
                    if let Some(balance) = refreshed.asset_balance {
                        form.asset_balance = balance;
                    }
                    if let Some(balance) = refreshed.payment_balance {
                        form.payment_balance = balance;
                    }
                    if let Some(amount) = refreshed.allowance {
                        form.allowance = amount;
                    }
                }
                if outcome.success() {
                    form.amount.clear();
                }
            }
        }

        match result {
            Ok(outcome) if outcome.success() => {
                // The completed trade consumes the intent and its quote
                shared.quote.intent_changed(None).await;
                shared
                    .view
                    .display_trade_success(
                        outcome.side,
                        &format_units(outcome.amount, shared.asset_decimals),
                        &outcome.hash.unwrap_or_default(),
                    )
                    .await?;
            }
            Ok(outcome) => {
                let message = outcome
                    .error_message
                    .unwrap_or_else(|| "Unknown error".to_string());
                shared.view.display_trade_error(&message).await?;
            }
            Err(e) => {
                shared.view.display_trade_error(&e.to_string()).await?;
            }
        }

        shared.render().await
    }

    fn screen_state(&self) -> TradeScreenState {
        self.shared.screen_state()
    }
}
