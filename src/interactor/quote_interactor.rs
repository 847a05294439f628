use crate::chain::{LedgerReader, NotificationSink};
use crate::entity::{Quote, TradeIntent};
use crate::utils::{format_units, parse_units};
use async_trait::async_trait;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Live quote computation. Debounces rapid input edits and guarantees that
/// the published quote always belongs to the newest intent, whatever order
/// the oracle responses arrive in.
#[async_trait]
pub trait QuoteInteractor: Send + Sync {
    /// Called on every change to amount or side. `None` clears the quote.
    async fn intent_changed(&self, intent: Option<TradeIntent>);

    fn subscribe(&self) -> watch::Receiver<Option<Quote>>;

    fn current(&self) -> Option<Quote>;
}

pub struct QuoteInteractorImpl {
    ledger: Arc<dyn LedgerReader>,
    notifier: Arc<dyn NotificationSink>,
    debounce: Duration,
    asset_decimals: u32,
    payment_decimals: u32,
    // Latest-request-wins token: bumped on every edit, compared at
    // resolution time so superseded responses are dropped regardless of
    // arrival order.
    generation: Arc<AtomicU64>,
    tx: watch::Sender<Option<Quote>>,
}

impl QuoteInteractorImpl {
    pub fn new(
        ledger: Arc<dyn LedgerReader>,
        notifier: Arc<dyn NotificationSink>,
        debounce: Duration,
        asset_decimals: u32,
        payment_decimals: u32,
    ) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            ledger,
            notifier,
            debounce,
            asset_decimals,
            payment_decimals,
            generation: Arc::new(AtomicU64::new(0)),
            tx,
        }
    }
}

#[async_trait]
impl QuoteInteractor for QuoteInteractorImpl {
    async fn intent_changed(&self, intent: Option<TradeIntent>) {
        // Every edit supersedes whatever is in flight, even when the new
        // input itself produces no read.
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(intent) = intent else {
            self.tx.send_replace(None);
            return;
        };

        // Zero or unparsable amount: clear the quote, no call, no error
        let amount = match parse_units(&intent.human_amount, self.asset_decimals) {
            Ok(amount) if !amount.is_zero() => amount,
            _ => {
                self.tx.send_replace(None);
                return;
            }
        };

        let ledger = self.ledger.clone();
        let notifier = self.notifier.clone();
        let generation = self.generation.clone();
        let tx = self.tx.clone();
        let debounce = self.debounce;
        let payment_decimals = self.payment_decimals;

        tokio::spawn(async move {
            sleep(debounce).await;

            // Superseded during the debounce window: skip the read entirely
            if generation.load(Ordering::SeqCst) != my_generation {
                return;
            }

            match ledger.read_quote(intent.asset, intent.side, amount).await {
                Ok(reading) => {
                    if generation.load(Ordering::SeqCst) != my_generation {
                        debug!("Dropping stale quote for intent {}", intent.id);
                        return;
                    }

                    tx.send_replace(Some(Quote {
                        intent_id: intent.id,
                        side: intent.side,
                        asset_amount: amount,
                        value: reading.amount,
                        fee: reading.fee,
                        display: format_units(reading.amount, payment_decimals),
                    }));
                }
                Err(e) => {
                    if generation.load(Ordering::SeqCst) != my_generation {
                        return;
                    }

                    // Transient read failure: notify, clear any stale display
                    notifier
                        .error(&format!("Failed to get quote: {}", e))
                        .await;
                    tx.send_replace(None);
                }
            }
        });
    }

    fn subscribe(&self) -> watch::Receiver<Option<Quote>> {
        self.tx.subscribe()
    }

    fn current(&self) -> Option<Quote> {
        self.tx.borrow().clone()
    }
}
