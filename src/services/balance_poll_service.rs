use crate::di::ServiceContainer;
use crate::entity::ReadinessStage;
use crate::view::OnboardingView;
use anyhow::Result;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Background poll feeding the readiness machine. Every tick (and on every
/// wallet change) it reads the gas-token and stablecoin balances for the
/// current address, records them, and pushes the re-derived stage to the
/// onboarding view when it changed.
pub struct BalancePollService<V> {
    services: Arc<ServiceContainer>,
    view: Arc<V>,
    stop_tx: Option<mpsc::Sender<()>>,
}

impl<V> BalancePollService<V>
where
    V: OnboardingView + 'static,
{
    pub fn new(services: Arc<ServiceContainer>, view: Arc<V>) -> Self {
        Self {
            services,
            view,
            stop_tx: None,
        }
    }

    // Start the background task that keeps readiness observations current
    pub async fn start(&mut self) -> Result<()> {
        if self.stop_tx.is_some() {
            warn!("Balance poll service is already running");
            return Ok(());
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        self.stop_tx = Some(stop_tx);

        let services = self.services.clone();
        let view = self.view.clone();

        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(services.config().balance_poll_secs));
            let mut wallet_rx = services.wallet().subscribe();
            let mut last_stage: Option<ReadinessStage> = None;

            loop {
                select! {
                    _ = interval.tick() => {
                        if let Err(e) = Self::poll_once(&services, &view, &mut last_stage).await {
                            error!("Balance poll failed: {}", e);
                        }
                    }
                    changed = wallet_rx.changed() => {
                        if changed.is_err() {
                            // Wallet provider gone; nothing left to observe
                            break;
                        }
                        if let Err(e) = Self::poll_once(&services, &view, &mut last_stage).await {
                            error!("Balance poll failed: {}", e);
                        }
                    }
                    _ = stop_rx.recv() => {
                        info!("Stopping balance poll service");
                        break;
                    }
                }
            }
        });

        info!("Balance poll service started");
        Ok(())
    }

    // Stop the background task
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
            info!("Balance poll service stop signal sent");
        }
    }

    async fn poll_once(
        services: &Arc<ServiceContainer>,
        view: &Arc<V>,
        last_stage: &mut Option<ReadinessStage>,
    ) -> Result<()> {
        let snapshot = services.wallet().snapshot();
        let tracker = services.readiness_tracker();

        tracker.lock().unwrap().wallet_changed(&snapshot);

        if let Some(owner) = snapshot.connected_address() {
            let config = services.config();
            let ledger = services.ledger();

            // Failed reads leave the previous observation for this address
            // in place; a transient RPC error must not regress the stage
            match ledger.read_balance(owner, config.gas_token_address).await {
                Ok(balance) => tracker.lock().unwrap().record_gas_balance(owner, balance),
                Err(e) => warn!("Gas balance poll failed: {}", e),
            }

            match ledger.read_balance(owner, config.stablecoin_address).await {
                Ok(balance) => tracker.lock().unwrap().record_stable_balance(owner, balance),
                Err(e) => warn!("Stablecoin balance poll failed: {}", e),
            }
        }

        let stage = tracker.lock().unwrap().stage();
        if Some(stage) != *last_stage {
            info!("Readiness stage: {}", stage);
            view.display_stage(stage).await?;
            *last_stage = Some(stage);
        }

        Ok(())
    }
}
