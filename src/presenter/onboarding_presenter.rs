use crate::chain::{ContractCall, NotificationSink, TransactionClient, TxOutcome, WalletSession};
use crate::entity::{ClientError, ReadinessStage};
use crate::interactor::balance_verifier::BalanceVerifier;
use crate::interactor::readiness_interactor::ReadinessTracker;
use crate::view::OnboardingView;
use alloy_primitives::{Address, U256};
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Drives the stablecoin funding step of onboarding. The stage itself is
/// derived by the tracker; this presenter only performs the funding action,
/// records the attempt, and runs the post-funding verification loop.
#[async_trait]
pub trait OnboardingPresenter: Send + Sync {
    fn stage(&self) -> ReadinessStage;

    async fn request_funding(&self) -> Result<()>;
}

pub struct OnboardingPresenterImpl<V> {
    tx_client: Arc<dyn TransactionClient>,
    verifier: Arc<dyn BalanceVerifier>,
    wallet: Arc<dyn WalletSession>,
    notifier: Arc<dyn NotificationSink>,
    tracker: Arc<Mutex<ReadinessTracker>>,
    view: Arc<V>,
    stablecoin: Address,
    funding_amount: U256,
    verify_max_retries: u32,
    verify_delay: Duration,
}

impl<V> OnboardingPresenterImpl<V>
where
    V: OnboardingView,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tx_client: Arc<dyn TransactionClient>,
        verifier: Arc<dyn BalanceVerifier>,
        wallet: Arc<dyn WalletSession>,
        notifier: Arc<dyn NotificationSink>,
        tracker: Arc<Mutex<ReadinessTracker>>,
        view: Arc<V>,
        stablecoin: Address,
        funding_amount: U256,
        verify_max_retries: u32,
        verify_delay: Duration,
    ) -> Self {
        Self {
            tx_client,
            verifier,
            wallet,
            notifier,
            tracker,
            view,
            stablecoin,
            funding_amount,
            verify_max_retries,
            verify_delay,
        }
    }
}

#[async_trait]
impl<V> OnboardingPresenter for OnboardingPresenterImpl<V>
where
    V: OnboardingView,
{
    fn stage(&self) -> ReadinessStage {
        self.tracker.lock().unwrap().stage()
    }

    async fn request_funding(&self) -> Result<()> {
        let snapshot = self.wallet.snapshot();
        let Some(owner) = snapshot.connected_address() else {
            self.notifier
                .error(&ClientError::WalletNotConnected.to_string())
                .await;
            return Ok(());
        };

        let call = ContractCall::Mint {
            token: self.stablecoin,
            recipient: owner,
            amount: self.funding_amount,
        };

        // Transport failures surface as messages like everything else; no
        // bare Err leaves this operation without the user hearing about it
        match self.tx_client.simulate(owner, &call).await {
            Ok(None) => {}
            Ok(Some(reason)) => {
                self.notifier
                    .error(&ClientError::Simulation(reason).to_string())
                    .await;
                return Ok(());
            }
            Err(e) => {
                self.notifier
                    .error(&ClientError::Rpc(e.to_string()).to_string())
                    .await;
                return Ok(());
            }
        }

        let handle = match self.tx_client.submit(owner, &call).await {
            Ok(handle) => handle,
            Err(e) => {
                self.notifier
                    .error(&ClientError::Rpc(e.to_string()).to_string())
                    .await;
                return Ok(());
            }
        };
        self.view.display_funding_submitted(&handle.hash).await?;

        let outcome = match self.tx_client.await_confirmation(&handle).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.notifier
                    .error(&ClientError::Rpc(e.to_string()).to_string())
                    .await;
                return Ok(());
            }
        };

        match outcome {
            TxOutcome::Reverted(reason) => {
                // Nothing was funded; the attempt flag stays unset
                self.notifier
                    .error(&ClientError::Confirmation(reason).to_string())
                    .await;
                Ok(())
            }
            TxOutcome::Confirmed(receipt) => {
                info!("Funding confirmed: {}", receipt.hash);
                {
                    let mut tracker = self.tracker.lock().unwrap();
                    tracker.wallet_changed(&snapshot);
                    tracker.record_funding_attempt(owner);
                }
                // The funding itself succeeded whatever the verification
                // below says; the two must never be conflated.
                self.notifier.success("Funding confirmed").await;

                let verified = self
                    .verifier
                    .verify_balance_at_least(
                        owner,
                        self.stablecoin,
                        self.funding_amount,
                        self.verify_max_retries,
                        self.verify_delay,
                    )
                    .await;

                match verified {
                    Ok(true) => {
                        self.tracker
                            .lock()
                            .unwrap()
                            .record_stable_balance(owner, self.funding_amount);
                        self.view.display_funding_verified().await?;
                    }
                    Ok(false) => {
                        self.notifier
                            .error(
                                &ClientError::VerificationTimeout {
                                    attempts: self.verify_max_retries,
                                }
                                .to_string(),
                            )
                            .await;
                        self.view.display_verification_timeout().await?;
                    }
                    Err(e) => {
                        self.notifier
                            .error(&ClientError::Rpc(e.to_string()).to_string())
                            .await;
                        self.view.display_verification_timeout().await?;
                    }
                }

                self.view.display_stage(self.stage()).await
            }
        }
    }
}
