use crate::chain::{
    ContractCall, LedgerReader, NotificationSink, TransactionClient, TxOutcome, WalletSnapshot,
};
use crate::entity::{ClientError, Quote, TradeIntent, TradeSide, TradeStep};
use crate::interactor::approval_interactor::{needs_approval, ApprovalInteractor};
use crate::utils::parse_units;
use alloy_primitives::{Address, TxHash, U256};
use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

/// Fresh ledger reads after a trade settles. The three reads are issued
/// independently; a brief inconsistency window between them is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceRefresh {
    pub asset_balance: Option<U256>,
    pub payment_balance: Option<U256>,
    pub allowance: Option<U256>,
}

#[derive(Debug, Clone)]
pub struct TradeOutcome {
    pub side: TradeSide,
    pub amount: U256,
    pub step: TradeStep,
    pub hash: Option<TxHash>,
    pub approval_hash: Option<TxHash>,
    pub error_message: Option<String>,
    pub refreshed: Option<BalanceRefresh>,
}

impl TradeOutcome {
    pub fn success(&self) -> bool {
        self.step == TradeStep::Done
    }

    fn failed(side: TradeSide, amount: U256, message: String) -> Self {
        Self {
            side,
            amount,
            step: TradeStep::Failed,
            hash: None,
            approval_hash: None,
            error_message: Some(message),
            refreshed: None,
        }
    }
}

#[async_trait]
pub trait TradeInteractor: Send + Sync {
    /// Fail-fast checks before any network call. Returns the trade amount in
    /// smallest units. Balance comparisons are integer, never float.
    fn validate(
        &self,
        wallet: &WalletSnapshot,
        intent: &TradeIntent,
        quote: Option<&Quote>,
        asset_balance: U256,
        payment_balance: U256,
    ) -> Result<U256, ClientError>;

    /// Runs the composite flow: approval if the allowance falls short, then
    /// the trade itself, then the balance/allowance refresh. One user action,
    /// up to two on-chain transactions.
    async fn execute(
        &self,
        owner: Address,
        intent: &TradeIntent,
        quote: &Quote,
    ) -> Result<TradeOutcome>;
}

pub struct TradeInteractorImpl {
    ledger: Arc<dyn LedgerReader>,
    tx_client: Arc<dyn TransactionClient>,
    approval: Arc<dyn ApprovalInteractor>,
    notifier: Arc<dyn NotificationSink>,
    spender: Address,
    asset_decimals: u32,
}

impl TradeInteractorImpl {
    pub fn new(
        ledger: Arc<dyn LedgerReader>,
        tx_client: Arc<dyn TransactionClient>,
        approval: Arc<dyn ApprovalInteractor>,
        notifier: Arc<dyn NotificationSink>,
        spender: Address,
        asset_decimals: u32,
    ) -> Self {
        Self {
            ledger,
            tx_client,
            approval,
            notifier,
            spender,
            asset_decimals,
        }
    }

    /// Re-reads both balances and the allowance. Each read stands alone:
    /// one failing leaves the others usable.
    async fn refresh(&self, owner: Address, intent: &TradeIntent) -> BalanceRefresh {
        let (asset_balance, payment_balance, allowance) = futures::join!(
            self.ledger.read_balance(owner, intent.asset),
            self.ledger.read_balance(owner, intent.payment_token),
            self.ledger
                .read_allowance(owner, self.spender, intent.payment_token),
        );

        BalanceRefresh {
            asset_balance: asset_balance
                .map_err(|e| warn!("Asset balance refresh failed: {}", e))
                .ok(),
            payment_balance: payment_balance
                .map_err(|e| warn!("Payment balance refresh failed: {}", e))
                .ok(),
            allowance: allowance
                .map_err(|e| warn!("Allowance refresh failed: {}", e))
                .ok(),
        }
    }
}

#[async_trait]
impl TradeInteractor for TradeInteractorImpl {
    fn validate(
        &self,
        wallet: &WalletSnapshot,
        intent: &TradeIntent,
        quote: Option<&Quote>,
        asset_balance: U256,
        payment_balance: U256,
    ) -> Result<U256, ClientError> {
        if !wallet.connected || wallet.address.is_none() {
            return Err(ClientError::WalletNotConnected);
        }

        if intent.asset == Address::ZERO {
            return Err(ClientError::AssetNotResolved);
        }

        let amount = parse_units(&intent.human_amount, self.asset_decimals)
            .map_err(|_| ClientError::InvalidAmount)?;
        if amount.is_zero() {
            return Err(ClientError::InvalidAmount);
        }

        match intent.side {
            TradeSide::Buy => {
                if let Some(quote) = quote {
                    if payment_balance < quote.value {
                        return Err(ClientError::InsufficientBalance);
                    }
                }
            }
            TradeSide::Sell => {
                if asset_balance < amount {
                    return Err(ClientError::InsufficientBalance);
                }
            }
        }

        Ok(amount)
    }

    async fn execute(
        &self,
        owner: Address,
        intent: &TradeIntent,
        quote: &Quote,
    ) -> Result<TradeOutcome> {
        let amount = parse_units(&intent.human_amount, self.asset_decimals)
            .map_err(|_| ClientError::InvalidAmount)?;

        let mut approval_hash = None;

        if intent.side == TradeSide::Buy {
            let allowance = self
                .approval
                .current_allowance(owner, intent.payment_token)
                .await?;

            if needs_approval(intent.side, Some(quote.value), allowance) {
                self.notifier
                    .progress(&format!("Step: {}", TradeStep::Approving))
                    .await;

                match self
                    .approval
                    .ensure_allowance(owner, intent.payment_token, quote.value)
                    .await
                {
                    Ok(record) => approval_hash = record.map(|r| r.hash),
                    Err(e) => {
                        // Never fall through to the trade without the
                        // allowance in place; the amount stays in the form
                        // so the user can retry.
                        return Ok(TradeOutcome::failed(intent.side, amount, e.to_string()));
                    }
                }
            }
        }

        self.notifier
            .progress(&format!("Step: {}", TradeStep::Trading))
            .await;

        let call = match intent.side {
            TradeSide::Buy => ContractCall::Buy {
                asset: intent.asset,
                amount,
            },
            TradeSide::Sell => ContractCall::Sell {
                asset: intent.asset,
                amount,
            },
        };

        if let Some(reason) = self.tx_client.simulate(owner, &call).await? {
            let mut outcome = TradeOutcome::failed(
                intent.side,
                amount,
                ClientError::Simulation(reason).to_string(),
            );
            outcome.approval_hash = approval_hash;
            return Ok(outcome);
        }

        let handle = self.tx_client.submit(owner, &call).await?;
        info!("{} submitted: {}", intent.side, handle.hash);

        match self.tx_client.await_confirmation(&handle).await? {
            TxOutcome::Confirmed(receipt) => {
                let refreshed = self.refresh(owner, intent).await;
                self.notifier
                    .success(&format!("{} confirmed: {}", intent.side, receipt.hash))
                    .await;

                Ok(TradeOutcome {
                    side: intent.side,
                    amount,
                    step: TradeStep::Done,
                    hash: Some(receipt.hash),
                    approval_hash,
                    error_message: None,
                    refreshed: Some(refreshed),
                })
            }
            TxOutcome::Reverted(reason) => {
                // Refresh defensively; partial state may have changed
                let refreshed = self.refresh(owner, intent).await;

                Ok(TradeOutcome {
                    side: intent.side,
                    amount,
                    step: TradeStep::Failed,
                    hash: Some(handle.hash),
                    approval_hash,
                    error_message: Some(reason),
                    refreshed: Some(refreshed),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::{MockLedger, MockNotifier, MockTxClient};
    use crate::interactor::approval_interactor::ApprovalInteractorImpl;

    const SPENDER: Address = Address::with_last_byte(9);
    const OWNER: Address = Address::with_last_byte(1);
    const ASSET: Address = Address::with_last_byte(2);
    const PAYMENT: Address = Address::with_last_byte(3);

    fn setup() -> (Arc<MockLedger>, Arc<MockTxClient>, TradeInteractorImpl) {
        let ledger = Arc::new(MockLedger::default());
        let tx_client = Arc::new(MockTxClient::default());
        let approval = Arc::new(ApprovalInteractorImpl::new(
            ledger.clone(),
            tx_client.clone(),
            SPENDER,
        ));
        let interactor = TradeInteractorImpl::new(
            ledger.clone(),
            tx_client.clone(),
            approval,
            Arc::new(MockNotifier::default()),
            SPENDER,
            18,
        );
        (ledger, tx_client, interactor)
    }

    fn intent(side: TradeSide, amount: &str) -> TradeIntent {
        TradeIntent {
            id: 1,
            side,
            human_amount: amount.to_string(),
            asset: ASSET,
            payment_token: PAYMENT,
        }
    }

    fn quote(side: TradeSide, asset_amount: U256, value: u64) -> Quote {
        Quote {
            intent_id: 1,
            side,
            asset_amount,
            value: U256::from(value),
            fee: U256::ZERO,
            display: String::new(),
        }
    }

    fn connected_wallet() -> WalletSnapshot {
        WalletSnapshot {
            connected: true,
            address: Some(OWNER),
            chain_id: 1,
        }
    }

    #[test]
    fn test_validate_rejects_disconnected_wallet() {
        let (_, _, interactor) = setup();
        let err = interactor
            .validate(
                &WalletSnapshot::default(),
                &intent(TradeSide::Buy, "10"),
                None,
                U256::ZERO,
                U256::ZERO,
            )
            .unwrap_err();
        assert!(matches!(err, ClientError::WalletNotConnected));
    }

    #[test]
    fn test_validate_rejects_zero_and_invalid_amounts() {
        let (_, _, interactor) = setup();
        for amount in ["0", "", "abc"] {
            let err = interactor
                .validate(
                    &connected_wallet(),
                    &intent(TradeSide::Buy, amount),
                    None,
                    U256::ZERO,
                    U256::ZERO,
                )
                .unwrap_err();
            assert!(matches!(err, ClientError::InvalidAmount), "{:?}", amount);
        }
    }

    #[test]
    fn test_validate_rejects_unresolved_asset() {
        let (_, _, interactor) = setup();
        let mut bad = intent(TradeSide::Buy, "10");
        bad.asset = Address::ZERO;
        let err = interactor
            .validate(&connected_wallet(), &bad, None, U256::ZERO, U256::ZERO)
            .unwrap_err();
        assert!(matches!(err, ClientError::AssetNotResolved));
    }

    #[test]
    fn test_validate_sell_exceeding_asset_balance() {
        let (_, _, interactor) = setup();
        let sell = intent(TradeSide::Sell, "10");
        let held = parse_units("9.999999999999999999", 18).unwrap();

        let err = interactor
            .validate(&connected_wallet(), &sell, None, held, U256::ZERO)
            .unwrap_err();
        assert_eq!(err.to_string(), "Insufficient Balance");
    }

    #[test]
    fn test_validate_buy_exceeding_payment_balance() {
        let (_, _, interactor) = setup();
        let buy = intent(TradeSide::Buy, "10");
        let q = quote(TradeSide::Buy, parse_units("10", 18).unwrap(), 125_000_000);

        let err = interactor
            .validate(
                &connected_wallet(),
                &buy,
                Some(&q),
                U256::ZERO,
                U256::from(124_999_999u64),
            )
            .unwrap_err();
        assert!(matches!(err, ClientError::InsufficientBalance));
    }

    #[tokio::test]
    async fn test_buy_with_zero_allowance_approves_then_trades() {
        let (_ledger, tx_client, interactor) = setup();
        let buy = intent(TradeSide::Buy, "10");
        let asset_amount = parse_units("10", 18).unwrap();
        let q = quote(TradeSide::Buy, asset_amount, 125_000_000);

        let outcome = interactor.execute(OWNER, &buy, &q).await.unwrap();

        assert!(outcome.success());
        assert!(outcome.hash.is_some());
        assert!(outcome.approval_hash.is_some());
        assert!(outcome.refreshed.is_some());
        // Approval strictly precedes the trade, and covers the full cost
        assert_eq!(
            tx_client.submitted_calls(),
            vec![
                ContractCall::Approve {
                    token: PAYMENT,
                    spender: SPENDER,
                    amount: U256::from(125_000_000u64),
                },
                ContractCall::Buy {
                    asset: ASSET,
                    amount: asset_amount,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_buy_with_sufficient_allowance_skips_approval() {
        let (ledger, tx_client, interactor) = setup();
        ledger.set_allowance(OWNER, SPENDER, PAYMENT, U256::from(200_000_000u64));
        let buy = intent(TradeSide::Buy, "10");
        let q = quote(TradeSide::Buy, parse_units("10", 18).unwrap(), 125_000_000);

        let outcome = interactor.execute(OWNER, &buy, &q).await.unwrap();

        assert!(outcome.success());
        assert!(outcome.approval_hash.is_none());
        assert_eq!(tx_client.submitted_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_approval_failure_aborts_composite_flow() {
        let (_ledger, tx_client, interactor) = setup();
        // One-shot revert hits the approval simulation, the first call
        *tx_client.simulate_revert.lock().unwrap() = Some("paused".to_string());
        let buy = intent(TradeSide::Buy, "10");
        let q = quote(TradeSide::Buy, parse_units("10", 18).unwrap(), 125_000_000);

        let outcome = interactor.execute(OWNER, &buy, &q).await.unwrap();

        assert_eq!(outcome.step, TradeStep::Failed);
        assert!(outcome.error_message.unwrap().contains("paused"));
        // The trade itself must never have been attempted
        assert!(tx_client.submitted_calls().is_empty());
    }

    #[tokio::test]
    async fn test_sell_simulation_revert_reports_without_submitting() {
        let (ledger, tx_client, interactor) = setup();
        ledger.set_balance(OWNER, ASSET, parse_units("10", 18).unwrap());
        *tx_client.simulate_revert.lock().unwrap() = Some("below min proceeds".to_string());
        let sell = intent(TradeSide::Sell, "10");
        let q = quote(TradeSide::Sell, parse_units("10", 18).unwrap(), 125_000_000);

        let outcome = interactor.execute(OWNER, &sell, &q).await.unwrap();

        assert_eq!(outcome.step, TradeStep::Failed);
        assert!(outcome
            .error_message
            .unwrap()
            .contains("below min proceeds"));
        assert!(tx_client.submitted_calls().is_empty());
        assert!(outcome.refreshed.is_none());
    }

    #[tokio::test]
    async fn test_confirmation_revert_still_refreshes_balances() {
        let (ledger, tx_client, interactor) = setup();
        ledger.set_allowance(OWNER, SPENDER, PAYMENT, U256::from(200_000_000u64));
        ledger.set_balance(OWNER, PAYMENT, U256::from(500_000_000u64));
        *tx_client.confirm_revert.lock().unwrap() = Some("slippage".to_string());
        let buy = intent(TradeSide::Buy, "10");
        let q = quote(TradeSide::Buy, parse_units("10", 18).unwrap(), 125_000_000);

        let outcome = interactor.execute(OWNER, &buy, &q).await.unwrap();

        assert_eq!(outcome.step, TradeStep::Failed);
        assert_eq!(outcome.error_message.as_deref(), Some("slippage"));
        // Defensive refresh happened even though the trade reverted
        let refreshed = outcome.refreshed.unwrap();
        assert_eq!(refreshed.payment_balance, Some(U256::from(500_000_000u64)));
    }
}
