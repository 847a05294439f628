//! Hand-rolled collaborator mocks shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::sleep;

use crate::chain::{
    ContractCall, LedgerReader, NotificationSink, QuoteReading, Receipt, TransactionClient,
    TxHandle, TxOutcome, WalletSession, WalletSnapshot,
};
use crate::entity::TradeSide;

type BalanceKey = (Address, Address);
type AllowanceKey = (Address, Address, Address);

#[derive(Default)]
pub(crate) struct MockLedger {
    balances: Mutex<HashMap<BalanceKey, U256>>,
    balance_scripts: Mutex<HashMap<BalanceKey, VecDeque<U256>>>,
    allowances: Mutex<HashMap<AllowanceKey, U256>>,
    quotes: Mutex<VecDeque<(Duration, Result<QuoteReading, String>)>>,
    pub balance_reads: AtomicU64,
    pub quote_reads: AtomicU64,
}

impl MockLedger {
    pub fn set_balance(&self, owner: Address, token: Address, amount: U256) {
        self.balances.lock().unwrap().insert((owner, token), amount);
    }

    /// Scripts successive `read_balance` results for one (owner, token) pair;
    /// once exhausted, reads fall back to `set_balance` state.
    pub fn script_balance(&self, owner: Address, token: Address, values: Vec<U256>) {
        self.balance_scripts
            .lock()
            .unwrap()
            .insert((owner, token), values.into());
    }

    pub fn set_allowance(&self, owner: Address, spender: Address, token: Address, amount: U256) {
        self.allowances
            .lock()
            .unwrap()
            .insert((owner, spender, token), amount);
    }

    /// Queues one quote response, delivered after `delay`.
    pub fn push_quote(&self, delay: Duration, reading: QuoteReading) {
        self.quotes.lock().unwrap().push_back((delay, Ok(reading)));
    }

    pub fn push_quote_err(&self, delay: Duration, message: &str) {
        self.quotes
            .lock()
            .unwrap()
            .push_back((delay, Err(message.to_string())));
    }
}

#[async_trait]
impl LedgerReader for MockLedger {
    async fn read_balance(&self, owner: Address, token: Address) -> Result<U256> {
        self.balance_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(script) = self.balance_scripts.lock().unwrap().get_mut(&(owner, token)) {
            if let Some(value) = script.pop_front() {
                return Ok(value);
            }
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&(owner, token))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn read_allowance(
        &self,
        owner: Address,
        spender: Address,
        token: Address,
    ) -> Result<U256> {
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&(owner, spender, token))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn read_quote(
        &self,
        _asset: Address,
        _side: TradeSide,
        amount: U256,
    ) -> Result<QuoteReading> {
        self.quote_reads.fetch_add(1, Ordering::SeqCst);
        let next = self.quotes.lock().unwrap().pop_front();
        match next {
            Some((delay, result)) => {
                sleep(delay).await;
                result.map_err(|m| anyhow!(m))
            }
            // No scripted response: price 1:1 so tests without quote
            // choreography still get a deterministic answer.
            None => Ok(QuoteReading {
                amount,
                fee: U256::ZERO,
            }),
        }
    }
}

#[derive(Default)]
pub(crate) struct MockTxClient {
    pub simulated: Mutex<Vec<ContractCall>>,
    pub submitted: Mutex<Vec<ContractCall>>,
    /// One-shot: the next `simulate` reports this revert reason.
    pub simulate_revert: Mutex<Option<String>>,
    /// One-shot: the next `await_confirmation` reports this revert reason.
    pub confirm_revert: Mutex<Option<String>>,
    /// One-shot: the next `submit` fails at the transport level.
    pub submit_error: Mutex<Option<String>>,
    hash_counter: AtomicU64,
}

impl MockTxClient {
    pub fn submitted_calls(&self) -> Vec<ContractCall> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionClient for MockTxClient {
    async fn simulate(&self, _from: Address, call: &ContractCall) -> Result<Option<String>> {
        self.simulated.lock().unwrap().push(call.clone());
        Ok(self.simulate_revert.lock().unwrap().take())
    }

    async fn submit(&self, _from: Address, call: &ContractCall) -> Result<TxHandle> {
        if let Some(message) = self.submit_error.lock().unwrap().take() {
            return Err(anyhow!(message));
        }
        self.submitted.lock().unwrap().push(call.clone());
        let n = self.hash_counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TxHandle {
            hash: B256::from(U256::from(n)),
        })
    }

    async fn await_confirmation(&self, handle: &TxHandle) -> Result<TxOutcome> {
        match self.confirm_revert.lock().unwrap().take() {
            Some(reason) => Ok(TxOutcome::Reverted(reason)),
            None => Ok(TxOutcome::Confirmed(Receipt {
                hash: handle.hash,
                block_number: 1,
            })),
        }
    }
}

pub(crate) struct MockWallet {
    tx: watch::Sender<WalletSnapshot>,
}

impl MockWallet {
    pub fn new(snapshot: WalletSnapshot) -> Self {
        let (tx, _) = watch::channel(snapshot);
        Self { tx }
    }

    pub fn connected(address: Address) -> Self {
        Self::new(WalletSnapshot {
            connected: true,
            address: Some(address),
            chain_id: 1,
        })
    }

    pub fn set(&self, snapshot: WalletSnapshot) {
        self.tx.send_replace(snapshot);
    }
}

impl WalletSession for MockWallet {
    fn snapshot(&self) -> WalletSnapshot {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<WalletSnapshot> {
        self.tx.subscribe()
    }
}

#[derive(Default)]
pub(crate) struct MockNotifier {
    pub messages: Mutex<Vec<(String, String)>>,
}

impl MockNotifier {
    pub fn contains(&self, kind: &str, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|(k, m)| k == kind && m.contains(needle))
    }

    pub fn count(&self, kind: &str) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == kind)
            .count()
    }
}

#[async_trait]
impl NotificationSink for MockNotifier {
    async fn success(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(("success".into(), message.into()));
    }

    async fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(("error".into(), message.into()));
    }

    async fn progress(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(("progress".into(), message.into()));
    }
}
