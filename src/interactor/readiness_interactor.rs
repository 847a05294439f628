use crate::chain::WalletSnapshot;
use crate::entity::{ReadinessFacts, ReadinessStage};
use alloy_primitives::{Address, U256};
use log::debug;

/// Pure derivation of the onboarding stage from observed facts. Idempotent:
/// recomputing any number of times, in any order of fact arrival, yields the
/// same stage. Regression (e.g. a wallet switch to an empty address) falls
/// out for free because nothing is stored.
pub fn derive_stage(facts: &ReadinessFacts, threshold: U256) -> ReadinessStage {
    if !facts.wallet_connected {
        return ReadinessStage::ConnectWallet;
    }

    match facts.gas_balance {
        // Connected but the gas check has not completed: the handshake is
        // still settling, keep the connect stage rather than flashing a
        // funding prompt off no data
        None => ReadinessStage::ConnectWallet,
        Some(gas) if gas.is_zero() => ReadinessStage::AcquireGasToken,
        Some(_) => {
            if facts.funding_attempted {
                return ReadinessStage::Ready;
            }
            match facts.stable_balance {
                Some(stable) if stable >= threshold => ReadinessStage::Ready,
                // Unobserved counts as unfunded until proven otherwise
                _ => ReadinessStage::AcquireStablecoin,
            }
        }
    }
}

/// Holds the observed facts for the current wallet address. Observations are
/// keyed by address: anything reported for a previous address is dropped, so
/// in-flight checks from before a wallet switch cannot corrupt the stage.
pub struct ReadinessTracker {
    address: Option<Address>,
    facts: ReadinessFacts,
    threshold: U256,
}

impl ReadinessTracker {
    pub fn new(threshold: U256) -> Self {
        Self {
            address: None,
            facts: ReadinessFacts::default(),
            threshold,
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn facts(&self) -> ReadinessFacts {
        self.facts
    }

    /// Applies a wallet session change. An address change (or disconnect)
    /// voids every observation made for the previous address.
    pub fn wallet_changed(&mut self, snapshot: &WalletSnapshot) {
        let current = snapshot.connected_address();
        if current != self.address {
            debug!("Wallet changed, resetting readiness observations");
            self.facts = ReadinessFacts::default();
            self.address = current;
        }
        self.facts.wallet_connected = current.is_some();
    }

    pub fn record_gas_balance(&mut self, address: Address, balance: U256) {
        if Some(address) == self.address {
            self.facts.gas_balance = Some(balance);
        }
    }

    pub fn record_stable_balance(&mut self, address: Address, balance: U256) {
        if Some(address) == self.address {
            self.facts.stable_balance = Some(balance);
        }
    }

    /// Records that a funding action completed this session. Once set, the
    /// stablecoin gate stays open even if the balance read lags.
    pub fn record_funding_attempt(&mut self, address: Address) {
        if Some(address) == self.address {
            self.facts.funding_attempted = true;
        }
    }

    pub fn stage(&self) -> ReadinessStage {
        derive_stage(&self.facts, self.threshold)
    }
}
