use alloy_primitives::Address;
use serde::Serialize;
use tokio::sync::watch;

/// Point-in-time view of the wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WalletSnapshot {
    pub connected: bool,
    pub address: Option<Address>,
    pub chain_id: u64,
}

impl WalletSnapshot {
    /// Address if and only if the session is connected.
    pub fn connected_address(&self) -> Option<Address> {
        if self.connected {
            self.address
        } else {
            None
        }
    }
}

/// Wallet session provider. Connection UI is external; this crate only
/// observes address, connection status and chain id.
pub trait WalletSession: Send + Sync {
    fn snapshot(&self) -> WalletSnapshot;

    /// Change notifications for connect/disconnect/address switch.
    fn subscribe(&self) -> watch::Receiver<WalletSnapshot>;
}
