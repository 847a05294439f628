use alloy_primitives::U256;
use serde::Serialize;

/// Onboarding gate stages. Never stored as independent truth; always
/// recomputed from [`ReadinessFacts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadinessStage {
    ConnectWallet,
    AcquireGasToken,
    AcquireStablecoin,
    Ready,
}

impl std::fmt::Display for ReadinessStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReadinessStage::ConnectWallet => "connect wallet",
            ReadinessStage::AcquireGasToken => "acquire gas token",
            ReadinessStage::AcquireStablecoin => "acquire stablecoin",
            ReadinessStage::Ready => "ready",
        };
        write!(f, "{}", s)
    }
}

/// Externally observed facts the readiness stage is derived from.
/// `None` balances mean the check has not completed for the current address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReadinessFacts {
    pub wallet_connected: bool,
    pub gas_balance: Option<U256>,
    pub stable_balance: Option<U256>,
    pub funding_attempted: bool,
}
