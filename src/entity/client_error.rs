#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Insufficient Balance")]
    InsufficientBalance,

    #[error("Asset address not resolved")]
    AssetNotResolved,

    #[error("Simulation reverted: {0}")]
    Simulation(String),

    #[error("Transaction failed: {0}")]
    Confirmation(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Balance not verified after {attempts} attempts")]
    VerificationTimeout { attempts: u32 },
}
