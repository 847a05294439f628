use alloy_primitives::{Address, U256};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Debounce window for quote recomputation, in milliseconds
    pub quote_debounce_ms: u64,

    /// Attempts for the post-funding balance verification loop
    pub verify_max_retries: u32,

    /// Delay between verification attempts, in seconds
    pub verify_delay_secs: u64,

    /// Interval of the background balance poll, in seconds
    pub balance_poll_secs: u64,

    /// Stablecoin balance (smallest units) that counts as funded
    pub funding_threshold: U256,

    /// Decimals of the tradeable asset tokens
    pub asset_decimals: u32,

    /// Decimals of the payment stablecoin
    pub payment_decimals: u32,

    /// Stablecoin contract address
    pub stablecoin_address: Address,

    /// Gas token address (zero means the chain's native token)
    pub gas_token_address: Address,

    /// Trading contract allowed to pull the payment token
    pub spender_address: Address,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quote_debounce_ms: 500,
            verify_max_retries: 5,
            verify_delay_secs: 2,
            balance_poll_secs: 10,
            // 10 stablecoin units at 6 decimals
            funding_threshold: U256::from(10_000_000u64),
            asset_decimals: 18,
            payment_decimals: 6,
            stablecoin_address: Address::ZERO,
            gas_token_address: Address::ZERO,
            spender_address: Address::ZERO,
        }
    }
}

impl Config {
    /// Creates a configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            quote_debounce_ms: env_u64("QUOTE_DEBOUNCE_MS", defaults.quote_debounce_ms),
            verify_max_retries: env_u32("VERIFY_MAX_RETRIES", defaults.verify_max_retries),
            verify_delay_secs: env_u64("VERIFY_DELAY_SECS", defaults.verify_delay_secs),
            balance_poll_secs: env_u64("BALANCE_POLL_SECS", defaults.balance_poll_secs),
            funding_threshold: U256::from(env_u64("FUNDING_THRESHOLD", 10_000_000)),
            asset_decimals: env_u32("ASSET_DECIMALS", defaults.asset_decimals),
            payment_decimals: env_u32("PAYMENT_DECIMALS", defaults.payment_decimals),
            stablecoin_address: env_address("STABLECOIN_ADDRESS", defaults.stablecoin_address),
            gas_token_address: env_address("GAS_TOKEN_ADDRESS", defaults.gas_token_address),
            spender_address: env_address("TRADING_CONTRACT_ADDRESS", defaults.spender_address),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_address(key: &str, default: Address) -> Address {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
