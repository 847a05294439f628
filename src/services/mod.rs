pub mod balance_poll_service;

pub use balance_poll_service::BalancePollService;
