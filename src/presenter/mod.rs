pub mod onboarding_presenter;
pub mod trade_presenter;

pub use onboarding_presenter::{OnboardingPresenter, OnboardingPresenterImpl};
pub use trade_presenter::{TradePresenter, TradePresenterImpl};
