pub mod onboarding_view;
pub mod trade_view;

pub use onboarding_view::OnboardingView;
pub use trade_view::{TradeScreenState, TradeView};
