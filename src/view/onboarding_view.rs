use crate::entity::ReadinessStage;
use alloy_primitives::TxHash;
use anyhow::Result;
use async_trait::async_trait;

/// Implemented by the onboarding shell that decides which setup step to show.
#[async_trait]
pub trait OnboardingView: Send + Sync {
    async fn display_stage(&self, stage: ReadinessStage) -> Result<()>;

    async fn display_funding_submitted(&self, hash: &TxHash) -> Result<()>;

    async fn display_funding_verified(&self) -> Result<()>;

    /// The funding operation itself succeeded; only the balance check timed
    /// out. The copy shown here must not read as a failed funding.
    async fn display_verification_timeout(&self) -> Result<()>;
}
