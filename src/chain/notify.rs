use async_trait::async_trait;

/// Toast-style side channel for user-facing messages. Rendering is external;
/// the orchestrator only emits.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn success(&self, message: &str);
    async fn error(&self, message: &str);
    async fn progress(&self, message: &str);
}
