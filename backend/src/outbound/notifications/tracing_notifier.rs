use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{Notification, Notifier, NotifierError};

/// Logs each notification. Bodies are omitted because they may carry
/// credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifierError> {
        info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            body_len = notification.body.len(),
            "notification dispatched"
        );
        Ok(())
    }
}
