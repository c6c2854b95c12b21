//! Outbound notification port.
//!
//! Delivery is best effort. Callers log failures and never undo the data
//! write that triggered the message.
use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification adapters.
    pub enum NotifierError {
        /// The message could not be handed to the delivery channel.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

/// A message addressed to one user.
#[derive(Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: EmailAddress,
    pub subject: String,
    pub body: String,
}

impl std::fmt::Debug for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Bodies may carry temporary passwords.
        f.debug_struct("Notification")
            .field("recipient", &self.recipient)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifierError>;
}
