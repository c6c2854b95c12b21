//! Pickup-directory notifier.
//!
//! Each message becomes one RFC 5322 style text file named by a random UUID.
//! Files are written under a temporary name and renamed so readers never
//! observe partial messages.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{Notification, Notifier, NotifierError};

pub struct OutboxNotifier {
    dir: Arc<Dir>,
}

impl OutboxNotifier {
    /// Open (creating if needed) the pickup directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Delivery`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Path) -> Result<Self, NotifierError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(path, ambient_authority()))
            .map(|dir| Self { dir: Arc::new(dir) })
            .map_err(|error| {
                NotifierError::delivery(format!("outbox {}: {error}", path.display()))
            })
    }
}

fn render(notification: &Notification) -> String {
    format!(
        "To: {}\nSubject: {}\n\n{}",
        notification.recipient, notification.subject, notification.body
    )
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifierError> {
        let dir = Arc::clone(&self.dir);
        let message = render(notification);
        let name = format!("{}.eml", Uuid::new_v4().simple());
        let written = name.clone();
        tokio::task::spawn_blocking(move || {
            let partial = format!(".{name}.tmp");
            dir.write(&partial, message.as_bytes())?;
            dir.rename(&partial, &dir, &name)
        })
        .await
        .map_err(|error| NotifierError::delivery(error.to_string()))?
        .map_err(|error| NotifierError::delivery(error.to_string()))?;

        info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            file = %written,
            "notification written to outbox"
        );
        Ok(())
    }
}
