//! Kudo authoring service.
//!
//! Implements [`KudosCommand`]: validates a submission, writes the kudo and
//! its optional meme as one unit, then tells the receiver. Meme template
//! lookups and notifications are allowed to fail without blocking the write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    KudoRepository, KudosCommand, MemeTemplateSource, Notification, Notifier, UserRepository,
};
use crate::domain::service_support::{
    map_kudo_repository_error, map_user_repository_error, notify_best_effort, validation_error,
};
use crate::domain::{
    Actor, AuditStamp, CreateKudoRequest, Error, Kudo, KudoComposeOptions, KudoId, KudoMessage,
    Meme, MemeId, MemeRequest, MemeSpec, RecipientChoice, User,
};

/// Subject line of the "new kudo" notification.
pub const NEW_KUDO_SUBJECT: &str = "KudoTrio - You have a new kudo!";

/// Kudo authoring service backed by user and kudo repositories.
#[derive(Clone)]
pub struct KudoService<U, K, M, N> {
    users: Arc<U>,
    kudos: Arc<K>,
    memes: Arc<M>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<U, K, M, N> KudoService<U, K, M, N> {
    pub fn new(
        users: Arc<U>,
        kudos: Arc<K>,
        memes: Arc<M>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            kudos,
            memes,
            notifier,
            clock,
        }
    }
}

impl<U, K, M, N> KudoService<U, K, M, N>
where
    U: UserRepository,
    K: KudoRepository,
    M: MemeTemplateSource,
    N: Notifier,
{
    fn parse_meme(meme: Option<MemeRequest>) -> Result<Option<MemeSpec>, Error> {
        meme.map(|raw| {
            MemeSpec::new(raw.template_id, raw.top_text, raw.bottom_text)
                .map_err(|err| validation_error("meme", "invalid_meme", err.to_string()))
        })
        .transpose()
    }

    async fn load_receiver(
        &self,
        actor: &Actor,
        request: &CreateKudoRequest,
    ) -> Result<User, Error> {
        let Some(receiver_id) = request.receiver_id else {
            return Err(validation_error(
                "receiver_id",
                "no_selection",
                "Please select a user",
            ));
        };
        if receiver_id == actor.user_id {
            return Err(validation_error(
                "receiver_id",
                "self_kudo",
                "you cannot send a kudo to yourself",
            ));
        }
        let receiver = self
            .users
            .find_by_id(&receiver_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| {
                validation_error(
                    "receiver_id",
                    "unknown_receiver",
                    "the selected user does not exist",
                )
            })?;
        if !receiver.is_active() {
            return Err(validation_error(
                "receiver_id",
                "inactive_receiver",
                "the selected user is no longer active",
            ));
        }
        Ok(receiver)
    }

    fn new_kudo_notification(sender: &User, receiver: &User, kudo: &Kudo) -> Notification {
        let mut body = format!(
            "Hi {},\n\n{} sent you a kudo:\n\n{}\n",
            receiver.first_name,
            sender.profile().display_name(),
            kudo.message,
        );
        if let Some(meme) = &kudo.meme {
            body.push_str(&format!("\n{}\n", meme.image_url));
        }
        Notification {
            recipient: receiver.email.clone(),
            subject: NEW_KUDO_SUBJECT.to_owned(),
            body,
        }
    }
}

#[async_trait]
impl<U, K, M, N> KudosCommand for KudoService<U, K, M, N>
where
    U: UserRepository,
    K: KudoRepository,
    M: MemeTemplateSource,
    N: Notifier,
{
    async fn compose_options(&self, actor: &Actor) -> Result<KudoComposeOptions, Error> {
        let recipients = self
            .users
            .list_active_except(&actor.user_id)
            .await
            .map_err(map_user_repository_error)?
            .into_iter()
            .map(|profile| RecipientChoice {
                id: profile.id,
                display_name: profile.display_name(),
            })
            .collect();

        let templates = match self.memes.list_templates().await {
            Ok(templates) => templates,
            Err(error) => {
                warn!(%error, "meme templates unavailable; offering none");
                Vec::new()
            }
        };

        Ok(KudoComposeOptions {
            recipients,
            templates,
        })
    }

    async fn create_kudo(&self, actor: &Actor, request: CreateKudoRequest) -> Result<Kudo, Error> {
        let receiver = self.load_receiver(actor, &request).await?;
        let CreateKudoRequest { message, meme, .. } = request;
        let message = KudoMessage::new(message)
            .map_err(|err| validation_error("message", "invalid_message", err.to_string()))?;
        let meme = Self::parse_meme(meme)?;

        let sender = self
            .users
            .find_by_id(&actor.user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthorized("login required"))?;

        let now = self.clock.utc();
        let id = KudoId::random();
        let kudo = Kudo {
            id,
            sender_id: sender.id,
            receiver_id: receiver.id,
            message,
            meme: meme.map(|spec| Meme {
                id: MemeId::random(),
                kudo_id: id,
                image_url: self.memes.build_image_url(&spec),
                spec,
            }),
            audit: AuditStamp::created(now, Some(sender.id)),
        };

        self.kudos
            .insert(&kudo)
            .await
            .map_err(map_kudo_repository_error)?;
        info!(kudo_id = %kudo.id, sender = %sender.id, receiver = %receiver.id, "kudo created");

        notify_best_effort(
            self.notifier.as_ref(),
            Self::new_kudo_notification(&sender, &receiver, &kudo),
        )
        .await;
        Ok(kudo)
    }
}

#[cfg(test)]
#[path = "kudo_service_tests.rs"]
mod tests;
