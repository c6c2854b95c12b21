//! Driving port for composing and sending kudos.
use async_trait::async_trait;

use crate::domain::{Actor, CreateKudoRequest, Error, Kudo, KudoComposeOptions};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KudosCommand: Send + Sync {
    /// Recipient and meme template choices for `actor`.
    ///
    /// An unavailable meme service yields an empty template list.
    async fn compose_options(&self, actor: &Actor) -> Result<KudoComposeOptions, Error>;

    /// Validate and persist a kudo from `actor`, then notify the receiver.
    async fn create_kudo(&self, actor: &Actor, request: CreateKudoRequest) -> Result<Kudo, Error>;
}
