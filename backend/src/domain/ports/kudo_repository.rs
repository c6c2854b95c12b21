//! Port abstraction for writing kudos.
use async_trait::async_trait;

use crate::domain::Kudo;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by kudo repository adapters.
    pub enum KudoRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "kudo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "kudo repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KudoRepository: Send + Sync {
    /// Insert a kudo together with its meme, if any, as one unit.
    async fn insert(&self, kudo: &Kudo) -> Result<(), KudoRepositoryError>;
}
