//! Typed access to the cookie session.
//!
//! The cookie carries a [`SessionIdentity`] and nothing else. Role and
//! status are re-read from the account service on every request, so a
//! demoted or deactivated user loses access without a new cookie.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Error, UserId};

const IDENTITY_KEY: &str = "identity";

/// What a signed-in session remembers about its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: UserId,
}

/// Extractor wrapping the Actix session with sign-in semantics.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Bind the session to `user_id`.
    ///
    /// The session id is renewed first so a cookie issued before login
    /// cannot be fixed onto the new identity.
    pub fn sign_in(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(IDENTITY_KEY, SessionIdentity { user_id: *user_id })
            .map_err(|error| Error::internal(format!("failed to write session: {error}")))
    }

    /// Forget the identity and expire the cookie.
    pub fn sign_out(&self) {
        self.0.purge();
    }

    /// The identity stored in the cookie.
    ///
    /// A cookie that decrypts but does not hold a readable identity is
    /// treated as signed out.
    pub fn identity(&self) -> Option<SessionIdentity> {
        match self.0.get::<SessionIdentity>(IDENTITY_KEY) {
            Ok(identity) => identity,
            Err(error) => {
                warn!(%error, "discarding unreadable session identity");
                None
            }
        }
    }

    /// The signed-in user's id, or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.identity()
            .map(|identity| identity.user_id)
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(SessionContext) })
    }
}
