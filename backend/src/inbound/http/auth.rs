//! Caller resolution for protected handlers.
//!
//! Handlers call [`current_actor`] first; it turns the session's user id into
//! a domain [`Actor`] through the account service.

use crate::domain::{Actor, ErrorCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the logged-in caller.
///
/// A session pointing at a missing or deactivated account is purged so the
/// stale cookie is not presented again.
pub async fn current_actor(state: &HttpState, session: &SessionContext) -> ApiResult<Actor> {
    let user_id = session.require_user_id()?;
    match state.accounts.actor_for(&user_id).await {
        Ok(actor) => Ok(actor),
        Err(error) => {
            if error.code() == ErrorCode::Unauthorized {
                session.sign_out();
            }
            Err(error)
        }
    }
}
