//! Authenticated-user extractor
//!
//! Identity lives in an external gateway; by the time a request reaches
//! this service the authenticated user id travels in the `x-user-id`
//! header. Handlers that need it take [`CurrentUser`] as an argument.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::core::ServerState;
use crate::utils::AppError;

/// The authenticated user id supplied by the gateway
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match user_id {
            Some(id) => {
                let user = CurrentUser(id.to_string());
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            None => Err(AppError::invalid_request(
                "Missing x-user-id header; requests must arrive through the authenticating gateway",
            )),
        }
    }
}
