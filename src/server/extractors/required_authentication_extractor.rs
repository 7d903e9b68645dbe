use axum::Extension;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::server::error::Error;
use crate::server::services::app_services::AppServices;

/// the user id from a valid bearer token, plus the services so handlers don't need a second
/// extractor for them
pub struct RequiredAuthentication(pub String, pub AppServices);

/// pulls the token out of `Authorization: Bearer <token>`
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for RequiredAuthentication
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(services): Extension<AppServices> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|err| Error::InternalServerErrorWithContext(err.to_string()))?;

        let token = bearer_token(parts).ok_or_else(|| {
            debug!("request without bearer token");
            Error::Unauthorized
        })?;

        let user_id = services
            .token_util
            .verify_token(token)
            .ok_or(Error::Unauthorized)?;

        Ok(RequiredAuthentication(user_id, services))
    }
}
