//! Authentication middleware for bearer token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Validate the bearer token and expose its claims to handlers
///
/// On success the [`TokenClaims`](crate::jwt::TokenClaims) are inserted into
/// the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
        debug!("Request without a bearer token");
        ApiError::unauthorized()
    })?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            debug!("Failed to validate token: {}", e);
            ApiError::unauthorized()
        })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
