//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    error::ApiError,
    jwt::TokenClaims,
    middleware::auth_middleware,
    models::{
        ChangePasswordRequest, ListClaimsQuery, SignInRequest, SignUpRequest, UpdateUserRequest,
    },
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users/me", get(get_me).put(update_me).patch(update_me))
        .route("/users/password", put(change_password).post(change_password))
        .route("/users/claims", get(list_my_claims))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gruff-api"
    }))
}

/// User signup endpoint
pub async fn sign_up(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<SignUpRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.accounts.sign_up(payload).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// User signin endpoint
pub async fn sign_in(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<SignInRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.accounts.sign_in(payload).await?;

    Ok(Json(response))
}

/// Change the caller's password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
    WithRejection(Json(payload), _): WithRejection<Json<ChangePasswordRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.change_password(&identity, payload).await?;

    Ok(Json(user))
}

/// Get the caller's record
pub async fn get_me(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.get_me(&identity).await?;

    Ok(Json(user))
}

/// Update the caller's record
pub async fn update_me(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.update_me(&identity, payload).await?;

    Ok(Json(user))
}

/// List claims created by the caller
pub async fn list_my_claims(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
    WithRejection(Query(query), _): WithRejection<Query<ListClaimsQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.accounts.list_my_claims(&identity, query).await?;

    Ok(Json(listing))
}
