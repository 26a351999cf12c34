//! Account operations behind the HTTP handlers
//!
//! Every operation takes its request data and, where needed, the caller's
//! verified token claims, and answers with a result or an [`ApiError`].

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    jwt::{JwtService, TokenClaims},
    models::{
        AuthResponse, ChangePasswordRequest, ClaimListing, ClaimPage, ListClaimsQuery, NewUser,
        SignInRequest, SignUpRequest, UpdateUserRequest, User,
    },
    password,
    repositories::{ClaimRepository, UserRepository},
    validation::{validate_email, validate_password, validate_username},
};

/// Account service
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    claims: Arc<dyn ClaimRepository>,
    jwt_service: JwtService,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        claims: Arc<dyn ClaimRepository>,
        jwt_service: JwtService,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            claims,
            jwt_service,
            bcrypt_cost,
        }
    }

    /// Create an account and hand back a session token
    pub async fn sign_up(&self, request: SignUpRequest) -> ApiResult<AuthResponse> {
        info!("Signup attempt for user: {}", request.username);

        validate_username(&request.username).map_err(ApiError::Server)?;
        validate_email(&request.email).map_err(ApiError::Server)?;
        validate_password(&request.password).map_err(ApiError::Server)?;

        let password_hash = password::hash_password(request.password, self.bcrypt_cost)
            .await
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                ApiError::internal()
            })?;

        let new_user = NewUser {
            name: request.name,
            username: request.username,
            email: request.email,
            image: request.image,
            password_hash,
        };

        let user = self.users.create(&new_user).await.map_err(|e| {
            error!("Failed to create user {}: {}", new_user.username, e);
            ApiError::internal()
        })?;

        let token = self.jwt_service.token_for_user(&user).map_err(|e| {
            error!("Failed to generate token: {}", e);
            ApiError::unauthorized()
        })?;

        Ok(AuthResponse { user, token })
    }

    /// Exchange an email or username plus password for a session token
    ///
    /// Every failure answers with the same unauthorized error so callers
    /// cannot tell an unknown account from a wrong password.
    pub async fn sign_in(&self, request: SignInRequest) -> ApiResult<AuthResponse> {
        let lookup = if !request.email.is_empty() {
            info!("Signin attempt for email: {}", request.email);
            self.users.find_by_email(&request.email).await
        } else if !request.username.is_empty() {
            info!("Signin attempt for username: {}", request.username);
            self.users.find_by_username(&request.username).await
        } else {
            warn!("Signin attempt without an identifier");
            return Err(ApiError::unauthorized());
        };

        let user = lookup
            .map_err(|e| {
                error!("Failed to look up user for signin: {}", e);
                ApiError::unauthorized()
            })?
            .ok_or_else(ApiError::unauthorized)?;

        if !password::verify_password(request.password, user.hashed_password.clone()).await {
            warn!("Signin failed for user: {}", user.id);
            return Err(ApiError::unauthorized());
        }

        let token = self.jwt_service.token_for_user(&user).map_err(|e| {
            error!("Failed to generate token: {}", e);
            ApiError::unauthorized()
        })?;

        Ok(AuthResponse { user, token })
    }

    /// Replace the caller's password after checking the old one
    ///
    /// A wrong old password is reported as not found.
    pub async fn change_password(
        &self,
        identity: &TokenClaims,
        request: ChangePasswordRequest,
    ) -> ApiResult<User> {
        info!("Password change for user: {}", identity.id);

        let mut user = self.load_caller(identity).await?;

        if !password::verify_password(request.old_password, user.hashed_password.clone()).await {
            warn!("Old password mismatch for user: {}", identity.id);
            return Err(ApiError::not_found());
        }

        validate_password(&request.new_password).map_err(ApiError::Server)?;

        user.hashed_password = password::hash_password(request.new_password, self.bcrypt_cost)
            .await
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                ApiError::internal()
            })?;

        self.users.save(&user).await.map_err(|e| {
            error!("Failed to save user {}: {}", identity.id, e);
            ApiError::internal()
        })
    }

    /// The caller's own record
    pub async fn get_me(&self, identity: &TokenClaims) -> ApiResult<User> {
        self.load_caller(identity).await
    }

    /// Apply a partial profile update to the caller's record
    pub async fn update_me(
        &self,
        identity: &TokenClaims,
        request: UpdateUserRequest,
    ) -> ApiResult<User> {
        let mut user = self.load_caller(identity).await?;

        if let Some(username) = &request.username {
            validate_username(username).map_err(ApiError::Server)?;
        }
        if let Some(email) = &request.email {
            validate_email(email).map_err(ApiError::Server)?;
        }

        request.apply_to(&mut user);

        self.users.save(&user).await.map_err(|e| {
            error!("Failed to update user {}: {}", identity.id, e);
            ApiError::internal()
        })
    }

    /// Claims created by the caller, as a bare list or a counted page
    pub async fn list_my_claims(
        &self,
        identity: &TokenClaims,
        query: ListClaimsQuery,
    ) -> ApiResult<ClaimListing> {
        let paging = query.paging();

        let mut claims = self
            .claims
            .list_by_creator(identity.id, &paging)
            .await
            .map_err(|e| {
                error!("Failed to list claims for user {}: {}", identity.id, e);
                ApiError::internal()
            })?;

        if query.wants_join("creator") {
            let creator = self.load_caller(identity).await?;
            for claim in &mut claims {
                claim.created_by = Some(creator.clone());
            }
        }

        if !query.is_paged() {
            return Ok(ClaimListing::List(claims));
        }

        let ct = self
            .claims
            .count_by_creator(identity.id)
            .await
            .map_err(|e| {
                error!("Failed to count claims for user {}: {}", identity.id, e);
                ApiError::internal()
            })?;

        Ok(ClaimListing::Page(ClaimPage {
            ct,
            start: paging.offset,
            limit: paging.limit,
            results: claims,
        }))
    }

    /// The record behind a token; a token whose user is gone is a server error
    async fn load_caller(&self, identity: &TokenClaims) -> ApiResult<User> {
        self.users
            .find_by_id(identity.id)
            .await
            .map_err(|e| {
                error!("Failed to load user {}: {}", identity.id, e);
                ApiError::internal()
            })?
            .ok_or_else(|| ApiError::Server(format!("User {} does not exist", identity.id)))
    }
}
