#![allow(dead_code)]

//! Test infrastructure for API tests: in-memory stores and request helpers

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use gruff_api::{
    AppState, create_router,
    jwt::{JwtConfig, JwtService},
    models::{Claim, NewUser, Paging, User},
    repositories::{ClaimRepository, UserRepository},
    service::AccountService,
};

/// Cheapest cost bcrypt accepts
pub const TEST_BCRYPT_COST: u32 = 4;

/// In-memory user store enforcing unique usernames and emails
#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<Vec<User>>,
}

impl MemoryUsers {
    pub fn stored(&self, id: i64) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();

        if users
            .iter()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(anyhow!("duplicate key value violates unique constraint"));
        }

        let now = Utc::now();
        let user = User {
            id: users.len() as i64 + 1,
            name: new_user.name.clone(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            image: new_user.image.clone(),
            hashed_password: new_user.password_hash.clone(),
            curator: false,
            admin: false,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.stored(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn save(&self, user: &User) -> Result<User> {
        let mut users = self.users.lock().unwrap();

        if users
            .iter()
            .any(|u| u.id != user.id && (u.username == user.username || u.email == user.email))
        {
            return Err(anyhow!("duplicate key value violates unique constraint"));
        }

        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| anyhow!("no rows returned"))?;
        *slot = User {
            updated_at: Utc::now(),
            ..user.clone()
        };

        Ok(slot.clone())
    }
}

/// In-memory claim store
#[derive(Default)]
pub struct MemoryClaims {
    claims: Mutex<Vec<Claim>>,
}

impl MemoryClaims {
    /// Insert a claim created `age_minutes` ago by `creator_id`
    pub fn seed(&self, creator_id: i64, title: &str, age_minutes: i64) -> Uuid {
        let at = Utc::now() - Duration::minutes(age_minutes);
        let claim = Claim {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{} (description)", title),
            created_by_id: creator_id,
            created_by: None,
            created_at: at,
            updated_at: at,
        };
        let id = claim.id;
        self.claims.lock().unwrap().push(claim);
        id
    }
}

#[async_trait]
impl ClaimRepository for MemoryClaims {
    async fn list_by_creator(&self, creator_id: i64, paging: &Paging) -> Result<Vec<Claim>> {
        let mut claims: Vec<Claim> = self
            .claims
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.created_by_id == creator_id)
            .cloned()
            .collect();
        claims.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let limit = paging.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(claims
            .into_iter()
            .skip(paging.offset as usize)
            .take(limit)
            .collect())
    }

    async fn count_by_creator(&self, creator_id: i64) -> Result<i64> {
        let claims = self.claims.lock().unwrap();
        Ok(claims.iter().filter(|c| c.created_by_id == creator_id).count() as i64)
    }
}

/// Stores plus the state and service built on them
pub struct TestContext {
    pub users: Arc<MemoryUsers>,
    pub claims: Arc<MemoryClaims>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_jwt(JwtConfig::default())
    }

    pub fn with_jwt(jwt_config: JwtConfig) -> Self {
        let users = Arc::new(MemoryUsers::default());
        let claims = Arc::new(MemoryClaims::default());
        let jwt_service = JwtService::new(jwt_config).expect("valid jwt config");
        let state = AppState::new(
            users.clone(),
            claims.clone(),
            jwt_service,
            TEST_BCRYPT_COST,
        );

        Self {
            users,
            claims,
            state,
        }
    }

    pub fn service(&self) -> &AccountService {
        &self.state.accounts
    }

    pub fn app(&self) -> Router {
        create_router(self.state.clone())
    }
}

/// Send one request through a fresh router and decode the JSON reply
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, json)
}

/// Sign up `username` with `password` and return (user id, token)
pub async fn sign_up(ctx: &TestContext, username: &str, password: &str) -> (i64, String) {
    let (status, json) = send(
        ctx.app(),
        "POST",
        "/auth/signup",
        None,
        Some(serde_json::json!({
            "name": format!("{} name", username),
            "username": username,
            "email": format!("{}@example.com", username),
            "img": format!("{}.png", username),
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", json);

    let id = json["user"]["id"].as_i64().unwrap();
    let token = json["token"].as_str().unwrap().to_string();
    (id, token)
}
