//! Tests for AccountService called directly, without HTTP
mod common;

use crate::common::TestContext;

use gruff_api::{
    error::ApiError,
    jwt::TokenClaims,
    models::{
        ChangePasswordRequest, ClaimListing, ListClaimsQuery, SignInRequest, SignUpRequest,
        UpdateUserRequest,
    },
    password::verify_password,
};

fn sign_up_request(username: &str, password: &str) -> SignUpRequest {
    SignUpRequest {
        name: username.to_uppercase(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        image: String::new(),
        password: password.to_string(),
    }
}

async fn identity(ctx: &TestContext, username: &str, password: &str) -> TokenClaims {
    let response = ctx
        .service()
        .sign_up(sign_up_request(username, password))
        .await
        .unwrap();

    ctx.state.jwt_service.validate_token(&response.token).unwrap()
}

#[tokio::test]
async fn test_sign_up_stores_hash_that_verifies() {
    let ctx = TestContext::new();

    for (username, password) in [("hume", "is-ought"), ("locke", "tabula rasa"), ("mill", "ü")] {
        let response = ctx
            .service()
            .sign_up(sign_up_request(username, password))
            .await
            .unwrap();
        let stored = ctx.users.stored(response.user.id).unwrap();

        assert_ne!(stored.hashed_password, password);
        assert!(verify_password(password.to_string(), stored.hashed_password).await);
    }
}

#[tokio::test]
async fn test_sign_in_prefers_email_over_username() {
    let ctx = TestContext::new();
    ctx.service()
        .sign_up(sign_up_request("hobbes", "leviathan"))
        .await
        .unwrap();
    ctx.service()
        .sign_up(sign_up_request("rousseau", "social-contract"))
        .await
        .unwrap();

    let response = ctx
        .service()
        .sign_in(SignInRequest {
            email: "hobbes@example.com".to_string(),
            username: "rousseau".to_string(),
            password: "leviathan".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.user.username, "hobbes");
}

#[tokio::test]
async fn test_sign_in_failures_share_one_error() {
    let ctx = TestContext::new();
    ctx.service()
        .sign_up(sign_up_request("spinoza", "ethics"))
        .await
        .unwrap();

    let wrong_password = ctx
        .service()
        .sign_in(SignInRequest {
            username: "spinoza".to_string(),
            password: "morals".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    let unknown = ctx
        .service()
        .sign_in(SignInRequest {
            email: "nobody@example.com".to_string(),
            password: "ethics".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(wrong_password, ApiError::unauthorized());
    assert_eq!(wrong_password, unknown);
}

#[tokio::test]
async fn test_change_password_swaps_which_password_verifies() {
    let ctx = TestContext::new();
    let me = identity(&ctx, "descartes", "cogito").await;

    let user = ctx
        .service()
        .change_password(
            &me,
            ChangePasswordRequest {
                email: String::new(),
                old_password: "cogito".to_string(),
                new_password: "ergo-sum".to_string(),
            },
        )
        .await
        .unwrap();

    let stored = ctx.users.stored(user.id).unwrap();
    assert!(!verify_password("cogito".to_string(), stored.hashed_password.clone()).await);
    assert!(verify_password("ergo-sum".to_string(), stored.hashed_password).await);
}

#[tokio::test]
async fn test_change_password_with_wrong_old_password() {
    let ctx = TestContext::new();
    let me = identity(&ctx, "leibniz", "monads").await;
    let before = ctx.users.stored(me.id).unwrap().hashed_password;

    let err = ctx
        .service()
        .change_password(
            &me,
            ChangePasswordRequest {
                email: String::new(),
                old_password: "calculus".to_string(),
                new_password: "best-world".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::not_found());
    assert_eq!(ctx.users.stored(me.id).unwrap().hashed_password, before);
}

#[tokio::test]
async fn test_vanished_user_is_a_server_error() {
    let ctx = TestContext::new();
    let mut me = identity(&ctx, "berkeley", "esse-est").await;
    me.id = 999;
    let missing = ApiError::Server("User 999 does not exist".to_string());

    assert_eq!(ctx.service().get_me(&me).await.unwrap_err(), missing);
    assert_eq!(
        ctx.service()
            .update_me(&me, UpdateUserRequest::default())
            .await
            .unwrap_err(),
        missing
    );
    assert_eq!(
        ctx.service()
            .change_password(
                &me,
                ChangePasswordRequest {
                    email: String::new(),
                    old_password: "esse-est".to_string(),
                    new_password: "percipi".to_string(),
                },
            )
            .await
            .unwrap_err(),
        missing
    );
}

#[tokio::test]
async fn test_list_claims_filters_by_creator() {
    let ctx = TestContext::new();
    let me = identity(&ctx, "hegel", "dialectic").await;
    let other = identity(&ctx, "marx", "praxis").await;
    ctx.claims.seed(me.id, "thesis", 3);
    ctx.claims.seed(other.id, "antithesis", 2);
    ctx.claims.seed(me.id, "synthesis", 1);

    let listing = ctx
        .service()
        .list_my_claims(&me, ListClaimsQuery::default())
        .await
        .unwrap();

    let ClaimListing::List(claims) = listing else {
        panic!("expected a bare list");
    };
    assert_eq!(claims.len(), 2);
    assert!(claims.iter().all(|c| c.created_by_id == me.id));

    let listing = ctx
        .service()
        .list_my_claims(
            &other,
            ListClaimsQuery {
                limit: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let ClaimListing::Page(page) = listing else {
        panic!("expected a page");
    };
    assert_eq!(page.ct, 1);
    assert_eq!(page.results[0].title, "antithesis");
}
