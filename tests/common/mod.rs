#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::json;
use todolist_api::auth::{BcryptHasher, TokenService};
use todolist_api::config::SigningSecret;
use todolist_api::models::{SignUpResponse, TokenResponse};
use todolist_api::routes::{self, health};
use todolist_api::state::AppState;

pub const PASSWORD: &str = "Password123!";

/// In-memory state with a cheap bcrypt cost so tests stay fast.
pub fn test_state() -> AppState {
    let tokens = Arc::new(TokenService::new(
        &SigningSecret::new("integration-test-secret"),
        chrono::Duration::hours(12),
    ));
    AppState::in_memory(tokens, Arc::new(BcryptHasher::new(4)))
}

pub async fn init_app(
    state: AppState,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
    Error = actix_web::Error,
> {
    let tokens = state.tokens.clone();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(health::health)
            .configure(routes::configure(tokens)),
    )
    .await
}

pub async fn sign_up(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> i32 {
    let req = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(json!({ "name": username, "username": username, "password": PASSWORD }))
        .to_request();
    let resp: SignUpResponse = test::call_and_read_body_json(app, req).await;
    resp.id
}

pub async fn sign_in(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/auth/sign-in")
        .set_json(json!({ "username": username, "password": PASSWORD }))
        .to_request();
    let resp: TokenResponse = test::call_and_read_body_json(app, req).await;
    resp.token
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
