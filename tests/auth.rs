mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{bearer, init_app, sign_in, sign_up, test_state, PASSWORD};

#[actix_rt::test]
async fn test_sign_up_and_sign_in_flow() {
    let app = init_app(test_state()).await;

    let id = sign_up(&app, "alice").await;
    assert_eq!(id, 1);

    let token = sign_in(&app, "alice").await;
    assert!(!token.is_empty(), "Token should be a non-empty string");

    let req = test::TestRequest::get()
        .uri("/api/lists")
        .insert_header(bearer(&token))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "data": [] }));
}

#[actix_rt::test]
async fn test_duplicate_sign_up_keeps_first_user_valid() {
    let app = init_app(test_state()).await;

    sign_up(&app, "alice").await;
    let token = sign_in(&app, "alice").await;

    let req = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(json!({ "name": "Other Alice", "username": "alice", "password": "another-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());

    // The original account still signs in and its token still works.
    let req = test::TestRequest::get()
        .uri("/api/lists")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(!sign_in(&app, "alice").await.is_empty());
}

#[actix_rt::test]
async fn test_invalid_sign_up_inputs() {
    let app = init_app(test_state()).await;

    let test_cases = vec![
        (
            json!({ "username": "testuser", "password": PASSWORD }),
            StatusCode::BAD_REQUEST,
            "missing name",
        ),
        (
            json!({ "name": "Test", "password": PASSWORD }),
            StatusCode::BAD_REQUEST,
            "missing username",
        ),
        (
            json!({ "name": "Test", "username": "u", "password": PASSWORD }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "username too short",
        ),
        (
            json!({ "name": "Test", "username": "user name!", "password": PASSWORD }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "username with invalid chars",
        ),
        (
            json!({ "name": "Test", "username": "testuser", "password": "123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/auth/sign-up")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body_bytes)
        );
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert!(body["message"].is_string(), "{} has no message", description);
    }
}

#[actix_rt::test]
async fn test_sign_in_failures_look_the_same() {
    let app = init_app(test_state()).await;
    sign_up(&app, "alice").await;

    let mut messages = Vec::new();
    for payload in [
        json!({ "username": "alice", "password": "WrongPassword123!" }),
        json!({ "username": "nobody", "password": PASSWORD }),
    ] {
        let req = test::TestRequest::post()
            .uri("/auth/sign-in")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        messages.push(body["message"].clone());
    }
    assert_eq!(messages[0], messages[1]);
}

#[actix_rt::test]
async fn test_garbage_token_gets_generic_401() {
    let app = init_app(test_state()).await;

    let req = test::TestRequest::get()
        .uri("/api/lists/1")
        .insert_header(("Authorization", "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().unwrap().to_lowercase();
    assert!(!message.contains("malformed"));
    assert!(!message.contains("expired"));
    assert!(!message.contains("signature"));
}

#[actix_rt::test]
async fn test_health_is_public() {
    let app = init_app(test_state()).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
