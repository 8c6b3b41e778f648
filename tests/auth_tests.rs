use actix_web::{http::StatusCode, test};
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use payroll_hrd::database::models::UserPatch;
use payroll_hrd::database::repositories::UserStore;

#[macro_use]
mod common;

use common::{AuthHelper, HRD_EMAIL, HRD_PASSWORD, TestApp};

#[actix_web::test]
async fn test_login_success_updates_last_login() {
    let ctx = TestApp::with_operator().await;
    let app = init_app!(ctx);
    let before = Utc::now();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": HRD_EMAIL, "password": HRD_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["user"]["fullName"], "Sari HRD");
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let reported: DateTime<Utc> =
        serde_json::from_value(body["data"]["user"]["lastLogin"].clone()).unwrap();
    assert!(reported >= before);

    let stored = ctx
        .db
        .find_active_by_email(HRD_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_login.unwrap() >= before);
}

#[actix_web::test]
async fn test_login_wrong_password_is_rejected() {
    let ctx = TestApp::with_operator().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": HRD_EMAIL, "password": "salah" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password");

    let stored = ctx
        .db
        .find_active_by_email(HRD_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_login.is_none());
}

#[actix_web::test]
async fn test_inactive_user_cannot_login_even_with_correct_password() {
    let ctx = TestApp::with_operator().await;
    let user = ctx
        .db
        .find_active_by_email(HRD_EMAIL)
        .await
        .unwrap()
        .unwrap();
    ctx.db
        .update(
            user.id,
            UserPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let app = init_app!(ctx);

    for password in [HRD_PASSWORD, "salah"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": HRD_EMAIL, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn test_screens_require_a_session() {
    let ctx = TestApp::with_operator().await;
    let app = init_app!(ctx);

    for uri in ["/api/v1/session", "/api/v1/dashboard", "/api/v1/employees"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(AuthHelper::bearer("garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_session_sidebar_shows_user_and_menu() {
    let ctx = TestApp::with_operator().await;
    let token = AuthHelper::token(&ctx).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(AuthHelper::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["user"]["fullName"], "Sari HRD");
    assert_eq!(body["data"]["user"]["role"], "hrd");
    assert_eq!(body["data"]["current"], "dashboard");
    let keys: Vec<&str> = body["data"]["menu"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        vec!["dashboard", "employees", "attendance", "payroll", "reports"]
    );
}

#[actix_web::test]
async fn test_logout_clears_session_and_resets_view() {
    let ctx = TestApp::with_operator().await;
    let token = AuthHelper::token(&ctx).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(AuthHelper::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["resetView"], true);

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(AuthHelper::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_sessions_are_independent() {
    let ctx = TestApp::with_operator().await;
    let first = AuthHelper::token(&ctx).await;
    let second = AuthHelper::token(&ctx).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/screens/payroll")
        .insert_header(AuthHelper::bearer(&first))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(AuthHelper::bearer(&second))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["current"], "dashboard");
}

#[actix_web::test]
async fn test_logout_is_idempotent() {
    let ctx = TestApp::with_operator().await;
    let token = AuthHelper::token(&ctx).await;
    let app = init_app!(ctx);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(AuthHelper::bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
