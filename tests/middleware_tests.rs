//! Auth middleware tests
//!
//! Runs with `FL__TRACKING__API_TOKEN` set before the config is first
//! read, so the management surface is enabled for this test binary.

use std::sync::Once;

use actix_web::http::StatusCode;
use actix_web::middleware::from_fn;
use actix_web::test::{self, TestRequest};
use actix_web::{App, HttpResponse, web};

use flyerlink::api::middleware::AuthMiddleware;
use flyerlink::config::init_config;

static INIT: Once = Once::new();

const TEST_TOKEN: &str = "test-api-token-123";

fn init_test_env() {
    INIT.call_once(|| {
        // Must happen before init_config; the token is read once at startup.
        unsafe {
            std::env::set_var("FL__TRACKING__API_TOKEN", TEST_TOKEN);
        }
        init_config();
    });
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(from_fn(AuthMiddleware::api_auth))
                    .route(
                        "/ping",
                        web::get().to(|| async { HttpResponse::Ok().body("pong") }),
                    ),
            ),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_missing_token_is_unauthorized() {
    init_test_env();
    let app = test_app!();

    let req = TestRequest::get().uri("/api/ping").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_wrong_token_is_unauthorized() {
    init_test_env();
    let app = test_app!();

    let req = TestRequest::get()
        .uri("/api/ping")
        .insert_header(("Authorization", "Bearer wrong-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);
}

#[actix_rt::test]
async fn test_malformed_header_is_unauthorized() {
    init_test_env();
    let app = test_app!();

    let req = TestRequest::get()
        .uri("/api/ping")
        .insert_header(("Authorization", TEST_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_valid_token_passes_through() {
    init_test_env();
    let app = test_app!();

    let req = TestRequest::get()
        .uri("/api/ping")
        .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"pong");
}

#[actix_rt::test]
async fn test_options_preflight_bypasses_auth() {
    init_test_env();
    let app = test_app!();

    let req = TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/ping")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
