use actix_web::{http::header, test, web, App, HttpResponse};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskdeck::auth::{AuthClaims, AuthMiddleware, TokenCodec};

const SECRET: &str = "guard-test-secret";

async fn whoami(claims: AuthClaims) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "sub": claims.subject(), "email": claims.0.email }
    }))
}

async fn public_ok() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "data": { "public": true } }))
}

// The guard and extractor are exercised end-to-end through a real app, with
// the database-backed handlers swapped for stubs: everything here runs
// without external services.
macro_rules! guarded_app {
    ($codec:expr) => {
        test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new($codec))
                    .route("/auth/login", web::post().to(public_ok))
                    .route("/whoami", web::get().to(whoami)),
            ),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_missing_header_is_401_with_envelope() {
    let app = guarded_app!(TokenCodec::new(SECRET, 15));

    let req = test::TestRequest::get().uri("/api/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Unauthorized"));
}

#[actix_rt::test]
async fn test_non_bearer_scheme_is_401() {
    let app = guarded_app!(TokenCodec::new(SECRET, 15));

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .append_header((header::AUTHORIZATION, "Basic abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Unauthorized"));
}

#[actix_rt::test]
async fn test_garbage_token_is_401_invalid_token() {
    let app = guarded_app!(TokenCodec::new(SECRET, 15));

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .append_header((header::AUTHORIZATION, "Bearer not-a-real-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Invalid token"));
}

#[actix_rt::test]
async fn test_expired_token_is_401() {
    // A codec with a negative TTL signs tokens that are already expired.
    let expired_token = TokenCodec::new(SECRET, -120)
        .sign(1, "expired@example.com")
        .unwrap();
    let app = guarded_app!(TokenCodec::new(SECRET, 15));

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", expired_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Invalid token"));
}

#[actix_rt::test]
async fn test_token_from_other_secret_is_401() {
    let foreign_token = TokenCodec::new("some-other-secret", 15)
        .sign(1, "foreign@example.com")
        .unwrap();
    let app = guarded_app!(TokenCodec::new(SECRET, 15));

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", foreign_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_valid_token_reaches_handler_with_claims() {
    let codec = TokenCodec::new(SECRET, 15);
    let token = codec.sign(42, "alex@example.com").unwrap();
    let app = guarded_app!(codec);

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["sub"], json!(42));
    assert_eq!(body["data"]["email"], json!("alex@example.com"));
}

#[actix_rt::test]
async fn test_lowercase_scheme_is_accepted() {
    let codec = TokenCodec::new(SECRET, 15);
    let token = codec.sign(7, "case@example.com").unwrap();
    let app = guarded_app!(codec);

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .append_header((header::AUTHORIZATION, format!("bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
}

#[actix_rt::test]
async fn test_public_path_skips_the_guard() {
    let app = guarded_app!(TokenCodec::new(SECRET, 15));

    let req = test::TestRequest::post().uri("/api/auth/login").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
}
