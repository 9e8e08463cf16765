//! Shared setup for the integration tests.
//!
//! Every test gets a fresh `MemoryStore`, so no database is needed and tests never
//! see each other's rows.
#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use blogforge::auth::LoginResponse;
use blogforge::config::{Config, MEMORY_DATABASE_URL};
use blogforge::store::MemoryStore;
use blogforge::AppState;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_MAX_IMAGE_BYTES: usize = 1024;
pub const TEST_PASSWORD: &str = "Password123!";

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: MEMORY_DATABASE_URL.to_string(),
        database_max_connections: 1,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl_days: 7,
        // bcrypt's minimum, keeps the suite fast
        bcrypt_cost: 4,
        max_image_bytes: TEST_MAX_IMAGE_BYTES,
    }
}

pub fn test_state() -> (web::Data<AppState>, Arc<MemoryStore>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), &test_config());
    (web::Data::new(state), store)
}

/// Sends `req` and returns the status with the body parsed as JSON (`Null` when the
/// body is not JSON, e.g. actix's own path errors).
pub async fn call<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub async fn signup<S, B>(app: &S, name: &str, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    call(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    call(app, req).await
}

/// Signs a user up, logs them in and returns their id and token.
pub async fn register_and_login<S, B>(app: &S, name: &str, email: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = signup(app, name, email, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::CREATED, "Setup: failed to register {}: {}", email, body);

    let (status, body) = login(app, email, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "Setup: failed to log in {}: {}", email, body);
    let body: LoginResponse =
        serde_json::from_value(body).expect("Setup: login response has the wrong shape");

    TestUser {
        id: body.user.id,
        token: body.token,
    }
}

/// Hand-built `multipart/form-data` body.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("----blogforge-test-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Returns the `Content-Type` header value and the encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
