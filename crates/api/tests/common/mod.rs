#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use tiledash_api::app::build_router;
use tiledash_api::auth::jwt::{generate_access_token, JwtConfig};
use tiledash_api::auth::password::hash_password;
use tiledash_api::config::ServerConfig;
use tiledash_api::state::AppState;
use tiledash_core::assets::{AssetRef, ObjectStore, StorageError};
use tiledash_db::models::user::{CreateUser, User};
use tiledash_db::repositories::UserRepo;
use tiledash_mail::{MailError, Mailer};

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Smallest byte string `image::guess_format` recognizes as PNG.
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        public_app_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// In-memory object store that records every call.
#[derive(Default)]
pub struct RecordingStore {
    live: Mutex<HashSet<String>>,
    stored: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    fail_uploads: Mutex<bool>,
}

impl RecordingStore {
    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Number of objects currently present.
    pub fn live(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn fail_uploads(&self) {
        *self.fail_uploads.lock().unwrap() = true;
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn store(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<AssetRef, StorageError> {
        if *self.fail_uploads.lock().unwrap() {
            return Err(StorageError::Backend("simulated outage".into()));
        }
        self.live.lock().unwrap().insert(key.to_string());
        self.stored.lock().unwrap().push(key.to_string());
        Ok(AssetRef {
            url: format!("https://cdn.test/{key}"),
            deletion_handle: key.to_string(),
        })
    }

    async fn delete(&self, handle: &str) -> Result<(), StorageError> {
        self.live.lock().unwrap().remove(handle);
        self.deleted.lock().unwrap().push(handle.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait for the background send task to deliver `n` emails.
    pub async fn wait_for(&self, n: usize) -> Vec<SentMail> {
        for _ in 0..50 {
            if self.sent.lock().unwrap().len() >= n {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub objects: Arc<RecordingStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// A fresh clone of the router for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over recording fakes for the object store and mailer.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let objects = Arc::new(RecordingStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(pool, test_config(), objects.clone(), mailer.clone());
    TestApp {
        router: build_router(state, None),
        objects,
        mailer,
    }
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        user_name: email.split('@').next().unwrap_or(email).to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

pub async fn admin_token(pool: &PgPool) -> String {
    token_for(&create_user(pool, "admin@test.com", "admin").await)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, builder(Method::GET, uri, token).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, builder(Method::DELETE, uri, token).body(Body::empty()).unwrap()).await
}

pub async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let request = builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::POST, uri, token, body).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::PUT, uri, token, body).await
}

pub async fn multipart(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    form: MultipartBody,
) -> Response<Body> {
    let (content_type, body) = form.finish();
    let request = builder(method, uri, token)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let body = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {body}");
    body
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "tiledash-test-boundary";

#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl ToString) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{}\r\n",
                value.to_string()
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn png(self, name: &str, file_name: &str) -> Self {
        self.file(name, file_name, PNG)
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.buf)
    }
}

// ---------------------------------------------------------------------------
// Catalog seeding
// ---------------------------------------------------------------------------

pub async fn create_category(app: &TestApp, token: &str, name: &str) -> i64 {
    let response = post_json(
        app.app(),
        "/api/v1/categories",
        Some(token),
        serde_json::json!({ "name": name }),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    body["data"]["id"].as_i64().unwrap()
}

pub async fn create_color(app: &TestApp, token: &str, hex: &str) -> i64 {
    let response = post_json(
        app.app(),
        "/api/v1/colors",
        Some(token),
        serde_json::json!({ "hexCode": hex }),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    body["data"]["id"].as_i64().unwrap()
}
