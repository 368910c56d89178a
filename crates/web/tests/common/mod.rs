//! Stub servers for black-box tests: an axum app on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

pub const API_KEY: &str = "test-key";

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One multipart part as the stub saw it.
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

#[derive(Debug, Default)]
pub struct BackendLog {
    pub uploads: Vec<ReceivedPart>,
    pub predictions: Vec<Value>,
}

pub type SharedLog = Arc<Mutex<BackendLog>>;

/// `/upload` and `/predict`, answering the way the real backend does.
pub fn backend_app(log: SharedLog) -> Router {
    Router::new()
        .route("/upload", post(upload))
        .route("/predict", post(predict))
        .with_state(log)
}

async fn upload(State(log): State<SharedLog>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut text = None;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let part = ReceivedPart {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            len: 0,
        };
        let bytes = field.bytes().await.unwrap();
        if part.field == "file" {
            text = Some(String::from_utf8_lossy(&bytes).into_owned());
        }
        log.lock().unwrap().uploads.push(ReceivedPart { len: bytes.len(), ..part });
    }

    match text {
        None => (StatusCode::BAD_REQUEST, Json(json!({ "error": "No file part" }))),
        Some(text) if !text.starts_with("%PDF") => {
            (StatusCode::OK, Json(json!({ "error": "Could not extract text from PDF" })))
        }
        Some(_) => (
            StatusCode::OK,
            Json(json!({ "summary": "The parties agree to joint custody.\nSupport is payable monthly." })),
        ),
    }
}

async fn predict(State(log): State<SharedLog>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    log.lock().unwrap().predictions.push(body.clone());

    let age = body["child_age"].as_u64().unwrap_or(0);
    if age == 0 {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Missing required fields" })));
    }

    let father = body["father_salary"].as_f64().unwrap_or(0.0);
    let mother = body["mother_salary"].as_f64().unwrap_or(0.0);
    let custody = if father == mother { "Joint" } else { "Mother" };
    let mut answer = json!({ "custody": custody, "compensation": father * 0.1 });
    if age < 10 {
        answer["similar_cases"] = json!([
            { "title": "Smith v. Smith", "outcome": "Mother granted custody" }
        ]);
    }
    (StatusCode::OK, Json(answer))
}

pub type Accounts = Arc<Mutex<HashMap<String, String>>>;

/// Path prefix the secure token route is mounted under.
pub const SECURE_TOKEN_PREFIX: &str = "/securetoken";

/// The identity toolkit account endpoints and the secure token endpoint,
/// backed by a map. Tokens are `id:{email}` and `refresh:{email}`.
pub fn identity_app(accounts: Accounts) -> Router {
    Router::new()
        .route("/v1/*method", post(identity))
        .route("/securetoken/v1/token", post(secure_token))
        .with_state(accounts)
}

fn rest_error(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": message, "errors": [] } })),
    )
}

fn uid_for(email: &str) -> String {
    format!("uid-{}", email.split('@').next().unwrap_or_default())
}

fn bad_key(query: &HashMap<String, String>) -> bool {
    query.get("key").map(String::as_str) != Some(API_KEY)
}

async fn identity(
    State(accounts): State<Accounts>,
    Path(method): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if bad_key(&query) {
        return rest_error("API key not valid. Please pass a valid API key.");
    }

    let mut accounts = accounts.lock().unwrap();
    if method == "accounts:lookup" {
        let email = body["idToken"]
            .as_str()
            .and_then(|token| token.strip_prefix("id:"))
            .unwrap_or_default();
        if !accounts.contains_key(email) {
            return rest_error("INVALID_ID_TOKEN");
        }
        return (
            StatusCode::OK,
            Json(json!({
                "kind": "identitytoolkit#GetAccountInfoResponse",
                "users": [{ "localId": uid_for(email), "email": email, "emailVerified": false }]
            })),
        );
    }

    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    if !email.contains('@') {
        return rest_error("INVALID_EMAIL");
    }

    match method.as_str() {
        "accounts:signUp" => {
            if accounts.contains_key(&email) {
                return rest_error("EMAIL_EXISTS");
            }
            if password.len() < 6 {
                return rest_error("WEAK_PASSWORD : Password should be at least 6 characters");
            }
            accounts.insert(email.clone(), password);
        }
        "accounts:signInWithPassword" => match accounts.get(&email) {
            None => return rest_error("EMAIL_NOT_FOUND"),
            Some(stored) if *stored != password => return rest_error("INVALID_PASSWORD"),
            Some(_) => {}
        },
        _ => return (StatusCode::NOT_FOUND, Json(json!({}))),
    }

    (
        StatusCode::OK,
        Json(json!({
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": uid_for(&email),
            "email": email,
            "idToken": format!("id:{email}"),
            "refreshToken": format!("refresh:{email}"),
            "expiresIn": "3600"
        })),
    )
}

async fn secure_token(
    State(accounts): State<Accounts>,
    Query(query): Query<HashMap<String, String>>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if bad_key(&query) {
        return rest_error("API key not valid. Please pass a valid API key.");
    }
    if form.get("grant_type").map(String::as_str) != Some("refresh_token") {
        return rest_error("INVALID_GRANT_TYPE");
    }

    let accounts = accounts.lock().unwrap();
    let email = form
        .get("refresh_token")
        .and_then(|token| token.strip_prefix("refresh:"))
        .filter(|email| accounts.contains_key(*email));
    let Some(email) = email else {
        return rest_error("INVALID_REFRESH_TOKEN");
    };

    (
        StatusCode::OK,
        Json(json!({
            "expires_in": "3600",
            "token_type": "Bearer",
            "refresh_token": format!("refresh:{email}"),
            "id_token": format!("id:{email}"),
            "user_id": uid_for(email),
            "project_id": "justifai-test"
        })),
    )
}
