#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use fazenda_api::config::{ApiConfig, AppConfig, DataServiceConfig, Environment};
use fazenda_api::routes::app;
use fazenda_api::AppState;

pub const VALID_TOKEN: &str = "valid-user-token";
pub const TEST_USER_ID: &str = "5f0c3e5e-9b1a-4e0d-8c55-0aa3f2b7c001";

/// In-memory stand-in for the hosted data service: per-table rows, an
/// induced-failure list, and a counter of write requests received so tests
/// can assert that no write ever reached the service.
#[derive(Default)]
pub struct MockState {
    pub tables: HashMap<String, Vec<Value>>,
    pub fail_tables: HashSet<String>,
    pub writes: usize,
    pub next_id: i64,
}

pub type SharedMock = Arc<Mutex<MockState>>;

pub struct TestApp {
    pub base_url: String,
    pub mock: SharedMock,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", VALID_TOKEN)
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.mock
            .lock()
            .unwrap()
            .tables
            .insert(table.to_string(), rows);
    }

    pub fn writes(&self) -> usize {
        self.mock.lock().unwrap().writes
    }

    pub fn fail_table(&self, table: &str) {
        self.mock
            .lock()
            .unwrap()
            .fail_tables
            .insert(table.to_string());
    }
}

/// Boot the mock data service and the API under test, each on an ephemeral
/// port, and return a handle to both.
pub async fn spawn_app() -> Result<TestApp> {
    let mock: SharedMock = Arc::new(Mutex::new(MockState::default()));

    let mock_router = Router::new()
        .route("/auth/v1/user", get(user_info))
        .route("/rest/v1/", get(rest_root))
        .route(
            "/rest/v1/:table",
            get(table_get)
                .post(table_post)
                .patch(table_patch)
                .delete(table_delete),
        )
        .with_state(mock.clone());

    let mock_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let mock_addr = mock_listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(mock_listener, mock_router).await.expect("mock server");
    });

    let config = AppConfig {
        environment: Environment::Development,
        data_service: DataServiceConfig {
            base_url: url::Url::parse(&format!("http://{}/", mock_addr))?,
            anon_key: "anon-test-key".to_string(),
            service_key: "service-test-key".to_string(),
        },
        api: ApiConfig {
            enable_cors: true,
            enable_request_logging: false,
        },
    };

    let app_router = app(AppState::new(config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app_router).await.expect("app server");
    });

    Ok(TestApp {
        base_url: format!("http://{}", addr),
        mock,
        client: reqwest::Client::new(),
    })
}

async fn user_info(headers: HeaderMap) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if auth == format!("Bearer {}", VALID_TOKEN) {
        Json(json!({ "id": TEST_USER_ID, "email": "gestor@fazenda.test" })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid token" })),
        )
            .into_response()
    }
}

async fn rest_root() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn table_get(
    Path(table): Path<String>,
    RawQuery(query): RawQuery,
    State(state): State<SharedMock>,
) -> Response {
    let state = state.lock().unwrap();
    if state.fail_tables.contains(&table) {
        return induced_failure();
    }

    let pairs = parse_query(query);
    let rows = state.tables.get(&table).cloned().unwrap_or_default();
    Json(Value::Array(apply_filters(rows, &pairs))).into_response()
}

async fn table_post(
    Path(table): Path<String>,
    State(state): State<SharedMock>,
    headers: HeaderMap,
    Json(mut payload): Json<Value>,
) -> Response {
    let merge = headers
        .get("prefer")
        .and_then(|p| p.to_str().ok())
        .map(|p| p.contains("merge-duplicates"))
        .unwrap_or(false);

    let mut state = state.lock().unwrap();
    state.writes += 1;
    if state.fail_tables.contains(&table) {
        return induced_failure();
    }

    state.next_id += 1;
    let id = state.next_id;
    let Some(obj) = payload.as_object_mut() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "object expected" })),
        )
            .into_response();
    };
    obj.entry("id".to_string()).or_insert(json!(id));

    let rows = state.tables.entry(table).or_default();
    if merge {
        if let Some(existing) = rows.iter_mut().find(|r| same_conflict_key(r, &payload)) {
            if let (Some(e), Some(p)) = (existing.as_object_mut(), payload.as_object()) {
                for (k, v) in p {
                    if k != "id" {
                        e.insert(k.clone(), v.clone());
                    }
                }
            }
            let merged = existing.clone();
            return (StatusCode::CREATED, Json(json!([merged]))).into_response();
        }
    }

    rows.push(payload.clone());
    (StatusCode::CREATED, Json(json!([payload]))).into_response()
}

async fn table_patch(
    Path(table): Path<String>,
    RawQuery(query): RawQuery,
    State(state): State<SharedMock>,
    Json(patch): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.writes += 1;
    if state.fail_tables.contains(&table) {
        return induced_failure();
    }

    let pairs = parse_query(query);
    let mut updated = Vec::new();
    if let Some(rows) = state.tables.get_mut(&table) {
        for row in rows.iter_mut() {
            if row_matches_all(row, &pairs) {
                if let (Some(r), Some(p)) = (row.as_object_mut(), patch.as_object()) {
                    for (k, v) in p {
                        r.insert(k.clone(), v.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
    }

    Json(Value::Array(updated)).into_response()
}

async fn table_delete(
    Path(table): Path<String>,
    RawQuery(query): RawQuery,
    State(state): State<SharedMock>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.writes += 1;
    if state.fail_tables.contains(&table) {
        return induced_failure();
    }

    let pairs = parse_query(query);
    if let Some(rows) = state.tables.get_mut(&table) {
        rows.retain(|row| !row_matches_all(row, &pairs));
    }

    StatusCode::NO_CONTENT.into_response()
}

fn induced_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "induced failure" })),
    )
        .into_response()
}

fn parse_query(query: Option<String>) -> Vec<(String, String)> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

fn apply_filters(mut rows: Vec<Value>, pairs: &[(String, String)]) -> Vec<Value> {
    rows.retain(|row| row_matches_all(row, pairs));

    if let Some((_, spec)) = pairs.iter().find(|(k, _)| k == "order") {
        let (column, direction) = spec.rsplit_once('.').unwrap_or((spec.as_str(), "asc"));
        let column = column.to_string();
        rows.sort_by(|a, b| cmp_values(a.get(&column), b.get(&column)));
        if direction == "desc" {
            rows.reverse();
        }
    }

    if let Some((_, limit)) = pairs.iter().find(|(k, _)| k == "limit") {
        if let Ok(n) = limit.parse::<usize>() {
            rows.truncate(n);
        }
    }

    rows
}

fn row_matches_all(row: &Value, pairs: &[(String, String)]) -> bool {
    pairs.iter().all(|(key, raw)| match key.as_str() {
        "order" | "limit" => true,
        column => raw
            .split_once('.')
            .map(|(op, value)| predicate_matches(row, column, op, value))
            .unwrap_or(true),
    })
}

fn predicate_matches(row: &Value, column: &str, op: &str, raw: &str) -> bool {
    let Some(value) = row.get(column) else {
        return false;
    };

    let ord = match (value.as_f64(), raw.parse::<f64>().ok()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => value_str(value).as_str().cmp(raw),
    };

    match op {
        "eq" => ord == Ordering::Equal,
        "gte" => ord != Ordering::Less,
        "lte" => ord != Ordering::Greater,
        _ => true,
    }
}

fn cmp_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => value_str(a).cmp(&value_str(b)),
        },
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn value_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn same_conflict_key(a: &Value, b: &Value) -> bool {
    for key in ["insumo_id", "tipo"] {
        if let (Some(x), Some(y)) = (a.get(key), b.get(key)) {
            return x == y;
        }
    }
    false
}
