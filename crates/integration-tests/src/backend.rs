//! In-memory stand-in for the hosted backend.
//!
//! Speaks just enough of the auth, table, and object-storage wire protocol
//! for the API server to run against it unchanged: password sign-in and
//! bearer lookup, table reads with `eq` filters, ordering, and the
//! single-object `Accept` header, writes honoring
//! `Prefer: return=representation`, and object upload and removal. All
//! state sits behind one mutex so tests can seed rows and inspect what the
//! API wrote.

// Handlers take no awaits of their own but must be async for routing.
#![allow(clippy::unused_async)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use uuid::Uuid;

use terracota_server::supabase::IMAGE_BUCKET;

/// Publishable key the API server must present on auth requests.
pub const ANON_KEY: &str = "anon-test-key";
/// Privileged key the API server must present on table and storage requests.
pub const SERVICE_ROLE_KEY: &str = "service-role-test-key";

/// The seeded admin identity.
pub const ADMIN_EMAIL: &str = "duena@taller.com";
pub const ADMIN_PASSWORD: &str = "torno-y-esmalte-9";
/// A seeded signed-up user without the admin role.
pub const PLAIN_USER_EMAIL: &str = "cliente@taller.com";
pub const PLAIN_USER_PASSWORD: &str = "solo-mirando-7";

const ADMIN_ID: &str = "5f8d1c2e-4b6a-4e0f-9c3d-2a7b8e1f0a55";
const PLAIN_USER_ID: &str = "91b0a3d4-7c2e-4f58-8e6a-0d1c2b3a4f66";

/// An uploaded object as the stub stored it.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Shared handle on the stub backend. Cheap to clone; one instance backs
/// both the router and the test's assertions.
#[derive(Clone)]
pub struct Backend {
    state: Arc<Mutex<BackendState>>,
}

struct BackendState {
    tables: HashMap<String, Vec<Value>>,
    objects: HashMap<String, StoredObject>,
    sessions: HashMap<String, Value>,
    next_id: i32,
}

impl BackendState {
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn rows_mut(&mut self, table: &str) -> &mut Vec<Value> {
        self.tables.entry(table.to_owned()).or_default()
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend {
    /// Empty catalog, the singleton configuration row, and two known
    /// identities (one admin, one plain user).
    #[must_use]
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        tables.insert("products".to_owned(), Vec::new());
        tables.insert("categories".to_owned(), Vec::new());
        tables.insert(
            "site_config".to_owned(),
            vec![json!({
                "id": 1,
                "social_media": {},
                "contact": {},
                "updated_at": created_at(0),
            })],
        );

        Self {
            state: Arc::new(Mutex::new(BackendState {
                tables,
                objects: HashMap::new(),
                sessions: HashMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Router speaking the backend wire protocol.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/auth/v1/token", post(sign_in))
            .route("/auth/v1/user", get(current_user))
            .route(
                "/rest/v1/{table}",
                get(select_rows)
                    .post(insert_row)
                    .patch(update_rows)
                    .delete(delete_rows),
            )
            .route(
                "/storage/v1/object/{bucket}/{*path}",
                post(store_object).delete(remove_object),
            )
            .with_state(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invalidate one issued token, as an expiry would.
    pub fn revoke_token(&self, token: &str) {
        self.lock().sessions.remove(token);
    }

    /// Mint a session for a seeded identity without going through sign-in.
    /// The API never issues tokens to non-admins, so this is the only way
    /// tests can hold one.
    #[must_use]
    pub fn issue_token(&self, email: &str) -> Option<String> {
        let user = known_user(email)?;
        let token = format!("stub-token-{}", Uuid::new_v4().simple());
        self.lock().sessions.insert(token.clone(), user);
        Some(token)
    }

    /// Insert a full product row directly, bypassing the API. Returns the
    /// assigned id.
    pub fn seed_product(&self, name: &str, category: &str, price: f64) -> i32 {
        let mut state = self.lock();
        let id = state.allocate_id();
        let image = format!("https://cdn.example.com/images/products/{id}.jpg");
        let row = json!({
            "id": id,
            "name": name,
            "image": image.as_str(),
            "images": [image.as_str()],
            "price": price,
            "description": "Pieza de gres esmaltada a mano",
            "category": category,
            "stock": 999,
            "featured": false,
            "created_at": created_at(id),
        });
        state.rows_mut("products").push(row);
        id
    }

    /// Insert a category row directly. Returns the assigned id.
    pub fn seed_category(&self, name: &str) -> i32 {
        let mut state = self.lock();
        let id = state.allocate_id();
        let row = json!({
            "id": id,
            "name": name,
            "image": format!("https://cdn.example.com/images/categories/{id}.jpg"),
            "created_at": created_at(id),
            "updated_at": created_at(id),
        });
        state.rows_mut("categories").push(row);
        id
    }

    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.lock().tables.get(table).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn has_object(&self, path: &str) -> bool {
        self.lock().objects.contains_key(path)
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    #[must_use]
    pub fn stored_object(&self, path: &str) -> Option<StoredObject> {
        self.lock().objects.get(path).cloned()
    }
}

/// Deterministic row timestamp: strictly increasing with the assigned id,
/// so `created_at.desc` and id-descending agree.
fn created_at(id: i32) -> String {
    chrono::DateTime::from_timestamp(1_700_000_000 + i64::from(id), 0)
        .map(|stamp| stamp.to_rfc3339())
        .unwrap_or_default()
}

fn known_user(email: &str) -> Option<Value> {
    match email {
        ADMIN_EMAIL => Some(json!({
            "id": ADMIN_ID,
            "email": ADMIN_EMAIL,
            "user_metadata": { "name": "Magu", "role": "admin" },
        })),
        PLAIN_USER_EMAIL => Some(json!({
            "id": PLAIN_USER_ID,
            "email": PLAIN_USER_EMAIL,
            "user_metadata": {},
        })),
        _ => None,
    }
}

fn authenticate(email: &str, password: &str) -> Option<Value> {
    let expected = match email {
        ADMIN_EMAIL => ADMIN_PASSWORD,
        PLAIN_USER_EMAIL => PLAIN_USER_PASSWORD,
        _ => return None,
    };
    if password == expected {
        known_user(email)
    } else {
        None
    }
}

// =============================================================================
// Auth endpoints
// =============================================================================

async fn sign_in(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if api_key(&headers) != Some(ANON_KEY) {
        return unauthorized_key();
    }
    if params.get("grant_type").map(String::as_str) != Some("password") {
        return error_response(
            StatusCode::BAD_REQUEST,
            json!({
                "error": "unsupported_grant_type",
                "error_description": "Only the password grant is supported",
            }),
        );
    }

    let email = text_field(&body, "email");
    let password = text_field(&body, "password");
    let Some(user) = authenticate(email, password) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials",
            }),
        );
    };

    let token = format!("stub-token-{}", Uuid::new_v4().simple());
    backend.lock().sessions.insert(token.clone(), user.clone());

    Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user": user,
    }))
    .into_response()
}

async fn current_user(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if api_key(&headers) != Some(ANON_KEY) {
        return unauthorized_key();
    }

    let user = bearer(&headers).and_then(|token| backend.lock().sessions.get(token).cloned());
    match user {
        Some(user) => Json(user).into_response(),
        None => error_response(
            StatusCode::UNAUTHORIZED,
            json!({ "code": 401, "msg": "invalid JWT" }),
        ),
    }
}

// =============================================================================
// Table endpoints
// =============================================================================

async fn select_rows(
    State(backend): State<Backend>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if api_key(&headers) != Some(SERVICE_ROLE_KEY) {
        return unauthorized_key();
    }

    let state = backend.lock();
    let Some(stored) = state.tables.get(&table) else {
        return missing_table(&table);
    };

    let filters = eq_filters(&params);
    let mut rows: Vec<Value> = stored
        .iter()
        .filter(|row| matches_filters(row, &filters))
        .cloned()
        .collect();
    drop(state);

    if let Some(order) = params.get("order") {
        sort_rows(&mut rows, order);
    }
    let select = params.get("select").map_or("*", String::as_str);
    let rows: Vec<Value> = rows.iter().map(|row| project(row, select)).collect();

    if wants_single(&headers) {
        return single_row(rows);
    }
    Json(rows).into_response()
}

async fn insert_row(
    State(backend): State<Backend>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if api_key(&headers) != Some(SERVICE_ROLE_KEY) {
        return unauthorized_key();
    }
    let mut row = body;
    if !row.is_object() {
        return error_response(
            StatusCode::BAD_REQUEST,
            json!({ "message": "expected a JSON object" }),
        );
    }

    let mut state = backend.lock();
    if !state.tables.contains_key(&table) {
        return missing_table(&table);
    }
    let id = state.allocate_id();
    if let Some(fields) = row.as_object_mut() {
        // The backend owns ids; client-supplied ones are overwritten
        fields.insert("id".to_owned(), json!(id));
        fields.insert("created_at".to_owned(), json!(created_at(id)));
    }
    state.rows_mut(&table).push(row.clone());
    drop(state);

    if prefers_representation(&headers) {
        if wants_single(&headers) {
            return (StatusCode::CREATED, Json(row)).into_response();
        }
        return (StatusCode::CREATED, Json(json!([row]))).into_response();
    }
    StatusCode::CREATED.into_response()
}

async fn update_rows(
    State(backend): State<Backend>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(patch): Json<Value>,
) -> Response {
    if api_key(&headers) != Some(SERVICE_ROLE_KEY) {
        return unauthorized_key();
    }

    let filters = eq_filters(&params);
    let mut state = backend.lock();
    let Some(rows) = state.tables.get_mut(&table) else {
        return missing_table(&table);
    };

    let mut updated = Vec::new();
    for row in rows.iter_mut() {
        if matches_filters(row, &filters) {
            merge_into(row, &patch);
            updated.push(row.clone());
        }
    }
    drop(state);

    if prefers_representation(&headers) {
        if wants_single(&headers) {
            return single_row(updated);
        }
        return Json(updated).into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_rows(
    State(backend): State<Backend>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if api_key(&headers) != Some(SERVICE_ROLE_KEY) {
        return unauthorized_key();
    }

    let filters = eq_filters(&params);
    let mut state = backend.lock();
    let Some(rows) = state.tables.get_mut(&table) else {
        return missing_table(&table);
    };
    rows.retain(|row| !matches_filters(row, &filters));
    drop(state);

    StatusCode::NO_CONTENT.into_response()
}

// =============================================================================
// Storage endpoints
// =============================================================================

async fn store_object(
    State(backend): State<Backend>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if api_key(&headers) != Some(SERVICE_ROLE_KEY) {
        return unauthorized_key();
    }
    if bucket != IMAGE_BUCKET {
        return error_response(
            StatusCode::NOT_FOUND,
            json!({ "error": "Bucket not found", "message": "Bucket not found" }),
        );
    }

    let upsert = headers.get("x-upsert").and_then(|value| value.to_str().ok()) == Some("true");
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let mut state = backend.lock();
    if !upsert && state.objects.contains_key(&path) {
        return error_response(
            StatusCode::CONFLICT,
            json!({ "error": "Duplicate", "message": "The resource already exists" }),
        );
    }
    state.objects.insert(
        path.clone(),
        StoredObject {
            content_type,
            bytes: body.to_vec(),
        },
    );
    drop(state);

    Json(json!({ "Key": format!("{bucket}/{path}") })).into_response()
}

async fn remove_object(
    State(backend): State<Backend>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if api_key(&headers) != Some(SERVICE_ROLE_KEY) {
        return unauthorized_key();
    }

    let removed = bucket == IMAGE_BUCKET && backend.lock().objects.remove(&path).is_some();
    if removed {
        Json(json!({ "message": "Successfully deleted" })).into_response()
    } else {
        error_response(
            StatusCode::NOT_FOUND,
            json!({ "error": "not_found", "message": "Object not found" }),
        )
    }
}

// =============================================================================
// Wire helpers
// =============================================================================

fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get("apikey").and_then(|value| value.to_str().ok())
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn wants_single(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        == Some("application/vnd.pgrst.object+json")
}

fn prefers_representation(headers: &HeaderMap) -> bool {
    headers
        .get("prefer")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|prefer| prefer.contains("return=representation"))
}

fn text_field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn eq_filters(params: &HashMap<String, String>) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != "select" && key.as_str() != "order")
        .filter_map(|(key, value)| {
            value
                .strip_prefix("eq.")
                .map(|expected| (key.clone(), expected.to_owned()))
        })
        .collect()
}

fn matches_filters(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, expected)| {
        row.get(column)
            .is_some_and(|value| json_text(value) == *expected)
    })
}

/// Filter-comparable text of a JSON value: strings unquoted, everything
/// else as written.
fn json_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Apply an `order=column.direction` clause.
fn sort_rows(rows: &mut [Value], order: &str) {
    let (column, direction) = order.split_once('.').unwrap_or((order, "asc"));
    let descending = direction == "desc";

    rows.sort_by(|a, b| {
        let ordering = compare_json(a.get(column), b.get(column));
        if descending { ordering.reverse() } else { ordering }
    });
}

fn compare_json(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        _ => std::cmp::Ordering::Equal,
    }
}

/// Apply a `select=` column projection.
fn project(row: &Value, select: &str) -> Value {
    if select.is_empty() || select == "*" {
        return row.clone();
    }

    let mut projected = serde_json::Map::new();
    for column in select.split(',') {
        if let Some(value) = row.get(column) {
            projected.insert(column.to_owned(), value.clone());
        }
    }
    Value::Object(projected)
}

fn merge_into(row: &mut Value, patch: &Value) {
    if let (Some(target), Some(source)) = (row.as_object_mut(), patch.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn single_row(mut rows: Vec<Value>) -> Response {
    if rows.len() == 1 {
        Json(rows.remove(0)).into_response()
    } else {
        error_response(
            StatusCode::NOT_ACCEPTABLE,
            json!({
                "code": "PGRST116",
                "message": "JSON object requested, multiple (or no) rows returned",
            }),
        )
    }
}

fn error_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn unauthorized_key() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        json!({ "message": "Invalid API key" }),
    )
}

fn missing_table(table: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        json!({
            "code": "42P01",
            "message": format!("relation \"public.{table}\" does not exist"),
        }),
    )
}
