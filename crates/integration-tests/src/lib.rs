//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - cart store against the on-disk `FileStore`
//! - `wishlist_sync` - wishlist store against the fake commerce API
//! - `checkout_flow` - address, order assembly, and submission end to end
//!
//! The fake commerce API is an in-process axum server bound to an ephemeral
//! port. It keeps its state in memory and checks the bearer token on every
//! request.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use shopfront_client::api::{CommerceClient, StaticToken};
use shopfront_client::config::ApiConfig;
use tokio::task::JoinHandle;
use url::Url;

/// Token the fake API accepts.
pub const TEST_TOKEN: &str = "tok_test_7Qm2xV9pL4rK8sN3";

/// An order as received by the fake API.
#[derive(Debug, Clone)]
pub struct RecordedOrder {
    pub order_id: String,
    pub idempotency_key: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct FakeState {
    catalog: HashMap<String, Value>,
    wishlist: Vec<String>,
    addresses: Vec<Value>,
    orders: Vec<RecordedOrder>,
}

impl FakeState {
    fn wishlist_items(&self) -> Vec<Value> {
        self.wishlist
            .iter()
            .filter_map(|id| self.catalog.get(id).cloned())
            .collect()
    }
}

type Shared = Arc<Mutex<FakeState>>;

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
    state.lock().expect("fake API state poisoned")
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// In-process stand-in for the remote commerce API.
pub struct FakeCommerceApi {
    base_url: Url,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeCommerceApi {
    /// Bind to an ephemeral local port and start serving.
    pub async fn start() -> Self {
        let state = Shared::default();

        let api = Router::new()
            .route("/wishlist", get(get_wishlist))
            .route("/wishlist/add/{id}", post(add_to_wishlist))
            .route("/wishlist/remove/{id}", delete(remove_from_wishlist))
            .route("/wishlist/clear", delete(clear_wishlist))
            .route("/addresses", get(list_addresses).post(create_address))
            .route("/orders", post(create_order));

        // Mounted under a path prefix so clients must keep the base path
        let app = Router::new()
            .nest("/api", api)
            .layer(middleware::from_fn(require_token))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake API crashed");
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/api")).expect("valid base URL"),
            state,
            server,
        }
    }

    /// Base URL clients should use.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client carrying [`TEST_TOKEN`].
    pub fn client(&self) -> CommerceClient {
        self.client_with_token(Some(TEST_TOKEN))
    }

    /// Client carrying an arbitrary token (or none).
    pub fn client_with_token(&self, token: Option<&str>) -> CommerceClient {
        let config = ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        };
        let token = token.map(|t| SecretString::from(t.to_string()));
        CommerceClient::new(&config, StaticToken::new(token)).expect("Failed to build client")
    }

    /// Make a product known to the wishlist endpoints.
    pub fn add_product(&self, id: &str, name: &str, price: f64) {
        lock(&self.state).catalog.insert(
            id.to_string(),
            json!({ "_id": id, "name": name, "price": price, "image": format!("/img/{id}.png") }),
        );
    }

    /// Product ids currently on the server-side wishlist.
    pub fn wishlist_ids(&self) -> Vec<String> {
        lock(&self.state).wishlist.clone()
    }

    /// Orders received so far.
    pub fn orders(&self) -> Vec<RecordedOrder> {
        lock(&self.state).orders.clone()
    }
}

impl Drop for FakeCommerceApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn require_token(request: Request, next: Next) -> Response {
    let expected = format!("Bearer {TEST_TOKEN}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);

    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "Invalid or expired token");
    }
    next.run(request).await
}

async fn get_wishlist(State(state): State<Shared>) -> Json<Value> {
    Json(json!({ "items": lock(&state).wishlist_items() }))
}

async fn add_to_wishlist(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = lock(&state);
    if !state.catalog.contains_key(&id) {
        return error(StatusCode::NOT_FOUND, "Product not found");
    }
    if state.wishlist.contains(&id) {
        return error(StatusCode::BAD_REQUEST, "Product already in wishlist");
    }
    state.wishlist.push(id);
    Json(json!({ "products": state.wishlist_items() })).into_response()
}

async fn remove_from_wishlist(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = lock(&state);
    state.wishlist.retain(|existing| existing != &id);
    Json(json!({ "products": state.wishlist_items() })).into_response()
}

async fn clear_wishlist(State(state): State<Shared>) -> Json<Value> {
    lock(&state).wishlist.clear();
    Json(json!({ "message": "Wishlist cleared" }))
}

async fn list_addresses(State(state): State<Shared>) -> Json<Value> {
    Json(json!({ "addresses": lock(&state).addresses }))
}

async fn create_address(State(state): State<Shared>, Json(mut body): Json<Value>) -> Response {
    for field in ["fullName", "addressLine1", "city", "state", "postalCode", "phone"] {
        if body.get(field).and_then(Value::as_str).is_none_or(str::is_empty) {
            return error(StatusCode::BAD_REQUEST, &format!("{field} is required"));
        }
    }

    let mut state = lock(&state);
    let make_default = state.addresses.is_empty()
        || body.get("isDefault").and_then(Value::as_bool) == Some(true);
    if make_default {
        for existing in &mut state.addresses {
            existing["isDefault"] = json!(false);
        }
    }

    body["_id"] = json!(format!("addr_{}", state.addresses.len() + 1));
    body["isDefault"] = json!(make_default);
    state.addresses.push(body.clone());

    (StatusCode::CREATED, Json(json!({ "address": body }))).into_response()
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let idempotency_key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut state = lock(&state);
    let replayed = idempotency_key.as_ref().and_then(|key| {
        state
            .orders
            .iter()
            .find(|o| o.idempotency_key.as_ref() == Some(key))
    });
    if let Some(existing) = replayed {
        return Json(json!({ "orderId": existing.order_id, "status": "pending" })).into_response();
    }

    let order_id = format!("ord_{}", state.orders.len() + 1);
    state.orders.push(RecordedOrder {
        order_id: order_id.clone(),
        idempotency_key,
        body,
    });

    (
        StatusCode::CREATED,
        Json(json!({ "orderId": order_id, "status": "pending" })),
    )
        .into_response()
}

/// A fresh, not yet created directory under the system temp dir.
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("shopfront-it-{}", uuid::Uuid::new_v4()))
}
