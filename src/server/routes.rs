use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use crate::server::{AppState, StoreCallError};
use crate::storage::{DbStats, Row};
use std::sync::Arc;

const PRODUCT_LIMIT: usize = 50;
const LIST_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct ProductParams {
    pub category: Option<String>,
}

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn database_error(context: &str, err: StoreCallError) -> ApiError {
    tracing::error!("Error fetching {}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Database error" })),
    )
}

pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from the server!" }))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> ApiResult<DbStats> {
    let stats = state
        .with_store(|store| store.stats())
        .await
        .map_err(|e| database_error("stats", e))?;
    Ok(Json(stats))
}

pub async fn get_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProductParams>,
) -> ApiResult<Vec<Row>> {
    let rows = state
        .with_store(move |store| match params.category {
            Some(category) => store.all(
                &format!(
                    "SELECT id, name, category, brand, retail_price FROM products WHERE category = ?1 LIMIT {}",
                    PRODUCT_LIMIT
                ),
                [category],
            ),
            None => store.all(
                &format!(
                    "SELECT id, name, category, brand, retail_price FROM products LIMIT {}",
                    PRODUCT_LIMIT
                ),
                [],
            ),
        })
        .await
        .map_err(|e| database_error("products", e))?;
    Ok(Json(rows))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Row> {
    let user = state
        .with_store(move |store| {
            store.get(
                "SELECT id, first_name, last_name, email, city, country, traffic_source FROM users WHERE id = ?1",
                [id],
            )
        })
        .await
        .map_err(|e| database_error(&format!("user {}", id), e))?;

    user.map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "User not found" })),
        )
    })
}

async fn list_table(state: &Arc<AppState>, table: &'static str) -> ApiResult<Vec<Row>> {
    let rows = state
        .with_store(move |store| store.all(&format!("SELECT * FROM {} LIMIT {}", table, LIST_LIMIT), []))
        .await
        .map_err(|e| database_error(table, e))?;
    Ok(Json(rows))
}

pub async fn get_users(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Row>> {
    list_table(&state, "users").await
}

pub async fn get_orders(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Row>> {
    list_table(&state, "orders").await
}

pub async fn get_order_items(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Row>> {
    list_table(&state, "order_items").await
}

pub async fn get_distribution_centers(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Row>> {
    list_table(&state, "distribution_centers").await
}
