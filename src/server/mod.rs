use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::storage::Store;

pub mod routes;

/// Server state: the single shared store connection.
///
/// rusqlite calls block, so handlers reach the store only from
/// `spawn_blocking` through [`AppState::with_store`].
pub struct AppState {
    store: Mutex<Store>,
}

impl AppState {
    pub fn new(store: Store) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
        })
    }

    /// Run `f` against the store on the blocking pool
    pub async fn with_store<T, F>(self: &Arc<Self>, f: F) -> Result<T, StoreCallError>
    where
        F: FnOnce(&Store) -> crate::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            // Handlers only read, so a poisoned lock still guards a consistent store
            let store = state.store.lock().unwrap_or_else(PoisonError::into_inner);
            f(&store).map_err(StoreCallError::Store)
        })
        .await
        .map_err(StoreCallError::Join)?
    }
}

/// A store call made from a handler failed
#[derive(Debug, thiserror::Error)]
pub enum StoreCallError {
    #[error(transparent)]
    Store(crate::Error),

    #[error("query task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/hello", get(routes::hello))
        .route("/api/stats", get(routes::get_stats))
        .route("/api/products", get(routes::get_products))
        .route("/api/users", get(routes::get_users))
        .route("/api/users/{id}", get(routes::get_user))
        .route("/api/orders", get(routes::get_orders))
        .route("/api/order-items", get(routes::get_order_items))
        .route("/api/distribution-centers", get(routes::get_distribution_centers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, store: Store) -> anyhow::Result<()> {
    let app = router(AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
