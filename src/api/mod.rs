// HTTP API Surface
// Routes /clientes, /tecnicos and /solicitudes onto the registries and the
// request workflow.

pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::SqliteStore;
use crate::registry::{ClientRegistry, TechnicianRegistry};
use crate::resolver::StoreResolver;
use crate::workflow::RequestWorkflow;

use handlers::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub clients: ClientRegistry,
    pub technicians: TechnicianRegistry,
    pub requests: RequestWorkflow,
}

impl AppState {
    /// Wires every service to the same store
    pub fn new(store: Arc<SqliteStore>) -> Self {
        let resolver = Arc::new(StoreResolver::new(store.clone()));

        Self {
            clients: ClientRegistry::new(store.clone()),
            technicians: TechnicianRegistry::new(store.clone()),
            requests: RequestWorkflow::new(store, resolver),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/clientes", get(list_clients).post(create_client))
        .route(
            "/clientes/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/tecnicos", get(list_technicians).post(create_technician))
        .route(
            "/tecnicos/:id",
            get(get_technician)
                .put(update_technician)
                .delete(delete_technician),
        )
        .route("/solicitudes", get(list_requests).post(create_request))
        .route(
            "/solicitudes/:id",
            get(get_request).put(update_request).delete(delete_request),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
