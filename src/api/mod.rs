// Catalog HTTP API
// One GET endpoint per store operation, all sharing one response contract.

pub mod error;
pub mod handlers;

use axum::routing::{get, MethodRouter};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::CatalogStore;

pub use error::{ApiError, ApiResult, MessageBody};
pub use handlers::Envelope;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }
}

/// Route table: path → handler. Everything the catalog serves is listed here.
pub fn catalog_routes() -> Vec<(&'static str, MethodRouter<AppState>)> {
    use handlers::*;

    vec![
        ("/restaurants", get(list_restaurants)),
        ("/restaurants/details/:id", get(restaurant_details)),
        ("/restaurants/cuisine/:cuisine", get(restaurants_by_cuisine)),
        ("/restaurants/filter", get(filter_restaurants)),
        ("/restaurants/sort-by-rating", get(restaurants_by_rating)),
        ("/dishes", get(list_dishes)),
        ("/dishes/filter", get(filter_dishes)),
        ("/dishes/details/:id", get(dish_details)),
        ("/dishes/sort-by-price", get(dishes_by_price)),
    ]
}

/// Paths of the catalog endpoints, in table order
pub fn endpoint_paths() -> Vec<&'static str> {
    catalog_routes().into_iter().map(|(path, _)| path).collect()
}

/// Build the full application: catalog routes, health check, CORS and tracing
pub fn router(state: AppState) -> Router {
    catalog_routes()
        .into_iter()
        .fold(Router::new(), |router, (path, route)| router.route(path, route))
        .route("/health", get(handlers::health))
        .fallback(handlers::unknown_route)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
