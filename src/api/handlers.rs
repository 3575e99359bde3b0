use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::entities::{Dish, Restaurant};
use crate::params::{parse_id, DishFilterQuery, ParamError, RestaurantFilterQuery};
use crate::store::QueryError;

/// Success body: the result wrapped under `restaurants` or `dishes`
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope<T> {
    Restaurants(T),
    Dishes(T),
}

/// Whether a query result holds anything worth a 200
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

/// The response contract shared by every catalog route:
/// query error → 500, empty or absent → 404 with `not_found`, otherwise 200.
fn respond<T: Presence>(
    result: Result<T, QueryError>,
    wrap: fn(T) -> Envelope<T>,
    not_found: impl FnOnce() -> String,
) -> ApiResult<Json<Envelope<T>>> {
    let found = result?;
    if !found.is_present() {
        return Err(ApiError::NotFound(not_found()));
    }
    Ok(Json(wrap(found)))
}

/// Axum rejects undecodable segments and query strings with plain text;
/// route them through `ApiError` so every response stays JSON.
fn extracted<T, E: std::fmt::Display>(extractor: Result<T, E>) -> ApiResult<T> {
    extractor.map_err(|e| ApiError::BadRequest(ParamError::Malformed(e.to_string())))
}

type Restaurants = ApiResult<Json<Envelope<Vec<Restaurant>>>>;
type Dishes = ApiResult<Json<Envelope<Vec<Dish>>>>;

// ============================================================================
// Restaurants
// ============================================================================

/// GET /restaurants
pub async fn list_restaurants(State(state): State<AppState>) -> Restaurants {
    respond(state.store.all_restaurants(), Envelope::Restaurants, || {
        "No restaurants found!".to_string()
    })
}

/// GET /restaurants/details/:id - single object, not a list
pub async fn restaurant_details(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Envelope<Option<Restaurant>>>> {
    let Path(id) = extracted(path)?;
    let id = parse_id(&id)?;
    respond(state.store.restaurant_by_id(id), Envelope::Restaurants, || {
        format!("No restaurant found with id {}!", id)
    })
}

/// GET /restaurants/cuisine/:cuisine
pub async fn restaurants_by_cuisine(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Restaurants {
    let Path(cuisine) = extracted(path)?;
    respond(
        state.store.restaurants_by_cuisine(&cuisine),
        Envelope::Restaurants,
        || format!("No restaurants found with cuisine {}!", cuisine),
    )
}

/// GET /restaurants/filter?isVeg=&hasOutdoorSeating=&isLuxury=
pub async fn filter_restaurants(
    State(state): State<AppState>,
    query: Result<Query<RestaurantFilterQuery>, QueryRejection>,
) -> Restaurants {
    let Query(query) = extracted(query)?;
    let filter = query.parse()?;
    respond(
        state
            .store
            .filter_restaurants(filter.is_veg, filter.has_outdoor_seating, filter.is_luxury),
        Envelope::Restaurants,
        || {
            format!(
                "No restaurants found with isVeg={}, hasOutdoorSeating={}, isLuxury={}!",
                filter.is_veg, filter.has_outdoor_seating, filter.is_luxury
            )
        },
    )
}

/// GET /restaurants/sort-by-rating
pub async fn restaurants_by_rating(State(state): State<AppState>) -> Restaurants {
    respond(state.store.restaurants_by_rating(), Envelope::Restaurants, || {
        "No restaurants found!".to_string()
    })
}

// ============================================================================
// Dishes
// ============================================================================

/// GET /dishes
pub async fn list_dishes(State(state): State<AppState>) -> Dishes {
    respond(state.store.all_dishes(), Envelope::Dishes, || {
        "No dishes found!".to_string()
    })
}

/// GET /dishes/filter?isVeg=
pub async fn filter_dishes(
    State(state): State<AppState>,
    query: Result<Query<DishFilterQuery>, QueryRejection>,
) -> Dishes {
    let Query(query) = extracted(query)?;
    let filter = query.parse()?;
    respond(state.store.filter_dishes(filter.is_veg), Envelope::Dishes, || {
        format!("No dishes found with isVeg={}!", filter.is_veg)
    })
}

/// GET /dishes/details/:id - a list, unlike the restaurant lookup
pub async fn dish_details(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Dishes {
    let Path(id) = extracted(path)?;
    let id = parse_id(&id)?;
    respond(state.store.dishes_by_id(id), Envelope::Dishes, || {
        format!("No dishes found with id {}!", id)
    })
}

/// GET /dishes/sort-by-price
pub async fn dishes_by_price(State(state): State<AppState>) -> Dishes {
    respond(state.store.dishes_by_price(), Envelope::Dishes, || {
        "No dishes found!".to_string()
    })
}

// ============================================================================
// Service
// ============================================================================

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
