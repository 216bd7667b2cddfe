use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Html, Response},
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    AppState,
    error::{AppError, AppResult, STORE_ERROR_HIDDEN},
    models::{Envelope, Listing, ListingPayload, UpdateQuery},
    openapi,
    service::StoreError,
    templates,
};

pub const LISTINGS_PATH: &str = "/api/listings";
pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(LISTINGS_PATH, get(list).post(create).put(update))
        .route(DOCS_PATH, get(docs))
        .route(OPENAPI_PATH, get(openapi_document))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Listing>>> {
    let listings = state
        .listings
        .list()
        .await
        .map_err(|err| store_failure(&state, err, StatusCode::INTERNAL_SERVER_ERROR))?;
    Ok(Json(listings))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ListingPayload>, JsonRejection>,
) -> AppResult<Response> {
    let Json(payload) = body?;
    let listing = payload.into_listing().ok_or(AppError::MissingFields)?;

    state
        .listings
        .create(&listing)
        .await
        .map_err(|err| store_failure(&state, err, StatusCode::BAD_REQUEST))?;

    tracing::info!(id = %listing.id, "listing created");
    Ok(Envelope::respond(StatusCode::CREATED, "Registro Insertado"))
}

/// The key comes from the query string and is checked before the body is
/// looked at. The body itself is not validated.
pub async fn update(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UpdateQuery>, QueryRejection>,
    body: Result<Json<ListingPayload>, JsonRejection>,
) -> AppResult<Response> {
    let id = query
        .ok()
        .and_then(|Query(q)| q.id)
        .filter(|id| !id.is_empty())
        .ok_or(AppError::MissingKey)?;
    let Json(payload) = body?;

    let affected = state
        .listings
        .update(&id, &payload)
        .await
        .map_err(|err| store_failure(&state, err, StatusCode::BAD_REQUEST))?;

    if affected == 0 {
        tracing::debug!(id = %id, "update matched no listing");
        return Err(AppError::NotFound);
    }

    tracing::info!(id = %id, "listing updated");
    Ok(Envelope::respond(StatusCode::OK, "Registro actualizado correctamente"))
}

pub async fn docs() -> Html<String> {
    Html(templates::docs_page(OPENAPI_PATH))
}

pub async fn openapi_document(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(openapi::document(&state.config))
}

/// Connection failures are always 500; store rejections use `rejected`.
fn store_failure(state: &AppState, err: StoreError, rejected: StatusCode) -> AppError {
    let status = match err {
        StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        StoreError::Query(_) => rejected,
    };
    tracing::warn!(error = %err, status = status.as_u16(), "store operation failed");

    let message = if state.config.expose_store_errors {
        err.to_string()
    } else {
        STORE_ERROR_HIDDEN.to_string()
    };
    AppError::Store { status, message }
}
