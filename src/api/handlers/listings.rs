//! Listing handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::CurrentUser;
use crate::listing::{Listing, ListingFilter, ListingRequest};

/// List listings matching the query filters.
#[instrument(skip(state, _user))]
pub async fn list_listings(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<ListingFilter>,
) -> ApiResult<Json<serde_json::Value>> {
    let listings = state.listings.search(filter).await?;
    Ok(Json(json!({ "listings": listings })))
}

/// Create a listing owned by the caller.
#[instrument(skip(state, user, request))]
pub async fn create_listing(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ListingRequest>,
) -> ApiResult<impl IntoResponse> {
    let listing = state
        .listings
        .create_listing(request, user.id(), user.display_name())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Listing created successfully!",
            "listing": listing,
        })),
    ))
}

/// Get a single listing.
#[instrument(skip(state, _user))]
pub async fn get_listing(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Listing>> {
    let listing = state
        .listings
        .get_listing(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found."))?;
    Ok(Json(listing))
}

/// Update a listing; only the seller may do so.
#[instrument(skip(state, user, request))]
pub async fn update_listing(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<ListingRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let listing = state
        .listings
        .update_listing(&id, user.id(), request)
        .await?;

    Ok(Json(json!({
        "message": "Listing updated successfully!",
        "listing": listing,
    })))
}

/// Delete a listing; only the seller may do so.
#[instrument(skip(state, user))]
pub async fn delete_listing(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.listings.delete_listing(&id, user.id()).await?;
    Ok(Json(json!({ "message": "Listing deleted successfully!" })))
}
