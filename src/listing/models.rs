//! Listing data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A marketplace listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: Option<String>,
    /// Account that posted the listing; mutations require this owner.
    pub seller_id: String,
    /// Denormalized for display.
    pub seller_username: String,
    pub status: String,
    pub posted_at: String,
}

/// Request body for creating or updating a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Search filters; all optional and combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilter {
    /// Case-insensitive match against title and description.
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}
