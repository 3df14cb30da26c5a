//! Listing repository for database operations.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use super::models::{Listing, ListingFilter, ListingRequest};

/// Repository for listing database operations.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    pool: SqlitePool,
}

impl ListingRepository {
    /// Create a new listing repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a new listing ID.
    fn generate_id() -> String {
        format!("lst_{}", nanoid::nanoid!(12))
    }

    /// Insert a new listing.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(
        &self,
        request: &ListingRequest,
        seller_id: &str,
        seller_username: &str,
    ) -> Result<Listing> {
        let id = Self::generate_id();
        let posted_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO listings
                (id, title, description, price, category, image_url,
                 seller_id, seller_username, status, posted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'available', ?)
            "#,
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.price)
        .bind(&request.category)
        .bind(&request.image_url)
        .bind(seller_id)
        .bind(seller_username)
        .bind(&posted_at)
        .execute(&self.pool)
        .await
        .context("inserting listing")?;

        self.get(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Listing not found after creation"))
    }

    /// Get a listing by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<Listing>> {
        sqlx::query_as::<_, Listing>(
            r#"
            SELECT id, title, description, price, category, image_url,
                   seller_id, seller_username, status, posted_at
            FROM listings
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetching listing")
    }

    /// List listings matching the filter, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>> {
        // Build dynamic query based on filters
        let mut sql = String::from(
            r#"
            SELECT id, title, description, price, category, image_url,
                   seller_id, seller_username, status, posted_at
            FROM listings
            WHERE 1=1
            "#,
        );

        let mut text_binds: Vec<String> = Vec::new();
        let mut price_binds: Vec<f64> = Vec::new();

        if let Some(search) = &filter.search {
            sql.push_str(" AND (LOWER(title) LIKE ? OR LOWER(description) LIKE ?)");
            let pattern = format!("%{}%", search.to_lowercase());
            text_binds.push(pattern.clone());
            text_binds.push(pattern);
        }

        if let Some(category) = &filter.category {
            sql.push_str(" AND category = ?");
            text_binds.push(category.clone());
        }

        if let Some(min_price) = filter.min_price {
            sql.push_str(" AND price >= ?");
            price_binds.push(min_price);
        }

        if let Some(max_price) = filter.max_price {
            sql.push_str(" AND price <= ?");
            price_binds.push(max_price);
        }

        sql.push_str(" ORDER BY posted_at DESC");

        let mut query = sqlx::query_as::<_, Listing>(&sql);
        for value in &text_binds {
            query = query.bind(value);
        }
        for value in &price_binds {
            query = query.bind(value);
        }

        query.fetch_all(&self.pool).await.context("listing search")
    }

    /// Update a listing's editable fields.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: &str, request: &ListingRequest) -> Result<Listing> {
        sqlx::query(
            r#"
            UPDATE listings
            SET title = ?, description = ?, price = ?, category = ?, image_url = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.price)
        .bind(&request.category)
        .bind(&request.image_url)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("updating listing")?;

        self.get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Listing not found: {}", id))
    }

    /// Delete a listing.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("deleting listing")?;
        Ok(())
    }
}
