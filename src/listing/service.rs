//! Listing service: validation and ownership enforcement.

use anyhow::{Result, bail};
use tracing::{info, instrument};

use super::models::{Listing, ListingFilter, ListingRequest};
use super::repository::ListingRepository;

/// Service for listing operations.
#[derive(Debug, Clone)]
pub struct ListingService {
    repo: ListingRepository,
}

impl ListingService {
    /// Create a new listing service.
    pub fn new(repo: ListingRepository) -> Self {
        Self { repo }
    }

    /// Create a listing owned by the calling user.
    #[instrument(skip(self, request), fields(seller_id = %seller_id))]
    pub async fn create_listing(
        &self,
        request: ListingRequest,
        seller_id: &str,
        seller_username: &str,
    ) -> Result<Listing> {
        validate_request(&request)?;

        let listing = self
            .repo
            .create(&request, seller_id, seller_username)
            .await?;
        info!(listing_id = %listing.id, "Created listing");

        Ok(listing)
    }

    /// Get a listing by ID.
    #[instrument(skip(self))]
    pub async fn get_listing(&self, id: &str) -> Result<Option<Listing>> {
        self.repo.get(id).await
    }

    /// Search listings.
    #[instrument(skip(self))]
    pub async fn search(&self, filter: ListingFilter) -> Result<Vec<Listing>> {
        self.repo.list(&filter).await
    }

    /// Update a listing; only the seller may modify it.
    #[instrument(skip(self, request), fields(caller_id = %caller_id))]
    pub async fn update_listing(
        &self,
        id: &str,
        caller_id: &str,
        request: ListingRequest,
    ) -> Result<Listing> {
        validate_request(&request)?;

        let Some(existing) = self.repo.get(id).await? else {
            bail!("Listing not found: {}", id);
        };

        if existing.seller_id != caller_id {
            bail!("permission denied: only the seller can modify this listing");
        }

        self.repo.update(id, &request).await
    }

    /// Delete a listing; only the seller may remove it.
    #[instrument(skip(self), fields(caller_id = %caller_id))]
    pub async fn delete_listing(&self, id: &str, caller_id: &str) -> Result<()> {
        let Some(existing) = self.repo.get(id).await? else {
            bail!("Listing not found: {}", id);
        };

        if existing.seller_id != caller_id {
            bail!("permission denied: only the seller can modify this listing");
        }

        self.repo.delete(id).await?;
        info!(listing_id = %id, "Deleted listing");
        Ok(())
    }
}

/// Validate a create/update request.
fn validate_request(request: &ListingRequest) -> Result<()> {
    if request.title.trim().is_empty()
        || request.description.trim().is_empty()
        || request.category.trim().is_empty()
    {
        bail!("Title, Description, and Category are required.");
    }
    if request.price <= 0.0 {
        bail!("Price must be positive.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup() -> ListingService {
        let db = Database::in_memory().await.unwrap();
        ListingService::new(ListingRepository::new(db.pool().clone()))
    }

    fn request(title: &str, price: f64) -> ListingRequest {
        ListingRequest {
            title: title.to_string(),
            description: "desc".to_string(),
            price,
            category: "misc".to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_price() {
        let service = setup().await;

        let err = service
            .create_listing(request("Lamp", 0.0), "usr_1", "alice")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[tokio::test]
    async fn test_only_seller_can_update() {
        let service = setup().await;

        let listing = service
            .create_listing(request("Lamp", 10.0), "usr_1", "alice")
            .await
            .unwrap();

        let err = service
            .update_listing(&listing.id, "usr_2", request("Stolen lamp", 1.0))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("permission denied"));

        let ok = service
            .update_listing(&listing.id, "usr_1", request("Lamp v2", 8.0))
            .await
            .unwrap();
        assert_eq!(ok.title, "Lamp v2");
    }

    #[tokio::test]
    async fn test_only_seller_can_delete() {
        let service = setup().await;

        let listing = service
            .create_listing(request("Lamp", 10.0), "usr_1", "alice")
            .await
            .unwrap();

        assert!(service.delete_listing(&listing.id, "usr_2").await.is_err());
        assert!(service.delete_listing(&listing.id, "usr_1").await.is_ok());
        assert!(
            service
                .get_listing(&listing.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
