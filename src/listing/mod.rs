//! Marketplace listings: CRUD and filter-based search.

mod models;
mod repository;
mod service;

pub use models::{Listing, ListingFilter, ListingRequest};
pub use repository::ListingRepository;
pub use service::ListingService;
