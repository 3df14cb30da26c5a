//! API request handlers.

mod auth;
mod listings;
mod misc;
mod uploads;

pub use auth::{login, register};
pub use listings::{create_listing, delete_listing, get_listing, list_listings, update_listing};
pub use misc::health;
pub use uploads::upload_image;
