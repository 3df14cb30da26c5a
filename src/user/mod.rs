//! User accounts: registration, credential verification.

mod models;
mod repository;
mod service;

pub use models::{CreateUserRequest, User};
pub use repository::UserRepository;
pub use service::UserService;
