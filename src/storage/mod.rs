//! Storage abstraction for uploaded media.
//!
//! Provides a trait-based storage seam with a local filesystem
//! implementation; remote backends can be added behind the same trait.

mod error;
mod local;
mod traits;

pub use error::{StorageError, StorageResult};
pub use local::LocalStorage;
pub use traits::Storage;
