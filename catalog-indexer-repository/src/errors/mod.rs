//! Error types for the repository backends.

mod checkpoint_error;
mod search_error;
mod store_error;

pub use checkpoint_error::CheckpointError;
pub use search_error::SearchError;
pub use store_error::StoreError;
