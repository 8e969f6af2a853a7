//! Configuration and dependency wiring for the catalog indexer.

pub mod dependencies;
pub mod settings;

pub use dependencies::Dependencies;
pub use settings::Settings;
