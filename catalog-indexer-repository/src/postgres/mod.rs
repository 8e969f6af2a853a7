//! Postgres implementation of the catalog store.

mod client;
mod queries;

pub use client::PostgresCatalogStore;
