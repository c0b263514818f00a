//! External service interactions
//!
//! - `catalog` - client trait and the request/response envelopes
//! - `http` - REST implementation against the catalog API
//! - `memory` - seeded in-memory catalog for demo mode and tests
//! - `fetch_runner` - background execution of catalog requests

pub mod catalog;
pub mod fetch_runner;
pub mod http;
pub mod memory;

pub use catalog::{
    CatalogClient, CatalogPayload, CatalogQuery, CatalogRequest, CatalogResponse, SpeciesTarget,
};
pub use fetch_runner::FetchRunner;
pub use http::HttpCatalogClient;
pub use memory::MemoryCatalog;
