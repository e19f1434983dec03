//! # larek-api: Catalog & Order Client
//!
//! Network half of the storefront. Everything that leaves the process goes
//! through the [`CatalogSource`] trait, so the presenter can run against the
//! real HTTP API ([`ShopApi`]) or an in-memory catalog ([`MemoryCatalog`]).
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Presenter                  CatalogSource               Server          │
//! │  ─────────                  ─────────────               ──────          │
//! │                                                                         │
//! │  startup ─────────────────► get_products() ───────────► GET /product/  │
//! │     │                                                                   │
//! │     └─ state.set_products_items(items)                                  │
//! │                                                                         │
//! │  view <id> (not cached) ──► get_product(id) ────────► GET /product/{id}│
//! │     └─ found → reload catalog                                           │
//! │                                                                         │
//! │  "Оплатить" ──────────────► create_order(invoice) ────► POST /order    │
//! │     │                                                                   │
//! │     ├─ Ok  → reset order + basket, show success                        │
//! │     └─ Err → log, keep state                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod memory;

use async_trait::async_trait;

use larek_core::{OrderInvoice, OrderResult, Product};

pub use client::{ApiListResponse, ShopApi};
pub use config::{ApiConfig, ApiSettings};
pub use error::{ApiError, ApiResult};
pub use memory::MemoryCatalog;

/// Source of catalog data and sink for orders.
///
/// Futures are not `Send`: the storefront drives them on a current-thread
/// runtime next to its `Rc` state.
#[async_trait(?Send)]
pub trait CatalogSource {
    /// Full product list with image references made absolute.
    async fn get_products(&self) -> ApiResult<Vec<Product>>;

    /// One product by id. Unknown ids are [`ApiError::NotFound`].
    async fn get_product(&self, id: &str) -> ApiResult<Product>;

    /// Submits an order and returns the server's confirmation.
    async fn create_order(&self, invoice: &OrderInvoice) -> ApiResult<OrderResult>;
}
