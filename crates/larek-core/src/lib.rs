//! # larek-core: Pure Storefront Logic
//!
//! This crate is the **heart** of the Larek storefront: the event bus, the
//! application state model and the checkout workflow. It has zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Larek Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presenter + Renderers (storefront)              │   │
//! │  │   Gallery ──► Preview ──► Basket ──► Shipment ──► Contacts      │   │
//! │  └──────────────▲──────────────────────────────┬───────────────────┘   │
//! │                 │ events                       │ mutator calls          │
//! │  ┌──────────────┴──────────────────────────────▼───────────────────┐   │
//! │  │               ★ larek-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  events   │  │   state   │  │   types   │  │ validation│  │   │
//! │  │   │ EventBus  │◄─│ AppState  │  │  Product  │  │  email    │  │   │
//! │  │   │ Selector  │  │  Model    │  │  Invoice  │  │  phone    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO RENDERING                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 larek-api (HTTP catalog / orders)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`events`] - Synchronous event bus and the storefront's event union
//! - [`state`] - Application state model and checkout step machine
//! - [`types`] - Domain types (Product, OrderDraft, OrderInvoice, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`validation`] - Order field and catalog entry validation
//! - [`error`] - Domain error types
//!
//! ## Threading
//! Everything here is single-threaded (`Rc`/`RefCell`). Handlers run to
//! completion on the emitting thread before the mutator returns.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod events;
pub mod money;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use events::{AppEvent, Event, EventBus, Selector, SubscriptionId};
pub use money::Money;
pub use state::{AppStateModel, OrderErrors};
pub use types::*;
