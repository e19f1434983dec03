//! # Event Bus
//!
//! Synchronous publish/subscribe dispatcher that decouples state mutation
//! from UI reaction.
//!
//! ## Dispatch Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         EventBus::emit                                  │
//! │                                                                         │
//! │  AppStateModel::add_basket_item                                         │
//! │        │                                                                │
//! │        ▼ emit(BasketUpdated { items })       name = "basket-updated"    │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │ #1  Exact("basket-updated")            ── match ──► handler #1   │   │
//! │  │ #2  AnyOf(basket-updated|basket-reset) ── match ──► handler #2   │   │
//! │  │ #3  Exact("products-updated")          ── skip                   │   │
//! │  │ #4  AnyOf(basket-updated|basket-init)  ── match ──► handler #4   │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │        │                                                                │
//! │        ▼ all handlers returned                                          │
//! │  add_basket_item returns                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Handlers run on the emitting thread, in registration order, before
//!   `emit` returns.
//! - Exact and pattern subscriptions are one list: a subscriber fires once
//!   per emission when its selector matches, regardless of other matches.
//! - A handler panic propagates out of `emit` to the caller.
//! - Dispatch works on a snapshot of the matching handlers, so handlers may
//!   subscribe, unsubscribe or emit while running. A handler removed during
//!   dispatch still receives the event currently being dispatched.
//!
//! ## Re-entrant Emission
//! There is no cycle detection. A handler for event X that emits X again
//! recurses until the stack overflows. Avoiding such cycles is the caller's
//! responsibility.
//!
//! ## Usage
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use larek_core::events::{AppEvent, EventBus, Selector};
//!
//! let bus = EventBus::<AppEvent>::new();
//! let hits = Rc::new(Cell::new(0));
//!
//! let counter = hits.clone();
//! bus.subscribe(Selector::pattern("basket-updated|basket-reset"), move |_| {
//!     counter.set(counter.get() + 1);
//! });
//!
//! bus.emit(&AppEvent::BasketReset { items: vec![] });
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::types::{OrderStep, Product};

// =============================================================================
// Event Trait
// =============================================================================

/// Anything dispatchable through an [`EventBus`]: it only needs a name that
/// selectors can match against.
pub trait Event {
    fn name(&self) -> &str;
}

// =============================================================================
// Selector
// =============================================================================

/// Which event names a subscription receives.
///
/// Pattern subscriptions are predicates over names. `Selector::pattern`
/// accepts the `a|b` alternation syntax and `*` for everything; any other
/// matching rule can be expressed with [`Selector::predicate`].
#[derive(Clone)]
pub enum Selector {
    /// Exactly this event name.
    Exact(String),
    /// Any of these names.
    AnyOf(Vec<String>),
    /// Names for which the predicate returns true.
    Predicate(Rc<dyn Fn(&str) -> bool>),
    /// Every event.
    All,
}

impl Selector {
    pub fn exact(name: impl Into<String>) -> Self {
        Selector::Exact(name.into())
    }

    /// Parses `"basket-updated|basket-reset"` style alternations.
    ///
    /// Empty alternatives are ignored; a single alternative becomes an
    /// [`Selector::Exact`]; `"*"` becomes [`Selector::All`].
    pub fn pattern(pattern: &str) -> Self {
        if pattern.trim() == "*" {
            return Selector::All;
        }

        let mut names: Vec<String> = pattern
            .split('|')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if names.len() == 1 {
            Selector::Exact(names.remove(0))
        } else {
            Selector::AnyOf(names)
        }
    }

    pub fn any_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector::AnyOf(names.into_iter().map(Into::into).collect())
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        Selector::Predicate(Rc::new(predicate))
    }

    /// True when an event with this name should reach the subscriber.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Selector::Exact(expected) => expected == name,
            Selector::AnyOf(names) => names.iter().any(|n| n == name),
            Selector::Predicate(predicate) => predicate(name),
            Selector::All => true,
        }
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::exact(name)
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Exact(name)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Exact(name) => f.debug_tuple("Exact").field(name).finish(),
            Selector::AnyOf(names) => f.debug_tuple("AnyOf").field(names).finish(),
            Selector::Predicate(_) => f.write_str("Predicate(..)"),
            Selector::All => f.write_str("All"),
        }
    }
}

// =============================================================================
// Event Bus
// =============================================================================

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Rc<dyn Fn(&E)>;

struct Subscription<E> {
    id: SubscriptionId,
    selector: Selector,
    handler: Handler<E>,
}

/// Single-threaded event bus.
///
/// Uses interior mutability so that a shared `Rc<EventBus<_>>` can be
/// subscribed to and emitted on from inside handlers. The bus is not `Send`.
pub struct EventBus<E> {
    subscriptions: RefCell<Vec<Subscription<E>>>,
    next_id: Cell<u64>,
}

impl<E: Event> EventBus<E> {
    pub fn new() -> Self {
        EventBus {
            subscriptions: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Registers `handler` for every future event whose name matches
    /// `selector`.
    pub fn subscribe<S, F>(&self, selector: S, handler: F) -> SubscriptionId
    where
        S: Into<Selector>,
        F: Fn(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let selector = selector.into();
        trace!(?selector, id = id.0, "subscribe");

        self.subscriptions.borrow_mut().push(Subscription {
            id,
            selector,
            handler: Rc::new(handler),
        });
        id
    }

    /// Registers `handler` for every event.
    pub fn on_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        self.subscribe(Selector::All, handler)
    }

    /// Removes a subscription. Returns false (and does nothing) when the id is
    /// unknown or already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Removes every subscription.
    pub fn clear(&self) {
        self.subscriptions.borrow_mut().clear();
    }

    pub fn handler_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Invokes every matching handler, in registration order.
    pub fn emit(&self, event: &E) {
        let name = event.name();

        // Snapshot so handlers can touch the subscription list.
        let handlers: Vec<Handler<E>> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.selector.matches(name))
            .map(|s| Rc::clone(&s.handler))
            .collect();

        trace!(event = name, handlers = handlers.len(), "emit");

        for handler in handlers {
            handler(event);
        }
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscriptions = self.subscriptions.borrow();
        let selectors: Vec<&Selector> = subscriptions.iter().map(|s| &s.selector).collect();
        f.debug_struct("EventBus")
            .field("subscriptions", &selectors)
            .finish()
    }
}

// =============================================================================
// Storefront Events
// =============================================================================

/// Wire names of the storefront events.
pub mod names {
    pub const PRODUCTS_UPDATED: &str = "products-updated";
    pub const PREVIEW_UPDATED: &str = "preview-updated";
    pub const BASKET_UPDATED: &str = "basket-updated";
    pub const BASKET_INIT: &str = "basket-init";
    pub const BASKET_RESET: &str = "basket-reset";
    pub const ORDER_STEP: &str = "order-step";
    pub const MODAL_OPEN: &str = "modal:open";
    pub const MODAL_CLOSE: &str = "modal:close";
}

/// Every event the storefront emits, each with a fixed payload shape.
///
/// Serialized as `{ "event": "<name>", "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "event", content = "data")]
pub enum AppEvent {
    /// Catalog replaced.
    #[serde(rename = "products-updated")]
    ProductsUpdated { items: Vec<Product> },

    /// A product was selected for the preview modal.
    #[serde(rename = "preview-updated")]
    PreviewUpdated { item: Product },

    /// Basket contents changed (add or remove).
    #[serde(rename = "basket-updated")]
    BasketUpdated { items: Vec<Product> },

    /// User asked to open the basket.
    #[serde(rename = "basket-init")]
    BasketInit { items: Vec<Product> },

    /// Basket emptied (after a successful order).
    #[serde(rename = "basket-reset")]
    BasketReset { items: Vec<Product> },

    /// Checkout moved to a new step.
    #[serde(rename = "order-step")]
    OrderStepChanged { step: OrderStep },

    /// Modal became visible.
    #[serde(rename = "modal:open")]
    ModalOpened,

    /// Modal was closed.
    #[serde(rename = "modal:close")]
    ModalClosed,
}

impl Event for AppEvent {
    fn name(&self) -> &str {
        match self {
            AppEvent::ProductsUpdated { .. } => names::PRODUCTS_UPDATED,
            AppEvent::PreviewUpdated { .. } => names::PREVIEW_UPDATED,
            AppEvent::BasketUpdated { .. } => names::BASKET_UPDATED,
            AppEvent::BasketInit { .. } => names::BASKET_INIT,
            AppEvent::BasketReset { .. } => names::BASKET_RESET,
            AppEvent::OrderStepChanged { .. } => names::ORDER_STEP,
            AppEvent::ModalOpened => names::MODAL_OPEN,
            AppEvent::ModalClosed => names::MODAL_CLOSE,
        }
    }
}

impl AppEvent {
    /// Basket payload for the three basket events.
    pub fn basket_items(&self) -> Option<&[Product]> {
        match self {
            AppEvent::BasketUpdated { items }
            | AppEvent::BasketInit { items }
            | AppEvent::BasketReset { items } => Some(items),
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
