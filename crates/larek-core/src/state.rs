//! # Application State Model
//!
//! Owns the catalog, the basket, the previewed product and the order draft.
//! Every externally visible change is announced through the [`EventBus`].
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Model Operations                               │
//! │                                                                         │
//! │  UI Callback              Mutator                    Event              │
//! │  ───────────              ───────                    ─────              │
//! │                                                                         │
//! │  catalog loaded ────────► set_products_items() ────► products-updated  │
//! │  click card ────────────► set_preview() ──────────► preview-updated    │
//! │  "Купить" ──────────────► add_basket_item() ──────► basket-updated     │
//! │  "Удалить" ─────────────► remove_basket_item() ───► basket-updated     │
//! │  header basket icon ────► init_basket() ──────────► basket-init        │
//! │  order placed ──────────► reset_basket() ─────────► basket-reset       │
//! │  "Оформить" ────────────► init_order() ───────────► order-step         │
//! │  "Далее" ───────────────► set_step(contacts) ─────► order-step         │
//! │  form input ────────────► set_order_field() ──────► (none)             │
//! │  order placed / cancel ─► reset_order() ──────────► (none)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Checkout Step Machine
//! ```text
//!            init_order / set_step(shipment)
//!   ┌──────┐ ─────────────────────────────► ┌──────────┐
//!   │ none │                                │ shipment │ ◄─┐
//!   └──────┘ ◄──────────┐                   └────┬─────┘   │ set_step(shipment)
//!       ▲               │ reset_order            │ set_step(contacts)
//!       │               │                        │ (only if shipment valid)
//!       │ reset_order   │                   ┌────▼─────┐   │
//!       └───────────────┴────────────────── │ contacts │ ──┘
//!                                           └──────────┘
//! ```
//!
//! ## Borrowing Rules
//! Data lives in a `RefCell`. Every mutator finishes its write and drops the
//! borrow before emitting, so handlers can freely call queries or even other
//! mutators on the same model.
//!
//! ## Precondition Violations
//! Removing an absent item, adding a priceless or unknown product, jumping
//! to contacts with an invalid shipment form: all silently ignored (logged at
//! debug level). These cannot happen through the intended UI flow.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::events::{AppEvent, EventBus};
use crate::money::Money;
use crate::types::{OrderDraft, OrderField, OrderInvoice, OrderStep, PaymentMethod, Product};
use crate::validation::{validate_order_field, validate_product, validate_unique_id};

/// Field -> message for every invalid field of the current step.
pub type OrderErrors = BTreeMap<OrderField, String>;

#[derive(Debug, Default)]
struct StateData {
    products: Vec<Product>,
    basket: Vec<Product>,
    preview: Option<Product>,
    order: OrderDraft,
    step: Option<OrderStep>,
}

impl StateData {
    fn find_product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn basket_contains(&self, id: &str) -> bool {
        self.basket.iter().any(|p| p.id == id)
    }

    fn step_errors(&self, step: OrderStep) -> OrderErrors {
        step.required_fields()
            .iter()
            .filter_map(|&field| {
                validate_order_field(&self.order, field)
                    .err()
                    .map(|err| (field, err.to_string()))
            })
            .collect()
    }
}

/// The storefront's single state owner.
///
/// Constructed explicitly at startup and shared by reference (`Rc`) with the
/// presenter; there is no global instance.
///
/// ## Example
/// ```rust
/// use std::rc::Rc;
/// use larek_core::events::EventBus;
/// use larek_core::money::Money;
/// use larek_core::state::AppStateModel;
/// use larek_core::types::{Category, Product};
///
/// let bus = Rc::new(EventBus::new());
/// let state = AppStateModel::new(bus);
///
/// let product = Product {
///     id: "a".into(),
///     title: "Фреймворк куки судьбы".into(),
///     description: String::new(),
///     image: String::new(),
///     category: Category::Other,
///     price: Some(Money::from_units(2500)),
/// };
///
/// state.set_products_items(vec![product.clone()]);
/// state.add_basket_item(&product);
/// assert_eq!(state.get_basket_price().units(), 2500);
/// ```
pub struct AppStateModel {
    data: RefCell<StateData>,
    events: Rc<EventBus<AppEvent>>,
}

impl AppStateModel {
    pub fn new(events: Rc<EventBus<AppEvent>>) -> Self {
        AppStateModel {
            data: RefCell::new(StateData::default()),
            events,
        }
    }

    /// The bus this model emits on.
    pub fn events(&self) -> &Rc<EventBus<AppEvent>> {
        &self.events
    }

    fn emit(&self, event: AppEvent) {
        self.events.emit(&event);
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Replaces the catalog wholesale.
    ///
    /// Entries failing [`validate_product`] and repeated ids are dropped with
    /// a warning. A preview whose product disappeared is cleared. Basket
    /// entries are kept: catalog membership is checked at insertion time only.
    pub fn set_products_items(&self, items: Vec<Product>) {
        let mut seen = HashSet::new();
        let products: Vec<Product> = items
            .into_iter()
            .filter(|product| {
                match validate_product(product)
                    .and_then(|()| validate_unique_id(&mut seen, &product.id))
                {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(id = %product.id, error = %err, "Invalid catalog entry, skipping");
                        false
                    }
                }
            })
            .collect();

        let payload = {
            let mut data = self.data.borrow_mut();
            data.products = products;

            let stale_preview = data
                .preview
                .as_ref()
                .is_some_and(|p| data.find_product(&p.id).is_none());
            if stale_preview {
                data.preview = None;
            }

            debug!(count = data.products.len(), "Catalog replaced");
            data.products.clone()
        };

        self.emit(AppEvent::ProductsUpdated { items: payload });
    }

    pub fn get_products(&self) -> Vec<Product> {
        self.data.borrow().products.clone()
    }

    pub fn get_product(&self, id: &str) -> Option<Product> {
        self.data.borrow().find_product(id).cloned()
    }

    // =========================================================================
    // Preview
    // =========================================================================

    /// Selects a catalog product for the preview modal.
    pub fn set_preview(&self, product: &Product) {
        let item = {
            let mut data = self.data.borrow_mut();
            let Some(item) = data.find_product(&product.id).cloned() else {
                debug!(id = %product.id, "Preview of unknown product ignored");
                return;
            };
            data.preview = Some(item.clone());
            item
        };

        self.emit(AppEvent::PreviewUpdated { item });
    }

    pub fn get_preview(&self) -> Option<Product> {
        self.data.borrow().preview.clone()
    }

    /// Drops the preview selection (modal closed). Emits nothing.
    pub fn clear_preview(&self) {
        self.data.borrow_mut().preview = None;
    }

    // =========================================================================
    // Basket
    // =========================================================================

    /// Appends a product to the basket.
    ///
    /// Ignored when the product is priceless, not in the catalog, or already
    /// in the basket.
    pub fn add_basket_item(&self, product: &Product) {
        let items = {
            let mut data = self.data.borrow_mut();

            let Some(item) = data.find_product(&product.id).cloned() else {
                debug!(id = %product.id, "Add of unknown product ignored");
                return;
            };
            if !item.is_purchasable() {
                debug!(id = %item.id, "Add of priceless product ignored");
                return;
            }
            if data.basket_contains(&item.id) {
                debug!(id = %item.id, "Product already in basket");
                return;
            }

            debug!(id = %item.id, "Added to basket");
            data.basket.push(item);
            data.basket.clone()
        };

        self.emit(AppEvent::BasketUpdated { items });
    }

    /// Removes a product from the basket by id. Absent ids are ignored.
    pub fn remove_basket_item(&self, id: &str) {
        let items = {
            let mut data = self.data.borrow_mut();
            let before = data.basket.len();
            data.basket.retain(|p| p.id != id);
            if data.basket.len() == before {
                debug!(id, "Remove of absent basket item ignored");
                return;
            }

            debug!(id, "Removed from basket");
            data.basket.clone()
        };

        self.emit(AppEvent::BasketUpdated { items });
    }

    /// Announces that the basket view should open. No state changes.
    pub fn init_basket(&self) {
        let items = self.get_basket_items();
        self.emit(AppEvent::BasketInit { items });
    }

    /// Empties the basket.
    pub fn reset_basket(&self) {
        self.data.borrow_mut().basket.clear();
        debug!("Basket reset");
        self.emit(AppEvent::BasketReset { items: Vec::new() });
    }

    pub fn get_basket_items(&self) -> Vec<Product> {
        self.data.borrow().basket.clone()
    }

    pub fn get_basket_count(&self) -> usize {
        self.data.borrow().basket.len()
    }

    /// Sum of the basket's prices.
    pub fn get_basket_price(&self) -> Money {
        self.data
            .borrow()
            .basket
            .iter()
            .map(Product::price_or_zero)
            .sum()
    }

    pub fn get_basket_is_contains(&self, id: &str) -> bool {
        self.data.borrow().basket_contains(id)
    }

    // =========================================================================
    // Order Workflow
    // =========================================================================

    /// Starts checkout on the shipment step. The draft is kept, so a user who
    /// closed the form finds their input again.
    pub fn init_order(&self) {
        self.data.borrow_mut().step = Some(OrderStep::Shipment);
        debug!("Checkout started");
        self.emit(AppEvent::OrderStepChanged {
            step: OrderStep::Shipment,
        });
    }

    /// Moves checkout to `step`.
    ///
    /// Contacts is only reachable from shipment with a valid shipment form;
    /// shipment is always reachable. Refused transitions leave the step as
    /// it was and emit nothing.
    pub fn set_step(&self, step: OrderStep) {
        {
            let mut data = self.data.borrow_mut();
            let allowed = match step {
                OrderStep::Shipment => true,
                OrderStep::Contacts => {
                    data.step == Some(OrderStep::Shipment)
                        && data.step_errors(OrderStep::Shipment).is_empty()
                }
            };

            if !allowed {
                debug!(from = ?data.step, to = %step, "Step transition refused");
                return;
            }

            debug!(from = ?data.step, to = %step, "Step changed");
            data.step = Some(step);
        }

        self.emit(AppEvent::OrderStepChanged { step });
    }

    pub fn get_order_step(&self) -> Option<OrderStep> {
        self.data.borrow().step
    }

    /// Writes one draft field.
    ///
    /// For [`OrderField::Payment`] the value is parsed as a payment method;
    /// an unrecognised value clears the choice so the form reports it as
    /// missing. Validity is not cached: queries recompute it.
    pub fn set_order_field(&self, field: OrderField, value: &str) {
        let mut data = self.data.borrow_mut();
        match field {
            OrderField::Payment => {
                data.order.payment = match value.parse::<PaymentMethod>() {
                    Ok(method) => Some(method),
                    Err(err) => {
                        debug!(error = %err, "Payment choice cleared");
                        None
                    }
                }
            }
            OrderField::Address => data.order.address = value.to_string(),
            OrderField::Email => data.order.email = value.to_string(),
            OrderField::Phone => data.order.phone = value.to_string(),
        }
        debug!(%field, "Order field updated");
    }

    /// Clears the draft and ends checkout. Emits nothing.
    pub fn reset_order(&self) {
        let mut data = self.data.borrow_mut();
        data.order = OrderDraft::default();
        data.step = None;
        debug!("Order reset");
    }

    pub fn get_order(&self) -> OrderDraft {
        self.data.borrow().order.clone()
    }

    /// Draft + basket ids + total, shaped for submission.
    pub fn get_order_invoice(&self) -> OrderInvoice {
        let data = self.data.borrow();
        OrderInvoice {
            payment: data.order.payment,
            address: data.order.address.clone(),
            email: data.order.email.clone(),
            phone: data.order.phone.clone(),
            items: data.basket.iter().map(|p| p.id.clone()).collect(),
            total: data.basket.iter().map(Product::price_or_zero).sum(),
        }
    }

    /// Messages for the current step's invalid fields. Empty when no
    /// checkout is in progress.
    pub fn get_order_errors(&self) -> OrderErrors {
        let data = self.data.borrow();
        match data.step {
            Some(step) => data.step_errors(step),
            None => OrderErrors::new(),
        }
    }

    /// True when the current step's required fields are all valid.
    pub fn get_order_is_valid(&self) -> bool {
        let data = self.data.borrow();
        match data.step {
            Some(step) => data.step_errors(step).is_empty(),
            None => false,
        }
    }
}

impl std::fmt::Debug for AppStateModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStateModel")
            .field("data", &self.data.borrow())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
