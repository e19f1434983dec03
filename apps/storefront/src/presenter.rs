//! # Presenter
//!
//! Wires state model events to views and turns user actions into mutator
//! calls. The presenter owns no state of its own beyond its subscriptions.
//!
//! ## Subscriptions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Event(s)                          View                                 │
//! │  ────────                          ────                                 │
//! │  basket-updated | basket-reset ──► header counter                      │
//! │  basket-updated | basket-init  ──► modal: basket                       │
//! │  preview-updated ────────────────► modal: preview                      │
//! │  products-updated ───────────────► gallery                             │
//! │  order-step ─────────────────────► modal: shipment / contacts form     │
//! │  modal:open ─────────────────────► page locked                         │
//! │  modal:close ────────────────────► page unlocked, preview cleared      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers hold weak references to the state model and the modal; the bus
//! they are registered on is owned by the state model.

use std::rc::Rc;

use tracing::{debug, error, info};

use larek_api::{ApiError, CatalogSource};
use larek_core::events::names;
use larek_core::{
    AppEvent, AppStateModel, CoreError, OrderField, OrderResult, OrderStep, Selector,
    SubscriptionId,
};

use crate::config::DisplayConfig;
use crate::error::AppResult;
use crate::modal::{Modal, Page};
use crate::view::{
    BasketArgs, CardArgs, GalleryArgs, HeaderArgs, ModalContent, OrderFormArgs, PreviewArgs,
    StorefrontView, SuccessArgs,
};

/// Current order form, built from live state.
fn order_form_args(state: &AppStateModel, step: OrderStep) -> OrderFormArgs {
    OrderFormArgs {
        step,
        invoice: state.get_order_invoice(),
        errors: state.get_order_errors(),
        is_disabled: !state.get_order_is_valid(),
    }
}

pub struct Presenter {
    state: Rc<AppStateModel>,
    source: Rc<dyn CatalogSource>,
    display: Rc<DisplayConfig>,
    modal: Rc<Modal>,
    page: Rc<Page>,
    subscriptions: Vec<SubscriptionId>,
}

impl Presenter {
    pub fn new<V>(
        state: Rc<AppStateModel>,
        source: Rc<dyn CatalogSource>,
        display: DisplayConfig,
        view: Rc<V>,
    ) -> Self
    where
        V: StorefrontView + 'static,
    {
        let display = Rc::new(display);
        let modal = Rc::new(Modal::new(state.events().clone(), view.clone()));
        let page = Rc::new(Page::new(view.clone()));

        let mut presenter = Presenter {
            state,
            source,
            display,
            modal,
            page,
            subscriptions: Vec::new(),
        };
        presenter.wire(view);
        presenter
    }

    fn wire<V>(&mut self, view: Rc<V>)
    where
        V: StorefrontView + 'static,
    {
        let events = self.state.events().clone();
        let subscriptions = &mut self.subscriptions;

        let header = view.clone();
        subscriptions.push(events.subscribe(
            Selector::pattern(&format!("{}|{}", names::BASKET_UPDATED, names::BASKET_RESET)),
            move |event: &AppEvent| {
                if let Some(items) = event.basket_items() {
                    header.render(HeaderArgs {
                        counter: items.len(),
                    });
                }
            },
        ));

        let (modal, display) = (Rc::downgrade(&self.modal), self.display.clone());
        subscriptions.push(events.subscribe(
            Selector::pattern(&format!("{}|{}", names::BASKET_UPDATED, names::BASKET_INIT)),
            move |event: &AppEvent| {
                let (Some(modal), Some(items)) = (modal.upgrade(), event.basket_items()) else {
                    return;
                };
                modal.open(ModalContent::Basket(BasketArgs::new(items, &display)));
            },
        ));

        let (modal, state, display) = (
            Rc::downgrade(&self.modal),
            Rc::downgrade(&self.state),
            self.display.clone(),
        );
        subscriptions.push(events.subscribe(
            names::PREVIEW_UPDATED,
            move |event: &AppEvent| {
                let (Some(modal), Some(state)) = (modal.upgrade(), state.upgrade()) else {
                    return;
                };
                if let AppEvent::PreviewUpdated { item } = event {
                    let in_basket = state.get_basket_is_contains(&item.id);
                    modal.open(ModalContent::Preview(PreviewArgs::new(item, in_basket, &display)));
                }
            },
        ));

        let (gallery, display) = (view, self.display.clone());
        subscriptions.push(events.subscribe(
            names::PRODUCTS_UPDATED,
            move |event: &AppEvent| {
                if let AppEvent::ProductsUpdated { items } = event {
                    let items = items.iter().map(|p| CardArgs::new(p, &display)).collect();
                    gallery.render(GalleryArgs { items });
                }
            },
        ));

        let (modal, state) = (Rc::downgrade(&self.modal), Rc::downgrade(&self.state));
        subscriptions.push(events.subscribe(
            names::ORDER_STEP,
            move |event: &AppEvent| {
                let (Some(modal), Some(state)) = (modal.upgrade(), state.upgrade()) else {
                    return;
                };
                if let AppEvent::OrderStepChanged { step } = event {
                    modal.open(ModalContent::Order(order_form_args(&state, *step)));
                }
            },
        ));

        let page = self.page.clone();
        subscriptions.push(events.subscribe(names::MODAL_OPEN, move |_: &AppEvent| {
            page.set_locked(true)
        }));

        let (page, state) = (self.page.clone(), Rc::downgrade(&self.state));
        subscriptions.push(events.subscribe(names::MODAL_CLOSE, move |_: &AppEvent| {
            page.set_locked(false);
            if let Some(state) = state.upgrade() {
                state.clear_preview();
            }
        }));
    }

    pub fn state(&self) -> &Rc<AppStateModel> {
        &self.state
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetches the catalog and hands it to the state model.
    pub async fn load_catalog(&self) -> AppResult<usize> {
        match self.source.get_products().await {
            Ok(products) => {
                self.state.set_products_items(products);
                let count = self.state.get_products().len();
                info!(count, "Catalog loaded");
                Ok(count)
            }
            Err(err) => {
                error!(error = %err, "Catalog load failed");
                Err(err.into())
            }
        }
    }

    /// Gallery card click.
    pub fn select_product(&self, id: &str) -> AppResult<()> {
        let product = self
            .state
            .get_product(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        self.state.set_preview(&product);
        Ok(())
    }

    /// Opens a product by id, asking the source when the cached catalog does
    /// not know it. A product found that way means the catalog is stale, so
    /// it is reloaded before the preview opens.
    pub async fn open_product(&self, id: &str) -> AppResult<()> {
        if self.state.get_product(id).is_some() {
            return self.select_product(id);
        }

        match self.source.get_product(id).await {
            Ok(product) => {
                debug!(id = %product.id, "Product missing from cached catalog, reloading");
                self.load_catalog().await?;
                self.select_product(id)
            }
            Err(ApiError::NotFound(_)) => Err(CoreError::ProductNotFound(id.to_string()).into()),
            Err(err) => {
                error!(error = %err, "Product lookup failed");
                Err(err.into())
            }
        }
    }

    /// Preview button: buys the previewed product or takes it back out.
    pub fn toggle_preview_item(&self) {
        let Some(item) = self.state.get_preview() else {
            debug!("Toggle without preview ignored");
            return;
        };

        if self.state.get_basket_is_contains(&item.id) {
            self.state.remove_basket_item(&item.id);
        } else {
            self.state.add_basket_item(&item);
        }
    }

    // =========================================================================
    // Basket
    // =========================================================================

    /// Header basket icon.
    pub fn open_basket(&self) {
        self.state.init_basket();
    }

    pub fn remove_basket_item(&self, id: &str) {
        self.state.remove_basket_item(id);
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Basket "Оформить" button, disabled for an empty basket.
    pub fn start_order(&self) {
        if self.state.get_basket_count() == 0 {
            debug!("Checkout of empty basket ignored");
            return;
        }
        self.state.init_order();
    }

    /// Form input: stores the value and redraws the active form.
    pub fn input_order_field(&self, field: OrderField, value: &str) {
        self.state.set_order_field(field, value);
        if let Some(step) = self.state.get_order_step() {
            self.modal
                .open(ModalContent::Order(order_form_args(&self.state, step)));
        }
    }

    /// Form submit: shipment moves on to contacts, contacts places the order.
    pub async fn submit_step(&self) -> AppResult<Option<OrderResult>> {
        match self.state.get_order_step() {
            Some(OrderStep::Shipment) => {
                self.state.set_step(OrderStep::Contacts);
                Ok(None)
            }
            Some(OrderStep::Contacts) => self.submit_order().await,
            None => {
                debug!("Submit without checkout ignored");
                Ok(None)
            }
        }
    }

    /// Abandons checkout: the draft is cleared and the modal closed. The
    /// basket is kept.
    pub fn cancel_order(&self) {
        if self.state.get_order_step().is_none() {
            debug!("Cancel without checkout ignored");
            return;
        }
        self.state.reset_order();
        self.modal.close();
    }

    /// Goes back from contacts to the shipment form.
    pub fn back_to_shipment(&self) {
        if self.state.get_order_step().is_some() {
            self.state.set_step(OrderStep::Shipment);
        }
    }

    /// Posts the invoice.
    ///
    /// Only runs on a valid contacts step with a non-empty basket; otherwise
    /// returns `Ok(None)`. On success the draft and basket are reset and the
    /// success screen is shown. On failure nothing changes.
    pub async fn submit_order(&self) -> AppResult<Option<OrderResult>> {
        let ready = self.state.get_order_step() == Some(OrderStep::Contacts)
            && self.state.get_order_is_valid()
            && self.state.get_basket_count() > 0;
        if !ready {
            debug!("Order submission refused");
            return Ok(None);
        }

        let invoice = self.state.get_order_invoice();
        let result = match self.source.create_order(&invoice).await {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "Order submission failed");
                return Err(err.into());
            }
        };

        info!(order_id = %result.id, total = %result.total, "Order placed");
        self.state.reset_order();
        self.state.reset_basket();

        self.modal.open(ModalContent::Success(SuccessArgs {
            description: format!("Списано {}", self.display.format_money(result.total)),
        }));
        Ok(Some(result))
    }

    pub fn close_modal(&self) {
        self.modal.close();
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        let events = self.state.events();
        for id in self.subscriptions.drain(..) {
            events.unsubscribe(id);
        }
    }
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("state", &self.state)
            .field("modal", &self.modal)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use larek_api::MemoryCatalog;
    use larek_core::{Category, EventBus, Money, Product};

    use crate::view::{PageArgs, Render, BUY_LABEL, REMOVE_LABEL};

    #[derive(Default)]
    struct Recorder {
        page: RefCell<Vec<PageArgs>>,
        header: RefCell<Vec<HeaderArgs>>,
        gallery: RefCell<Vec<GalleryArgs>>,
        modal: RefCell<Vec<ModalContent>>,
    }

    impl Render<PageArgs> for Recorder {
        fn render(&self, args: PageArgs) {
            self.page.borrow_mut().push(args);
        }
    }

    impl Render<HeaderArgs> for Recorder {
        fn render(&self, args: HeaderArgs) {
            self.header.borrow_mut().push(args);
        }
    }

    impl Render<GalleryArgs> for Recorder {
        fn render(&self, args: GalleryArgs) {
            self.gallery.borrow_mut().push(args);
        }
    }

    impl Render<ModalContent> for Recorder {
        fn render(&self, args: ModalContent) {
            self.modal.borrow_mut().push(args);
        }
    }

    impl Recorder {
        fn last_counter(&self) -> Option<usize> {
            self.header.borrow().last().map(|h| h.counter)
        }

        fn last_modal(&self) -> Option<ModalContent> {
            self.modal.borrow().last().cloned()
        }
    }

    fn product(id: &str, price: Option<i64>) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {}", id),
            description: String::new(),
            image: format!("/{}.svg", id),
            category: Category::HardSkill,
            price: price.map(Money::from_units),
        }
    }

    struct Fixture {
        presenter: Presenter,
        view: Rc<Recorder>,
        source: Rc<MemoryCatalog>,
    }

    fn fixture() -> Fixture {
        let source = Rc::new(MemoryCatalog::new(vec![
            product("a", Some(200)),
            product("b", Some(300)),
            product("c", None),
        ]));
        let view = Rc::new(Recorder::default());
        let state = Rc::new(AppStateModel::new(Rc::new(EventBus::new())));
        let presenter = Presenter::new(state, source.clone(), DisplayConfig::default(), view.clone());

        Fixture {
            presenter,
            view,
            source,
        }
    }

    /// Loads the catalog, buys `a` and `b`, fills both forms.
    async fn checkout_ready(f: &Fixture) {
        let p = &f.presenter;
        p.load_catalog().await.unwrap();
        for id in ["a", "b"] {
            p.select_product(id).unwrap();
            p.toggle_preview_item();
        }
        p.start_order();
        p.input_order_field(OrderField::Payment, "card");
        p.input_order_field(OrderField::Address, "ул. Пушкина, 1");
        p.submit_step().await.unwrap();
        p.input_order_field(OrderField::Email, "buyer@example.ru");
        p.input_order_field(OrderField::Phone, "+7 (999) 123-45-67");
    }

    #[tokio::test]
    async fn test_catalog_renders_gallery() {
        let f = fixture();
        assert_eq!(f.presenter.load_catalog().await.unwrap(), 3);

        let gallery = f.view.gallery.borrow();
        let cards = &gallery.last().unwrap().items;
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].price, "200 синапсов");
        assert_eq!(cards[0].color, "hard");
        assert_eq!(cards[2].price, "Бесценно");
    }

    #[tokio::test]
    async fn test_catalog_failure_leaves_gallery_empty() {
        let f = fixture();
        f.source.fail_next_request();

        assert!(f.presenter.load_catalog().await.is_err());
        assert!(f.view.gallery.borrow().is_empty());
        assert!(f.presenter.state().get_products().is_empty());
    }

    #[tokio::test]
    async fn test_preview_then_buy_shows_basket() {
        let f = fixture();
        let p = &f.presenter;
        p.load_catalog().await.unwrap();

        p.select_product("a").unwrap();
        match f.view.last_modal() {
            Some(ModalContent::Preview(args)) => assert_eq!(args.button_text, BUY_LABEL),
            other => panic!("expected preview, got {:?}", other),
        }
        assert!(p.page().is_locked());

        p.toggle_preview_item();
        assert_eq!(f.view.last_counter(), Some(1));
        match f.view.last_modal() {
            Some(ModalContent::Basket(args)) => {
                assert_eq!(args.items.len(), 1);
                assert_eq!(args.price, "200 синапсов");
                assert!(!args.is_disabled);
            }
            other => panic!("expected basket, got {:?}", other),
        }

        p.select_product("a").unwrap();
        match f.view.last_modal() {
            Some(ModalContent::Preview(args)) => assert_eq!(args.button_text, REMOVE_LABEL),
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_priceless_preview_cannot_be_bought() {
        let f = fixture();
        let p = &f.presenter;
        p.load_catalog().await.unwrap();

        p.select_product("c").unwrap();
        match f.view.last_modal() {
            Some(ModalContent::Preview(args)) => assert!(args.is_disabled),
            other => panic!("expected preview, got {:?}", other),
        }

        p.toggle_preview_item();
        assert_eq!(p.state().get_basket_count(), 0);
        assert!(f.view.header.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_selection() {
        let f = fixture();
        f.presenter.load_catalog().await.unwrap();
        assert!(f.presenter.select_product("zzz").is_err());
        assert!(!f.presenter.modal().is_open());
    }

    #[tokio::test]
    async fn test_open_product_refreshes_stale_catalog() {
        let f = fixture();
        let p = &f.presenter;
        p.load_catalog().await.unwrap();

        f.source.upsert_product(product("d", Some(50)));
        assert!(p.select_product("d").is_err());

        p.open_product("d").await.unwrap();
        assert_eq!(p.state().get_products().len(), 4);
        assert_eq!(p.state().get_preview().map(|item| item.id), Some("d".to_string()));
        assert_eq!(f.view.gallery.borrow().len(), 2);

        p.open_product("a").await.unwrap();
        assert_eq!(f.view.gallery.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_open_unknown_product() {
        let f = fixture();
        let p = &f.presenter;
        p.load_catalog().await.unwrap();

        let err = p.open_product("zzz").await.unwrap_err();
        assert_eq!(err.to_string(), "Product not found: zzz");
        assert!(!p.modal().is_open());

        f.source.fail_next_request();
        assert!(p.open_product("zzz").await.unwrap_err().is_retryable());
    }

    #[tokio::test]
    async fn test_cancel_order_clears_draft_and_keeps_basket() {
        let f = fixture();
        let p = &f.presenter;
        p.load_catalog().await.unwrap();
        p.select_product("a").unwrap();
        p.toggle_preview_item();
        p.start_order();
        p.input_order_field(OrderField::Address, "Main St");

        p.cancel_order();
        assert_eq!(p.state().get_order_step(), None);
        assert!(p.state().get_order().address.is_empty());
        assert_eq!(p.state().get_basket_count(), 1);
        assert!(!p.modal().is_open());
        assert!(!p.page().is_locked());

        let shown = f.view.modal.borrow().len();
        p.input_order_field(OrderField::Address, "Elsewhere");
        assert_eq!(f.view.modal.borrow().len(), shown);
        assert!(!p.modal().is_open());
    }

    #[tokio::test]
    async fn test_closing_modal_clears_preview_and_unlocks() {
        let f = fixture();
        let p = &f.presenter;
        p.load_catalog().await.unwrap();

        p.select_product("b").unwrap();
        assert!(p.state().get_preview().is_some());

        p.close_modal();
        assert!(p.state().get_preview().is_none());
        assert!(!p.page().is_locked());
        assert_eq!(
            *f.view.page.borrow(),
            vec![PageArgs { is_locked: true }, PageArgs { is_locked: false }]
        );
    }

    #[tokio::test]
    async fn test_empty_basket_cannot_start_checkout() {
        let f = fixture();
        f.presenter.load_catalog().await.unwrap();
        f.presenter.open_basket();

        match f.view.last_modal() {
            Some(ModalContent::Basket(args)) => assert!(args.is_disabled),
            other => panic!("expected basket, got {:?}", other),
        }

        f.presenter.start_order();
        assert_eq!(f.presenter.state().get_order_step(), None);
    }

    #[tokio::test]
    async fn test_shipment_form_reports_errors() {
        let f = fixture();
        let p = &f.presenter;
        p.load_catalog().await.unwrap();
        p.select_product("a").unwrap();
        p.toggle_preview_item();
        p.start_order();

        match f.view.last_modal() {
            Some(ModalContent::Order(form)) => {
                assert_eq!(form.step, OrderStep::Shipment);
                assert!(form.is_disabled);
                assert!(form.errors.contains_key(&OrderField::Payment));
                assert!(form.errors.contains_key(&OrderField::Address));
            }
            other => panic!("expected order form, got {:?}", other),
        }

        p.submit_step().await.unwrap();
        assert_eq!(p.state().get_order_step(), Some(OrderStep::Shipment));

        p.input_order_field(OrderField::Payment, "cash");
        p.input_order_field(OrderField::Address, "Main St");
        match f.view.last_modal() {
            Some(ModalContent::Order(form)) => {
                assert!(form.errors.is_empty());
                assert!(!form.is_disabled);
            }
            other => panic!("expected order form, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_successful_order_resets_basket_and_step() {
        let f = fixture();
        checkout_ready(&f).await;
        let p = &f.presenter;
        assert_eq!(p.state().get_order_step(), Some(OrderStep::Contacts));

        let result = p.submit_step().await.unwrap().unwrap();
        assert_eq!(result.total, Money::from_units(500));

        assert_eq!(p.state().get_basket_count(), 0);
        assert_eq!(p.state().get_order_step(), None);
        assert!(p.state().get_order().email.is_empty());
        assert_eq!(f.view.last_counter(), Some(0));
        assert_eq!(
            f.view.last_modal(),
            Some(ModalContent::Success(SuccessArgs {
                description: "Списано 500 синапсов".to_string()
            }))
        );

        let orders = f.source.orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].items, vec!["a", "b"]);
        assert_eq!(orders[0].total.units(), 500);
    }

    #[tokio::test]
    async fn test_failed_order_keeps_state() {
        let f = fixture();
        checkout_ready(&f).await;
        let p = &f.presenter;

        f.source.fail_next_request();
        let err = p.submit_order().await.unwrap_err();
        assert!(err.is_retryable());

        assert_eq!(p.state().get_basket_count(), 2);
        assert_eq!(p.state().get_order_step(), Some(OrderStep::Contacts));
        assert_eq!(p.state().get_order().email, "buyer@example.ru");
        assert!(f.source.orders().is_empty());

        // Retry succeeds with the same draft.
        assert!(p.submit_order().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalid_contacts_are_not_submitted() {
        let f = fixture();
        checkout_ready(&f).await;
        let p = &f.presenter;

        p.input_order_field(OrderField::Email, "not-an-email");
        assert!(p.submit_order().await.unwrap().is_none());
        assert!(f.source.orders().is_empty());
        assert_eq!(p.state().get_basket_count(), 2);
    }

    #[tokio::test]
    async fn test_back_to_shipment_keeps_draft() {
        let f = fixture();
        checkout_ready(&f).await;
        let p = &f.presenter;

        p.back_to_shipment();
        assert_eq!(p.state().get_order_step(), Some(OrderStep::Shipment));
        assert_eq!(p.state().get_order().address, "ул. Пушкина, 1");
    }

    #[test]
    fn test_drop_unsubscribes() {
        let f = fixture();
        let events = f.presenter.state().events().clone();
        assert_eq!(events.handler_count(), 7);

        drop(f);
        assert_eq!(events.handler_count(), 0);
    }
}
