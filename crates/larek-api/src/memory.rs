//! In-memory [`CatalogSource`], used for offline runs and in tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use tracing::{debug, info};

use larek_core::{Money, OrderInvoice, OrderResult, Product};

use crate::error::{ApiError, ApiResult};
use crate::CatalogSource;

/// Serves a fixed catalog and records submitted invoices.
///
/// Orders are accepted when every item id exists and is purchasable and the
/// invoice total matches the catalog prices, mirroring the server's checks.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: RefCell<Vec<Product>>,
    orders: RefCell<Vec<OrderInvoice>>,
    fail_next: Cell<bool>,
    next_order: Cell<u64>,
}

impl MemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        MemoryCatalog {
            products: RefCell::new(products),
            ..Default::default()
        }
    }

    /// Parses a catalog in the API's list format.
    pub fn from_json(json: &str) -> ApiResult<Self> {
        let list: crate::client::ApiListResponse<Product> = serde_json::from_str(json)?;
        Ok(Self::new(list.items))
    }

    /// Makes the next request fail with a transport error.
    pub fn fail_next_request(&self) {
        self.fail_next.set(true);
    }

    /// Adds or replaces a product, as if the catalog changed server-side.
    pub fn upsert_product(&self, product: Product) {
        let mut products = self.products.borrow_mut();
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
    }

    /// Invoices accepted so far.
    pub fn orders(&self) -> Vec<OrderInvoice> {
        self.orders.borrow().clone()
    }

    fn take_failure(&self) -> ApiResult<()> {
        if self.fail_next.replace(false) {
            return Err(ApiError::Request("connection refused".to_string()));
        }
        Ok(())
    }

    fn check_invoice(&self, invoice: &OrderInvoice) -> ApiResult<Money> {
        let rejected = |message: String| ApiError::Status {
            status: 400,
            message,
        };

        if invoice.items.is_empty() {
            return Err(rejected("Не выбраны товары".to_string()));
        }
        if invoice.payment.is_none() {
            return Err(rejected("Не указан способ оплаты".to_string()));
        }

        let mut total = Money::zero();
        for id in &invoice.items {
            let price = self
                .products
                .borrow()
                .iter()
                .find(|p| &p.id == id)
                .and_then(|p| p.price)
                .ok_or_else(|| rejected(format!("Товар с id {} не продается", id)))?;
            total += price;
        }

        if total != invoice.total {
            return Err(rejected("Неверная сумма заказа".to_string()));
        }
        Ok(total)
    }
}

#[async_trait(?Send)]
impl CatalogSource for MemoryCatalog {
    async fn get_products(&self) -> ApiResult<Vec<Product>> {
        self.take_failure()?;
        let products = self.products.borrow().clone();
        debug!(count = products.len(), "Serving in-memory catalog");
        Ok(products)
    }

    async fn get_product(&self, id: &str) -> ApiResult<Product> {
        self.take_failure()?;
        self.products
            .borrow()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn create_order(&self, invoice: &OrderInvoice) -> ApiResult<OrderResult> {
        self.take_failure()?;
        let total = self.check_invoice(invoice)?;

        let n = self.next_order.get() + 1;
        self.next_order.set(n);
        self.orders.borrow_mut().push(invoice.clone());

        let result = OrderResult {
            id: format!("memory-order-{}", n),
            total,
        };
        info!(order_id = %result.id, %total, "In-memory order accepted");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_core::{Category, PaymentMethod};

    fn product(id: &str, price: Option<i64>) -> Product {
        Product {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            image: String::new(),
            category: Category::HardSkill,
            price: price.map(Money::from_units),
        }
    }

    fn invoice(items: &[&str], total: i64) -> OrderInvoice {
        OrderInvoice {
            payment: Some(PaymentMethod::Card),
            address: "Main St".to_string(),
            email: "a@b.ru".to_string(),
            phone: "+71234567890".to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
            total: Money::from_units(total),
        }
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new(vec![product("a", Some(100)), product("b", None)])
    }

    #[tokio::test]
    async fn test_serves_products() {
        let source = catalog();
        assert_eq!(source.get_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_product_and_upsert() {
        let source = catalog();
        assert_eq!(source.get_product("a").await.unwrap().price, Some(Money::from_units(100)));
        assert!(matches!(
            source.get_product("new").await,
            Err(ApiError::NotFound(id)) if id == "new"
        ));

        source.upsert_product(product("new", Some(5)));
        source.upsert_product(product("a", Some(120)));
        assert_eq!(source.get_products().await.unwrap().len(), 3);
        assert_eq!(source.get_product("a").await.unwrap().price, Some(Money::from_units(120)));
    }

    #[tokio::test]
    async fn test_accepts_matching_invoice() {
        let source = catalog();
        let result = source.create_order(&invoice(&["a"], 100)).await.unwrap();
        assert_eq!(result.total.units(), 100);
        assert_eq!(source.orders().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_bad_invoices() {
        let source = catalog();
        for bad in [invoice(&[], 0), invoice(&["a"], 99), invoice(&["b"], 0)] {
            assert!(matches!(
                source.create_order(&bad).await,
                Err(ApiError::Status { status: 400, .. })
            ));
        }
        assert!(source.orders().is_empty());
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let source = catalog();
        source.fail_next_request();
        assert!(source.get_products().await.is_err());
        assert!(source.get_products().await.is_ok());
    }

    #[test]
    fn test_from_json() {
        let source = MemoryCatalog::from_json(r#"{"total":0,"items":[]}"#).unwrap();
        assert!(source.products.borrow().is_empty());
        assert!(MemoryCatalog::from_json("[]").is_err());
    }
}
