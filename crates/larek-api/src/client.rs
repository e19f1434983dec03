//! # HTTP Shop API Client
//!
//! `reqwest` implementation of [`CatalogSource`] against the weblarek API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  {api}/product/        → { "total": 10, "items": [Product, ...] }  │
//! │  GET  {api}/product/{id}    → Product                                   │
//! │  POST {api}/order           ← OrderInvoice                              │
//! │                             → { "id": "...", "total": 2200 }            │
//! │                                                                         │
//! │  Errors (4xx/5xx)           → { "error": "Неверная сумма заказа" }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product images arrive as paths (`/5_Dots.svg`) and are rewritten to
//! absolute CDN URLs before the products leave this module.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use larek_core::{OrderInvoice, OrderResult, Product};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::CatalogSource;

/// Paginated list wrapper used by the catalog endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiListResponse<T> {
    pub total: usize,
    pub items: Vec<T>,
}

/// Error body sent with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// HTTP client for the catalog and order endpoints.
///
/// ## Usage
/// ```rust,no_run
/// use larek_api::{ApiConfig, CatalogSource, ShopApi};
///
/// # async fn demo() -> Result<(), larek_api::ApiError> {
/// let api = ShopApi::new(&ApiConfig::default())?;
/// let products = api.get_products().await?;
/// println!("{} products", products.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ShopApi {
    client: Client,
    base_url: String,
    cdn_url: String,
}

impl ShopApi {
    /// Builds a client from validated configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(ShopApi {
            client,
            base_url: config.api_url(),
            cdn_url: config.cdn_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cdn_url(&self) -> &str {
        &self.cdn_url
    }
}

#[async_trait(?Send)]
impl CatalogSource for ShopApi {
    async fn get_products(&self) -> ApiResult<Vec<Product>> {
        let url = format!("{}/product/", self.base_url);
        debug!(%url, "GET products");

        let response = self.client.get(&url).send().await?;
        let list: ApiListResponse<Product> = handle_response(response).await?;

        info!(total = list.total, received = list.items.len(), "Catalog fetched");
        Ok(rewrite_images(&self.cdn_url, list.items))
    }

    async fn get_product(&self, id: &str) -> ApiResult<Product> {
        let url = format!("{}/product/{}", self.base_url, id);
        debug!(%url, "GET product");

        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id.to_string()));
        }

        let product: Product = handle_response(response).await?;
        Ok(with_cdn_image(&self.cdn_url, product))
    }

    async fn create_order(&self, invoice: &OrderInvoice) -> ApiResult<OrderResult> {
        let url = format!("{}/order", self.base_url);
        debug!(%url, items = invoice.items.len(), total = %invoice.total, "POST order");

        let response = self.client.post(&url).json(invoice).send().await?;
        let result: OrderResult = handle_response(response).await?;

        info!(order_id = %result.id, total = %result.total, "Order accepted");
        Ok(result)
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Decodes a 2xx body as `T`, or turns the error body into [`ApiError::Status`].
async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(serde_json::from_str(&body)?);
    }

    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });
    error!(status = status.as_u16(), %message, "API request failed");

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error)
}

fn with_cdn_image(cdn_url: &str, mut product: Product) -> Product {
    if !product.image.starts_with("http://") && !product.image.starts_with("https://") {
        product.image = format!("{}{}", cdn_url, product.image);
    }
    product
}

fn rewrite_images(cdn_url: &str, products: Vec<Product>) -> Vec<Product> {
    products
        .into_iter()
        .map(|p| with_cdn_image(cdn_url, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_core::{Category, Money};

    const CATALOG_JSON: &str = r#"{
        "total": 2,
        "items": [
            {
                "id": "854cef69-976d-4c2a-a18c-2aa45046c390",
                "description": "Если планируете решать задачи в тренажёре, берите два.",
                "image": "/5_Dots.svg",
                "title": "+1 час в сутках",
                "category": "софт-скил",
                "price": 750
            },
            {
                "id": "b06cde61-912f-4663-9751-09956c0eed67",
                "description": "Будет стоить как целый мир.",
                "image": "/Asterisk_2.svg",
                "title": "Мамка-таймер",
                "category": "другое",
                "price": null
            }
        ]
    }"#;

    #[test]
    fn test_decode_catalog_and_rewrite_images() {
        let list: ApiListResponse<Product> = serde_json::from_str(CATALOG_JSON).unwrap();
        assert_eq!(list.total, 2);

        let products = rewrite_images("https://cdn.test/content", list.items);
        assert_eq!(products[0].image, "https://cdn.test/content/5_Dots.svg");
        assert_eq!(products[0].price, Some(Money::from_units(750)));
        assert_eq!(products[1].category, Category::Other);
        assert!(products[1].price.is_none());
    }

    #[test]
    fn test_absolute_images_are_left_alone() {
        let list: ApiListResponse<Product> = serde_json::from_str(CATALOG_JSON).unwrap();
        let mut product = list.items[0].clone();
        product.image = "https://elsewhere.test/x.svg".to_string();

        let product = with_cdn_image("https://cdn.test", product);
        assert_eq!(product.image, "https://elsewhere.test/x.svg");
    }

    #[test]
    fn test_error_body() {
        assert_eq!(
            error_message(r#"{"error":"Не указан адрес"}"#).as_deref(),
            Some("Не указан адрес")
        );
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_client_urls_from_config() {
        let mut config = ApiConfig::default();
        config.api.origin = "http://localhost:3000".to_string();

        let api = ShopApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000/api/weblarek");
        assert_eq!(api.cdn_url(), "http://localhost:3000/content/weblarek");
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let mut config = ApiConfig::default();
        config.api.timeout_secs = 0;
        assert!(ShopApi::new(&config).is_err());
    }
}
