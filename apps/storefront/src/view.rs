//! # Views
//!
//! The renderer seam. The presenter builds plain argument structs and hands
//! them to a [`Render`] implementation; it never reads anything back.
//!
//! ## Screens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Page                                                                   │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │  Header                                           basket: 2       │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │  Gallery: CardArgs × N                                            │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Modal (one of)                                                         │
//! │  ├── Preview   card + description + "Купить" / "Удалить из корзины"     │
//! │  ├── Basket    numbered rows + total + "Оформить"                       │
//! │  ├── Order     shipment or contacts form + errors + "Далее"/"Оплатить"  │
//! │  └── Success   "Списано N синапсов"                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use larek_core::{Category, OrderErrors, OrderInvoice, OrderStep, Product};

use crate::config::DisplayConfig;

pub const BUY_LABEL: &str = "Купить";
pub const REMOVE_LABEL: &str = "Удалить из корзины";

/// Something that can draw `A`.
pub trait Render<A> {
    fn render(&self, args: A);
}

/// Everything the presenter draws. Implemented for any type that renders
/// all of the argument types below.
pub trait StorefrontView:
    Render<PageArgs> + Render<HeaderArgs> + Render<GalleryArgs> + Render<ModalContent>
{
}

impl<T> StorefrontView for T where
    T: Render<PageArgs> + Render<HeaderArgs> + Render<GalleryArgs> + Render<ModalContent>
{
}

// =============================================================================
// Page & Header
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    /// Scrolling is disabled while a modal is open.
    pub is_locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderArgs {
    pub counter: usize,
}

// =============================================================================
// Catalog
// =============================================================================

/// One product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardArgs {
    pub id: String,
    pub title: String,
    pub category: Category,
    /// Colour modifier for the category badge.
    pub color: &'static str,
    pub image: String,
    pub price: String,
}

impl CardArgs {
    pub fn new(product: &Product, display: &DisplayConfig) -> Self {
        CardArgs {
            id: product.id.clone(),
            title: product.title.clone(),
            category: product.category,
            color: product.category.modifier(),
            image: product.image.clone(),
            price: display.format_price(product.price),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryArgs {
    pub items: Vec<CardArgs>,
}

// =============================================================================
// Modal Contents
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArgs {
    pub card: CardArgs,
    pub description: String,
    pub button_text: &'static str,
    /// Priceless products cannot be bought.
    pub is_disabled: bool,
}

impl PreviewArgs {
    pub fn new(product: &Product, in_basket: bool, display: &DisplayConfig) -> Self {
        PreviewArgs {
            card: CardArgs::new(product, display),
            description: product.description.clone(),
            button_text: if in_basket { REMOVE_LABEL } else { BUY_LABEL },
            is_disabled: !product.is_purchasable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketItemArgs {
    /// 1-based row number.
    pub index: usize,
    pub id: String,
    pub title: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketArgs {
    pub items: Vec<BasketItemArgs>,
    pub price: String,
    /// Checkout is unavailable for an empty basket.
    pub is_disabled: bool,
}

impl BasketArgs {
    pub fn new(items: &[Product], display: &DisplayConfig) -> Self {
        let rows = items
            .iter()
            .enumerate()
            .map(|(i, item)| BasketItemArgs {
                index: i + 1,
                id: item.id.clone(),
                title: item.title.clone(),
                price: display.format_price(item.price),
            })
            .collect();

        BasketArgs {
            items: rows,
            price: display.format_total(items.iter().map(Product::price_or_zero).sum()),
            is_disabled: items.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFormArgs {
    pub step: OrderStep,
    pub invoice: OrderInvoice,
    pub errors: OrderErrors,
    pub is_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessArgs {
    pub description: String,
}

/// What the modal is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalContent {
    Preview(PreviewArgs),
    Basket(BasketArgs),
    Order(OrderFormArgs),
    Success(SuccessArgs),
}

impl ModalContent {
    pub fn kind(&self) -> &'static str {
        match self {
            ModalContent::Preview(_) => "preview",
            ModalContent::Basket(_) => "basket",
            ModalContent::Order(_) => "order",
            ModalContent::Success(_) => "success",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_core::Money;

    fn product(id: &str, price: Option<i64>) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {}", id),
            description: "desc".to_string(),
            image: String::new(),
            category: Category::Additional,
            price: price.map(Money::from_units),
        }
    }

    #[test]
    fn test_preview_button() {
        let display = DisplayConfig::default();

        let args = PreviewArgs::new(&product("a", Some(100)), false, &display);
        assert_eq!(args.button_text, BUY_LABEL);
        assert!(!args.is_disabled);
        assert_eq!(args.card.color, "additional");

        let args = PreviewArgs::new(&product("a", Some(100)), true, &display);
        assert_eq!(args.button_text, REMOVE_LABEL);

        let args = PreviewArgs::new(&product("b", None), false, &display);
        assert!(args.is_disabled);
        assert_eq!(args.card.price, "Бесценно");
    }

    #[test]
    fn test_basket_rows() {
        let display = DisplayConfig::default();
        let args = BasketArgs::new(&[product("a", Some(750)), product("b", Some(1450))], &display);

        assert_eq!(args.items[1].index, 2);
        assert_eq!(args.items[0].price, "750 синапсов");
        assert_eq!(args.price, "2 200 синапсов");
        assert!(!args.is_disabled);

        let empty = BasketArgs::new(&[], &display);
        assert!(empty.is_disabled);
        assert_eq!(empty.price, "");
    }
}
