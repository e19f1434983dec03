//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   OrderDraft    │   │  OrderInvoice   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  payment?       │   │  draft fields   │       │
//! │  │  title          │   │  address        │   │  items: [id]    │       │
//! │  │  category       │   │  email          │   │  total          │       │
//! │  │  price?         │   │  phone          │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │   OrderStep     │   │ PaymentMethod   │       │
//! │  │  SoftSkill      │   │   Shipment      │   │   Card          │       │
//! │  │  HardSkill ...  │   │   Contacts      │   │   Cash          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire names follow the catalog API: categories arrive as Russian strings,
//! every other enum is lowercase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// Product category. The catalog only ever uses this fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,
    #[serde(rename = "хард-скил")]
    HardSkill,
    #[serde(rename = "дополнительное")]
    Additional,
    #[serde(rename = "кнопка")]
    Button,
    /// Also the fallback for category strings we do not know. Must stay the
    /// last variant for `#[serde(other)]`.
    #[serde(rename = "другое")]
    #[serde(other)]
    Other,
}

impl Category {
    /// Display title as shown on the product card.
    pub const fn title(&self) -> &'static str {
        match self {
            Category::SoftSkill => "софт-скил",
            Category::HardSkill => "хард-скил",
            Category::Other => "другое",
            Category::Additional => "дополнительное",
            Category::Button => "кнопка",
        }
    }

    /// Colour modifier used by card templates (`card__category_{modifier}`).
    pub const fn modifier(&self) -> &'static str {
        match self {
            Category::SoftSkill => "soft",
            Category::HardSkill => "hard",
            Category::Other => "other",
            Category::Additional => "additional",
            Category::Button => "button",
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// `price: None` is the "priceless" sentinel: shown in the catalog, never
/// purchasable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Image reference (absolute URL once the API client rewrote it).
    pub image: String,
    pub category: Category,
    pub price: Option<Money>,
}

impl Product {
    /// True when the product can be put into the basket.
    #[inline]
    pub fn is_purchasable(&self) -> bool {
        self.price.is_some()
    }

    /// Price for basket math; priceless counts as zero.
    #[inline]
    pub fn price_or_zero(&self) -> Money {
        self.price.unwrap_or_default()
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Online card payment.
    Card,
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" | "online" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(CoreError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

// =============================================================================
// Order Step
// =============================================================================

/// Which checkout form is active. `Option<OrderStep>::None` means no checkout
/// is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStep {
    /// Payment method + delivery address.
    Shipment,
    /// Email + phone.
    Contacts,
}

impl OrderStep {
    /// Draft fields this step's form must fill in.
    pub const fn required_fields(&self) -> &'static [OrderField] {
        match self {
            OrderStep::Shipment => &[OrderField::Payment, OrderField::Address],
            OrderStep::Contacts => &[OrderField::Email, OrderField::Phone],
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStep::Shipment => "shipment",
            OrderStep::Contacts => "contacts",
        }
    }
}

impl fmt::Display for OrderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStep {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shipment" | "order" => Ok(OrderStep::Shipment),
            "contacts" => Ok(OrderStep::Contacts),
            other => Err(CoreError::UnknownOrderStep(other.to_string())),
        }
    }
}

// =============================================================================
// Order Draft
// =============================================================================

/// Keys of the order draft that a form may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Payment,
    Address,
    Email,
    Phone,
}

impl OrderField {
    pub const ALL: [OrderField; 4] = [
        OrderField::Payment,
        OrderField::Address,
        OrderField::Email,
        OrderField::Phone,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderField::Payment => "payment",
            OrderField::Address => "address",
            OrderField::Email => "email",
            OrderField::Phone => "phone",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderField::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| CoreError::UnknownOrderField(s.to_string()))
    }
}

/// In-progress, not-yet-submitted checkout data.
///
/// There is no `total` field: the total is always derived from the basket
/// when the invoice is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDraft {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub email: String,
    pub phone: String,
}

// =============================================================================
// Invoice & Result
// =============================================================================

/// Payload posted to the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderInvoice {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub email: String,
    pub phone: String,
    /// Basket product ids, in basket order.
    pub items: Vec<String>,
    pub total: Money,
}

/// Response of a successful order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderResult {
    pub id: String,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
