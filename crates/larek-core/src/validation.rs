//! # Validation Module
//!
//! Field validation for the checkout forms and for catalog entries.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Validation Runs                              │
//! │                                                                         │
//! │  Catalog load (set_products_items)                                     │
//! │  └── validate_product: drop entries without id/title, bad price        │
//! │                                                                         │
//! │  Checkout (get_order_errors / get_order_is_valid)                      │
//! │  ├── shipment: payment chosen, address non-empty                       │
//! │  └── contacts: email format, phone format                              │
//! │                                                                         │
//! │  Results are recomputed from current values on every read. There is    │
//! │  no cached "is valid" flag that could go stale.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use larek_core::validation::{validate_email, validate_phone};
//!
//! assert!(validate_email("buyer@example.ru").is_ok());
//! assert!(validate_phone("+7 (999) 123-45-67").is_ok());
//! assert!(validate_phone("12").is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{OrderDraft, OrderField, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum digits in a phone number (national number without prefix).
pub const MIN_PHONE_DIGITS: usize = 10;

/// Maximum digits in a phone number (E.164 limit).
pub const MAX_PHONE_DIGITS: usize = 15;

/// Highest catalog price accepted, in whole units.
pub const MAX_PRICE: i64 = 1_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a field is present after trimming whitespace.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a delivery address. Any non-empty text is accepted.
pub fn validate_address(address: &str) -> ValidationResult<()> {
    validate_required("address", address)
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace anywhere
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@domain"));
    }

    match domain.rfind('.') {
        Some(dot) if dot > 0 && dot < domain.len() - 1 => Ok(()),
        _ => Err(invalid("domain must contain a dot")),
    }
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - Only digits, spaces and `+ ( ) -`
/// - `+` may only appear first
/// - Between [`MIN_PHONE_DIGITS`] and [`MAX_PHONE_DIGITS`] digits
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    validate_required("phone", phone)?;

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '-');
    let body = phone.strip_prefix('+').unwrap_or(phone);

    if !body.chars().all(allowed) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, +, (, ) and -".to_string(),
        });
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(ValidationError::OutOfRange {
            field: "phone digits".to_string(),
            min: MIN_PHONE_DIGITS as i64,
            max: MAX_PHONE_DIGITS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Order Draft
// =============================================================================

/// Validates one field of the order draft.
///
/// ## Example
/// ```rust
/// use larek_core::types::{OrderDraft, OrderField, PaymentMethod};
/// use larek_core::validation::validate_order_field;
///
/// let mut draft = OrderDraft::default();
/// assert!(validate_order_field(&draft, OrderField::Payment).is_err());
///
/// draft.payment = Some(PaymentMethod::Card);
/// assert!(validate_order_field(&draft, OrderField::Payment).is_ok());
/// ```
pub fn validate_order_field(draft: &OrderDraft, field: OrderField) -> ValidationResult<()> {
    match field {
        OrderField::Payment => match draft.payment {
            Some(_) => Ok(()),
            None => Err(ValidationError::Required {
                field: "payment".to_string(),
            }),
        },
        OrderField::Address => validate_address(&draft.address),
        OrderField::Email => validate_email(&draft.email),
        OrderField::Phone => validate_phone(&draft.phone),
    }
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product received from the catalog source.
///
/// ## Rules
/// - `id` and `title` must not be empty
/// - `price`, when present, must be within `0..=MAX_PRICE`
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_required("id", &product.id)?;
    validate_required("title", &product.title)?;

    if let Some(price) = product.price {
        if !(0..=MAX_PRICE).contains(&price.units()) {
            return Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: MAX_PRICE,
            });
        }
    }

    Ok(())
}

/// Rejects a catalog id already recorded in `seen`, recording it otherwise.
pub fn validate_unique_id(seen: &mut HashSet<String>, id: &str) -> ValidationResult<()> {
    if !seen.insert(id.to_string()) {
        return Err(ValidationError::Duplicate {
            field: "id".to_string(),
            value: id.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Category, PaymentMethod};

    fn product(id: &str, price: Option<i64>) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {}", id),
            description: String::new(),
            image: String::new(),
            category: Category::Other,
            price: price.map(Money::from_units),
        }
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("address", "Main St").is_ok());
        assert!(validate_required("address", "").is_err());
        assert!(validate_required("address", "   ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("buyer@example.ru").is_ok());
        assert!(validate_email("first.last@mail.co.uk").is_ok());

        assert!(matches!(
            validate_email(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_email("buyer.example.ru").is_err());
        assert!(validate_email("@example.ru").is_err());
        assert!(validate_email("buyer@localhost").is_err());
        assert!(validate_email("buyer@example.").is_err());
        assert!(validate_email("buy er@example.ru").is_err());
        assert!(validate_email("a@b@c.ru").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+71234567890").is_ok());
        assert!(validate_phone("8 (999) 123-45-67").is_ok());

        assert!(matches!(
            validate_phone(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+7 999 abc 45 67").is_err());
        assert!(validate_phone("7+9991234567").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_order_field() {
        let mut draft = OrderDraft::default();
        for field in OrderField::ALL {
            assert!(validate_order_field(&draft, field).is_err());
        }

        draft.payment = Some(PaymentMethod::Cash);
        draft.address = "Main St".to_string();
        draft.email = "a@b.ru".to_string();
        draft.phone = "+79991234567".to_string();
        for field in OrderField::ALL {
            assert!(validate_order_field(&draft, field).is_ok());
        }
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&product("a", Some(100))).is_ok());
        assert!(validate_product(&product("b", None)).is_ok());
        assert!(validate_product(&product("c", Some(0))).is_ok());

        assert!(validate_product(&product("e", Some(MAX_PRICE))).is_ok());

        assert!(validate_product(&product("", Some(100))).is_err());
        assert!(validate_product(&product("d", Some(-1))).is_err());
        assert!(matches!(
            validate_product(&product("f", Some(MAX_PRICE + 1))),
            Err(ValidationError::OutOfRange { max: MAX_PRICE, .. })
        ));
    }

    #[test]
    fn test_validate_unique_id() {
        let mut seen = HashSet::new();
        assert!(validate_unique_id(&mut seen, "a").is_ok());
        assert!(validate_unique_id(&mut seen, "b").is_ok());

        let err = validate_unique_id(&mut seen, "a").unwrap_err();
        assert_eq!(err.to_string(), "id 'a' already exists");
    }
}
