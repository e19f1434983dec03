//! # Display Configuration
//!
//! How prices are written on cards, in the basket and on the success screen.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variable `LAREK_CURRENCY`
//! 2. Defaults (this file)
//!
//! `LAREK_CURRENCY` takes either three comma separated plural forms
//! (`синапс,синапса,синапсов`) or a single word used for every count.

use larek_core::Money;
use tracing::warn;

/// Text shown instead of a price for priceless products.
pub const PRICELESS_LABEL: &str = "Бесценно";

/// Price presentation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Currency title for 1, 21, 101...
    pub currency_one: String,

    /// Currency title for 2-4, 22-24...
    pub currency_few: String,

    /// Currency title for 0, 5-20, 25-30...
    pub currency_many: String,

    pub priceless_label: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            currency_one: "синапс".to_string(),
            currency_few: "синапса".to_string(),
            currency_many: "синапсов".to_string(),
            priceless_label: PRICELESS_LABEL.to_string(),
        }
    }
}

impl DisplayConfig {
    /// Defaults overridden by `LAREK_CURRENCY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DisplayConfig::default();

        if let Some(currency) = lookup("LAREK_CURRENCY") {
            let forms: Vec<&str> = currency
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();

            match forms.as_slice() {
                [one] => {
                    config.currency_one = one.to_string();
                    config.currency_few = one.to_string();
                    config.currency_many = one.to_string();
                }
                [one, few, many] => {
                    config.currency_one = one.to_string();
                    config.currency_few = few.to_string();
                    config.currency_many = many.to_string();
                }
                _ => warn!(value = %currency, "Ignoring malformed LAREK_CURRENCY"),
            }
        }

        config
    }

    /// Currency title agreeing with `units`.
    pub fn currency_title(&self, units: i64) -> &str {
        let n = units.unsigned_abs();
        match (n % 10, n % 100) {
            (1, rem) if rem != 11 => &self.currency_one,
            (2..=4, rem) if !(12..=14).contains(&rem) => &self.currency_few,
            _ => &self.currency_many,
        }
    }

    /// Formats an amount as `"1 750 синапсов"`.
    ///
    /// ## Example
    /// ```rust
    /// use larek_core::Money;
    /// use larek_storefront::config::DisplayConfig;
    ///
    /// let config = DisplayConfig::default();
    /// assert_eq!(config.format_money(Money::from_units(22)), "22 синапса");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        let units = amount.units();
        format!("{} {}", group_thousands(units), self.currency_title(units))
    }

    /// Formats a catalog price; `None` is the priceless label.
    pub fn format_price(&self, price: Option<Money>) -> String {
        match price {
            Some(amount) => self.format_money(amount),
            None => self.priceless_label.clone(),
        }
    }

    /// Basket total, or an empty string for an empty total.
    pub fn format_total(&self, total: Money) -> String {
        if total.is_zero() {
            String::new()
        } else {
            self.format_money(total)
        }
    }
}

/// `1234567` -> `"1 234 567"`.
fn group_thousands(units: i64) -> String {
    let digits = units.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if units < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}
