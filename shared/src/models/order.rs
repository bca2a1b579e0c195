//! Order Model
//!
//! Amounts travel as JSON numbers in currency units. Arithmetic is done
//! with `Decimal` and rounded to 2 places before display.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: u32 = 9999;

/// Why an order request was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderValidationError {
    #[error("customer name is required")]
    MissingCustomerName,

    #[error("order has no items")]
    NoItems,

    #[error("item {index} has no name")]
    MissingItemName { index: usize },

    #[error("item {index}: quantity must be between 1 and 9999, got {qty}")]
    InvalidQuantity { index: usize, qty: u32 },

    #[error("{field} must be a non-negative finite number, got {value}")]
    InvalidAmount { field: String, value: f64 },
}

/// Customer contact block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub name: String,
    pub qty: u32,
    /// Unit price in currency unit
    pub price: f64,
}

impl OrderItem {
    /// `qty * price`, rounded to 2 places
    pub fn line_total(&self) -> Decimal {
        (to_decimal(self.price) * Decimal::from(self.qty)).round_dp(DECIMAL_PLACES)
    }
}

/// Order totals as submitted by the storefront
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    #[serde(default)]
    pub delivery: f64,
    pub total: f64,
}

/// `POST /submit_order` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub totals: Totals,
}

impl OrderRequest {
    /// Check the order is printable
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.customer.name.trim().is_empty() {
            return Err(OrderValidationError::MissingCustomerName);
        }
        if self.items.is_empty() {
            return Err(OrderValidationError::NoItems);
        }

        for (index, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(OrderValidationError::MissingItemName { index });
            }
            if item.qty == 0 || item.qty > MAX_QUANTITY {
                return Err(OrderValidationError::InvalidQuantity {
                    index,
                    qty: item.qty,
                });
            }
            require_amount(item.price, &format!("items[{}].price", index))?;
            if item.price > MAX_PRICE {
                return Err(OrderValidationError::InvalidAmount {
                    field: format!("items[{}].price", index),
                    value: item.price,
                });
            }
        }

        require_amount(self.totals.subtotal, "totals.subtotal")?;
        require_amount(self.totals.delivery, "totals.delivery")?;
        require_amount(self.totals.total, "totals.total")?;
        Ok(())
    }

    /// Sum of all line totals
    pub fn items_subtotal(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.qty).sum()
    }
}

/// Convert an amount to `Decimal`, rounded to 2 places
///
/// Non-finite values (rejected by validation) become zero.
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp(DECIMAL_PLACES)
}

#[inline]
fn require_amount(value: f64, field: &str) -> Result<(), OrderValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(OrderValidationError::InvalidAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> OrderRequest {
        serde_json::from_value(serde_json::json!({
            "customer": {"name": "Mona", "phone": "0100", "address": "12 Nile St"},
            "items": [
                {"name": "Koshari", "qty": 2, "price": 35.5},
                {"name": "Tea", "qty": 1, "price": 10}
            ],
            "totals": {"subtotal": 81, "delivery": 15, "total": 96}
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_order() {
        let o = order();
        assert!(o.validate().is_ok());
        assert_eq!(o.customer.notes, None);
        assert_eq!(o.item_count(), 3);
        assert_eq!(o.items_subtotal(), Decimal::new(8100, 2));
    }

    #[test]
    fn test_line_total_rounds() {
        let item = OrderItem {
            name: "Juice".into(),
            qty: 3,
            price: 0.1,
        };
        assert_eq!(item.line_total(), Decimal::new(30, 2));
    }

    #[test]
    fn test_rejects_empty_order() {
        let mut o = order();
        o.items.clear();
        assert_eq!(o.validate(), Err(OrderValidationError::NoItems));
    }

    #[test]
    fn test_rejects_blank_customer() {
        let mut o = order();
        o.customer.name = "  ".into();
        assert_eq!(o.validate(), Err(OrderValidationError::MissingCustomerName));
    }

    #[test]
    fn test_rejects_bad_items() {
        let mut o = order();
        o.items[1].qty = 0;
        assert_eq!(
            o.validate(),
            Err(OrderValidationError::InvalidQuantity { index: 1, qty: 0 })
        );

        let mut o = order();
        o.items[0].price = -1.0;
        assert!(matches!(
            o.validate(),
            Err(OrderValidationError::InvalidAmount { ref field, .. }) if field == "items[0].price"
        ));

        let mut o = order();
        o.totals.total = f64::NAN;
        assert!(o.validate().is_err());
    }
}
