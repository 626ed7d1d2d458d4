use std::collections::HashSet;

use super::{Cents, Product, Quantity, QUANTITY_SCALE};

/// The ledger rules: every running total in the system (stock, revenue,
/// loan balances) moves only through the functions below. They are pure;
/// callers read the current balance, apply the rule, and persist the result
/// within the scope of one request.

/// Record a delivery: stock increases by the received quantity.
/// Purchases are always accepted.
pub fn receive_stock(stock: Quantity, quantity: Quantity) -> Quantity {
    stock + quantity
}

/// Record a sale: stock decreases by the sold quantity. Selling exactly the
/// available stock succeeds and leaves zero; anything beyond it is rejected
/// and the stock is left untouched.
pub fn draw_stock(stock: Quantity, quantity: Quantity) -> Result<Quantity, StockError> {
    if stock < quantity {
        return Err(StockError::InsufficientStock {
            available: stock,
            requested: quantity,
        });
    }
    Ok(stock - quantity)
}

/// Quantity times unit price for one recorded item. Quantities are in
/// thousandths, so the product is scaled back down (truncating).
pub fn line_amount(quantity: Quantity, unit_price_cents: Cents) -> Cents {
    quantity * unit_price_cents / QUANTITY_SCALE
}

/// Apply a payment against a loan: returns the new paid total. A payment
/// that would push `paid` past `total` is rejected whole, never clipped.
pub fn apply_payment(total: Cents, paid: Cents, amount: Cents) -> Result<Cents, PaymentError> {
    if paid + amount > total {
        return Err(PaymentError::OverpaymentRejected {
            total,
            already_paid: paid,
            requested: amount,
        });
    }
    Ok(paid + amount)
}

/// Keep the first occurrence of each product name, preserving the input
/// order. Callers pass the catalog newest-first, so "first seen" is "most
/// recent". A set-membership filter, not a sort.
pub fn dedupe_by_name(products: Vec<Product>) -> Vec<Product> {
    let mut seen: HashSet<String> = HashSet::new();
    products
        .into_iter()
        .filter(|product| seen.insert(product.name.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    InsufficientStock {
        available: Quantity,
        requested: Quantity,
    },
}

impl std::fmt::Display for StockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockError::InsufficientStock {
                available,
                requested,
            } => {
                write!(
                    f,
                    "Cannot sell {} with only {} in stock",
                    super::format_quantity(*requested),
                    super::format_quantity(*available)
                )
            }
        }
    }
}

impl std::error::Error for StockError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    OverpaymentRejected {
        total: Cents,
        already_paid: Cents,
        requested: Cents,
    },
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentError::OverpaymentRejected {
                total,
                already_paid,
                requested,
            } => {
                write!(
                    f,
                    "Payment of {} would exceed loan total ({} total, {} already paid)",
                    super::format_cents(*requested),
                    super::format_cents(*total),
                    super::format_cents(*already_paid)
                )
            }
        }
    }
}

impl std::error::Error for PaymentError {}
