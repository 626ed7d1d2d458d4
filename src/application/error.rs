use thiserror::Error;

use crate::domain::{Cents, Quantity};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Product already exists: {0}")]
    ProductAlreadyExists(String),

    #[error("No inventory for product: {0}")]
    InventoryNotFound(String),

    #[error("Product already has an inventory: {0}")]
    DuplicateInventory(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Customer already exists: {0}")]
    CustomerAlreadyExists(String),

    #[error("No loan for customer: {0}")]
    LoanNotFound(String),

    #[error("Customer already has a loan: {0}")]
    LoanAlreadyExists(String),

    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    #[error("Insufficient stock for {product_name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_name: String,
        available: Quantity,
        requested: Quantity,
    },

    #[error("Overpayment rejected: loan total {total}, already paid {already_paid}, requested {requested}")]
    OverpaymentRejected {
        total: Cents,
        already_paid: Cents,
        requested: Cents,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
