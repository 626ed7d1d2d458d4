use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{line_amount, Cents, ProductId, Quantity};

pub type PurchaseId = Uuid;
pub type PurchaseItemId = Uuid;

/// A supplier delivery. Groups the purchase items received together and
/// carries the running total paid for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub total_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            total_cents: 0,
            created_at: Utc::now(),
        }
    }
}

impl Default for Purchase {
    fn default() -> Self {
        Self::new()
    }
}

/// One line of a delivery: a quantity of a product at the price paid.
/// Recording it increases the product's stock by the quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub id: PurchaseItemId,
    pub purchase_id: PurchaseId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub unit_price_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl PurchaseItem {
    pub fn new(
        purchase_id: PurchaseId,
        product_id: ProductId,
        quantity: Quantity,
        unit_price_cents: Cents,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            purchase_id,
            product_id,
            quantity,
            unit_price_cents,
            created_at: Utc::now(),
        }
    }

    /// Quantity times unit price for this line.
    pub fn line_amount_cents(&self) -> Cents {
        line_amount(self.quantity, self.unit_price_cents)
    }
}
