use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, Quantity};

pub type ProductId = Uuid;
pub type InventoryId = Uuid;

/// Unit of measure for a product's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Sold by weight
    Kg,
    /// Sold by piece
    Pc,
    /// Sold by volume
    Lt,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Pc => "pc",
            Unit::Lt => "lt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "kg" => Some(Unit::Kg),
            "pc" => Some(Unit::Pc),
            "lt" => Some(Unit::Lt),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A product in the shop catalog. The name is the business key: every
/// lookup from the counter goes through it, so it must be unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub buying_price_cents: Cents,
    pub selling_price_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: String, buying_price_cents: Cents, selling_price_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            buying_price_cents,
            selling_price_cents,
            created_at: Utc::now(),
        }
    }

    /// Margin per whole unit at catalog prices.
    pub fn margin_cents(&self) -> Cents {
        self.selling_price_cents - self.buying_price_cents
    }
}

/// The single stock record of a product. A product has at most one
/// inventory; stock only moves through purchase and sale recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub id: InventoryId,
    pub product_id: ProductId,
    pub stock: Quantity,
    pub unit: Unit,
    pub created_at: DateTime<Utc>,
}

impl Inventory {
    pub fn new(product_id: ProductId, stock: Quantity, unit: Unit) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            stock,
            unit,
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stock == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_roundtrip() {
        for unit in [Unit::Kg, Unit::Pc, Unit::Lt] {
            let s = unit.as_str();
            let parsed = Unit::from_str(s).unwrap();
            assert_eq!(unit, parsed);
        }
    }

    #[test]
    fn test_unit_from_str_is_case_insensitive() {
        assert_eq!(Unit::from_str("KG"), Some(Unit::Kg));
        assert_eq!(Unit::from_str("Pc"), Some(Unit::Pc));
        assert_eq!(Unit::from_str("crate"), None);
    }

    #[test]
    fn test_product_margin() {
        let product = Product::new("Rice".into(), 80_00, 100_00);
        assert_eq!(product.margin_cents(), 20_00);
    }

    #[test]
    fn test_new_inventory_starts_with_given_stock() {
        let product = Product::new("Rice".into(), 80_00, 100_00);
        let inventory = Inventory::new(product.id, 5000, Unit::Kg);
        assert_eq!(inventory.product_id, product.id);
        assert_eq!(inventory.stock, 5000);
        assert!(!inventory.is_empty());
    }
}
