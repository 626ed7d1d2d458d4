use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{line_amount, Cents, LoanId, ProductId, Quantity};

pub type SaleId = Uuid;
pub type SaleItemId = Uuid;

/// The takings accumulator for one calendar day (UTC). At most one sale
/// exists per day; items recorded over the counter or charged to a loan all
/// land on it. Revenue and cost of goods are running totals updated as each
/// item is recorded, never recomputed from the item rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub day: NaiveDate,
    pub revenue_cents: Cents,
    pub cost_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Open an empty sale for the given day.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            day,
            revenue_cents: 0,
            cost_cents: 0,
            created_at: Utc::now(),
        }
    }

    /// Revenue minus cost of goods for the day so far.
    pub fn gross_margin_cents(&self) -> Cents {
        self.revenue_cents - self.cost_cents
    }
}

/// One line of a sale: a quantity of a product at the price charged.
/// When the line is billed to a customer's loan instead of paid at the
/// counter, `loan_id` points at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: SaleItemId,
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub loan_id: Option<LoanId>,
    pub quantity: Quantity,
    pub unit_price_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    pub fn new(
        sale_id: SaleId,
        product_id: ProductId,
        quantity: Quantity,
        unit_price_cents: Cents,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sale_id,
            product_id,
            loan_id: None,
            quantity,
            unit_price_cents,
            created_at: Utc::now(),
        }
    }

    pub fn with_loan(mut self, loan_id: LoanId) -> Self {
        self.loan_id = Some(loan_id);
        self
    }

    /// Quantity times unit price for this line.
    pub fn line_amount_cents(&self) -> Cents {
        line_amount(self.quantity, self.unit_price_cents)
    }

    pub fn is_on_loan(&self) -> bool {
        self.loan_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_new_sale_starts_at_zero() {
        let sale = Sale::new(sample_day());
        assert_eq!(sale.revenue_cents, 0);
        assert_eq!(sale.cost_cents, 0);
        assert_eq!(sale.gross_margin_cents(), 0);
    }

    #[test]
    fn test_sale_item_line_amount() {
        let sale = Sale::new(sample_day());
        // 4 units at 5.00 each
        let item = SaleItem::new(sale.id, Uuid::new_v4(), 4000, 500);
        assert_eq!(item.line_amount_cents(), 2000);
        assert!(!item.is_on_loan());
    }

    #[test]
    fn test_sale_item_on_loan() {
        let sale = Sale::new(sample_day());
        let loan_id = Uuid::new_v4();
        let item = SaleItem::new(sale.id, Uuid::new_v4(), 1000, 2500).with_loan(loan_id);
        assert_eq!(item.loan_id, Some(loan_id));
        assert!(item.is_on_loan());
    }

    #[test]
    fn test_fractional_quantity_line_amount() {
        let sale = Sale::new(sample_day());
        // 2.5 kg at 1.00 per kg
        let item = SaleItem::new(sale.id, Uuid::new_v4(), 2500, 100);
        assert_eq!(item.line_amount_cents(), 250);
    }
}
