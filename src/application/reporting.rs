use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Quantity, Unit};

/// One day's takings against its costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub day: NaiveDate,
    pub revenue_cents: Cents,
    pub cost_cents: Cents,
    pub gross_margin_cents: Cents,
    pub expenses_cents: Cents,
    pub net_cents: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReport {
    pub entries: Vec<StockEntry>,
    pub threshold: Option<Quantity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntry {
    pub product_name: String,
    pub unit: Unit,
    pub stock: Quantity,
    pub low: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoansReport {
    pub entries: Vec<LoanEntry>,
    pub total_outstanding_cents: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanEntry {
    pub customer_name: String,
    pub total_cents: Cents,
    pub paid_cents: Cents,
    pub outstanding_cents: Cents,
}
