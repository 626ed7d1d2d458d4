use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type ExpenseId = Uuid;

/// An out-of-pocket cost of running the shop (rent, transport, airtime).
/// Plain record; it only feeds the daily report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub category: String,
    pub description: String,
    pub amount_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(category: String, description: String, amount_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            description,
            amount_cents,
            created_at: Utc::now(),
        }
    }
}
