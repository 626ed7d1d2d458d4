use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type CustomerId = Uuid;
pub type LoanId = Uuid;
pub type PayItemId = Uuid;

/// A customer known to the shop. Only customers can buy on credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// A customer's running credit account. `total_cents` is the sum of sale
/// items billed to the loan, `paid_cents` the sum of payments applied.
/// Invariant: `paid_cents <= total_cents` at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub total_cents: Cents,
    pub paid_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            total_cents: 0,
            paid_cents: 0,
            created_at: Utc::now(),
        }
    }

    /// What the customer still owes.
    pub fn outstanding_cents(&self) -> Cents {
        self.total_cents - self.paid_cents
    }

    pub fn is_settled(&self) -> bool {
        self.paid_cents == self.total_cents
    }
}

/// One payment applied against a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayItem {
    pub id: PayItemId,
    pub loan_id: LoanId,
    pub amount_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl PayItem {
    pub fn new(loan_id: LoanId, amount_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount_cents,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_loan_is_settled() {
        let customer = Customer::new("Asha".into());
        let loan = Loan::new(customer.id);
        assert_eq!(loan.total_cents, 0);
        assert_eq!(loan.paid_cents, 0);
        assert!(loan.is_settled());
    }

    #[test]
    fn test_outstanding() {
        let mut loan = Loan::new(Uuid::new_v4());
        loan.total_cents = 10_000;
        loan.paid_cents = 6_000;
        assert_eq!(loan.outstanding_cents(), 4_000);
        assert!(!loan.is_settled());
    }

    #[test]
    fn test_customer_with_phone() {
        let customer = Customer::new("Asha".into()).with_phone("+255 700 000 001");
        assert_eq!(customer.phone.as_deref(), Some("+255 700 000 001"));
    }
}
