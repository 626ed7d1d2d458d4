use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::ShopService;
use crate::domain::{Customer, Expense, Inventory, Loan, Product, Sale};

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub products: Vec<Product>,
    pub inventories: Vec<Inventory>,
    pub customers: Vec<Customer>,
    pub loans: Vec<Loan>,
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
}

/// Exporter for converting shop data to various formats
pub struct Exporter<'a> {
    service: &'a ShopService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a ShopService) -> Self {
        Self { service }
    }

    /// Export the catalog (with stock where attached) to CSV format
    pub async fn export_products_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let products = self.service.list_products().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "name",
            "buying_price_cents",
            "selling_price_cents",
            "stock",
            "unit",
        ])?;

        let mut count = 0;
        for product in &products {
            let info = self.service.get_product_info(&product.name).await?;
            let (stock, unit) = match &info.inventory {
                Some(inventory) => (inventory.stock.to_string(), inventory.unit.to_string()),
                None => (String::new(), String::new()),
            };

            csv_writer.write_record([
                product.name.clone(),
                product.buying_price_cents.to_string(),
                product.selling_price_cents.to_string(),
                stock,
                unit,
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export daily sales to CSV format
    pub async fn export_sales_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let sales = self.service.list_sales().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["day", "revenue_cents", "cost_cents"])?;

        let mut count = 0;
        for sale in &sales {
            csv_writer.write_record([
                sale.day.format("%Y-%m-%d").to_string(),
                sale.revenue_cents.to_string(),
                sale.cost_cents.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export loan balances to CSV format
    pub async fn export_loans_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let report = self.service.loans_report().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["customer", "total_cents", "paid_cents", "outstanding_cents"])?;

        let mut count = 0;
        for entry in &report.entries {
            csv_writer.write_record([
                entry.customer_name.clone(),
                entry.total_cents.to_string(),
                entry.paid_cents.to_string(),
                entry.outstanding_cents.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export expenses to CSV format
    pub async fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let expenses = self.service.list_expenses().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["category", "description", "amount_cents", "recorded_at"])?;

        let mut count = 0;
        for expense in &expenses {
            csv_writer.write_record([
                expense.category.clone(),
                expense.description.clone(),
                expense.amount_cents.to_string(),
                expense.created_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full database as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<ShopSnapshot> {
        let products = self.service.list_products().await?;
        let inventories = self.service.list_inventories().await?;
        let customers = self.service.list_customers().await?;
        let loans = self.service.list_loans().await?;
        let sales = self.service.list_sales().await?;
        let expenses = self.service.list_expenses().await?;

        let snapshot = ShopSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            products,
            inventories,
            customers,
            loans,
            sales,
            expenses,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
