// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bottega::application::{ItemInput, ShopService};
use bottega::domain::{Cents, Quantity, Unit};
use chrono::NaiveDate;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(ShopService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = ShopService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a day string into a NaiveDate
pub fn parse_day(day_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(day_str, "%Y-%m-%d").unwrap()
}

/// Helper to build an item input with an explicit unit price
pub fn item(product: &str, quantity: Quantity, unit_price_cents: Cents) -> ItemInput {
    ItemInput {
        product: product.to_string(),
        quantity,
        unit_price_cents: Some(unit_price_cents),
    }
}

/// Helper to build an item input priced from the catalog
pub fn item_at_catalog_price(product: &str, quantity: Quantity) -> ItemInput {
    ItemInput {
        product: product.to_string(),
        quantity,
        unit_price_cents: None,
    }
}

/// Test fixture: standard shop setup
pub struct StockedShop;

impl StockedShop {
    /// Create a basic catalog with stock:
    /// Rice (kg, buy 80.00, sell 100.00, 10 in stock),
    /// Soap (pc, buy 3.00, sell 5.00, 20 in stock),
    /// Milk (lt, buy 6.00, sell 8.00, 5 in stock).
    pub async fn create_basic(service: &ShopService) -> Result<()> {
        service.create_product("Rice".into(), 8000, 10000).await?;
        service.attach_inventory("Rice", 10_000, Unit::Kg).await?;

        service.create_product("Soap".into(), 300, 500).await?;
        service.attach_inventory("Soap", 20_000, Unit::Pc).await?;

        service.create_product("Milk".into(), 600, 800).await?;
        service.attach_inventory("Milk", 5_000, Unit::Lt).await?;

        Ok(())
    }

    /// Basic catalog plus a customer with an open credit account.
    pub async fn create_with_customer(service: &ShopService) -> Result<()> {
        Self::create_basic(service).await?;
        service
            .create_customer("Asha".into(), Some("+255 700 000 001".into()))
            .await?;
        service.open_loan("Asha").await?;
        Ok(())
    }
}
