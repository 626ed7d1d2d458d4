mod common;

use anyhow::Result;
use bottega::application::AppError;
use common::{item, item_at_catalog_price, test_service, StockedShop};

#[tokio::test]
async fn test_purchase_tops_up_stock() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    let purchase = service.create_purchase().await?;

    // 25 kg of Rice at 8.00: stock 10 -> 35, total 200.00
    let result = service
        .add_purchase_items(purchase.id, vec![item("Rice", 25_000, 800)])
        .await?;

    assert_eq!(result.purchase.total_cents, 20_000);
    assert_eq!(service.get_inventory("Rice").await?.stock, 35_000);

    Ok(())
}

#[tokio::test]
async fn test_purchase_total_accumulates_across_batches() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    let purchase = service.create_purchase().await?;

    service
        .add_purchase_items(purchase.id, vec![item("Rice", 10_000, 800)])
        .await?;
    let result = service
        .add_purchase_items(purchase.id, vec![item("Soap", 10_000, 300)])
        .await?;

    // 80.00 + 30.00
    assert_eq!(result.purchase.total_cents, 11_000);

    let items = service.list_purchase_items(purchase.id).await?;
    assert_eq!(items.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_purchase_defaults_to_buying_price() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    let purchase = service.create_purchase().await?;
    let result = service
        .add_purchase_items(purchase.id, vec![item_at_catalog_price("Soap", 5000)])
        .await?;

    assert_eq!(result.items[0].unit_price_cents, 300);
    assert_eq!(result.purchase.total_cents, 1500);

    Ok(())
}

#[tokio::test]
async fn test_purchase_for_unknown_product_rejected_whole() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    let purchase = service.create_purchase().await?;

    let result = service
        .add_purchase_items(
            purchase.id,
            vec![item("Rice", 5000, 800), item("Ghost", 1000, 100)],
        )
        .await;
    assert!(matches!(result, Err(AppError::ProductNotFound(_))));

    // The valid first line was not applied either
    assert_eq!(service.get_inventory("Rice").await?.stock, 10_000);
    assert_eq!(service.get_purchase(purchase.id).await?.total_cents, 0);

    Ok(())
}

#[tokio::test]
async fn test_purchase_requires_inventory() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_product("Rice".into(), 8000, 10000).await?;
    let purchase = service.create_purchase().await?;

    let result = service
        .add_purchase_items(purchase.id, vec![item("Rice", 5000, 800)])
        .await;
    assert!(matches!(result, Err(AppError::InventoryNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_unknown_purchase_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    let result = service
        .add_purchase_items(uuid::Uuid::new_v4(), vec![item("Rice", 1000, 800)])
        .await;
    assert!(matches!(result, Err(AppError::PurchaseNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_delete_purchase_keeps_received_stock() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    let purchase = service.create_purchase().await?;
    service
        .add_purchase_items(purchase.id, vec![item("Rice", 5000, 800)])
        .await?;

    service.delete_purchase(purchase.id).await?;

    assert!(matches!(
        service.get_purchase(purchase.id).await,
        Err(AppError::PurchaseNotFound(_))
    ));
    // Removal is bookkeeping cleanup, not a reversal
    assert_eq!(service.get_inventory("Rice").await?.stock, 15_000);

    Ok(())
}

#[tokio::test]
async fn test_purchase_then_sale_roundtrip() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    // Receive 5 lt of Milk, then sell all 10 on the shelf
    let purchase = service.create_purchase().await?;
    service
        .add_purchase_items(purchase.id, vec![item("Milk", 5000, 600)])
        .await?;
    assert_eq!(service.get_inventory("Milk").await?.stock, 10_000);

    let sale = service.open_sale(common::parse_day("2025-03-14")).await?;
    service
        .add_sale_items(sale.id, vec![item("Milk", 10_000, 800)])
        .await?;
    assert_eq!(service.get_inventory("Milk").await?.stock, 0);

    Ok(())
}
