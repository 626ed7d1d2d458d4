mod common;

use anyhow::Result;
use bottega::application::AppError;
use bottega::domain::Unit;
use bottega::io::{ImportOptions, Importer};
use common::test_service;

#[tokio::test]
async fn test_create_and_get_product() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let product = service.create_product("Rice".into(), 8000, 10000).await?;
    assert_eq!(product.name, "Rice");
    assert_eq!(product.margin_cents(), 2000);

    let fetched = service.get_product("Rice").await?;
    assert_eq!(fetched.id, product.id);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_product_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_product("Rice".into(), 8000, 10000).await?;
    let result = service.create_product("Rice".into(), 7000, 9000).await;

    assert!(matches!(result, Err(AppError::ProductAlreadyExists(_))));
    Ok(())
}

#[tokio::test]
async fn test_unknown_product_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.get_product("Ghost").await;
    assert!(matches!(result, Err(AppError::ProductNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_listing_dedupes_revisions_newest_first() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_product("Maize".into(), 5000, 7000).await?;
    service.create_product("Sugar".into(), 9000, 11000).await?;
    // A second revision of Maize with fresher prices
    let revised = service.revise_product("Maize".into(), 5500, 7500).await?;

    let products = service.list_products().await?;
    assert_eq!(products.len(), 2, "One entry per name");

    // Newest first, and the Maize entry is the revision
    assert_eq!(products[0].id, revised.id);
    assert_eq!(products[0].selling_price_cents, 7500);
    assert_eq!(products[1].name, "Sugar");

    // Name lookups also resolve to the newest revision
    let fetched = service.get_product("Maize").await?;
    assert_eq!(fetched.id, revised.id);

    Ok(())
}

#[tokio::test]
async fn test_attach_inventory_once() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_product("Rice".into(), 8000, 10000).await?;
    let inventory = service.attach_inventory("Rice", 10_000, Unit::Kg).await?;
    assert_eq!(inventory.stock, 10_000);
    assert_eq!(inventory.unit, Unit::Kg);

    // A product can not have more than one inventory
    let result = service.attach_inventory("Rice", 5_000, Unit::Kg).await;
    assert!(matches!(result, Err(AppError::DuplicateInventory(_))));

    // The original record is untouched
    let fetched = service.get_inventory("Rice").await?;
    assert_eq!(fetched.id, inventory.id);
    assert_eq!(fetched.stock, 10_000);

    Ok(())
}

#[tokio::test]
async fn test_inventory_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_product("Rice".into(), 8000, 10000).await?;
    let result = service.get_inventory("Rice").await;
    assert!(matches!(result, Err(AppError::InventoryNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_update_product_touches_prices_only() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_product("Rice".into(), 8000, 10000).await?;
    service.attach_inventory("Rice", 10_000, Unit::Kg).await?;

    let updated = service.update_product("Rice", Some(8500), None).await?;
    assert_eq!(updated.buying_price_cents, 8500);
    assert_eq!(updated.selling_price_cents, 10000, "Omitted field unchanged");

    // Stock accumulates only through purchases and sales; an update between
    // them must not change it
    let inventory = service.get_inventory("Rice").await?;
    assert_eq!(inventory.stock, 10_000);

    Ok(())
}

#[tokio::test]
async fn test_delete_product_removes_inventory() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_product("Rice".into(), 8000, 10000).await?;
    service.attach_inventory("Rice", 10_000, Unit::Kg).await?;

    service.delete_product("Rice").await?;

    assert!(matches!(
        service.get_product("Rice").await,
        Err(AppError::ProductNotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_import_products_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let csv = "\
name,buying_price,selling_price,opening_stock,unit
Rice,80.00,100.00,10,kg
Soap,3.00,5.00,20,pc
Salt,1.50,2.00,,
";

    let importer = Importer::new(&service);
    let result = importer
        .import_products_csv(csv.as_bytes(), ImportOptions::default())
        .await?;

    assert_eq!(result.imported, 3);
    assert_eq!(result.skipped, 0);
    assert!(result.errors.is_empty());

    let rice = service.get_product_info("Rice").await?;
    assert_eq!(rice.product.buying_price_cents, 8000);
    assert_eq!(rice.inventory.unwrap().stock, 10_000);

    // Salt had no opening stock columns, so no inventory was attached
    let salt = service.get_product_info("Salt").await?;
    assert!(salt.inventory.is_none());

    Ok(())
}

#[tokio::test]
async fn test_import_skip_existing_and_revise() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_product("Rice".into(), 8000, 10000).await?;

    let csv = "\
name,buying_price,selling_price,opening_stock,unit
Rice,85.00,105.00,,
";

    // With skip_existing the row is skipped and prices stay
    let importer = Importer::new(&service);
    let result = importer
        .import_products_csv(
            csv.as_bytes(),
            ImportOptions {
                skip_existing: true,
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(result.imported, 0);
    assert_eq!(result.skipped, 1);
    assert_eq!(service.get_product("Rice").await?.buying_price_cents, 8000);

    // Without it the import lands as a new catalog revision
    let result = importer
        .import_products_csv(csv.as_bytes(), ImportOptions::default())
        .await?;
    assert_eq!(result.imported, 1);
    assert_eq!(service.get_product("Rice").await?.buying_price_cents, 8500);

    // The listing still shows one Rice entry
    let products = service.list_products().await?;
    assert_eq!(products.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_import_collects_line_errors() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let csv = "\
name,buying_price,selling_price,opening_stock,unit
Rice,eighty,100.00,,
,3.00,5.00,,
Soap,3.00,5.00,20,crate
Milk,6.00,8.00,5,lt
";

    let importer = Importer::new(&service);
    let result = importer
        .import_products_csv(csv.as_bytes(), ImportOptions::default())
        .await?;

    assert_eq!(result.imported, 1, "Only the Milk row is clean");
    assert_eq!(result.errors.len(), 3);
    assert!(service.get_product("Milk").await.is_ok());
    assert!(service.get_product("Rice").await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_export_products_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;
    common::StockedShop::create_basic(&service).await?;

    let exporter = bottega::io::Exporter::new(&service);
    let mut buffer = Vec::new();
    let count = exporter.export_products_csv(&mut buffer).await?;
    assert_eq!(count, 3);

    let text = String::from_utf8(buffer)?;
    assert!(text.starts_with("name,buying_price_cents,selling_price_cents,stock,unit"));
    assert!(text.contains("Rice,8000,10000,10000,kg"));

    Ok(())
}
