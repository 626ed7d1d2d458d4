mod common;

use anyhow::Result;
use bottega::application::AppError;
use chrono::Utc;
use common::{item, parse_day, test_service, StockedShop};

#[tokio::test]
async fn test_daily_report_combines_sale_and_expenses() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    // Expenses are stamped with the current time, so report on today
    let today = Utc::now().date_naive();
    let sale = service.open_sale(today).await?;

    // 2 kg Rice: revenue 200.00, cost 160.00
    service
        .add_sale_items(sale.id, vec![item("Rice", 2000, 10_000)])
        .await?;
    service
        .add_expenses(vec![("transport".into(), "market run".into(), 1500)])
        .await?;

    let report = service.daily_report(today).await?;
    assert_eq!(report.revenue_cents, 20_000);
    assert_eq!(report.cost_cents, 16_000);
    assert_eq!(report.gross_margin_cents, 4_000);
    assert_eq!(report.expenses_cents, 1500);
    assert_eq!(report.net_cents, 2500);

    Ok(())
}

#[tokio::test]
async fn test_daily_report_for_quiet_day_is_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    let report = service.daily_report(parse_day("2025-01-01")).await?;
    assert_eq!(report.revenue_cents, 0);
    assert_eq!(report.cost_cents, 0);
    assert_eq!(report.expenses_cents, 0);
    assert_eq!(report.net_cents, 0);

    Ok(())
}

#[tokio::test]
async fn test_stock_report_flags_low_entries() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;

    // Milk is at 5; threshold 6 flags it, Rice (10) and Soap (20) pass
    let report = service.stock_report(Some(6000)).await?;
    assert_eq!(report.entries.len(), 3);

    let milk = report
        .entries
        .iter()
        .find(|e| e.product_name == "Milk")
        .unwrap();
    assert!(milk.low);

    let rice = report
        .entries
        .iter()
        .find(|e| e.product_name == "Rice")
        .unwrap();
    assert!(!rice.low);

    // Without a threshold nothing is flagged
    let report = service.stock_report(None).await?;
    assert!(report.entries.iter().all(|e| !e.low));

    Ok(())
}

#[tokio::test]
async fn test_stock_report_skips_products_without_inventory() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_basic(&service).await?;
    service.create_product("Salt".into(), 150, 200).await?;

    let report = service.stock_report(None).await?;
    assert_eq!(report.entries.len(), 3);
    assert!(report.entries.iter().all(|e| e.product_name != "Salt"));

    Ok(())
}

#[tokio::test]
async fn test_loans_report_totals_outstanding() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_with_customer(&service).await?;
    service.create_customer("Bakari".into(), None).await?;
    service.open_loan("Bakari").await?;

    let day = parse_day("2025-03-14");
    service
        .charge_loan("Asha", day, vec![item("Rice", 2000, 5000)])
        .await?;
    service.pay_loan("Asha", vec![6000]).await?;
    service
        .charge_loan("Bakari", day, vec![item("Soap", 4000, 500)])
        .await?;

    let report = service.loans_report().await?;
    assert_eq!(report.entries.len(), 2);

    let asha = report
        .entries
        .iter()
        .find(|e| e.customer_name == "Asha")
        .unwrap();
    assert_eq!(asha.total_cents, 10_000);
    assert_eq!(asha.paid_cents, 6000);
    assert_eq!(asha.outstanding_cents, 4000);

    // 40.00 from Asha plus 20.00 from Bakari
    assert_eq!(report.total_outstanding_cents, 6000);

    Ok(())
}

#[tokio::test]
async fn test_expense_lifecycle() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let expenses = service
        .add_expenses(vec![
            ("rent".into(), "stall rent".into(), 30_000),
            ("transport".into(), "market run".into(), 1500),
        ])
        .await?;
    assert_eq!(expenses.len(), 2);

    let listed = service.list_expenses().await?;
    assert_eq!(listed.len(), 2);

    // Update touches only the named fields
    let updated = service
        .update_expense(expenses[1].id, None, None, Some(2000))
        .await?;
    assert_eq!(updated.amount_cents, 2000);
    assert_eq!(updated.category, "transport");

    service.delete_expense(expenses[0].id).await?;
    assert_eq!(service.list_expenses().await?.len(), 1);
    assert!(matches!(
        service.get_expense(expenses[0].id).await,
        Err(AppError::ExpenseNotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_nonpositive_expense_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .add_expenses(vec![("rent".into(), "stall rent".into(), 0)])
        .await;
    assert!(matches!(result, Err(AppError::InvalidAmount(_))));

    Ok(())
}
