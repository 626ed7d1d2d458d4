mod common;

use anyhow::Result;
use bottega::application::AppError;
use common::{item, parse_day, test_service, StockedShop};

#[tokio::test]
async fn test_one_loan_per_customer() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_customer("Asha".into(), None).await?;
    let loan = service.open_loan("Asha").await?;
    assert_eq!(loan.total_cents, 0);
    assert_eq!(loan.paid_cents, 0);

    let result = service.open_loan("Asha").await;
    assert!(matches!(result, Err(AppError::LoanAlreadyExists(_))));

    Ok(())
}

#[tokio::test]
async fn test_loan_requires_customer() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.open_loan("Nobody").await;
    assert!(matches!(result, Err(AppError::CustomerNotFound(_))));

    let result = service.pay_loan("Nobody", vec![100]).await;
    assert!(matches!(result, Err(AppError::CustomerNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_charge_accumulates_total_and_draws_stock() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_with_customer(&service).await?;

    let day = parse_day("2025-03-14");

    // Loan opens at 0/0; qty 2 at 50.00 billed -> total 100.00
    let result = service
        .charge_loan("Asha", day, vec![item("Rice", 2000, 5000)])
        .await?;
    assert_eq!(result.loan.total_cents, 10_000);
    assert_eq!(service.get_inventory("Rice").await?.stock, 8000);

    // A second charge accumulates instead of overwriting
    let result = service
        .charge_loan("Asha", day, vec![item("Soap", 4000, 500)])
        .await?;
    assert_eq!(result.loan.total_cents, 12_000);

    Ok(())
}

#[tokio::test]
async fn test_charge_feeds_the_daily_sale() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_with_customer(&service).await?;

    let day = parse_day("2025-03-14");
    let result = service
        .charge_loan("Asha", day, vec![item("Rice", 2000, 5000)])
        .await?;

    // The billed items land on the day's sale as credit items
    let sale = service.get_sale_by_day(day).await?;
    assert_eq!(sale.id, result.sale.id);
    assert_eq!(sale.revenue_cents, 10_000);

    let items = service.list_sale_items(sale.id).await?;
    assert_eq!(items.len(), 1);
    assert!(items[0].is_on_loan());

    Ok(())
}

#[tokio::test]
async fn test_charge_respects_stock() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_with_customer(&service).await?;

    let day = parse_day("2025-03-14");
    let result = service
        .charge_loan("Asha", day, vec![item("Milk", 6000, 800)])
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));

    // Nothing moved: stock, loan and sale are all untouched
    assert_eq!(service.get_inventory("Milk").await?.stock, 5000);
    let statement = service.get_loan_statement("Asha").await?;
    assert_eq!(statement.loan.total_cents, 0);
    assert!(statement.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_payment_worked_example() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_with_customer(&service).await?;

    // Bill qty 2 at 50.00 -> total 100.00
    service
        .charge_loan("Asha", parse_day("2025-03-14"), vec![item("Rice", 2000, 5000)])
        .await?;

    // Pay 60.00 -> paid 60.00
    let result = service.pay_loan("Asha", vec![6000]).await?;
    assert_eq!(result.loan.paid_cents, 6000);

    // Pay 50.00 -> rejected (60 + 50 = 110 > 100), paid stays 60.00
    let rejected = service.pay_loan("Asha", vec![5000]).await;
    assert!(matches!(
        rejected,
        Err(AppError::OverpaymentRejected {
            total: 10_000,
            already_paid: 6000,
            requested: 5000,
        })
    ));

    let statement = service.get_loan_statement("Asha").await?;
    assert_eq!(statement.loan.paid_cents, 6000);
    assert_eq!(statement.loan.outstanding_cents(), 4000);
    assert_eq!(statement.payments.len(), 1, "Rejected payment left no row");

    Ok(())
}

#[tokio::test]
async fn test_payment_batch_rejected_whole() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_with_customer(&service).await?;

    service
        .charge_loan("Asha", parse_day("2025-03-14"), vec![item("Rice", 1000, 5000)])
        .await?;

    // Total is 50.00; the batch sums to 60.00 so the whole batch is rejected,
    // including the 30.00 that would have fit on its own
    let result = service.pay_loan("Asha", vec![3000, 3000]).await;
    assert!(matches!(result, Err(AppError::OverpaymentRejected { .. })));

    let statement = service.get_loan_statement("Asha").await?;
    assert_eq!(statement.loan.paid_cents, 0);
    assert!(statement.payments.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_settling_a_loan_exactly() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_with_customer(&service).await?;

    service
        .charge_loan("Asha", parse_day("2025-03-14"), vec![item("Soap", 4000, 500)])
        .await?;

    // 20.00 total, paid in two installments that land exactly on it
    service.pay_loan("Asha", vec![1500]).await?;
    let result = service.pay_loan("Asha", vec![500]).await?;

    assert!(result.loan.is_settled());
    assert_eq!(result.loan.outstanding_cents(), 0);

    Ok(())
}

#[tokio::test]
async fn test_nonpositive_payment_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_with_customer(&service).await?;

    service
        .charge_loan("Asha", parse_day("2025-03-14"), vec![item("Rice", 2000, 5000)])
        .await?;

    let result = service.pay_loan("Asha", vec![0]).await;
    assert!(matches!(result, Err(AppError::InvalidAmount(_))));

    let result = service.pay_loan("Asha", vec![1000, -500]).await;
    assert!(matches!(result, Err(AppError::InvalidAmount(_))));

    Ok(())
}

#[tokio::test]
async fn test_statement_lists_items_and_payments() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StockedShop::create_with_customer(&service).await?;

    let day = parse_day("2025-03-14");
    service
        .charge_loan("Asha", day, vec![item("Rice", 1000, 5000)])
        .await?;
    service
        .charge_loan("Asha", day, vec![item("Soap", 2000, 500)])
        .await?;
    service.pay_loan("Asha", vec![2000, 1000]).await?;

    let statement = service.get_loan_statement("Asha").await?;
    assert_eq!(statement.customer.name, "Asha");
    assert_eq!(statement.items.len(), 2);
    assert_eq!(statement.payments.len(), 2);
    assert_eq!(statement.loan.total_cents, 6000);
    assert_eq!(statement.loan.paid_cents, 3000);

    Ok(())
}
