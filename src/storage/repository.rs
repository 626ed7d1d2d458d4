use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    Cents, Customer, CustomerId, Expense, ExpenseId, Inventory, InventoryId, Loan, LoanId,
    PayItem, Product, ProductId, Purchase, PurchaseId, PurchaseItem, Quantity, Sale, SaleId,
    SaleItem, Unit,
};

use super::{MIGRATION_001_INITIAL, MIGRATION_002_EXPENSES};

/// Precomputed stock level for one inventory row, applied together with the
/// items that caused it so a rejected operation writes nothing.
#[derive(Debug, Clone)]
pub struct StockUpdate {
    pub inventory_id: InventoryId,
    pub new_stock: Quantity,
}

/// Repository for persisting and querying the shop's records.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        sqlx::query(MIGRATION_002_EXPENSES)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 002")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Product operations
    // ========================

    /// Save a new product to the catalog.
    pub async fn save_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, buying_price_cents, selling_price_cents, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(product.buying_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save product")?;
        Ok(())
    }

    /// Get a product by ID.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, buying_price_cents, selling_price_cents, created_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch product")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_product(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a product by name. When several catalog revisions share the name,
    /// the newest row wins.
    pub async fn get_product_by_name(&self, name: &str) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, buying_price_cents, selling_price_cents, created_at
            FROM products
            WHERE name = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch product by name")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_product(&row)?)),
            None => Ok(None),
        }
    }

    /// List the whole catalog, newest first. Callers deduplicate by name.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, buying_price_cents, selling_price_cents, created_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list products")?;

        rows.iter().map(Self::row_to_product).collect()
    }

    /// Update a product's catalog prices. Stock is not touched here: it only
    /// moves through purchase and sale recording.
    pub async fn update_product_prices(
        &self,
        id: ProductId,
        buying_price_cents: Cents,
        selling_price_cents: Cents,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE products SET buying_price_cents = ?, selling_price_cents = ? WHERE id = ?",
        )
        .bind(buying_price_cents)
        .bind(selling_price_cents)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update product prices")?;
        Ok(())
    }

    /// Delete a product and its inventory record.
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM inventories WHERE product_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to delete inventory")?;

        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to delete product")?;

        tx.commit().await.context("Failed to commit delete")?;
        Ok(())
    }

    fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(Product {
            id: Uuid::parse_str(&id_str).context("Invalid product ID")?,
            name: row.get("name"),
            buying_price_cents: row.get("buying_price_cents"),
            selling_price_cents: row.get("selling_price_cents"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    // ========================
    // Inventory operations
    // ========================

    /// Save a new inventory record for a product.
    pub async fn save_inventory(&self, inventory: &Inventory) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO inventories (id, product_id, stock, unit, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(inventory.id.to_string())
        .bind(inventory.product_id.to_string())
        .bind(inventory.stock)
        .bind(inventory.unit.as_str())
        .bind(inventory.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save inventory")?;
        Ok(())
    }

    /// Get the inventory record of a product, if one exists.
    pub async fn get_inventory_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Inventory>> {
        let row = sqlx::query(
            r#"
            SELECT id, product_id, stock, unit, created_at
            FROM inventories
            WHERE product_id = ?
            "#,
        )
        .bind(product_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch inventory")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_inventory(&row)?)),
            None => Ok(None),
        }
    }

    /// List all inventory records.
    pub async fn list_inventories(&self) -> Result<Vec<Inventory>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, stock, unit, created_at
            FROM inventories
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list inventories")?;

        rows.iter().map(Self::row_to_inventory).collect()
    }

    fn row_to_inventory(row: &sqlx::sqlite::SqliteRow) -> Result<Inventory> {
        let id_str: String = row.get("id");
        let product_id_str: String = row.get("product_id");
        let unit_str: String = row.get("unit");
        let created_at_str: String = row.get("created_at");

        Ok(Inventory {
            id: Uuid::parse_str(&id_str).context("Invalid inventory ID")?,
            product_id: Uuid::parse_str(&product_id_str).context("Invalid product ID")?,
            stock: row.get("stock"),
            unit: Unit::from_str(&unit_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid unit: {}", unit_str))?,
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    // ========================
    // Customer operations
    // ========================

    /// Save a new customer.
    pub async fn save_customer(&self, customer: &Customer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(customer.id.to_string())
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save customer")?;
        Ok(())
    }

    /// Get a customer by name.
    pub async fn get_customer_by_name(&self, name: &str) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, created_at
            FROM customers
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch customer by name")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_customer(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a customer by ID.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, created_at
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch customer")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_customer(&row)?)),
            None => Ok(None),
        }
    }

    /// List all customers ordered by name.
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, created_at
            FROM customers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list customers")?;

        rows.iter().map(Self::row_to_customer).collect()
    }

    /// Delete a customer.
    pub async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete customer")?;
        Ok(())
    }

    fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(Customer {
            id: Uuid::parse_str(&id_str).context("Invalid customer ID")?,
            name: row.get("name"),
            phone: row.get("phone"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    // ========================
    // Loan operations
    // ========================

    /// Save a new loan.
    pub async fn save_loan(&self, loan: &Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (id, customer_id, total_cents, paid_cents, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(loan.id.to_string())
        .bind(loan.customer_id.to_string())
        .bind(loan.total_cents)
        .bind(loan.paid_cents)
        .bind(loan.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save loan")?;
        Ok(())
    }

    /// Get the loan of a customer, if one exists.
    pub async fn get_loan_for_customer(&self, customer_id: CustomerId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, total_cents, paid_cents, created_at
            FROM loans
            WHERE customer_id = ?
            "#,
        )
        .bind(customer_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch loan")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_loan(&row)?)),
            None => Ok(None),
        }
    }

    /// List all loans.
    pub async fn list_loans(&self) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, total_cents, paid_cents, created_at
            FROM loans
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list loans")?;

        rows.iter().map(Self::row_to_loan).collect()
    }

    /// List the payments applied to a loan, in recording order.
    pub async fn list_pay_items(&self, loan_id: LoanId) -> Result<Vec<PayItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, loan_id, amount_cents, created_at
            FROM pay_items
            WHERE loan_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(loan_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list pay items")?;

        rows.iter().map(Self::row_to_pay_item).collect()
    }

    /// Persist a loan payment batch: the new paid total and the pay items
    /// behind it, in one transaction.
    pub async fn apply_loan_payment(&self, loan: &Loan, payments: &[PayItem]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE loans SET paid_cents = ? WHERE id = ?")
            .bind(loan.paid_cents)
            .bind(loan.id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to update loan")?;

        for payment in payments {
            sqlx::query(
                r#"
                INSERT INTO pay_items (id, loan_id, amount_cents, created_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(payment.id.to_string())
            .bind(payment.loan_id.to_string())
            .bind(payment.amount_cents)
            .bind(payment.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("Failed to save pay item")?;
        }

        tx.commit().await.context("Failed to commit loan payment")?;
        debug!(loan_id = %loan.id, paid_cents = loan.paid_cents, "applied loan payment");
        Ok(())
    }

    fn row_to_loan(row: &sqlx::sqlite::SqliteRow) -> Result<Loan> {
        let id_str: String = row.get("id");
        let customer_id_str: String = row.get("customer_id");
        let created_at_str: String = row.get("created_at");

        Ok(Loan {
            id: Uuid::parse_str(&id_str).context("Invalid loan ID")?,
            customer_id: Uuid::parse_str(&customer_id_str).context("Invalid customer ID")?,
            total_cents: row.get("total_cents"),
            paid_cents: row.get("paid_cents"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    fn row_to_pay_item(row: &sqlx::sqlite::SqliteRow) -> Result<PayItem> {
        let id_str: String = row.get("id");
        let loan_id_str: String = row.get("loan_id");
        let created_at_str: String = row.get("created_at");

        Ok(PayItem {
            id: Uuid::parse_str(&id_str).context("Invalid pay item ID")?,
            loan_id: Uuid::parse_str(&loan_id_str).context("Invalid loan ID")?,
            amount_cents: row.get("amount_cents"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    // ========================
    // Sale operations
    // ========================

    /// Save a new (empty) sale for a day.
    pub async fn save_sale(&self, sale: &Sale) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sales (id, day, revenue_cents, cost_cents, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(sale.id.to_string())
        .bind(sale.day.format("%Y-%m-%d").to_string())
        .bind(sale.revenue_cents)
        .bind(sale.cost_cents)
        .bind(sale.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save sale")?;
        Ok(())
    }

    /// Get a sale by ID.
    pub async fn get_sale(&self, id: SaleId) -> Result<Option<Sale>> {
        let row = sqlx::query(
            r#"
            SELECT id, day, revenue_cents, cost_cents, created_at
            FROM sales
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch sale")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_sale(&row)?)),
            None => Ok(None),
        }
    }

    /// Get the sale for a calendar day, if one was opened.
    pub async fn get_sale_by_day(&self, day: NaiveDate) -> Result<Option<Sale>> {
        let row = sqlx::query(
            r#"
            SELECT id, day, revenue_cents, cost_cents, created_at
            FROM sales
            WHERE day = ?
            "#,
        )
        .bind(day.format("%Y-%m-%d").to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch sale by day")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_sale(&row)?)),
            None => Ok(None),
        }
    }

    /// List all sales, newest day first.
    pub async fn list_sales(&self) -> Result<Vec<Sale>> {
        let rows = sqlx::query(
            r#"
            SELECT id, day, revenue_cents, cost_cents, created_at
            FROM sales
            ORDER BY day DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list sales")?;

        rows.iter().map(Self::row_to_sale).collect()
    }

    /// List the items recorded against a sale, in recording order.
    pub async fn list_sale_items(&self, sale_id: SaleId) -> Result<Vec<SaleItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sale_id, product_id, loan_id, quantity, unit_price_cents, created_at
            FROM sale_items
            WHERE sale_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(sale_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list sale items")?;

        rows.iter().map(Self::row_to_sale_item).collect()
    }

    /// List the items billed to a loan, in recording order.
    pub async fn list_loan_items(&self, loan_id: LoanId) -> Result<Vec<SaleItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sale_id, product_id, loan_id, quantity, unit_price_cents, created_at
            FROM sale_items
            WHERE loan_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(loan_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list loan items")?;

        rows.iter().map(Self::row_to_sale_item).collect()
    }

    /// Persist a sale batch: the sale's new accumulators, its new items and
    /// the stock levels they drew down, in one transaction. The caller has
    /// already validated every item; nothing here can partially apply.
    pub async fn apply_sale_items(
        &self,
        sale: &Sale,
        items: &[SaleItem],
        stock_updates: &[StockUpdate],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE sales SET revenue_cents = ?, cost_cents = ? WHERE id = ?")
            .bind(sale.revenue_cents)
            .bind(sale.cost_cents)
            .bind(sale.id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to update sale")?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, product_id, loan_id, quantity, unit_price_cents, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id.to_string())
            .bind(item.sale_id.to_string())
            .bind(item.product_id.to_string())
            .bind(item.loan_id.map(|id| id.to_string()))
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("Failed to save sale item")?;
        }

        for update in stock_updates {
            sqlx::query("UPDATE inventories SET stock = ? WHERE id = ?")
                .bind(update.new_stock)
                .bind(update.inventory_id.to_string())
                .execute(&mut *tx)
                .await
                .context("Failed to update stock")?;
        }

        tx.commit().await.context("Failed to commit sale items")?;
        debug!(sale_id = %sale.id, items = items.len(), "applied sale items");
        Ok(())
    }

    /// Persist a loan charge: like `apply_sale_items`, plus the loan's new
    /// total, in the same transaction.
    pub async fn apply_loan_charge(
        &self,
        loan: &Loan,
        sale: &Sale,
        items: &[SaleItem],
        stock_updates: &[StockUpdate],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE loans SET total_cents = ? WHERE id = ?")
            .bind(loan.total_cents)
            .bind(loan.id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to update loan")?;

        sqlx::query("UPDATE sales SET revenue_cents = ?, cost_cents = ? WHERE id = ?")
            .bind(sale.revenue_cents)
            .bind(sale.cost_cents)
            .bind(sale.id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to update sale")?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, product_id, loan_id, quantity, unit_price_cents, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id.to_string())
            .bind(item.sale_id.to_string())
            .bind(item.product_id.to_string())
            .bind(item.loan_id.map(|id| id.to_string()))
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("Failed to save sale item")?;
        }

        for update in stock_updates {
            sqlx::query("UPDATE inventories SET stock = ? WHERE id = ?")
                .bind(update.new_stock)
                .bind(update.inventory_id.to_string())
                .execute(&mut *tx)
                .await
                .context("Failed to update stock")?;
        }

        tx.commit().await.context("Failed to commit loan charge")?;
        debug!(loan_id = %loan.id, total_cents = loan.total_cents, "applied loan charge");
        Ok(())
    }

    fn row_to_sale(row: &sqlx::sqlite::SqliteRow) -> Result<Sale> {
        let id_str: String = row.get("id");
        let day_str: String = row.get("day");
        let created_at_str: String = row.get("created_at");

        Ok(Sale {
            id: Uuid::parse_str(&id_str).context("Invalid sale ID")?,
            day: NaiveDate::parse_from_str(&day_str, "%Y-%m-%d").context("Invalid sale day")?,
            revenue_cents: row.get("revenue_cents"),
            cost_cents: row.get("cost_cents"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    fn row_to_sale_item(row: &sqlx::sqlite::SqliteRow) -> Result<SaleItem> {
        let id_str: String = row.get("id");
        let sale_id_str: String = row.get("sale_id");
        let product_id_str: String = row.get("product_id");
        let loan_id_str: Option<String> = row.get("loan_id");
        let created_at_str: String = row.get("created_at");

        Ok(SaleItem {
            id: Uuid::parse_str(&id_str).context("Invalid sale item ID")?,
            sale_id: Uuid::parse_str(&sale_id_str).context("Invalid sale ID")?,
            product_id: Uuid::parse_str(&product_id_str).context("Invalid product ID")?,
            loan_id: loan_id_str
                .map(|s| Uuid::parse_str(&s))
                .transpose()
                .context("Invalid loan ID")?,
            quantity: row.get("quantity"),
            unit_price_cents: row.get("unit_price_cents"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    // ========================
    // Purchase operations
    // ========================

    /// Save a new (empty) purchase.
    pub async fn save_purchase(&self, purchase: &Purchase) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO purchases (id, total_cents, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(purchase.id.to_string())
        .bind(purchase.total_cents)
        .bind(purchase.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save purchase")?;
        Ok(())
    }

    /// Get a purchase by ID.
    pub async fn get_purchase(&self, id: PurchaseId) -> Result<Option<Purchase>> {
        let row = sqlx::query(
            r#"
            SELECT id, total_cents, created_at
            FROM purchases
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch purchase")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_purchase(&row)?)),
            None => Ok(None),
        }
    }

    /// List all purchases, newest first.
    pub async fn list_purchases(&self) -> Result<Vec<Purchase>> {
        let rows = sqlx::query(
            r#"
            SELECT id, total_cents, created_at
            FROM purchases
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list purchases")?;

        rows.iter().map(Self::row_to_purchase).collect()
    }

    /// List the items of a purchase, in recording order.
    pub async fn list_purchase_items(&self, purchase_id: PurchaseId) -> Result<Vec<PurchaseItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, purchase_id, product_id, quantity, unit_price_cents, created_at
            FROM purchase_items
            WHERE purchase_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(purchase_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list purchase items")?;

        rows.iter().map(Self::row_to_purchase_item).collect()
    }

    /// Persist a delivery batch: the purchase's new total, its new items and
    /// the stock levels they topped up, in one transaction.
    pub async fn apply_purchase_items(
        &self,
        purchase: &Purchase,
        items: &[PurchaseItem],
        stock_updates: &[StockUpdate],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE purchases SET total_cents = ? WHERE id = ?")
            .bind(purchase.total_cents)
            .bind(purchase.id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to update purchase")?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO purchase_items (id, purchase_id, product_id, quantity, unit_price_cents, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id.to_string())
            .bind(item.purchase_id.to_string())
            .bind(item.product_id.to_string())
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("Failed to save purchase item")?;
        }

        for update in stock_updates {
            sqlx::query("UPDATE inventories SET stock = ? WHERE id = ?")
                .bind(update.new_stock)
                .bind(update.inventory_id.to_string())
                .execute(&mut *tx)
                .await
                .context("Failed to update stock")?;
        }

        tx.commit()
            .await
            .context("Failed to commit purchase items")?;
        debug!(purchase_id = %purchase.id, items = items.len(), "applied purchase items");
        Ok(())
    }

    /// Delete a purchase and its items. Stock received through it stays:
    /// removal is bookkeeping cleanup, not a reversal.
    pub async fn delete_purchase(&self, id: PurchaseId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM purchase_items WHERE purchase_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to delete purchase items")?;

        sqlx::query("DELETE FROM purchases WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to delete purchase")?;

        tx.commit().await.context("Failed to commit delete")?;
        Ok(())
    }

    fn row_to_purchase(row: &sqlx::sqlite::SqliteRow) -> Result<Purchase> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(Purchase {
            id: Uuid::parse_str(&id_str).context("Invalid purchase ID")?,
            total_cents: row.get("total_cents"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    fn row_to_purchase_item(row: &sqlx::sqlite::SqliteRow) -> Result<PurchaseItem> {
        let id_str: String = row.get("id");
        let purchase_id_str: String = row.get("purchase_id");
        let product_id_str: String = row.get("product_id");
        let created_at_str: String = row.get("created_at");

        Ok(PurchaseItem {
            id: Uuid::parse_str(&id_str).context("Invalid purchase item ID")?,
            purchase_id: Uuid::parse_str(&purchase_id_str).context("Invalid purchase ID")?,
            product_id: Uuid::parse_str(&product_id_str).context("Invalid product ID")?,
            quantity: row.get("quantity"),
            unit_price_cents: row.get("unit_price_cents"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    // ========================
    // Expense operations
    // ========================

    /// Save a new expense.
    pub async fn save_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, category, description, amount_cents, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.id.to_string())
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save expense")?;
        Ok(())
    }

    /// Get an expense by ID.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<Option<Expense>> {
        let row = sqlx::query(
            r#"
            SELECT id, category, description, amount_cents, created_at
            FROM expenses
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch expense")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_expense(&row)?)),
            None => Ok(None),
        }
    }

    /// List all expenses, newest first.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category, description, amount_cents, created_at
            FROM expenses
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// Update the named fields of an expense.
    pub async fn update_expense(
        &self,
        id: ExpenseId,
        category: &str,
        description: &str,
        amount_cents: Cents,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE expenses SET category = ?, description = ?, amount_cents = ? WHERE id = ?",
        )
        .bind(category)
        .bind(description)
        .bind(amount_cents)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update expense")?;
        Ok(())
    }

    /// Delete an expense.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<()> {
        sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete expense")?;
        Ok(())
    }

    /// Sum expenses recorded within a time range using SQL aggregation.
    pub async fn sum_expenses_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0) as total
            FROM expenses
            WHERE created_at >= ? AND created_at < ?
            "#,
        )
        .bind(from.to_rfc3339())
        .bind(to.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum expenses")?;

        Ok(row.get("total"))
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(Expense {
            id: Uuid::parse_str(&id_str).context("Invalid expense ID")?,
            category: row.get("category"),
            description: row.get("description"),
            amount_cents: row.get("amount_cents"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .context("Invalid timestamp")?
        .with_timezone(&Utc))
}
