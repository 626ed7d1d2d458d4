use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{
    apply_payment, dedupe_by_name, draw_stock, line_amount, receive_stock, Cents, Customer,
    Expense, ExpenseId, Inventory, InventoryId, Loan, PayItem, PaymentError, Product, Purchase,
    PurchaseId, PurchaseItem, Quantity, Sale, SaleId, SaleItem, StockError, Unit,
};
use crate::storage::{Repository, StockUpdate};

use super::{
    AppError, DailyReport, LoanEntry, LoansReport, StockEntry, StockReport,
};

/// Application service providing high-level operations for the shop.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct ShopService {
    repo: Repository,
}

/// One item to record against a sale, a loan or a purchase. The unit price
/// defaults to the product's catalog price when not given.
#[derive(Debug, Clone)]
pub struct ItemInput {
    pub product: String,
    pub quantity: Quantity,
    pub unit_price_cents: Option<Cents>,
}

/// A product together with its inventory record (if attached).
pub struct ProductInfo {
    pub product: Product,
    pub inventory: Option<Inventory>,
}

/// Result of recording a batch of sale items.
pub struct SaleItemsResult {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Result of billing a batch of items to a loan.
pub struct LoanChargeResult {
    pub loan: Loan,
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Result of applying a payment batch to a loan.
pub struct PaymentResult {
    pub loan: Loan,
    pub payments: Vec<PayItem>,
}

/// Result of recording a batch of purchase items.
pub struct PurchaseItemsResult {
    pub purchase: Purchase,
    pub items: Vec<PurchaseItem>,
}

/// Everything the shop knows about one customer's credit.
pub struct LoanStatement {
    pub customer: Customer,
    pub loan: Loan,
    pub items: Vec<SaleItem>,
    pub payments: Vec<PayItem>,
}

impl ShopService {
    /// Create a new shop service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Product operations
    // ========================

    /// Register a new product in the catalog.
    pub async fn create_product(
        &self,
        name: String,
        buying_price_cents: Cents,
        selling_price_cents: Cents,
    ) -> Result<Product, AppError> {
        if buying_price_cents < 0 || selling_price_cents < 0 {
            return Err(AppError::InvalidAmount(
                "Prices must not be negative".to_string(),
            ));
        }

        if self.repo.get_product_by_name(&name).await?.is_some() {
            return Err(AppError::ProductAlreadyExists(name));
        }

        let product = Product::new(name, buying_price_cents, selling_price_cents);
        self.repo.save_product(&product).await?;
        info!(product = %product.name, "registered product");
        Ok(product)
    }

    /// Get a product by name (the newest catalog revision).
    pub async fn get_product(&self, name: &str) -> Result<Product, AppError> {
        self.repo
            .get_product_by_name(name)
            .await?
            .ok_or_else(|| AppError::ProductNotFound(name.to_string()))
    }

    /// Look up a product by ID, for displaying recorded items.
    pub async fn get_product_by_id(
        &self,
        id: crate::domain::ProductId,
    ) -> Result<Product, AppError> {
        self.repo
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::ProductNotFound(id.to_string()))
    }

    /// Get a product together with its inventory record.
    pub async fn get_product_info(&self, name: &str) -> Result<ProductInfo, AppError> {
        let product = self.get_product(name).await?;
        let inventory = self.repo.get_inventory_for_product(product.id).await?;
        Ok(ProductInfo { product, inventory })
    }

    /// List the catalog: newest first, one entry per name.
    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products = self.repo.list_products().await?;
        Ok(dedupe_by_name(products))
    }

    /// Update a product's catalog prices. Stock cannot be changed here: it
    /// only moves through purchase and sale recording.
    pub async fn update_product(
        &self,
        name: &str,
        buying_price_cents: Option<Cents>,
        selling_price_cents: Option<Cents>,
    ) -> Result<Product, AppError> {
        let mut product = self.get_product(name).await?;

        let buying = buying_price_cents.unwrap_or(product.buying_price_cents);
        let selling = selling_price_cents.unwrap_or(product.selling_price_cents);
        if buying < 0 || selling < 0 {
            return Err(AppError::InvalidAmount(
                "Prices must not be negative".to_string(),
            ));
        }

        self.repo
            .update_product_prices(product.id, buying, selling)
            .await?;
        product.buying_price_cents = buying;
        product.selling_price_cents = selling;
        Ok(product)
    }

    /// Remove a product (and its inventory record) from the catalog.
    pub async fn delete_product(&self, name: &str) -> Result<Product, AppError> {
        let product = self.get_product(name).await?;
        self.repo.delete_product(product.id).await?;
        Ok(product)
    }

    /// Attach the single inventory record to a product, with its opening
    /// stock. A second inventory for the same product is rejected.
    pub async fn attach_inventory(
        &self,
        product_name: &str,
        opening_stock: Quantity,
        unit: Unit,
    ) -> Result<Inventory, AppError> {
        if opening_stock < 0 {
            return Err(AppError::InvalidQuantity(
                "Opening stock must not be negative".to_string(),
            ));
        }

        let product = self.get_product(product_name).await?;
        if self
            .repo
            .get_inventory_for_product(product.id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateInventory(product_name.to_string()));
        }

        let inventory = Inventory::new(product.id, opening_stock, unit);
        self.repo.save_inventory(&inventory).await?;
        info!(product = product_name, "attached inventory");
        Ok(inventory)
    }

    /// Register a new catalog revision of a product, keeping the old row.
    /// Lookups and listings show the newest revision per name; the import
    /// path uses this to refresh prices without losing history.
    pub async fn revise_product(
        &self,
        name: String,
        buying_price_cents: Cents,
        selling_price_cents: Cents,
    ) -> Result<Product, AppError> {
        if buying_price_cents < 0 || selling_price_cents < 0 {
            return Err(AppError::InvalidAmount(
                "Prices must not be negative".to_string(),
            ));
        }

        let product = Product::new(name, buying_price_cents, selling_price_cents);
        self.repo.save_product(&product).await?;
        Ok(product)
    }

    /// Get a product's inventory record.
    pub async fn get_inventory(&self, product_name: &str) -> Result<Inventory, AppError> {
        let product = self.get_product(product_name).await?;
        self.repo
            .get_inventory_for_product(product.id)
            .await?
            .ok_or_else(|| AppError::InventoryNotFound(product_name.to_string()))
    }

    /// List all inventory records.
    pub async fn list_inventories(&self) -> Result<Vec<Inventory>, AppError> {
        Ok(self.repo.list_inventories().await?)
    }

    // ========================
    // Purchase operations
    // ========================

    /// Open an empty delivery.
    pub async fn create_purchase(&self) -> Result<Purchase, AppError> {
        let purchase = Purchase::new();
        self.repo.save_purchase(&purchase).await?;
        Ok(purchase)
    }

    /// Record a batch of delivered items: each one tops up its product's
    /// stock and adds its line amount to the purchase total. Deliveries are
    /// always accepted; the only failure conditions are missing records.
    pub async fn add_purchase_items(
        &self,
        purchase_id: PurchaseId,
        inputs: Vec<ItemInput>,
    ) -> Result<PurchaseItemsResult, AppError> {
        let mut purchase = self
            .repo
            .get_purchase(purchase_id)
            .await?
            .ok_or_else(|| AppError::PurchaseNotFound(purchase_id.to_string()))?;

        let mut items = Vec::new();
        let mut stocks: HashMap<InventoryId, Quantity> = HashMap::new();

        for input in &inputs {
            let (product, inventory) = self.resolve_stocked_product(&input.product).await?;
            validate_quantity(input.quantity)?;
            let unit_price = input.unit_price_cents.unwrap_or(product.buying_price_cents);
            validate_price(unit_price)?;

            let stock = *stocks.entry(inventory.id).or_insert(inventory.stock);
            stocks.insert(inventory.id, receive_stock(stock, input.quantity));

            let item = PurchaseItem::new(purchase.id, product.id, input.quantity, unit_price);
            purchase.total_cents += item.line_amount_cents();
            items.push(item);
        }

        let stock_updates = collect_stock_updates(stocks);
        self.repo
            .apply_purchase_items(&purchase, &items, &stock_updates)
            .await?;

        info!(purchase_id = %purchase.id, items = items.len(), "recorded purchase items");
        Ok(PurchaseItemsResult { purchase, items })
    }

    /// Get a purchase by ID.
    pub async fn get_purchase(&self, id: PurchaseId) -> Result<Purchase, AppError> {
        self.repo
            .get_purchase(id)
            .await?
            .ok_or_else(|| AppError::PurchaseNotFound(id.to_string()))
    }

    /// List all purchases, newest first.
    pub async fn list_purchases(&self) -> Result<Vec<Purchase>, AppError> {
        Ok(self.repo.list_purchases().await?)
    }

    /// List the items of a purchase.
    pub async fn list_purchase_items(
        &self,
        purchase_id: PurchaseId,
    ) -> Result<Vec<PurchaseItem>, AppError> {
        self.get_purchase(purchase_id).await?;
        Ok(self.repo.list_purchase_items(purchase_id).await?)
    }

    /// Delete a purchase record. Stock already received stays on the shelf.
    pub async fn delete_purchase(&self, id: PurchaseId) -> Result<Purchase, AppError> {
        let purchase = self.get_purchase(id).await?;
        self.repo.delete_purchase(id).await?;
        Ok(purchase)
    }

    // ========================
    // Sale operations
    // ========================

    /// Get the day's sale, opening it if this is the first activity of the
    /// day. At most one sale exists per calendar day.
    pub async fn open_sale(&self, day: NaiveDate) -> Result<Sale, AppError> {
        if let Some(sale) = self.repo.get_sale_by_day(day).await? {
            return Ok(sale);
        }

        let sale = Sale::new(day);
        self.repo.save_sale(&sale).await?;
        info!(day = %day, "opened sale");
        Ok(sale)
    }

    /// Record a batch of counter sales against a sale. Every item must fit
    /// in stock or the whole batch is rejected and nothing is written.
    pub async fn add_sale_items(
        &self,
        sale_id: SaleId,
        inputs: Vec<ItemInput>,
    ) -> Result<SaleItemsResult, AppError> {
        let mut sale = self
            .repo
            .get_sale(sale_id)
            .await?
            .ok_or_else(|| AppError::SaleNotFound(sale_id.to_string()))?;

        let (items, stock_updates) = self.prepare_sale_items(&mut sale, None, inputs).await?;

        self.repo
            .apply_sale_items(&sale, &items, &stock_updates)
            .await?;

        info!(sale_id = %sale.id, items = items.len(), "recorded sale items");
        Ok(SaleItemsResult { sale, items })
    }

    /// Get a sale by ID.
    pub async fn get_sale(&self, id: SaleId) -> Result<Sale, AppError> {
        self.repo
            .get_sale(id)
            .await?
            .ok_or_else(|| AppError::SaleNotFound(id.to_string()))
    }

    /// Get the sale of a calendar day.
    pub async fn get_sale_by_day(&self, day: NaiveDate) -> Result<Sale, AppError> {
        self.repo
            .get_sale_by_day(day)
            .await?
            .ok_or_else(|| AppError::SaleNotFound(day.to_string()))
    }

    /// List all sales, newest day first.
    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        Ok(self.repo.list_sales().await?)
    }

    /// List the items recorded against a sale.
    pub async fn list_sale_items(&self, sale_id: SaleId) -> Result<Vec<SaleItem>, AppError> {
        self.get_sale(sale_id).await?;
        Ok(self.repo.list_sale_items(sale_id).await?)
    }

    // ========================
    // Customer operations
    // ========================

    /// Register a new customer.
    pub async fn create_customer(
        &self,
        name: String,
        phone: Option<String>,
    ) -> Result<Customer, AppError> {
        if self.repo.get_customer_by_name(&name).await?.is_some() {
            return Err(AppError::CustomerAlreadyExists(name));
        }

        let mut customer = Customer::new(name);
        if let Some(phone) = phone {
            customer = customer.with_phone(phone);
        }

        self.repo.save_customer(&customer).await?;
        Ok(customer)
    }

    /// Get a customer by name.
    pub async fn get_customer(&self, name: &str) -> Result<Customer, AppError> {
        self.repo
            .get_customer_by_name(name)
            .await?
            .ok_or_else(|| AppError::CustomerNotFound(name.to_string()))
    }

    /// List all customers.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.repo.list_customers().await?)
    }

    /// Remove a customer.
    pub async fn delete_customer(&self, name: &str) -> Result<Customer, AppError> {
        let customer = self.get_customer(name).await?;
        self.repo.delete_customer(customer.id).await?;
        Ok(customer)
    }

    // ========================
    // Loan operations
    // ========================

    /// Open a credit account for a customer. A customer holds at most one.
    pub async fn open_loan(&self, customer_name: &str) -> Result<Loan, AppError> {
        let customer = self.get_customer(customer_name).await?;
        if self
            .repo
            .get_loan_for_customer(customer.id)
            .await?
            .is_some()
        {
            return Err(AppError::LoanAlreadyExists(customer_name.to_string()));
        }

        let loan = Loan::new(customer.id);
        self.repo.save_loan(&loan).await?;
        info!(customer = customer_name, "opened loan");
        Ok(loan)
    }

    /// Bill a batch of items to a customer's loan. Stock is drawn down
    /// exactly as for a counter sale, the loan total grows by the summed
    /// line amounts, and the items also land on the day's sale.
    pub async fn charge_loan(
        &self,
        customer_name: &str,
        day: NaiveDate,
        inputs: Vec<ItemInput>,
    ) -> Result<LoanChargeResult, AppError> {
        let customer = self.get_customer(customer_name).await?;
        let mut loan = self
            .repo
            .get_loan_for_customer(customer.id)
            .await?
            .ok_or_else(|| AppError::LoanNotFound(customer_name.to_string()))?;

        let mut sale = self.open_sale(day).await?;
        let (items, stock_updates) = self
            .prepare_sale_items(&mut sale, Some(loan.id), inputs)
            .await?;

        let batch_total: Cents = items.iter().map(|item| item.line_amount_cents()).sum();
        loan.total_cents += batch_total;

        self.repo
            .apply_loan_charge(&loan, &sale, &items, &stock_updates)
            .await?;

        info!(customer = customer_name, batch_total, "charged loan");
        Ok(LoanChargeResult { loan, sale, items })
    }

    /// Apply a payment batch to a customer's loan. The batch is summed and
    /// checked as a whole: if it would overshoot the loan total, the whole
    /// batch is rejected and the paid amount stays unchanged.
    pub async fn pay_loan(
        &self,
        customer_name: &str,
        amounts: Vec<Cents>,
    ) -> Result<PaymentResult, AppError> {
        let customer = self.get_customer(customer_name).await?;
        let mut loan = self
            .repo
            .get_loan_for_customer(customer.id)
            .await?
            .ok_or_else(|| AppError::LoanNotFound(customer_name.to_string()))?;

        let mut batch_total: Cents = 0;
        for amount in &amounts {
            if *amount <= 0 {
                return Err(AppError::InvalidAmount(
                    "Payment amounts must be positive".to_string(),
                ));
            }
            batch_total += amount;
        }

        loan.paid_cents = apply_payment(loan.total_cents, loan.paid_cents, batch_total)
            .map_err(payment_error)?;

        let payments: Vec<PayItem> = amounts
            .into_iter()
            .map(|amount| PayItem::new(loan.id, amount))
            .collect();

        self.repo.apply_loan_payment(&loan, &payments).await?;

        info!(customer = customer_name, batch_total, "applied loan payment");
        Ok(PaymentResult { loan, payments })
    }

    /// List all loans.
    pub async fn list_loans(&self) -> Result<Vec<Loan>, AppError> {
        Ok(self.repo.list_loans().await?)
    }

    /// Get a customer's full credit statement.
    pub async fn get_loan_statement(&self, customer_name: &str) -> Result<LoanStatement, AppError> {
        let customer = self.get_customer(customer_name).await?;
        let loan = self
            .repo
            .get_loan_for_customer(customer.id)
            .await?
            .ok_or_else(|| AppError::LoanNotFound(customer_name.to_string()))?;

        let items = self.repo.list_loan_items(loan.id).await?;
        let payments = self.repo.list_pay_items(loan.id).await?;

        Ok(LoanStatement {
            customer,
            loan,
            items,
            payments,
        })
    }

    // ========================
    // Expense operations
    // ========================

    /// Record a batch of expenses.
    pub async fn add_expenses(
        &self,
        inputs: Vec<(String, String, Cents)>,
    ) -> Result<Vec<Expense>, AppError> {
        let mut expenses = Vec::new();
        for (category, description, amount_cents) in inputs {
            if amount_cents <= 0 {
                return Err(AppError::InvalidAmount(
                    "Expense amounts must be positive".to_string(),
                ));
            }
            let expense = Expense::new(category, description, amount_cents);
            self.repo.save_expense(&expense).await?;
            expenses.push(expense);
        }
        Ok(expenses)
    }

    /// Get an expense by ID.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<Expense, AppError> {
        self.repo
            .get_expense(id)
            .await?
            .ok_or_else(|| AppError::ExpenseNotFound(id.to_string()))
    }

    /// List all expenses, newest first.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>, AppError> {
        Ok(self.repo.list_expenses().await?)
    }

    /// Update the named fields of an expense. Omitted fields keep their
    /// stored values.
    pub async fn update_expense(
        &self,
        id: ExpenseId,
        category: Option<String>,
        description: Option<String>,
        amount_cents: Option<Cents>,
    ) -> Result<Expense, AppError> {
        let mut expense = self.get_expense(id).await?;

        if let Some(category) = category {
            expense.category = category;
        }
        if let Some(description) = description {
            expense.description = description;
        }
        if let Some(amount) = amount_cents {
            if amount <= 0 {
                return Err(AppError::InvalidAmount(
                    "Expense amounts must be positive".to_string(),
                ));
            }
            expense.amount_cents = amount;
        }

        self.repo
            .update_expense(
                expense.id,
                &expense.category,
                &expense.description,
                expense.amount_cents,
            )
            .await?;
        Ok(expense)
    }

    /// Delete an expense.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<Expense, AppError> {
        let expense = self.get_expense(id).await?;
        self.repo.delete_expense(id).await?;
        Ok(expense)
    }

    // ========================
    // Reporting operations
    // ========================

    /// One day's takings against its costs and expenses.
    pub async fn daily_report(&self, day: NaiveDate) -> Result<DailyReport, AppError> {
        let (revenue_cents, cost_cents) = match self.repo.get_sale_by_day(day).await? {
            Some(sale) => (sale.revenue_cents, sale.cost_cents),
            None => (0, 0),
        };

        let from = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let to = from + chrono::Duration::days(1);
        let expenses_cents = self.repo.sum_expenses_between(from, to).await?;

        let gross_margin_cents = revenue_cents - cost_cents;
        Ok(DailyReport {
            day,
            revenue_cents,
            cost_cents,
            gross_margin_cents,
            expenses_cents,
            net_cents: gross_margin_cents - expenses_cents,
        })
    }

    /// Stock on the shelf per product, flagging entries at or below the
    /// threshold when one is given.
    pub async fn stock_report(&self, threshold: Option<Quantity>) -> Result<StockReport, AppError> {
        let products = self.list_products().await?;
        let mut entries = Vec::new();

        for product in products {
            let Some(inventory) = self.repo.get_inventory_for_product(product.id).await? else {
                continue;
            };
            let low = threshold.is_some_and(|t| inventory.stock <= t);
            entries.push(StockEntry {
                product_name: product.name,
                unit: inventory.unit,
                stock: inventory.stock,
                low,
            });
        }

        Ok(StockReport { entries, threshold })
    }

    /// Outstanding credit per customer.
    pub async fn loans_report(&self) -> Result<LoansReport, AppError> {
        let loans = self.repo.list_loans().await?;
        let mut entries = Vec::new();
        let mut total_outstanding_cents: Cents = 0;

        for loan in loans {
            let customer = self
                .repo
                .get_customer(loan.customer_id)
                .await?
                .ok_or_else(|| AppError::CustomerNotFound(loan.customer_id.to_string()))?;

            total_outstanding_cents += loan.outstanding_cents();
            entries.push(LoanEntry {
                customer_name: customer.name,
                total_cents: loan.total_cents,
                paid_cents: loan.paid_cents,
                outstanding_cents: loan.outstanding_cents(),
            });
        }

        Ok(LoansReport {
            entries,
            total_outstanding_cents,
        })
    }

    // ========================
    // Internal helpers
    // ========================

    /// Resolve a product and its inventory record by name.
    async fn resolve_stocked_product(&self, name: &str) -> Result<(Product, Inventory), AppError> {
        let product = self.get_product(name).await?;
        let inventory = self
            .repo
            .get_inventory_for_product(product.id)
            .await?
            .ok_or_else(|| AppError::InventoryNotFound(name.to_string()))?;
        Ok((product, inventory))
    }

    /// Validate a batch of sale inputs against stock and accumulate the
    /// sale's running totals. Returns the item rows and the final stock
    /// level per touched inventory. Rejection of any item rejects the batch.
    async fn prepare_sale_items(
        &self,
        sale: &mut Sale,
        loan_id: Option<crate::domain::LoanId>,
        inputs: Vec<ItemInput>,
    ) -> Result<(Vec<SaleItem>, Vec<StockUpdate>), AppError> {
        let mut items = Vec::new();
        let mut stocks: HashMap<InventoryId, Quantity> = HashMap::new();

        for input in &inputs {
            let (product, inventory) = self.resolve_stocked_product(&input.product).await?;
            validate_quantity(input.quantity)?;
            let unit_price = input
                .unit_price_cents
                .unwrap_or(product.selling_price_cents);
            validate_price(unit_price)?;

            let stock = *stocks.entry(inventory.id).or_insert(inventory.stock);
            let new_stock = draw_stock(stock, input.quantity)
                .map_err(|e| stock_error(&product.name, e))?;
            stocks.insert(inventory.id, new_stock);

            let mut item = SaleItem::new(sale.id, product.id, input.quantity, unit_price);
            if let Some(loan_id) = loan_id {
                item = item.with_loan(loan_id);
            }

            sale.revenue_cents += item.line_amount_cents();
            sale.cost_cents += line_amount(input.quantity, product.buying_price_cents);
            items.push(item);
        }

        Ok((items, collect_stock_updates(stocks)))
    }
}

fn validate_quantity(quantity: Quantity) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::InvalidQuantity(
            "Quantity must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price: Cents) -> Result<(), AppError> {
    if price < 0 {
        return Err(AppError::InvalidAmount(
            "Unit price must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn collect_stock_updates(stocks: HashMap<InventoryId, Quantity>) -> Vec<StockUpdate> {
    stocks
        .into_iter()
        .map(|(inventory_id, new_stock)| StockUpdate {
            inventory_id,
            new_stock,
        })
        .collect()
}

fn stock_error(product_name: &str, error: StockError) -> AppError {
    match error {
        StockError::InsufficientStock {
            available,
            requested,
        } => AppError::InsufficientStock {
            product_name: product_name.to_string(),
            available,
            requested,
        },
    }
}

fn payment_error(error: PaymentError) -> AppError {
    match error {
        PaymentError::OverpaymentRejected {
            total,
            already_paid,
            requested,
        } => AppError::OverpaymentRejected {
            total,
            already_paid,
            requested,
        },
    }
}
