use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{ItemInput, ShopService};
use crate::domain::{format_cents, format_quantity, parse_cents, parse_quantity, Unit};

/// Configure tracing once at startup. Defaults to warnings only so command
/// output stays clean; raise with RUST_LOG=bottega=debug.
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Bottega - Retail Shop Back Office
#[derive(Parser)]
#[command(name = "bottega")]
#[command(about = "A local-first back office for a small retail shop")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "bottega.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Product catalog commands
    #[command(subcommand)]
    Product(ProductCommands),

    /// Inventory commands
    #[command(subcommand)]
    Inventory(InventoryCommands),

    /// Supplier delivery commands
    #[command(subcommand)]
    Purchase(PurchaseCommands),

    /// Daily sale commands
    #[command(subcommand)]
    Sale(SaleCommands),

    /// Customer commands
    #[command(subcommand)]
    Customer(CustomerCommands),

    /// Customer credit commands
    #[command(subcommand)]
    Loan(LoanCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export data to CSV or JSON
    Export {
        /// What to export: products, sales, loans, expenses, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import data from CSV
    Import {
        /// What to import: products
        import_type: String,

        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,

        /// Skip products already in the catalog instead of revising them
        #[arg(long)]
        skip_existing: bool,

        /// Validate without importing
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// Register a new product
    Create {
        /// Product name (must be unique)
        name: String,

        /// Buying price per unit (e.g., "8.00" or "8")
        #[arg(short, long)]
        buying: String,

        /// Selling price per unit
        #[arg(short, long)]
        selling: String,
    },

    /// List the catalog (newest revision per name)
    List,

    /// Show a product with its stock
    Show {
        /// Product name
        name: String,
    },

    /// Update catalog prices (stock moves only through purchases and sales)
    Update {
        /// Product name
        name: String,

        /// New buying price
        #[arg(long)]
        buying: Option<String>,

        /// New selling price
        #[arg(long)]
        selling: Option<String>,
    },

    /// Remove a product from the catalog
    Delete {
        /// Product name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// Attach the inventory record of a product (one per product)
    Attach {
        /// Product name
        product: String,

        /// Opening stock (e.g., "10" or "2.5")
        #[arg(short, long)]
        opening: String,

        /// Unit of measure: kg, pc, lt
        #[arg(short, long, default_value = "pc")]
        unit: String,
    },

    /// Show a product's inventory
    Show {
        /// Product name
        product: String,
    },
}

#[derive(Subcommand)]
pub enum PurchaseCommands {
    /// Open an empty delivery
    Create,

    /// Record delivered items (each tops up stock)
    Add {
        /// Purchase ID
        id: String,

        /// Item as "product:quantity[:unit-price]", repeatable.
        /// Price defaults to the product's buying price.
        #[arg(short, long = "item")]
        items: Vec<String>,
    },

    /// List all deliveries
    List,

    /// Show a delivery
    Show {
        /// Purchase ID
        id: String,
    },

    /// List the items of a delivery
    Items {
        /// Purchase ID
        id: String,
    },

    /// Delete a delivery record (stock already received stays)
    Delete {
        /// Purchase ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum SaleCommands {
    /// Open (or fetch) the sale for a day
    Open {
        /// Day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record counter sales for a day (each draws down stock)
    Add {
        /// Day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Item as "product:quantity[:unit-price]", repeatable.
        /// Price defaults to the product's selling price.
        #[arg(short, long = "item")]
        items: Vec<String>,
    },

    /// List all sales
    List,

    /// Show a day's sale
    Show {
        /// Day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List the items of a day's sale
    Items {
        /// Day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Register a new customer
    Create {
        /// Customer name (must be unique)
        name: String,

        /// Phone number
        #[arg(short, long)]
        phone: Option<String>,
    },

    /// List all customers
    List,

    /// Remove a customer
    Delete {
        /// Customer name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum LoanCommands {
    /// Open a credit account for a customer (one per customer)
    Open {
        /// Customer name
        customer: String,
    },

    /// Bill items to a customer's credit (stock drawn like a sale)
    Charge {
        /// Customer name
        customer: String,

        /// Day of the sale (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Item as "product:quantity[:unit-price]", repeatable
        #[arg(short, long = "item")]
        items: Vec<String>,
    },

    /// Apply payments to a customer's credit
    Pay {
        /// Customer name
        customer: String,

        /// Payment amounts (e.g., "60.00" "15")
        #[arg(required = true)]
        amounts: Vec<String>,
    },

    /// Show a customer's credit statement
    Show {
        /// Customer name
        customer: String,
    },

    /// List outstanding credit per customer
    List,
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount (e.g., "15.00" or "15")
        amount: String,

        /// Category (e.g., "transport", "rent")
        #[arg(short, long)]
        category: String,

        /// Description
        #[arg(short, long)]
        description: String,
    },

    /// List all expenses
    List,

    /// Update an expense's fields
    Update {
        /// Expense ID
        id: String,

        /// New category
        #[arg(long)]
        category: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New amount
        #[arg(long)]
        amount: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Takings vs costs and expenses for one day
    Daily {
        /// Day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Stock on the shelf per product
    Stock {
        /// Flag stock at or below this quantity
        #[arg(long)]
        threshold: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Outstanding credit per customer
    Loans {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                ShopService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Product(product_cmd) => {
                let service = ShopService::connect(&self.database).await?;
                run_product_command(&service, product_cmd).await?;
            }

            Commands::Inventory(inventory_cmd) => {
                let service = ShopService::connect(&self.database).await?;
                run_inventory_command(&service, inventory_cmd).await?;
            }

            Commands::Purchase(purchase_cmd) => {
                let service = ShopService::connect(&self.database).await?;
                run_purchase_command(&service, purchase_cmd).await?;
            }

            Commands::Sale(sale_cmd) => {
                let service = ShopService::connect(&self.database).await?;
                run_sale_command(&service, sale_cmd).await?;
            }

            Commands::Customer(customer_cmd) => {
                let service = ShopService::connect(&self.database).await?;
                run_customer_command(&service, customer_cmd).await?;
            }

            Commands::Loan(loan_cmd) => {
                let service = ShopService::connect(&self.database).await?;
                run_loan_command(&service, loan_cmd).await?;
            }

            Commands::Expense(expense_cmd) => {
                let service = ShopService::connect(&self.database).await?;
                run_expense_command(&service, expense_cmd).await?;
            }

            Commands::Report(report_cmd) => {
                let service = ShopService::connect(&self.database).await?;
                run_report_command(&service, report_cmd).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = ShopService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }

            Commands::Import {
                import_type,
                input,
                dry_run,
                skip_existing,
                validate,
            } => {
                let service = ShopService::connect(&self.database).await?;
                run_import_command(
                    &service,
                    &import_type,
                    input.as_deref(),
                    dry_run,
                    skip_existing,
                    validate,
                )
                .await?;
            }
        }

        Ok(())
    }
}

async fn run_product_command(service: &ShopService, cmd: ProductCommands) -> Result<()> {
    match cmd {
        ProductCommands::Create {
            name,
            buying,
            selling,
        } => {
            let buying_cents =
                parse_cents(&buying).context("Invalid buying price. Use '8.00' or '8'")?;
            let selling_cents =
                parse_cents(&selling).context("Invalid selling price. Use '10.00' or '10'")?;

            let product = service
                .create_product(name, buying_cents, selling_cents)
                .await?;
            println!(
                "Created product: {} (buy {}, sell {})",
                product.name,
                format_cents(product.buying_price_cents),
                format_cents(product.selling_price_cents)
            );
        }

        ProductCommands::List => {
            let products = service.list_products().await?;
            if products.is_empty() {
                println!("No products found.");
            } else {
                println!("{:<20} {:>10} {:>10}", "NAME", "BUY", "SELL");
                println!("{}", "-".repeat(42));
                for product in products {
                    println!(
                        "{:<20} {:>10} {:>10}",
                        truncate(&product.name, 20),
                        format_cents(product.buying_price_cents),
                        format_cents(product.selling_price_cents)
                    );
                }
            }
        }

        ProductCommands::Show { name } => {
            let info = service.get_product_info(&name).await?;
            let product = &info.product;

            println!("Product: {}", product.name);
            println!("  ID:            {}", product.id);
            println!(
                "  Buying price:  {}",
                format_cents(product.buying_price_cents)
            );
            println!(
                "  Selling price: {}",
                format_cents(product.selling_price_cents)
            );
            println!("  Margin:        {}", format_cents(product.margin_cents()));
            println!(
                "  Created:       {}",
                product.created_at.format("%Y-%m-%d %H:%M:%S")
            );
            match &info.inventory {
                Some(inventory) => {
                    println!();
                    println!(
                        "  Stock:         {} {}",
                        format_quantity(inventory.stock),
                        inventory.unit
                    );
                }
                None => {
                    println!();
                    println!("  Stock:         (no inventory attached)");
                }
            }
        }

        ProductCommands::Update {
            name,
            buying,
            selling,
        } => {
            let buying_cents = buying
                .map(|b| parse_cents(&b))
                .transpose()
                .context("Invalid buying price")?;
            let selling_cents = selling
                .map(|s| parse_cents(&s))
                .transpose()
                .context("Invalid selling price")?;

            let product = service
                .update_product(&name, buying_cents, selling_cents)
                .await?;
            println!(
                "Updated product: {} (buy {}, sell {})",
                product.name,
                format_cents(product.buying_price_cents),
                format_cents(product.selling_price_cents)
            );
        }

        ProductCommands::Delete { name } => {
            let product = service.delete_product(&name).await?;
            println!("Deleted product: {}", product.name);
        }
    }
    Ok(())
}

async fn run_inventory_command(service: &ShopService, cmd: InventoryCommands) -> Result<()> {
    match cmd {
        InventoryCommands::Attach {
            product,
            opening,
            unit,
        } => {
            let opening_stock =
                parse_quantity(&opening).context("Invalid opening stock. Use '10' or '2.5'")?;
            let unit = Unit::from_str(&unit)
                .ok_or_else(|| anyhow::anyhow!("Invalid unit '{}'. Valid units: kg, pc, lt", unit))?;

            let inventory = service.attach_inventory(&product, opening_stock, unit).await?;
            println!(
                "Attached inventory: {} ({} {})",
                product,
                format_quantity(inventory.stock),
                inventory.unit
            );
        }

        InventoryCommands::Show { product } => {
            let inventory = service.get_inventory(&product).await?;
            println!("Inventory for: {}", product);
            println!("  ID:      {}", inventory.id);
            println!(
                "  Stock:   {} {}",
                format_quantity(inventory.stock),
                inventory.unit
            );
            println!(
                "  Created: {}",
                inventory.created_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
    }
    Ok(())
}

async fn run_purchase_command(service: &ShopService, cmd: PurchaseCommands) -> Result<()> {
    match cmd {
        PurchaseCommands::Create => {
            let purchase = service.create_purchase().await?;
            println!("Opened delivery: {}", purchase.id);
        }

        PurchaseCommands::Add { id, items } => {
            let purchase_id = parse_id(&id)?;
            let inputs = parse_item_specs(&items)?;

            let result = service.add_purchase_items(purchase_id, inputs).await?;
            println!(
                "Recorded {} item(s), delivery total now {}",
                result.items.len(),
                format_cents(result.purchase.total_cents)
            );
        }

        PurchaseCommands::List => {
            let purchases = service.list_purchases().await?;
            if purchases.is_empty() {
                println!("No deliveries found.");
            } else {
                println!("{:<38} {:>12} {:<12}", "ID", "TOTAL", "DATE");
                println!("{}", "-".repeat(64));
                for purchase in purchases {
                    println!(
                        "{:<38} {:>12} {:<12}",
                        purchase.id,
                        format_cents(purchase.total_cents),
                        purchase.created_at.format("%Y-%m-%d")
                    );
                }
            }
        }

        PurchaseCommands::Show { id } => {
            let purchase = service.get_purchase(parse_id(&id)?).await?;
            println!("Delivery: {}", purchase.id);
            println!("  Total:   {}", format_cents(purchase.total_cents));
            println!(
                "  Created: {}",
                purchase.created_at.format("%Y-%m-%d %H:%M:%S")
            );
        }

        PurchaseCommands::Items { id } => {
            let items = service.list_purchase_items(parse_id(&id)?).await?;
            print_purchase_items(service, &items).await?;
        }

        PurchaseCommands::Delete { id } => {
            service.delete_purchase(parse_id(&id)?).await?;
            println!("Deleted delivery: {}", id);
        }
    }
    Ok(())
}

async fn run_sale_command(service: &ShopService, cmd: SaleCommands) -> Result<()> {
    match cmd {
        SaleCommands::Open { date } => {
            let day = parse_day_or_today(date.as_deref())?;
            let sale = service.open_sale(day).await?;
            println!("Sale for {}: {}", sale.day, sale.id);
        }

        SaleCommands::Add { date, items } => {
            let day = parse_day_or_today(date.as_deref())?;
            let inputs = parse_item_specs(&items)?;

            let sale = service.open_sale(day).await?;
            let result = service.add_sale_items(sale.id, inputs).await?;
            println!(
                "Recorded {} item(s), revenue for {} now {}",
                result.items.len(),
                result.sale.day,
                format_cents(result.sale.revenue_cents)
            );
        }

        SaleCommands::List => {
            let sales = service.list_sales().await?;
            if sales.is_empty() {
                println!("No sales found.");
            } else {
                println!(
                    "{:<12} {:>12} {:>12} {:>12}",
                    "DAY", "REVENUE", "COST", "MARGIN"
                );
                println!("{}", "-".repeat(52));
                for sale in sales {
                    println!(
                        "{:<12} {:>12} {:>12} {:>12}",
                        sale.day,
                        format_cents(sale.revenue_cents),
                        format_cents(sale.cost_cents),
                        format_cents(sale.gross_margin_cents())
                    );
                }
            }
        }

        SaleCommands::Show { date } => {
            let day = parse_day_or_today(date.as_deref())?;
            let sale = service.get_sale_by_day(day).await?;
            println!("Sale for {}", sale.day);
            println!("  ID:      {}", sale.id);
            println!("  Revenue: {}", format_cents(sale.revenue_cents));
            println!("  Cost:    {}", format_cents(sale.cost_cents));
            println!("  Margin:  {}", format_cents(sale.gross_margin_cents()));
        }

        SaleCommands::Items { date } => {
            let day = parse_day_or_today(date.as_deref())?;
            let sale = service.get_sale_by_day(day).await?;
            let items = service.list_sale_items(sale.id).await?;

            if items.is_empty() {
                println!("No items recorded for {}.", day);
            } else {
                println!(
                    "{:<20} {:>10} {:>10} {:>12} {:<8}",
                    "PRODUCT", "QTY", "PRICE", "LINE", "CREDIT"
                );
                println!("{}", "-".repeat(64));
                for item in &items {
                    let product = service.get_product_by_id(item.product_id).await?;
                    println!(
                        "{:<20} {:>10} {:>10} {:>12} {:<8}",
                        truncate(&product.name, 20),
                        format_quantity(item.quantity),
                        format_cents(item.unit_price_cents),
                        format_cents(item.line_amount_cents()),
                        if item.is_on_loan() { "yes" } else { "" }
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_customer_command(service: &ShopService, cmd: CustomerCommands) -> Result<()> {
    match cmd {
        CustomerCommands::Create { name, phone } => {
            let customer = service.create_customer(name, phone).await?;
            println!("Created customer: {}", customer.name);
        }

        CustomerCommands::List => {
            let customers = service.list_customers().await?;
            if customers.is_empty() {
                println!("No customers found.");
            } else {
                println!("{:<20} {:<16}", "NAME", "PHONE");
                println!("{}", "-".repeat(38));
                for customer in customers {
                    println!(
                        "{:<20} {:<16}",
                        truncate(&customer.name, 20),
                        customer.phone.as_deref().unwrap_or("")
                    );
                }
            }
        }

        CustomerCommands::Delete { name } => {
            let customer = service.delete_customer(&name).await?;
            println!("Deleted customer: {}", customer.name);
        }
    }
    Ok(())
}

async fn run_loan_command(service: &ShopService, cmd: LoanCommands) -> Result<()> {
    match cmd {
        LoanCommands::Open { customer } => {
            let loan = service.open_loan(&customer).await?;
            println!("Opened credit account for {}: {}", customer, loan.id);
        }

        LoanCommands::Charge {
            customer,
            date,
            items,
        } => {
            let day = parse_day_or_today(date.as_deref())?;
            let inputs = parse_item_specs(&items)?;

            let result = service.charge_loan(&customer, day, inputs).await?;
            println!(
                "Billed {} item(s) to {}, credit total now {}",
                result.items.len(),
                customer,
                format_cents(result.loan.total_cents)
            );
        }

        LoanCommands::Pay { customer, amounts } => {
            let amounts_cents = amounts
                .iter()
                .map(|a| parse_cents(a))
                .collect::<Result<Vec<_>, _>>()
                .context("Invalid payment amount. Use '60.00' or '60'")?;

            let result = service.pay_loan(&customer, amounts_cents).await?;
            println!(
                "Applied payment(s): {} paid of {} ({} outstanding)",
                format_cents(result.loan.paid_cents),
                format_cents(result.loan.total_cents),
                format_cents(result.loan.outstanding_cents())
            );
        }

        LoanCommands::Show { customer } => {
            let statement = service.get_loan_statement(&customer).await?;

            println!("Credit statement: {}", statement.customer.name);
            println!("  Total:       {}", format_cents(statement.loan.total_cents));
            println!("  Paid:        {}", format_cents(statement.loan.paid_cents));
            println!(
                "  Outstanding: {}",
                format_cents(statement.loan.outstanding_cents())
            );

            if !statement.items.is_empty() {
                println!();
                println!("  Items:");
                for item in &statement.items {
                    let product = service.get_product_by_id(item.product_id).await?;
                    println!(
                        "    {} x {} @ {} = {} ({})",
                        truncate(&product.name, 20),
                        format_quantity(item.quantity),
                        format_cents(item.unit_price_cents),
                        format_cents(item.line_amount_cents()),
                        item.created_at.format("%Y-%m-%d")
                    );
                }
            }

            if !statement.payments.is_empty() {
                println!();
                println!("  Payments:");
                for payment in &statement.payments {
                    println!(
                        "    {} on {}",
                        format_cents(payment.amount_cents),
                        payment.created_at.format("%Y-%m-%d")
                    );
                }
            }
        }

        LoanCommands::List => {
            let report = service.loans_report().await?;
            if report.entries.is_empty() {
                println!("No credit accounts found.");
            } else {
                println!(
                    "{:<20} {:>12} {:>12} {:>12}",
                    "CUSTOMER", "TOTAL", "PAID", "OUTSTANDING"
                );
                println!("{}", "-".repeat(60));
                for entry in &report.entries {
                    println!(
                        "{:<20} {:>12} {:>12} {:>12}",
                        truncate(&entry.customer_name, 20),
                        format_cents(entry.total_cents),
                        format_cents(entry.paid_cents),
                        format_cents(entry.outstanding_cents)
                    );
                }
                println!("{}", "-".repeat(60));
                println!(
                    "{:<20} {:>38}",
                    "TOTAL",
                    format_cents(report.total_outstanding_cents)
                );
            }
        }
    }
    Ok(())
}

async fn run_expense_command(service: &ShopService, cmd: ExpenseCommands) -> Result<()> {
    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            description,
        } => {
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '15.00' or '15'")?;

            let expenses = service
                .add_expenses(vec![(category, description, amount_cents)])
                .await?;
            let expense = &expenses[0];
            println!(
                "Recorded expense: {} ({}, {})",
                format_cents(expense.amount_cents),
                expense.category,
                expense.id
            );
        }

        ExpenseCommands::List => {
            let expenses = service.list_expenses().await?;
            if expenses.is_empty() {
                println!("No expenses found.");
            } else {
                println!(
                    "{:<38} {:<12} {:>10} DESCRIPTION",
                    "ID", "CATEGORY", "AMOUNT"
                );
                println!("{}", "-".repeat(80));
                for expense in expenses {
                    println!(
                        "{:<38} {:<12} {:>10} {}",
                        expense.id,
                        truncate(&expense.category, 12),
                        format_cents(expense.amount_cents),
                        truncate(&expense.description, 30)
                    );
                }
            }
        }

        ExpenseCommands::Update {
            id,
            category,
            description,
            amount,
        } => {
            let expense_id = parse_id(&id)?;
            let amount_cents = amount
                .map(|a| parse_cents(&a))
                .transpose()
                .context("Invalid amount format")?;

            let expense = service
                .update_expense(expense_id, category, description, amount_cents)
                .await?;
            println!(
                "Updated expense: {} ({}, {})",
                format_cents(expense.amount_cents),
                expense.category,
                expense.id
            );
        }

        ExpenseCommands::Delete { id } => {
            service.delete_expense(parse_id(&id)?).await?;
            println!("Deleted expense: {}", id);
        }
    }
    Ok(())
}

async fn run_report_command(service: &ShopService, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Daily { date, format } => {
            let day = parse_day_or_today(date.as_deref())?;
            let report = service.daily_report(day).await?;

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    println!("day,revenue,cost,gross_margin,expenses,net");
                    println!(
                        "{},{},{},{},{},{}",
                        report.day,
                        report.revenue_cents,
                        report.cost_cents,
                        report.gross_margin_cents,
                        report.expenses_cents,
                        report.net_cents
                    );
                }
                _ => {
                    println!("Daily Report: {}", report.day);
                    println!();
                    println!("Revenue:       {:>12}", format_cents(report.revenue_cents));
                    println!("Cost of goods: {:>12}", format_cents(report.cost_cents));
                    println!("{}", "-".repeat(27));
                    println!(
                        "Gross margin:  {:>12}",
                        format_cents(report.gross_margin_cents)
                    );
                    println!("Expenses:      {:>12}", format_cents(report.expenses_cents));
                    println!("{}", "-".repeat(27));
                    println!("Net:           {:>12}", format_cents(report.net_cents));
                }
            }
        }

        ReportCommands::Stock { threshold, format } => {
            let threshold = threshold
                .map(|t| parse_quantity(&t))
                .transpose()
                .context("Invalid threshold")?;
            let report = service.stock_report(threshold).await?;

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    println!("product,unit,stock,low");
                    for entry in &report.entries {
                        println!(
                            "{},{},{},{}",
                            entry.product_name, entry.unit, entry.stock, entry.low
                        );
                    }
                }
                _ => {
                    println!("{:<20} {:>10} {:<6} {:<4}", "PRODUCT", "STOCK", "UNIT", "LOW");
                    println!("{}", "-".repeat(44));
                    for entry in &report.entries {
                        println!(
                            "{:<20} {:>10} {:<6} {:<4}",
                            truncate(&entry.product_name, 20),
                            format_quantity(entry.stock),
                            entry.unit,
                            if entry.low { "LOW" } else { "" }
                        );
                    }
                }
            }
        }

        ReportCommands::Loans { format } => {
            let report = service.loans_report().await?;

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    println!("customer,total,paid,outstanding");
                    for entry in &report.entries {
                        println!(
                            "{},{},{},{}",
                            entry.customer_name,
                            entry.total_cents,
                            entry.paid_cents,
                            entry.outstanding_cents
                        );
                    }
                }
                _ => {
                    println!(
                        "{:<20} {:>12} {:>12} {:>12}",
                        "CUSTOMER", "TOTAL", "PAID", "OUTSTANDING"
                    );
                    println!("{}", "-".repeat(60));
                    for entry in &report.entries {
                        println!(
                            "{:<20} {:>12} {:>12} {:>12}",
                            truncate(&entry.customer_name, 20),
                            format_cents(entry.total_cents),
                            format_cents(entry.paid_cents),
                            format_cents(entry.outstanding_cents)
                        );
                    }
                    println!("{}", "-".repeat(60));
                    println!(
                        "{:<20} {:>38}",
                        "TOTAL",
                        format_cents(report.total_outstanding_cents)
                    );
                }
            }
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &ShopService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "products" => {
            let count = exporter.export_products_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} products", count);
            }
        }
        "sales" => {
            let count = exporter.export_sales_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} sales", count);
            }
        }
        "loans" => {
            let count = exporter.export_loans_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} loans", count);
            }
        }
        "expenses" => {
            let count = exporter.export_expenses_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} expenses", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} products, {} customers, {} sales, {} expenses",
                    snapshot.products.len(),
                    snapshot.customers.len(),
                    snapshot.sales.len(),
                    snapshot.expenses.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: products, sales, loans, expenses, full",
                export_type
            );
        }
    }

    Ok(())
}

async fn run_import_command(
    service: &ShopService,
    import_type: &str,
    input: Option<&str>,
    dry_run: bool,
    skip_existing: bool,
    validate: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{stdin, Read};

    let importer = Importer::new(service);

    // Determine input reader
    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let options = ImportOptions {
        dry_run,
        skip_existing,
        validate_only: validate,
    };

    let result = match import_type {
        "products" => importer.import_products_csv(reader, options).await?,
        _ => {
            anyhow::bail!("Invalid import type '{}'. Valid types: products", import_type);
        }
    };

    // Display results
    if validate || dry_run {
        println!("Validation successful");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Skipped:  {}", result.skipped);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default()
                    + &error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

async fn print_purchase_items(
    service: &ShopService,
    items: &[crate::domain::PurchaseItem],
) -> Result<()> {
    if items.is_empty() {
        println!("No items recorded.");
        return Ok(());
    }

    println!("{:<20} {:>10} {:>10} {:>12}", "PRODUCT", "QTY", "PRICE", "LINE");
    println!("{}", "-".repeat(56));
    for item in items {
        let product = service.get_product_by_id(item.product_id).await?;
        println!(
            "{:<20} {:>10} {:>10} {:>12}",
            truncate(&product.name, 20),
            format_quantity(item.quantity),
            format_cents(item.unit_price_cents),
            format_cents(item.line_amount_cents())
        );
    }
    Ok(())
}

/// Parse repeated "product:quantity[:unit-price]" item specs.
fn parse_item_specs(specs: &[String]) -> Result<Vec<ItemInput>> {
    if specs.is_empty() {
        anyhow::bail!("No items given. Use --item \"product:quantity[:unit-price]\"");
    }

    specs.iter().map(|spec| parse_item_spec(spec)).collect()
}

fn parse_item_spec(spec: &str) -> Result<ItemInput> {
    let parts: Vec<&str> = spec.split(':').collect();
    match parts.len() {
        2 | 3 => {
            let product = parts[0].trim().to_string();
            if product.is_empty() {
                anyhow::bail!("Missing product name in item '{}'", spec);
            }

            let quantity = parse_quantity(parts[1])
                .with_context(|| format!("Invalid quantity in item '{}'", spec))?;

            let unit_price_cents = if parts.len() == 3 {
                Some(
                    parse_cents(parts[2])
                        .with_context(|| format!("Invalid unit price in item '{}'", spec))?,
                )
            } else {
                None
            };

            Ok(ItemInput {
                product,
                quantity,
                unit_price_cents,
            })
        }
        _ => anyhow::bail!(
            "Invalid item '{}'. Use \"product:quantity\" or \"product:quantity:unit-price\"",
            spec
        ),
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).context("Invalid ID format (expected UUID)")
}

fn parse_day_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(date_str) => NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", date_str)),
        None => Ok(Utc::now().date_naive()),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
