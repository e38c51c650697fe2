//! # Seed Data Generator
//!
//! Populates the database with products, customers and a few sales for
//! development.
//!
//! ## Usage
//! ```bash
//! # Defaults: 40 products, 12 customers, ./tally.db (or TALLY_DB_PATH)
//! cargo run -p tally-db --bin seed
//!
//! # Custom amounts
//! cargo run -p tally-db --bin seed -- --products 100 --customers 30
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//!
//! # More logging
//! RUST_LOG=debug cargo run -p tally-db --bin seed
//! ```
//!
//! Sales go through the stock ledger like any other caller, so seeded stock
//! already reflects them.

use std::env;

use tally_core::{NewCustomer, NewProduct, PaymentStatus, SaleDraft, SaleItemRequest};
use tally_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// Catalog names for test data, with a base price in cents.
const PRODUCTS: &[(&str, i64)] = &[
    ("Coffee 500g", 1890),
    ("Whole Milk 1L", 549),
    ("White Bread", 899),
    ("Rice 5kg", 2799),
    ("Black Beans 1kg", 899),
    ("Sugar 1kg", 469),
    ("Orange Juice 1L", 1099),
    ("Butter 200g", 1249),
    ("Eggs Dozen", 1399),
    ("Pasta Spaghetti", 599),
    ("Tomato Sauce", 349),
    ("Cheese Slices", 1599),
    ("Chocolate Bar", 749),
    ("Mineral Water 1.5L", 299),
    ("Cola 2L", 999),
    ("Dish Soap", 289),
    ("Toilet Paper 4x", 789),
    ("Toothpaste", 659),
    ("Shampoo", 1899),
    ("Laundry Powder", 2149),
];

const SIZES: &[(&str, i64)] = &[("", 0), (" (Family)", 450)];

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elisa", "Fabio", "Gabriela", "Heitor", "Iris", "Joao",
    "Karina", "Lucas",
];

const LAST_NAMES: &[&str] = &["Silva", "Souza", "Costa", "Lima", "Alves", "Rocha"];

const PAYMENT_METHODS: &[&str] = &["Cash", "Credit card", "Debit card", "Pix", "Other"];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut product_count: usize = 40;
    let mut customer_count: usize = 12;
    let mut config = DbConfig::from_env();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    product_count = args[i + 1].parse().unwrap_or(product_count);
                    i += 1;
                }
            }
            "--customers" | "-c" => {
                if i + 1 < args.len() {
                    customer_count = args[i + 1].parse().unwrap_or(customer_count);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --products <N>   Number of products to generate (default: 40)");
                println!("  -c, --customers <N>  Number of customers to generate (default: 12)");
                println!("  -d, --db <PATH>      Database file path (default: $TALLY_DB_PATH or ./tally.db)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Tally Seed Data Generator");
    println!("=========================");
    println!("Database:  {}", config.database_path.display());
    println!("Products:  {}", product_count);
    println!("Customers: {}", customer_count);
    println!();

    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    let mut product_ids = Vec::with_capacity(product_count);
    for seed in 0..product_count {
        let product = generate_product(seed);
        match db.products().insert(&product).await {
            Ok(inserted) => product_ids.push(inserted.id),
            Err(e) => eprintln!("Failed to insert {}: {}", product.name, e),
        }
    }
    println!("✓ Generated {} products", product_ids.len());

    let mut customer_ids = Vec::with_capacity(customer_count);
    for seed in 0..customer_count {
        let customer = generate_customer(seed);
        match db.customers().insert(&customer).await {
            Ok(inserted) => customer_ids.push(inserted.id),
            Err(e) => eprintln!("Failed to insert {}: {}", customer.name, e),
        }
    }
    println!("✓ Generated {} customers", customer_ids.len());

    let mut sales = 0;
    let mut rejected = 0;
    for (seed, &customer_id) in customer_ids.iter().enumerate() {
        let Some(draft) = generate_sale(seed, customer_id, &product_ids) else {
            continue;
        };
        match db.ledger().create_sale(&draft).await {
            Ok(_) => sales += 1,
            Err(e) if e.is_rejection() => rejected += 1,
            Err(e) => return Err(e.into()),
        }
    }
    println!("✓ Recorded {} sales ({} rejected for stock)", sales, rejected);

    println!();
    println!("✓ Seed complete in {:?}", start.elapsed());

    db.close().await;
    Ok(())
}

/// Generates a product with deterministic price and stock.
fn generate_product(seed: usize) -> NewProduct {
    let (name, base_price) = PRODUCTS[seed % PRODUCTS.len()];
    let (size, price_addon) = SIZES[(seed / PRODUCTS.len()) % SIZES.len()];
    let batch = seed / (PRODUCTS.len() * SIZES.len());

    let name = if batch == 0 {
        format!("{}{}", name, size)
    } else {
        format!("{}{} #{}", name, size, batch + 1)
    };

    NewProduct {
        name,
        image_ref: None,
        unit_price_cents: base_price + price_addon,
        // 0-60 units; every seventh product starts out of stock
        stock_quantity: if seed % 7 == 6 { 0 } else { ((seed * 13) % 60) as i64 + 1 },
        description: None,
    }
}

fn generate_customer(seed: usize) -> NewCustomer {
    let first = FIRST_NAMES[seed % FIRST_NAMES.len()];
    let last = LAST_NAMES[(seed / 2) % LAST_NAMES.len()];

    NewCustomer {
        name: format!("{} {}", first, last),
        phone: Some(format!("119{:08}", (seed * 7_919) % 100_000_000)),
        birth_date: chrono::NaiveDate::from_ymd_opt(1970 + (seed % 35) as i32, (seed % 12) as u32 + 1, 10),
        photo_ref: None,
    }
}

/// Picks up to three products for a customer's sale.
fn generate_sale(seed: usize, customer_id: i64, product_ids: &[i64]) -> Option<SaleDraft> {
    if product_ids.is_empty() {
        return None;
    }

    let lines = (seed % 3) + 1;
    let mut items: Vec<SaleItemRequest> = Vec::with_capacity(lines);
    for n in 0..lines {
        let product_id = product_ids[(seed * 5 + n * 3) % product_ids.len()];
        if items.iter().any(|item| item.product_id == product_id) {
            continue;
        }
        items.push(SaleItemRequest::new(product_id, (n as i64) + 1));
    }

    let status = if seed % 4 == 3 {
        PaymentStatus::Unpaid
    } else {
        PaymentStatus::Paid
    };
    let method = PAYMENT_METHODS[seed % PAYMENT_METHODS.len()];

    Some(SaleDraft::new(customer_id, items).paid_with(status, method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::validation::validate_new_customer;

    #[test]
    fn test_generated_customers_are_valid() {
        for seed in [0, 1, 11_364, 11_365, 250_000] {
            let customer = generate_customer(seed);
            assert_eq!(customer.phone.as_deref().map(str::len), Some(11));
            assert!(validate_new_customer(&customer).is_ok());
        }
    }
}
