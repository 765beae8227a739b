//! # Demo Catalog Seeder
//!
//! Fills an empty database with a small Indonesian grocery catalog so the
//! API has something to sell during development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kasir.db
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! Staff accounts are not seeded; the API creates the first admin from
//! `KASIR_BOOTSTRAP_ADMIN_USERNAME` / `KASIR_BOOTSTRAP_ADMIN_PASSWORD`.

use std::env;

use anyhow::Context;
use kasir_core::{Money, NewCategory, NewProduct};
use kasir_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (category, description, [(sku, name, price in rupiah, stock)])
type SeedCategory = (&'static str, &'static str, &'static [(&'static str, &'static str, i64, i64)]);

const CATALOG: &[SeedCategory] = &[
    (
        "Minuman",
        "Minuman kemasan dan seduh",
        &[
            ("MNM-TEH-001", "Teh Botol 350ml", 5_000, 48),
            ("MNM-AIR-001", "Air Mineral 600ml", 3_500, 96),
            ("MNM-KOP-001", "Kopi Susu Gula Aren", 18_000, 20),
            ("MNM-JUS-001", "Jus Jeruk 250ml", 8_500, 24),
        ],
    ),
    (
        "Makanan Ringan",
        "Keripik, biskuit dan cokelat",
        &[
            ("SNK-KRP-001", "Keripik Singkong Balado", 12_000, 30),
            ("SNK-BSK-001", "Biskuit Kelapa", 9_500, 36),
            ("SNK-CKL-001", "Cokelat Batang 60g", 14_000, 18),
        ],
    ),
    (
        "Sembako",
        "Kebutuhan pokok",
        &[
            ("SBK-BRS-005", "Beras Premium 5kg", 78_000, 12),
            ("SBK-MNY-001", "Minyak Goreng 1L", 19_500, 40),
            ("SBK-GLA-001", "Gula Pasir 1kg", 17_000, 35),
            ("SBK-TLR-010", "Telur Ayam 10 butir", 28_000, 15),
        ],
    ),
    (
        "Kebersihan",
        "Sabun dan perlengkapan rumah tangga",
        &[
            ("KBR-SBN-001", "Sabun Mandi Batang", 4_500, 60),
            ("KBR-DTR-001", "Deterjen Bubuk 800g", 23_000, 22),
        ],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = env::var("KASIR_DATABASE_PATH").unwrap_or_else(|_| String::from("./kasir.db"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Demo Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;
    info!(path = %db_path, "Connected, migrations applied");

    if !db.categories().list().await?.is_empty() {
        warn!("Catalog already has categories, skipping seed");
        return Ok(());
    }

    let mut products = 0usize;
    for (name, description, items) in CATALOG {
        let category = db
            .categories()
            .insert(&NewCategory {
                name: (*name).to_string(),
                description: Some((*description).to_string()),
            })
            .await
            .with_context(|| format!("inserting category {name}"))?;

        for (sku, product_name, rupiah, stock) in items.iter() {
            let product = NewProduct {
                category_id: category.id,
                sku: (*sku).to_string(),
                name: (*product_name).to_string(),
                price: Money::from_major(*rupiah),
                stock: *stock,
                description: None,
            };

            if let Err(e) = db.products().insert(&product).await {
                warn!(sku = %product.sku, error = %e, "Failed to insert product");
                continue;
            }
            products += 1;
        }
    }

    info!(categories = CATALOG.len(), products, "Seed complete");
    db.close().await;
    Ok(())
}
