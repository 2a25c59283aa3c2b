//! # Seed Data Generator
//!
//! Populates the database with test medicines for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 medicines (default) into ./medipos.db
//! cargo run -p medipos-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p medipos-db --bin seed -- --count 2000
//!
//! # Specify database path
//! cargo run -p medipos-db --bin seed -- --db ./data/medipos.db
//! ```
//!
//! Each medicine gets a unique `{GROUP}-{INDEX}` identifier, a realistic
//! name, a buy/sell price pair in cents and a random-ish stock level.

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use medipos_core::Medicine;
use medipos_db::{Database, DbConfig};

/// Therapeutic groups for realistic test data.
const GROUPS: &[(&str, &[&str])] = &[
    (
        "ANLG",
        &[
            "Paracetamol 500mg",
            "Paracetamol 650mg",
            "Ibuprofen 200mg",
            "Ibuprofen 400mg",
            "Aspirin 300mg",
            "Diclofenac 50mg",
            "Naproxen 250mg",
        ],
    ),
    (
        "ANTB",
        &[
            "Amoxicillin 250mg",
            "Amoxicillin 500mg",
            "Azithromycin 250mg",
            "Ciprofloxacin 500mg",
            "Cefixime 400mg",
            "Doxycycline 100mg",
        ],
    ),
    (
        "GAST",
        &[
            "Omeprazole 20mg",
            "Esomeprazole 40mg",
            "Ranitidine 150mg",
            "Domperidone 10mg",
            "ORS Sachet",
        ],
    ),
    (
        "RESP",
        &[
            "Salbutamol Inhaler",
            "Cetirizine 10mg",
            "Loratadine 10mg",
            "Montelukast 10mg",
            "Cough Syrup 120ml",
        ],
    ),
    (
        "CARD",
        &[
            "Amlodipine 5mg",
            "Atenolol 50mg",
            "Losartan 50mg",
            "Atorvastatin 20mg",
            "Metformin 500mg",
        ],
    ),
];

struct Args {
    count: usize,
    db_path: String,
}

fn parse_args() -> Args {
    let mut args = Args {
        count: 500,
        db_path: "./medipos.db".to_string(),
    };

    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--count" => {
                if let Some(v) = iter.next() {
                    args.count = v.parse().unwrap_or(args.count);
                }
            }
            "--db" => {
                if let Some(v) = iter.next() {
                    args.db_path = v;
                }
            }
            _ => {}
        }
    }

    args
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = parse_args();

    info!(path = %args.db_path, count = args.count, "Seeding database");

    let db = Database::new(DbConfig::new(&args.db_path))
        .await
        .expect("failed to open database");

    let now = Utc::now();
    let mut inserted = 0usize;

    // Bounded so a re-run against a fully seeded database terminates
    'outer: for i in 0..args.count {
        for (group, names) in GROUPS {
            if inserted >= args.count {
                break 'outer;
            }

            let name = names[i % names.len()];
            // Cheap deterministic-ish variation without pulling in a RNG
            let spread = ((i * 7 + inserted * 13) % 90) as i64;
            let buy = 25 + spread;
            let medicine = Medicine {
                id: Uuid::new_v4().to_string(),
                medicine_id: format!("{group}-{:04}", i + 1),
                name: format!("{name} ({})", i / names.len() + 1),
                group_name: Some(group.to_string()),
                supplier: Some("HealthPlus Distributors".to_string()),
                stock: (spread % 60) + 5,
                buy_price_cents: Some(buy),
                sell_price_cents: buy * 2,
                created_at: now,
                updated_at: now,
            };

            if let Err(err) = db.medicines().insert(&medicine).await {
                // Re-running seed against an existing database hits the
                // unique medicine_id; skip and continue
                tracing::debug!(medicine_id = %medicine.medicine_id, %err, "Skipping");
                continue;
            }
            inserted += 1;
        }
    }

    let total = db.medicines().count().await.expect("count failed");
    info!(inserted, total, "Seed complete");
}
