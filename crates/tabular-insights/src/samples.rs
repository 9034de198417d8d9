//! Seeded sample datasets for demos and tests.
//!
//! The same seed always produces the same dataset.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

use crate::dataset::{Dataset, Record};

/// Additive offsets of the four seasons in [`seasonal_series`].
const SEASON_OFFSETS: [f64; 4] = [12.0, -6.0, 18.0, -24.0];

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `{period, sales}` records: upward trend, a four-period season and
/// uniform noise.
pub fn seasonal_series(periods: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);

    let records = (0..periods)
        .map(|i| {
            let trend = 200.0 + 4.5 * i as f64;
            let noise: f64 = rng.gen_range(-6.0..6.0);
            let sales = trend + SEASON_OFFSETS[i % SEASON_OFFSETS.len()] + noise;
            record(json!({
                "period": format!("Q{} {}", i % 4 + 1, 2020 + i / 4),
                "sales": round2(sales),
            }))
        })
        .collect();

    Dataset::from_records(records)
}

/// A small sales table mixing numeric, categorical, boolean and sparse
/// columns.
///
/// `revenue` is derived from `units` and `price`, so the two correlate.
/// About one row in twenty has an inflated `units` value, about a third of
/// `discount` cells are empty, and some prices are currency-formatted
/// strings.
pub fn mixed_table(rows: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);

    let records = (0..rows)
        .map(|i| {
            let region = REGIONS[rng.gen_range(0..REGIONS.len())];
            let mut units: i64 = rng.gen_range(5..60);
            if rng.gen_bool(0.05) {
                units *= 12;
            }
            let price = round2(rng.gen_range(8.0..40.0));
            let revenue = round2(units as f64 * price * rng.gen_range(0.95..1.05));

            let price_cell = if rng.gen_bool(0.15) {
                json!(format!("${:.2}", price))
            } else {
                json!(price)
            };
            let discount = if rng.gen_bool(0.35) {
                Value::Null
            } else {
                json!(round2(rng.gen_range(0.0..0.3)))
            };

            record(json!({
                "order_id": i + 1,
                "region": region,
                "units": units,
                "price": price_cell,
                "revenue": revenue,
                "discount": discount,
                "returning": rng.gen_bool(0.4),
            }))
        })
        .collect();

    Dataset::from_records(records)
}
