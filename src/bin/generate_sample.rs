use chrono::{Duration, NaiveDate};

use sales_insights::data::model::SalesRecord;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let regions = ["East", "North", "South", "West"];
    // Per-region volume multiplier so the region chart has a clear ordering.
    let region_scale = [1.2, 0.8, 0.9, 1.0];
    // Product name and typical unit price.
    let products = [
        ("Widget", 120.0),
        ("Gadget", 250.0),
        ("Gizmo", 80.0),
        ("Doohickey", 40.0),
    ];

    // Transactions across the first half of 2024.
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date");
    let span_days = 182;
    let rows = 500;

    let output_path = "sales_data.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    for _ in 0..rows {
        let date = start + Duration::days(rng.next_index(span_days) as i64);
        let region_idx = rng.next_index(regions.len());
        let (product, unit_price) = products[rng.next_index(products.len())];

        let quantity = 1.0 + rng.next_index(9) as f64;
        let amount = (unit_price * quantity * region_scale[region_idx]
            + rng.gauss(0.0, unit_price * 0.1))
        .max(0.0);

        let record = SalesRecord {
            date,
            region: regions[region_idx].to_string(),
            product: product.to_string(),
            sales: (amount * 100.0).round() / 100.0,
        };
        writer.serialize(&record).expect("Failed to write record");
    }

    writer.flush().expect("Failed to flush output file");
    println!("Wrote {rows} transactions to {output_path}");
}
