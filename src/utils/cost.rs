use regex::Regex;

use crate::models::RepairEstimate;

// Flat per-unit USD rates. First matching entry wins, so compound names like
// "cement mortar" resolve to the cement rate.
const MATERIAL_RATES: &[(&str, f64)] = &[
    ("cement", 12.0),
    ("bricks", 2.5),
    ("steel rods", 25.0),
    ("wood planks", 18.0),
    ("labor", 120.0),
    ("sand", 18.0),
    ("gravel", 14.0),
    ("paint", 60.0),
    ("plumbing", 350.0),
    ("electrical", 300.0),
    ("drywall", 40.0),
    ("flooring", 25.0),
    ("garage door", 1200.0),
];

const DEFAULT_RATE: f64 = 250.0;

pub fn estimate_cost(material: &str, quantity: &str) -> i64 {
    let needle = material.to_lowercase();
    let rate = MATERIAL_RATES
        .iter()
        .find(|(name, _)| needle.contains(name))
        .map(|(_, rate)| *rate)
        .unwrap_or(DEFAULT_RATE);

    let re = Regex::new(r"\d+(\.\d+)?").unwrap();
    let count = re
        .find(quantity)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(1.0);

    (rate * count).round() as i64
}

/// Sum of the per-entry heuristic costs, in stored order.
pub fn total_estimated_cost(estimates: &[RepairEstimate]) -> i64 {
    estimates
        .iter()
        .map(|e| estimate_cost(&e.material, &e.estimated_quantity))
        .sum()
}
