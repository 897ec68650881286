//! Unit conversions.

use crate::config::MICROALGOS_PER_ALGO;

/// Microalgos to Algos, for display only. Amounts on the wire are always
/// integer microalgos.
pub fn microalgos_to_algos(microalgos: u64) -> f64 {
    microalgos as f64 / MICROALGOS_PER_ALGO as f64
}

/// Algos to microalgos, rounded to the nearest unit. Negative and NaN
/// inputs give zero; overly large ones saturate.
pub fn algos_to_microalgos(algos: f64) -> u64 {
    (algos * MICROALGOS_PER_ALGO as f64).round() as u64
}
