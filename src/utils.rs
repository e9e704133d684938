//! Sampling helpers shared by the agents

use rand::{Rng, SeedableRng, distr::StandardUniform, rngs::StdRng, seq::IndexedRandom};

/// Seeded generator when a seed is given, otherwise one seeded from the thread RNG
pub fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Sample an item with probability proportional to its weight.
///
/// Falls back to uniform sampling when the total weight is not a positive
/// finite number.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use noughts::utils::weighted_sample;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0)];
/// let sampled = weighted_sample(&mut rng, &items);
/// assert!(sampled.is_some());
/// ```
pub fn weighted_sample<R, T>(rng: &mut R, items: &[(T, f64)]) -> Option<T>
where
    R: Rng,
    T: Clone,
{
    if items.is_empty() {
        return None;
    }

    let total: f64 = items.iter().map(|(_, w)| *w).sum();
    if !(total.is_finite() && total > 0.0) {
        return items.choose(rng).map(|(item, _)| item.clone());
    }

    let mut threshold = rng.sample::<f64, _>(StandardUniform) * total;
    for (item, weight) in items {
        if threshold < *weight {
            return Some(item.clone());
        }
        threshold -= weight;
    }

    // Rounding can leave a sliver of threshold past the last item
    items.last().map(|(item, _)| item.clone())
}

/// Turn scores into sampling weights `exp((s - max) * scale)`.
///
/// The best score always maps to exactly 1.0, so the weights sum to at
/// least one and never overflow, whatever the magnitude of the scores.
pub fn exponential_weights(scores: &[f64], scale: f64) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    scores
        .iter()
        .map(|&score| ((score - max) * scale).exp())
        .collect()
}
