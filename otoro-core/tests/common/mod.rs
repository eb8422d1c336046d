//! Shared synthetic dataset generators for integration tests.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Samples `count` points from an isotropic 2-D Gaussian around `center`.
pub fn gaussian_blob(center: (f32, f32), std_dev: f32, count: usize, rng: &mut SmallRng) -> Vec<Vec<f32>> {
    (0..count)
        .map(|_| {
            let (dx, dy) = standard_normal_pair(rng);
            vec![center.0 + dx * std_dev, center.1 + dy * std_dev]
        })
        .collect()
}

/// Box-Muller transform: two independent standard normal samples.
fn standard_normal_pair(rng: &mut SmallRng) -> (f32, f32) {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen_range(0.0..1.0);
    let radius = (-2.0 * u1.ln()).sqrt();
    let angle = 2.0 * std::f32::consts::PI * u2;
    (radius * angle.cos(), radius * angle.sin())
}

/// `count` equally spaced points on a line in 1-D.
pub fn collinear(count: usize, spacing: f32) -> Vec<Vec<f32>> {
    (0..count).map(|index| vec![index as f32 * spacing]).collect()
}

/// Deterministic generator so test datasets are reproducible.
pub fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
