//! Convergence
//!
//! Compares the deterministic angular stratification against unbiased random
//! sampling at increasing sample counts.

use crate::config::*;
use crate::integrand::*;
use pbrt_core::base::*;
use pbrt_core::geometry::*;
use pbrt_core::rng::*;
use pbrt_core::sh::*;
use lights::*;
use std::time::{Duration, Instant};

/// Sample counts used when none are given.
pub const DEFAULT_SAMPLE_COUNTS: [usize; 3] = [64, 4096, 30000];

/// Irradiance estimates at one sample count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConvergenceRecord {
    /// Number of samples.
    pub samples: usize,

    /// Angular stratification estimate.
    pub stratified: Float,

    /// Random sampling estimate.
    pub random: Float,

    /// Absolute difference of the two estimates.
    pub difference: Float,

    /// Time spent on both estimates.
    pub elapsed: Duration,
}

/// Estimates the diffuse irradiance from `light` at increasing sample counts.
/// Runs stop early once `time_budget` is used up. A warning is logged each
/// time the difference between the estimates grows.
///
/// * `light`         - The light.
/// * `shading`       - The shading point.
/// * `sample_counts` - Sample counts in increasing order.
/// * `time_budget`   - Optional wall clock budget for the whole run.
/// * `seed`          - Random number generator seed.
/// * `progress`      - Called after every record.
pub fn run<F>(
    light: &QuadLight,
    shading: &ShadingPoint,
    sample_counts: &[usize],
    time_budget: Option<Duration>,
    seed: u64,
    mut progress: F,
) -> Vec<ConvergenceRecord>
where
    F: FnMut(&ConvergenceRecord),
{
    let integrand = Integrand::new(shading, light.radiance, Brdf::DIFFUSE, 0.0);
    let f = |d: &Vector3f| integrand.evaluate(d);
    let basis = RealSphericalHarmonics::new();
    let rectangle = light.rectangle();
    let p = &shading.position;
    let mut rng = RNG::new(seed);
    let mut scratch = [0.0; 1];

    let start = Instant::now();
    let mut records: Vec<ConvergenceRecord> = Vec::with_capacity(sample_counts.len());
    for &samples in sample_counts.iter() {
        if let Some(budget) = time_budget {
            if start.elapsed() >= budget {
                info!("Time budget of {:?} used up before {} samples", budget, samples);
                break;
            }
        }

        let t0 = Instant::now();
        let stratified = rectangle.integrate_angular(p, samples, f, &basis, 1, &mut scratch);
        let random = rectangle.integrate_random(p, samples, &mut rng, f, &basis, 1, &mut scratch);
        let record = ConvergenceRecord {
            samples,
            stratified,
            random,
            difference: abs(stratified - random),
            elapsed: t0.elapsed(),
        };
        info!(
            "{:>6} samples: stratified {:.6}, random {:.6}, difference {:.3e}",
            samples, stratified, random, record.difference
        );

        if let Some(previous) = records.last() {
            if record.difference > previous.difference {
                warn!(
                    "Difference grew from {:.3e} at {} samples to {:.3e} at {} samples",
                    previous.difference, previous.samples, record.difference, samples
                );
            }
        }
        progress(&record);
        records.push(record);
    }
    records
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> QuadLight {
        QuadLight::new(
            Point3f::new(0.2, 0.1, 1.0),
            Vector3f::new(0.0, 0.5, 0.0),
            Vector3f::new(0.5, 0.0, 0.0),
            1.0,
            false,
        )
        .unwrap()
    }

    #[test]
    fn zero_budget_runs_nothing() {
        let s = ShadingPoint::new(Point3f::ORIGIN, Vector3f::Z_AXIS, &Point3f::new(0.0, 0.0, 2.0));
        let records = run(&light(), &s, &DEFAULT_SAMPLE_COUNTS, Some(Duration::ZERO), 0, |_| {});
        assert!(records.is_empty());
    }

    #[test]
    fn reports_every_count() {
        let s = ShadingPoint::new(Point3f::ORIGIN, Vector3f::Z_AXIS, &Point3f::new(0.0, 0.0, 2.0));
        let mut seen = Vec::new();
        let records = run(&light(), &s, &[16, 256], None, 3, |r| seen.push(r.samples));
        assert_eq!(seen, vec![16, 256]);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.stratified > 0.0 && r.random > 0.0));
    }
}
