//! Synthetic demo observations.
//!
//! Points lie on `y = DEMO_SLOPE·x + DEMO_INTERCEPT` at `x = 1..=count` with
//! Gaussian noise. The default count of 9 matches the sample size the fixed
//! t value of 2.31 is calibrated for.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::Observations;
use crate::error::AppError;

pub const DEMO_SLOPE: f64 = 0.8;
pub const DEMO_INTERCEPT: f64 = 2.0;
pub const DEMO_NOISE_SD: f64 = 0.6;
pub const DEMO_COUNT: usize = 9;

/// Generate a reproducible noisy linear sample.
pub fn generate_sample(seed: u64, count: usize) -> Result<Observations, AppError> {
    if count == 0 {
        return Err(AppError::input("Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, DEMO_NOISE_SD)
        .map_err(|e| AppError::internal(format!("Noise distribution error: {e}")))?;

    let mut x = Vec::with_capacity(count);
    let mut y = Vec::with_capacity(count);
    for i in 1..=count {
        let xi = i as f64;
        x.push(xi);
        y.push(DEMO_SLOPE * xi + DEMO_INTERCEPT + normal.sample(&mut rng));
    }

    log::debug!("generated demo sample: seed={seed} n={count}");
    Observations::new(x, y)
}
