use {
    crate::error::{
        Error,
        Result,
    },
    rand::{
        rngs::StdRng,
        Rng,
        SeedableRng,
    },
    rand_distr::StandardNormal,
};

/// Temporally correlated exploration noise from a discretised
/// Ornstein-Uhlenbeck process.
///
/// Each call to [`OuNoise::sample`] advances the process by one step of size
/// `dt`:
///
/// $$
/// x_{t+1} = x_t + \theta (\mu - x_t) \Delta t + \sigma \sqrt{\Delta t} \, z, \quad z \sim \mathcal{N}(0, I)
/// $$
///
/// # Fields
///
/// * `theta` - The rate of mean reversion.
/// * `mean` - The asymptotic mean, one entry per action dimension.
/// * `std_dev` - The scale of the stochastic term.
/// * `dt` - The discretisation step.
/// * `x_initial` - The value `x_prev` is reset to, zero when not configured.
/// * `x_prev` - The previous sample.
#[derive(Clone, Debug)]
pub struct OuNoise {
    theta: f64,
    mean: Vec<f64>,
    std_dev: f64,
    dt: f64,
    x_initial: Option<Vec<f64>>,
    x_prev: Vec<f64>,
    rng: StdRng,
}
impl OuNoise {
    pub fn new(
        theta: f64,
        mean: Vec<f64>,
        std_dev: f64,
        dt: f64,
        x_initial: Option<Vec<f64>>,
        seed: u64,
    ) -> Result<Self> {
        if let Some(x) = &x_initial {
            if x.len() != mean.len() {
                return Err(Error::DimensionMismatch {
                    what: "initial noise value",
                    expected: mean.len(),
                    got: x.len(),
                });
            }
        }
        let mut noise = Self {
            theta,
            x_prev: vec![0.0; mean.len()],
            mean,
            std_dev,
            dt,
            x_initial,
            rng: StdRng::seed_from_u64(seed),
        };
        noise.reset();
        Ok(noise)
    }

    /// Advance the process one step and return the new noise vector.
    pub fn sample(&mut self) -> Vec<f64> {
        let (theta, dt) = (self.theta, self.dt);
        let scale = self.std_dev * dt.sqrt();
        let rng = &mut self.rng;
        let x_next: Vec<f64> = self
            .x_prev
            .iter()
            .zip(&self.mean)
            .map(|(&x, &mu)| {
                let z: f64 = rng.sample(StandardNormal);
                x + theta * (mu - x) * dt + scale * z
            })
            .collect();
        self.x_prev = x_next.clone();
        x_next
    }

    /// Restart the process at the configured initial value, or at zero.
    ///
    /// Call this at the start of every episode.
    pub fn reset(&mut self) {
        self.x_prev = match &self.x_initial {
            Some(x) => x.clone(),
            None => vec![0.0; self.mean.len()],
        };
    }

    pub fn state(&self) -> &[f64] {
        &self.x_prev
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        approx::assert_abs_diff_eq,
    };

    #[test]
    fn reset_restores_zero_or_configured_value() {
        let mut noise = OuNoise::new(0.15, vec![0.0; 2], 0.2, 0.01, None, 3).unwrap();
        noise.sample();
        assert_ne!(noise.state(), &[0.0, 0.0]);
        noise.reset();
        assert_eq!(noise.state(), &[0.0, 0.0]);

        let mut noise = OuNoise::new(0.15, vec![0.0; 2], 0.2, 0.01, Some(vec![0.5, -0.5]), 3).unwrap();
        assert_eq!(noise.state(), &[0.5, -0.5]);
        noise.sample();
        noise.reset();
        assert_eq!(noise.state(), &[0.5, -0.5]);
    }

    #[test]
    fn initial_value_must_match_the_mean() {
        assert!(matches!(
            OuNoise::new(0.15, vec![0.0; 2], 0.2, 0.01, Some(vec![0.0]), 3),
            Err(Error::DimensionMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn same_seed_gives_the_same_sequence() {
        let run = || {
            let mut noise = OuNoise::new(0.15, vec![0.0, 1.0], 0.2, 0.01, None, 1234).unwrap();
            noise.reset();
            (0..50).map(|_| noise.sample()).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn sample_updates_the_previous_value() {
        let mut noise = OuNoise::new(0.15, vec![0.0], 0.2, 0.01, None, 9).unwrap();
        let x = noise.sample();
        assert_eq!(noise.state(), x.as_slice());
    }

    #[test]
    fn without_noise_the_process_reverts_to_the_mean() {
        let mut noise = OuNoise::new(0.5, vec![1.0], 0.0, 0.1, Some(vec![0.0]), 0).unwrap();
        let x = noise.sample();
        assert_abs_diff_eq!(x[0], 0.05, epsilon = 1e-12);
        for _ in 0..2_000 {
            noise.sample();
        }
        assert_abs_diff_eq!(noise.state()[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn first_sample_has_zero_mean_and_scaled_variance() {
        let (std_dev, dt) = (0.2, 0.01);
        let mut noise = OuNoise::new(0.15, vec![0.0], std_dev, dt, None, 2024).unwrap();
        let n = 20_000;
        let samples: Vec<f64> = (0..n)
            .map(|_| {
                noise.reset();
                noise.sample()[0]
            })
            .collect();

        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        let expected = std_dev * std_dev * dt;

        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(variance, expected, epsilon = 0.05 * expected);
    }
}
