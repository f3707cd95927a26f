use {
    crate::error::Result,
    rand::Rng,
};

/// Epsilon-greedy action selection over a finite set of actions.
///
/// With probability `epsilon` a uniformly random action index is returned,
/// otherwise the greedy choice of the policy. After every learning step
/// [`EpsilonGreedy::decay`] shrinks epsilon by `decay` down to `epsilon_min`;
/// a `decay` of `1.0` keeps epsilon fixed.
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    epsilon: f64,
    epsilon_min: f64,
    decay: f64,
}
impl EpsilonGreedy {
    pub fn new(
        epsilon: f64,
        epsilon_min: f64,
        decay: f64,
    ) -> Self {
        Self {
            epsilon: epsilon.max(0.0).min(1.0),
            epsilon_min: epsilon_min.max(0.0).min(1.0),
            decay,
        }
    }

    /// A selector that always explores with the same probability.
    pub fn fixed(epsilon: f64) -> Self {
        Self::new(epsilon, epsilon, 1.0)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Pick an action in `0..n_actions`.
    ///
    /// `greedy` is only evaluated when the selector decides to exploit.
    pub fn select<R, F>(
        &self,
        n_actions: usize,
        rng: &mut R,
        greedy: F,
    ) -> Result<usize>
    where
        R: Rng + ?Sized,
        F: FnOnce() -> Result<usize>,
    {
        if rng.gen_bool(self.epsilon) {
            Ok(rng.gen_range(0..n_actions))
        } else {
            greedy()
        }
    }

    /// Epsilon stays within `[epsilon_min, 1]` whatever `decay` is configured.
    pub fn decay(&mut self) {
        if self.epsilon > self.epsilon_min {
            self.epsilon = (self.epsilon * self.decay).max(self.epsilon_min).min(1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        rand::{
            rngs::StdRng,
            SeedableRng,
        },
    };

    #[test]
    fn zero_epsilon_always_exploits() {
        let selector = EpsilonGreedy::fixed(0.0);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(selector.select(4, &mut rng, || Ok(2)).unwrap(), 2);
        }
    }

    #[test]
    fn full_epsilon_never_asks_the_policy() {
        let selector = EpsilonGreedy::fixed(1.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let action = selector
                .select(3, &mut rng, || panic!("greedy choice evaluated"))
                .unwrap();
            seen[action] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn decay_stops_at_the_floor() {
        let mut selector = EpsilonGreedy::new(1.0, 0.1, 0.5);
        selector.decay();
        assert_eq!(selector.epsilon(), 0.5);
        for _ in 0..10 {
            selector.decay();
        }
        assert_eq!(selector.epsilon(), 0.1);
    }

    #[test]
    fn growing_or_broken_decay_stays_a_probability() {
        let mut rng = StdRng::seed_from_u64(1);
        for decay in [1.5, -2.0, f64::NAN, f64::INFINITY] {
            let mut selector = EpsilonGreedy::new(0.5, 0.1, decay);
            for _ in 0..5 {
                selector.decay();
                assert!((0.1..=1.0).contains(&selector.epsilon()), "decay {decay}");
                assert!(selector.select(3, &mut rng, || Ok(0)).unwrap() < 3);
            }
        }
    }

    #[test]
    fn unit_decay_keeps_epsilon_fixed() {
        let mut selector = EpsilonGreedy::new(0.3, 0.01, 1.0);
        selector.decay();
        assert_eq!(selector.epsilon(), 0.3);
    }
}
