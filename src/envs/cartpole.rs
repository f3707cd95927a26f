use {
    super::{
        Environment,
        Step,
        VectorConvertible,
    },
    anyhow::Result,
    rand::{
        rngs::StdRng,
        Rng,
        SeedableRng,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    std::{
        f64::consts::PI,
        ops::RangeInclusive,
    },
};

// Constants for the cart-pole physics
const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
const HALF_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * HALF_LENGTH;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.02;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartPoleConfig {
    // Failure thresholds
    pub x_threshold: f64,
    pub theta_threshold_degrees: f64,
    pub timelimit: usize,
}
impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            x_threshold: 2.4,
            theta_threshold_degrees: 12.0,
            timelimit: 500,
        }
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartPoleAction {
    Left,
    Right,
}
impl From<usize> for CartPoleAction {
    fn from(value: usize) -> Self {
        match value {
            0 => CartPoleAction::Left,
            _ => CartPoleAction::Right,
        }
    }
}


#[derive(Clone, Debug, PartialEq)]
pub struct CartPoleObservation {
    x: f64,
    x_dot: f64,
    theta: f64,
    theta_dot: f64,
}
impl VectorConvertible for CartPoleObservation {
    fn from_vec(value: Vec<f64>) -> Self {
        Self {
            x: value[0],
            x_dot: value[1],
            theta: value[2],
            theta_dot: value[3],
        }
    }
    fn to_vec(value: Self) -> Vec<f64> {
        vec![value.x, value.x_dot, value.theta, value.theta_dot]
    }
}


/// A pole balanced on a cart that is pushed left or right.
///
/// Every step yields a reward of one. The episode terminates when the pole
/// leans too far or the cart leaves the track, and is truncated after
/// `timelimit` steps.
pub struct CartPole {
    state: CartPoleObservation,
    steps: usize,
    rng: StdRng,
    config: CartPoleConfig,
}

impl CartPole {
    fn failed(&self) -> bool {
        let theta_threshold = self.config.theta_threshold_degrees * 2.0 * PI / 360.0;
        self.state.x.abs() > self.config.x_threshold || self.state.theta.abs() > theta_threshold
    }
}

impl Environment for CartPole {
    type Config = CartPoleConfig;
    type Action = CartPoleAction;
    type Observation = CartPoleObservation;

    fn new(config: Self::Config) -> Result<Box<Self>> {
        let mut env = Self {
            state: CartPoleObservation::from_vec(vec![0.0; 4]),
            steps: 0,
            rng: StdRng::seed_from_u64(0),
            config,
        };
        env.reset(0)?;
        Ok(Box::new(env))
    }

    fn reset(
        &mut self,
        seed: u64,
    ) -> Result<Self::Observation> {
        self.rng = StdRng::seed_from_u64(seed);
        let rng = &mut self.rng;
        self.state = CartPoleObservation::from_vec(
            (0..4).map(|_| rng.gen_range(-0.05..=0.05)).collect(),
        );
        self.steps = 0;
        Ok(self.state.clone())
    }

    fn step(
        &mut self,
        action: Self::Action,
    ) -> Result<Step<Self::Observation, Self::Action>> {
        let force = match action {
            CartPoleAction::Left => -FORCE_MAG,
            CartPoleAction::Right => FORCE_MAG,
        };
        let CartPoleObservation { x, x_dot, theta, theta_dot } = self.state;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot.powi(2) * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (HALF_LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta.powi(2) / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        // Euler integration
        self.state = CartPoleObservation {
            x: x + TAU * x_dot,
            x_dot: x_dot + TAU * x_acc,
            theta: theta + TAU * theta_dot,
            theta_dot: theta_dot + TAU * theta_acc,
        };
        self.steps += 1;

        let terminated = self.failed();
        Ok(Step {
            observation: self.state.clone(),
            action,
            reward: 1.0,
            terminated,
            truncated: !terminated && self.steps >= self.config.timelimit,
        })
    }

    fn action_space(&self) -> Vec<usize> {
        vec![2]
    }

    fn action_domain(&self) -> Vec<RangeInclusive<f64>> {
        vec![0.0..=1.0]
    }

    fn observation_space(&self) -> Vec<usize> {
        vec![4]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_starts_near_upright() {
        let mut env = *CartPole::new(CartPoleConfig::default()).unwrap();
        let obs = CartPoleObservation::to_vec(env.reset(3).unwrap());
        assert_eq!(obs.len(), 4);
        assert!(obs.iter().all(|v| v.abs() <= 0.05));
    }

    #[test]
    fn pushing_one_way_topples_the_pole() {
        let mut env = *CartPole::new(CartPoleConfig::default()).unwrap();
        env.reset(0).unwrap();
        let mut steps = 0;
        loop {
            let step = env.step(CartPoleAction::Right).unwrap();
            steps += 1;
            assert_eq!(step.reward, 1.0);
            if step.terminated || step.truncated {
                assert!(step.terminated);
                break;
            }
        }
        assert!(steps < 100);
    }

    #[test]
    fn truncates_at_the_timelimit() {
        let config = CartPoleConfig {
            timelimit: 3,
            ..Default::default()
        };
        let mut env = *CartPole::new(config).unwrap();
        env.reset(1).unwrap();
        assert!(!env.step(CartPoleAction::Left).unwrap().truncated);
        assert!(!env.step(CartPoleAction::Right).unwrap().truncated);
        assert!(env.step(CartPoleAction::Left).unwrap().truncated);
    }

    #[test]
    fn indices_map_to_actions() {
        assert_eq!(CartPoleAction::from(0), CartPoleAction::Left);
        assert_eq!(CartPoleAction::from(1), CartPoleAction::Right);
    }
}
