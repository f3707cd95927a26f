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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PendulumConfig {
    pub max_speed: f64,
    pub max_torque: f64,
    pub dt: f64,
    pub gravity: f64,
    pub mass: f64,
    pub length: f64,
    pub timelimit: usize,
}
impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            max_speed: 8.0,
            max_torque: 2.0,
            dt: 0.05,
            gravity: 10.0,
            mass: 1.0,
            length: 1.0,
            timelimit: 200,
        }
    }
}


#[derive(Clone, Debug)]
pub struct PendulumAction {
    // Torque applied to the free end of the pendulum
    torque: f64,
}
impl PendulumAction {
    pub fn new(torque: f64) -> Self {
        Self { torque }
    }

    pub fn torque(&self) -> f64 {
        self.torque
    }
}
impl From<Vec<f64>> for PendulumAction {
    fn from(value: Vec<f64>) -> Self {
        Self::from_vec(value)
    }
}
impl VectorConvertible for PendulumAction {
    fn from_vec(value: Vec<f64>) -> Self {
        Self {
            torque: value[0],
        }
    }
    fn to_vec(value: Self) -> Vec<f64> {
        vec![value.torque]
    }
}


#[derive(Clone, Debug, PartialEq)]
pub struct PendulumObservation {
    // The (x, y) coordinates of the free end of the pendulum
    x: f64,
    y: f64,
    // The angular velocity of the pendulum
    theta_dot: f64,
}
impl VectorConvertible for PendulumObservation {
    fn from_vec(value: Vec<f64>) -> Self {
        Self {
            x: value[0],
            y: value[1],
            theta_dot: value[2],
        }
    }
    fn to_vec(value: Self) -> Vec<f64> {
        vec![value.x, value.y, value.theta_dot]
    }
}


fn angle_normalize(x: f64) -> f64 {
    (x + PI).rem_euclid(2.0 * PI) - PI
}

/// The classic inverted pendulum swing-up task.
///
/// The pendulum starts at a random angle and the agent applies a bounded
/// torque to swing it upright and keep it there. The task never terminates,
/// episodes end by truncation after `timelimit` steps.
pub struct Pendulum {
    theta: f64,
    theta_dot: f64,
    steps: usize,
    rng: StdRng,
    config: PendulumConfig,
}

impl Pendulum {
    fn observation(&self) -> PendulumObservation {
        PendulumObservation {
            x: self.theta.cos(),
            y: self.theta.sin(),
            theta_dot: self.theta_dot,
        }
    }
}

impl Environment for Pendulum {
    type Config = PendulumConfig;
    type Action = PendulumAction;
    type Observation = PendulumObservation;

    fn new(config: Self::Config) -> Result<Box<Self>> {
        let mut env = Self {
            theta: 0.0,
            theta_dot: 0.0,
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
        self.theta = self.rng.gen_range(-PI..=PI);
        self.theta_dot = self.rng.gen_range(-1.0..=1.0);
        self.steps = 0;
        Ok(self.observation())
    }

    fn step(
        &mut self,
        action: Self::Action,
    ) -> Result<Step<Self::Observation, Self::Action>> {
        let PendulumConfig {
            max_speed,
            max_torque,
            dt,
            gravity,
            mass,
            length,
            timelimit,
        } = self.config;

        let u = action.torque.clamp(-max_torque, max_torque);
        let cost = angle_normalize(self.theta).powi(2)
            + 0.1 * self.theta_dot.powi(2)
            + 0.001 * u.powi(2);

        let acceleration = 3.0 * gravity / (2.0 * length) * self.theta.sin()
            + 3.0 / (mass * length.powi(2)) * u;
        self.theta_dot = (self.theta_dot + acceleration * dt).clamp(-max_speed, max_speed);
        self.theta += self.theta_dot * dt;
        self.steps += 1;

        Ok(Step {
            observation: self.observation(),
            action,
            reward: -cost,
            terminated: false,
            truncated: self.steps >= timelimit,
        })
    }

    fn action_space(&self) -> Vec<usize> {
        vec![1]
    }

    fn action_domain(&self) -> Vec<RangeInclusive<f64>> {
        vec![-self.config.max_torque..=self.config.max_torque]
    }

    fn observation_space(&self) -> Vec<usize> {
        vec![3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_at_the_timelimit_without_terminating() {
        let mut env = *Pendulum::new(PendulumConfig::default()).unwrap();
        env.reset(5).unwrap();
        for i in 1..=200 {
            let step = env.step(PendulumAction::new(1.0)).unwrap();
            assert!(!step.terminated);
            assert_eq!(step.truncated, i == 200);
            assert!(step.reward <= 0.0);
            let obs = PendulumObservation::to_vec(step.observation);
            assert!((obs[0].powi(2) + obs[1].powi(2) - 1.0).abs() < 1e-9);
            assert!(obs[2].abs() <= 8.0);
        }
    }

    #[test]
    fn torque_is_clipped_to_the_domain() {
        let mut a = *Pendulum::new(PendulumConfig::default()).unwrap();
        let mut b = *Pendulum::new(PendulumConfig::default()).unwrap();
        a.reset(11).unwrap();
        b.reset(11).unwrap();
        let sa = a.step(PendulumAction::new(50.0)).unwrap();
        let sb = b.step(PendulumAction::new(2.0)).unwrap();
        assert_eq!(sa.observation, sb.observation);
        assert_eq!(sa.reward, sb.reward);
    }

    #[test]
    fn reset_is_seeded() {
        let mut env = *Pendulum::new(PendulumConfig::default()).unwrap();
        let first = env.reset(42).unwrap();
        env.step(PendulumAction::new(-1.0)).unwrap();
        assert_eq!(env.reset(42).unwrap(), first);
    }

    #[test]
    fn angles_are_normalized_around_zero() {
        assert!((angle_normalize(2.0 * PI)).abs() < 1e-12);
        assert!((angle_normalize(-0.5) + 0.5).abs() < 1e-12);
        assert!((angle_normalize(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
    }
}
