mod cartpole;
mod pendulum;

use {
    anyhow::Result,
    std::ops::RangeInclusive,
};

pub use crate::envs::{
    cartpole::{
        CartPole,
        CartPoleAction,
        CartPoleConfig,
        CartPoleObservation,
    },
    pendulum::{
        Pendulum,
        PendulumAction,
        PendulumConfig,
        PendulumObservation,
    },
};

pub trait VectorConvertible {
    fn from_vec(value: Vec<f64>) -> Self;
    fn to_vec(value: Self) -> Vec<f64>;
}

#[derive(Debug)]
pub struct Step<O, A> {
    pub observation: O,
    pub action: A,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
}

/// A simulated control task.
///
/// `terminated` reports a true end state (goal or failure), `truncated`
/// reports that the step limit was hit. The spaces are read once when an
/// agent is built and never change afterwards.
pub trait Environment {
    type Config;
    type Action;
    type Observation;

    fn new(config: Self::Config) -> Result<Box<Self>>;
    fn reset(
        &mut self,
        seed: u64,
    ) -> Result<Self::Observation>;
    fn step(
        &mut self,
        action: Self::Action,
    ) -> Result<Step<Self::Observation, Self::Action>>;
    /// The shape of an action, or `[n]` for `n` discrete choices.
    fn action_space(&self) -> Vec<usize>;
    /// The valid range of every action dimension.
    fn action_domain(&self) -> Vec<RangeInclusive<f64>>;
    fn observation_space(&self) -> Vec<usize>;
}
