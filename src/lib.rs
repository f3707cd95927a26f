//! Experience-replay training loops for off-policy agents.
//!
//! [`agents::DDPG`] learns continuous control with an Ornstein-Uhlenbeck
//! exploration process and Polyak-averaged target networks, and
//! [`agents::DQN`] learns discrete control with epsilon-greedy exploration
//! and a periodically copied target network. Both store their experience in
//! a fixed-capacity [`components::ReplayBuffer`] and are driven by
//! [`engines::loop_off_policy`].

pub mod error;
pub mod logging;
pub mod util;

pub mod envs;
pub mod components;
pub mod configs;
pub mod agents;

pub mod cli;
pub mod engines;

pub use error::{
    Error,
    Result,
};


#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum RunMode {
    Train,
    Test,
}
