//! # Components
//!
//! This module contains the components that can be used to build an agent.
//!
//! ## Noise
//!
//! The exploration components perturb or override the actions of an agent.
//! The [`OuNoise`] struct implements the Ornstein-Uhlenbeck process, which is
//! typically used in the [`crate::agents::DDPG`] algorithm, and the
//! [`EpsilonGreedy`] struct implements random action selection for the
//! [`crate::agents::DQN`] algorithm.
//!
//! ## Replay Buffer
//!
//! The [`ReplayBuffer`] struct implements a fixed-capacity ring of
//! transitions, which is used by off-policy algorithms such as
//! [`crate::agents::DDPG`] and [`crate::agents::DQN`].
//!
//! ## Approximators
//!
//! The [`Approximator`] trait is everything an agent needs from a neural
//! network, and [`Mlp`] implements it on top of candle. The functions in
//! [`target_sync`] move parameters from a live network into its target.

mod approximator;
mod epsilon_greedy;
mod ou_noise;
mod replay_buffer;

pub mod target_sync;
pub use approximator::{
    Approximator,
    Head,
    Mlp,
    Parameters,
};
pub use epsilon_greedy::EpsilonGreedy;
pub use ou_noise::OuNoise;
pub use replay_buffer::{
    Batch,
    ReplayBuffer,
    Transition,
};
