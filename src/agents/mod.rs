mod ddpg;
mod dqn;

pub use ddpg::{
    clip_action,
    DDPG,
};
pub use dqn::{
    bootstrap_target,
    DQN,
};

use {
    crate::{
        components::ReplayBuffer,
        error::Result,
        RunMode,
    },
    candle_core::{
        Device,
        Tensor,
    },
    std::{
        ops::RangeInclusive,
        path::Path,
    },
};


pub trait Algorithm {
    type Config;
    type Action: Clone;

    fn config(&self) -> &Self::Config;
    fn from_config(
        device: &Device,
        config: &Self::Config,
        size_state: usize,
        size_action: usize,
        action_domain: &[RangeInclusive<f64>],
    ) -> Result<Box<Self>>;

    /// Select the action to take in `state`, exploring only in training mode.
    fn actions(
        &mut self,
        state: &[f64],
        mode: RunMode,
    ) -> Result<Self::Action>;

    /// A uniformly random valid action.
    fn random_action(&mut self) -> Self::Action;

    fn train(&mut self) -> Result<()>;

    /// Prepare for a new episode.
    fn reset(&mut self) {}

    /// Called once per environment step, after learning.
    fn sync_targets(
        &mut self,
        _steps_taken: usize,
    ) -> Result<()> {
        Ok(())
    }
}

pub trait OffPolicyAlgorithm: Algorithm {
    fn remember(
        &mut self,
        state: &[f64],
        action: Self::Action,
        reward: f64,
        next_state: &[f64],
        terminated: bool,
        truncated: bool,
    );

    fn replay_buffer(&self) -> &ReplayBuffer<Self::Action>;

    /// Whether the replay buffer holds enough transitions to learn from.
    fn can_train(&self) -> bool;
}

pub trait SaveableAlgorithm {
    fn save<P: AsRef<Path> + ?Sized>(
        &self,
        path: &P,
        name: &str,
    ) -> Result<()>;

    fn load<P: AsRef<Path> + ?Sized>(
        &mut self,
        path: &P,
        name: &str,
    ) -> Result<()>;
}

/// Stack equally long rows into a `(rows, columns)` tensor.
fn rows_to_tensor(
    rows: &[Vec<f64>],
    device: &Device,
) -> Result<Tensor> {
    let columns = rows.first().map_or(0, Vec::len);
    Ok(Tensor::from_vec(rows.concat(), (rows.len(), columns), device)?)
}

/// A single state as a batch of one.
fn item_to_tensor(
    item: &[f64],
    device: &Device,
) -> Result<Tensor> {
    Ok(Tensor::new(item, device)?.unsqueeze(0)?)
}
