use serde::{
    Deserialize,
    Serialize,
};


#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainConfig {
    // The total number of episodes.
    max_episodes: usize,
    // The number of training iterations after every environment step.
    training_iterations: usize,
    // Number of random actions to take at very beginning of training.
    initial_random_actions: usize,
    // Seed for the episode resets.
    seed: u64,
}
impl TrainConfig {
    pub fn new(
        max_episodes: usize,
        training_iterations: usize,
        initial_random_actions: usize,
        seed: u64,
    ) -> Self {
        Self {
            max_episodes,
            training_iterations,
            initial_random_actions,
            seed,
        }
    }

    pub fn pendulum() -> Self {
        Self {
            max_episodes: 100,
            training_iterations: 1,
            initial_random_actions: 0,
            seed: 0,
        }
    }

    pub fn cartpole() -> Self {
        Self {
            max_episodes: 300,
            training_iterations: 1,
            initial_random_actions: 0,
            seed: 0,
        }
    }
}

impl TrainConfig {
    pub fn max_episodes(&self) -> usize {
        self.max_episodes
    }
    pub fn training_iterations(&self) -> usize {
        self.training_iterations
    }
    pub fn initial_random_actions(&self) -> usize {
        self.initial_random_actions
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn set_max_episodes(&mut self, max_episodes: usize) {
        self.max_episodes = max_episodes;
    }
}
