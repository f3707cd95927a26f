use serde::{
    Deserialize,
    Serialize,
};


#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DQNConfig {
    pub learning_rate: f64,
    // The impact of the q value of the next state on the current state's q value.
    pub gamma: f64,
    // The number of neurons in the hidden layers of the Q network.
    pub hidden_1_size: usize,
    pub hidden_2_size: usize,
    // The capacity of the replay buffer used for sampling training data.
    pub replay_buffer_capacity: usize,
    // The training batch size for each training iteration.
    pub training_batch_size: usize,
    // Exploration rate, decayed after every training iteration down to epsilon_min.
    pub epsilon: f64,
    pub epsilon_min: f64,
    pub epsilon_decay: f64,
    // Environment steps between copies of the Q network into the target network.
    pub update_rate: usize,
    // Seed for exploration and replay sampling.
    pub seed: u64,
}
impl Default for DQNConfig {
    fn default() -> Self {
        Self::cartpole()
    }
}
impl DQNConfig {
    pub fn cartpole() -> Self {
        Self {
            learning_rate: 0.00025,
            gamma: 0.99,
            hidden_1_size: 64,
            hidden_2_size: 64,
            replay_buffer_capacity: 5_000,
            training_batch_size: 32,
            epsilon: 1.0,
            epsilon_min: 0.05,
            epsilon_decay: 0.995,
            update_rate: 500,
            seed: 42,
        }
    }
}
