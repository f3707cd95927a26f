use serde::{
    Deserialize,
    Serialize,
};


#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DDPGConfig {
    // The learning rates for the Actor and Critic networks
    pub actor_learning_rate: f64,
    pub critic_learning_rate: f64,
    // The impact of the q value of the next state on the current state's q value.
    pub gamma: f64,
    // The weight for updating the target networks.
    pub tau: f64,
    // The number of neurons in the hidden layers of the Actor and Critic networks.
    pub hidden_1_size: usize,
    pub hidden_2_size: usize,
    // The capacity of the replay buffer used for sampling training data.
    pub replay_buffer_capacity: usize,
    // The training batch size for each training iteration.
    pub training_batch_size: usize,
    // Ornstein-Uhlenbeck process parameters.
    pub ou_theta: f64,
    pub ou_mean: f64,
    pub ou_std_dev: f64,
    pub ou_dt: f64,
    pub ou_x_initial: Option<Vec<f64>>,
    // Seed for exploration noise and replay sampling.
    pub seed: u64,
}
impl Default for DDPGConfig {
    fn default() -> Self {
        Self::pendulum()
    }
}
impl DDPGConfig {
    pub fn pendulum() -> Self {
        Self {
            actor_learning_rate: 0.001,
            critic_learning_rate: 0.002,
            gamma: 0.99,
            tau: 0.005,
            hidden_1_size: 256,
            hidden_2_size: 256,
            replay_buffer_capacity: 50_000,
            training_batch_size: 64,
            ou_theta: 0.15,
            ou_mean: 0.0,
            ou_std_dev: 0.2,
            ou_dt: 0.01,
            ou_x_initial: None,
            seed: 42,
        }
    }
}
