mod ddpg;
mod dqn;
mod train;

pub use ddpg::DDPGConfig;
pub use dqn::DQNConfig;
pub use train::TrainConfig;
