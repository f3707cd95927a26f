mod experiment;
mod train;

pub use experiment::run_experiment_off_policy;
pub use train::loop_off_policy;
