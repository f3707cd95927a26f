use thiserror::Error;

/// Errors raised by the replay, exploration and learning components.
#[derive(Error, Debug)]
pub enum Error {
    /// Sampling was requested from a replay buffer that holds no transitions.
    #[error("cannot sample a batch of {batch_size} from an empty replay buffer")]
    InsufficientData { batch_size: usize },

    /// A target approximator has no parameter with this name.
    #[error("parameter {0} does not exist in the target approximator")]
    MissingParameter(String),

    /// Two approximators disagree on the shape of a named parameter.
    #[error("parameter {name} has shape {live:?} but the target expects {target:?}")]
    ParameterShape {
        name: String,
        live: Vec<usize>,
        target: Vec<usize>,
    },

    /// A configured vector does not match the number of action dimensions.
    #[error("{what} has {got} entries but the action space has {expected} dimensions")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A stored discrete action lies outside of the action space.
    #[error("action {action} is not one of the {n_actions} available actions")]
    InvalidAction { action: usize, n_actions: usize },

    /// The parameter store lock was poisoned by a panicking thread.
    #[error("parameter store lock is poisoned")]
    PoisonedParameters,

    #[error(transparent)]
    Candle(#[from] candle_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
