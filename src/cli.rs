use {
    crate::{
        agents::{
            DDPG,
            DQN,
        },
        configs::{
            DDPGConfig,
            DQNConfig,
            TrainConfig,
        },
        engines::run_experiment_off_policy,
        envs::{
            CartPole,
            CartPoleConfig,
            Pendulum,
            PendulumConfig,
        },
        logging::setup_logging,
        util::read_config,
    },
    anyhow::Result,
    candle_core::Device,
    clap::{
        Parser,
        ValueEnum,
    },
    serde::de::DeserializeOwned,
    std::path::{
        Path,
        PathBuf,
    },
    tracing::{
        warn,
        Level,
    },
};


#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Env {
    /// Continuous torque control, trained with DDPG.
    Pendulum,
    /// Discrete left/right pushes, trained with DQN.
    Cartpole,
}
impl Env {
    pub fn name(&self) -> &str {
        match self {
            Env::Pendulum => "pendulum",
            Env::Cartpole => "cartpole",
        }
    }
}

#[derive(ValueEnum, Debug, Clone)]
pub enum Loglevel {
    Error, // put these only during active debugging and then downgrade later
    Warn,  // main events in the program
    Info,  // all the little details
    Debug, // per-step losses
    None,  // don't log anything
}
impl Loglevel {
    pub fn level(&self) -> Option<Level> {
        match self {
            Loglevel::Error => Some(Level::ERROR),
            Loglevel::Warn => Some(Level::WARN),
            Loglevel::Info => Some(Level::INFO),
            Loglevel::Debug => Some(Level::DEBUG),
            Loglevel::None => None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Setup logging
    #[arg(long, value_enum, default_value_t=Loglevel::None)]
    pub log: Loglevel,

    /// The environment to run.
    #[arg(long, value_enum)]
    pub env: Env,

    /// The number of independent training runs.
    #[arg(long, default_value_t = 1)]
    pub runs: usize,

    /// Override the number of episodes per run.
    #[arg(long)]
    pub episodes: Option<usize>,

    /// Directory to write the results to, `data/<env>` by default.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// RON file with the algorithm config, instead of the preset.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save the trained weights of every run under this name.
    #[arg(long)]
    pub save: Option<String>,
}

fn config_or<T: DeserializeOwned>(
    path: Option<&Path>,
    preset: fn() -> T,
) -> Result<T> {
    match path {
        Some(path) => read_config(path),
        None => Ok(preset()),
    }
}

fn report(returns: &[Vec<f64>]) {
    for (n, run) in returns.iter().enumerate() {
        let tail = &run[run.len().saturating_sub(10)..];
        let avg = tail.iter().sum::<f64>() / tail.len().max(1) as f64;
        warn!("run {n}: average return over the last {} episodes is {avg:.2}", tail.len());
    }
}

/// Set up logging and train the agent that belongs to the chosen environment.
pub fn run(args: Args) -> Result<()> {
    if let Some(level) = args.log.level() {
        setup_logging(
            &format!("{}.log", args.env.name()),
            Some(level),
            Some(level),
        )?;
    }

    let device = Device::Cpu;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| Path::new("data").join(args.env.name()));

    let returns = match args.env {
        Env::Pendulum => {
            let mut train_config = TrainConfig::pendulum();
            if let Some(episodes) = args.episodes {
                train_config.set_max_episodes(episodes);
            }
            run_experiment_off_policy::<DDPG, Pendulum, _, _>(
                &output,
                args.runs,
                PendulumConfig::default(),
                config_or(args.config.as_deref(), DDPGConfig::pendulum)?,
                train_config,
                args.save.as_deref(),
                &device,
            )?
        }

        Env::Cartpole => {
            let mut train_config = TrainConfig::cartpole();
            if let Some(episodes) = args.episodes {
                train_config.set_max_episodes(episodes);
            }
            run_experiment_off_policy::<DQN, CartPole, _, _>(
                &output,
                args.runs,
                CartPoleConfig::default(),
                config_or(args.config.as_deref(), DQNConfig::cartpole)?,
                train_config,
                args.save.as_deref(),
                &device,
            )?
        }
    };
    report(&returns);
    Ok(())
}
