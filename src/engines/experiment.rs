use {
    super::train::loop_off_policy,
    crate::{
        agents::{
            OffPolicyAlgorithm,
            SaveableAlgorithm,
        },
        configs::TrainConfig,
        envs::{
            Environment,
            VectorConvertible,
        },
        util::write_config,
        RunMode,
    },
    anyhow::{
        anyhow,
        Result,
    },
    candle_core::Device,
    polars::prelude::{
        DataFrame,
        NamedFrom,
        ParquetWriter,
        Series,
    },
    serde::Serialize,
    std::{
        fs::{
            create_dir_all,
            File,
        },
        path::Path,
    },
    tracing::warn,
};

/// Run an experiment with an off-policy algorithm.
///
/// Every repetition builds a fresh environment and agent from the configs,
/// trains it, and writes the episode returns and termination flags to
/// `run_{n}_data.parquet`. The configs are written next to the data as RON.
///
/// # Arguments
///
/// * `path` - The directory where the collected data will be stored.
/// * `n_repetitions` - The number of repeated, identical runs to perform.
/// * `env_config` - The configuration for the environment.
/// * `alg_config` - The configuration for the algorithm.
/// * `train_config` - The number of episodes and learning steps per run.
/// * `save_model` - Save the trained weights of every run under this name.
/// * `device` - The device to run the experiment on.
#[allow(clippy::too_many_arguments)]
pub fn run_experiment_off_policy<Alg, Env, Obs, Act>(
    path: &dyn AsRef<Path>,
    n_repetitions: usize,
    env_config: Env::Config,
    alg_config: Alg::Config,
    train_config: TrainConfig,
    save_model: Option<&str>,
    device: &Device,
) -> Result<Vec<Vec<f64>>>
where
    Env: Environment<Action = Act, Observation = Obs>,
    Env::Config: Clone + Serialize,
    Alg: OffPolicyAlgorithm + SaveableAlgorithm,
    Alg::Config: Serialize,
    Obs: VectorConvertible,
    Act: From<Alg::Action>,
{
    let path = path.as_ref();

    let alg_config_exists = path.join("config_algorithm.ron").try_exists()?;
    let env_config_exists = path.join("config_environment.ron").try_exists()?;
    if alg_config_exists || env_config_exists {
        Err(anyhow!(concat!(
            "Config files already exist in this directory!\n",
            "I am assuming I would be overwriting existing data!",
        )))?
    }

    create_dir_all(path)?;
    write_config(&alg_config, path.join("config_algorithm.ron"))?;
    write_config(&env_config, path.join("config_environment.ron"))?;
    write_config(&train_config, path.join("config_training.ron"))?;

    let mut all_returns = Vec::with_capacity(n_repetitions);
    for n in 0..n_repetitions {
        warn!("Collecting data, run {n}/{n_repetitions}");

        let mut env = *Env::new(env_config.clone())?;
        let mut alg = *Alg::from_config(
            device,
            &alg_config,
            env.observation_space().iter().product::<usize>(),
            env.action_space().iter().product::<usize>(),
            &env.action_domain(),
        )?;

        let (mc_returns, successes) = loop_off_policy(
            &mut env,
            &mut alg,
            &train_config,
            RunMode::Train,
        )?;

        if let Some(name) = save_model {
            alg.save(path, &format!("run_{n}_{name}"))?;
        }

        let mut df = DataFrame::new(vec![
            Series::new(
                &format!("run_{n}_total_rewards"),
                &mc_returns,
            ),
            Series::new(
                &format!("run_{n}_successes"),
                &successes,
            ),
        ])?;

        ParquetWriter::new(
            File::create(path.join(format!("run_{n}_data.parquet")))?
        ).finish(&mut df)?;

        all_returns.push(mc_returns);
    }
    Ok(all_returns)
}
