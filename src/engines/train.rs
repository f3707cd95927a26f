use {
    crate::{
        agents::OffPolicyAlgorithm,
        configs::TrainConfig,
        envs::{
            Environment,
            VectorConvertible,
        },
        RunMode,
    },
    anyhow::Result,
    rand::{
        rngs::StdRng,
        Rng,
        SeedableRng,
    },
    tracing::warn,
};


/// Run episodes of an environment with an off-policy algorithm.
///
/// In [`RunMode::Train`] every environment step is stored in the replay
/// buffer, followed by `training_iterations` learning steps once the
/// algorithm reports that it can learn, followed by a target synchronisation.
/// In [`RunMode::Test`] the algorithm acts without exploration, and nothing is
/// stored or learned.
///
/// Returns the total reward of every episode, and whether each episode ended
/// by termination rather than truncation.
///
/// # Arguments
///
/// * `env` - The environment to run in.
/// * `alg` - The agent to act (and learn) with.
/// * `config` - The number of episodes and learning steps.
/// * `mode` - Whether to train or only evaluate.
#[doc = simple_mermaid::mermaid!("../../docs/episode_loop.mmd")]
pub fn loop_off_policy<Alg, Env, Obs, Act>(
    env: &mut Env,
    alg: &mut Alg,
    config: &TrainConfig,
    mode: RunMode,
) -> Result<(Vec<f64>, Vec<bool>)>
where
    Env: Environment<Action = Act, Observation = Obs>,
    Alg: OffPolicyAlgorithm,
    Obs: VectorConvertible,
    Act: From<Alg::Action>,
{
    warn!("action space: {:?}", env.action_space());
    warn!("observation space: {:?}", env.observation_space());

    let mut steps_taken = 0;
    let mut mc_returns = Vec::new();
    let mut successes = Vec::new();
    let mut rng = StdRng::seed_from_u64(config.seed());

    for episode in 0..config.max_episodes() {
        let mut total_reward = 0.0;
        let mut state = <Obs>::to_vec(env.reset(rng.gen::<u64>())?);
        alg.reset();

        loop {
            // select an action, or randomly sample one
            let action = if mode == RunMode::Train && steps_taken < config.initial_random_actions() {
                alg.random_action()
            } else {
                alg.actions(&state, mode)?
            };

            let step = env.step(<Act>::from(action.clone()))?;
            let next_state = <Obs>::to_vec(step.observation);
            total_reward += step.reward;
            steps_taken += 1;

            if let RunMode::Train = mode {
                alg.remember(
                    &state,
                    action,
                    step.reward,
                    &next_state,
                    step.terminated,
                    step.truncated,
                );
                if alg.can_train() {
                    for _ in 0..config.training_iterations() {
                        alg.train()?;
                    }
                }
                alg.sync_targets(steps_taken)?;
            }

            if step.terminated || step.truncated {
                successes.push(step.terminated);
                break;
            }
            state = next_state;
        }

        warn!("{mode} episode {episode} with total reward of {total_reward}");
        mc_returns.push(total_reward);
    }
    Ok((mc_returns, successes))
}
