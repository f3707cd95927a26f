use {
    super::{
        item_to_tensor,
        Algorithm,
        OffPolicyAlgorithm,
        SaveableAlgorithm,
    },
    crate::{
        components::{
            target_sync::hard_update,
            Approximator,
            EpsilonGreedy,
            Head,
            Mlp,
            ReplayBuffer,
            Transition,
        },
        configs::DQNConfig,
        error::{
            Error,
            Result,
        },
        RunMode,
    },
    candle_core::Device,
    candle_nn::{
        AdamW,
        Optimizer,
        ParamsAdamW,
    },
    rand::{
        rngs::StdRng,
        Rng,
        SeedableRng,
    },
    std::{
        ops::RangeInclusive,
        path::Path,
    },
    tracing::{
        debug,
        info,
    },
};

/// The one-step bootstrapped value of a transition.
///
/// Terminal transitions are worth exactly their reward. Otherwise the best
/// next-state estimate of the target network is discounted and added. A NaN
/// in `next_q` propagates into the result.
pub fn bootstrap_target(
    reward: f64,
    done: bool,
    gamma: f64,
    next_q: &[f64],
) -> f64 {
    if done {
        return reward;
    }
    let best = next_q
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, |best, q| if q.is_nan() || q > best { q } else { best });
    reward + gamma * best
}

/// The regression target of one transition: the live `prediction` with only
/// the entry of the taken `action` replaced by `target`.
fn target_vector(
    mut prediction: Vec<f64>,
    action: usize,
    target: f64,
) -> Result<Vec<f64>> {
    let n_actions = prediction.len();
    *prediction
        .get_mut(action)
        .ok_or(Error::InvalidAction { action, n_actions })? = target;
    Ok(prediction)
}

fn greedy_action(
    q_network: &Mlp,
    state: &[f64],
    device: &Device,
) -> Result<usize> {
    let q_values = q_network.forward(&item_to_tensor(state, device)?)?.squeeze(0)?;
    Ok(q_values.argmax(0)?.to_scalar::<u32>()? as usize)
}

/// Deep Q-Network.
///
/// A single Q network estimates the value of every discrete action. Learning
/// fits the network one sampled transition at a time against a target vector
/// that differs from its own prediction only in the taken action. The target
/// network starts out independent and is overwritten with the live network
/// every `update_rate` environment steps.
#[allow(clippy::upper_case_acronyms)]
pub struct DQN {
    q_network: Mlp,
    target_network: Mlp,
    optim: AdamW,
    replay_buffer: ReplayBuffer<usize>,
    exploration: EpsilonGreedy,
    rng: StdRng,

    n_actions: usize,
    device: Device,
    config: DQNConfig,
}

impl DQN {
    pub fn new(
        device: &Device,
        size_state: usize,
        n_actions: usize,
        config: DQNConfig,
    ) -> Result<Self> {
        let dims = [
            size_state,
            config.hidden_1_size,
            config.hidden_2_size,
            n_actions,
        ];
        let q_network = Mlp::new(device, &dims, Head::Linear)?;
        let target_network = Mlp::new(device, &dims, Head::Linear)?;
        let optim = AdamW::new(
            q_network.trainable_vars(),
            ParamsAdamW {
                lr: config.learning_rate,
                ..Default::default()
            },
        )?;

        Ok(Self {
            q_network,
            target_network,
            optim,
            replay_buffer: ReplayBuffer::new(config.replay_buffer_capacity),
            exploration: EpsilonGreedy::new(
                config.epsilon,
                config.epsilon_min,
                config.epsilon_decay,
            ),
            rng: StdRng::seed_from_u64(config.seed),
            n_actions,
            device: device.clone(),
            config,
        })
    }

    pub fn q_values(
        &self,
        state: &[f64],
    ) -> Result<Vec<f64>> {
        let q_values = self.q_network.forward(&item_to_tensor(state, &self.device)?)?;
        Ok(q_values.squeeze(0)?.to_vec1::<f64>()?)
    }

    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon()
    }

    pub fn q_network(&self) -> &Mlp {
        &self.q_network
    }

    pub fn target_network(&self) -> &Mlp {
        &self.target_network
    }

    /// Fit the Q network on a single transition.
    fn fit_one(
        &mut self,
        transition: &Transition<usize>,
    ) -> Result<f64> {
        let state = item_to_tensor(&transition.state, &self.device)?;
        let next_q = self
            .target_network
            .forward(&item_to_tensor(&transition.next_state, &self.device)?)?
            .squeeze(0)?
            .to_vec1::<f64>()?;
        let target = bootstrap_target(
            transition.reward,
            transition.done(),
            self.config.gamma,
            &next_q,
        );

        let prediction = self.q_network.forward(&state)?;
        let target_q = target_vector(
            prediction.squeeze(0)?.to_vec1::<f64>()?,
            transition.action,
            target,
        )?;
        let target_q = item_to_tensor(&target_q, &self.device)?;

        let loss = (prediction - target_q)?.sqr()?.mean_all()?;
        self.optim.backward_step(&loss)?;
        Ok(loss.to_scalar::<f64>()?)
    }
}

impl Algorithm for DQN {
    type Config = DQNConfig;
    type Action = usize;

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn from_config(
        device: &Device,
        config: &DQNConfig,
        size_state: usize,
        size_action: usize,
        _action_domain: &[RangeInclusive<f64>],
    ) -> Result<Box<Self>> {
        Ok(Box::new(Self::new(
            device,
            size_state,
            size_action,
            config.clone(),
        )?))
    }

    fn actions(
        &mut self,
        state: &[f64],
        mode: RunMode,
    ) -> Result<usize> {
        let (q_network, device) = (&self.q_network, &self.device);
        match mode {
            RunMode::Train => self.exploration.select(self.n_actions, &mut self.rng, || {
                greedy_action(q_network, state, device)
            }),
            RunMode::Test => greedy_action(q_network, state, device),
        }
    }

    fn random_action(&mut self) -> usize {
        self.rng.gen_range(0..self.n_actions)
    }

    fn train(&mut self) -> Result<()> {
        let batch = self
            .replay_buffer
            .random_indices(self.config.training_batch_size, &mut self.rng)?;

        let mut total_loss = 0.0;
        for slot in batch {
            if let Some(transition) = self.replay_buffer.get(slot).cloned() {
                total_loss += self.fit_one(&transition)?;
            }
        }
        self.exploration.decay();

        debug!(
            loss = total_loss / self.config.training_batch_size as f64,
            epsilon = self.exploration.epsilon(),
            "DQN training step",
        );
        Ok(())
    }

    fn sync_targets(
        &mut self,
        steps_taken: usize,
    ) -> Result<()> {
        let update_rate = self.config.update_rate;
        if update_rate > 0 && steps_taken > 0 && steps_taken % update_rate == 0 {
            info!("Updating the target network after {steps_taken} steps");
            hard_update(&mut self.target_network, &self.q_network)?;
        }
        Ok(())
    }
}

impl OffPolicyAlgorithm for DQN {
    fn remember(
        &mut self,
        state: &[f64],
        action: usize,
        reward: f64,
        next_state: &[f64],
        terminated: bool,
        truncated: bool,
    ) {
        info!(
            concat!(
                "\nPushing to replay buffer:",
                "\n{state:?}",
                "\n{action:?}",
                "\n{reward:?}",
                "\n{next_state:?}",
            ),
            state = state,
            action = action,
            reward = reward,
            next_state = next_state,
        );
        self.replay_buffer.push(Transition::new(
            state, action, reward, next_state, terminated, truncated,
        ))
    }

    fn replay_buffer(&self) -> &ReplayBuffer<usize> {
        &self.replay_buffer
    }

    /// Learning only starts once more than a full batch has been collected.
    fn can_train(&self) -> bool {
        self.replay_buffer.len() > self.config.training_batch_size
    }
}

impl SaveableAlgorithm for DQN {
    fn save<P: AsRef<Path> + ?Sized>(
        &self,
        path: &P,
        name: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        self.q_network.save(&path.join(format!("{name}_q.safetensors")))?;
        self.target_network.save(&path.join(format!("{name}_target_q.safetensors")))?;
        Ok(())
    }

    fn load<P: AsRef<Path> + ?Sized>(
        &mut self,
        path: &P,
        name: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        self.q_network.load(&path.join(format!("{name}_q.safetensors")))?;
        self.target_network.load(&path.join(format!("{name}_target_q.safetensors")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DQNConfig {
        DQNConfig {
            hidden_1_size: 16,
            hidden_2_size: 16,
            replay_buffer_capacity: 50,
            training_batch_size: 4,
            update_rate: 5,
            ..DQNConfig::cartpole()
        }
    }

    fn agent(config: DQNConfig) -> DQN {
        DQN::new(&Device::Cpu, 4, 2, config).unwrap()
    }

    fn flat(net: &Mlp) -> Vec<f64> {
        net.parameters()
            .unwrap()
            .values()
            .flat_map(|t| t.flatten_all().unwrap().to_vec1::<f64>().unwrap())
            .collect()
    }

    fn fill(dqn: &mut DQN, n: usize) {
        for i in 0..n {
            let x = i as f64 * 0.01;
            dqn.remember(&[x, 0.0, -x, 0.0], i % 2, 1.0, &[x, 0.1, -x, 0.1], i % 7 == 6, false);
        }
    }

    #[test]
    fn terminal_targets_are_the_reward() {
        for gamma in [0.0, 0.5, 0.99, 1.0] {
            assert_eq!(bootstrap_target(1.0, true, gamma, &[1e9, -3.0]), 1.0);
            assert_eq!(bootstrap_target(1.0, true, gamma, &[f64::NAN]), 1.0);
        }
    }

    #[test]
    fn non_terminal_targets_bootstrap_from_the_best_action() {
        assert_eq!(bootstrap_target(1.0, false, 0.5, &[2.0, 4.0, -1.0]), 3.0);
        assert_eq!(bootstrap_target(0.0, false, 0.0, &[7.0]), 0.0);
        assert!(bootstrap_target(1.0, false, 0.9, &[1.0, f64::NAN, 2.0]).is_nan());
    }

    #[test]
    fn target_vector_replaces_only_the_taken_action() {
        let prediction = vec![0.25, -1.5, f64::NAN, 3.0];
        let next_q = [2.0, 4.0];
        let target = bootstrap_target(1.0, false, 0.5, &next_q);

        let fitted = target_vector(prediction.clone(), 1, target).unwrap();

        assert_eq!(fitted[1], 3.0);
        for i in [0, 2, 3] {
            assert_eq!(fitted[i].to_bits(), prediction[i].to_bits());
        }
    }

    #[test]
    fn target_vector_rejects_unknown_actions() {
        assert!(matches!(
            target_vector(vec![0.0, 0.0], 2, 1.0),
            Err(Error::InvalidAction { action: 2, n_actions: 2 })
        ));
    }

    #[test]
    fn training_on_an_out_of_range_action_is_an_error() {
        let mut dqn = agent(DQNConfig {
            training_batch_size: 1,
            ..config()
        });
        dqn.remember(&[0.0; 4], 5, 1.0, &[0.0; 4], false, false);
        dqn.remember(&[0.0; 4], 5, 1.0, &[0.0; 4], true, false);
        assert!(matches!(
            dqn.train(),
            Err(Error::InvalidAction { action: 5, n_actions: 2 })
        ));
    }

    #[test]
    fn learning_waits_for_more_than_a_batch() {
        let mut dqn = agent(config());
        assert!(matches!(dqn.train(), Err(Error::InsufficientData { .. })));
        fill(&mut dqn, 4);
        assert!(!dqn.can_train());
        fill(&mut dqn, 1);
        assert!(dqn.can_train());
    }

    #[test]
    fn training_updates_only_the_live_network() {
        let mut dqn = agent(config());
        fill(&mut dqn, 10);
        let (live_before, target_before) = (flat(dqn.q_network()), flat(dqn.target_network()));
        let epsilon_before = dqn.epsilon();

        dqn.train().unwrap();

        assert_ne!(flat(dqn.q_network()), live_before);
        assert_eq!(flat(dqn.target_network()), target_before);
        assert!(dqn.epsilon() < epsilon_before);
    }

    #[test]
    fn target_is_copied_every_update_rate_steps() {
        let mut dqn = agent(config());
        fill(&mut dqn, 10);
        assert_ne!(flat(dqn.q_network()), flat(dqn.target_network()));

        for step in 1..5 {
            dqn.train().unwrap();
            dqn.sync_targets(step).unwrap();
            assert_ne!(flat(dqn.q_network()), flat(dqn.target_network()));
        }
        dqn.sync_targets(5).unwrap();
        let (live, target) = (flat(dqn.q_network()), flat(dqn.target_network()));
        assert!(live.iter().zip(&target).all(|(a, b)| a.to_bits() == b.to_bits()));
    }

    #[test]
    fn test_mode_acts_greedily() {
        let mut dqn = agent(config());
        let state = [0.01, -0.02, 0.03, 0.0];
        let q = dqn.q_values(&state).unwrap();
        let best = if q[1] > q[0] { 1 } else { 0 };
        for _ in 0..10 {
            assert_eq!(dqn.actions(&state, RunMode::Test).unwrap(), best);
        }
    }

    #[test]
    fn exploring_actions_are_valid_indices() {
        let mut dqn = agent(config());
        for _ in 0..100 {
            assert!(dqn.actions(&[0.0; 4], RunMode::Train).unwrap() < 2);
            assert!(dqn.random_action() < 2);
        }
    }

    #[test]
    fn save_and_load_restore_both_networks() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = agent(config());
        fill(&mut source, 10);
        source.train().unwrap();
        source.save(dir.path(), "cartpole").unwrap();

        let mut restored = agent(config());
        restored.load(dir.path(), "cartpole").unwrap();
        assert_eq!(flat(source.q_network()), flat(restored.q_network()));
        assert_eq!(flat(source.target_network()), flat(restored.target_network()));
    }
}
