use {
    super::{
        item_to_tensor,
        rows_to_tensor,
        Algorithm,
        OffPolicyAlgorithm,
        SaveableAlgorithm,
    },
    crate::{
        components::{
            target_sync::{
                hard_update,
                soft_update,
            },
            Approximator,
            Head,
            Mlp,
            OuNoise,
            ReplayBuffer,
            Transition,
        },
        configs::DDPGConfig,
        error::Result,
        RunMode,
    },
    candle_core::{
        Device,
        Tensor,
    },
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

/// Clamp every action dimension into `[lower, upper]`.
///
/// NaNs are passed through untouched so a diverged actor stays visible.
pub fn clip_action(
    action: &[f64],
    lower: &[f64],
    upper: &[f64],
) -> Vec<f64> {
    action
        .iter()
        .zip(lower.iter().zip(upper))
        .map(|(&a, (&lo, &hi))| a.clamp(lo, hi))
        .collect()
}

fn critic_forward(
    critic: &Mlp,
    state: &Tensor,
    action: &Tensor,
) -> Result<Tensor> {
    critic.forward(&Tensor::cat(&[state, action], 1)?)
}

/// Deep Deterministic Policy Gradient.
///
/// The actor maps states to bounded continuous actions and the critic scores
/// state-action pairs. Both have a target copy that slowly tracks the live
/// network through Polyak averaging after every training step.
///
/// Bootstrapped targets never mask terminal transitions: every transition is
/// treated as having a successor, which matches continuing tasks such as the
/// pendulum but overestimates values at true episode ends.
#[allow(clippy::upper_case_acronyms)]
pub struct DDPG {
    actor: Mlp,
    target_actor: Mlp,
    actor_optim: AdamW,
    critic: Mlp,
    target_critic: Mlp,
    critic_optim: AdamW,
    replay_buffer: ReplayBuffer<Vec<f64>>,
    ou_noise: OuNoise,
    rng: StdRng,

    lower_bounds: Vec<f64>,
    upper_bounds: Vec<f64>,
    device: Device,
    config: DDPGConfig,
}

impl DDPG {
    pub fn new(
        device: &Device,
        size_state: usize,
        action_domain: &[RangeInclusive<f64>],
        config: DDPGConfig,
    ) -> Result<Self> {
        let size_action = action_domain.len();
        let lower_bounds: Vec<f64> = action_domain.iter().map(|r| *r.start()).collect();
        let upper_bounds: Vec<f64> = action_domain.iter().map(|r| *r.end()).collect();

        let actor_dims = [
            size_state,
            config.hidden_1_size,
            config.hidden_2_size,
            size_action,
        ];
        let head = Head::Bounded {
            low: lower_bounds.clone(),
            high: upper_bounds.clone(),
        };
        let actor = Mlp::new(device, &actor_dims, head.clone())?;
        let mut target_actor = Mlp::new(device, &actor_dims, head)?;
        let actor_optim = AdamW::new(
            actor.trainable_vars(),
            ParamsAdamW {
                lr: config.actor_learning_rate,
                ..Default::default()
            },
        )?;

        let critic_dims = [
            size_state + size_action,
            config.hidden_1_size,
            config.hidden_2_size,
            1,
        ];
        let critic = Mlp::new(device, &critic_dims, Head::Linear)?;
        let mut target_critic = Mlp::new(device, &critic_dims, Head::Linear)?;
        let critic_optim = AdamW::new(
            critic.trainable_vars(),
            ParamsAdamW {
                lr: config.critic_learning_rate,
                ..Default::default()
            },
        )?;

        // the targets start out as exact copies of the live networks
        hard_update(&mut target_actor, &actor)?;
        hard_update(&mut target_critic, &critic)?;

        let ou_noise = OuNoise::new(
            config.ou_theta,
            vec![config.ou_mean; size_action],
            config.ou_std_dev,
            config.ou_dt,
            config.ou_x_initial.clone(),
            config.seed,
        )?;

        Ok(Self {
            actor,
            target_actor,
            actor_optim,
            critic,
            target_critic,
            critic_optim,
            replay_buffer: ReplayBuffer::new(config.replay_buffer_capacity),
            ou_noise,
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            lower_bounds,
            upper_bounds,
            device: device.clone(),
            config,
        })
    }

    pub fn actor_forward_item(
        &self,
        state: &[f64],
    ) -> Result<Vec<f64>> {
        let action = self.actor.forward(&item_to_tensor(state, &self.device)?)?;
        Ok(action.squeeze(0)?.to_vec1::<f64>()?)
    }

    pub fn ou_noise(&self) -> &OuNoise {
        &self.ou_noise
    }

    pub fn actor(&self) -> &Mlp {
        &self.actor
    }

    pub fn target_actor(&self) -> &Mlp {
        &self.target_actor
    }

    pub fn critic(&self) -> &Mlp {
        &self.critic
    }

    pub fn target_critic(&self) -> &Mlp {
        &self.target_critic
    }
}

impl Algorithm for DDPG {
    type Config = DDPGConfig;
    type Action = Vec<f64>;

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn from_config(
        device: &Device,
        config: &DDPGConfig,
        size_state: usize,
        _size_action: usize,
        action_domain: &[RangeInclusive<f64>],
    ) -> Result<Box<Self>> {
        Ok(Box::new(Self::new(
            device,
            size_state,
            action_domain,
            config.clone(),
        )?))
    }

    fn actions(
        &mut self,
        state: &[f64],
        mode: RunMode,
    ) -> Result<Vec<f64>> {
        let actions = self.actor_forward_item(state)?;
        let actions = match mode {
            RunMode::Train => actions
                .iter()
                .zip(self.ou_noise.sample())
                .map(|(a, noise)| a + noise)
                .collect(),
            RunMode::Test => actions,
        };
        // noise must never push an action out of the environment's bounds
        Ok(clip_action(&actions, &self.lower_bounds, &self.upper_bounds))
    }

    fn random_action(&mut self) -> Vec<f64> {
        let rng = &mut self.rng;
        self.lower_bounds
            .iter()
            .zip(&self.upper_bounds)
            .map(|(&lo, &hi)| rng.gen_range(lo..=hi))
            .collect()
    }

    fn train(&mut self) -> Result<()> {
        let batch = self
            .replay_buffer
            .random_batch(self.config.training_batch_size, &mut self.rng)?;

        let states = rows_to_tensor(&batch.states, &self.device)?;
        let actions = rows_to_tensor(&batch.actions, &self.device)?;
        let rewards = Tensor::from_vec(batch.rewards, (batch.states.len(), 1), &self.device)?;
        let next_states = rows_to_tensor(&batch.next_states, &self.device)?;

        let q_target = critic_forward(
            &self.target_critic,
            &next_states,
            &self.target_actor.forward(&next_states)?,
        )?;
        let q_target = (rewards + q_target.affine(self.config.gamma, 0.0)?)?.detach()?;
        let q = critic_forward(&self.critic, &states, &actions)?;

        let critic_loss = (q_target - q)?.sqr()?.mean_all()?;
        self.critic_optim.backward_step(&critic_loss)?;

        // scored by the critic that was just updated
        let actor_loss = critic_forward(&self.critic, &states, &self.actor.forward(&states)?)?
            .mean_all()?
            .neg()?;
        self.actor_optim.backward_step(&actor_loss)?;

        debug!(
            critic_loss = critic_loss.to_scalar::<f64>()?,
            actor_loss = actor_loss.to_scalar::<f64>()?,
            "DDPG training step",
        );

        soft_update(&mut self.target_critic, &self.critic, self.config.tau)?;
        soft_update(&mut self.target_actor, &self.actor, self.config.tau)?;

        Ok(())
    }

    fn reset(&mut self) {
        self.ou_noise.reset();
    }
}

impl OffPolicyAlgorithm for DDPG {
    fn remember(
        &mut self,
        state: &[f64],
        action: Vec<f64>,
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

    fn replay_buffer(&self) -> &ReplayBuffer<Vec<f64>> {
        &self.replay_buffer
    }

    fn can_train(&self) -> bool {
        !self.replay_buffer.is_empty()
    }
}

impl SaveableAlgorithm for DDPG {
    fn save<P: AsRef<Path> + ?Sized>(
        &self,
        path: &P,
        name: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        self.actor.save(&path.join(format!("{name}_actor.safetensors")))?;
        self.critic.save(&path.join(format!("{name}_critic.safetensors")))?;
        self.target_actor.save(&path.join(format!("{name}_target_actor.safetensors")))?;
        self.target_critic.save(&path.join(format!("{name}_target_critic.safetensors")))?;
        Ok(())
    }

    fn load<P: AsRef<Path> + ?Sized>(
        &mut self,
        path: &P,
        name: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        self.actor.load(&path.join(format!("{name}_actor.safetensors")))?;
        self.critic.load(&path.join(format!("{name}_critic.safetensors")))?;
        self.target_actor.load(&path.join(format!("{name}_target_actor.safetensors")))?;
        self.target_critic.load(&path.join(format!("{name}_target_critic.safetensors")))?;
        Ok(())
    }
}
