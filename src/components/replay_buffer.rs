use {
    crate::error::{
        Error,
        Result,
    },
    rand::{
        distributions::Uniform,
        Rng,
    },
    unzip_n::unzip_n,
};

unzip_n!(6);

/// A transition in the replay buffer.
///
/// # Fields
///
/// * `state` - The observation the action was taken in.
/// * `action` - The action that was sent to the environment.
/// * `reward` - The scalar reward returned by the environment.
/// * `next_state` - The observation the environment moved to.
/// * `terminated` - Whether the environment reached a terminal state.
/// * `truncated` - Whether the episode was cut off by the step limit.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<A> {
    pub state: Vec<f64>,
    pub action: A,
    pub reward: f64,
    pub next_state: Vec<f64>,
    pub terminated: bool,
    pub truncated: bool,
}
impl<A> Transition<A> {
    pub fn new(
        state: &[f64],
        action: A,
        reward: f64,
        next_state: &[f64],
        terminated: bool,
        truncated: bool,
    ) -> Self {
        Self {
            state: state.to_vec(),
            action,
            reward,
            next_state: next_state.to_vec(),
            terminated,
            truncated,
        }
    }

    /// Whether the episode ended with this transition, for any reason.
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// A batch of transitions split into one vector per field.
///
/// The k-th element of every field belongs to the same transition.
#[derive(Clone, Debug)]
pub struct Batch<A> {
    pub states: Vec<Vec<f64>>,
    pub actions: Vec<A>,
    pub rewards: Vec<f64>,
    pub next_states: Vec<Vec<f64>>,
    pub terminated: Vec<bool>,
    pub truncated: Vec<bool>,
}
impl<A> Batch<A> {
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

/// A fixed-capacity replay buffer for off-policy algorithms.
///
/// Transitions are written into a ring of `capacity` slots at index
/// `inserted % capacity`, so once the buffer is full every new transition
/// overwrites the oldest one. Slots are never reordered or removed otherwise.
///
/// # Fields
///
/// * `slots` - The stored transitions, at most `capacity` of them.
/// * `capacity` - The capacity of the buffer.
/// * `inserted` - The total number of transitions ever pushed.
#[derive(Clone, Debug)]
pub struct ReplayBuffer<A> {
    slots: Vec<Transition<A>>,
    capacity: usize,
    inserted: usize,
}
impl<A: Clone> ReplayBuffer<A> {
    /// Create a new replay buffer with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "a replay buffer needs room for at least one transition");
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            inserted: 0,
        }
    }

    /// The number of valid transitions, `min(inserted, capacity)`.
    pub fn len(&self) -> usize {
        self.inserted.min(self.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.inserted == 0
    }

    /// Check if the buffer is full.
    pub fn is_full(&self) -> bool {
        self.inserted >= self.capacity
    }

    /// The total number of transitions pushed so far, including overwritten ones.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Push a transition into the buffer.
    ///
    /// If the buffer is full, the transition in the oldest slot is overwritten.
    pub fn push(
        &mut self,
        transition: Transition<A>,
    ) {
        let slot = self.inserted % self.capacity;
        if slot < self.slots.len() {
            self.slots[slot] = transition;
        } else {
            self.slots.push(transition);
        }
        self.inserted += 1;
    }

    /// The transition stored in the given ring slot, if that slot was written.
    pub fn get(
        &self,
        slot: usize,
    ) -> Option<&Transition<A>> {
        self.slots.get(slot)
    }

    /// Iterate over the valid transitions in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<A>> {
        self.slots.iter()
    }

    /// Draw `batch_size` slot indices uniformly at random, with replacement.
    pub fn random_indices<R: Rng + ?Sized>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        if self.is_empty() {
            return Err(Error::InsufficientData { batch_size });
        }
        let slots = Uniform::from(0..self.len());
        Ok((0..batch_size).map(|_| rng.sample(slots)).collect())
    }

    /// Sample a random batch of transitions from the buffer.
    ///
    /// Fails with [`Error::InsufficientData`] when the buffer is empty. The
    /// batch may contain the same transition more than once.
    pub fn random_batch<R: Rng + ?Sized>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<Batch<A>> {
        let (states, actions, rewards, next_states, terminated, truncated) = self
            .random_indices(batch_size, rng)?
            .into_iter()
            .map(|i| {
                let t = &self.slots[i];
                (
                    t.state.clone(),
                    t.action.clone(),
                    t.reward,
                    t.next_state.clone(),
                    t.terminated,
                    t.truncated,
                )
            })
            .unzip_n_vec();

        Ok(Batch {
            states,
            actions,
            rewards,
            next_states,
            terminated,
            truncated,
        })
    }
}
