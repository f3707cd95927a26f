use {
    crate::error::{
        Error,
        Result,
    },
    candle_core::{
        DType,
        Device,
        Module,
        Tensor,
        Var,
    },
    candle_nn::{
        func,
        linear,
        sequential::seq,
        Activation,
        Sequential,
        VarBuilder,
        VarMap,
    },
    std::{
        collections::BTreeMap,
        path::Path,
    },
};

/// A named snapshot of every parameter of an approximator.
pub type Parameters = BTreeMap<String, Tensor>;

/// A differentiable function approximator as seen by the agents.
///
/// Agents only evaluate approximators, read and write their parameters, and
/// hand their variables to an optimizer. How the mapping is computed is up to
/// the implementation.
pub trait Approximator {
    fn forward(
        &self,
        xs: &Tensor,
    ) -> Result<Tensor>;

    /// A copy of the current parameters. Later updates do not show up in it.
    fn parameters(&self) -> Result<Parameters>;

    /// Overwrite parameters by name. Every name must exist with the same shape.
    fn set_parameters(
        &mut self,
        parameters: &Parameters,
    ) -> Result<()>;

    fn save(
        &self,
        path: &Path,
    ) -> Result<()>;

    fn load(
        &mut self,
        path: &Path,
    ) -> Result<()>;
}

/// The output layer of an [`Mlp`].
#[derive(Clone, Debug)]
pub enum Head {
    /// Unbounded outputs, used for value estimates.
    Linear,
    /// `tanh` outputs mapped affinely onto `[low, high]` per dimension, used
    /// for bounded actions.
    Bounded { low: Vec<f64>, high: Vec<f64> },
}

/// A fully connected network with ReLU activations between the layers.
///
/// Every network owns its own [`VarMap`], so a live network and its target
/// never share storage.
pub struct Mlp {
    varmap: VarMap,
    network: Sequential,
}

impl Mlp {
    /// Build a network with layer sizes `dims`, e.g. `[3, 256, 256, 1]`.
    pub fn new(
        device: &Device,
        dims: &[usize],
        head: Head,
    ) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F64, device);

        let n_layers = dims.len().saturating_sub(1);
        let mut network = seq();
        for (i, pair) in dims.windows(2).enumerate() {
            network = network.add(linear(pair[0], pair[1], vb.pp(format!("fc{i}")))?);
            if i + 1 < n_layers {
                network = network.add(Activation::Relu);
            }
        }
        if let Head::Bounded { low, high } = head {
            let half_range: Vec<f64> = low.iter().zip(&high).map(|(lo, hi)| (hi - lo) / 2.0).collect();
            let middle: Vec<f64> = low.iter().zip(&high).map(|(lo, hi)| (hi + lo) / 2.0).collect();
            let half_range = Tensor::new(half_range.as_slice(), device)?;
            let middle = Tensor::new(middle.as_slice(), device)?;
            network = network.add(func(move |xs| {
                xs.tanh()?.broadcast_mul(&half_range)?.broadcast_add(&middle)
            }));
        }

        Ok(Self {
            varmap,
            network,
        })
    }

    /// The variables an optimizer should update.
    pub fn trainable_vars(&self) -> Vec<Var> {
        self.varmap.all_vars()
    }
}

impl Approximator for Mlp {
    fn forward(
        &self,
        xs: &Tensor,
    ) -> Result<Tensor> {
        Ok(self.network.forward(xs)?)
    }

    fn parameters(&self) -> Result<Parameters> {
        let data = self
            .varmap
            .data()
            .lock()
            .map_err(|_| Error::PoisonedParameters)?;
        data.iter()
            .map(|(name, var)| Ok((name.clone(), var.as_tensor().copy()?)))
            .collect()
    }

    fn set_parameters(
        &mut self,
        parameters: &Parameters,
    ) -> Result<()> {
        let data = self
            .varmap
            .data()
            .lock()
            .map_err(|_| Error::PoisonedParameters)?;
        for (name, value) in parameters {
            let var = data
                .get(name)
                .ok_or_else(|| Error::MissingParameter(name.clone()))?;
            if var.dims() != value.dims() {
                return Err(Error::ParameterShape {
                    name: name.clone(),
                    live: value.dims().to_vec(),
                    target: var.dims().to_vec(),
                });
            }
            var.set(value)?;
        }
        Ok(())
    }

    fn save(
        &self,
        path: &Path,
    ) -> Result<()> {
        Ok(self.varmap.save(path)?)
    }

    fn load(
        &mut self,
        path: &Path,
    ) -> Result<()> {
        Ok(self.varmap.load(path)?)
    }
}
