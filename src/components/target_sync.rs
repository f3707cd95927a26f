use {
    super::approximator::{
        Approximator,
        Parameters,
    },
    crate::error::{
        Error,
        Result,
    },
    tracing::info,
};

/// Blend the live parameters into the target parameters (Polyak averaging).
///
/// Every target parameter becomes `tau * live + (1 - tau) * target`. With
/// `tau = 1.0` this copies the live network, but use [`hard_update`] for that
/// since it does not go through floating point arithmetic.
pub fn soft_update<A: Approximator>(
    target: &mut A,
    live: &A,
    tau: f64,
) -> Result<()> {
    let current = target.parameters()?;
    let blended = live
        .parameters()?
        .into_iter()
        .map(|(name, live_value)| {
            let target_value = current
                .get(&name)
                .ok_or_else(|| Error::MissingParameter(name.clone()))?;
            if target_value.dims() != live_value.dims() {
                return Err(Error::ParameterShape {
                    live: live_value.dims().to_vec(),
                    target: target_value.dims().to_vec(),
                    name,
                });
            }
            let value = (live_value.affine(tau, 0.0)? + target_value.affine(1.0 - tau, 0.0)?)?;
            Ok((name, value))
        })
        .collect::<Result<Parameters>>()?;
    target.set_parameters(&blended)
}

/// Overwrite the target parameters with an exact copy of the live parameters.
pub fn hard_update<A: Approximator>(
    target: &mut A,
    live: &A,
) -> Result<()> {
    info!("Copying live parameters into the target network");
    target.set_parameters(&live.parameters()?)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::components::approximator::{
            Head,
            Mlp,
        },
        candle_core::Device,
    };

    fn flat(net: &Mlp) -> Vec<f64> {
        net.parameters()
            .unwrap()
            .values()
            .flat_map(|t| t.flatten_all().unwrap().to_vec1::<f64>().unwrap())
            .collect()
    }

    fn pair() -> (Mlp, Mlp) {
        let device = Device::Cpu;
        (
            Mlp::new(&device, &[3, 8, 2], Head::Linear).unwrap(),
            Mlp::new(&device, &[3, 8, 2], Head::Linear).unwrap(),
        )
    }

    #[test]
    fn soft_update_contracts_towards_live() {
        let (live, mut target) = pair();
        let tau = 0.1;
        let live_values = flat(&live);
        let before = flat(&target);

        soft_update(&mut target, &live, tau).unwrap();
        let after = flat(&target);

        for ((l, b), a) in live_values.iter().zip(&before).zip(&after) {
            assert!((a - l).abs() <= (1.0 - tau) * (b - l).abs() + 1e-12);
        }
        assert_eq!(flat(&live), live_values);
    }

    #[test]
    fn repeated_soft_updates_converge_to_live() {
        let (live, mut target) = pair();
        for _ in 0..3_000 {
            soft_update(&mut target, &live, 0.01).unwrap();
        }
        for (l, t) in flat(&live).iter().zip(flat(&target)) {
            assert!((l - t).abs() < 1e-9);
        }
    }

    #[test]
    fn hard_update_is_bit_identical() {
        let (live, mut target) = pair();
        assert_ne!(flat(&live), flat(&target));
        hard_update(&mut target, &live).unwrap();
        let (l, t) = (flat(&live), flat(&target));
        assert!(l.iter().zip(&t).all(|(a, b)| a.to_bits() == b.to_bits()));
    }

    #[test]
    fn structurally_different_networks_cannot_sync() {
        let device = Device::Cpu;
        let live = Mlp::new(&device, &[3, 8, 2], Head::Linear).unwrap();
        let mut target = Mlp::new(&device, &[3, 8, 8, 2], Head::Linear).unwrap();
        assert!(soft_update(&mut target, &live, 0.5).is_err());
    }
}
