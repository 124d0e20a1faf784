//! MCMC chains: burn-in removal and cold-chain flattening.

use std::path::Path;

use emri_core::EmriError;
use ndarray::{Array2, ArrayD, Axis, Slice};
use tracing::debug;

use crate::dataset::{load_array, DatasetFormat};

/// Dataset path of the chain in an eryn backend file.
pub const ERYN_CHAIN_KEY: &str = "mcmc/chain/model_0";

/// Flattens a chain to `(samples, params)` after discarding `burn_in`
/// leading iterations.
///
/// Accepted layouts are `(samples, params)`,
/// `(iterations, temps, walkers, params)` and
/// `(iterations, temps, walkers, leaves, params)`. For tempered layouts only
/// the cold chain (temperature index 0) is kept.
pub fn cold_chain(chain: ArrayD<f64>, burn_in: usize) -> Result<Array2<f64>, EmriError> {
    let rank = chain.ndim();
    if !matches!(rank, 2 | 4 | 5) {
        return Err(EmriError::shape(
            "chain-rank",
            "(samples, params) or (iterations, temps, walkers, [leaves,] params)",
            format!("{:?}", chain.shape()),
        ));
    }
    let iterations = chain.len_of(Axis(0));
    if burn_in >= iterations {
        return Err(EmriError::shape(
            "chain-burn-in",
            format!("> {burn_in} iterations"),
            iterations,
        ));
    }
    let params = chain.shape()[rank - 1];
    let kept = chain.slice_axis(Axis(0), Slice::from(burn_in..));
    let cold = if rank == 2 {
        kept
    } else {
        kept.index_axis_move(Axis(1), 0)
    };
    let values: Vec<f64> = cold.iter().copied().collect();
    let rows = if params == 0 { 0 } else { values.len() / params };
    Array2::from_shape_vec((rows, params), values)
        .map_err(|err| EmriError::shape("chain-flatten", rows * params, err.to_string()))
}

/// Loads a chain file (`.npy`, `.npz`/`.json` member `key`, or an eryn HDF5
/// backend) and flattens its cold chain.
pub fn load_chain(path: &Path, key: Option<&str>, burn_in: usize) -> Result<Array2<f64>, EmriError> {
    let key = match (key, DatasetFormat::from_path(path)?) {
        (Some(key), _) => key,
        (None, DatasetFormat::Hdf5) => ERYN_CHAIN_KEY,
        (None, _) => "chain",
    };
    let raw = load_array(path, key)?;
    let samples = cold_chain(raw, burn_in)?;
    debug!(path = %path.display(), samples = samples.nrows(), burn_in, "loaded chain");
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    #[test]
    fn tempered_chain_keeps_cold_temperature() {
        // (iterations=3, temps=2, walkers=2, params=2), value encodes indices
        let chain = Array::from_shape_fn(IxDyn(&[3, 2, 2, 2]), |idx| {
            (idx[0] * 1000 + idx[1] * 100 + idx[2] * 10 + idx[3]) as f64
        });
        let samples = cold_chain(chain, 1).unwrap();
        assert_eq!(samples.dim(), (4, 2));
        assert!(samples.iter().all(|v| ((*v as usize) / 100) % 10 == 0));
        assert_eq!(samples[[0, 0]], 1000.0);
        assert_eq!(samples[[3, 1]], 2011.0);
    }

    #[test]
    fn burn_in_must_leave_samples() {
        let chain = ArrayD::zeros(IxDyn(&[2, 3]));
        assert!(cold_chain(chain, 2).is_err());
    }
}
