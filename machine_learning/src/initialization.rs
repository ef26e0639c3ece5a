use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::{
    MlErr, Result,
    arch::{Model, Sequential},
};

/// Returns the Xavier (Glorot) uniform distribution for a `fan_in` by `fan_out` kernel, that is
/// `U(-sqrt(6 / (fan_in + fan_out)), sqrt(6 / (fan_in + fan_out)))`.
pub fn xavier_uniform(fan_in: usize, fan_out: usize) -> Result<Uniform<f32>> {
    let range = (6. / (fan_in + fan_out) as f32).sqrt();
    Uniform::new(-range, range).map_err(|e| MlErr::InvalidInit(format!("{fan_in}x{fan_out}: {e}")))
}

/// Generates the initial parameters of `model` following its layout: for every layer, its
/// kernel sampled from `xavier_uniform` followed by its biases set to zero.
///
/// # Arguments
/// * `model` - The model whose parameters are generated.
/// * `rng` - The random number generator used for the kernels.
///
/// # Returns
/// A flat parameter buffer of `model.size()` values.
pub fn init_params<R: Rng + ?Sized>(model: &Sequential, rng: &mut R) -> Result<Vec<f32>> {
    let mut params = Vec::with_capacity(model.size());

    for layer in model.layers() {
        let (fan_in, fan_out) = layer.dim();
        let kernel = xavier_uniform(fan_in, fan_out)?;

        params.extend((0..fan_in * fan_out).map(|_| kernel.sample(&mut *rng)));
        params.resize(params.len() + fan_out, 0.);
    }

    Ok(params)
}
