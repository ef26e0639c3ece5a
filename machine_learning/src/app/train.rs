use std::path::Path;

use log::info;

use crate::{
    ModelHandle, Result,
    arch::{Sequential, layers::Layer},
    artifact,
    training::TrainingConfig,
};

/// Builds an untrained single neuron model: one dense layer with one input and one output,
/// fitted with gradient descent over the mean squared error.
pub fn build_topology() -> Result<ModelHandle> {
    build_topology_with(&TrainingConfig::default())
}

/// Same as `build_topology` but with the given training setup.
pub fn build_topology_with(config: &TrainingConfig) -> Result<ModelHandle> {
    let model = Sequential::new([Layer::dense((1, 1))]);
    ModelHandle::init(model, config)
}

/// Returns the samples of `y = 3x + 1` the model is fitted to.
pub fn get_training_data() -> (Vec<f32>, Vec<f32>) {
    let xs = vec![-1.0, 0.0, 1.0, 2.0, 3.0, 4.0];
    let ys = vec![-2.0, 1.0, 4.0, 7.0, 10.0, 13.0];
    (xs, ys)
}

/// Fits `handle` to the pairs `(xs[i], ys[i])`.
///
/// # Returns
/// The loss of each epoch.
pub fn fit(handle: &mut ModelHandle, xs: &[f32], ys: &[f32], epochs: usize) -> Result<Vec<f32>> {
    let losses = handle.fit(xs, ys, epochs)?;

    match losses.last() {
        Some(loss) => info!("model trained successfully: {epochs} epochs, final loss {loss}"),
        None => info!("model trained successfully: 0 epochs"),
    }

    Ok(losses)
}

/// Writes the parameters of `handle` to `path`.
pub fn persist(handle: &ModelHandle, path: &Path) -> Result<()> {
    artifact::save(handle.model(), handle.params(), path)?;
    info!("model saved to {}", path.display());
    Ok(())
}
