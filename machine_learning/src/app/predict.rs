use std::path::Path;

use log::info;

use crate::{ModelHandle, Result, artifact, training::TrainingConfig};

/// Loads the model persisted at `path`.
///
/// # Returns
/// A ready to evaluate handle, `ArtifactNotFound` if there's nothing at `path` or
/// `ArtifactFormat` if the file isn't a model artifact.
pub fn load(path: &Path) -> Result<ModelHandle> {
    let (model, params) = artifact::load(path)?;
    let handle = ModelHandle::from_params(model, params, &TrainingConfig::default())?;

    info!("model loaded from {}", path.display());
    Ok(handle)
}

/// Evaluates `handle` once per input row.
pub fn predict<I: AsRef<[f32]>>(handle: &ModelHandle, inputs: &[I]) -> Result<Vec<Vec<f32>>> {
    handle.predict(inputs)
}
