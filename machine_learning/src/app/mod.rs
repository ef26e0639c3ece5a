//! The trainer and predictor operations the binaries and the server are built upon.

mod predict;
mod train;

use std::path::{Path, PathBuf};

pub use predict::{load, predict};
pub use train::{build_topology, build_topology_with, fit, get_training_data, persist};

pub const MODEL_DIR: &str = "model";
pub const MODEL_FILENAME: &str = "my_best_model.safetensors";

/// Returns the path the fitted model is persisted to and loaded from, relative to the working
/// directory.
pub fn model_path() -> PathBuf {
    Path::new(MODEL_DIR).join(MODEL_FILENAME)
}
