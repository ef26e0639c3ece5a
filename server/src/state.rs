use std::{path::Path, sync::Arc};

use machine_learning::{ModelHandle, app};

use crate::error::Result;

/// The state shared by every request: the model loaded at startup.
///
/// The handle is never written after loading so handlers read it concurrently without locks.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelHandle>,
}

impl AppState {
    pub fn new(model: ModelHandle) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    /// Loads the model persisted at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let model = app::load(path)?;
        Ok(Self::new(model))
    }
}
