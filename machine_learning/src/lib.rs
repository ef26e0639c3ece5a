pub mod app;
pub mod arch;
pub mod artifact;
pub mod dataset;
pub mod error;
pub mod handle;
pub mod initialization;
pub mod optimization;
pub mod training;

pub use error::{MlErr, Result};
pub use handle::ModelHandle;
