mod config;
mod trainer;

pub use config::TrainingConfig;
pub use trainer::Trainer;
