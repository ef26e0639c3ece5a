use std::{env, fmt::Display, num::NonZeroUsize, str::FromStr};

use crate::{MlErr, Result};

pub const DEFAULT_EPOCHS: usize = 500;
pub const DEFAULT_LEARNING_RATE: f32 = 0.01;
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// The hyper-parameters used when building and fitting a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f32,
    pub batch_size: NonZeroUsize,
    /// Seeds both the parameter initialization and the shuffling, `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            learning_rate: DEFAULT_LEARNING_RATE,
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Reads the config from the `EPOCHS`, `LEARNING_RATE`, `BATCH_SIZE` and `SEED` environment
    /// variables, falling back to the defaults for the missing ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reading the variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Ok(Self {
            epochs: parse(&lookup, "EPOCHS")?.unwrap_or(default.epochs),
            learning_rate: parse(&lookup, "LEARNING_RATE")?.unwrap_or(default.learning_rate),
            batch_size: parse(&lookup, "BATCH_SIZE")?.unwrap_or(default.batch_size),
            seed: parse(&lookup, "SEED")?,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| MlErr::InvalidConfig(format!("{key}={raw}: {e}")))
        })
        .transpose()
}
