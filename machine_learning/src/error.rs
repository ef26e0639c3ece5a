use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyDataset,
    InvalidInit(String),
    InvalidConfig(String),
    ArtifactNotFound {
        path: PathBuf,
    },
    ArtifactFormat {
        path: PathBuf,
        reason: String,
    },
    Io(io::Error),
}

impl MlErr {
    /// Builds an `ArtifactFormat` error for the artifact at `path`.
    pub(crate) fn format<P, R>(path: P, reason: R) -> Self
    where
        P: Into<PathBuf>,
        R: Display,
    {
        Self::ArtifactFormat {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::EmptyDataset => write!(f, "Tried to train with an empty dataset"),
            MlErr::InvalidInit(msg) => write!(f, "Failed to initialize parameters: {msg}"),
            MlErr::InvalidConfig(msg) => write!(f, "Invalid config: {msg}"),
            MlErr::ArtifactNotFound { path } => {
                write!(f, "No model artifact found at {}", path.display())
            }
            MlErr::ArtifactFormat { path, reason } => {
                write!(f, "Invalid model artifact at {}: {reason}", path.display())
            }
            MlErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
