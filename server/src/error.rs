use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use machine_learning::MlErr;

/// The result type used in the entire server module.
pub type Result<T> = std::result::Result<T, ServerErr>;

/// The server module's error type.
#[derive(Debug)]
pub enum ServerErr {
    Config(String),
    Model(MlErr),
    Io(io::Error),
}

impl Display for ServerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerErr::Config(msg) => write!(f, "Invalid server config: {msg}"),
            ServerErr::Model(e) => write!(f, "Model error: {e}"),
            ServerErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for ServerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServerErr::Config(_) => None,
            ServerErr::Model(e) => Some(e),
            ServerErr::Io(e) => Some(e),
        }
    }
}

impl From<MlErr> for ServerErr {
    fn from(value: MlErr) -> Self {
        Self::Model(value)
    }
}

impl From<io::Error> for ServerErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl IntoResponse for ServerErr {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
