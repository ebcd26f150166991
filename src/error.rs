use std::fmt;

/// A rejected call at the host seam (bookmark store or persistent storage).
#[derive(Debug, Clone)]
pub struct HostError(pub String);

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for HostError {}

/// Errors surfaced by the service layer. Validation errors abort before any
/// host mutation; host errors are raised after an attempted mutation.
#[derive(Debug, Clone)]
pub enum Error {
    Validation(String),
    Host(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "{}", msg),
            Error::Host(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<HostError> for Error {
    fn from(e: HostError) -> Self {
        Error::Host(e.0)
    }
}
