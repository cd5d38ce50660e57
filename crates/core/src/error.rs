use thiserror::Error;

/// Errors raised while registering instruments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Instrument already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid instrument name: {0:?}")]
    InvalidName(String),
}
