use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Any failure of the remote call: network, permission or backend.
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// The caller handed over input the store cannot submit.
    #[error("invalid input: {0}")]
    LocalInputInvalid(String),

    /// The owning session shut down while the call was in flight.
    #[error("operation cancelled")]
    Cancelled,
}

impl StoreError {
    pub(crate) fn remote(err: anyhow::Error) -> Self {
        StoreError::RemoteUnavailable(format!("{err:#}"))
    }
}
