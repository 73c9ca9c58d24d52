use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures talking to a spell-checking backend.
///
/// None of these ever reach the user during a check: callers treat every
/// variant as "no typo" and keep going.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("spell-checking backend `{program}` is unavailable")]
    Unavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to exchange data with the spell-checking backend")]
    Io(#[from] io::Error),

    #[error("spell-checking backend `{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

pub type BackendResult<T> = Result<T, BackendError>;
