// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Failure while emitting a record.
///
/// Handlers surface their sink's failures unchanged; nothing in this crate
/// retries or swallows them.
#[derive(Debug, Error)]
pub enum HandleError {
    /// The sink refused the write.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The record could not be encoded as JSON.
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// The string did not name a [`Level`](crate::Level).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level `{0}`")]
pub struct ParseLevelError(pub(crate) String);
