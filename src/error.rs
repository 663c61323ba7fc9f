use std::io;

use thiserror::Error;

/// Result type used across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (spawning or talking to the management tool).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Payload contains non-ASCII characters.
    #[error("configuration payload must be ASCII")]
    NotAscii,

    /// Payload needs more blocks than the one-byte block selector can address.
    #[error("buffer would require {blocks} blocks, more than the protocol limit (255)")]
    BlockOverflow {
        /// Number of 16-byte blocks the buffer would occupy.
        blocks: usize,
    },

    /// Payload needs more blocks than the target mailbox can hold.
    #[error("buffer would require {blocks} blocks, more than max_blocks ({max_blocks})")]
    CapacityExceeded {
        /// Number of 16-byte blocks the buffer would occupy.
        blocks: usize,
        /// Caller-supplied mailbox capacity.
        max_blocks: usize,
    },

    /// Management tool produced output we could not interpret.
    #[error("protocol error: {0}")]
    Protocol(&'static str),

    /// Invalid caller-supplied argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The management tool exited with a failure status for one block.
    #[error("block {index} command failed with status {status:?}")]
    CommandFailed {
        /// Block index the command addressed.
        index: u8,
        /// Process exit code, if the tool exited normally.
        status: Option<i32>,
    },
}
