#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Encode a textual configuration string into the vendor-specific IPMI
//! boot-options mailbox format and push it to a BMC, 16 bytes at a time.
//!
//! The crate implements:
//! - The mailbox buffer encoder (IANA prefix, 16-byte blocks, zero padding,
//!   filler blocks up to the mailbox capacity)
//! - A [`BlockTransport`] boundary that sends/reads one block at a time
//! - A concrete transport that shells out to `ipmitool` raw commands
//!
//! It exposes a small public API (`Mailbox`, the encoder functions, and a
//! few types) while keeping raw-command formatting details internal.

mod client;
mod debug;
mod error;
mod mailbox;
mod observe;
mod transport;

pub use crate::client::Mailbox;
pub use crate::error::{Error, Result};
pub use crate::mailbox::{
    decode, encode, encode_clear, Block, BLOCK_SIZE, FIRMWARE_SAFE_BLOCKS, IANA_PREFIX,
    PROTOCOL_MAX_BLOCKS,
};
pub use crate::transport::ipmitool::IpmitoolTransport;
pub use crate::transport::{BlockTransport, BmcTarget};
