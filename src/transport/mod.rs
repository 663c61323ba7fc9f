use crate::error::Result;
use crate::mailbox::Block;

/// A synchronous transport that moves one mailbox block at a time.
///
/// Target and credentials are captured when the transport is constructed,
/// so callers only deal in block indices and block bytes.
pub trait BlockTransport {
    /// Write `block` at `index` in the remote mailbox.
    fn write_block(&self, index: u8, block: &Block) -> Result<()>;

    /// Read back the block at `index`.
    fn read_block(&self, index: u8) -> Result<Block>;
}

/// A BMC address plus pass-through credentials.
///
/// Credentials are never interpreted here; they are handed verbatim to the
/// underlying management tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmcTarget {
    /// BMC hostname or IP address.
    pub hostname: String,
    /// Username, if the BMC requires one.
    pub username: Option<String>,
    /// Password, if the BMC requires one.
    pub password: Option<String>,
}

impl BmcTarget {
    /// Target a BMC without credentials.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            username: None,
            password: None,
        }
    }

    /// Set the username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

pub(crate) mod ipmitool;
