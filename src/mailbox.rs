use core::fmt;

use crate::error::{Error, Result};

/// Atomic transfer unit of the mailbox protocol, in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Hard addressing limit: the raw command's block selector is one byte.
pub const PROTOCOL_MAX_BLOCKS: usize = 255;

/// Largest block count known to work on every BMC; beyond this some
/// firmware silently truncates the mailbox.
pub const FIRMWARE_SAFE_BLOCKS: usize = 5;

/// IBM's IANA enterprise number (2) in the 3-byte little-endian layout the
/// mailbox format requires, prefixed to every configuration payload.
pub const IANA_PREFIX: [u8; 3] = [0x02, 0x00, 0x00];

/// A single 16-byte mailbox block.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Block {
    bytes: [u8; BLOCK_SIZE],
}

impl Block {
    /// Wrap raw block bytes (e.g. read back from the BMC).
    pub fn from_bytes(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self { bytes }
    }

    /// An all-zero filler block.
    pub fn filler() -> Self {
        Self {
            bytes: [0u8; BLOCK_SIZE],
        }
    }

    /// The 16 block bytes.
    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.bytes
    }

    /// True if every byte is zero.
    pub fn is_filler(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block(")?;
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// Encode `payload` into exactly `max_blocks` mailbox blocks.
///
/// The payload is prefixed with [`IANA_PREFIX`], split into 16-byte blocks
/// (the last data block zero-padded on the right), and followed by all-zero
/// filler blocks so stale data beyond the payload is overwritten. On success
/// the returned sequence always has length `max_blocks`.
///
/// Fails without producing any blocks when the payload is not ASCII, when it
/// would need more than [`PROTOCOL_MAX_BLOCKS`] blocks, or when it would
/// need more than `max_blocks`. Payloads above [`FIRMWARE_SAFE_BLOCKS`]
/// blocks encode fine but emit an advisory warning.
pub fn encode(payload: &str, max_blocks: usize) -> Result<Vec<Block>> {
    if !payload.is_ascii() {
        return Err(Error::NotAscii);
    }

    let mut raw = Vec::with_capacity(IANA_PREFIX.len() + payload.len());
    raw.extend_from_slice(&IANA_PREFIX);
    raw.extend_from_slice(payload.as_bytes());

    let n_blocks = raw.len().div_ceil(BLOCK_SIZE);

    if n_blocks > PROTOCOL_MAX_BLOCKS {
        return Err(Error::BlockOverflow { blocks: n_blocks });
    }
    if n_blocks > max_blocks {
        return Err(Error::CapacityExceeded {
            blocks: n_blocks,
            max_blocks,
        });
    }
    if n_blocks > FIRMWARE_SAFE_BLOCKS {
        crate::observe::record_capacity_warning(n_blocks);
    }

    let mut blocks = Vec::with_capacity(max_blocks);
    for chunk in raw.chunks(BLOCK_SIZE) {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[..chunk.len()].copy_from_slice(chunk);
        blocks.push(Block { bytes });
    }
    blocks.resize(max_blocks, Block::filler());

    Ok(blocks)
}

/// Encode an empty mailbox: `max_blocks` all-zero filler blocks.
pub fn encode_clear(max_blocks: usize) -> Vec<Block> {
    vec![Block::filler(); max_blocks]
}

/// Recover the configuration payload from blocks read back from a mailbox.
///
/// Verifies the [`IANA_PREFIX`], strips trailing zero padding, and returns
/// the ASCII payload. A payload that itself ends in NUL bytes loses them
/// here; the format cannot distinguish them from padding.
pub fn decode(blocks: &[Block]) -> Result<String> {
    let mut raw = Vec::with_capacity(blocks.len() * BLOCK_SIZE);
    for block in blocks {
        raw.extend_from_slice(block.as_bytes());
    }

    if raw.len() < IANA_PREFIX.len() || raw[..IANA_PREFIX.len()] != IANA_PREFIX {
        return Err(Error::Protocol("mailbox does not start with the IANA prefix"));
    }

    let payload = &raw[IANA_PREFIX.len()..];
    let end = payload
        .iter()
        .rposition(|b| *b != 0)
        .map_or(0, |pos| pos + 1);
    let payload = &payload[..end];

    if !payload.is_ascii() {
        return Err(Error::Protocol("mailbox payload is not ASCII"));
    }

    // ASCII checked above, so UTF-8 conversion cannot fail.
    String::from_utf8(payload.to_vec()).map_err(|_| Error::Protocol("mailbox payload is not ASCII"))
}
