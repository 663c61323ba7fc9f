use std::time::Instant;

use crate::error::{Error, Result};
use crate::mailbox::{self, Block, PROTOCOL_MAX_BLOCKS};
use crate::transport::BlockTransport;

/// High-level mailbox operations over a [`BlockTransport`].
///
/// `Mailbox` owns the transport and runs the encode-then-send workflows:
/// blocks go out one at a time in strictly increasing index order, and the
/// first transport failure aborts the rest of the transfer so the operator
/// knows exactly how much of the mailbox was written.
pub struct Mailbox {
    transport: Box<dyn BlockTransport>,
}

impl Mailbox {
    /// Build a mailbox client over `transport`.
    pub fn new(transport: impl BlockTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Encode `payload` and write it to the mailbox.
    ///
    /// The whole buffer is validated before any block is sent; encoder
    /// errors leave the remote mailbox untouched. On success exactly
    /// `max_blocks` blocks were written (payload blocks followed by filler
    /// overwriting any stale data).
    pub fn write_config(&self, payload: &str, max_blocks: usize) -> Result<()> {
        let blocks = mailbox::encode(payload, max_blocks)?;
        self.send_all(&blocks)
    }

    /// Overwrite the mailbox with `max_blocks` all-zero blocks.
    pub fn clear(&self, max_blocks: usize) -> Result<()> {
        self.send_all(&mailbox::encode_clear(max_blocks))
    }

    /// Read back the first `n_blocks` blocks, in index order.
    pub fn dump(&self, n_blocks: usize) -> Result<Vec<Block>> {
        if n_blocks > PROTOCOL_MAX_BLOCKS {
            return Err(Error::InvalidArgument(
                "cannot read more blocks than the protocol can address (255)",
            ));
        }

        let mut blocks = Vec::with_capacity(n_blocks);
        for index in 0..n_blocks as u8 {
            let start = Instant::now();
            let result = self.transport.read_block(index);
            crate::observe::record_block("read", index, start.elapsed(), &result);
            blocks.push(result?);
        }
        Ok(blocks)
    }

    fn send_all(&self, blocks: &[Block]) -> Result<()> {
        if blocks.len() > PROTOCOL_MAX_BLOCKS {
            return Err(Error::InvalidArgument(
                "cannot write more blocks than the protocol can address (255)",
            ));
        }

        for (index, block) in blocks.iter().enumerate() {
            let index = index as u8;
            let start = Instant::now();
            let result = self.transport.write_block(index, block);
            crate::observe::record_block("write", index, start.elapsed(), &result);
            result?;
        }
        Ok(())
    }
}
