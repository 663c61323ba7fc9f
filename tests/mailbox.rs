use std::sync::Mutex;

use ipmi_mailbox::{
    decode, encode, encode_clear, Block, BlockTransport, Error, Mailbox, Result, BLOCK_SIZE,
    IANA_PREFIX, PROTOCOL_MAX_BLOCKS,
};

#[test]
fn encode_hello_into_sixteen_block_mailbox() {
    let blocks = encode("hello", 16).expect("encode");

    assert_eq!(blocks.len(), 16);
    assert_eq!(
        blocks[0].as_bytes(),
        &[
            0x02, 0x00, 0x00, 0x68, 0x65, 0x6C, 0x6C, 0x6F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ]
    );
    assert!(blocks[1..].iter().all(Block::is_filler));
}

#[test]
fn encode_returns_exactly_max_blocks_whenever_the_payload_fits() {
    for (len, max_blocks) in [(0usize, 1usize), (13, 1), (14, 2), (100, 7), (100, 255)] {
        let payload = "k".repeat(len);
        let blocks = encode(&payload, max_blocks).expect("encode");
        assert_eq!(blocks.len(), max_blocks, "payload len {len}");
        assert!(blocks.iter().all(|b| b.as_bytes().len() == BLOCK_SIZE));
    }
}

#[test]
fn encode_fails_on_protocol_overflow_before_capacity() {
    // 4078 payload bytes + 3 prefix bytes = 4081 bytes = 256 blocks.
    let payload = "x".repeat(4078);
    let err = encode(&payload, PROTOCOL_MAX_BLOCKS + 50).expect_err("expected error");
    assert!(matches!(err, Error::BlockOverflow { blocks: 256 }));
}

#[test]
fn encode_fails_when_mailbox_is_too_small() {
    // 81 buffer bytes need 6 blocks.
    let payload = "x".repeat(78);
    let err = encode(&payload, 5).expect_err("expected error");
    assert!(matches!(
        err,
        Error::CapacityExceeded {
            blocks: 6,
            max_blocks: 5
        }
    ));
}

#[test]
fn encode_six_blocks_into_ten_block_mailbox() {
    let payload = "x".repeat(78);
    let blocks = encode(&payload, 10).expect("encode");

    assert_eq!(blocks.len(), 10);
    assert!(blocks[..6].iter().all(|b| !b.is_filler()));
    assert!(blocks[6..].iter().all(Block::is_filler));
}

#[test]
fn encode_clear_always_succeeds() {
    for max_blocks in [0usize, 1, 5, 16, 255] {
        let blocks = encode_clear(max_blocks);
        assert_eq!(blocks.len(), max_blocks);
        assert!(blocks.iter().all(Block::is_filler));
    }
}

#[test]
fn round_trip_recovers_the_payload() {
    let payload = "petitboot,network=dhcp bootdev=first";
    let blocks = encode(payload, 8).expect("encode");

    assert_eq!(decode(&blocks).expect("decode"), payload);
    assert_eq!(&blocks[0].as_bytes()[..3], &IANA_PREFIX);
}

/// Records every call so ordering and abort behavior can be asserted.
struct MockTransport {
    writes: Mutex<Vec<u8>>,
    reads: Mutex<Vec<u8>>,
    fail_write_at: Option<u8>,
}

impl BlockTransport for &MockTransport {
    fn write_block(&self, index: u8, _block: &Block) -> Result<()> {
        if self.fail_write_at == Some(index) {
            return Err(Error::CommandFailed {
                index,
                status: Some(1),
            });
        }
        self.writes.lock().expect("lock").push(index);
        Ok(())
    }

    fn read_block(&self, index: u8) -> Result<Block> {
        self.reads.lock().expect("lock").push(index);
        Ok(Block::filler())
    }
}

#[test]
fn write_workflow_transmits_in_strictly_increasing_index_order() {
    static TRANSPORT: MockTransport = MockTransport {
        writes: Mutex::new(Vec::new()),
        reads: Mutex::new(Vec::new()),
        fail_write_at: None,
    };

    let mailbox = Mailbox::new(&TRANSPORT);
    mailbox
        .write_config("some configuration text", 6)
        .expect("write_config");

    let writes = TRANSPORT.writes.lock().expect("lock");
    assert_eq!(*writes, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn write_workflow_aborts_on_first_transport_error() {
    static TRANSPORT: MockTransport = MockTransport {
        writes: Mutex::new(Vec::new()),
        reads: Mutex::new(Vec::new()),
        fail_write_at: Some(3),
    };

    let mailbox = Mailbox::new(&TRANSPORT);
    let err = mailbox.clear(8).expect_err("expected error");

    assert!(matches!(err, Error::CommandFailed { index: 3, .. }));
    assert_eq!(*TRANSPORT.writes.lock().expect("lock"), vec![0, 1, 2]);
}

#[test]
fn dump_reads_every_requested_index_in_order() {
    static TRANSPORT: MockTransport = MockTransport {
        writes: Mutex::new(Vec::new()),
        reads: Mutex::new(Vec::new()),
        fail_write_at: None,
    };

    let mailbox = Mailbox::new(&TRANSPORT);
    let blocks = mailbox.dump(4).expect("dump");

    assert_eq!(blocks.len(), 4);
    assert_eq!(*TRANSPORT.reads.lock().expect("lock"), vec![0, 1, 2, 3]);
}
