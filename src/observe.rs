use std::time::Duration;

#[cfg(feature = "metrics")]
use crate::error::Error;
use crate::error::Result;
use crate::mailbox::FIRMWARE_SAFE_BLOCKS;

pub(crate) fn record_block<T>(op: &'static str, index: u8, elapsed: Duration, result: &Result<T>) {
    let _ = (op, index, elapsed, result);

    #[cfg(feature = "metrics")]
    {
        let outcome = if result.is_ok() { "ok" } else { "err" };
        metrics::counter!("mailbox_blocks_total", "op" => op, "outcome" => outcome).increment(1);
        metrics::histogram!("mailbox_block_seconds", "op" => op).record(elapsed.as_secs_f64());
        if let Err(err) = result {
            metrics::counter!("mailbox_block_errors_total", "op" => op, "kind" => error_kind(err))
                .increment(1);
        }
    }

    #[cfg(feature = "tracing")]
    match result {
        Ok(_) => tracing::debug!(
            op,
            index,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "mailbox block ok"
        ),
        Err(err) => tracing::warn!(
            op,
            index,
            error = %err,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "mailbox block failed"
        ),
    }
}

pub(crate) fn record_capacity_warning(n_blocks: usize) {
    let _ = n_blocks;

    #[cfg(feature = "metrics")]
    metrics::counter!("mailbox_capacity_warnings_total").increment(1);

    #[cfg(feature = "tracing")]
    tracing::warn!(
        n_blocks,
        limit = FIRMWARE_SAFE_BLOCKS,
        "buffer requires more blocks than some BMCs support"
    );

    #[cfg(not(feature = "tracing"))]
    eprintln!(
        "Warning: buffer would require {n_blocks} blocks, which is more than some BMCs \
         support ({FIRMWARE_SAFE_BLOCKS})"
    );
}

#[cfg(feature = "metrics")]
fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::Io(_) => "io",
        Error::NotAscii => "not_ascii",
        Error::BlockOverflow { .. } => "block_overflow",
        Error::CapacityExceeded { .. } => "capacity_exceeded",
        Error::Protocol(_) => "protocol",
        Error::InvalidArgument(_) => "invalid_argument",
        Error::CommandFailed { .. } => "command_failed",
    }
}
