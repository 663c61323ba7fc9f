pub(crate) fn enabled() -> bool {
    std::env::var("IPMI_MAILBOX_DEBUG")
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}

pub(crate) fn dump_output(command: &str, stdout: &[u8], stderr: &[u8]) {
    if !enabled() {
        return;
    }
    let mut out = String::with_capacity(command.len() + stdout.len() + stderr.len() + 32);
    out.push_str(command);
    out.push_str("\n  stdout: ");
    out.push_str(&String::from_utf8_lossy(stdout));
    out.push_str("\n  stderr: ");
    out.push_str(&String::from_utf8_lossy(stderr));

    #[cfg(feature = "tracing")]
    tracing::trace!("{out}");

    #[cfg(not(feature = "tracing"))]
    eprintln!("{out}");
}
