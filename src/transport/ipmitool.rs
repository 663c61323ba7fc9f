use std::process::Command;

use crate::debug;
use crate::error::{Error, Result};
use crate::mailbox::{Block, BLOCK_SIZE};
use crate::transport::{BlockTransport, BmcTarget};

// Chassis NetFn raw framing for the boot-options mailbox (parameter 7).
const SET_BOOT_OPTIONS: [&str; 4] = ["raw", "0x00", "0x08", "0x07"];
const GET_BOOT_OPTIONS: [&str; 4] = ["raw", "0x00", "0x09", "0x07"];

/// A [`BlockTransport`] that invokes `ipmitool` over the lanplus interface,
/// one process per block.
///
/// Commands are built as an explicit argument vector; hex rendering of the
/// block bytes happens only here, at the process boundary.
pub struct IpmitoolTransport {
    target: BmcTarget,
    program: String,
    dry_run: bool,
}

impl IpmitoolTransport {
    /// Create a transport talking to `target` via the `ipmitool` binary on
    /// `PATH`.
    pub fn new(target: BmcTarget) -> Self {
        Self {
            target,
            program: "ipmitool".to_string(),
            dry_run: false,
        }
    }

    /// Use a specific `ipmitool` binary instead of searching `PATH`.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Print each command instead of executing it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn base_args(&self) -> Vec<String> {
        let mut args = vec![
            "-I".to_string(),
            "lanplus".to_string(),
            "-H".to_string(),
            self.target.hostname.clone(),
        ];
        if let Some(username) = &self.target.username {
            args.push("-U".to_string());
            args.push(username.clone());
        }
        if let Some(password) = &self.target.password {
            args.push("-P".to_string());
            args.push(password.clone());
        }
        args
    }

    fn write_args(&self, index: u8, block: &Block) -> Vec<String> {
        let mut args = self.base_args();
        args.extend(SET_BOOT_OPTIONS.iter().map(|s| s.to_string()));
        args.push(format!("{index:#04x}"));
        for byte in block.as_bytes() {
            args.push(format!("{byte:#04x}"));
        }
        args
    }

    fn read_args(&self, index: u8) -> Vec<String> {
        let mut args = self.base_args();
        args.extend(GET_BOOT_OPTIONS.iter().map(|s| s.to_string()));
        args.push(format!("{index:#04x}"));
        args.push("0x00".to_string());
        args
    }

    fn render(&self, args: &[String]) -> String {
        let mut line = self.program.clone();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn run(&self, index: u8, args: &[String]) -> Result<Vec<u8>> {
        if self.dry_run {
            println!("{}", self.render(args));
            return Ok(Vec::new());
        }

        let output = Command::new(&self.program).args(args).output()?;
        debug::dump_output(&self.render(args), &output.stdout, &output.stderr);

        if !output.status.success() {
            return Err(Error::CommandFailed {
                index,
                status: output.status.code(),
            });
        }
        Ok(output.stdout)
    }
}

impl BlockTransport for IpmitoolTransport {
    fn write_block(&self, index: u8, block: &Block) -> Result<()> {
        self.run(index, &self.write_args(index, block))?;
        Ok(())
    }

    fn read_block(&self, index: u8) -> Result<Block> {
        let stdout = self.run(index, &self.read_args(index))?;
        if self.dry_run {
            return Ok(Block::filler());
        }
        parse_read_output(&stdout)
    }
}

/// Parse `ipmitool raw` output into a block.
///
/// ipmitool prints the response data as whitespace-separated hex bytes,
/// possibly wrapped over several lines. The response echoes the parameter
/// version and selector before the block data, so the block is the final 16
/// bytes.
fn parse_read_output(stdout: &[u8]) -> Result<Block> {
    let text = core::str::from_utf8(stdout)
        .map_err(|_| Error::Protocol("ipmitool output is not valid UTF-8"))?;

    let mut parsed = Vec::new();
    for token in text.split_ascii_whitespace() {
        let byte = u8::from_str_radix(token, 16)
            .map_err(|_| Error::Protocol("ipmitool output contains a non-hex token"))?;
        parsed.push(byte);
    }

    if parsed.len() < BLOCK_SIZE {
        return Err(Error::Protocol("ipmitool response shorter than one block"));
    }

    let mut bytes = [0u8; BLOCK_SIZE];
    bytes.copy_from_slice(&parsed[parsed.len() - BLOCK_SIZE..]);
    Ok(Block::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> IpmitoolTransport {
        IpmitoolTransport::new(
            BmcTarget::new("bmc.example.com")
                .username("admin")
                .password("secret"),
        )
    }

    #[test]
    fn write_args_use_set_boot_options_framing() {
        let block = Block::from_bytes([
            0x02, 0x00, 0x00, 0x68, 0x65, 0x6C, 0x6C, 0x6F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ]);
        let args = transport().write_args(0x0A, &block);

        assert_eq!(
            &args[..8],
            &[
                "-I",
                "lanplus",
                "-H",
                "bmc.example.com",
                "-U",
                "admin",
                "-P",
                "secret"
            ]
        );
        assert_eq!(&args[8..12], &["raw", "0x00", "0x08", "0x07"]);
        assert_eq!(args[12], "0x0a");
        assert_eq!(
            &args[13..],
            &[
                "0x02", "0x00", "0x00", "0x68", "0x65", "0x6c", "0x6c", "0x6f", "0x00", "0x00",
                "0x00", "0x00", "0x00", "0x00", "0x00", "0x00"
            ]
        );
    }

    #[test]
    fn read_args_use_get_boot_options_framing() {
        let args = transport().read_args(3);
        assert_eq!(
            &args[8..],
            &["raw", "0x00", "0x09", "0x07", "0x03", "0x00"]
        );
    }

    #[test]
    fn credentials_are_omitted_when_absent() {
        let transport = IpmitoolTransport::new(BmcTarget::new("10.0.0.9"));
        let args = transport.read_args(0);
        assert_eq!(&args[..4], &["-I", "lanplus", "-H", "10.0.0.9"]);
        assert_eq!(args[4], "raw");
    }

    #[test]
    fn parse_read_output_takes_the_final_block() {
        let stdout = b" 01 07 00 02 00 00 63 6f 6e 66 69 67 00 00 00\n 00 00 00 00\n";
        let block = parse_read_output(stdout).expect("parse");
        assert_eq!(
            block.as_bytes(),
            &[
                0x02, 0x00, 0x00, 0x63, 0x6F, 0x6E, 0x66, 0x69, 0x67, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn parse_read_output_rejects_short_replies() {
        let err = parse_read_output(b" 01 07 00\n").expect_err("expected error");
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[test]
    fn parse_read_output_rejects_garbage() {
        let err = parse_read_output(b"Unable to establish session\n").expect_err("expected error");
        assert!(matches!(err, Error::Protocol(_)));
    }
}
