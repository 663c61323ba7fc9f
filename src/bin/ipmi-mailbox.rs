//! Write, read back, or clear the IPMI boot-options mailbox on a BMC.

use anyhow::{bail, Result};
use clap::Parser;

use ipmi_mailbox::{decode, BmcTarget, IpmitoolTransport, Mailbox};

#[derive(Parser)]
#[command(
    name = "ipmi-mailbox",
    version,
    about = "Write a configuration string into a BMC boot-options mailbox via ipmitool"
)]
struct Cli {
    /// BMC hostname or IP address.
    #[arg(short = 'b', long)]
    bmc_hostname: Option<String>,

    /// Username passed through to ipmitool.
    #[arg(short, long)]
    username: Option<String>,

    /// Password passed through to ipmitool.
    #[arg(short, long)]
    password: Option<String>,

    /// Print the ipmitool commands instead of running them.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Configuration string to write to the mailbox.
    #[arg(short, long, conflicts_with = "clear")]
    config: Option<String>,

    /// Overwrite the whole mailbox with zero blocks.
    #[arg(short = 'x', long)]
    clear: bool,

    /// Read the mailbox back and print it.
    #[arg(short, long)]
    dump: bool,

    /// Mailbox capacity in 16-byte blocks.
    #[arg(short, long, default_value_t = 16)]
    max_blocks: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let hostname = match (&cli.bmc_hostname, cli.dry_run) {
        (Some(hostname), _) => hostname.clone(),
        (None, true) => "<hostname>".to_string(),
        (None, false) => bail!("no BMC hostname specified"),
    };

    if cli.config.is_none() && !cli.clear && !cli.dump {
        bail!("nothing to do: pass --config, --clear, or --dump");
    }

    let mut target = BmcTarget::new(hostname);
    if let Some(username) = &cli.username {
        target = target.username(username);
    }
    if let Some(password) = &cli.password {
        target = target.password(password);
    }

    let transport = IpmitoolTransport::new(target).dry_run(cli.dry_run);
    let mailbox = Mailbox::new(transport);

    if cli.config.is_some() || cli.clear {
        println!("{} blocks to send", cli.max_blocks);
        println!("---------------------------------------");
        match &cli.config {
            Some(config) => mailbox.write_config(config, cli.max_blocks)?,
            None => mailbox.clear(cli.max_blocks)?,
        }
    }

    if cli.dump {
        println!("Reading {} blocks", cli.max_blocks);
        println!("---------------------------------------");
        let blocks = mailbox.dump(cli.max_blocks)?;
        if !cli.dry_run {
            for (index, block) in blocks.iter().enumerate() {
                let line: Vec<String> = block
                    .as_bytes()
                    .iter()
                    .map(|byte| format!("{byte:02x}"))
                    .collect();
                println!("{index:3}: {}", line.join(" "));
            }
            if let Ok(payload) = decode(&blocks) {
                println!("Decoded configuration: {payload}");
            }
        }
    }

    Ok(())
}
