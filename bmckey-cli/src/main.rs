//! BMC product key utility.
//!
//! Usage:
//!   bmckey oob encode 3c:ec:ef:12:34:56
//!   bmckey binary decode 3c:ec:ef:12:34:56 <KEY>
//!   bmckey -v json bruteforce '<LICENSE JSON>'
//!
//! Results go to stdout, logs to stderr.

use anyhow::Result;
use bmckey_cli::{log_level, run, Cli};
use clap::Parser;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();
    FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}
