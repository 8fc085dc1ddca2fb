//! Command tree and handlers for the `bmckey` binary.
//!
//! Handlers return their stdout text so they can be driven from tests
//! without a process boundary.

use anyhow::{anyhow, Context, Result};
use bmckey_license::binary::{self, ProductKey};
use bmckey_license::json::{self, License};
use bmckey_license::oob::{self, OobProductKey};
use bmckey_net::{MacAddress, Oui};
use bmckey_search::SearchOptions;
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use std::fmt::Write as _;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "bmckey", version)]
#[command(about = "Encode, decode, verify and brute force BMC product keys")]
pub struct Cli {
    /// Increase log verbosity (up to three times)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Brute-force worker threads [default: available cores minus one]
    #[arg(long, global = true, env = "BMCKEY_WORKERS")]
    pub workers: Option<usize>,

    /// Restrict brute force to this OUI (repeatable) [default: vendor OUIs]
    #[arg(long = "oui", global = true, value_name = "OUI")]
    pub ouis: Vec<Oui>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// OOB product key operations
    #[command(subcommand)]
    Oob(OobCommand),

    /// JSON product key operations
    #[command(subcommand)]
    Json(JsonCommand),

    /// Binary (non-JSON) product key operations
    #[command(subcommand, alias = "nonjson")]
    Binary(BinaryCommand),
}

#[derive(Subcommand, Debug)]
pub enum OobCommand {
    /// Encode an OOB product key
    Encode { mac: MacAddress },

    /// Find the MAC address of an OOB product key by brute force
    Bruteforce { key: OobProductKey },
}

#[derive(Subcommand, Debug)]
pub enum JsonCommand {
    /// Verify the signature of a JSON product key
    Verify { mac: MacAddress, license: String },

    /// Find the MAC address of a JSON product key by brute force
    Bruteforce { license: String },

    /// List software identifiers found in JSON product keys
    #[command(alias = "listswid")]
    ListIds,
}

#[derive(Subcommand, Debug)]
pub enum BinaryCommand {
    /// Decode a binary product key
    Decode { mac: MacAddress, key: String },

    /// Encode a binary product key; unspecified fields keep their defaults
    Encode {
        /// Software identifier by SKU
        #[arg(long, conflicts_with_all = ["display_name", "id"])]
        sku: Option<String>,

        /// Software identifier by display name
        #[arg(long, conflicts_with = "id")]
        display_name: Option<String>,

        /// Software identifier by ID, in hex
        #[arg(long, value_parser = parse_hex_id)]
        id: Option<u8>,

        #[arg(long)]
        software_version: Option<String>,

        #[arg(long)]
        invoice_number: Option<String>,

        /// RFC 3339 timestamp
        #[arg(long, value_parser = parse_rfc3339)]
        creation_date: Option<DateTime<Utc>>,

        /// RFC 3339 timestamp
        #[arg(long, value_parser = parse_rfc3339)]
        expiration_date: Option<DateTime<Utc>>,

        /// Property bytes, in hex
        #[arg(long)]
        property: Option<String>,

        mac: MacAddress,
    },

    /// Find the MAC address of a binary product key by brute force
    Bruteforce { key: String },

    /// List software identifiers that can be used in binary product keys
    #[command(alias = "listswid")]
    ListIds,
}

fn parse_hex_id(s: &str) -> Result<u8, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|e| format!("'{s}' is not a hex byte: {e}"))
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("'{s}' is not an RFC 3339 timestamp: {e}"))
}

/// Maps the `-v` count to a log level.
#[must_use]
pub fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

impl Cli {
    /// Search options from the global flags.
    #[must_use]
    pub fn search_options(&self) -> SearchOptions {
        let mut options = SearchOptions::default();
        if let Some(workers) = self.workers {
            options = options.with_workers(workers);
        }
        if !self.ouis.is_empty() {
            options = options.with_blocks(self.ouis.iter().copied());
        }
        options
    }
}

/// Runs the selected command and returns what it prints.
///
/// # Errors
///
/// Returns the first failure with the operation that hit it as context.
pub fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Oob(cmd) => run_oob(cli, cmd),
        Command::Json(cmd) => run_json(cli, cmd),
        Command::Binary(cmd) => run_binary(cli, cmd),
    }
}

fn found(mac: &MacAddress) -> String {
    format!("found match! mac = '{mac}'")
}

fn run_oob(cli: &Cli, cmd: &OobCommand) -> Result<String> {
    match cmd {
        OobCommand::Encode { mac } => Ok(OobProductKey::encode(mac).to_string()),
        OobCommand::Bruteforce { key } => {
            info!("Searching for the MAC address of OOB key {key}");
            let mac = oob::brute_force_mac(key, &cli.search_options())?;
            Ok(found(&mac))
        }
    }
}

fn run_json(cli: &Cli, cmd: &JsonCommand) -> Result<String> {
    match cmd {
        JsonCommand::Verify { mac, license } => {
            let license = License::parse(license).context("failed to parse license")?;
            license
                .verify(mac)
                .context("product key verification failed")?;
            Ok("signature verified ok".to_string())
        }
        JsonCommand::Bruteforce { license } => {
            let license = License::parse(license).context("failed to parse license")?;
            info!(
                "Searching for the MAC address of license {} ({})",
                license.license_id(),
                license.license_name()
            );
            let mac = json::brute_force_mac(&license, &cli.search_options())?;
            Ok(found(&mac))
        }
        JsonCommand::ListIds => {
            let rows = json::identifier::list()
                .iter()
                .map(|s| vec![s.sku.to_string(), s.id.to_string()])
                .collect();
            Ok(table(&["License SKU", "ID"], rows))
        }
    }
}

fn run_binary(cli: &Cli, cmd: &BinaryCommand) -> Result<String> {
    match cmd {
        BinaryCommand::Decode { mac, key } => {
            let key = ProductKey::decode(key, mac).context("failed to decode product key")?;
            Ok(serde_json::to_string_pretty(&key)?)
        }
        BinaryCommand::Encode {
            sku,
            display_name,
            id,
            software_version,
            invoice_number,
            creation_date,
            expiration_date,
            property,
            mac,
        } => {
            let mut key = ProductKey::new();

            if let Some(sku) = sku {
                key.software_identifier = *binary::identifier::by_sku(sku)?;
            } else if let Some(name) = display_name {
                key.software_identifier = *binary::identifier::by_display_name(name)?;
            } else if let Some(id) = id {
                key.software_identifier = *binary::identifier::by_id(*id)?;
            }
            if let Some(version) = software_version {
                key.software_version.clone_from(version);
            }
            if let Some(invoice) = invoice_number {
                key.invoice_number.clone_from(invoice);
            }
            if let Some(date) = creation_date {
                key.creation_date = *date;
            }
            if let Some(date) = expiration_date {
                key.expiration_date = *date;
            }
            if let Some(property) = property {
                key.property = hex::decode(property)
                    .map_err(|e| anyhow!("property '{property}' is not hex: {e}"))?;
            }

            key.encode(mac).context("failed to encode product key")
        }
        BinaryCommand::Bruteforce { key } => {
            info!("Searching for the MAC address of a binary product key");
            let mac = binary::brute_force_mac(key, &cli.search_options())?;
            Ok(found(&mac))
        }
        BinaryCommand::ListIds => {
            let rows = binary::identifier::list()
                .iter()
                .map(|s| {
                    vec![
                        s.sku.unwrap_or_default().to_string(),
                        s.display_name.to_string(),
                        s.id.to_string(),
                    ]
                })
                .collect();
            Ok(table(&["License SKU", "Display Name", "ID"], rows))
        }
    }
}

/// Renders left-aligned columns separated by two spaces, with a dashed rule
/// under the header.
fn table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let rule: Vec<String> = header.iter().map(|h| "-".repeat(h.len())).collect();
    let header: Vec<String> = header.iter().map(ToString::to_string).collect();
    let lines: Vec<Vec<String>> = [header, rule].into_iter().chain(rows).collect();

    let mut widths = vec![0; lines[0].len()];
    for line in &lines {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mut row = String::new();
        for (cell, w) in line.iter().zip(&widths) {
            let _ = write!(row, "{cell:<w$}  ");
        }
        out.push_str(row.trim_end());
    }
    out
}
