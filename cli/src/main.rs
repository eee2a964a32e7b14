use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use serde::Serialize;
use tracing::debug;

use cip_ekey_core::{
    check_electronic_key, ConnectionObject, DeviceIdentity, ElectronicKey, Format4Key, GeneralStatus, PathReader,
};

#[derive(Parser, Debug)]
#[command(name = "cip-ekey")]
#[command(about = "Check and build CIP electronic key path segments", version = cip_ekey_core::version())]
struct Cli {
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the electronic key at the start of a hex-encoded connection path
    Check {
        /// Device identity fixture (JSON)
        #[arg(long)]
        identity: PathBuf,

        /// Remaining path length in 16-bit words. Defaults to the path length
        #[arg(long)]
        words: Option<usize>,

        /// Connection path, hex encoded
        path: String,
    },

    /// Print a Format 4 electronic key segment as hex
    Encode {
        #[arg(long, default_value_t = 0)]
        vendor: u16,

        #[arg(long, default_value_t = 0)]
        device_type: u16,

        #[arg(long, default_value_t = 0)]
        product: u16,

        /// Major revision (0-127)
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=0x7F))]
        major: u8,

        #[arg(long, default_value_t = 0)]
        minor: u8,

        /// Accept any device minor revision at or above `--minor`
        #[arg(long)]
        compatible: bool,
    },
}

#[derive(Serialize)]
struct Verdict {
    accepted: bool,
    general_status: u8,
    extended_status: u16,
    error: Option<String>,
    electronic_key: ElectronicKey,
    consumed_bytes: usize,
    remaining_path_words: usize,
}

fn check(identity: PathBuf, words: Option<usize>, path: &str) -> anyhow::Result<Verdict> {
    let json = fs::read_to_string(&identity)
        .with_context(|| format!("failed to read identity fixture {}", identity.display()))?;
    let identity = DeviceIdentity::from_json(&json).context("invalid identity fixture")?;
    debug!(?identity, "loaded device identity");

    let bytes = hex::decode(path.trim()).context("invalid path hex")?;
    let mut remaining = words.unwrap_or(bytes.len() / 2);
    let mut reader = PathReader::new(&bytes);
    let mut connection = ConnectionObject::default();

    let result = check_electronic_key(&mut connection, &identity, &mut reader, &mut remaining);
    let (general, extended, error) = match &result {
        Ok(()) => (GeneralStatus::Success.code(), 0, None),
        Err(e) => (
            e.general_status().code(),
            e.extended_status().map(|s| s.code()).unwrap_or(0),
            Some(e.to_string()),
        ),
    };
    Ok(Verdict {
        accepted: result.is_ok(),
        general_status: general,
        extended_status: extended,
        error,
        electronic_key: connection.electronic_key,
        consumed_bytes: reader.position(),
        remaining_path_words: remaining,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { identity, words, path } => {
            let verdict = check(identity, words, &path)?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
            if !verdict.accepted {
                std::process::exit(1);
            }
        }
        Commands::Encode { vendor, device_type, product, major, minor, compatible } => {
            let major_compat = if compatible { major | 0x80 } else { major };
            let key = Format4Key::new(vendor, device_type, product, major_compat, minor);
            println!("{}", key.segment_hex());
        }
    }

    Ok(())
}
