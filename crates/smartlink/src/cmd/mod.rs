use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use smartlink_frame::FrameKind;

use crate::exit::{CliError, CliResult, DATA_INVALID, USAGE};
use crate::output::OutputFormat;

pub mod crc;
pub mod decode;
pub mod encode;
pub mod inspect;
pub mod listen;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON record into a frame.
    Encode(EncodeArgs),
    /// Decode a hex frame into a record.
    Decode(DecodeArgs),
    /// Break down a hex frame without requiring it to be valid.
    Inspect(InspectArgs),
    /// Compute the CRC16 of arbitrary hex bytes.
    Crc(CrcArgs),
    /// Read frames from a file or device node and print them.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Crc(args) => crc::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Frame kind as named on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Command,
    Discovery,
    Telemetry,
    Settings,
    Value,
}

impl From<KindArg> for FrameKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Command => FrameKind::Command,
            KindArg::Discovery => FrameKind::Discovery,
            KindArg::Telemetry => FrameKind::Telemetry,
            KindArg::Settings => FrameKind::Settings,
            KindArg::Value => FrameKind::Value,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Kind of record to encode.
    #[arg(value_enum)]
    pub kind: KindArg,
    /// Record as inline JSON.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read the JSON record from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Kind of record expected in the frame.
    #[arg(value_enum)]
    pub kind: KindArg,
    /// Frame bytes as hex (whitespace and a 0x prefix are ignored).
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Frame bytes as hex.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct CrcArgs {
    /// Bytes as hex.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// File or device node to read from.
    pub path: PathBuf,
    /// Only print these kinds (comma-separated).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub kinds: Option<Vec<KindArg>>,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse user-supplied hex into bytes.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);

    hex::decode(digits).map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex: {err}")))
}

/// Parse hex that must hold at least one byte.
pub fn parse_frame_hex(input: &str) -> CliResult<Vec<u8>> {
    let wire = parse_hex(input)?;
    if wire.is_empty() {
        return Err(CliError::new(USAGE, "no frame bytes given"));
    }
    Ok(wire)
}
