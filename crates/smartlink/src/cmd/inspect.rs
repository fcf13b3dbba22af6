use serde::Serialize;
use smartlink_frame::{
    crc16, decode_kind, kind_name, parse_frame, HEADER_SIZE, SYNC_MASK, SYNC_PATTERN,
};

use crate::cmd::{parse_frame_hex, InspectArgs};
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_report, OutputFormat};

/// What could be read out of a (possibly broken) frame.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Inspection {
    pub length: usize,
    pub header: Option<u8>,
    pub sync_ok: bool,
    pub kind: Option<u8>,
    pub kind_name: Option<&'static str>,
    pub declared_length: Option<u8>,
    pub received_crc: Option<u16>,
    pub computed_crc: Option<u16>,
    pub valid: bool,
    pub error: Option<String>,
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = parse_frame_hex(&args.hex)?;
    let report = inspect(&wire);
    print_report(&report, rows(&report), format);

    Ok(if report.valid { SUCCESS } else { DATA_INVALID })
}

pub fn inspect(wire: &[u8]) -> Inspection {
    let header = wire.first().copied();
    let declared_length = wire.get(1).copied();

    let (received_crc, computed_crc) = match declared_length {
        Some(len) => {
            let end = HEADER_SIZE + len as usize;
            let received = wire
                .get(end..end + 2)
                .map(|crc| u16::from_le_bytes([crc[0], crc[1]]));
            let computed = wire.get(..end).map(crc16);
            (received, computed)
        }
        None => (None, None),
    };

    let parsed = parse_frame(wire);

    Inspection {
        length: wire.len(),
        header,
        sync_ok: header.is_some_and(|h| h & SYNC_MASK == SYNC_PATTERN),
        kind: header.map(decode_kind),
        kind_name: header.map(|h| kind_name(decode_kind(h))),
        declared_length,
        received_crc,
        computed_crc,
        valid: parsed.is_ok(),
        error: parsed.err().map(|err| err.to_string()),
    }
}

fn rows(report: &Inspection) -> Vec<Vec<String>> {
    fn opt<T>(value: Option<T>, fmt: impl Fn(T) -> String) -> String {
        value.map(fmt).unwrap_or_else(|| "-".to_string())
    }

    vec![
        vec!["length".into(), report.length.to_string()],
        vec!["header".into(), opt(report.header, |h| format!("0x{h:02x}"))],
        vec!["sync".into(), report.sync_ok.to_string()],
        vec![
            "kind".into(),
            opt(report.kind, |k| {
                format!("{k} ({})", report.kind_name.unwrap_or("UNKNOWN"))
            }),
        ],
        vec!["declared_length".into(), opt(report.declared_length, |l| l.to_string())],
        vec!["received_crc".into(), opt(report.received_crc, |c| format!("0x{c:04x}"))],
        vec!["computed_crc".into(), opt(report.computed_crc, |c| format!("0x{c:04x}"))],
        vec!["valid".into(), report.valid.to_string()],
        vec!["error".into(), report.error.clone().unwrap_or_else(|| "-".to_string())],
    ]
}
