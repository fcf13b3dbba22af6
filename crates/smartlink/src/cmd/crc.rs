use serde::Serialize;
use smartlink_frame::crc16;

use crate::cmd::{parse_hex, CrcArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_raw, print_report, OutputFormat};

#[derive(Serialize)]
struct CrcOutput {
    length: usize,
    crc: u16,
    hex: String,
    wire: String,
}

pub fn run(args: CrcArgs, format: OutputFormat) -> CliResult<i32> {
    let data = parse_hex(&args.hex)?;
    let crc = crc16(&data);

    if let OutputFormat::Raw = format {
        print_raw(&crc.to_le_bytes());
        return Ok(SUCCESS);
    }

    let out = CrcOutput {
        length: data.len(),
        crc,
        hex: format!("0x{crc:04x}"),
        wire: hex::encode(crc.to_le_bytes()),
    };
    let rows = vec![
        vec!["length".to_string(), out.length.to_string()],
        vec!["crc".to_string(), out.hex.clone()],
        vec!["wire (LE)".to_string(), out.wire.clone()],
    ];
    print_report(&out, rows, format);
    Ok(SUCCESS)
}
