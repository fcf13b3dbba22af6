use std::sync::Arc;

use smartlink_frame::{FrameCodec, Message, TracingSink};

use crate::cmd::{parse_frame_hex, DecodeArgs, KindArg};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = parse_frame_hex(&args.hex)?;
    let codec = FrameCodec::with_sink(Arc::new(TracingSink));

    let message =
        decode_message(&codec, args.kind, &wire).map_err(|err| frame_error("decode failed", err))?;

    print_message(&message, format);
    Ok(SUCCESS)
}

/// Decode a frame that must be of `kind`.
pub fn decode_message(
    codec: &FrameCodec,
    kind: KindArg,
    wire: &[u8],
) -> smartlink_frame::Result<Message> {
    Ok(match kind {
        KindArg::Command => codec.deserialize_command(wire)?.into(),
        KindArg::Discovery => codec.deserialize_discovery(wire)?.into(),
        KindArg::Telemetry => codec.deserialize_telemetry(wire)?.into(),
        KindArg::Settings => codec.deserialize_settings(wire)?.into(),
        KindArg::Value => codec.deserialize_value(wire)?.into(),
    })
}
