use std::fs;
use std::sync::Arc;

use smartlink_frame::{
    Command, DiscoveryResponse, FrameCodec, Message, SettingsData, TaggedValue, TelemetryData,
    TracingSink,
};

use crate::cmd::{EncodeArgs, KindArg};
use crate::exit::{frame_error, io_error, json_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let json = resolve_json(&args)?;
    let message = parse_record(args.kind, &json).map_err(|err| json_error("invalid record", err))?;

    let codec = FrameCodec::with_sink(Arc::new(TracingSink));
    let wire = encode_message(&codec, &message).map_err(|err| frame_error("encode failed", err))?;

    tracing::debug!(kind = %message.kind(), size = wire.len(), "encoded frame");
    print_encoded(&message.kind().to_string(), &wire, format);
    Ok(SUCCESS)
}

fn resolve_json(args: &EncodeArgs) -> CliResult<String> {
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(args.json.clone().unwrap_or_default())
}

/// Parse a bare record of the given kind.
pub fn parse_record(kind: KindArg, json: &str) -> Result<Message, serde_json::Error> {
    Ok(match kind {
        KindArg::Command => serde_json::from_str::<Command>(json)?.into(),
        KindArg::Discovery => serde_json::from_str::<DiscoveryResponse>(json)?.into(),
        KindArg::Telemetry => serde_json::from_str::<TelemetryData>(json)?.into(),
        KindArg::Settings => serde_json::from_str::<SettingsData>(json)?.into(),
        KindArg::Value => serde_json::from_str::<TaggedValue>(json)?.into(),
    })
}

pub fn encode_message(codec: &FrameCodec, message: &Message) -> smartlink_frame::Result<Vec<u8>> {
    let wire = match message {
        Message::Command(cmd) => codec.serialize_command(cmd)?,
        Message::Discovery(resp) => codec.serialize_discovery(resp)?,
        Message::Telemetry(telemetry) => codec.serialize_telemetry(telemetry)?,
        Message::Settings(settings) => codec.serialize_settings(settings)?,
        Message::Value(value) => codec.serialize_value(value)?,
    };
    Ok(wire.to_vec())
}
