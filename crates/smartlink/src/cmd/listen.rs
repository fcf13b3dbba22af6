use std::fs::File;
use std::io::Read;

use smartlink_frame::{FrameKind, FrameReader, Message};

use crate::cmd::ListenArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.path)
        .map_err(|err| io_error(&format!("failed opening {}", args.path.display()), err))?;

    let kinds: Option<Vec<FrameKind>> = args
        .kinds
        .as_ref()
        .map(|kinds| kinds.iter().copied().map(FrameKind::from).collect());

    listen(file, kinds.as_deref(), args.count, |message| {
        print_message(message, format)
    })?;
    Ok(SUCCESS)
}

/// Pump frames from `source` until EOF or `count` messages were emitted.
/// Returns the number of messages emitted.
pub fn listen<R, F>(
    source: R,
    kinds: Option<&[FrameKind]>,
    count: Option<usize>,
    mut emit: F,
) -> CliResult<usize>
where
    R: Read,
    F: FnMut(&Message),
{
    let mut emitted = 0usize;
    if count == Some(0) {
        return Ok(emitted);
    }

    for frame in FrameReader::new(source) {
        let frame = frame.map_err(|err| frame_error("read failed", err))?;

        if let Some(kinds) = kinds {
            if !kinds.contains(&frame.kind) {
                continue;
            }
        }

        let message = match Message::from_frame(&frame) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(kind = %frame.kind, error = %err, "dropping undecodable frame");
                continue;
            }
        };

        emit(&message);
        emitted = emitted.saturating_add(1);

        if count.is_some_and(|count| emitted >= count) {
            break;
        }
    }

    tracing::debug!(emitted, "listen finished");
    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use smartlink_frame::{Command, FrameCodec, TaggedValue, TelemetryData};

    fn stream() -> Vec<u8> {
        let codec = FrameCodec::new();
        let mut wire = vec![0xFF, 0x00];
        wire.extend_from_slice(&codec.serialize_command(&Command::default()).unwrap());
        wire.extend_from_slice(&codec.serialize_value(&TaggedValue::from_numeric(7i32)).unwrap());
        wire.push(0x55);
        wire.extend_from_slice(&codec.serialize_telemetry(&TelemetryData::default()).unwrap());
        wire
    }

    #[test]
    fn emits_every_frame_until_eof() {
        let mut seen = Vec::new();
        let n = listen(Cursor::new(stream()), None, None, |m| seen.push(m.kind())).unwrap();

        assert_eq!(n, 3);
        assert_eq!(
            seen,
            vec![FrameKind::Command, FrameKind::Value, FrameKind::Telemetry]
        );
    }

    #[test]
    fn filters_by_kind() {
        let mut seen = Vec::new();
        let kinds = [FrameKind::Value, FrameKind::Telemetry];
        listen(Cursor::new(stream()), Some(&kinds), None, |m| seen.push(m.clone())).unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Message::Value(TaggedValue::from_numeric(7i32)));
    }

    #[test]
    fn stops_after_count() {
        let n = listen(Cursor::new(stream()), None, Some(2), |_| {}).unwrap();
        assert_eq!(n, 2);

        let n = listen(Cursor::new(stream()), None, Some(0), |_| {}).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn undecodable_value_tag_is_dropped() {
        let mut payload = vec![0u8; 18];
        payload[0] = 0x09;
        let mut wire = Vec::new();
        let mut frame = vec![FrameKind::Value.header(), payload.len() as u8];
        frame.extend_from_slice(&payload);
        let crc = smartlink_frame::crc16(&frame);
        frame.extend_from_slice(&crc.to_le_bytes());
        wire.extend_from_slice(&frame);
        wire.extend_from_slice(
            &FrameCodec::new()
                .serialize_value(&TaggedValue::from_numeric(1u16))
                .unwrap(),
        );

        let mut seen = Vec::new();
        listen(Cursor::new(wire), None, None, |m| seen.push(m.clone())).unwrap();
        assert_eq!(seen, vec![Message::Value(TaggedValue::from_numeric(1u16))]);
    }
}
