use crate::codec::Frame;
use crate::error::Result;
use crate::kind::FrameKind;
use crate::record::{Command, DiscoveryResponse, SettingsData, TelemetryData};
use crate::value::TaggedValue;

/// A decoded frame of any kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", content = "record", rename_all = "snake_case")
)]
pub enum Message {
    Command(Command),
    Discovery(DiscoveryResponse),
    Telemetry(TelemetryData),
    Settings(SettingsData),
    Value(TaggedValue),
}

impl Message {
    /// Decode a frame's payload according to its kind.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Ok(match frame.kind {
            FrameKind::Command => Message::Command(frame.decode()?),
            FrameKind::Discovery => Message::Discovery(frame.decode()?),
            FrameKind::Telemetry => Message::Telemetry(frame.decode()?),
            FrameKind::Settings => Message::Settings(frame.decode()?),
            FrameKind::Value => Message::Value(frame.decode()?),
        })
    }

    /// Encode back into a frame.
    pub fn to_frame(&self) -> Frame {
        match self {
            Message::Command(cmd) => Frame::from_record(cmd),
            Message::Discovery(resp) => Frame::from_record(resp),
            Message::Telemetry(telemetry) => Frame::from_record(telemetry),
            Message::Settings(settings) => Frame::from_record(settings),
            Message::Value(value) => Frame::from_record(value),
        }
    }

    pub fn kind(&self) -> FrameKind {
        match self {
            Message::Command(_) => FrameKind::Command,
            Message::Discovery(_) => FrameKind::Discovery,
            Message::Telemetry(_) => FrameKind::Telemetry,
            Message::Settings(_) => FrameKind::Settings,
            Message::Value(_) => FrameKind::Value,
        }
    }
}

impl From<Command> for Message {
    fn from(cmd: Command) -> Self {
        Message::Command(cmd)
    }
}

impl From<DiscoveryResponse> for Message {
    fn from(resp: DiscoveryResponse) -> Self {
        Message::Discovery(resp)
    }
}

impl From<TelemetryData> for Message {
    fn from(telemetry: TelemetryData) -> Self {
        Message::Telemetry(telemetry)
    }
}

impl From<SettingsData> for Message {
    fn from(settings: SettingsData) -> Self {
        Message::Settings(settings)
    }
}

impl From<TaggedValue> for Message {
    fn from(value: TaggedValue) -> Self {
        Message::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::record::ModuleInfo;

    #[test]
    fn every_kind_dispatches() {
        let messages: Vec<Message> = vec![
            Command {
                command_type: 7,
                ..Command::default()
            }
            .into(),
            DiscoveryResponse::from_modules(&[ModuleInfo::new(1, 1, 1)])
                .unwrap()
                .into(),
            TelemetryData {
                value: TaggedValue::from_numeric(1i32),
                source_id: 2,
                timestamp: 3,
            }
            .into(),
            SettingsData {
                value: TaggedValue::from_numeric(4u16),
                settings_id: 5,
            }
            .into(),
            TaggedValue::from_numeric(6.0f32).into(),
        ];

        for (message, kind) in messages.iter().zip(FrameKind::ALL) {
            let frame = message.to_frame();
            assert_eq!(frame.kind, kind);
            assert_eq!(message.kind(), kind);
            assert_eq!(&Message::from_frame(&frame).unwrap(), message);
        }
    }

    #[test]
    fn short_payload_is_rejected() {
        let frame = Frame::new(FrameKind::Telemetry, vec![0u8; 4]);
        assert!(matches!(
            Message::from_frame(&frame),
            Err(FrameError::PayloadSizeMismatch { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_names_the_kind() {
        let json = serde_json::to_string(&Message::Value(TaggedValue::new())).unwrap();
        assert_eq!(json, r#"{"kind":"value","record":"Empty"}"#);
    }
}
