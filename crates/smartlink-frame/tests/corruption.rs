use smartlink_frame::{
    Command, DiscoveryResponse, FrameCodec, FrameError, ModuleInfo, SettingsData, TaggedValue,
    TelemetryData, WireRecord, MAX_MODULES,
};

fn flip_every_bit<R, F>(record: &R, check: F)
where
    R: WireRecord,
    F: Fn(&[u8]) -> Result<R, FrameError>,
{
    let codec = FrameCodec::new();
    let frame = codec.serialize(record).expect("record should serialize");

    for byte in 0..frame.len() {
        for bit in 0..8 {
            let mut corrupted = frame.to_vec();
            corrupted[byte] ^= 1 << bit;
            assert!(
                check(&corrupted).is_err(),
                "flip of byte {byte} bit {bit} was accepted"
            );
        }
    }
}

fn full_discovery() -> DiscoveryResponse {
    let modules: Vec<ModuleInfo> = (0..MAX_MODULES)
        .map(|i| ModuleInfo::new(0x0100 + i as u16, i as u8, 1 << i))
        .collect();
    DiscoveryResponse::from_modules(&modules).expect("modules should fit")
}

#[test]
fn single_bit_flips_are_detected_for_command() {
    let codec = FrameCodec::new();
    let cmd = Command {
        command_type: 0x1234,
        w: 1.5,
        x: 2.5,
        y: 3.5,
        z: 4.5,
        s: 100,
        t: 200,
        u: 300,
        v: 400,
    };
    flip_every_bit(&cmd, |bytes| codec.deserialize_command(bytes));
}

#[test]
fn single_bit_flips_are_detected_for_discovery() {
    let codec = FrameCodec::new();
    flip_every_bit(&full_discovery(), |bytes| codec.deserialize_discovery(bytes));
}

#[test]
fn single_bit_flips_are_detected_for_telemetry() {
    let codec = FrameCodec::new();
    let telemetry = TelemetryData {
        value: TaggedValue::from_numeric(-12_345i32),
        source_id: 0xBEEF,
        timestamp: u32::MAX,
    };
    flip_every_bit(&telemetry, |bytes| codec.deserialize_telemetry(bytes));
}

#[test]
fn single_bit_flips_are_detected_for_settings() {
    let codec = FrameCodec::new();
    let mut value = TaggedValue::new();
    value.pack_text(Some("max-speed"));
    let settings = SettingsData {
        value,
        settings_id: 3,
    };
    flip_every_bit(&settings, |bytes| codec.deserialize_settings(bytes));
}

#[test]
fn single_bit_flips_are_detected_for_value() {
    let codec = FrameCodec::new();
    flip_every_bit(&TaggedValue::from_numeric(0.25f32), |bytes| {
        codec.deserialize_value(bytes)
    });
}

#[test]
fn every_kind_round_trips() {
    let codec = FrameCodec::new();

    let discovery = full_discovery();
    let wire = codec.serialize_discovery(&discovery).unwrap();
    assert_eq!(codec.deserialize_discovery(&wire).unwrap(), discovery);

    let value = TaggedValue::from_numeric(u16::MAX);
    let wire = codec.serialize_value(&value).unwrap();
    assert_eq!(codec.deserialize_value(&wire).unwrap(), value);

    let telemetry = TelemetryData {
        value: TaggedValue::from_numeric(f32::MIN_POSITIVE),
        source_id: 1,
        timestamp: 0,
    };
    let wire = codec.serialize_telemetry(&telemetry).unwrap();
    assert_eq!(wire.len(), 28);
    assert_eq!(codec.deserialize_telemetry(&wire).unwrap(), telemetry);
}

#[test]
fn frames_of_one_kind_never_decode_as_another() {
    let codec = FrameCodec::new();
    let wire = codec.serialize_discovery(&full_discovery()).unwrap();

    assert!(matches!(
        codec.deserialize_command(&wire),
        Err(FrameError::KindMismatch { .. })
    ));
    assert!(matches!(
        codec.deserialize_telemetry(&wire),
        Err(FrameError::KindMismatch { .. })
    ));
    assert!(matches!(
        codec.deserialize_settings(&wire),
        Err(FrameError::KindMismatch { .. })
    ));
    assert!(matches!(
        codec.deserialize_value(&wire),
        Err(FrameError::KindMismatch { .. })
    ));
}
