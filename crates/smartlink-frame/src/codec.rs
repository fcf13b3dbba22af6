use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::crc::crc16;
use crate::error::{FrameError, Result};
use crate::kind::{decode_kind, encode_header, is_valid_header, FrameKind};
use crate::record::{Command, DiscoveryResponse, SettingsData, TelemetryData, WireRecord};
use crate::sink::{emit, NoopSink, Severity, SharedSink};
use crate::value::TaggedValue;

/// Frame header: header byte (1) + payload length (1).
pub const HEADER_SIZE: usize = 2;

/// Trailing CRC16 size.
pub const CRC_SIZE: usize = 2;

/// Fixed bytes around every payload.
pub const PROTOCOL_OVERHEAD: usize = HEADER_SIZE + CRC_SIZE;

/// Largest payload a single frame may carry.
pub const MAX_PAYLOAD_SIZE: usize = 64;

/// Largest complete frame on the wire.
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + PROTOCOL_OVERHEAD;

/// A validated frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The message kind named by the header.
    pub kind: FrameKind,
    /// The message payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(kind: FrameKind, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// Build a frame holding an encoded record.
    pub fn from_record<R: WireRecord>(record: &R) -> Self {
        let mut payload = BytesMut::with_capacity(R::ENCODED_SIZE);
        record.encode_payload(&mut payload);
        Self::new(R::KIND, payload.freeze())
    }

    /// The total wire size of this frame (overhead + payload).
    pub fn wire_size(&self) -> usize {
        PROTOCOL_OVERHEAD + self.payload.len()
    }

    /// Decode the payload as record `R`, checking kind and size.
    pub fn decode<R: WireRecord>(&self) -> Result<R> {
        if self.kind != R::KIND {
            return Err(FrameError::KindMismatch {
                expected: R::KIND,
                found: self.kind as u8,
            });
        }
        R::decode_payload(&self.payload)
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────┬──────────┬──────────────────┬──────────┐
/// │ Header (1B)    │ Length   │ Payload          │ CRC16    │
/// │ kind<<5 | 0x02 │ (1B)     │ (Length bytes)   │ (2B LE)  │
/// └────────────────┴──────────┴──────────────────┴──────────┘
/// ```
///
/// The CRC covers header, length and payload.
pub fn encode_frame(kind: FrameKind, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::OversizedPayload {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let start = dst.len();
    dst.reserve(PROTOCOL_OVERHEAD + payload.len());
    dst.put_u8(encode_header(kind));
    dst.put_u8(payload.len() as u8);
    dst.put_slice(payload);
    let crc = crc16(&dst[start..]);
    dst.put_u16_le(crc);
    Ok(())
}

/// Validate a buffer holding exactly one frame of any known kind.
pub fn parse_frame(src: &[u8]) -> Result<Frame> {
    let (kind, payload) = split_frame(src, None)?;
    Ok(Frame::new(kind, Bytes::copy_from_slice(payload)))
}

/// Run the frame checks in wire order and return the kind and payload.
///
/// With `expected` set, the kind and the declared length must also match it.
fn split_frame(src: &[u8], expected: Option<FrameKind>) -> Result<(FrameKind, &[u8])> {
    if src.len() < PROTOCOL_OVERHEAD {
        return Err(FrameError::BufferTooShort {
            len: src.len(),
            min: PROTOCOL_OVERHEAD,
        });
    }

    let header = src[0];
    if !is_valid_header(header) {
        return Err(FrameError::InvalidHeader(header));
    }

    let raw_kind = decode_kind(header);
    let kind = match (expected, FrameKind::try_from(raw_kind)) {
        (Some(expected), Ok(kind)) if kind == expected => kind,
        (Some(expected), _) => {
            return Err(FrameError::KindMismatch {
                expected,
                found: raw_kind,
            })
        }
        (None, Ok(kind)) => kind,
        (None, Err(raw)) => return Err(FrameError::UnknownKind(raw)),
    };

    let declared = usize::from(src[1]);
    if src.len() != PROTOCOL_OVERHEAD + declared {
        return Err(FrameError::LengthInconsistent {
            declared,
            actual: src.len(),
        });
    }

    if expected.is_some() && declared != kind.payload_size() {
        return Err(FrameError::PayloadSizeMismatch {
            kind,
            expected: kind.payload_size(),
            declared,
        });
    }

    let crc_offset = HEADER_SIZE + declared;
    let received = u16::from_le_bytes([src[crc_offset], src[crc_offset + 1]]);
    let computed = crc16(&src[..crc_offset]);
    if received != computed {
        return Err(FrameError::IntegrityCheckFailed { received, computed });
    }

    Ok((kind, &src[HEADER_SIZE..crc_offset]))
}

/// Pull the next valid frame out of a byte stream.
///
/// Leading bytes that cannot start a frame are discarded. A candidate whose
/// length is out of range, differs from its kind's fixed payload size, or
/// whose CRC does not match is dropped one byte at a time so the scan can
/// resynchronise inside it. Returns `None` when the
/// buffer does not yet hold a complete frame; on success the frame bytes are
/// consumed from the buffer.
pub fn scan_frame(src: &mut BytesMut, max_payload: usize) -> Option<Frame> {
    let max_payload = max_payload.min(MAX_PAYLOAD_SIZE);
    let mut skipped = 0usize;

    let found = loop {
        let Some(start) = src
            .iter()
            .position(|&b| is_valid_header(b) && FrameKind::try_from(decode_kind(b)).is_ok())
        else {
            skipped += src.len();
            src.clear();
            break None;
        };
        skipped += start;
        src.advance(start);

        if src.len() < HEADER_SIZE {
            break None;
        }

        let declared = usize::from(src[1]);
        let fits_kind = FrameKind::try_from(decode_kind(src[0]))
            .is_ok_and(|kind| kind.payload_size() == declared);
        if declared > max_payload || !fits_kind {
            src.advance(1);
            skipped += 1;
            continue;
        }

        let total = PROTOCOL_OVERHEAD + declared;
        if src.len() < total {
            break None;
        }

        match split_frame(&src[..total], None).map(|(kind, _)| kind) {
            Ok(kind) => {
                let mut frame = src.split_to(total);
                frame.advance(HEADER_SIZE);
                frame.truncate(declared);
                break Some(Frame::new(kind, frame.freeze()));
            }
            Err(err) => {
                tracing::trace!(error = %err, "dropping frame candidate");
                src.advance(1);
                skipped += 1;
            }
        }
    };

    if skipped > 0 {
        tracing::debug!(skipped, "discarded bytes while resynchronising");
    }
    found
}

/// Configuration for the stream reader and writer.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest payload the stream layer accepts. Default and upper bound:
    /// [`MAX_PAYLOAD_SIZE`].
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }
}

impl FrameConfig {
    /// The payload limit in effect, never above [`MAX_PAYLOAD_SIZE`].
    pub fn effective_max_payload(&self) -> usize {
        self.max_payload_size.min(MAX_PAYLOAD_SIZE)
    }
}

/// Serializes and validates frames for every message kind.
///
/// The codec keeps no scratch state: every call works on its own buffer,
/// so one instance can be shared between threads. Rejections are reported
/// to the sink at error level in addition to being returned.
#[derive(Clone)]
pub struct FrameCodec {
    sink: SharedSink,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCodec").finish_non_exhaustive()
    }
}

impl FrameCodec {
    /// Create a codec that drops its notifications.
    pub fn new() -> Self {
        Self::with_sink(std::sync::Arc::new(NoopSink))
    }

    /// Create a codec reporting to `sink`.
    pub fn with_sink(sink: SharedSink) -> Self {
        Self { sink }
    }

    /// Encode `record` as a complete frame.
    pub fn serialize<R: WireRecord>(&self, record: &R) -> Result<Bytes> {
        let mut dst = BytesMut::with_capacity(PROTOCOL_OVERHEAD + R::ENCODED_SIZE);
        self.serialize_into(record, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Append the frame for `record` to `dst`, returning the bytes written.
    pub fn serialize_into<R: WireRecord>(&self, record: &R, dst: &mut BytesMut) -> Result<usize> {
        if R::ENCODED_SIZE > MAX_PAYLOAD_SIZE {
            return Err(self.reject(FrameError::OversizedPayload {
                size: R::ENCODED_SIZE,
                max: MAX_PAYLOAD_SIZE,
            }));
        }

        let mut payload = BytesMut::with_capacity(R::ENCODED_SIZE);
        record.encode_payload(&mut payload);
        debug_assert_eq!(payload.len(), R::ENCODED_SIZE);

        encode_frame(R::KIND, &payload, dst).map_err(|err| self.reject(err))?;
        Ok(PROTOCOL_OVERHEAD + payload.len())
    }

    /// Validate `src` as exactly one frame of `R`'s kind and decode it.
    ///
    /// Nothing is produced unless every check passes.
    pub fn deserialize<R: WireRecord>(&self, src: &[u8]) -> Result<R> {
        let (_, payload) = split_frame(src, Some(R::KIND)).map_err(|err| self.reject(err))?;
        R::decode_payload(payload).map_err(|err| self.reject(err))
    }

    /// Validate `src` as exactly one frame of any known kind.
    pub fn parse(&self, src: &[u8]) -> Result<Frame> {
        parse_frame(src).map_err(|err| self.reject(err))
    }

    pub fn serialize_command(&self, cmd: &Command) -> Result<Bytes> {
        self.serialize(cmd)
    }

    pub fn deserialize_command(&self, src: &[u8]) -> Result<Command> {
        self.deserialize(src)
    }

    pub fn serialize_discovery(&self, resp: &DiscoveryResponse) -> Result<Bytes> {
        self.serialize(resp)
    }

    pub fn deserialize_discovery(&self, src: &[u8]) -> Result<DiscoveryResponse> {
        self.deserialize(src)
    }

    pub fn serialize_telemetry(&self, telemetry: &TelemetryData) -> Result<Bytes> {
        self.serialize(telemetry)
    }

    pub fn deserialize_telemetry(&self, src: &[u8]) -> Result<TelemetryData> {
        self.deserialize(src)
    }

    pub fn serialize_settings(&self, settings: &SettingsData) -> Result<Bytes> {
        self.serialize(settings)
    }

    pub fn deserialize_settings(&self, src: &[u8]) -> Result<SettingsData> {
        self.deserialize(src)
    }

    pub fn serialize_value(&self, value: &TaggedValue) -> Result<Bytes> {
        self.serialize(value)
    }

    pub fn deserialize_value(&self, src: &[u8]) -> Result<TaggedValue> {
        self.deserialize(src)
    }

    /// CRC16 over an arbitrary byte range.
    pub fn compute_integrity_code(&self, data: &[u8]) -> u16 {
        crc16(data)
    }

    fn reject(&self, err: FrameError) -> FrameError {
        emit(self.sink.as_ref(), Severity::Error, &err.to_string());
        err
    }
}
