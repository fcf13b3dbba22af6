//! Compact CRC16-checked binary framing for typed peripheral messages.
//!
//! This is the core of smartlink. Every message is framed with:
//! - A 1-byte header: 5-bit sync pattern (low bits) and 3-bit message kind
//! - A 1-byte payload length
//! - A fixed-layout payload (at most 64 bytes)
//! - A 2-byte little-endian CRC-16/CCITT-FALSE over everything before it
//!
//! Five record types travel this way: [`Command`], [`DiscoveryResponse`],
//! [`TelemetryData`], [`SettingsData`] and a bare [`TaggedValue`].

pub mod codec;
pub mod crc;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod kind;
pub mod message;
pub mod reader;
pub mod record;
pub mod sink;
pub mod value;
pub mod writer;

pub use codec::{
    encode_frame, parse_frame, scan_frame, Frame, FrameCodec, FrameConfig, HEADER_SIZE,
    MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, PROTOCOL_OVERHEAD,
};
pub use crc::crc16;
pub use error::{FrameError, Result};
#[cfg(feature = "async")]
pub use framed::SmartlinkCodec;
pub use kind::{
    decode_kind, encode_header, is_valid_header, kind_name, FrameKind, SYNC_MASK, SYNC_PATTERN,
};
pub use message::Message;
pub use reader::FrameReader;
pub use record::{
    Command, DiscoveryResponse, ModuleInfo, SettingsData, TelemetryData, WireRecord, MAX_MODULES,
};
pub use sink::{LogSink, NoopSink, Severity, SharedSink, TracingSink};
pub use value::{Numeric, TaggedValue, Value, ValueTag};
pub use writer::FrameWriter;
