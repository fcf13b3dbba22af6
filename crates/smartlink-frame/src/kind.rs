//! Message kinds and header packing.
//!
//! The header byte carries a 5-bit sync pattern in its low bits and the
//! 3-bit message kind in its high bits.

use std::fmt;

use crate::record::{COMMAND_SIZE, DISCOVERY_SIZE, SETTINGS_SIZE, TELEMETRY_SIZE};
use crate::value::VALUE_SIZE;

/// Fixed low-order header bits marking the start of a frame.
pub const SYNC_PATTERN: u8 = 0x02;

/// Mask selecting the sync bits of a header.
pub const SYNC_MASK: u8 = 0x1F;

/// Position of the kind tag within the header.
pub const KIND_SHIFT: u8 = 5;

/// Message discriminator carried in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameKind {
    Command = 0x00,
    Discovery = 0x01,
    Telemetry = 0x02,
    Settings = 0x03,
    Value = 0x04,
}

impl FrameKind {
    /// All kinds, in tag order.
    pub const ALL: [FrameKind; 5] = [
        FrameKind::Command,
        FrameKind::Discovery,
        FrameKind::Telemetry,
        FrameKind::Settings,
        FrameKind::Value,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            FrameKind::Command => "COMMAND",
            FrameKind::Discovery => "DISCOVERY",
            FrameKind::Telemetry => "TELEMETRY",
            FrameKind::Settings => "SETTINGS",
            FrameKind::Value => "VALUE",
        }
    }

    /// The fixed payload size carried by frames of this kind.
    pub fn payload_size(self) -> usize {
        match self {
            FrameKind::Command => COMMAND_SIZE,
            FrameKind::Discovery => DISCOVERY_SIZE,
            FrameKind::Telemetry => TELEMETRY_SIZE,
            FrameKind::Settings => SETTINGS_SIZE,
            FrameKind::Value => VALUE_SIZE,
        }
    }

    /// The header byte for this kind.
    pub fn header(self) -> u8 {
        encode_header(self)
    }
}

impl TryFrom<u8> for FrameKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Command),
            0x01 => Ok(Self::Discovery),
            0x02 => Ok(Self::Telemetry),
            0x03 => Ok(Self::Settings),
            0x04 => Ok(Self::Value),
            other => Err(other),
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns a human-readable name for a raw kind tag.
pub fn kind_name(raw: u8) -> &'static str {
    FrameKind::try_from(raw).map_or("UNKNOWN", FrameKind::name)
}

/// Pack a kind into a header byte.
pub const fn encode_header(kind: FrameKind) -> u8 {
    ((kind as u8) << KIND_SHIFT) | SYNC_PATTERN
}

/// Extract the raw kind tag from a header byte.
pub const fn decode_kind(header: u8) -> u8 {
    header >> KIND_SHIFT
}

/// Returns true if the header carries the sync pattern.
pub const fn is_valid_header(header: u8) -> bool {
    (header & SYNC_MASK) == SYNC_PATTERN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_header_is_raw_sync_pattern() {
        assert_eq!(encode_header(FrameKind::Command), 0x02);
    }

    #[test]
    fn every_kind_header_is_valid_and_decodes_back() {
        for kind in FrameKind::ALL {
            let header = encode_header(kind);
            assert!(is_valid_header(header), "{kind} header 0x{header:02x}");
            assert_eq!(FrameKind::try_from(decode_kind(header)), Ok(kind));
        }
    }

    #[test]
    fn headers_are_distinct() {
        let headers: Vec<u8> = FrameKind::ALL.iter().map(|k| k.header()).collect();
        assert_eq!(headers, vec![0x02, 0x22, 0x42, 0x62, 0x82]);
    }

    #[test]
    fn sync_bits_must_match() {
        assert!(!is_valid_header(0x00));
        assert!(!is_valid_header(0x03));
        assert!(!is_valid_header(0x1F));
        assert!(is_valid_header(0xE2));
    }

    #[test]
    fn unknown_kinds_are_named() {
        assert_eq!(kind_name(0), "COMMAND");
        assert_eq!(kind_name(4), "VALUE");
        assert_eq!(kind_name(5), "UNKNOWN");
        assert_eq!(FrameKind::try_from(7), Err(7));
    }

    #[test]
    fn payload_sizes() {
        assert_eq!(FrameKind::Command.payload_size(), 26);
        assert_eq!(FrameKind::Discovery.payload_size(), 57);
        assert_eq!(FrameKind::Telemetry.payload_size(), 24);
        assert_eq!(FrameKind::Settings.payload_size(), 20);
        assert_eq!(FrameKind::Value.payload_size(), 18);
    }
}
