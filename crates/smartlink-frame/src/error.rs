use crate::kind::{kind_name, FrameKind};

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload does not fit in a single frame.
    #[error("payload too large ({size} bytes, max {max})")]
    OversizedPayload { size: usize, max: usize },

    /// The buffer is smaller than the fixed frame overhead.
    #[error("frame too small ({len} bytes, need at least {min})")]
    BufferTooShort { len: usize, min: usize },

    /// The low header bits do not carry the sync pattern.
    #[error("invalid frame header 0x{0:02x}")]
    InvalidHeader(u8),

    /// The header names a different message kind than the caller asked for.
    #[error("frame kind mismatch (expected {expected}, got {})", kind_label(.found))]
    KindMismatch { expected: FrameKind, found: u8 },

    /// The header names a kind outside the known set.
    #[error("unknown frame kind {0}")]
    UnknownKind(u8),

    /// The buffer length disagrees with the declared payload length.
    #[error("invalid frame size ({actual} bytes, header declares {declared}-byte payload)")]
    LengthInconsistent { declared: usize, actual: usize },

    /// The declared payload length is not the fixed size for the kind.
    #[error("payload size mismatch for {kind} (expected {expected}, got {declared})")]
    PayloadSizeMismatch {
        kind: FrameKind,
        expected: usize,
        declared: usize,
    },

    /// The trailing CRC does not match the recomputed one.
    #[error("CRC mismatch (received 0x{received:04x}, computed 0x{computed:04x})")]
    IntegrityCheckFailed { received: u16, computed: u16 },

    /// A tagged value carries a tag outside the known set.
    #[error("unknown value tag {0}")]
    UnknownValueTag(u16),

    /// A discovery response declares more modules than it can hold.
    #[error("module count {count} exceeds capacity {max}")]
    ModuleCountOutOfRange { count: usize, max: usize },

    /// A discovery response is already at capacity.
    #[error("discovery response full ({max} modules)")]
    DiscoveryFull { max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;

fn kind_label(raw: &u8) -> &'static str {
    kind_name(*raw)
}
