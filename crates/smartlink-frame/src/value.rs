//! Inline type-tagged value cell.
//!
//! A [`TaggedValue`] holds one of a handful of scalar types, or a short
//! piece of text, in a fixed 16-byte buffer next to a 2-byte tag. It is
//! embedded in telemetry and settings records and can also travel as a
//! frame of its own.
//!
//! Reads never fail: asking for a type other than the stored one returns
//! that type's zero value.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{FrameError, Result};
use crate::sink::{emit, LogSink, Severity, TracingSink};

/// Size of the value storage buffer.
pub const STORAGE_SIZE: usize = 16;

/// Longest text that fits alongside its terminator.
pub const MAX_TEXT_LEN: usize = STORAGE_SIZE - 1;

/// Encoded size of a tagged value: tag (2) + storage (16).
pub const VALUE_SIZE: usize = 2 + STORAGE_SIZE;

/// Discriminator for the contents of a [`TaggedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum ValueTag {
    #[default]
    Empty = 0,
    Int32 = 1,
    UInt16 = 2,
    Float32 = 3,
    Text = 4,
}

impl ValueTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueTag::Empty => "empty",
            ValueTag::Int32 => "int32",
            ValueTag::UInt16 => "uint16",
            ValueTag::Float32 => "float",
            ValueTag::Text => "string",
        }
    }
}

impl TryFrom<u16> for ValueTag {
    type Error = FrameError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Int32),
            2 => Ok(Self::UInt16),
            3 => Ok(Self::Float32),
            4 => Ok(Self::Text),
            other => Err(FrameError::UnknownValueTag(other)),
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for i32 {}
    impl Sealed for u16 {}
    impl Sealed for f32 {}
}

/// Scalar types a [`TaggedValue`] can hold.
///
/// Sealed: only `i32`, `u16` and `f32` qualify.
pub trait Numeric: sealed::Sealed + Copy + Default {
    /// Tag recorded when a value of this type is packed.
    const TAG: ValueTag;

    #[doc(hidden)]
    fn write_le(self, storage: &mut [u8; STORAGE_SIZE]);

    #[doc(hidden)]
    fn read_le(storage: &[u8; STORAGE_SIZE]) -> Self;
}

macro_rules! impl_numeric {
    ($ty:ty, $tag:expr) => {
        impl Numeric for $ty {
            const TAG: ValueTag = $tag;

            fn write_le(self, storage: &mut [u8; STORAGE_SIZE]) {
                let bytes = self.to_le_bytes();
                storage[..bytes.len()].copy_from_slice(&bytes);
            }

            fn read_le(storage: &[u8; STORAGE_SIZE]) -> Self {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                let mut bytes = [0u8; WIDTH];
                bytes.copy_from_slice(&storage[..WIDTH]);
                <$ty>::from_le_bytes(bytes)
            }
        }
    };
}

impl_numeric!(i32, ValueTag::Int32);
impl_numeric!(u16, ValueTag::UInt16);
impl_numeric!(f32, ValueTag::Float32);

/// Owned view of a tagged value's contents.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    #[default]
    Empty,
    Int32(i32),
    UInt16(u16),
    Float32(f32),
    Text(String),
}

/// Fixed-size, type-discriminated value cell (18 bytes on the wire).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Value", into = "Value")
)]
pub struct TaggedValue {
    tag: ValueTag,
    storage: [u8; STORAGE_SIZE],
}

impl TaggedValue {
    /// An empty value.
    pub const fn new() -> Self {
        Self {
            tag: ValueTag::Empty,
            storage: [0; STORAGE_SIZE],
        }
    }

    /// Build a value holding `value`.
    pub fn from_numeric<T: Numeric>(value: T) -> Self {
        let mut cell = Self::new();
        cell.pack(value);
        cell
    }

    /// Store a scalar, replacing the previous contents.
    pub fn pack<T: Numeric>(&mut self, value: T) {
        self.storage = [0; STORAGE_SIZE];
        value.write_le(&mut self.storage);
        self.tag = T::TAG;
    }

    /// Store text, reporting truncation through the `tracing` dispatcher.
    ///
    /// `None` clears the value. Callers that own a sink should prefer
    /// [`pack_text_with`](Self::pack_text_with).
    pub fn pack_text(&mut self, text: Option<&str>) {
        self.pack_text_with(text, &TracingSink);
    }

    /// Store text, reporting truncation to `sink`.
    ///
    /// This is the primary text entry point; `pack_text` and the
    /// `From<Value>` conversion forward here with a [`TracingSink`].
    ///
    /// At most [`MAX_TEXT_LEN`] bytes are kept, followed by a zero
    /// terminator. Longer input is cut and one warning is emitted.
    pub fn pack_text_with(&mut self, text: Option<&str>, sink: &dyn LogSink) {
        let Some(text) = text else {
            self.clear();
            return;
        };

        let mut bytes = text.as_bytes();
        if bytes.len() > MAX_TEXT_LEN {
            emit(
                sink,
                Severity::Warning,
                "text truncated to 15 bytes plus terminator",
            );
            bytes = &bytes[..MAX_TEXT_LEN];
        }

        self.storage = [0; STORAGE_SIZE];
        self.storage[..bytes.len()].copy_from_slice(bytes);
        self.tag = ValueTag::Text;
    }

    /// Read the stored scalar, or `T::default()` if the tag names another type.
    pub fn unpack<T: Numeric>(&self) -> T {
        if self.tag != T::TAG {
            return T::default();
        }
        T::read_le(&self.storage)
    }

    /// Read the storage as zero-terminated text, regardless of the tag.
    ///
    /// Stops at the first zero byte and at the first byte that is not valid
    /// UTF-8, so a multi-byte character split by truncation is dropped.
    pub fn unpack_text(&self) -> &str {
        let end = self
            .storage
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(STORAGE_SIZE);
        let raw = &self.storage[..end];
        match std::str::from_utf8(raw) {
            Ok(text) => text,
            Err(err) => {
                // The prefix up to `valid_up_to` is valid UTF-8 by definition.
                std::str::from_utf8(&raw[..err.valid_up_to()]).unwrap_or_default()
            }
        }
    }

    /// Reset to empty and zero the storage.
    pub fn clear(&mut self) {
        self.tag = ValueTag::Empty;
        self.storage = [0; STORAGE_SIZE];
    }

    pub fn tag(&self) -> ValueTag {
        self.tag
    }

    /// Raw storage bytes.
    pub fn storage(&self) -> &[u8; STORAGE_SIZE] {
        &self.storage
    }

    pub fn is_empty(&self) -> bool {
        self.tag == ValueTag::Empty
    }

    /// Owned view of the contents, matched on the tag.
    pub fn value(&self) -> Value {
        match self.tag {
            ValueTag::Empty => Value::Empty,
            ValueTag::Int32 => Value::Int32(self.unpack()),
            ValueTag::UInt16 => Value::UInt16(self.unpack()),
            ValueTag::Float32 => Value::Float32(self.unpack()),
            ValueTag::Text => Value::Text(self.unpack_text().to_string()),
        }
    }

    pub(crate) fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u16_le(self.tag as u16);
        dst.put_slice(&self.storage);
    }

    /// Decode from the front of `src`, which must hold [`VALUE_SIZE`] bytes.
    pub(crate) fn decode(src: &mut impl Buf) -> Result<Self> {
        if src.remaining() < VALUE_SIZE {
            return Err(FrameError::BufferTooShort {
                len: src.remaining(),
                min: VALUE_SIZE,
            });
        }
        let tag = ValueTag::try_from(src.get_u16_le())?;
        let mut storage = [0u8; STORAGE_SIZE];
        src.copy_to_slice(&mut storage);
        Ok(Self { tag, storage })
    }
}

impl fmt::Debug for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Value::Empty => f.write_str("Empty"),
            Value::Int32(v) => write!(f, "Int32({v})"),
            Value::UInt16(v) => write!(f, "UInt16({v})"),
            Value::Float32(v) => write!(f, "Float32({v})"),
            Value::Text(v) => write!(f, "Text({v:?})"),
        }
    }
}

impl TaggedValue {
    /// Build a cell from an owned value, reporting text truncation to `sink`.
    pub fn from_value_with(value: &Value, sink: &dyn LogSink) -> Self {
        let mut cell = Self::new();
        match value {
            Value::Empty => {}
            Value::Int32(v) => cell.pack(*v),
            Value::UInt16(v) => cell.pack(*v),
            Value::Float32(v) => cell.pack(*v),
            Value::Text(v) => cell.pack_text_with(Some(v), sink),
        }
        cell
    }
}

impl From<Value> for TaggedValue {
    fn from(value: Value) -> Self {
        Self::from_value_with(&value, &TracingSink)
    }
}

impl From<TaggedValue> for Value {
    fn from(cell: TaggedValue) -> Self {
        cell.value()
    }
}
