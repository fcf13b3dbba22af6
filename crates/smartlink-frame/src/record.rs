//! Fixed-layout message records.
//!
//! Every record has exactly one encoded size. Fields are packed with no
//! padding and multi-byte fields are little-endian.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{FrameError, Result};
use crate::kind::FrameKind;
use crate::value::{TaggedValue, VALUE_SIZE};

/// Capacity of the module table in a discovery response.
pub const MAX_MODULES: usize = 8;

/// Encoded size of a [`Command`].
pub const COMMAND_SIZE: usize = 26;

/// Encoded size of a [`ModuleInfo`].
pub const MODULE_INFO_SIZE: usize = 7;

/// Encoded size of a [`DiscoveryResponse`].
pub const DISCOVERY_SIZE: usize = 1 + MODULE_INFO_SIZE * MAX_MODULES;

/// Encoded size of a [`TelemetryData`].
pub const TELEMETRY_SIZE: usize = VALUE_SIZE + 2 + 4;

/// Encoded size of a [`SettingsData`].
pub const SETTINGS_SIZE: usize = VALUE_SIZE + 2;

/// A record that travels as the payload of one frame kind.
pub trait WireRecord: Sized {
    /// The frame kind carrying this record.
    const KIND: FrameKind;

    /// Exact payload size in bytes.
    const ENCODED_SIZE: usize;

    /// Append exactly [`Self::ENCODED_SIZE`] bytes to `dst`.
    fn encode_payload(&self, dst: &mut BytesMut);

    /// Decode from a payload of exactly [`Self::ENCODED_SIZE`] bytes.
    fn decode_payload(src: &[u8]) -> Result<Self>;
}

fn check_len(src: &[u8], kind: FrameKind, expected: usize) -> Result<()> {
    if src.len() != expected {
        return Err(FrameError::PayloadSizeMismatch {
            kind,
            expected,
            declared: src.len(),
        });
    }
    Ok(())
}

/// Motion/actuator command sent to a peripheral.
///
/// Equality follows `f32` semantics, so a command carrying NaN is never
/// equal to itself even though it encodes to identical bytes. Compare the
/// encoded payloads when that matters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub command_type: u16,
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub s: i16,
    pub t: i16,
    pub u: i16,
    pub v: i16,
}

impl WireRecord for Command {
    const KIND: FrameKind = FrameKind::Command;
    const ENCODED_SIZE: usize = COMMAND_SIZE;

    fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.command_type);
        for f in [self.w, self.x, self.y, self.z] {
            dst.put_f32_le(f);
        }
        for i in [self.s, self.t, self.u, self.v] {
            dst.put_i16_le(i);
        }
    }

    fn decode_payload(mut src: &[u8]) -> Result<Self> {
        check_len(src, Self::KIND, Self::ENCODED_SIZE)?;
        Ok(Self {
            command_type: src.get_u16_le(),
            w: src.get_f32_le(),
            x: src.get_f32_le(),
            y: src.get_f32_le(),
            z: src.get_f32_le(),
            s: src.get_i16_le(),
            t: src.get_i16_le(),
            u: src.get_i16_le(),
            v: src.get_i16_le(),
        })
    }
}

/// One entry of a discovery response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleInfo {
    pub type_id: u16,
    pub instance_id: u8,
    pub capabilities: u32,
}

impl ModuleInfo {
    pub const fn new(type_id: u16, instance_id: u8, capabilities: u32) -> Self {
        Self {
            type_id,
            instance_id,
            capabilities,
        }
    }

    fn encode(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.type_id);
        dst.put_u8(self.instance_id);
        dst.put_u32_le(self.capabilities);
    }

    fn decode(src: &mut &[u8]) -> Self {
        Self {
            type_id: src.get_u16_le(),
            instance_id: src.get_u8(),
            capabilities: src.get_u32_le(),
        }
    }
}

/// Modules attached to a peripheral, as reported during discovery.
///
/// Holds at most [`MAX_MODULES`] entries. The wire form always carries the
/// full table; unused slots are written as zeros and ignored on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<ModuleInfo>", into = "Vec<ModuleInfo>")
)]
pub struct DiscoveryResponse {
    module_count: u8,
    modules: [ModuleInfo; MAX_MODULES],
}

impl DiscoveryResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a response from a list of modules.
    pub fn from_modules(modules: &[ModuleInfo]) -> Result<Self> {
        let mut resp = Self::new();
        for module in modules {
            resp.push(*module)?;
        }
        Ok(resp)
    }

    /// Append a module, failing once the table is full.
    pub fn push(&mut self, module: ModuleInfo) -> Result<()> {
        let idx = usize::from(self.module_count);
        if idx >= MAX_MODULES {
            return Err(FrameError::DiscoveryFull { max: MAX_MODULES });
        }
        self.modules[idx] = module;
        self.module_count += 1;
        Ok(())
    }

    pub fn module_count(&self) -> u8 {
        self.module_count
    }

    pub fn len(&self) -> usize {
        usize::from(self.module_count)
    }

    pub fn is_empty(&self) -> bool {
        self.module_count == 0
    }

    /// The populated entries.
    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules[..self.len()]
    }
}

impl WireRecord for DiscoveryResponse {
    const KIND: FrameKind = FrameKind::Discovery;
    const ENCODED_SIZE: usize = DISCOVERY_SIZE;

    fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.module_count);
        for module in self.modules() {
            module.encode(dst);
        }
        dst.put_bytes(0, MODULE_INFO_SIZE * (MAX_MODULES - self.len()));
    }

    fn decode_payload(mut src: &[u8]) -> Result<Self> {
        check_len(src, Self::KIND, Self::ENCODED_SIZE)?;
        let count = src.get_u8();
        if usize::from(count) > MAX_MODULES {
            return Err(FrameError::ModuleCountOutOfRange {
                count: usize::from(count),
                max: MAX_MODULES,
            });
        }

        let mut resp = Self::new();
        for _ in 0..count {
            resp.push(ModuleInfo::decode(&mut src))?;
        }
        Ok(resp)
    }
}

impl TryFrom<Vec<ModuleInfo>> for DiscoveryResponse {
    type Error = FrameError;

    fn try_from(modules: Vec<ModuleInfo>) -> Result<Self> {
        Self::from_modules(&modules)
    }
}

impl From<DiscoveryResponse> for Vec<ModuleInfo> {
    fn from(resp: DiscoveryResponse) -> Self {
        resp.modules().to_vec()
    }
}

/// A sampled value reported by a peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryData {
    pub value: TaggedValue,
    pub source_id: u16,
    pub timestamp: u32,
}

impl WireRecord for TelemetryData {
    const KIND: FrameKind = FrameKind::Telemetry;
    const ENCODED_SIZE: usize = TELEMETRY_SIZE;

    fn encode_payload(&self, dst: &mut BytesMut) {
        self.value.encode(dst);
        dst.put_u16_le(self.source_id);
        dst.put_u32_le(self.timestamp);
    }

    fn decode_payload(mut src: &[u8]) -> Result<Self> {
        check_len(src, Self::KIND, Self::ENCODED_SIZE)?;
        Ok(Self {
            value: TaggedValue::decode(&mut src)?,
            source_id: src.get_u16_le(),
            timestamp: src.get_u32_le(),
        })
    }
}

/// A configuration value addressed by settings id.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettingsData {
    pub value: TaggedValue,
    pub settings_id: u16,
}

impl WireRecord for SettingsData {
    const KIND: FrameKind = FrameKind::Settings;
    const ENCODED_SIZE: usize = SETTINGS_SIZE;

    fn encode_payload(&self, dst: &mut BytesMut) {
        self.value.encode(dst);
        dst.put_u16_le(self.settings_id);
    }

    fn decode_payload(mut src: &[u8]) -> Result<Self> {
        check_len(src, Self::KIND, Self::ENCODED_SIZE)?;
        Ok(Self {
            value: TaggedValue::decode(&mut src)?,
            settings_id: src.get_u16_le(),
        })
    }
}

impl WireRecord for TaggedValue {
    const KIND: FrameKind = FrameKind::Value;
    const ENCODED_SIZE: usize = VALUE_SIZE;

    fn encode_payload(&self, dst: &mut BytesMut) {
        self.encode(dst);
    }

    fn decode_payload(mut src: &[u8]) -> Result<Self> {
        check_len(src, Self::KIND, Self::ENCODED_SIZE)?;
        TaggedValue::decode(&mut src)
    }
}
