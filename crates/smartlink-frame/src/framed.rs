//! `tokio-util` codec for framing async byte streams.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{encode_frame, scan_frame, Frame, FrameConfig};
use crate::error::FrameError;

/// Frame codec for `FramedRead` / `FramedWrite`.
///
/// Decoding resynchronises on line noise exactly like
/// [`FrameReader`](crate::FrameReader).
#[derive(Debug, Clone, Default)]
pub struct SmartlinkCodec {
    config: FrameConfig,
}

impl SmartlinkCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Decoder for SmartlinkCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(scan_frame(src, self.config.effective_max_payload()))
    }

    /// Drops candidates that can no longer complete, then discards the rest.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let max_payload = self.config.effective_max_payload();
        loop {
            if let Some(frame) = scan_frame(src, max_payload) {
                return Ok(Some(frame));
            }
            if src.is_empty() {
                return Ok(None);
            }
            src.advance(1);
        }
    }
}

impl Encoder<Frame> for SmartlinkCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let max = self.config.effective_max_payload();
        if item.payload.len() > max {
            return Err(FrameError::OversizedPayload {
                size: item.payload.len(),
                max,
            });
        }
        encode_frame(item.kind, &item.payload, dst)
    }
}
