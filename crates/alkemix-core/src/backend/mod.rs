//! Render backend seam.
//!
//! [`AudioGraph`] is the node API the render graph builder talks to; both live
//! backends and [`OfflineContext`] implement it. [`AudioBackend`] adds what
//! only a live backend has: decoding, a suspend/resume lifecycle and an
//! offline variant.

use crate::graph::{Destination, GainId, SourceId};
use crate::{AudioBuffer, OfflineContext, Result};
use std::sync::Arc;

mod headless;
pub use headless::HeadlessBackend;

#[cfg(feature = "cpal")]
mod hardware;
#[cfg(feature = "cpal")]
pub use hardware::CpalBackend;

/// Node-level graph operations.
pub trait AudioGraph {
    fn sample_rate(&self) -> u32;

    /// Monotonic graph clock in seconds.
    fn now(&self) -> f64;

    fn create_gain(&mut self, value: f32, destination: Destination) -> Result<GainId>;

    fn set_gain(&mut self, id: GainId, value: f32);

    fn gain_value(&self, id: GainId) -> Option<f32>;

    fn disconnect_gain(&mut self, id: GainId);

    fn create_source(&mut self, buffer: Arc<AudioBuffer>, output: GainId) -> Result<SourceId>;

    /// Start a source once. `when` is graph clock time, `offset` is seconds into the buffer.
    fn start_source(&mut self, id: SourceId, when: f64, offset: f64) -> Result<()>;

    fn stop_source(&mut self, id: SourceId);

    fn is_source_active(&self, id: SourceId) -> bool;
}

/// A live render backend.
pub trait AudioBackend: AudioGraph {
    /// Decode encoded bytes into a sample buffer, probing `extension` first.
    fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<AudioBuffer> {
        crate::decode::decode_audio(bytes, extension)
    }

    fn is_suspended(&self) -> bool;

    fn resume(&mut self) -> Result<()>;

    /// Allocate a non-real-time render target of `frames` stereo frames.
    fn offline_context(&self, frames: usize) -> Result<OfflineContext> {
        Ok(OfflineContext::new(frames, self.sample_rate()))
    }

    /// Release device resources. The backend must not be used afterwards.
    fn close(&mut self) {}
}
