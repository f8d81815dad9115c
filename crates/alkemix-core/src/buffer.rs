//! Decoded sample storage.

use crate::{Error, Result};

/// Immutable planar multi-channel sample buffer.
///
/// All channels hold the same number of frames. Buffers are shared as
/// `Arc<AudioBuffer>` once decoded and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Build a buffer from planar channel data.
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::Decode("sample rate must be non-zero".into()));
        }
        if channels.is_empty() {
            return Err(Error::Decode("audio has no channels".into()));
        }
        let frames = channels[0].len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(Error::Decode(
                "channels have different lengths".into(),
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Caller guarantees a non-zero rate and equal, non-empty channel list.
    pub(crate) fn from_parts(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        debug_assert!(sample_rate > 0 && !channels.is_empty());
        Self {
            sample_rate,
            channels,
        }
    }

    /// Build a buffer from interleaved samples.
    pub fn from_interleaved(sample_rate: u32, channel_count: usize, samples: &[f32]) -> Result<Self> {
        if channel_count == 0 {
            return Err(Error::Decode("audio has no channels".into()));
        }
        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (ch, &sample) in frame.iter().enumerate() {
                channels[ch].push(sample);
            }
        }
        Self::from_channels(sample_rate, channels)
    }

    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self> {
        Self::from_channels(sample_rate, vec![samples])
    }

    pub fn stereo(sample_rate: u32, left: Vec<f32>, right: Vec<f32>) -> Result<Self> {
        Self::from_channels(sample_rate, vec![left, right])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    /// Length in seconds at the native sample rate.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel. Panics if `index >= channels()`.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// The channel that feeds output `side` (0 = left, 1 = right).
    ///
    /// Mono buffers feed both sides; buffers with more than two channels
    /// contribute only their first two.
    #[inline]
    pub(crate) fn output_channel(&self, side: usize) -> &[f32] {
        &self.channels[side.min(self.channels.len() - 1)]
    }

    /// Peak absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .map(|s| s.abs())
            .fold(0.0f32, f32::max)
    }
}
