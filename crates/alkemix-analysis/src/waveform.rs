//! Waveform Analysis
//!
//! Downsample a channel into a fixed number of blocks. Samples are split into
//! `width` contiguous blocks of `floor(N / width)` samples each; any remainder
//! at the end is not visualized. Widths above [`MAX_WAVEFORM_WIDTH`] are
//! clamped to it.

/// Largest number of blocks a waveform is computed at.
pub const MAX_WAVEFORM_WIDTH: usize = 1 << 16;

/// A single block of waveform summary data
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct WaveformBlock {
    /// Minimum sample value in this block
    pub min: f32,
    /// Maximum sample value in this block
    pub max: f32,
    /// RMS (root mean square) level of this block
    pub rms: f32,
}

/// Iterate the `width` equal blocks of `samples`.
fn blocks(samples: &[f32], width: usize) -> impl Iterator<Item = &[f32]> {
    let width = width.min(MAX_WAVEFORM_WIDTH);
    let block_size = if width == 0 { 0 } else { samples.len() / width };
    (0..width).map(move |i| &samples[i * block_size..(i + 1) * block_size])
}

/// Mean absolute sample value per block; exactly `width` values up to
/// [`MAX_WAVEFORM_WIDTH`].
///
/// For samples in [-1, 1] every value lies in [0, 1]. When there are fewer
/// samples than blocks, each block is empty and reads 0.
pub fn amplitude_envelope(samples: &[f32], width: usize) -> Vec<f32> {
    blocks(samples, width)
        .map(|block| {
            if block.is_empty() {
                return 0.0;
            }
            let sum: f32 = block.iter().map(|s| s.abs()).sum();
            sum / block.len() as f32
        })
        .collect()
}

/// Min/max/RMS per block, same partitioning as [`amplitude_envelope`].
pub fn peak_blocks(samples: &[f32], width: usize) -> Vec<WaveformBlock> {
    blocks(samples, width).map(compute_block).collect()
}

/// Compute a single block's statistics
fn compute_block(samples: &[f32]) -> WaveformBlock {
    if samples.is_empty() {
        return WaveformBlock::default();
    }

    let mut min = f32::MAX;
    let mut max = f32::MIN;
    let mut sum_sq = 0.0f32;

    for &sample in samples {
        min = min.min(sample);
        max = max.max(sample);
        sum_sq += sample * sample;
    }

    WaveformBlock {
        min,
        max,
        rms: (sum_sq / samples.len() as f32).sqrt(),
    }
}
