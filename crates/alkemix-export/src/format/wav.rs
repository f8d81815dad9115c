//! WAV format encoder using hound
//!
//! Writes 16-bit signed PCM with the canonical 44-byte header.

use crate::error::{ExportError, Result};
use alkemix_core::AudioBuffer;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::{Seek, Write};
use std::path::Path;

/// MIME type of the exported artifact.
pub const WAV_MIME: &str = "audio/wav";

/// Size of the RIFF/fmt/data header hound writes for 16-bit PCM.
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;

/// WAV encoder configuration
#[derive(Debug, Clone)]
pub struct WavConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl Default for WavConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
        }
    }
}

impl WavConfig {
    /// Create a new WAV config for stereo output
    pub fn stereo(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 2,
        }
    }

    /// Bytes per interleaved frame.
    pub fn block_align(&self) -> u16 {
        self.channels * BITS_PER_SAMPLE / 8
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// Total file length for `frames` frames.
    pub fn file_len(&self, frames: usize) -> usize {
        WAV_HEADER_LEN + frames * self.block_align() as usize
    }
}

/// Encode a rendered stereo buffer to WAV bytes.
pub fn encode_buffer(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    let (left, right) = stereo_pair(buffer)?;
    encode_wav_memory(left, right, &WavConfig::stereo(buffer.sample_rate()))
}

/// Encode a rendered stereo buffer to a WAV file.
pub fn encode_buffer_file(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let (left, right) = stereo_pair(buffer)?;
    encode_wav_file(left, right, path, &WavConfig::stereo(buffer.sample_rate()))
}

fn stereo_pair(buffer: &AudioBuffer) -> Result<(&[f32], &[f32])> {
    if buffer.channels() != 2 {
        return Err(ExportError::Encoding(format!(
            "expected a stereo mixdown, got {} channels",
            buffer.channels()
        )));
    }
    Ok((buffer.channel(0), buffer.channel(1)))
}

/// Encode stereo audio to WAV file
///
/// # Arguments
/// * `left` - Left channel samples (normalized -1.0 to 1.0)
/// * `right` - Right channel samples (normalized -1.0 to 1.0)
/// * `path` - Output file path
/// * `config` - WAV configuration
pub fn encode_wav_file(left: &[f32], right: &[f32], path: &Path, config: &WavConfig) -> Result<()> {
    check_lengths(left, right)?;

    let mut writer = WavWriter::create(path, create_wav_spec(config))?;
    write_samples(&mut writer, left, right)?;
    writer.finalize()?;

    Ok(())
}

/// Encode stereo audio to WAV in memory
///
/// # Returns
/// WAV file bytes
pub fn encode_wav_memory(left: &[f32], right: &[f32], config: &WavConfig) -> Result<Vec<u8>> {
    check_lengths(left, right)?;

    let mut buffer = Vec::with_capacity(config.file_len(left.len()));
    {
        let cursor = std::io::Cursor::new(&mut buffer);
        let mut writer = WavWriter::new(cursor, create_wav_spec(config))?;

        write_samples(&mut writer, left, right)?;

        // Finalize writes the header sizes and flushes
        writer.finalize()?;
    }

    Ok(buffer)
}

fn check_lengths(left: &[f32], right: &[f32]) -> Result<()> {
    if left.len() != right.len() {
        return Err(ExportError::Encoding(
            "Left and right channels have different lengths".into(),
        ));
    }
    Ok(())
}

/// Create hound WavSpec from our config
fn create_wav_spec(config: &WavConfig) -> WavSpec {
    WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Write interleaved stereo samples to the writer
fn write_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    left: &[f32],
    right: &[f32],
) -> Result<()> {
    for (&l, &r) in left.iter().zip(right) {
        writer.write_sample(float_to_i16(l))?;
        writer.write_sample(float_to_i16(r))?;
    }
    Ok(())
}

/// Convert float sample to 16-bit integer with clipping.
///
/// Negative values scale by 32768 and positive by 32767, truncating toward zero.
#[inline]
pub fn float_to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}
