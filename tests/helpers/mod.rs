//! Test helpers and fixtures for alkemix integration tests
//!
//! Fixtures are generated in memory: signals are written to 16-bit WAV bytes
//! with hound and served to the mixer through a [`MemorySupplier`].
//!
//! ## Tolerance Levels
//!
//! - `FLOAT_EPSILON` (1e-6): Exact operations (unity gain, summing)
//! - `INT16_EPSILON`: one 16-bit quantization step
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use alkemix::prelude::*;

/// Test sample rate; low to keep fixtures small.
pub const TEST_SAMPLE_RATE: u32 = 8000;

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, amplitude: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate a DC offset signal (constant value).
pub fn generate_dc(value: f32, num_samples: usize) -> Vec<f32> {
    vec![value; num_samples]
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Quantize to what a 16-bit fixture decodes back to.
pub fn quantize(sample: f32) -> f32 {
    ((sample * 32768.0) as i16) as f32 / 32768.0
}

/// Encode planar channels as 16-bit PCM WAV bytes.
pub fn wav_fixture(channels: &[Vec<f32>], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut bytes = Vec::new();
    {
        let mut writer = hound::WavWriter::new(std::io::Cursor::new(&mut bytes), spec)
            .expect("Failed to create WAV writer");
        for frame in 0..channels[0].len() {
            for channel in channels {
                writer
                    .write_sample((channel[frame] * 32768.0) as i16)
                    .expect("Failed to write sample");
            }
        }
        writer.finalize().expect("Failed to finalize WAV");
    }
    bytes
}

pub fn mono_fixture(samples: &[f32]) -> Vec<u8> {
    wav_fixture(&[samples.to_vec()], TEST_SAMPLE_RATE)
}

/// Headless mixer at [`TEST_SAMPLE_RATE`] serving `sources`.
pub fn test_mixer(sources: MemorySupplier) -> Mixer {
    Mixer::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .supplier(sources)
        .build()
        .expect("Failed to create test mixer")
}

/// Read back exported WAV bytes as interleaved i16 samples.
pub fn read_wav(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let mut reader =
        hound::WavReader::new(std::io::Cursor::new(bytes)).expect("Exported bytes are not WAV");
    let spec = reader.spec();
    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .expect("Failed to read samples");
    (spec, samples)
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Assert that a signal is approximately silent (all values near zero).
pub fn assert_silence(samples: &[f32], tolerance: f32) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {}",
        max
    );
}

/// Assert two signals are identical sample for sample.
pub fn assert_signals_identical(a: &[f32], b: &[f32], context: &str) {
    assert_eq!(a.len(), b.len(), "{}: length differs", context);
    if let Some(i) = a.iter().zip(b).position(|(x, y)| x != y) {
        panic!(
            "{}: first difference at sample {} ({} vs {})",
            context, i, a[i], b[i]
        );
    }
}
