//! # Alkemix Analysis
//!
//! Waveform data for drawing tracks on a timeline.
//!
//! All functions operate on raw `&[f32]` sample buffers - no framework dependencies.
//!
//! ## Example
//!
//! ```rust
//! use alkemix_analysis::waveform::{amplitude_envelope, peak_blocks};
//!
//! let samples: Vec<f32> = vec![0.25; 44100];
//!
//! // One mean-absolute value per pixel column
//! let envelope = amplitude_envelope(&samples, 800);
//! assert_eq!(envelope.len(), 800);
//!
//! // Min/max/RMS per column for a filled waveform
//! let blocks = peak_blocks(&samples, 800);
//! assert_eq!(blocks.len(), 800);
//! ```

pub mod waveform;

pub use waveform::{amplitude_envelope, peak_blocks, WaveformBlock, MAX_WAVEFORM_WIDTH};
