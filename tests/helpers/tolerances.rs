//! Tolerance constants for audio testing.

/// Floating point rounding errors (for passthrough, exact gain).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// 16-bit quantization step size.
/// Use when comparing decoded fixtures against the generated signal.
pub const INT16_EPSILON: f32 = 1.0 / 32768.0;

/// Silence threshold (~-80dB).
pub const SILENCE_THRESHOLD: f32 = 0.0001;

/// Clock comparisons in seconds.
pub const TIME_EPSILON: f64 = 1e-9;
