//! Audio format encoders
//!
//! - `wav`: 16-bit PCM WAV via hound (pure Rust)

pub mod wav;
