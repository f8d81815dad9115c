//! # Alkemix Export
//!
//! Offline mixdown rendering for the alkemix mixer.
//!
//! This crate provides:
//! - **Rendering**: [`OfflineRenderer`] turns a [`MixPlan`](alkemix_core::MixPlan) into a stereo [`Mixdown`]
//! - **Format encoding**: 16-bit PCM WAV via hound
//! - **Background export**: [`ExportHandle`] renders on its own thread with pollable progress
//!
//! ## Note
//!
//! This crate is typically not used directly. Use the export methods on the
//! `alkemix::Mixer` facade instead:
//!
//! ```ignore
//! let wav = mixer.export_mixed_audio(None)?;
//! std::fs::write("mix.wav", wav)?;
//! ```

pub mod error;
pub mod format;
mod handle;
mod renderer;

pub use error::{ExportError, Result};
pub use format::wav::{encode_buffer, WavConfig, WAV_HEADER_LEN, WAV_MIME};
pub use handle::{ExportHandle, ExportStatus};
pub use renderer::{
    frame_count, resolve_duration, MAX_EXPORT_FRAMES, ExportPhase, ExportProgress, Mixdown, OfflineRenderer,
};
