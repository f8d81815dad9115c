//! # Alkemix - Multi-track Timeline Mixer
//!
//! Mixing engine for a film editing timeline: dialogue, music, effects and
//! ambient tracks played in sync against a backend audio clock, with waveform
//! data for drawing and an offline, sample-accurate WAV mixdown.
//!
//! ## Architecture
//!
//! Alkemix is an umbrella crate that coordinates:
//! - **alkemix-core** - Sample buffers, signal graph, backends, tracks, transport
//! - **alkemix-analysis** - Waveform envelopes
//! - **alkemix-export** - Offline rendering and WAV encoding
//!
//! ## Quick Start
//!
//! ```ignore
//! use alkemix::prelude::*;
//!
//! let mut mixer = Mixer::builder()
//!     .supplier(FileSupplier::with_root("media"))
//!     .build()?;
//!
//! mixer.add_track(TrackSpec::new("vo", TrackCategory::Dialogue, "vo.wav"))?;
//! mixer.add_track(
//!     TrackSpec::new("rain", TrackCategory::Ambient, "rain.ogg")
//!         .start_time(3.0)
//!         .volume(0.3),
//! )?;
//!
//! mixer.play();
//! let position = mixer.current_time();
//!
//! let wav = mixer.export_mixed_audio(None)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `cpal` - Hardware output on the default device
//! - `serialization` - serde derives on waveform blocks

/// Re-export of alkemix-core for direct access
pub use alkemix_core as core;

pub use alkemix_analysis as analysis;
pub use alkemix_export as export;

// Core types
pub use alkemix_core::{
    AudioBackend, AudioBuffer, AudioGraph, HeadlessBackend, MixerConfig, SourceLocator,
    TrackCategory, TrackId, TrackInfo, TransportState,
};

#[cfg(feature = "cpal")]
pub use alkemix_core::CpalBackend;

pub use alkemix_analysis::WaveformBlock;

pub use alkemix_export::{
    ExportHandle, ExportPhase, ExportProgress, ExportStatus, Mixdown, WAV_MIME,
};

mod builder;
mod error;
mod mixer;
mod session;
mod source;
mod track_spec;

pub use builder::MixerBuilder;
pub use error::{Error, Result};
pub use mixer::{Mixer, MixerState};
pub use session::MixerSession;
pub use source::{FetchError, FileSupplier, MemorySupplier, SourceSupplier};
pub use track_spec::TrackSpec;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        ExportStatus, FileSupplier, MemorySupplier, Mixer, MixerBuilder, MixerSession,
        MixerState, SourceSupplier, TrackCategory, TrackSpec, TransportState,
    };
}
