//! Mixing runtime kernel: sample buffers, signal graph, transport, track registry.
//!
//! # Primary API
//!
//! - [`AudioBackend`] / [`AudioGraph`]: the seam between the mixer and whatever renders audio
//! - [`HeadlessBackend`]: manually clocked software backend (tests, server-side renders)
//! - [`OfflineContext`]: fixed-length deterministic render target for export
//! - [`TrackRegistry`] / [`Track`]: the loaded tracks and their decoded buffers
//! - [`Transport`]: play/pause/stop/seek state and timeline ↔ clock conversion
//! - [`render_graph`]: builds `source → gain → master → output` paths on any graph
//!
//! # Feature-gated APIs
//!
//! - `"cpal"`: [`CpalBackend`] for the default hardware output device
//!
//! # Example
//!
//! ```ignore
//! use alkemix_core::{AudioGraph, Destination, HeadlessBackend};
//!
//! let mut backend = HeadlessBackend::new(44100);
//! let master = backend.create_gain(1.0, Destination::Output)?;
//! let source = backend.create_source(buffer, master)?;
//! backend.start_source(source, backend.now(), 0.0)?;
//! let block = backend.process(512);
//! ```

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::{MixerConfig, DEFAULT_SAMPLE_RATE, DEFAULT_WAVEFORM_WIDTH};

mod buffer;
pub use buffer::AudioBuffer;

pub mod decode;

mod graph;
pub use graph::{Destination, GainId, SignalGraph, SourceId};

mod offline;
pub use offline::{OfflineContext, RenderProgressCallback, OUTPUT_CHANNELS};

pub mod backend;
pub use backend::{AudioBackend, AudioGraph, HeadlessBackend};

#[cfg(feature = "cpal")]
pub use backend::CpalBackend;

mod track;
pub use track::{clamp_unit, SourceLocator, Track, TrackCategory, TrackId, TrackInfo};

mod registry;
pub use registry::TrackRegistry;

pub mod render_graph;
pub use render_graph::{MixPlan, MixVoice};

pub mod transport;
pub use transport::{Transition, Transport, TransportEvent, TransportState};
