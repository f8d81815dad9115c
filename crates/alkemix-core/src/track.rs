//! Track model.

use crate::graph::{GainId, SourceId};
use crate::AudioBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied track identifier, unique within a mixer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for TrackId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TrackId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Opaque reference to the encoded bytes of a track (path, URL or storage key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocator(String);

impl SourceLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased file extension, if the locator ends in one.
    pub fn extension(&self) -> Option<String> {
        let name = self.0.rsplit(['/', '\\']).next()?;
        let name = name.split(['?', '#']).next()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceLocator {
    fn from(locator: &str) -> Self {
        Self::new(locator)
    }
}

impl From<String> for SourceLocator {
    fn from(locator: String) -> Self {
        Self(locator)
    }
}

/// What a track carries. Informational; mixing treats every category alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackCategory {
    Dialogue,
    Music,
    Effects,
    Ambient,
}

impl TrackCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackCategory::Dialogue => "dialogue",
            TrackCategory::Music => "music",
            TrackCategory::Effects => "effects",
            TrackCategory::Ambient => "ambient",
        }
    }
}

impl fmt::Display for TrackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp a gain to [0, 1]; NaN becomes 0.
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One decoded audio source placed on the timeline.
#[derive(Debug)]
pub struct Track {
    id: TrackId,
    category: TrackCategory,
    source: SourceLocator,
    buffer: Arc<AudioBuffer>,
    volume: f32,
    muted: bool,
    start_time: f64,
    duration: f64,
    gain: GainId,
    live_source: Option<SourceId>,
}

impl Track {
    /// `gain` is the track's node in the live graph, already wired to the master.
    pub fn new(
        id: TrackId,
        category: TrackCategory,
        source: SourceLocator,
        buffer: Arc<AudioBuffer>,
        gain: GainId,
    ) -> Self {
        let duration = buffer.duration();
        Self {
            id,
            category,
            source,
            buffer,
            volume: 1.0,
            muted: false,
            start_time: 0.0,
            duration,
            gain,
            live_source: None,
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Negative or non-finite offsets are placed at 0.
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = if start_time.is_finite() {
            start_time.max(0.0)
        } else {
            0.0
        };
        self
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn category(&self) -> TrackCategory {
        self.category
    }

    pub fn source(&self) -> &SourceLocator {
        &self.source
    }

    pub fn buffer(&self) -> &Arc<AudioBuffer> {
        &self.buffer
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Store a clamped volume and return it.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = clamp_unit(volume);
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// The gain actually applied: 0 while muted, else the volume.
    #[inline]
    pub fn effective_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Timeline time at which the track falls silent.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    pub fn gain(&self) -> GainId {
        self.gain
    }

    pub fn live_source(&self) -> Option<SourceId> {
        self.live_source
    }

    pub(crate) fn replace_live_source(&mut self, source: Option<SourceId>) -> Option<SourceId> {
        std::mem::replace(&mut self.live_source, source)
    }

    pub fn info(&self) -> TrackInfo {
        TrackInfo {
            id: self.id.clone(),
            category: self.category,
            source: self.source.clone(),
            volume: self.volume,
            muted: self.muted,
            effective_gain: self.effective_gain(),
            start_time: self.start_time,
            duration: self.duration,
            is_live: self.live_source.is_some(),
        }
    }
}

/// Snapshot of a track for UI consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    pub id: TrackId,
    pub category: TrackCategory,
    pub source: SourceLocator,
    pub volume: f32,
    pub muted: bool,
    pub effective_gain: f32,
    pub start_time: f64,
    pub duration: f64,
    pub is_live: bool,
}
