use alkemix_core::{SourceLocator, TrackCategory, TrackId};

/// What to load for [`Mixer::add_track`](crate::Mixer::add_track).
///
/// # Example
///
/// ```ignore
/// let spec = TrackSpec::new("narration", TrackCategory::Dialogue, "vo/take3.wav")
///     .start_time(2.5)
///     .volume(0.8);
/// mixer.add_track(spec)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSpec {
    pub(crate) id: TrackId,
    pub(crate) category: TrackCategory,
    pub(crate) source: SourceLocator,
    pub(crate) start_time: f64,
    pub(crate) volume: f32,
    pub(crate) muted: bool,
}

impl TrackSpec {
    pub fn new(
        id: impl Into<TrackId>,
        category: TrackCategory,
        source: impl Into<SourceLocator>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            source: source.into(),
            start_time: 0.0,
            volume: 1.0,
            muted: false,
        }
    }

    /// Timeline offset in seconds. Default: 0
    pub fn start_time(mut self, seconds: f64) -> Self {
        self.start_time = seconds;
        self
    }

    /// Clamped to [0, 1] when the track is created. Default: 1
    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Default: false
    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn source(&self) -> &SourceLocator {
        &self.source
    }
}
