//! Mixer that coordinates the track registry, transport, live graph and export.

use crate::source::{FileSupplier, SourceSupplier};
use crate::{MixerBuilder, Result, TrackSpec};
use alkemix_analysis::waveform::{amplitude_envelope, peak_blocks, WaveformBlock};
use alkemix_core::render_graph::{
    connect_master, connect_track_gain, push_gain, reap_finished, schedule_track, stop_track,
};
use alkemix_core::{
    clamp_unit, AudioBackend, GainId, HeadlessBackend, MixPlan, MixerConfig, OfflineContext,
    Track, TrackId, TrackInfo, TrackRegistry, Transition, Transport, TransportEvent,
    TransportState,
};
use alkemix_export::{ExportHandle, ExportProgress, Mixdown, OfflineRenderer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Snapshot of the mixer for UI consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixerState {
    pub is_playing: bool,
    pub transport: TransportState,
    pub current_time: f64,
    pub duration: f64,
    pub tracks: Vec<TrackInfo>,
    pub master_volume: f32,
}

/// Multi-track timeline mixer.
///
/// Owns the backend, the loaded tracks and the transport. Every track plays
/// through `source → track gain → master gain → output`; exports rebuild the
/// same graph offline, so they reproduce what playback sounds like.
///
/// # Example
///
/// ```ignore
/// use alkemix::prelude::*;
///
/// let mut mixer = Mixer::builder()
///     .supplier(FileSupplier::with_root("assets"))
///     .build()?;
///
/// mixer.add_track(TrackSpec::new("vo", TrackCategory::Dialogue, "vo.wav"))?;
/// mixer.add_track(TrackSpec::new("bed", TrackCategory::Music, "bed.mp3").volume(0.4))?;
///
/// mixer.play();
/// // ...
/// let wav = mixer.export_mixed_audio(None)?;
/// mixer.dispose();
/// ```
pub struct Mixer<B: AudioBackend = HeadlessBackend> {
    backend: B,
    registry: TrackRegistry,
    transport: Transport,
    master: GainId,
    master_volume: f32,
    supplier: Box<dyn SourceSupplier>,
    config: MixerConfig,
    closed: bool,
}

impl Mixer<HeadlessBackend> {
    /// Headless mixer with default configuration, reading sources from disk.
    pub fn new() -> Result<Self> {
        MixerBuilder::default().build()
    }

    pub fn builder() -> MixerBuilder {
        MixerBuilder::default()
    }
}

impl<B: AudioBackend> Mixer<B> {
    pub(crate) fn from_parts(
        mut backend: B,
        config: MixerConfig,
        supplier: Option<Box<dyn SourceSupplier>>,
    ) -> Result<Self> {
        config.validate()?;
        let master = connect_master(&mut backend, 1.0)?;
        log::debug!("mixer ready at {} Hz", backend.sample_rate());

        Ok(Self {
            backend,
            registry: TrackRegistry::new(),
            transport: Transport::new(),
            master,
            master_volume: 1.0,
            supplier: supplier.unwrap_or_else(|| Box::new(FileSupplier::new())),
            config,
            closed: false,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.backend.sample_rate()
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Direct backend access, e.g. to pull frames from a [`HeadlessBackend`].
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // =========================================================================
    // Tracks
    // =========================================================================

    /// Fetch, decode and register a track.
    ///
    /// Nothing is registered if fetching or decoding fails. An existing track
    /// with the same id is replaced in place. While playing, the new track
    /// starts immediately at the current position.
    pub fn add_track(&mut self, spec: TrackSpec) -> Result<()> {
        let bytes = self.supplier.fetch(&spec.source)?;
        let extension = spec.source.extension();
        let buffer = self.backend.decode(&bytes, extension.as_deref())?;

        let sample_rate = self.backend.sample_rate();
        if buffer.sample_rate() != sample_rate {
            return Err(alkemix_core::Error::Decode(format!(
                "{} is {} Hz but the mixer runs at {} Hz",
                spec.source,
                buffer.sample_rate(),
                sample_rate
            ))
            .into());
        }

        let gain = connect_track_gain(&mut self.backend, 0.0, self.master)?;
        let track = Track::new(
            spec.id.clone(),
            spec.category,
            spec.source,
            Arc::new(buffer),
            gain,
        )
        .with_volume(spec.volume)
        .with_muted(spec.muted)
        .with_start_time(spec.start_time);
        push_gain(&mut self.backend, &track);

        log::debug!(
            "add track {} ({}, {:.3}s at {:.3}s)",
            track.id(),
            track.category(),
            track.duration(),
            track.start_time()
        );

        if let Some(mut replaced) = self.registry.insert(track) {
            log::debug!("replaced track {}", replaced.id());
            self.release(&mut replaced);
        }

        if self.transport.is_playing() {
            let now = self.backend.now();
            let position = self.transport.current_time(now);
            if let Some(track) = self.registry.get_mut(&spec.id) {
                if let Err(e) = schedule_track(&mut self.backend, track, position, now) {
                    log::warn!("failed to start track {}: {}", track.id(), e);
                }
            }
        }

        Ok(())
    }

    /// Remove a track. Returns `false` if no track has this id.
    pub fn remove_track(&mut self, id: &str) -> bool {
        match self.registry.remove(&TrackId::from(id)) {
            Some(mut track) => {
                self.release(&mut track);
                log::debug!("removed track {}", id);
                true
            }
            None => false,
        }
    }

    fn release(&mut self, track: &mut Track) {
        stop_track(&mut self.backend, track);
        self.backend.disconnect_gain(track.gain());
    }

    /// Set a track's volume, clamped to [0, 1]. Unknown ids are ignored.
    pub fn set_track_volume(&mut self, id: &str, volume: f32) {
        if let Some(track) = self.registry.get_mut(&TrackId::from(id)) {
            track.set_volume(volume);
            push_gain(&mut self.backend, track);
        }
    }

    /// Mute or unmute a track. Unknown ids are ignored.
    pub fn set_track_muted(&mut self, id: &str, muted: bool) {
        if let Some(track) = self.registry.get_mut(&TrackId::from(id)) {
            track.set_muted(muted);
            push_gain(&mut self.backend, track);
        }
    }

    /// Set the master volume, clamped to [0, 1].
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = clamp_unit(volume);
        self.backend.set_gain(self.master, self.master_volume);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn track_count(&self) -> usize {
        self.registry.len()
    }

    pub fn track(&self, id: &str) -> Option<TrackInfo> {
        self.registry.get(&TrackId::from(id)).map(|t| self.info(t))
    }

    /// Gain currently applied by the track's node, `None` for unknown ids.
    pub fn effective_gain(&self, id: &str) -> Option<f32> {
        let track = self.registry.get(&TrackId::from(id))?;
        self.backend.gain_value(track.gain())
    }

    fn info(&self, track: &Track) -> TrackInfo {
        let mut info = track.info();
        info.is_live = track
            .live_source()
            .is_some_and(|source| self.backend.is_source_active(source));
        info
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Start playback from the current position. No-op while playing.
    pub fn play(&mut self) {
        if !self.transport.is_playing() && self.backend.is_suspended() {
            if let Err(e) = self.backend.resume() {
                log::warn!("failed to resume audio backend: {}", e);
            }
        }
        self.apply(TransportEvent::Play);
    }

    /// Pause playback, keeping the position. No-op unless playing.
    pub fn pause(&mut self) {
        self.apply(TransportEvent::Pause);
    }

    /// Stop playback and rewind to 0.
    pub fn stop(&mut self) {
        self.apply(TransportEvent::Stop);
    }

    /// Move the play head. Negative positions clamp to 0.
    pub fn seek(&mut self, position: f64) {
        self.apply(TransportEvent::Seek(position));
    }

    fn apply(&mut self, event: TransportEvent) {
        reap_finished(&self.backend, &mut self.registry);
        let now = self.backend.now();
        match self.transport.transition(event, now) {
            Transition::Started { position } | Transition::Restarted { position } => {
                self.schedule_all(position, now)
            }
            Transition::Halted { .. } => self.stop_all(),
            Transition::Relocated { .. } | Transition::None => {}
        }
    }

    fn schedule_all(&mut self, position: f64, now: f64) {
        for track in self.registry.iter_mut() {
            if let Err(e) = schedule_track(&mut self.backend, track, position, now) {
                log::warn!("failed to start track {}: {}", track.id(), e);
            }
        }
    }

    fn stop_all(&mut self) {
        for track in self.registry.iter_mut() {
            stop_track(&mut self.backend, track);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport.state()
    }

    /// Timeline position in seconds.
    pub fn current_time(&self) -> f64 {
        self.transport.current_time(self.backend.now())
    }

    /// End of the last track on the timeline, 0 when empty.
    pub fn duration(&self) -> f64 {
        self.registry.mix_duration()
    }

    pub fn state(&self) -> MixerState {
        MixerState {
            is_playing: self.transport.is_playing(),
            transport: self.transport.state(),
            current_time: self.current_time(),
            duration: self.duration(),
            tracks: self.registry.iter().map(|t| self.info(t)).collect(),
            master_volume: self.master_volume,
        }
    }

    // =========================================================================
    // Waveforms
    // =========================================================================

    /// Mean-absolute envelope of the track's first channel.
    pub fn waveform_data(&self, id: &str, width: usize) -> Option<Vec<f32>> {
        let track = self.registry.get(&TrackId::from(id))?;
        Some(amplitude_envelope(track.buffer().channel(0), width))
    }

    /// [`waveform_data`](Self::waveform_data) at the configured default width.
    pub fn waveform(&self, id: &str) -> Option<Vec<f32>> {
        self.waveform_data(id, self.config.waveform_width)
    }

    pub fn waveform_blocks(&self, id: &str, width: usize) -> Option<Vec<WaveformBlock>> {
        let track = self.registry.get(&TrackId::from(id))?;
        Some(peak_blocks(track.buffer().channel(0), width))
    }

    // =========================================================================
    // Export
    // =========================================================================

    fn offline_job(&self, duration_override: Option<f64>) -> Result<(MixPlan, OfflineContext)> {
        let plan = MixPlan::capture(&self.registry, self.master_volume);
        let duration = alkemix_export::resolve_duration(duration_override, &plan)?;
        let frames = alkemix_export::frame_count(duration, self.backend.sample_rate())?;
        let context = self.backend.offline_context(frames)?;
        Ok((plan, context))
    }

    /// Render the mix offline and encode it as 16-bit stereo WAV.
    ///
    /// Renders `duration_override` seconds if given, else the full mix
    /// duration. Playback state is not touched.
    pub fn export_mixed_audio(&self, duration_override: Option<f64>) -> Result<Vec<u8>> {
        self.export_mixed_audio_with_progress(duration_override, |_| {})
    }

    pub fn export_mixed_audio_with_progress(
        &self,
        duration_override: Option<f64>,
        mut on_progress: impl FnMut(ExportProgress),
    ) -> Result<Vec<u8>> {
        let (plan, context) = self.offline_job(duration_override)?;
        Ok(OfflineRenderer::new(plan).export_wav(context, &mut on_progress)?)
    }

    /// Render the mix offline without encoding.
    pub fn render_mixdown(&self, duration_override: Option<f64>) -> Result<Mixdown> {
        let (plan, context) = self.offline_job(duration_override)?;
        Ok(OfflineRenderer::new(plan).render(context)?)
    }

    pub fn export_to_file(
        &self,
        path: impl AsRef<Path>,
        duration_override: Option<f64>,
    ) -> Result<()> {
        let (plan, context) = self.offline_job(duration_override)?;
        Ok(OfflineRenderer::new(plan).export_file(context, path.as_ref())?)
    }

    /// Render and encode on a dedicated thread.
    ///
    /// The mix is captured when this is called; later edits do not affect it.
    pub fn export_in_background(&self, duration_override: Option<f64>) -> Result<ExportHandle> {
        let (plan, context) = self.offline_job(duration_override)?;
        Ok(ExportHandle::spawn(plan, context)?)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Stop playback, disconnect every node and close the backend.
    pub fn dispose(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.stop();
        let tracks: Vec<Track> = self.registry.drain().collect();
        for mut track in tracks {
            self.release(&mut track);
        }
        self.backend.disconnect_gain(self.master);
        self.backend.close();
        log::debug!("mixer disposed");
    }
}

impl<B: AudioBackend> Drop for Mixer<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
