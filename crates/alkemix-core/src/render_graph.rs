//! Builds `source → gain → master → output` paths on an [`AudioGraph`].
//!
//! Nothing here keeps state between calls. Source nodes are single-use, so
//! every play, seek and offline render builds fresh ones.

use crate::backend::AudioGraph;
use crate::graph::{Destination, GainId};
use crate::{AudioBuffer, Result, Track, TrackId, TrackRegistry};
use std::sync::Arc;

/// Create the master gain, feeding the graph output.
pub fn connect_master<G: AudioGraph + ?Sized>(graph: &mut G, volume: f32) -> Result<GainId> {
    graph.create_gain(volume, Destination::Output)
}

/// Create a track gain feeding `master`.
pub fn connect_track_gain<G: AudioGraph + ?Sized>(
    graph: &mut G,
    effective_gain: f32,
    master: GainId,
) -> Result<GainId> {
    graph.create_gain(effective_gain, Destination::Gain(master))
}

/// Push the track's effective gain into its live gain node.
pub fn push_gain<G: AudioGraph + ?Sized>(graph: &mut G, track: &Track) {
    graph.set_gain(track.gain(), track.effective_gain());
}

/// Stop and forget the track's live source, if any.
pub fn stop_track<G: AudioGraph + ?Sized>(graph: &mut G, track: &mut Track) {
    if let Some(source) = track.replace_live_source(None) {
        graph.stop_source(source);
    }
}

/// Start a fresh source so that timeline `position` plays at clock time `now`.
///
/// Any previous source of the track is stopped first. A track whose start
/// lies after `position` is scheduled for the clock time its start will be
/// reached. Returns `false` when the track has already ended at `position`.
pub fn schedule_track<G: AudioGraph + ?Sized>(
    graph: &mut G,
    track: &mut Track,
    position: f64,
    now: f64,
) -> Result<bool> {
    stop_track(graph, track);

    let (when, offset) = if position >= track.start_time() {
        (now, position - track.start_time())
    } else {
        (now + (track.start_time() - position), 0.0)
    };
    if offset >= track.duration() {
        return Ok(false);
    }

    let source = graph.create_source(track.buffer().clone(), track.gain())?;
    if let Err(e) = graph.start_source(source, when, offset) {
        graph.stop_source(source);
        return Err(e);
    }
    track.replace_live_source(Some(source));
    Ok(true)
}

/// Forget live sources the graph has already played to the end.
pub fn reap_finished<G: AudioGraph + ?Sized>(graph: &G, registry: &mut TrackRegistry) {
    for track in registry.iter_mut() {
        if let Some(source) = track.live_source() {
            if !graph.is_source_active(source) {
                track.replace_live_source(None);
            }
        }
    }
}

/// One track as the offline render sees it.
#[derive(Debug, Clone)]
pub struct MixVoice {
    pub id: TrackId,
    pub buffer: Arc<AudioBuffer>,
    /// Effective gain; muted tracks stay in the plan at 0.
    pub gain: f32,
    pub start_time: f64,
}

/// Immutable snapshot of everything an offline render needs.
///
/// Owns only `Arc`s and plain values, so it can move to a render thread.
#[derive(Debug, Clone)]
pub struct MixPlan {
    pub master_volume: f32,
    pub voices: Vec<MixVoice>,
}

impl MixPlan {
    pub fn capture(registry: &TrackRegistry, master_volume: f32) -> Self {
        let voices = registry
            .iter()
            .map(|track| MixVoice {
                id: track.id().clone(),
                buffer: track.buffer().clone(),
                gain: track.effective_gain(),
                start_time: track.start_time(),
            })
            .collect();
        Self {
            master_volume,
            voices,
        }
    }

    /// Latest voice end time, 0 when empty.
    pub fn duration(&self) -> f64 {
        self.voices
            .iter()
            .map(|v| v.start_time + v.buffer.duration())
            .fold(0.0, f64::max)
    }

    /// Build the full graph, every source starting at exactly its track's start time.
    pub fn build<G: AudioGraph + ?Sized>(&self, graph: &mut G) -> Result<()> {
        let master = connect_master(graph, self.master_volume)?;
        for voice in &self.voices {
            let gain = connect_track_gain(graph, voice.gain, master)?;
            let source = graph.create_source(voice.buffer.clone(), gain)?;
            graph.start_source(source, voice.start_time, 0.0)?;
        }
        Ok(())
    }
}
