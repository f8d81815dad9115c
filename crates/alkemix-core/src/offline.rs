//! Fixed-length, non-real-time render target.

use crate::backend::AudioGraph;
use crate::graph::{Destination, GainId, SignalGraph, SourceId};
use crate::{AudioBuffer, Result};
use std::sync::Arc;

/// Offline renders are always stereo.
pub const OUTPUT_CHANNELS: usize = 2;

/// Frames rendered per block.
const RENDER_QUANTUM: usize = 1024;

/// Progress callback for render operations (0.0 to 1.0).
pub type RenderProgressCallback<'a> = &'a mut dyn FnMut(f32);

/// A signal graph sized to an exact number of frames.
///
/// Build the graph through [`AudioGraph`], then call
/// [`start_rendering`](Self::start_rendering) once. The clock starts at 0
/// and only advances while rendering, so the result depends on nothing but
/// the graph contents.
pub struct OfflineContext {
    graph: SignalGraph,
    length: usize,
}

impl OfflineContext {
    pub fn new(length: usize, sample_rate: u32) -> Self {
        Self {
            graph: SignalGraph::new(sample_rate),
            length,
        }
    }

    /// Length in frames.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn duration(&self) -> f64 {
        self.length as f64 / self.graph.sample_rate() as f64
    }

    /// Render the whole graph to a stereo buffer.
    pub fn start_rendering(self) -> Result<AudioBuffer> {
        self.start_rendering_with_progress(&mut |_| {})
    }

    pub fn start_rendering_with_progress(
        mut self,
        on_progress: RenderProgressCallback<'_>,
    ) -> Result<AudioBuffer> {
        let sample_rate = self.graph.sample_rate();
        let mut left = vec![0.0f32; self.length];
        let mut right = vec![0.0f32; self.length];

        // Report roughly every half second of audio.
        let progress_interval = (sample_rate as usize / 2).max(RENDER_QUANTUM);
        let mut next_progress = progress_interval;

        on_progress(0.0);

        let mut i = 0;
        while i < self.length {
            let block = (self.length - i).min(RENDER_QUANTUM);
            self.graph
                .render(&mut left[i..i + block], &mut right[i..i + block]);
            i += block;

            if i >= next_progress && i < self.length {
                on_progress(i as f32 / self.length as f32);
                next_progress += progress_interval;
            }
        }

        on_progress(1.0);
        AudioBuffer::stereo(sample_rate, left, right)
    }
}

impl AudioGraph for OfflineContext {
    fn sample_rate(&self) -> u32 {
        self.graph.sample_rate()
    }

    fn now(&self) -> f64 {
        self.graph.now()
    }

    fn create_gain(&mut self, value: f32, destination: Destination) -> Result<GainId> {
        self.graph.create_gain(value, destination)
    }

    fn set_gain(&mut self, id: GainId, value: f32) {
        self.graph.set_gain(id, value)
    }

    fn gain_value(&self, id: GainId) -> Option<f32> {
        self.graph.gain_value(id)
    }

    fn disconnect_gain(&mut self, id: GainId) {
        self.graph.disconnect_gain(id)
    }

    fn create_source(&mut self, buffer: Arc<AudioBuffer>, output: GainId) -> Result<SourceId> {
        self.graph.create_source(buffer, output)
    }

    fn start_source(&mut self, id: SourceId, when: f64, offset: f64) -> Result<()> {
        self.graph.start_source(id, when, offset)
    }

    fn stop_source(&mut self, id: SourceId) {
        self.graph.stop_source(id)
    }

    fn is_source_active(&self, id: SourceId) -> bool {
        self.graph.is_source_active(id)
    }
}
