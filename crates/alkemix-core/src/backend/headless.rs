//! Manually clocked backend.

use super::{AudioBackend, AudioGraph};
use crate::graph::{Destination, GainId, SignalGraph, SourceId};
use crate::{AudioBuffer, Error, Result};
use std::sync::Arc;

/// Software backend whose clock moves only when [`process`](Self::process) is called.
///
/// Useful for tests (the clock is fully deterministic) and for hosts that pull
/// audio themselves.
pub struct HeadlessBackend {
    graph: SignalGraph,
    suspended: bool,
    closed: bool,
}

impl HeadlessBackend {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            graph: SignalGraph::new(sample_rate),
            suspended: false,
            closed: false,
        }
    }

    /// Pull `frames` stereo frames from the graph, advancing the clock.
    ///
    /// A suspended backend returns silence and its clock stands still.
    pub fn process(&mut self, frames: usize) -> AudioBuffer {
        let sample_rate = self.graph.sample_rate();
        let mut left = vec![0.0f32; frames];
        let mut right = vec![0.0f32; frames];
        if !self.suspended && !self.closed {
            self.graph.render(&mut left, &mut right);
        }
        AudioBuffer::from_parts(sample_rate, vec![left, right])
    }

    /// Advance the clock by `seconds`, discarding the audio.
    pub fn advance(&mut self, seconds: f64) {
        let frames = (seconds * self.graph.sample_rate() as f64).round() as usize;
        self.process(frames);
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Live source nodes, including ones scheduled in the future.
    pub fn active_sources(&self) -> usize {
        self.graph.source_count()
    }

    /// Gain nodes currently connected.
    pub fn connected_gains(&self) -> usize {
        self.graph.gain_count()
    }
}

impl AudioGraph for HeadlessBackend {
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

impl AudioBackend for HeadlessBackend {
    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::BackendUnavailable("backend is closed".into()));
        }
        self.suspended = false;
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clock_advances_with_process() {
        let mut backend = HeadlessBackend::new(48000);
        assert_eq!(backend.now(), 0.0);
        backend.process(24000);
        assert_relative_eq!(backend.now(), 0.5);
        backend.advance(0.25);
        assert_relative_eq!(backend.now(), 0.75);
    }

    #[test]
    fn test_suspended_clock_stands_still() {
        let mut backend = HeadlessBackend::new(48000);
        backend.suspend();
        backend.process(480);
        assert_eq!(backend.now(), 0.0);
        backend.resume().unwrap();
        backend.process(480);
        assert_relative_eq!(backend.now(), 0.01);
    }

    #[test]
    fn test_resume_after_close_fails() {
        let mut backend = HeadlessBackend::new(48000);
        backend.close();
        assert!(matches!(
            backend.resume(),
            Err(Error::BackendUnavailable(_))
        ));
    }

    #[test]
    fn test_process_mixes_sources() {
        let mut backend = HeadlessBackend::new(100);
        let master = backend.create_gain(0.5, Destination::Output).unwrap();
        let buffer = Arc::new(AudioBuffer::stereo(100, vec![1.0; 4], vec![-1.0; 4]).unwrap());
        let source = backend.create_source(buffer, master).unwrap();
        backend.start_source(source, backend.now(), 0.0).unwrap();

        let out = backend.process(4);
        assert_eq!(out.channel(0), &[0.5; 4]);
        assert_eq!(out.channel(1), &[-0.5; 4]);
        assert_eq!(backend.active_sources(), 0);
    }

    #[test]
    fn test_offline_context_matches_sample_rate() {
        let backend = HeadlessBackend::new(22050);
        let ctx = backend.offline_context(100).unwrap();
        assert_eq!(ctx.sample_rate(), 22050);
        assert_eq!(ctx.length(), 100);
    }
}
