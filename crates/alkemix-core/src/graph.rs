//! Software signal graph: gain nodes, single-use buffer sources, stereo output.
//!
//! Every backend and the offline context mix through [`SignalGraph::render`],
//! so an offline render reproduces live playback sample for sample.
//!
//! Gain nodes form chains that end at [`Destination::Output`]. A gain node can
//! only feed a node created before it, so chains are acyclic by construction.
//! Node maps are ordered by id, which keeps summation order stable.

use crate::{AudioBuffer, Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handle to a gain node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GainId(u32);

/// Handle to a buffer source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(u32);

impl fmt::Display for GainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gain#{}", self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// Where a gain node sends its signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Output,
    Gain(GainId),
}

#[derive(Debug)]
struct GainNode {
    value: f32,
    destination: Destination,
}

#[derive(Debug, Clone, Copy)]
struct Schedule {
    start_frame: u64,
    offset_frame: usize,
}

#[derive(Debug)]
struct SourceNode {
    buffer: Arc<AudioBuffer>,
    output: GainId,
    schedule: Option<Schedule>,
}

pub struct SignalGraph {
    sample_rate: u32,
    frame: u64,
    next_id: u32,
    gains: BTreeMap<GainId, GainNode>,
    sources: BTreeMap<SourceId, SourceNode>,
}

impl SignalGraph {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            frame: 0,
            next_id: 0,
            gains: BTreeMap::new(),
            sources: BTreeMap::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    /// Graph clock in seconds.
    pub fn now(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn create_gain(&mut self, value: f32, destination: Destination) -> Result<GainId> {
        if let Destination::Gain(target) = destination {
            if !self.gains.contains_key(&target) {
                return Err(Error::UnknownNode(target.to_string()));
            }
        }
        let id = GainId(self.next_id());
        self.gains.insert(id, GainNode { value, destination });
        Ok(id)
    }

    /// Unknown ids are ignored.
    pub fn set_gain(&mut self, id: GainId, value: f32) {
        if let Some(node) = self.gains.get_mut(&id) {
            node.value = value;
        }
    }

    pub fn gain_value(&self, id: GainId) -> Option<f32> {
        self.gains.get(&id).map(|node| node.value)
    }

    /// Remove a gain node. Anything still routed through it falls silent.
    pub fn disconnect_gain(&mut self, id: GainId) {
        self.gains.remove(&id);
    }

    pub fn gain_count(&self) -> usize {
        self.gains.len()
    }

    pub fn create_source(&mut self, buffer: Arc<AudioBuffer>, output: GainId) -> Result<SourceId> {
        if !self.gains.contains_key(&output) {
            return Err(Error::UnknownNode(output.to_string()));
        }
        let id = SourceId(self.next_id());
        self.sources.insert(
            id,
            SourceNode {
                buffer,
                output,
                schedule: None,
            },
        );
        Ok(id)
    }

    /// Start a source at graph time `when` (seconds), `offset` seconds into its buffer.
    ///
    /// A `when` in the past starts the source on the next rendered frame.
    pub fn start_source(&mut self, id: SourceId, when: f64, offset: f64) -> Result<()> {
        let sample_rate = self.sample_rate as f64;
        let now = self.frame;
        let node = self
            .sources
            .get_mut(&id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))?;
        if node.schedule.is_some() {
            return Err(Error::SourceAlreadyStarted(id));
        }
        let start_frame = ((when.max(0.0) * sample_rate).round() as u64).max(now);
        let offset_frame = (offset.max(0.0) * sample_rate).round() as usize;
        node.schedule = Some(Schedule {
            start_frame,
            offset_frame,
        });
        Ok(())
    }

    /// Stop and discard a source. Unknown ids are ignored.
    pub fn stop_source(&mut self, id: SourceId) {
        self.sources.remove(&id);
    }

    /// Whether the source exists and has not yet played to its end.
    pub fn is_source_active(&self, id: SourceId) -> bool {
        self.sources.contains_key(&id)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Product of every gain between `gain` and the output, or 0 if the chain is broken.
    fn chain_gain(&self, gain: GainId) -> f32 {
        let mut product = 1.0f32;
        let mut current = gain;
        loop {
            let Some(node) = self.gains.get(&current) else {
                return 0.0;
            };
            product *= node.value;
            match node.destination {
                Destination::Output => return product,
                Destination::Gain(next) => current = next,
            }
        }
    }

    /// Render `left.len()` frames, advancing the clock.
    ///
    /// Sources that reach the end of their buffer are removed.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        let block_len = left.len().min(right.len());
        left.fill(0.0);
        right.fill(0.0);

        let block_start = self.frame;
        let block_end = block_start + block_len as u64;
        let mut finished = Vec::new();

        for (&id, source) in &self.sources {
            let Some(schedule) = source.schedule else {
                continue;
            };
            if schedule.start_frame >= block_end {
                continue;
            }

            let first = schedule.start_frame.max(block_start);
            let src_start = schedule.offset_frame + (first - schedule.start_frame) as usize;
            let frames = source.buffer.frames();
            if src_start >= frames {
                finished.push(id);
                continue;
            }

            let out_start = (first - block_start) as usize;
            let count = (frames - src_start).min(block_len - out_start);
            let gain = self.chain_gain(source.output);

            let src_left = &source.buffer.output_channel(0)[src_start..src_start + count];
            let src_right = &source.buffer.output_channel(1)[src_start..src_start + count];
            for (out, s) in left[out_start..out_start + count].iter_mut().zip(src_left) {
                *out += s * gain;
            }
            for (out, s) in right[out_start..out_start + count].iter_mut().zip(src_right) {
                *out += s * gain;
            }

            if src_start + count >= frames {
                finished.push(id);
            }
        }

        for id in finished {
            self.sources.remove(&id);
        }
        self.frame = block_end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(frames: usize) -> Arc<AudioBuffer> {
        let samples = (0..frames).map(|i| i as f32 / frames as f32).collect();
        Arc::new(AudioBuffer::mono(100, samples).unwrap())
    }

    fn render(graph: &mut SignalGraph, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        graph.render(&mut left, &mut right);
        (left, right)
    }

    #[test]
    fn test_gain_chain_multiplies() {
        let mut graph = SignalGraph::new(100);
        let master = graph.create_gain(0.5, Destination::Output).unwrap();
        let track = graph.create_gain(0.5, Destination::Gain(master)).unwrap();
        let source = graph
            .create_source(Arc::new(AudioBuffer::mono(100, vec![1.0; 4]).unwrap()), track)
            .unwrap();
        graph.start_source(source, 0.0, 0.0).unwrap();

        let (left, right) = render(&mut graph, 4);
        assert_eq!(left, vec![0.25; 4]);
        assert_eq!(right, vec![0.25; 4]);
    }

    #[test]
    fn test_source_is_single_use() {
        let mut graph = SignalGraph::new(100);
        let master = graph.create_gain(1.0, Destination::Output).unwrap();
        let source = graph.create_source(ramp(10), master).unwrap();
        graph.start_source(source, 0.0, 0.0).unwrap();
        assert!(matches!(
            graph.start_source(source, 0.0, 0.0),
            Err(Error::SourceAlreadyStarted(_))
        ));
    }

    #[test]
    fn test_deferred_start_and_offset() {
        let mut graph = SignalGraph::new(100);
        let master = graph.create_gain(1.0, Destination::Output).unwrap();
        let source = graph.create_source(ramp(10), master).unwrap();
        // starts at frame 2, 3 frames into the buffer
        graph.start_source(source, 0.02, 0.03).unwrap();

        let (left, _) = render(&mut graph, 5);
        assert_eq!(left[0], 0.0);
        assert_eq!(left[1], 0.0);
        assert_relative_eq!(left[2], 0.3);
        assert_relative_eq!(left[4], 0.5);
    }

    #[test]
    fn test_finished_sources_are_reaped() {
        let mut graph = SignalGraph::new(100);
        let master = graph.create_gain(1.0, Destination::Output).unwrap();
        let source = graph.create_source(ramp(3), master).unwrap();
        graph.start_source(source, 0.0, 0.0).unwrap();

        render(&mut graph, 8);
        assert!(!graph.is_source_active(source));
        assert_eq!(graph.current_frame(), 8);
    }

    #[test]
    fn test_unstarted_sources_are_silent() {
        let mut graph = SignalGraph::new(100);
        let master = graph.create_gain(1.0, Destination::Output).unwrap();
        let source = graph.create_source(ramp(10), master).unwrap();
        let (left, _) = render(&mut graph, 4);
        assert!(left.iter().all(|&s| s == 0.0));
        assert!(graph.is_source_active(source));
    }

    #[test]
    fn test_disconnected_gain_silences_chain() {
        let mut graph = SignalGraph::new(100);
        let master = graph.create_gain(1.0, Destination::Output).unwrap();
        let track = graph.create_gain(1.0, Destination::Gain(master)).unwrap();
        let source = graph.create_source(ramp(10), track).unwrap();
        graph.start_source(source, 0.0, 0.0).unwrap();
        graph.disconnect_gain(master);

        let (left, _) = render(&mut graph, 4);
        assert!(left.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_unknown_destination_is_rejected() {
        let mut graph = SignalGraph::new(100);
        let master = graph.create_gain(1.0, Destination::Output).unwrap();
        graph.disconnect_gain(master);
        assert!(graph.create_gain(1.0, Destination::Gain(master)).is_err());
        assert!(graph.create_source(ramp(1), master).is_err());
    }

    #[test]
    fn test_past_start_begins_immediately() {
        let mut graph = SignalGraph::new(100);
        let master = graph.create_gain(1.0, Destination::Output).unwrap();
        render(&mut graph, 10);
        let source = graph
            .create_source(Arc::new(AudioBuffer::mono(100, vec![1.0; 2]).unwrap()), master)
            .unwrap();
        graph.start_source(source, 0.0, 0.0).unwrap();
        let (left, _) = render(&mut graph, 3);
        assert_eq!(left, vec![1.0, 1.0, 0.0]);
    }
}
