//! Insertion-ordered track storage.

use crate::{Track, TrackId};

/// The set of loaded tracks.
///
/// Iteration follows insertion order; replacing a track keeps its slot. The
/// order is what the mixing kernel sums in, so it must stay stable.
#[derive(Debug, Default)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id() == id)
    }

    /// Insert a track, returning the one it replaced.
    pub fn insert(&mut self, track: Track) -> Option<Track> {
        match self.position(track.id()) {
            Some(index) => Some(std::mem::replace(&mut self.tracks[index], track)),
            None => {
                self.tracks.push(track);
                None
            }
        }
    }

    pub fn remove(&mut self, id: &TrackId) -> Option<Track> {
        self.position(id).map(|index| self.tracks.remove(index))
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: &TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.iter_mut()
    }

    /// Remove every track, in insertion order.
    pub fn drain(&mut self) -> impl Iterator<Item = Track> + '_ {
        self.tracks.drain(..)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Latest end time over all tracks, 0 when empty.
    pub fn mix_duration(&self) -> f64 {
        self.tracks
            .iter()
            .map(Track::end_time)
            .fold(0.0, f64::max)
    }
}
