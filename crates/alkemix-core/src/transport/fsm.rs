//! Transport state machine.
//!
//! The transport never reads a clock itself. Every transition is handed one
//! snapshot of the backend clock (`now`), so everything scheduled as a
//! consequence of that transition shares a single time base.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    Play,
    Pause,
    Stop,
    /// Move the play-head to a timeline position in seconds.
    Seek(f64),
}

/// What the owner of the sources has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    None,
    /// Start every track from `position`.
    Started { position: f64 },
    /// Stop every live source; the play-head rests at `position`.
    Halted { position: f64 },
    /// Play-head moved while not playing; nothing to (re)schedule.
    Relocated { position: f64 },
    /// Stop every live source, then start every track from `position`.
    Restarted { position: f64 },
}

/// Logical play/pause/stop state.
///
/// While playing, timeline time is `now - anchor`; otherwise it is the stored
/// `paused_at` position. A seek never changes the state, so `Stopped` may rest
/// away from 0 until the next `Stop` rewinds it.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    state: TransportState,
    anchor: f64,
    paused_at: f64,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// Backend clock time at which timeline time 0 occurs (meaningful while playing).
    pub fn anchor(&self) -> f64 {
        self.anchor
    }

    pub fn transition(&mut self, event: TransportEvent, now: f64) -> Transition {
        use TransportEvent::*;

        let result = match event {
            Play => match self.state {
                TransportState::Playing => Transition::None,
                TransportState::Stopped | TransportState::Paused => {
                    self.start(now);
                    Transition::Started {
                        position: self.paused_at,
                    }
                }
            },

            Pause => match self.state {
                TransportState::Playing => {
                    self.halt(now);
                    self.state = TransportState::Paused;
                    Transition::Halted {
                        position: self.paused_at,
                    }
                }
                TransportState::Stopped | TransportState::Paused => Transition::None,
            },

            Stop => match self.state {
                TransportState::Playing => {
                    self.halt(now);
                    self.rewind();
                    Transition::Halted { position: 0.0 }
                }
                TransportState::Paused => {
                    self.rewind();
                    Transition::Relocated { position: 0.0 }
                }
                TransportState::Stopped if self.paused_at != 0.0 => {
                    self.rewind();
                    Transition::Relocated { position: 0.0 }
                }
                TransportState::Stopped => Transition::None,
            },

            Seek(target) => {
                let target = if target.is_finite() {
                    target.max(0.0)
                } else {
                    0.0
                };
                if self.is_playing() {
                    self.halt(now);
                    self.paused_at = target;
                    self.start(now);
                    Transition::Restarted { position: target }
                } else {
                    self.paused_at = target;
                    Transition::Relocated { position: target }
                }
            }
        };

        if !matches!(result, Transition::None) {
            log::debug!("transport {:?} -> {:?} ({:?})", event, self.state, result);
        }

        result
    }

    fn start(&mut self, now: f64) {
        self.anchor = now - self.paused_at;
        self.state = TransportState::Playing;
    }

    fn halt(&mut self, now: f64) {
        self.paused_at = now - self.anchor;
    }

    fn rewind(&mut self) {
        self.paused_at = 0.0;
        self.state = TransportState::Stopped;
    }

    /// Timeline position in seconds.
    pub fn current_time(&self, now: f64) -> f64 {
        if self.is_playing() {
            now - self.anchor
        } else {
            self.paused_at
        }
    }

    /// Backend clock time at which timeline time `t` plays, if playing.
    pub fn timeline_to_clock(&self, t: f64) -> Option<f64> {
        self.is_playing().then_some(self.anchor + t)
    }

    /// Timeline position that the backend clock time `clock` corresponds to.
    pub fn clock_to_timeline(&self, clock: f64) -> f64 {
        self.current_time(clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_play_pause_transitions() {
        let mut transport = Transport::new();

        let result = transport.transition(TransportEvent::Play, 10.0);
        assert_eq!(result, Transition::Started { position: 0.0 });
        assert_eq!(transport.anchor(), 10.0);

        // Play again (idempotent)
        let result = transport.transition(TransportEvent::Play, 11.0);
        assert_eq!(result, Transition::None);

        let result = transport.transition(TransportEvent::Pause, 12.5);
        assert_eq!(result, Transition::Halted { position: 2.5 });
        assert_eq!(transport.state(), TransportState::Paused);
    }

    #[test]
    fn test_resume_keeps_position() {
        let mut transport = Transport::new();
        transport.transition(TransportEvent::Play, 1.0);
        transport.transition(TransportEvent::Pause, 3.0);

        let result = transport.transition(TransportEvent::Play, 100.0);
        assert_eq!(result, Transition::Started { position: 2.0 });
        assert_relative_eq!(transport.current_time(101.0), 3.0);
    }

    #[test]
    fn test_current_time_tracks_clock_while_playing() {
        let mut transport = Transport::new();
        transport.transition(TransportEvent::Seek(4.0), 0.0);
        transport.transition(TransportEvent::Play, 50.0);

        let mut last = f64::MIN;
        for step in 0..10 {
            let now = 50.0 + step as f64 * 0.1;
            let t = transport.current_time(now);
            assert!(t > last);
            assert_relative_eq!(t, now - transport.anchor());
            last = t;
        }
    }

    #[test]
    fn test_pause_and_stop_are_idempotent() {
        let mut transport = Transport::new();
        transport.transition(TransportEvent::Play, 0.0);
        transport.transition(TransportEvent::Pause, 2.0);

        assert_eq!(transport.transition(TransportEvent::Pause, 9.0), Transition::None);
        assert_eq!(transport.current_time(9.0), 2.0);

        transport.transition(TransportEvent::Stop, 9.0);
        assert_eq!(transport.transition(TransportEvent::Stop, 12.0), Transition::None);
        assert_eq!(transport.current_time(12.0), 0.0);
        assert_eq!(transport.state(), TransportState::Stopped);
    }

    #[test]
    fn test_stop_while_playing_rewinds() {
        let mut transport = Transport::new();
        transport.transition(TransportEvent::Play, 0.0);
        let result = transport.transition(TransportEvent::Stop, 5.0);
        assert_eq!(result, Transition::Halted { position: 0.0 });
        assert_eq!(transport.current_time(6.0), 0.0);
    }

    #[test]
    fn test_seek_while_playing_restarts() {
        let mut transport = Transport::new();
        transport.transition(TransportEvent::Play, 0.0);
        let result = transport.transition(TransportEvent::Seek(7.0), 3.0);

        assert_eq!(result, Transition::Restarted { position: 7.0 });
        assert!(transport.is_playing());
        assert_relative_eq!(transport.current_time(4.0), 8.0);
    }

    #[test]
    fn test_seek_while_stopped_keeps_state() {
        let mut transport = Transport::new();
        let result = transport.transition(TransportEvent::Seek(-3.0), 0.0);
        assert_eq!(result, Transition::Relocated { position: 0.0 });
        assert_eq!(transport.state(), TransportState::Stopped);

        let result = transport.transition(TransportEvent::Seek(6.0), 0.0);
        assert_eq!(result, Transition::Relocated { position: 6.0 });
        assert_eq!(transport.state(), TransportState::Stopped);
        assert_eq!(transport.current_time(99.0), 6.0);

        let result = transport.transition(TransportEvent::Play, 10.0);
        assert_eq!(result, Transition::Started { position: 6.0 });
        assert_relative_eq!(transport.current_time(11.0), 7.0);
    }

    #[test]
    fn test_seek_while_paused_keeps_state() {
        let mut transport = Transport::new();
        transport.transition(TransportEvent::Play, 0.0);
        transport.transition(TransportEvent::Pause, 1.0);

        transport.transition(TransportEvent::Seek(4.0), 2.0);
        assert_eq!(transport.state(), TransportState::Paused);
        assert_eq!(transport.current_time(50.0), 4.0);
    }

    #[test]
    fn test_stop_rewinds_seeked_stopped_transport() {
        let mut transport = Transport::new();
        transport.transition(TransportEvent::Seek(3.0), 0.0);

        let result = transport.transition(TransportEvent::Stop, 0.0);
        assert_eq!(result, Transition::Relocated { position: 0.0 });
        assert_eq!(transport.current_time(0.0), 0.0);
        assert_eq!(transport.transition(TransportEvent::Stop, 0.0), Transition::None);
    }

    #[test]
    fn test_clock_conversions() {
        let mut transport = Transport::new();
        assert_eq!(transport.timeline_to_clock(1.0), None);

        transport.transition(TransportEvent::Seek(2.0), 0.0);
        transport.transition(TransportEvent::Play, 10.0);
        assert_eq!(transport.timeline_to_clock(5.0), Some(13.0));
        assert_eq!(transport.clock_to_timeline(13.0), 5.0);
    }
}
