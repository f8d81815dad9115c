//! Transport integration tests
//!
//! Tests play/pause/stop/seek against the headless backend's manual clock.

mod helpers;

use alkemix::prelude::*;
use alkemix::AudioGraph;
use approx::assert_relative_eq;
use helpers::tolerances::*;
use helpers::*;

fn sources() -> MemorySupplier {
    MemorySupplier::new()
        .with("two.wav", mono_fixture(&generate_dc(0.5, 2 * 8000)))
        .with("short.wav", mono_fixture(&generate_dc(0.25, 4000)))
}

fn mixer_with_tracks() -> Mixer {
    let mut mixer = test_mixer(sources());
    mixer
        .add_track(TrackSpec::new("a", TrackCategory::Dialogue, "two.wav"))
        .unwrap();
    mixer
        .add_track(TrackSpec::new("b", TrackCategory::Music, "short.wav").start_time(1.0))
        .unwrap();
    mixer
}

/// Time advances with the backend clock while playing.
#[test]
fn test_current_time_follows_clock() {
    let mut mixer = mixer_with_tracks();
    mixer.backend_mut().advance(0.5);
    assert_eq!(mixer.current_time(), 0.0);

    mixer.play();
    let anchor = mixer.backend().now();

    let mut last = mixer.current_time();
    for _ in 0..10 {
        mixer.backend_mut().process(400);
        let t = mixer.current_time();
        assert!(t > last);
        assert_relative_eq!(t, mixer.backend().now() - anchor, epsilon = TIME_EPSILON);
        last = t;
    }
    assert_relative_eq!(last, 0.5, epsilon = TIME_EPSILON);
}

#[test]
fn test_pause_holds_position() {
    let mut mixer = mixer_with_tracks();
    mixer.play();
    mixer.backend_mut().advance(0.75);
    mixer.pause();

    assert_eq!(mixer.transport_state(), TransportState::Paused);
    assert_eq!(mixer.backend().active_sources(), 0);
    mixer.backend_mut().advance(3.0);
    assert_relative_eq!(mixer.current_time(), 0.75, epsilon = TIME_EPSILON);

    mixer.play();
    mixer.backend_mut().advance(0.25);
    assert_relative_eq!(mixer.current_time(), 1.0, epsilon = TIME_EPSILON);
}

#[test]
fn test_resume_continues_from_offset() {
    let mut mixer = mixer_with_tracks();
    mixer.play();
    mixer.backend_mut().advance(1.25);
    mixer.pause();
    mixer.play();

    // a plays 0.5, b (0.25) started at 1.0
    let block = mixer.backend_mut().process(10);
    assert_relative_eq!(block.channel(0)[0], 0.75, epsilon = FLOAT_EPSILON);
}

#[test]
fn test_play_and_pause_are_idempotent() {
    let mut mixer = mixer_with_tracks();
    mixer.play();
    let sources_playing = mixer.backend().active_sources();
    mixer.backend_mut().advance(0.2);

    mixer.play();
    assert_eq!(mixer.backend().active_sources(), sources_playing);
    assert_relative_eq!(mixer.current_time(), 0.2, epsilon = TIME_EPSILON);

    mixer.pause();
    let paused = mixer.state();
    mixer.pause();
    assert_eq!(mixer.state(), paused);
}

#[test]
fn test_stop_rewinds_and_is_idempotent() {
    let mut mixer = mixer_with_tracks();
    mixer.play();
    mixer.backend_mut().advance(1.5);
    mixer.stop();

    assert_eq!(mixer.transport_state(), TransportState::Stopped);
    assert_eq!(mixer.current_time(), 0.0);
    assert_eq!(mixer.backend().active_sources(), 0);

    let stopped = mixer.state();
    mixer.stop();
    assert_eq!(mixer.state(), stopped);
}

#[test]
fn test_seek_while_playing_keeps_one_source_per_track() {
    let mut mixer = mixer_with_tracks();
    mixer.play();
    mixer.backend_mut().advance(0.1);

    for target in [1.2, 0.3, 1.1, 0.0] {
        mixer.seek(target);
        assert!(mixer.is_playing());
        assert_eq!(mixer.backend().active_sources(), 2);
        assert_relative_eq!(mixer.current_time(), target, epsilon = TIME_EPSILON);
        mixer.backend_mut().advance(0.05);
    }
}

#[test]
fn test_seek_past_track_end_skips_it() {
    let mut mixer = mixer_with_tracks();
    mixer.play();
    mixer.seek(1.6);
    // b ended at 1.5
    assert_eq!(mixer.backend().active_sources(), 1);
    assert!(mixer.track("a").unwrap().is_live);
    assert!(!mixer.track("b").unwrap().is_live);
}

#[test]
fn test_seek_while_stopped_only_moves_position() {
    let mut mixer = mixer_with_tracks();
    mixer.seek(1.25);
    assert!(!mixer.is_playing());
    assert_eq!(mixer.transport_state(), TransportState::Stopped);
    assert_eq!(mixer.state().transport, TransportState::Stopped);
    assert_eq!(mixer.backend().active_sources(), 0);
    assert_relative_eq!(mixer.current_time(), 1.25);

    mixer.seek(-4.0);
    assert_eq!(mixer.transport_state(), TransportState::Stopped);
    assert_eq!(mixer.current_time(), 0.0);
}

#[test]
fn test_play_after_seek_while_stopped_starts_at_seek_position() {
    let mut mixer = mixer_with_tracks();
    mixer.seek(1.25);
    mixer.play();

    assert!(mixer.is_playing());
    assert_relative_eq!(mixer.current_time(), 1.25, epsilon = TIME_EPSILON);
    assert_eq!(mixer.backend().active_sources(), 2);
}

#[test]
fn test_seek_while_paused_stays_paused() {
    let mut mixer = mixer_with_tracks();
    mixer.play();
    mixer.backend_mut().advance(0.5);
    mixer.pause();

    mixer.seek(0.2);
    assert_eq!(mixer.transport_state(), TransportState::Paused);
    assert_relative_eq!(mixer.current_time(), 0.2);
}

#[test]
fn test_future_track_starts_on_time() {
    let mut mixer = mixer_with_tracks();
    mixer.play();

    // b is scheduled but silent until 1.0
    assert_eq!(mixer.backend().active_sources(), 2);
    let before = mixer.backend_mut().process(7999);
    assert_relative_eq!(before.channel(0)[7998], 0.5, epsilon = FLOAT_EPSILON);

    let after = mixer.backend_mut().process(2);
    assert_relative_eq!(after.channel(0)[1], 0.75, epsilon = FLOAT_EPSILON);
}

#[test]
fn test_finished_sources_are_released() {
    let mut mixer = mixer_with_tracks();
    mixer.play();
    mixer.backend_mut().advance(2.5);

    assert!(mixer.is_playing());
    assert_eq!(mixer.backend().active_sources(), 0);
    assert!(mixer.state().tracks.iter().all(|t| !t.is_live));
}
