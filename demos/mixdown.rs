//! # Mixdown
//!
//! Load audio files onto a timeline, play a little of it headlessly, then
//! export the full mix to WAV.
//!
//! **Concepts:** `TrackSpec`, `FileSupplier`, transport, `export_to_file`, background export
//!
//! ```bash
//! cargo run --example mixdown -- dialogue.wav music.wav [more.wav ...]
//! ```
//!
//! Each file starts two seconds after the previous one. All files must share
//! the mixer's sample rate (44.1 kHz).

use alkemix::prelude::*;
use alkemix::ExportPhase;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: mixdown <file.wav> [file.wav ...]");
        std::process::exit(2);
    }

    let mut mixer = Mixer::builder()
        .sample_rate(44100)
        .supplier(FileSupplier::new())
        .build()?;

    for (i, path) in paths.iter().enumerate() {
        let category = if i == 0 {
            TrackCategory::Dialogue
        } else {
            TrackCategory::Music
        };
        mixer.add_track(
            TrackSpec::new(format!("track-{}", i), category, path.as_str())
                .start_time(i as f64 * 2.0)
                .volume(if i == 0 { 1.0 } else { 0.5 }),
        )?;
    }
    println!("Loaded {} tracks, {:.2}s", mixer.track_count(), mixer.duration());

    // Pull one second through the live graph
    mixer.play();
    let block = mixer.backend_mut().process(44100);
    println!(
        "Played to {:.2}s, block peak {:.3}",
        mixer.current_time(),
        block.peak()
    );
    mixer.stop();

    // Export with progress
    let out = std::env::temp_dir().join("alkemix_mixdown.wav");
    let wav = mixer.export_mixed_audio_with_progress(None, |progress| {
        let phase = match progress.phase {
            ExportPhase::Rendering => "Rendering",
            ExportPhase::Encoding => "Encoding",
        };
        print!("\r{} {:.0}%", phase, progress.progress * 100.0);
    })?;
    std::fs::write(&out, &wav)?;
    println!("\nExported: {} ({} bytes)", out.display(), wav.len());

    // Same render on a background thread
    let mut export = mixer.export_in_background(None)?;
    loop {
        match export.progress() {
            ExportStatus::Complete(bytes) => {
                println!("Background export: {} bytes", bytes.len());
                break;
            }
            ExportStatus::Failed(e) => {
                eprintln!("Background export failed: {}", e);
                break;
            }
            ExportStatus::Running(_) | ExportStatus::Pending => {
                std::thread::sleep(std::time::Duration::from_millis(5))
            }
        }
    }

    mixer.dispose();
    Ok(())
}
