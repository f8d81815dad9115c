//! Offline mixdown renderer
//!
//! Rebuilds a [`MixPlan`] inside an [`OfflineContext`] and renders it to
//! completion. The same plan rendered into a context of the same length
//! always produces identical samples.

use crate::error::{ExportError, Result};
use crate::format::wav;
use alkemix_core::{AudioBuffer, MixPlan, OfflineContext, OUTPUT_CHANNELS};
use std::path::Path;

/// Progress of an export, reported per phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportProgress {
    pub phase: ExportPhase,
    /// Progress within current phase (0.0 to 1.0).
    pub progress: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Rendering,
    Encoding,
}

/// Result of a render operation
#[derive(Debug, Clone)]
pub struct Mixdown {
    /// Stereo render at the backend sample rate
    pub buffer: AudioBuffer,
    /// Peak level (linear)
    pub peak_level: f32,
}

impl Mixdown {
    pub fn duration_seconds(&self) -> f64 {
        self.buffer.duration()
    }

    /// Encode to 16-bit PCM WAV bytes.
    pub fn to_wav(&self) -> Result<Vec<u8>> {
        wav::encode_buffer(&self.buffer)
    }
}

/// Resolve the render length: an explicit override, else the plan's duration.
pub fn resolve_duration(duration_override: Option<f64>, plan: &MixPlan) -> Result<f64> {
    let duration = duration_override.unwrap_or_else(|| plan.duration());
    if !duration.is_finite() || duration < 0.0 {
        return Err(ExportError::InvalidOptions(format!(
            "export duration must be a non-negative number of seconds, got {duration}"
        )));
    }
    Ok(duration)
}

/// Longest stereo export whose WAV sizes still fit the 32-bit RIFF fields.
pub const MAX_EXPORT_FRAMES: usize =
    (u32::MAX as usize - wav::WAV_HEADER_LEN) / (OUTPUT_CHANNELS * 2);

/// Frames needed to hold `duration` seconds, rounded up.
///
/// Durations longer than [`MAX_EXPORT_FRAMES`] are `InvalidOptions`.
pub fn frame_count(duration: f64, sample_rate: u32) -> Result<usize> {
    let frames = (duration * sample_rate as f64).ceil();
    if !(frames >= 0.0 && frames <= MAX_EXPORT_FRAMES as f64) {
        return Err(ExportError::InvalidOptions(format!(
            "export of {duration}s at {sample_rate} Hz exceeds {MAX_EXPORT_FRAMES} frames"
        )));
    }
    Ok(frames as usize)
}

/// Offline audio renderer
///
/// Owns an immutable snapshot of the mix, so it can run on any thread.
#[derive(Debug, Clone)]
pub struct OfflineRenderer {
    plan: MixPlan,
}

impl OfflineRenderer {
    pub fn new(plan: MixPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &MixPlan {
        &self.plan
    }

    pub fn render(&self, context: OfflineContext) -> Result<Mixdown> {
        self.render_with_progress(context, &mut |_| {})
    }

    /// Render the plan into `context`.
    ///
    /// # Arguments
    /// * `context` - Render target, sized by the caller
    /// * `on_progress` - Receives `Rendering` progress from 0.0 to 1.0
    pub fn render_with_progress(
        &self,
        mut context: OfflineContext,
        on_progress: &mut dyn FnMut(ExportProgress),
    ) -> Result<Mixdown> {
        self.plan.build(&mut context)?;

        let buffer = context.start_rendering_with_progress(&mut |progress| {
            on_progress(ExportProgress {
                phase: ExportPhase::Rendering,
                progress,
            })
        })?;

        let peak_level = buffer.peak();
        Ok(Mixdown { buffer, peak_level })
    }

    /// Render and encode to WAV bytes.
    pub fn export_wav(
        &self,
        context: OfflineContext,
        on_progress: &mut dyn FnMut(ExportProgress),
    ) -> Result<Vec<u8>> {
        let mixdown = self.render_with_progress(context, on_progress)?;

        on_progress(ExportProgress {
            phase: ExportPhase::Encoding,
            progress: 0.0,
        });
        let bytes = mixdown.to_wav()?;
        on_progress(ExportProgress {
            phase: ExportPhase::Encoding,
            progress: 1.0,
        });

        log::info!(
            "Exported {:.3}s mixdown of {} tracks ({} bytes, peak {:.3})",
            mixdown.duration_seconds(),
            self.plan.voices.len(),
            bytes.len(),
            mixdown.peak_level
        );
        Ok(bytes)
    }

    /// Render and write the WAV to `path`.
    pub fn export_file(&self, context: OfflineContext, path: &Path) -> Result<()> {
        let mixdown = self.render(context)?;
        wav::encode_buffer_file(&mixdown.buffer, path)?;
        log::info!(
            "Exported {:.3}s mixdown to {}",
            mixdown.duration_seconds(),
            path.display()
        );
        Ok(())
    }
}
