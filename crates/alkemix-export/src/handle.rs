//! Non-blocking export handle with progress polling.

use crate::renderer::{ExportProgress, OfflineRenderer};
use crate::{ExportError, Result};
use alkemix_core::{MixPlan, OfflineContext};
use crossbeam_channel::Receiver;
use std::thread::JoinHandle;

/// Status of a background export operation.
#[derive(Debug, Clone)]
pub enum ExportStatus {
    /// No progress yet (just started).
    Pending,
    /// Export is in progress.
    Running(ExportProgress),
    /// Export completed successfully with the encoded WAV bytes.
    Complete(Vec<u8>),
    /// Export failed with an error message.
    Failed(String),
}

/// Handle to a background export operation.
///
/// Poll with [`progress()`](Self::progress) each UI frame, or block with
/// [`wait()`](Self::wait). Dropping the handle detaches the render thread.
///
/// # Example
/// ```ignore
/// let mut export = mixer.export_in_background(None)?;
///
/// loop {
///     match export.progress() {
///         ExportStatus::Running(p) => println!("{:?} {:.0}%", p.phase, p.progress * 100.0),
///         ExportStatus::Complete(bytes) => { save(bytes); break; }
///         ExportStatus::Failed(e) => { eprintln!("Error: {}", e); break; }
///         ExportStatus::Pending => {}
///     }
/// }
/// ```
pub struct ExportHandle {
    progress_rx: Receiver<ExportProgress>,
    thread: Option<JoinHandle<Result<Vec<u8>>>>,
    last_progress: Option<ExportProgress>,
    outcome: Option<Result<Vec<u8>>>,
}

impl ExportHandle {
    /// Render `plan` into `context` on a dedicated thread.
    pub fn spawn(plan: MixPlan, context: OfflineContext) -> Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded(64);
        let renderer = OfflineRenderer::new(plan);

        let thread = std::thread::Builder::new()
            .name("alkemix-export".into())
            .spawn(move || {
                renderer.export_wav(context, &mut |p| {
                    let _ = tx.try_send(p); // drop if full, the poller only wants the latest
                })
            })?;

        Ok(Self {
            progress_rx: rx,
            thread: Some(thread),
            last_progress: None,
            outcome: None,
        })
    }

    /// Poll for the latest export progress (non-blocking).
    ///
    /// Drains all pending progress messages and returns the latest one.
    /// Once the export thread has finished, every call returns `Complete` or `Failed`.
    pub fn progress(&mut self) -> ExportStatus {
        while let Ok(p) = self.progress_rx.try_recv() {
            self.last_progress = Some(p);
        }

        if self.is_done() {
            self.join();
        }

        match &self.outcome {
            Some(Ok(bytes)) => ExportStatus::Complete(bytes.clone()),
            Some(Err(e)) => ExportStatus::Failed(e.to_string()),
            None => match self.last_progress {
                Some(p) => ExportStatus::Running(p),
                None => ExportStatus::Pending,
            },
        }
    }

    /// Block until the export finishes and return the WAV bytes.
    pub fn wait(mut self) -> Result<Vec<u8>> {
        self.join();
        self.outcome
            .take()
            .unwrap_or_else(|| Err(ExportError::Render("export result already taken".into())))
    }

    /// Check if the export has finished (non-blocking).
    pub fn is_done(&self) -> bool {
        self.thread
            .as_ref()
            .map(|t| t.is_finished())
            .unwrap_or(true)
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.outcome = Some(match thread.join() {
                Ok(result) => result,
                Err(_) => Err(ExportError::Render("Export thread panicked".into())),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alkemix_core::{AudioBuffer, MixVoice, TrackId};
    use std::sync::Arc;

    fn plan() -> MixPlan {
        MixPlan {
            master_volume: 1.0,
            voices: vec![MixVoice {
                id: TrackId::new("music"),
                buffer: Arc::new(AudioBuffer::mono(8000, vec![0.5; 8000]).unwrap()),
                gain: 1.0,
                start_time: 0.0,
            }],
        }
    }

    #[test]
    fn test_wait_returns_same_bytes_as_blocking_render() {
        let expected = OfflineRenderer::new(plan())
            .export_wav(OfflineContext::new(8000, 8000), &mut |_| {})
            .unwrap();

        let handle = ExportHandle::spawn(plan(), OfflineContext::new(8000, 8000)).unwrap();
        assert_eq!(handle.wait().unwrap(), expected);
    }

    #[test]
    fn test_progress_ends_complete() {
        let mut handle = ExportHandle::spawn(plan(), OfflineContext::new(800, 8000)).unwrap();
        let bytes = loop {
            match handle.progress() {
                ExportStatus::Complete(bytes) => break bytes,
                ExportStatus::Failed(e) => panic!("export failed: {e}"),
                ExportStatus::Pending | ExportStatus::Running(_) => std::thread::yield_now(),
            }
        };
        assert_eq!(bytes.len(), 44 + 800 * 4);
        assert!(handle.is_done());
        assert!(matches!(handle.progress(), ExportStatus::Complete(_)));
    }
}
