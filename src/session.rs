//! Owner-held mixer slot.

use crate::{Mixer, Result};
use alkemix_core::{AudioBackend, HeadlessBackend};

type MixerFactory<B> = Box<dyn FnMut() -> Result<Mixer<B>> + Send>;

/// Holds at most one [`Mixer`] for an application that needs a shared one.
///
/// The mixer is built on first [`get`](Self::get) and the same instance is
/// returned until [`dispose`](Self::dispose); the next `get` builds a fresh
/// one.
///
/// # Example
///
/// ```ignore
/// let mut session = MixerSession::new(|| {
///     Mixer::builder().supplier(FileSupplier::with_root("assets")).build()
/// });
///
/// session.get()?.add_track(TrackSpec::new("vo", TrackCategory::Dialogue, "vo.wav"))?;
/// session.get()?.play();
/// session.dispose();
/// ```
pub struct MixerSession<B: AudioBackend = HeadlessBackend> {
    factory: MixerFactory<B>,
    mixer: Option<Mixer<B>>,
}

impl MixerSession<HeadlessBackend> {
    /// Session building headless mixers with default configuration.
    pub fn headless() -> Self {
        Self::new(Mixer::new)
    }
}

impl<B: AudioBackend> MixerSession<B> {
    pub fn new(factory: impl FnMut() -> Result<Mixer<B>> + Send + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            mixer: None,
        }
    }

    /// The live mixer, constructing it if needed.
    pub fn get(&mut self) -> Result<&mut Mixer<B>> {
        let mixer = match self.mixer.take() {
            Some(mixer) => mixer,
            None => {
                log::debug!("session constructing mixer");
                (self.factory)()?
            }
        };
        Ok(self.mixer.insert(mixer))
    }

    pub fn is_active(&self) -> bool {
        self.mixer.is_some()
    }

    /// Dispose the live mixer, if any.
    pub fn dispose(&mut self) {
        if let Some(mixer) = self.mixer.take() {
            mixer.dispose();
        }
    }
}

impl<B: AudioBackend> Drop for MixerSession<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_same_instance_until_dispose() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        let mut session = MixerSession::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Mixer::new()
        });

        assert!(!session.is_active());
        session.get().unwrap().set_master_volume(0.4);
        assert_eq!(session.get().unwrap().master_volume(), 0.4);
        assert_eq!(built.load(Ordering::SeqCst), 1);

        session.dispose();
        assert!(!session.is_active());
        assert_eq!(session.get().unwrap().master_volume(), 1.0);
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_factory_error_leaves_session_empty() {
        let mut session = MixerSession::new(|| Mixer::builder().waveform_width(0).build());
        assert!(session.get().is_err());
        assert!(!session.is_active());
    }
}
