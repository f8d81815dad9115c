//! Builder for configuring and constructing a `Mixer`.

use crate::source::SourceSupplier;
use crate::{Mixer, Result};
use alkemix_core::{AudioBackend, HeadlessBackend, MixerConfig};

/// The sample rate only applies to backends the builder creates itself. A
/// backend passed to [`build_with_backend`](Self::build_with_backend) keeps
/// its own rate, and hardware output runs at the device rate.
///
/// # Example
///
/// ```ignore
/// use alkemix::prelude::*;
///
/// let mixer = Mixer::builder()
///     .sample_rate(48000)
///     .waveform_width(600)
///     .supplier(FileSupplier::with_root("project/audio"))
///     .build()?;
/// ```
#[derive(Default)]
pub struct MixerBuilder {
    config: MixerConfig,
    supplier: Option<Box<dyn SourceSupplier>>,

    #[cfg(feature = "cpal")]
    output_device: Option<usize>,
}

impl MixerBuilder {
    /// Default: 44100
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Columns returned by [`Mixer::waveform`]. Default: 1000
    pub fn waveform_width(mut self, width: usize) -> Self {
        self.config.waveform_width = width;
        self
    }

    pub fn config(mut self, config: MixerConfig) -> Self {
        self.config = config;
        self
    }

    /// Where track bytes are read from. Default: [`FileSupplier`](crate::FileSupplier) without a root
    pub fn supplier(mut self, supplier: impl SourceSupplier + 'static) -> Self {
        self.supplier = Some(Box::new(supplier));
        self
    }

    /// Output device index for [`build_cpal`](Self::build_cpal). Default: system default
    #[cfg(feature = "cpal")]
    pub fn output_device(mut self, index: usize) -> Self {
        self.output_device = Some(index);
        self
    }

    /// Build on a manually clocked [`HeadlessBackend`].
    pub fn build(self) -> Result<Mixer<HeadlessBackend>> {
        self.config.validate()?;
        let backend = HeadlessBackend::new(self.config.sample_rate);
        Mixer::from_parts(backend, self.config, self.supplier)
    }

    pub fn build_with_backend<B: AudioBackend>(self, backend: B) -> Result<Mixer<B>> {
        Mixer::from_parts(backend, self.config, self.supplier)
    }

    /// Build on the hardware output device.
    #[cfg(feature = "cpal")]
    pub fn build_cpal(self) -> Result<Mixer<alkemix_core::CpalBackend>> {
        let backend = alkemix_core::CpalBackend::with_device(self.output_device)?;
        Mixer::from_parts(backend, self.config, self.supplier)
    }
}
