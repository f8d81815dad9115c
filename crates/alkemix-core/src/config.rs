//! Mixer configuration.

use crate::{Error, Result};

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Number of envelope points returned when the caller does not pick a width.
pub const DEFAULT_WAVEFORM_WIDTH: usize = 1000;

/// Configuration for a mixer instance.
#[derive(Debug, Clone)]
pub struct MixerConfig {
    pub sample_rate: u32,
    pub waveform_width: usize,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            waveform_width: DEFAULT_WAVEFORM_WIDTH,
        }
    }
}

impl MixerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8000..=384000).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.waveform_width == 0 {
            return Err(Error::InvalidConfig(
                "waveform_width must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
