//! CPAL hardware output.

use super::{AudioBackend, AudioGraph};
use crate::graph::{Destination, GainId, SignalGraph, SourceId};
use crate::{AudioBuffer, Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use std::sync::Arc;

/// Live backend rendering the signal graph on the CPAL device callback.
///
/// The graph clock is the number of frames the device has pulled, so
/// [`now`](AudioGraph::now) follows the hardware clock. Graph edits lock the
/// shared graph briefly; the callback only ever `try_lock`s and writes silence
/// for a block it could not lock.
pub struct CpalBackend {
    graph: Arc<Mutex<SignalGraph>>,
    stream: Option<cpal::Stream>,
    sample_rate: u32,
    channels: usize,
    suspended: bool,
}

impl CpalBackend {
    /// Open the default output device.
    pub fn new() -> Result<Self> {
        Self::with_device(None)
    }

    /// Open the output device at `index` (see [`list_output_devices`](Self::list_output_devices)).
    pub fn with_device(index: Option<usize>) -> Result<Self> {
        let device = get_device(index)?;
        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        let graph = Arc::new(Mutex::new(SignalGraph::new(sample_rate)));

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), graph.clone())?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), graph.clone())?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), graph.clone())?,
            format => {
                return Err(Error::BackendUnavailable(format!(
                    "Unsupported sample format: {:?}",
                    format
                )));
            }
        };
        stream.play()?;

        log::debug!(
            "opened output stream: {} Hz, {} channels",
            sample_rate,
            channels
        );

        Ok(Self {
            graph,
            stream: Some(stream),
            sample_rate,
            channels,
            suspended: false,
        })
    }

    /// Hardware channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Pause the device stream. The clock stops with it.
    pub fn suspend(&mut self) -> Result<()> {
        if let Some(stream) = &self.stream {
            stream.pause()?;
        }
        self.suspended = true;
        Ok(())
    }

    /// List available output devices.
    pub fn list_output_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .output_devices()
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;
        Ok(devices
            .enumerate()
            .map(|(idx, device)| {
                let name = device.name().unwrap_or_else(|_| "<unknown>".into());
                format!("{}: {}", idx, name)
            })
            .collect())
    }
}

fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();

    if let Some(idx) = index {
        let devices: Vec<_> = host
            .output_devices()
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?
            .collect();

        let device_count = devices.len();
        devices.into_iter().nth(idx).ok_or_else(|| {
            Error::BackendUnavailable(format!(
                "Output device index {} out of range (available: {})",
                idx, device_count
            ))
        })
    } else {
        host.default_output_device()
            .ok_or_else(|| Error::BackendUnavailable("No output device available".to_string()))
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    graph: Arc<Mutex<SignalGraph>>,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut left: Vec<f32> = Vec::new();
    let mut right: Vec<f32> = Vec::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let frames = data.len() / channels;
            left.resize(frames, 0.0);
            right.resize(frames, 0.0);

            match graph.try_lock() {
                Some(mut graph) => graph.render(&mut left, &mut right),
                None => {
                    left.fill(0.0);
                    right.fill(0.0);
                }
            }

            for (frame, out) in data.chunks_mut(channels).enumerate() {
                for (channel, sample) in out.iter_mut().enumerate() {
                    let value = match (channels, channel) {
                        (1, _) => (left[frame] + right[frame]) * 0.5,
                        (_, 0) => left[frame],
                        (_, 1) => right[frame],
                        _ => 0.0,
                    };
                    *sample = T::from_sample(value);
                }
            }
        },
        |err| log::error!("audio stream error: {}", err),
        None,
    )?;

    Ok(stream)
}

impl AudioGraph for CpalBackend {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn now(&self) -> f64 {
        self.graph.lock().now()
    }

    fn create_gain(&mut self, value: f32, destination: Destination) -> Result<GainId> {
        self.graph.lock().create_gain(value, destination)
    }

    fn set_gain(&mut self, id: GainId, value: f32) {
        self.graph.lock().set_gain(id, value)
    }

    fn gain_value(&self, id: GainId) -> Option<f32> {
        self.graph.lock().gain_value(id)
    }

    fn disconnect_gain(&mut self, id: GainId) {
        self.graph.lock().disconnect_gain(id)
    }

    fn create_source(&mut self, buffer: Arc<AudioBuffer>, output: GainId) -> Result<SourceId> {
        self.graph.lock().create_source(buffer, output)
    }

    fn start_source(&mut self, id: SourceId, when: f64, offset: f64) -> Result<()> {
        self.graph.lock().start_source(id, when, offset)
    }

    fn stop_source(&mut self, id: SourceId) {
        self.graph.lock().stop_source(id)
    }

    fn is_source_active(&self, id: SourceId) -> bool {
        self.graph.lock().is_source_active(id)
    }
}

impl AudioBackend for CpalBackend {
    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<()> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| Error::BackendUnavailable("output stream is closed".into()))?;
        stream.play()?;
        self.suspended = false;
        Ok(())
    }

    fn close(&mut self) {
        self.stream = None;
    }
}
