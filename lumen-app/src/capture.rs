//! Audio input capture using cpal
//!
//! The visualizer runs inside the input callback: interleaved device
//! samples are downmixed to mono, re-cut into fixed-size chunks, and each
//! chunk is processed before the callback returns.

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SampleRate, SizedSample, Stream, StreamConfig};
use crossbeam_channel::Sender;
use lumen_engine::{FrameSink, Visualizer, VisualizerConfig, VisualizerError};
use tracing::{debug, error, info, warn};

/// Errors between two repeated processing warnings
const ERROR_WARN_EVERY: u64 = 600;

/// Collects mono samples and hands them out in chunks of a fixed length
#[derive(Debug)]
pub struct Rechunker {
    buffer: Vec<f32>,
    chunk_len: usize,
}

impl Rechunker {
    pub fn new(chunk_len: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(chunk_len * 2),
            chunk_len,
        }
    }

    /// Downmix interleaved `data` and call `on_chunk` for every full chunk
    pub fn push_interleaved<F>(&mut self, data: &[f32], channels: usize, mut on_chunk: F)
    where
        F: FnMut(&[f32]),
    {
        let channels = channels.max(1);
        for frame in data.chunks_exact(channels) {
            let mono = frame.iter().sum::<f32>() / channels as f32;
            self.buffer.push(mono);
            if self.buffer.len() == self.chunk_len {
                on_chunk(&self.buffer);
                self.buffer.clear();
            }
        }
    }

    /// Samples waiting for the next chunk
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Print the available input devices
pub fn list_devices() -> anyhow::Result<()> {
    let host = cpal::default_host();
    let default_name = host.default_input_device().and_then(|d| d.name().ok());
    for device in host.input_devices().context("Failed to enumerate input devices")? {
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let marker = if Some(&name) == default_name.as_ref() {
            "*"
        } else {
            " "
        };
        println!("{} {}", marker, name);
    }
    Ok(())
}

/// Find an input device by name, or the default input device
pub fn find_device(name: Option<&str>) -> anyhow::Result<Device> {
    let host = cpal::default_host();
    let Some(name) = name else {
        return host
            .default_input_device()
            .ok_or_else(|| anyhow!("No default input device"));
    };

    for device in host.input_devices().context("Failed to enumerate input devices")? {
        if let Ok(device_name) = device.name() {
            if device_name.contains(name) {
                return Ok(device);
            }
        }
    }
    Err(anyhow!("No input device matching '{}'", name))
}

/// Pick a stream config at the configured sample rate
///
/// When the device cannot capture at that rate its default rate is used
/// and `config.sample_rate` is updated to match.
pub fn stream_config(
    device: &Device,
    config: &mut VisualizerConfig,
) -> anyhow::Result<(StreamConfig, SampleFormat)> {
    let wanted = SampleRate(config.sample_rate);
    let supported = device
        .supported_input_configs()
        .context("Failed to query input configs")?
        .find(|c| c.min_sample_rate() <= wanted && c.max_sample_rate() >= wanted)
        .map(|c| c.with_sample_rate(wanted));

    let supported = match supported {
        Some(c) => c,
        None => {
            let fallback = device
                .default_input_config()
                .context("Failed to get default input config")?;
            warn!(
                wanted = config.sample_rate,
                using = fallback.sample_rate().0,
                "Device cannot capture at the configured rate"
            );
            config.sample_rate = fallback.sample_rate().0;
            fallback
        }
    };

    let sample_format = supported.sample_format();
    let stream_config: StreamConfig = supported.into();
    debug!(
        "Stream config: {} Hz, {} channels, {:?}",
        stream_config.sample_rate.0, stream_config.channels, sample_format
    );
    Ok((stream_config, sample_format))
}

/// Build and start an input stream that drives `visualizer`
///
/// Stream errors are logged and forwarded on `errors`.
pub fn start<S>(
    device: &Device,
    stream_config: &StreamConfig,
    sample_format: SampleFormat,
    visualizer: Visualizer<S>,
    errors: Sender<String>,
) -> anyhow::Result<Stream>
where
    S: FrameSink + Send + 'static,
{
    let stream = match sample_format {
        SampleFormat::F32 => build::<f32, S>(device, stream_config, visualizer, errors, |s| s),
        SampleFormat::I16 => build::<i16, S>(device, stream_config, visualizer, errors, |s| {
            s as f32 / i16::MAX as f32
        }),
        SampleFormat::I32 => build::<i32, S>(device, stream_config, visualizer, errors, |s| {
            (s as f64 / i32::MAX as f64) as f32
        }),
        SampleFormat::U16 => build::<u16, S>(device, stream_config, visualizer, errors, |s| {
            (s as f32 / u16::MAX as f32) * 2.0 - 1.0
        }),
        SampleFormat::U8 => build::<u8, S>(device, stream_config, visualizer, errors, |s| {
            (s as f32 / 128.0) - 1.0
        }),
        other => return Err(anyhow!("Unsupported sample format: {:?}", other)),
    }?;

    stream.play().context("Failed to start audio stream")?;
    info!(
        device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
        sample_rate = stream_config.sample_rate.0,
        channels = stream_config.channels,
        "Audio capture started"
    );
    Ok(stream)
}

fn build<T, S>(
    device: &Device,
    stream_config: &StreamConfig,
    mut visualizer: Visualizer<S>,
    errors: Sender<String>,
    convert: fn(T) -> f32,
) -> anyhow::Result<Stream>
where
    T: SizedSample + 'static,
    S: FrameSink + Send + 'static,
{
    let channels = stream_config.channels as usize;
    let mut rechunker = Rechunker::new(visualizer.config().chunk_len());
    // Reused across callbacks to avoid allocating on the audio thread
    let mut converted: Vec<f32> = Vec::new();
    let mut failures: u64 = 0;

    let stream = device
        .build_input_stream(
            stream_config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                converted.clear();
                converted.extend(data.iter().map(|&s| convert(s)));
                rechunker.push_interleaved(&converted, channels, |chunk| {
                    if let Err(e) = visualizer.process_chunk(chunk) {
                        log_process_error(&e, failures);
                        failures += 1;
                    }
                });
            },
            move |err| {
                error!("Audio stream error: {}", err);
                let _ = errors.try_send(err.to_string());
            },
            None,
        )
        .context("Failed to build audio stream")?;
    Ok(stream)
}

fn log_process_error(e: &VisualizerError, failures: u64) {
    if failures % ERROR_WARN_EVERY == 0 {
        warn!(error = %e, failures = failures + 1, "Chunk dropped");
    }
}
