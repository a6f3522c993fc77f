//! Microphone capture via cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};

use media_recorder_core::models::error::RecorderError;
use media_recorder_core::models::source::SourceInfo;
use media_recorder_core::traits::capture_source::{BlockCallback, CaptureSource};

/// Capture source backed by the system default input device.
///
/// Each device buffer is delivered as one block pair: stereo input is
/// split into left/right, mono input is duplicated into both channels.
/// The device keeps its native sample rate — configure the session with
/// `sample_rate()` so the encoded header matches the captured audio.
pub struct CpalMicSource {
    device: cpal::Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    stream: Option<Stream>,
}

impl CpalMicSource {
    /// Open the system default input device with its default configuration.
    pub fn default_device() -> Result<Self, RecorderError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| RecorderError::CaptureUnavailable("no input device found".into()))?;

        match device.description() {
            Ok(desc) => log::info!("input device: {:?}", desc),
            Err(_) => log::info!("input device: unknown"),
        }

        let supported = device
            .default_input_config()
            .map_err(|e| RecorderError::CaptureUnavailable(format!("no input config: {}", e)))?;

        log::info!(
            "input config: {} Hz, {} channels, {:?}",
            supported.sample_rate(),
            supported.channels(),
            supported.sample_format()
        );

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_format,
            stream: None,
        })
    }

    /// Native sample rate of the opened device.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    fn build_stream<T>(&self, callback: BlockCallback) -> Result<Stream, RecorderError>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let channels = self.config.channels as usize;
        let err_fn = |err: cpal::StreamError| log::error!("input stream error: {}", err);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<f32> = data.iter().map(|&s| f32::from_sample(s)).collect();
                    deliver_block(&samples, channels, &callback);
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                RecorderError::CaptureUnavailable(format!("failed to build input stream: {}", e))
            })?;

        Ok(stream)
    }
}

impl CaptureSource for CpalMicSource {
    fn is_available(&self) -> bool {
        // The device handle was acquired at construction.
        true
    }

    fn start(&mut self, callback: BlockCallback) -> Result<(), RecorderError> {
        if self.stream.is_some() {
            log::warn!("capture stream already running");
            return Ok(());
        }

        let stream = match self.sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(callback),
            SampleFormat::I16 => self.build_stream::<i16>(callback),
            SampleFormat::U16 => self.build_stream::<u16>(callback),
            other => Err(RecorderError::CaptureUnavailable(format!(
                "unsupported sample format: {:?}",
                other
            ))),
        }?;

        stream
            .play()
            .map_err(|e| RecorderError::CaptureUnavailable(format!("failed to start stream: {}", e)))?;

        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        if let Some(stream) = self.stream.take() {
            let _ = stream.pause();
        }
        Ok(())
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            id: "default-input".into(),
            name: "Default input device".into(),
            is_default: true,
        }
    }
}

impl Drop for CpalMicSource {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.pause();
        }
    }
}

/// Split one interleaved device buffer into a left/right block pair.
///
/// Channels beyond the first two are ignored.
fn deliver_block(samples: &[f32], channels: usize, callback: &BlockCallback) {
    if samples.is_empty() {
        return;
    }
    if channels <= 1 {
        callback(samples, samples);
        return;
    }

    let frames = samples.len() / channels;
    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);
    for frame in samples.chunks_exact(channels) {
        left.push(frame[0]);
        right.push(frame[1]);
    }
    callback(&left, &right);
}
