//! Clip playback via cpal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};

use media_recorder_core::models::clip::WavClip;
use media_recorder_core::models::error::RecorderError;
use media_recorder_core::processing::wav::{WavHeader, WAV_HEADER_LEN};
use media_recorder_core::traits::playback_sink::{PlaybackObserver, PlaybackSink};

/// Playback endpoint backed by the system default output device.
///
/// Decodes the container's 16-bit PCM data back to f32 and feeds it to an
/// output stream at the clip's sample rate. The observer's `on_ready`
/// fires once the stream is running; `on_ended` fires from the audio
/// thread when the last frame has been rendered.
pub struct CpalPlaybackSink {
    device: cpal::Device,
    stream: Option<Stream>,
}

impl CpalPlaybackSink {
    /// Open the system default output device.
    pub fn default_device() -> Result<Self, RecorderError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| RecorderError::Playback("no output device found".into()))?;

        Ok(Self {
            device,
            stream: None,
        })
    }
}

impl PlaybackSink for CpalPlaybackSink {
    fn play(&mut self, clip: &WavClip, observer: Arc<dyn PlaybackObserver>) -> Result<(), RecorderError> {
        // Replace any playback still in flight.
        if let Some(stream) = self.stream.take() {
            let _ = stream.pause();
        }

        let header = WavHeader::parse(clip.as_bytes())?;
        let samples = decode_pcm16(&clip.as_bytes()[WAV_HEADER_LEN..]);
        let src_channels = header.channels.max(1) as usize;
        let frames = samples.len() / src_channels;

        let supported = self
            .device
            .default_output_config()
            .map_err(|e| RecorderError::Playback(format!("no output config: {}", e)))?;
        let out_channels = supported.channels() as usize;
        let mut config: StreamConfig = supported.into();
        config.sample_rate = header.sample_rate;

        let mut cursor = 0usize;
        let ended = AtomicBool::new(false);
        let audio_observer = Arc::clone(&observer);
        let err_fn = |err: cpal::StreamError| log::error!("output stream error: {}", err);

        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(out_channels) {
                        if cursor < frames {
                            let left = samples[cursor * src_channels];
                            let right = samples[cursor * src_channels + (src_channels - 1)];
                            write_frame(frame, left, right);
                            cursor += 1;
                        } else {
                            frame.fill(0.0);
                            if !ended.swap(true, Ordering::SeqCst) {
                                audio_observer.on_ended();
                            }
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| RecorderError::Playback(format!("failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| RecorderError::Playback(format!("failed to start playback: {}", e)))?;

        log::info!("playing {} frames at {} Hz", frames, header.sample_rate);
        self.stream = Some(stream);
        observer.on_ready();
        Ok(())
    }
}

impl Drop for CpalPlaybackSink {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.pause();
        }
    }
}

fn decode_pcm16(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32_768.0)
        .collect()
}

/// Map one stereo source frame onto an output frame of any width.
fn write_frame(frame: &mut [f32], left: f32, right: f32) {
    match frame.len() {
        0 => {}
        1 => frame[0] = 0.5 * (left + right),
        _ => {
            frame[0] = left;
            frame[1] = right;
            for sample in &mut frame[2..] {
                *sample = 0.0;
            }
        }
    }
}
