//! Audio capture sources.
//!
//! A source's only job is to push captured chunks into a shared
//! `CaptureBuffer`; it never touches the stream or the engine. The trait
//! seam lets tests drive the processing loop without a microphone and
//! leaves room for other platform backends.

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};
use std::sync::Arc;
use tracing::{error, info};

use crate::capture::CaptureBuffer;

/// A capture source feeding a `CaptureBuffer` from its own thread or
/// device callback.
///
/// Not required to be Send: platform capture streams (cpal in particular)
/// are managed on the thread that owns the source.
pub trait AudioSource {
    /// Begin capturing. Samples flow into the buffer the source was built
    /// with until `stop` is called.
    fn start(&mut self) -> Result<()>;

    /// Pause capturing. The buffer keeps whatever was already pushed.
    fn stop(&mut self) -> Result<()>;
}

/// Information about an available input device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub is_default: bool,
}

/// Microphone capture via cpal: mono f32 at the configured sample rate,
/// clamped to [-1.0, 1.0].
pub struct CpalSource {
    stream: Option<cpal::Stream>,
}

impl CpalSource {
    /// Build an input stream on the named device ("default"/None for the
    /// system default), pushing every callback buffer into `sink`.
    pub fn new(
        sink: Arc<CaptureBuffer>,
        device_name: Option<&str>,
        sample_rate: u32,
    ) -> Result<Self> {
        let host = cpal::default_host();

        let device = match device_name {
            None | Some("default") => host
                .default_input_device()
                .ok_or_else(|| anyhow::anyhow!("no default input device"))?,
            Some(name) => {
                let mut found = None;
                if let Ok(devices) = host.input_devices() {
                    for device in devices {
                        if device.name().map(|n| n == name).unwrap_or(false) {
                            found = Some(device);
                            break;
                        }
                    }
                }
                found.ok_or_else(|| anyhow::anyhow!("input device '{}' not found", name))?
            }
        };

        info!("capturing from input device: {}", device.name()?);

        let config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let chunk: Vec<f32> = data.iter().map(|&s| s.clamp(-1.0, 1.0)).collect();
                sink.push(chunk);
            },
            |err| error!("audio capture error: {err}"),
            None,
        )?;

        Ok(Self {
            stream: Some(stream),
        })
    }

    /// List available input devices.
    pub fn list_devices() -> Result<Vec<DeviceInfo>> {
        let host = cpal::default_host();
        let default_name = host
            .default_input_device()
            .and_then(|d| d.name().ok())
            .unwrap_or_default();

        let mut devices = Vec::new();
        if let Ok(inputs) = host.input_devices() {
            for device in inputs {
                if let Ok(name) = device.name() {
                    devices.push(DeviceInfo {
                        is_default: name == default_name,
                        name,
                    });
                }
            }
        }
        Ok(devices)
    }
}

impl AudioSource for CpalSource {
    fn start(&mut self) -> Result<()> {
        if let Some(stream) = &self.stream {
            stream.play()?;
            info!("audio capture started");
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stream) = &self.stream {
            stream.pause()?;
            info!("audio capture paused");
        }
        Ok(())
    }
}
