//! Live audio output.
//!
//! A dedicated thread builds and owns the cpal stream (the stream handle is
//! not Send) and parks for the life of the process; the output is opened once
//! and never torn down. The stream callback drains a shared mixer of active
//! voices, so everything that crosses threads is the mixer handle.

use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, warn};

use crate::error::{GlasscutError, Result};
use crate::synth::voice::Voice;

/// Active voices summed into the output stream
#[derive(Default)]
struct Mixer {
    voices: Vec<Voice>,
}

impl Mixer {
    fn add(&mut self, voice: Voice) {
        self.voices.push(voice);
    }

    /// Fill an interleaved buffer, dropping voices that finish
    fn fill(&mut self, data: &mut [f32], channels: usize) {
        for frame in data.chunks_mut(channels) {
            let mut sum = 0.0f32;
            for voice in &mut self.voices {
                if let Some(sample) = voice.next() {
                    sum += sample;
                }
            }
            let sample = sum.clamp(-1.0, 1.0);
            for out in frame.iter_mut() {
                *out = sample;
            }
        }
        self.voices.retain(|v| !v.is_finished());
    }
}

/// Handle to the live output stream
pub struct AudioOutput {
    mixer: Arc<Mutex<Mixer>>,
    sample_rate: u32,
}

impl AudioOutput {
    /// Open the default output device
    ///
    /// Spawns the stream owner thread and waits for it to report either a
    /// running stream or the reason it could not build one.
    pub fn open() -> Result<Self> {
        let mixer = Arc::new(Mutex::new(Mixer::default()));
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread_mixer = mixer.clone();
        thread::Builder::new()
            .name("glasscut-audio".to_string())
            .spawn(move || match build_stream(thread_mixer) {
                Ok((stream, sample_rate)) => {
                    let _ = ready_tx.send(Ok(sample_rate));
                    // Hold the stream until the process exits
                    let _stream = stream;
                    loop {
                        thread::park();
                    }
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })?;

        let sample_rate = ready_rx.recv().map_err(|_| GlasscutError::AudioStream {
            reason: "audio thread exited before reporting".to_string(),
        })??;

        Ok(Self { mixer, sample_rate })
    }

    /// Output sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Hand a voice to the mixer; it plays until its envelope ends
    pub fn submit(&self, voice: Voice) {
        if let Ok(mut mixer) = self.mixer.lock() {
            mixer.add(voice);
        }
    }

    /// Number of voices currently sounding
    pub fn active_voices(&self) -> usize {
        self.mixer.lock().map(|m| m.voices.len()).unwrap_or(0)
    }
}

fn build_stream(mixer: Arc<Mutex<Mixer>>) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(GlasscutError::NoOutputDevice)?;

    let config = device
        .default_output_config()
        .map_err(|e| GlasscutError::AudioStream {
            reason: e.to_string(),
        })?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    debug!(
        "Output device: {:?} {} Hz, {} channels",
        config.sample_format(),
        sample_rate,
        channels
    );

    let err_fn = |err| warn!("Audio stream error: {}", err);

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                match mixer.lock() {
                    Ok(mut mixer) => mixer.fill(data, channels),
                    Err(_) => data.fill(0.0),
                }
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::I16 => {
            let mut scratch: Vec<f32> = Vec::new();
            device.build_output_stream(
                &config.into(),
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    scratch.resize(data.len(), 0.0);
                    match mixer.lock() {
                        Ok(mut mixer) => mixer.fill(&mut scratch, channels),
                        Err(_) => scratch.fill(0.0),
                    }
                    for (out, s) in data.iter_mut().zip(&scratch) {
                        *out = (s * i16::MAX as f32) as i16;
                    }
                },
                err_fn,
                None,
            )
        }
        other => {
            return Err(GlasscutError::UnsupportedSampleFormat {
                format: format!("{:?}", other),
            })
        }
    }
    .map_err(|e| GlasscutError::AudioStream {
        reason: e.to_string(),
    })?;

    stream.play().map_err(|e| GlasscutError::AudioStream {
        reason: e.to_string(),
    })?;

    Ok((stream, sample_rate))
}
