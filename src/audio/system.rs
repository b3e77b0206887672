//! Audio playback and analysis system.
//!
//! Plays the WAV asset through the default output device with linear
//! resampling and loop playback, while tapping the output into the
//! analysis thread. The stream starts paused; playback is driven by the
//! session's begin/restart interactions.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::info;

use super::analysis::spawn_analysis_thread;
use super::wav::WavAudio;
use super::{RawReading, SpectrumSource};
use crate::error::{TremoloError, TremoloResult};
use crate::params::AnalyzerConfig;

/// Audio system: WAV playback, output gain, and spectrum readings
pub struct AudioSystem {
    /// Latest analyzer snapshot (shared with the analysis thread)
    reading: Arc<Mutex<RawReading>>,

    /// Output gain applied in the audio callback (fade-in volume)
    gain: Arc<Mutex<f32>>,

    /// Playback position in asset frames (fractional for resampling)
    cursor: Arc<Mutex<f64>>,

    /// Mono tap feeding the analysis thread
    tap: Arc<Mutex<Vec<f32>>>,

    /// Audio output stream (kept alive, paused until begin)
    stream: cpal::Stream,

    /// Analysis thread handle
    _analysis_thread: thread::JoinHandle<()>,
}

impl AudioSystem {
    /// Load the WAV asset and build the output stream, paused
    pub fn new(path: &Path, mut analyzer: AnalyzerConfig) -> TremoloResult<Self> {
        analyzer.validate()?;

        let asset = WavAudio::load(path)?;
        info!(
            "Loaded audio {:?}: {} ch, {} Hz, {} frames",
            path,
            asset.channels,
            asset.sample_rate,
            asset.frame_count()
        );

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| TremoloError::audio("no audio output device found"))?;
        let config = device
            .default_output_config()
            .map_err(|e| TremoloError::audio(format!("query output config: {}", e)))?;

        let device_rate = config.sample_rate().0;
        let out_channels = config.channels() as usize;
        info!(
            "Audio output: {} at {} Hz, {} channels",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            device_rate,
            out_channels
        );

        let tap = Arc::new(Mutex::new(Vec::<f32>::new()));
        let tap_cb = Arc::clone(&tap);

        let gain = Arc::new(Mutex::new(0.0f32));
        let gain_cb = Arc::clone(&gain);

        let cursor = Arc::new(Mutex::new(0.0f64));
        let cursor_cb = Arc::clone(&cursor);

        // Resampling step: asset frames advanced per device frame
        let step = asset.sample_rate as f64 / device_rate as f64;
        let total_frames = asset.frame_count() as f64;

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let gain = *gain_cb.lock().unwrap();
                    let mut pos = cursor_cb.lock().unwrap();
                    let mut tap = tap_cb.lock().unwrap();

                    for frame in data.chunks_mut(out_channels) {
                        let left = asset.sample_at(*pos, 0) * gain;
                        let right = asset.sample_at(*pos, 1) * gain;

                        frame[0] = left;
                        if frame.len() > 1 {
                            frame[1] = right;
                        }
                        for extra in frame.iter_mut().skip(2) {
                            *extra = 0.0;
                        }

                        tap.push((left + right) * 0.5);

                        *pos += step;
                        if *pos >= total_frames {
                            *pos -= total_frames; // loop
                        }
                    }
                },
                |err| tracing::error!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| TremoloError::audio(format!("build output stream: {}", e)))?;

        stream
            .pause()
            .map_err(|e| TremoloError::audio(format!("pause stream: {}", e)))?;

        // The analyzer bins are computed against the rate actually flowing
        // through the tap.
        analyzer.sample_rate_hz = device_rate as usize;

        let reading = Arc::new(Mutex::new(RawReading::default()));
        let analysis_thread = spawn_analysis_thread(analyzer, Arc::clone(&tap), Arc::clone(&reading));

        Ok(Self {
            reading,
            gain,
            cursor,
            tap,
            stream,
            _analysis_thread: analysis_thread,
        })
    }

    /// Begin or resume playback
    pub fn play(&self) -> TremoloResult<()> {
        self.stream
            .play()
            .map_err(|e| TremoloError::audio(format!("start stream: {}", e)))
    }

    /// Pause playback; the asset and analysis thread stay alive
    pub fn pause(&self) -> TremoloResult<()> {
        self.stream
            .pause()
            .map_err(|e| TremoloError::audio(format!("pause stream: {}", e)))
    }

    /// Seek to the start of the asset and drop pending analysis input
    pub fn rewind(&self) {
        *self.cursor.lock().unwrap() = 0.0;
        self.tap.lock().unwrap().clear();
        *self.reading.lock().unwrap() = RawReading::default();
    }

    /// Set output gain (clamped to 0-1)
    pub fn set_gain(&self, gain: f32) {
        *self.gain.lock().unwrap() = gain.clamp(0.0, 1.0);
    }
}

impl SpectrumSource for AudioSystem {
    fn reading(&self) -> RawReading {
        *self.reading.lock().unwrap()
    }
}
