//! WAV asset decoding.

use std::path::Path;

use crate::error::{TremoloError, TremoloResult};

/// Decoded WAV asset: interleaved f32 samples in ±1
pub struct WavAudio {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl WavAudio {
    /// Decode a WAV file, normalizing integer sample formats to f32
    pub fn load(path: &Path) -> TremoloResult<Self> {
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| TremoloError::audio(format!("open {}: {}", path.display(), e)))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| TremoloError::audio(format!("decode {}: {}", path.display(), e)))?,
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| TremoloError::audio(format!("decode {}: {}", path.display(), e)))?
            }
        };

        if samples.is_empty() || spec.channels == 0 {
            return Err(TremoloError::audio(format!(
                "{} contains no samples",
                path.display()
            )));
        }

        Ok(Self {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }

    /// Number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Sample one channel at a fractional frame position with linear
    /// interpolation, wrapping past the end (loop playback).
    /// Channels beyond the asset's count fold onto the last channel.
    pub fn sample_at(&self, frame_pos: f64, channel: u16) -> f32 {
        let frames = self.frame_count();
        if frames == 0 {
            return 0.0;
        }

        let i0 = (frame_pos as usize) % frames;
        let i1 = (i0 + 1) % frames;
        let frac = (frame_pos - frame_pos.floor()) as f32;
        let ch = channel.min(self.channels - 1) as usize;
        let stride = self.channels as usize;

        let s0 = self.samples[i0 * stride + ch];
        let s1 = self.samples[i1 * stride + ch];
        s0 + (s1 - s0) * frac
    }
}
