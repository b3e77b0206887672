//! Spectrum analysis thread.
//!
//! Drains the playback tap on a fixed cadence, runs a Hann-windowed FFT,
//! and publishes an RMS level plus per-band mean magnitudes scaled onto
//! the 8-bit energy range.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;
use std::ops::Range;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::RawReading;
use crate::params::AnalyzerConfig;

/// Spawn the analysis thread over a shared sample tap
pub(crate) fn spawn_analysis_thread(
    config: AnalyzerConfig,
    tap: Arc<Mutex<Vec<f32>>>,
    reading: Arc<Mutex<RawReading>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let mut spectrum = vec![Complex::new(0.0, 0.0); config.fft_size];

        loop {
            thread::sleep(Duration::from_millis(config.update_interval_ms));

            let mut tap = tap.lock().unwrap();

            // Bound the backlog so readings track the present; playback
            // pushes faster than one window per tick drains.
            let cap = config.fft_size * 2;
            if tap.len() > cap {
                let excess = tap.len() - cap;
                tap.drain(0..excess);
            }

            if tap.len() < config.fft_size {
                continue;
            }

            let level = rms(&tap[..config.fft_size]);

            for i in 0..config.fft_size {
                let window = hann_window(i, config.fft_size);
                spectrum[i] = Complex::new(tap[i] * window, 0.0);
            }
            fft.process(&mut spectrum);

            // 50% overlap between consecutive windows
            tap.drain(0..config.fft_size / 2);
            drop(tap);

            let low = band_mean(&spectrum, config.low_bins());
            let mid = band_mean(&spectrum, config.mid_bins());
            let high = band_mean(&spectrum, config.high_bins());

            *reading.lock().unwrap() = RawReading {
                level,
                bands: [
                    (low * config.band_scale).min(255.0),
                    (mid * config.band_scale).min(255.0),
                    (high * config.band_scale).min(255.0),
                ],
            };
        }
    })
}

/// Mean magnitude over a bin range
fn band_mean(spectrum: &[Complex<f32>], bins: Range<usize>) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let len = bins.len() as f32;
    spectrum[bins].iter().map(|c| c.norm()).sum::<f32>() / len
}

/// Root-mean-square amplitude of a sample window
fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Hann window function
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
