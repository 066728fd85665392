//! FFT analysis thread publishing raw spectrum magnitudes.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::params::SpectrumConfig;

/// Spawn the FFT analysis thread
///
/// Consumes samples accumulated by the audio callback and publishes a
/// magnitude vector of `config.band_count()` entries once per interval.
pub fn spawn_fft_thread(
    config: SpectrumConfig,
    sample_buffer: Arc<Mutex<Vec<f32>>>,
    magnitudes: Arc<Mutex<Vec<f32>>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);

        loop {
            thread::sleep(Duration::from_millis(config.update_interval_ms));

            let window: Vec<f32> = {
                let mut samples = sample_buffer.lock().unwrap();

                if samples.len() < config.fft_size {
                    continue;
                }

                let window = samples[..config.fft_size].to_vec();

                // 50% overlap between consecutive windows
                samples.drain(0..config.fft_size / 2);

                // The callback produces samples faster than one half-window
                // per interval; dropping the backlog keeps analysis latency
                // bounded instead of drifting behind the audible output.
                let excess = samples.len().saturating_sub(config.fft_size * 4);
                if excess > 0 {
                    samples.drain(0..excess);
                }

                window
            };

            let bands = analyze_window(fft.as_ref(), &window, &config);
            *magnitudes.lock().unwrap() = bands;
        }
    })
}

/// Windowed FFT of one sample block into per-band magnitudes
///
/// `samples` must hold at least `config.fft_size` entries; only the first
/// window is analyzed. Output magnitudes are one-sided normalized then
/// scaled by the configured gain.
fn analyze_window(fft: &dyn Fft<f32>, samples: &[f32], config: &SpectrumConfig) -> Vec<f32> {
    let size = config.fft_size;
    let scale = config.magnitude_gain * 2.0 / size as f32;

    let mut bins: Vec<Complex<f32>> = (0..size)
        .map(|i| Complex::new(samples[i] * hann_window(i, size), 0.0))
        .collect();

    fft.process(&mut bins);

    bins[..config.band_count()]
        .iter()
        .map(|c| c.norm() * scale)
        .collect()
}

/// Hann window function for FFT analysis
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let size = 512;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_analyze_window_peaks_at_tone_band() {
        let config = SpectrumConfig::default();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);

        // Pure tone centered on band 8
        let tone_hz = 8.0 * config.sample_rate_hz as f32 / config.fft_size as f32;
        let samples: Vec<f32> = (0..config.fft_size)
            .map(|i| {
                let t = i as f32 / config.sample_rate_hz as f32;
                (2.0 * PI * tone_hz * t).sin()
            })
            .collect();

        let bands = analyze_window(fft.as_ref(), &samples, &config);
        assert_eq!(bands.len(), config.band_count());

        let peak = bands
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 8);

        // All magnitudes are non-negative
        assert!(bands.iter().all(|&m| m >= 0.0));
    }
}
