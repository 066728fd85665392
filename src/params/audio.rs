//! Audio analysis configuration and constants.

/// FFT analysis configuration producing the raw per-band spectrum
#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: usize,

    /// FFT window size (must be a power of 2)
    /// 512 samples yield 256 usable bands below Nyquist
    pub fft_size: usize,

    /// Analysis interval (milliseconds)
    /// 16ms keeps the spectrum fresher than the display refresh
    pub update_interval_ms: u64,

    /// Linear gain applied to normalized bin magnitudes
    /// Tuned so sustained bass lands in the 1-3 range the radius mapping reads
    pub magnitude_gain: f32,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 512,
            update_interval_ms: 16,
            magnitude_gain: 30.0,
        }
    }
}

impl SpectrumConfig {
    /// Number of spectrum bands the analysis produces (bins below Nyquist)
    pub fn band_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        if self.fft_size < 2 {
            return Err(format!("FFT size must be at least 2, got {}", self.fft_size));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    pub const BLOCK_SIZE: usize = 128;
}
