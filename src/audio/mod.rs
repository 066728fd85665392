//! Audio synthesis and spectrum analysis.
//!
//! A Glicol composition is rendered through cpal; the output samples are
//! tapped into an FFT thread that publishes raw per-band magnitudes for the
//! render loop to consume once per frame.

mod fft;
mod synthesis;
mod system;

pub use system::AudioSystem;
