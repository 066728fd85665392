//! Audio system managing synthesis and spectrum analysis.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use glicol::Engine;
use std::sync::{Arc, Mutex};
use std::thread;

use super::fft::spawn_fft_thread;
use super::synthesis::GLICOL_COMPOSITION;
use crate::params::{audio_constants::BLOCK_SIZE, SpectrumConfig};

/// Audio system managing synthesis and FFT analysis
///
/// The render loop treats the published magnitudes as a synchronous
/// snapshot, consumed once per frame.
pub struct AudioSystem {
    /// Latest raw spectrum magnitudes (thread-safe)
    magnitudes: Arc<Mutex<Vec<f32>>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    /// FFT analysis thread handle
    _fft_thread: thread::JoinHandle<()>,
}

impl AudioSystem {
    /// Create and start the audio system with the specified configuration
    pub fn new(config: SpectrumConfig) -> Result<Self, String> {
        config
            .validate()
            .map_err(|e| format!("Invalid spectrum config: {}", e))?;

        // Create Glicol engine
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(config.sample_rate_hz);
        engine.update_with_code(GLICOL_COMPOSITION);
        engine
            .update()
            .map_err(|e| format!("Glicol engine init failed: {:?}", e))?;

        // Shared state between audio callback and FFT thread
        let engine = Arc::new(Mutex::new(engine));
        let engine_clone = Arc::clone(&engine);

        let sample_buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let sample_buffer_clone = Arc::clone(&sample_buffer);

        let magnitudes = Arc::new(Mutex::new(vec![0.0; config.band_count()]));
        let magnitudes_fft = Arc::clone(&magnitudes);

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No audio output device found")?;

        let stream_config = device
            .default_output_config()
            .map_err(|e| format!("Failed to get audio config: {}", e))?;

        println!(
            "Audio: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            stream_config.sample_rate().0
        );

        // Build audio output stream
        let stream = device
            .build_output_stream(
                &stream_config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut engine = engine_clone.lock().unwrap();
                    let mut tap = sample_buffer_clone.lock().unwrap();

                    let frames_needed = data.len() / 2; // Stereo frames
                    let mut frame_idx = 0;

                    // Generate multiple blocks if needed to fill the buffer
                    while frame_idx < frames_needed {
                        let (buffers, _) = engine.next_block(vec![]);

                        let frames_to_copy = (frames_needed - frame_idx).min(BLOCK_SIZE);

                        for i in 0..frames_to_copy {
                            // Safety limiter: hard clip to ±0.5
                            let left = buffers[0][i].clamp(-0.5, 0.5);
                            let right = buffers[1][i].clamp(-0.5, 0.5);

                            let out_idx = (frame_idx + i) * 2;
                            data[out_idx] = left;
                            data[out_idx + 1] = right;

                            tap.push(left); // Accumulate for FFT analysis
                        }

                        frame_idx += frames_to_copy;
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| format!("Failed to build audio stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("Failed to start audio stream: {}", e))?;

        // Start FFT analysis thread
        let fft_thread = spawn_fft_thread(config, sample_buffer, magnitudes_fft);

        Ok(Self {
            magnitudes,
            _stream: stream,
            _fft_thread: fft_thread,
        })
    }

    /// Snapshot of the latest raw spectrum magnitudes (thread-safe)
    pub fn magnitudes(&self) -> Vec<f32> {
        self.magnitudes.lock().unwrap().clone()
    }
}
