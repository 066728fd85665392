//! Smoothed spectrum buffer and spectrum-to-parameter mapping.
//!
//! The analyzer's raw magnitudes are folded into a peak-hold buffer that
//! rises instantly to new peaks and decays slowly between them; two chosen
//! bands are then remapped into the cloud's radius and velocity scalars.

use crate::params::SpectrumMapping;

/// Decay factor applied to every band before the new sample is folded in
pub const PEAK_HOLD_DECAY: f32 = 0.97;

/// Linear range remap, optionally clamped to the output range
///
/// A zero-width input range yields `out_min` instead of dividing by zero.
/// Without clamping the output extrapolates linearly past the output range.
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32, clamp: bool) -> f32 {
    if in_min == in_max {
        return out_min;
    }

    let t = (value - in_min) / (in_max - in_min);
    let out = out_min + t * (out_max - out_min);

    if clamp {
        out.clamp(out_min.min(out_max), out_min.max(out_max))
    } else {
        out
    }
}

/// Global modulation scalars shared by every particle during its update
#[derive(Clone, Copy, Debug)]
pub struct Modulation {
    /// Cloud radius (world units)
    pub radius: f32,

    /// Phase advance rate (noise units per second)
    pub velocity: f32,
}

/// Peak-hold smoothed spectrum
///
/// Fixed band count for the buffer's lifetime; bands never reorder and,
/// starting from zero, never go negative.
pub struct SpectrumBuffer {
    bands: Vec<f32>,
    decay: f32,
}

impl SpectrumBuffer {
    /// Create a buffer of `band_count` zeroed bands with the given decay
    pub fn new(band_count: usize, decay: f32) -> Self {
        Self {
            bands: vec![0.0; band_count],
            decay,
        }
    }

    /// Number of bands
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Smoothed band magnitudes, lowest frequency first
    pub fn bands(&self) -> &[f32] {
        &self.bands
    }

    /// Fold one raw magnitude vector into the buffer
    ///
    /// Every band decays then takes the max of itself and the new sample.
    /// A raw vector of the wrong length is rejected before any band mutates.
    pub fn update(&mut self, raw: &[f32]) -> Result<(), String> {
        if raw.len() != self.bands.len() {
            return Err(format!(
                "spectrum length mismatch: expected {} bands, got {}",
                self.bands.len(),
                raw.len()
            ));
        }

        for (band, &sample) in self.bands.iter_mut().zip(raw) {
            *band = (*band * self.decay).max(sample);
        }

        Ok(())
    }

    /// Derive the cloud's modulation scalars from two mapped bands
    ///
    /// Radius is clamped to its output range; velocity extrapolates.
    /// Always produces finite scalars for finite band values.
    pub fn modulation(&self, mapping: &SpectrumMapping) -> Modulation {
        let radius = remap(
            self.band(mapping.radius_band),
            mapping.radius_in.0,
            mapping.radius_in.1,
            mapping.radius_out.0,
            mapping.radius_out.1,
            true,
        );

        let velocity = remap(
            self.band(mapping.velocity_band),
            mapping.velocity_in.0,
            mapping.velocity_in.1,
            mapping.velocity_out.0,
            mapping.velocity_out.1,
            false,
        );

        Modulation { radius, velocity }
    }

    /// Zero every band (used when the installation is reset)
    pub fn reset(&mut self) {
        self.bands.fill(0.0);
    }

    fn band(&self, index: usize) -> f32 {
        self.bands.get(index).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_hold_rises_to_new_peaks() {
        let mut buffer = SpectrumBuffer::new(4, PEAK_HOLD_DECAY);
        buffer.update(&[0.5, 1.0, 0.0, 2.0]).unwrap();

        // A fresh buffer takes the raw values directly
        assert_eq!(buffer.bands(), &[0.5, 1.0, 0.0, 2.0]);

        // A louder sample replaces the decayed value instantly
        buffer.update(&[3.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(buffer.bands()[0], 3.0);
    }

    #[test]
    fn test_peak_hold_lower_bounds() {
        let mut buffer = SpectrumBuffer::new(3, PEAK_HOLD_DECAY);
        buffer.update(&[1.0, 2.0, 0.5]).unwrap();

        let previous: Vec<f32> = buffer.bands().to_vec();
        let raw = [0.9, 2.1, 0.0];
        buffer.update(&raw).unwrap();

        // Each band is at least the decayed previous value and the new sample
        for i in 0..3 {
            assert!(buffer.bands()[i] >= previous[i] * PEAK_HOLD_DECAY);
            assert!(buffer.bands()[i] >= raw[i]);
        }
    }

    #[test]
    fn test_silence_decays_geometrically() {
        let mut buffer = SpectrumBuffer::new(2, PEAK_HOLD_DECAY);
        buffer.update(&[1.0, 0.25]).unwrap();

        let silence = [0.0, 0.0];
        for tick in 1..=10 {
            buffer.update(&silence).unwrap();
            let expected = PEAK_HOLD_DECAY.powi(tick);
            assert!((buffer.bands()[0] - expected).abs() < 1e-5);
            assert!(buffer.bands()[0] >= 0.0);
            assert!(buffer.bands()[1] >= 0.0);
        }
    }

    #[test]
    fn test_update_rejects_wrong_length() {
        let mut buffer = SpectrumBuffer::new(4, PEAK_HOLD_DECAY);
        buffer.update(&[1.0, 1.0, 1.0, 1.0]).unwrap();

        let err = buffer.update(&[1.0, 2.0]).unwrap_err();
        assert!(err.contains("length mismatch"));

        // No partial update happened
        assert_eq!(buffer.bands(), &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_remap_is_linear_and_monotonic() {
        // Midpoint maps to midpoint
        assert_eq!(remap(2.0, 1.0, 3.0, 400.0, 800.0, true), 600.0);

        // Monotonic over the input range
        let a = remap(1.2, 1.0, 3.0, 400.0, 800.0, false);
        let b = remap(1.8, 1.0, 3.0, 400.0, 800.0, false);
        assert!(a < b);
    }

    #[test]
    fn test_remap_clamping() {
        // Clamped output pins to the range ends
        assert_eq!(remap(0.0, 1.0, 3.0, 400.0, 800.0, true), 400.0);
        assert_eq!(remap(10.0, 1.0, 3.0, 400.0, 800.0, true), 800.0);

        // Unclamped output extrapolates linearly
        assert!((remap(0.2, 0.0, 0.1, 0.05, 0.5, false) - 0.95).abs() < 1e-6);
        assert!(remap(-0.1, 0.0, 0.1, 0.05, 0.5, false) < 0.05);
    }

    #[test]
    fn test_remap_zero_width_input_range() {
        // Degenerate input range yields out_min rather than NaN
        assert_eq!(remap(5.0, 2.0, 2.0, 100.0, 200.0, true), 100.0);
        assert_eq!(remap(5.0, 2.0, 2.0, 100.0, 200.0, false), 100.0);
    }

    #[test]
    fn test_modulation_from_default_mapping() {
        let mapping = SpectrumMapping::default();
        let mut buffer = SpectrumBuffer::new(256, PEAK_HOLD_DECAY);

        let mut raw = vec![0.0; 256];
        raw[mapping.radius_band] = 2.0; // midpoint of the 1-3 input range
        raw[mapping.velocity_band] = 0.05; // midpoint of the 0-0.1 input range
        buffer.update(&raw).unwrap();

        let modulation = buffer.modulation(&mapping);
        assert!((modulation.radius - 600.0).abs() < 1e-3);
        assert!((modulation.velocity - 0.275).abs() < 1e-5);
    }

    #[test]
    fn test_modulation_radius_clamped_on_silence() {
        let mapping = SpectrumMapping::default();
        let buffer = SpectrumBuffer::new(256, PEAK_HOLD_DECAY);

        // Silent spectrum: radius pins to its floor, velocity sits at its floor
        let modulation = buffer.modulation(&mapping);
        assert_eq!(modulation.radius, 400.0);
        assert!((modulation.velocity - 0.05).abs() < 1e-6);
    }
}
