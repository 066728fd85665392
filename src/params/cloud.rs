//! Particle cloud physics and spectrum-to-parameter mapping.

/// Particle cloud simulation parameters
#[derive(Debug, Clone)]
pub struct CloudPhysics {
    /// Number of particles (fixed for the cloud's lifetime)
    pub particle_count: usize,

    /// Initial noise-phase offsets are drawn uniformly from [0, this)
    pub phase_range: f32,

    /// Maximum simulation step (seconds); a stalled frame is capped to this
    /// so particles stay continuous in time
    pub max_step_s: f32,

    /// Distance (world units) below which two particles are linked
    pub link_distance: f32,

    /// Perlin noise seed
    pub noise_seed: u32,

    /// RNG seed for the initial phase offsets (same seed → same motion)
    pub phase_seed: u64,
}

impl Default for CloudPhysics {
    fn default() -> Self {
        Self {
            particle_count: 300,
            phase_range: 1000.0,
            max_step_s: 0.1,
            link_distance: 80.0,
            noise_seed: 42,
            phase_seed: 42,
        }
    }
}

/// Mapping from smoothed spectrum bands to the cloud's modulation scalars
///
/// Radius reads a bass band and is clamped to its output range; velocity
/// reads a treble band and extrapolates past its output range on loud peaks.
#[derive(Debug, Clone)]
pub struct SpectrumMapping {
    /// Band index driving the cloud radius
    pub radius_band: usize,

    /// Band index driving the phase advance rate
    pub velocity_band: usize,

    /// Input magnitude range for the radius remap
    pub radius_in: (f32, f32),

    /// Output radius range (world units); clamped
    pub radius_out: (f32, f32),

    /// Input magnitude range for the velocity remap
    pub velocity_in: (f32, f32),

    /// Output phase-advance range (noise units per second); unclamped
    pub velocity_out: (f32, f32),
}

impl Default for SpectrumMapping {
    fn default() -> Self {
        Self {
            radius_band: 2,
            velocity_band: 100,
            radius_in: (1.0, 3.0),
            radius_out: (400.0, 800.0),
            velocity_in: (0.0, 0.1),
            velocity_out: (0.05, 0.5),
        }
    }
}

impl SpectrumMapping {
    /// Validate band indices against the analyzer's band count
    pub fn validate(&self, band_count: usize) -> Result<(), String> {
        if self.radius_band >= band_count {
            return Err(format!(
                "radius band {} out of range (spectrum has {} bands)",
                self.radius_band, band_count
            ));
        }
        if self.velocity_band >= band_count {
            return Err(format!(
                "velocity band {} out of range (spectrum has {} bands)",
                self.velocity_band, band_count
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_band_validation() {
        let mapping = SpectrumMapping::default();

        // Default bands 2 and 100 fit a 256-band spectrum
        assert!(mapping.validate(256).is_ok());

        // A 64-band spectrum has no band 100
        assert!(mapping.validate(64).is_err());
    }
}
