//! Persisted tunable parameters.
//!
//! The installation keeps its tunables in a TOML settings file next to the
//! binary. On first launch the file is written with defaults and then loaded,
//! so there is always a template on disk to edit between runs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::params::{CloudPhysics, RenderConfig, SpectrumMapping};
use crate::spectrum::PEAK_HOLD_DECAY;

/// Runtime-tunable parameters persisted to the settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Peak-hold decay factor applied to every band per tick
    pub spectrum_decay: f32,

    /// Band index driving the cloud radius
    pub radius_band: usize,

    /// Band index driving the phase advance rate
    pub velocity_band: usize,

    /// Input/output ranges for the radius remap (clamped)
    pub radius_in: (f32, f32),
    pub radius_out: (f32, f32),

    /// Input/output ranges for the velocity remap (extrapolating)
    pub velocity_in: (f32, f32),
    pub velocity_out: (f32, f32),

    /// Number of particles in the cloud
    pub particle_count: usize,

    /// Distance below which two particles are linked (world units)
    pub link_distance: f32,

    /// Radius of each particle dot (pixels)
    pub point_radius_px: f32,

    /// Hue cycling rate (hue units of a 0-255 wheel per second)
    pub hue_rate: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let mapping = SpectrumMapping::default();
        let physics = CloudPhysics::default();
        let render = RenderConfig::default();

        Self {
            spectrum_decay: PEAK_HOLD_DECAY,
            radius_band: mapping.radius_band,
            velocity_band: mapping.velocity_band,
            radius_in: mapping.radius_in,
            radius_out: mapping.radius_out,
            velocity_in: mapping.velocity_in,
            velocity_out: mapping.velocity_out,
            particle_count: physics.particle_count,
            link_distance: physics.link_distance,
            point_radius_px: render.point_radius_px,
            hue_rate: render.hue_rate,
        }
    }
}

impl Settings {
    /// Load the settings file, writing defaults first if it does not exist
    ///
    /// A malformed file is an error, not a silent fallback to defaults.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();

        if !path.exists() {
            let defaults = toml::to_string_pretty(&Self::default())
                .map_err(|e| format!("Failed to serialize default settings: {}", e))?;
            fs::write(path, defaults)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        }

        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        toml::from_str(&text).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    /// Cloud physics with this file's tunables applied
    pub fn cloud_physics(&self) -> CloudPhysics {
        CloudPhysics {
            particle_count: self.particle_count,
            link_distance: self.link_distance,
            ..CloudPhysics::default()
        }
    }

    /// Spectrum-to-parameter mapping with this file's tunables applied
    pub fn mapping(&self) -> SpectrumMapping {
        SpectrumMapping {
            radius_band: self.radius_band,
            velocity_band: self.velocity_band,
            radius_in: self.radius_in,
            radius_out: self.radius_out,
            velocity_in: self.velocity_in,
            velocity_out: self.velocity_out,
        }
    }

    /// Render configuration with this file's tunables applied
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            point_radius_px: self.point_radius_px,
            hue_rate: self.hue_rate,
            ..RenderConfig::default()
        }
    }
}
