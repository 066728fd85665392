//! Rendering configuration and draw-mode selection.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Radius of each particle dot (pixels)
    pub point_radius_px: f32,

    /// Radius of the cursor marker (pixels)
    pub cursor_radius_px: f32,

    /// Triangle-fan segments per circle
    pub circle_segments: u32,

    /// Hue cycling rate (hue units of a 0-255 wheel per second)
    pub hue_rate: f32,

    /// Background gradient top color (linear RGB, 0-1)
    pub background_top: [f32; 3],

    /// Background gradient bottom color (linear RGB, 0-1)
    pub background_bottom: [f32; 3],

    /// Spectrum mode: bar height per unit magnitude (pixels)
    pub spectrum_bar_gain_px: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1024,
            window_height: 768,
            point_radius_px: 2.0,
            cursor_radius_px: 10.0,
            circle_segments: 16,
            hue_rate: 10.0,
            // Misty rose over pink, the installation's backdrop
            background_top: [1.0, 0.894, 0.882],
            background_bottom: [1.0, 0.753, 0.796],
            spectrum_bar_gain_px: 120.0,
        }
    }
}

/// Draw mode: which visualization path renders the current frame
///
/// Each variant carries exactly the data its rendering path needs and is
/// dispatched by pattern matching when the frame geometry is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMode {
    /// Background gradient + particle dots + proximity links + cursor marker
    Composite {
        point_radius_px: f32,
        cursor_radius_px: f32,
    },

    /// Particle dots only, on black
    Particles { point_radius_px: f32 },

    /// Proximity links only, on black
    Links,

    /// Smoothed spectrum as vertical bars
    Spectrum { bar_gain_px: f32 },
}

impl DrawMode {
    /// Short label shown when the mode changes
    pub fn label(&self) -> &'static str {
        match self {
            DrawMode::Composite { .. } => "Composite (1)",
            DrawMode::Particles { .. } => "Particles (2)",
            DrawMode::Links => "Links (3)",
            DrawMode::Spectrum { .. } => "Spectrum (4)",
        }
    }
}
