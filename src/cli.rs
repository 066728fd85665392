//! Command-line argument parsing.

use clap::Parser;

use crate::params::{DrawMode, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Sonaplex")]
#[command(about = "Audio-reactive particle constellation", long_about = None)]
pub struct Args {
    /// Draw mode: composite (default), particles, links, spectrum
    #[arg(long, value_name = "MODE", default_value = "composite")]
    pub mode: String,

    /// Settings file path (created with defaults if missing)
    #[arg(long, value_name = "FILE", default_value = "settings.toml")]
    pub settings: String,

    /// Override the particle count from the settings file
    #[arg(long, value_name = "COUNT")]
    pub particles: Option<usize>,

    /// Run without audio output (the spectrum stays silent)
    #[arg(long)]
    pub silent: bool,
}

impl Args {
    /// Parse the draw mode from command-line arguments
    pub fn parse_draw_mode(&self, config: &RenderConfig) -> DrawMode {
        match self.mode.to_lowercase().as_str() {
            "composite" => DrawMode::Composite {
                point_radius_px: config.point_radius_px,
                cursor_radius_px: config.cursor_radius_px,
            },
            "particles" => DrawMode::Particles {
                point_radius_px: config.point_radius_px,
            },
            "links" => DrawMode::Links,
            "spectrum" => DrawMode::Spectrum {
                bar_gain_px: config.spectrum_bar_gain_px,
            },
            other => {
                eprintln!("Warning: Unknown draw mode '{}', using composite", other);
                DrawMode::Composite {
                    point_radius_px: config.point_radius_px,
                    cursor_radius_px: config.cursor_radius_px,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draw_mode_variants() {
        let config = RenderConfig::default();

        let args = Args::parse_from(["sonaplex", "--mode", "links"]);
        assert_eq!(args.parse_draw_mode(&config), DrawMode::Links);

        let args = Args::parse_from(["sonaplex", "--mode", "Spectrum"]);
        assert!(matches!(
            args.parse_draw_mode(&config),
            DrawMode::Spectrum { .. }
        ));
    }

    #[test]
    fn test_unknown_mode_falls_back_to_composite() {
        let config = RenderConfig::default();
        let args = Args::parse_from(["sonaplex", "--mode", "vortex"]);
        assert!(matches!(
            args.parse_draw_mode(&config),
            DrawMode::Composite { .. }
        ));
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["sonaplex"]);
        assert_eq!(args.mode, "composite");
        assert_eq!(args.settings, "settings.toml");
        assert!(!args.silent);
        assert!(args.particles.is_none());
    }
}
