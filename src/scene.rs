//! Frame geometry: CPU-built vertex lists for the current draw mode.
//!
//! The cloud, links and spectrum are turned into flat triangle/line vertex
//! lists here and uploaded by the renderer each frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::cloud::CloudSystem;
use crate::params::{DrawMode, RenderConfig};
use crate::spectrum::{remap, SpectrumBuffer};

/// Vertex data for scene geometry (centered pixel position + RGBA color)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Geometry for one frame, consumed by the renderer
#[derive(Default)]
pub struct FrameGeometry {
    /// Triangle-list vertices (particle dots, spectrum bars, cursor marker)
    pub triangles: Vec<Vertex>,

    /// Line-list vertices (two per proximity link)
    pub lines: Vec<Vertex>,

    /// Draw the gradient backdrop behind the geometry
    pub gradient_background: bool,
}

/// Build the frame's geometry for the selected draw mode
///
/// Coordinates are pixels with the origin at the window center, y up.
/// The cloud color cycles its hue with time; the cursor position sets
/// saturation (left to right) and brightness (bottom to top).
pub fn build_frame(
    mode: &DrawMode,
    cloud: &CloudSystem,
    spectrum: &SpectrumBuffer,
    cursor_px: Vec2,
    time_s: f32,
    window_size: (u32, u32),
    config: &RenderConfig,
) -> FrameGeometry {
    let width = window_size.0 as f32;
    let height = window_size.1 as f32;

    let hue = (time_s * config.hue_rate / 255.0).fract();
    let saturation = remap(cursor_px.x, 0.0, width, 0.0, 1.0, true);
    let brightness = remap(cursor_px.y, height, 0.0, 0.0, 1.0, true);
    let rgb = hsb_to_rgb(hue, saturation, brightness);
    let color = [rgb[0], rgb[1], rgb[2], 1.0];

    let mut frame = FrameGeometry::default();

    match mode {
        DrawMode::Composite {
            point_radius_px,
            cursor_radius_px,
        } => {
            frame.gradient_background = true;

            push_cloud_dots(
                &mut frame.triangles,
                cloud,
                *point_radius_px,
                config.circle_segments,
                color,
            );
            push_links(&mut frame.lines, cloud, color);

            let cursor_centered =
                Vec2::new(cursor_px.x - width / 2.0, height / 2.0 - cursor_px.y);
            push_circle(
                &mut frame.triangles,
                cursor_centered,
                *cursor_radius_px,
                config.circle_segments,
                color,
            );
        }

        DrawMode::Particles { point_radius_px } => {
            push_cloud_dots(
                &mut frame.triangles,
                cloud,
                *point_radius_px,
                config.circle_segments,
                color,
            );
        }

        DrawMode::Links => {
            push_links(&mut frame.lines, cloud, color);
        }

        DrawMode::Spectrum { bar_gain_px } => {
            push_spectrum_bars(&mut frame.triangles, spectrum, *bar_gain_px, width, height);
        }
    }

    frame
}

/// One dot per particle
fn push_cloud_dots(
    out: &mut Vec<Vertex>,
    cloud: &CloudSystem,
    radius_px: f32,
    segments: u32,
    color: [f32; 4],
) {
    for particle in cloud.particles() {
        push_circle(out, particle.position, radius_px, segments, color);
    }
}

/// Two line vertices per proximity link
fn push_links(out: &mut Vec<Vertex>, cloud: &CloudSystem, color: [f32; 4]) {
    for (a, b) in cloud.links() {
        out.push(Vertex {
            position: a.to_array(),
            color,
        });
        out.push(Vertex {
            position: b.to_array(),
            color,
        });
    }
}

/// Triangle-fan circle as a flat triangle list (3 vertices per segment)
fn push_circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, segments: u32, color: [f32; 4]) {
    let step = std::f32::consts::TAU / segments as f32;

    for s in 0..segments {
        let a0 = s as f32 * step;
        let a1 = (s + 1) as f32 * step;

        out.push(Vertex {
            position: center.to_array(),
            color,
        });
        out.push(Vertex {
            position: (center + radius * Vec2::new(a0.cos(), a0.sin())).to_array(),
            color,
        });
        out.push(Vertex {
            position: (center + radius * Vec2::new(a1.cos(), a1.sin())).to_array(),
            color,
        });
    }
}

/// One vertical bar per band, hue ramped across the spectrum
fn push_spectrum_bars(
    out: &mut Vec<Vertex>,
    spectrum: &SpectrumBuffer,
    gain_px: f32,
    width: f32,
    height: f32,
) {
    let bands = spectrum.bands();
    if bands.is_empty() {
        return;
    }

    let bar_width = width / bands.len() as f32;
    let floor_y = -height / 2.0;

    for (i, &magnitude) in bands.iter().enumerate() {
        let x0 = -width / 2.0 + i as f32 * bar_width;
        let x1 = x0 + bar_width;
        let y1 = floor_y + magnitude * gain_px;

        let rgb = hsb_to_rgb(i as f32 / bands.len() as f32, 0.8, 1.0);
        let color = [rgb[0], rgb[1], rgb[2], 1.0];

        // Two triangles per bar
        let quad = [
            [x0, floor_y],
            [x1, floor_y],
            [x1, y1],
            [x0, floor_y],
            [x1, y1],
            [x0, y1],
        ];
        for position in quad {
            out.push(Vertex { position, color });
        }
    }
}

/// Convert HSB (all channels 0-1, hue wrapping) to RGB
pub fn hsb_to_rgb(h: f32, s: f32, b: f32) -> [f32; 3] {
    let h = (h.fract() + 1.0).fract() * 6.0;
    let i = h.floor();
    let f = h - i;
    let p = b * (1.0 - s);
    let q = b * (1.0 - s * f);
    let t = b * (1.0 - s * (1.0 - f));

    match i as u32 % 6 {
        0 => [b, t, p],
        1 => [q, b, p],
        2 => [p, b, t],
        3 => [p, q, b],
        4 => [t, p, b],
        _ => [b, p, q],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CloudPhysics;
    use crate::spectrum::PEAK_HOLD_DECAY;

    fn test_cloud(count: usize) -> CloudSystem {
        CloudSystem::new(CloudPhysics {
            particle_count: count,
            ..CloudPhysics::default()
        })
    }

    #[test]
    fn test_hsb_anchor_colors() {
        // Hue 0, full saturation and brightness: pure red
        assert_eq!(hsb_to_rgb(0.0, 1.0, 1.0), [1.0, 0.0, 0.0]);

        // One third around the wheel: pure green
        let green = hsb_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!((green[0] - 0.0).abs() < 1e-5);
        assert!((green[1] - 1.0).abs() < 1e-5);

        // Zero saturation: gray at the brightness level
        assert_eq!(hsb_to_rgb(0.42, 0.0, 0.5), [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_circle_vertex_count() {
        let mut out = Vec::new();
        push_circle(&mut out, Vec2::ZERO, 2.0, 16, [1.0; 4]);
        assert_eq!(out.len(), 16 * 3);
    }

    #[test]
    fn test_particles_mode_geometry() {
        let cloud = test_cloud(5);
        let spectrum = SpectrumBuffer::new(256, PEAK_HOLD_DECAY);
        let config = RenderConfig::default();

        let mode = DrawMode::Particles {
            point_radius_px: 2.0,
        };
        let frame = build_frame(
            &mode,
            &cloud,
            &spectrum,
            Vec2::new(512.0, 384.0),
            0.0,
            (1024, 768),
            &config,
        );

        // One fan per particle, no links, no backdrop
        assert_eq!(
            frame.triangles.len(),
            5 * config.circle_segments as usize * 3
        );
        assert!(frame.lines.is_empty());
        assert!(!frame.gradient_background);
    }

    #[test]
    fn test_composite_mode_has_cursor_and_backdrop() {
        let cloud = test_cloud(3);
        let spectrum = SpectrumBuffer::new(256, PEAK_HOLD_DECAY);
        let config = RenderConfig::default();

        let mode = DrawMode::Composite {
            point_radius_px: 2.0,
            cursor_radius_px: 10.0,
        };
        let frame = build_frame(
            &mode,
            &cloud,
            &spectrum,
            Vec2::ZERO,
            1.5,
            (1024, 768),
            &config,
        );

        assert!(frame.gradient_background);

        // Three particle fans plus the cursor marker fan
        assert_eq!(
            frame.triangles.len(),
            4 * config.circle_segments as usize * 3
        );

        // Line vertices come in pairs
        assert_eq!(frame.lines.len() % 2, 0);
    }

    #[test]
    fn test_spectrum_mode_bar_count() {
        let cloud = test_cloud(1);
        let mut spectrum = SpectrumBuffer::new(64, PEAK_HOLD_DECAY);
        spectrum.update(&vec![1.0; 64]).unwrap();
        let config = RenderConfig::default();

        let mode = DrawMode::Spectrum { bar_gain_px: 100.0 };
        let frame = build_frame(
            &mode,
            &cloud,
            &spectrum,
            Vec2::ZERO,
            0.0,
            (1024, 768),
            &config,
        );

        // Six vertices per band, nothing else
        assert_eq!(frame.triangles.len(), 64 * 6);
        assert!(frame.lines.is_empty());
    }
}
