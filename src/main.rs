//! Sonaplex - an audio-reactive particle constellation
//!
//! A procedural soundtrack is analyzed into a 256-band spectrum; a peak-hold
//! smoother derives the cloud's radius and drift velocity, and particles
//! wander a coherent-noise field, linked by lines when they come close.

use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use clap::Parser;
use glam::Vec2;

use sonaplex::audio::AudioSystem;
use sonaplex::cli::Args;
use sonaplex::cloud::CloudSystem;
use sonaplex::params::{DrawMode, RenderConfig, SpectrumConfig, SpectrumMapping};
use sonaplex::rendering::RenderSystem;
use sonaplex::scene;
use sonaplex::settings::Settings;
use sonaplex::spectrum::SpectrumBuffer;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation state
    cloud: CloudSystem,
    spectrum: SpectrumBuffer,
    audio: Option<AudioSystem>,

    // Configuration
    spectrum_config: SpectrumConfig,
    mapping: SpectrumMapping,
    render_config: RenderConfig,
    mode: DrawMode,
    silent: bool,

    // Input state (window pixels, origin top-left)
    cursor_px: Vec2,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(args: &Args) -> Result<Self, String> {
        let settings = Settings::load_or_create(&args.settings)?;
        println!("Settings: {}", args.settings);

        let spectrum_config = SpectrumConfig::default();
        spectrum_config.validate()?;

        let mapping = settings.mapping();
        mapping.validate(spectrum_config.band_count())?;

        let mut physics = settings.cloud_physics();
        if let Some(count) = args.particles {
            physics.particle_count = count;
        }
        println!("Cloud: {} particles", physics.particle_count);

        let render_config = settings.render_config();
        let mode = args.parse_draw_mode(&render_config);
        println!("Mode: {}", mode.label());

        let cloud = CloudSystem::new(physics);
        let spectrum = SpectrumBuffer::new(spectrum_config.band_count(), settings.spectrum_decay);

        // Cursor starts at the window center: mid saturation and brightness
        let cursor_px = Vec2::new(
            render_config.window_width as f32 / 2.0,
            render_config.window_height as f32 / 2.0,
        );

        Ok(Self {
            window: None,
            render_system: None,
            cloud,
            spectrum,
            audio: None,
            spectrum_config,
            mapping,
            render_config,
            mode,
            silent: args.silent,
            cursor_px,
            start_time: Instant::now(),
        })
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Sonaplex - Audio-Reactive Constellation")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        // Initialize rendering system
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.render_config,
        ))
        .expect("Failed to initialize rendering");

        // Initialize audio system; the cloud idles at the velocity floor
        // when there is no spectrum to react to
        let audio = if self.silent {
            println!("Audio: disabled (--silent)");
            None
        } else {
            match AudioSystem::new(self.spectrum_config.clone()) {
                Ok(audio) => Some(audio),
                Err(e) => {
                    eprintln!("Audio disabled: {}", e);
                    None
                }
            }
        };

        println!("\nSonaplex is running!");
        println!("1-4 draw modes, F fullscreen, R reset, ESC to quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.audio = audio;
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => self.handle_key(code, event_loop),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_px = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    /// Keyboard bindings: digits select the draw mode, F toggles fullscreen,
    /// R restores the seeded cloud and clears the smoothed spectrum
    fn handle_key(&mut self, code: KeyCode, event_loop: &ActiveEventLoop) {
        match code {
            KeyCode::Escape => event_loop.exit(),

            KeyCode::Digit1 => self.set_mode(DrawMode::Composite {
                point_radius_px: self.render_config.point_radius_px,
                cursor_radius_px: self.render_config.cursor_radius_px,
            }),
            KeyCode::Digit2 => self.set_mode(DrawMode::Particles {
                point_radius_px: self.render_config.point_radius_px,
            }),
            KeyCode::Digit3 => self.set_mode(DrawMode::Links),
            KeyCode::Digit4 => self.set_mode(DrawMode::Spectrum {
                bar_gain_px: self.render_config.spectrum_bar_gain_px,
            }),

            KeyCode::KeyF => self.toggle_fullscreen(),

            KeyCode::KeyR => {
                self.cloud.reset();
                self.spectrum.reset();
                println!("Reset");
            }

            _ => {}
        }
    }

    fn set_mode(&mut self, mode: DrawMode) {
        if mode != self.mode {
            println!("Mode: {}", mode.label());
            self.mode = mode;
        }
    }

    fn toggle_fullscreen(&self) {
        if let Some(window) = &self.window {
            if window.fullscreen().is_some() {
                window.set_fullscreen(None);
            } else {
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }

    /// Run one update + draw: spectrum snapshot → modulation → cloud → scene
    fn render_frame(&mut self) {
        let Some(ref window) = self.window else {
            return;
        };

        let time_s = self.start_time.elapsed().as_secs_f32();

        // Fold the analyzer's latest snapshot into the peak-hold buffer
        if let Some(ref audio) = self.audio {
            let raw = audio.magnitudes();
            if let Err(e) = self.spectrum.update(&raw) {
                eprintln!("Spectrum error: {}", e);
            }
        }

        // Derive the frame's modulation, then advance the cloud
        let modulation = self.spectrum.modulation(&self.mapping);
        if let Err(e) = self.cloud.update(time_s, &modulation) {
            eprintln!("Cloud error: {}", e);
            return;
        }

        let size = window.inner_size();
        let frame = scene::build_frame(
            &self.mode,
            &self.cloud,
            &self.spectrum,
            self.cursor_px,
            time_s,
            (size.width, size.height),
            &self.render_config,
        );

        let Some(ref mut render_system) = self.render_system else {
            return;
        };
        match render_system.render(&frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.resize(size.width, size.height);
            }
            Err(e) => eprintln!("Render error: {:?}", e),
        }
    }
}

fn main() {
    let args = Args::parse();

    println!("Sonaplex - audio-reactive particle constellation");
    println!("Initializing systems...\n");

    let mut app = match App::new(&args) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
