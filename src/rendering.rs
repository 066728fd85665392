//! Rendering system with wgpu pipelines and per-frame geometry upload.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::params::RenderConfig;
use crate::scene::{FrameGeometry, Vertex};

/// Uniform buffer for the scene shader (orthographic view-projection)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

/// Uniform buffer for the background gradient shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct BackgroundUniforms {
    top_color: [f32; 4],
    bottom_color: [f32; 4],
}

/// Rendering system managing wgpu device, pipelines, and buffers
///
/// Triangle and line vertices are rebuilt on the CPU every frame and
/// uploaded into grow-on-demand vertex buffers.
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    background_pipeline: wgpu::RenderPipeline,
    triangle_buffer: wgpu::Buffer,
    triangle_capacity: usize,
    line_buffer: wgpu::Buffer,
    line_capacity: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    background_bind_group: wgpu::BindGroup,
}

/// Initial vertex-buffer capacity (vertices); buffers double as needed
const INITIAL_VERTEX_CAPACITY: usize = 16 * 1024;

impl RenderSystem {
    /// Create new rendering system for the given window
    pub async fn new(
        window: std::sync::Arc<winit::window::Window>,
        config: &RenderConfig,
    ) -> Result<Self, String> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .map_err(|e| format!("Failed to create surface: {}", e))?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or("Failed to find suitable GPU adapter")?;

        // Request device
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| format!("Failed to request device: {}", e))?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        // Load shaders
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("background.wgsl").into()),
        });

        // Scene uniforms: orthographic projection, origin at window center
        let uniforms = Uniforms {
            view_proj: center_ortho(size.width, size.height).to_cols_array_2d(),
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Background uniforms: gradient colors are fixed at startup
        let background_uniforms = BackgroundUniforms {
            top_color: [
                config.background_top[0],
                config.background_top[1],
                config.background_top[2],
                1.0,
            ],
            bottom_color: [
                config.background_bottom[0],
                config.background_bottom[1],
                config.background_bottom[2],
                1.0,
            ],
        };

        let background_uniform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Background Uniform Buffer"),
                contents: bytemuck::cast_slice(&[background_uniforms]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let background_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Background Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: background_uniform_buffer.as_entire_binding(),
            }],
        });

        // Shared pipeline layout (one uniform bind group each)
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let triangle_pipeline = create_scene_pipeline(
            &device,
            &pipeline_layout,
            &scene_shader,
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            "Triangle Pipeline",
        );

        let line_pipeline = create_scene_pipeline(
            &device,
            &pipeline_layout,
            &scene_shader,
            surface_format,
            wgpu::PrimitiveTopology::LineList,
            "Line Pipeline",
        );

        let background_pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Background Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &background_shader,
                    entry_point: Some("vs_main"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &background_shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let triangle_buffer =
            create_vertex_buffer(&device, "Triangle Vertex Buffer", INITIAL_VERTEX_CAPACITY);
        let line_buffer =
            create_vertex_buffer(&device, "Line Vertex Buffer", INITIAL_VERTEX_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            triangle_pipeline,
            line_pipeline,
            background_pipeline,
            triangle_buffer,
            triangle_capacity: INITIAL_VERTEX_CAPACITY,
            line_buffer,
            line_capacity: INITIAL_VERTEX_CAPACITY,
            uniform_buffer,
            uniform_bind_group,
            background_bind_group,
        })
    }

    /// Reconfigure the surface and projection after a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);

        let uniforms = Uniforms {
            view_proj: center_ortho(width, height).to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Render one frame of geometry
    pub fn render(&mut self, frame: &FrameGeometry) -> Result<(), wgpu::SurfaceError> {
        let triangle_count = frame.triangles.len();
        let line_count = frame.lines.len();

        self.upload_triangles(&frame.triangles);
        self.upload_lines(&frame.lines);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if frame.gradient_background {
                render_pass.set_pipeline(&self.background_pipeline);
                render_pass.set_bind_group(0, &self.background_bind_group, &[]);
                render_pass.draw(0..3, 0..1); // Fullscreen triangle
            }

            if line_count > 0 {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                render_pass.draw(0..line_count as u32, 0..1);
            }

            if triangle_count > 0 {
                render_pass.set_pipeline(&self.triangle_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.triangle_buffer.slice(..));
                render_pass.draw(0..triangle_count as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn upload_triangles(&mut self, vertices: &[Vertex]) {
        if vertices.len() > self.triangle_capacity {
            self.triangle_capacity = vertices.len().next_power_of_two();
            self.triangle_buffer = create_vertex_buffer(
                &self.device,
                "Triangle Vertex Buffer",
                self.triangle_capacity,
            );
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.triangle_buffer, 0, bytemuck::cast_slice(vertices));
        }
    }

    fn upload_lines(&mut self, vertices: &[Vertex]) {
        if vertices.len() > self.line_capacity {
            self.line_capacity = vertices.len().next_power_of_two();
            self.line_buffer =
                create_vertex_buffer(&self.device, "Line Vertex Buffer", self.line_capacity);
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(vertices));
        }
    }
}

/// Orthographic projection with the origin at the window center, y up
fn center_ortho(width: u32, height: u32) -> Mat4 {
    let half_w = width.max(1) as f32 / 2.0;
    let half_h = height.max(1) as f32 / 2.0;
    Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, -1.0, 1.0)
}

fn create_vertex_buffer(device: &wgpu::Device, label: &str, vertex_count: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (vertex_count * std::mem::size_of::<Vertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    },
                    wgpu::VertexAttribute {
                        offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x4,
                    },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
