//! WebGPU surface and the single colour pipeline the board is drawn with
//!
//! Geometry arrives in pixel space and is converted to NDC on upload. The
//! vertex buffer is kept between frames and only reallocated when a frame
//! outgrows it.

use super::vertex::{Vertex, colors};

/// Smallest vertex buffer ever allocated, in vertices
const MIN_VERTEX_CAPACITY: usize = 1024;

/// GPU side of the renderer
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Vertices `vertex_buffer` can hold
    vertex_capacity: usize,
    vertex_count: u32,
    /// Surface size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("board_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: pick_surface_format(&caps.formats),
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = board_pipeline(&device, config.format);
        let vertex_buffer = vertex_buffer(&device, MIN_VERTEX_CAPACITY);

        log::info!(
            "Board pipeline ready ({}x{}, {:?})",
            config.width,
            config.height,
            config.format
        );

        let size = (config.width, config.height);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: MIN_VERTEX_CAPACITY,
            vertex_count: 0,
            size,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size {
            return;
        }
        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Convert pixel-space vertices to NDC and copy them to the GPU
    fn upload(&mut self, vertices: &[Vertex]) {
        let ndc: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let [x, y] = pixel_to_ndc(v.position, self.size);
                Vertex::new(x, y, v.color)
            })
            .collect();

        let needed = vertex_capacity_for(ndc.len());
        if needed > self.vertex_capacity {
            log::debug!("Growing vertex buffer to {} vertices", needed);
            self.vertex_buffer = vertex_buffer(&self.device, needed);
            self.vertex_capacity = needed;
        }
        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&ndc));
        self.vertex_count = ndc.len() as u32;
    }

    /// Draw one frame of pixel-space triangles
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        self.upload(vertices);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("board_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("board_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            if self.vertex_count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn board_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("board_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("board_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("board_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("board_vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Prefer an sRGB surface so the hex palette shows as authored
pub fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
        .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb)
}

/// Buffer size (in vertices) to allocate for a frame of `count` vertices
pub fn vertex_capacity_for(count: usize) -> usize {
    count.max(MIN_VERTEX_CAPACITY).next_power_of_two()
}

/// Pixel position (origin top left, y down) to normalized device coordinates
pub fn pixel_to_ndc(position: [f32; 2], size: (u32, u32)) -> [f32; 2] {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    [position[0] / w * 2.0 - 1.0, 1.0 - position[1] / h * 2.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        assert_eq!(pixel_to_ndc([0.0, 0.0], (800, 600)), [-1.0, 1.0]);
        assert_eq!(pixel_to_ndc([800.0, 600.0], (800, 600)), [1.0, -1.0]);
        assert_eq!(pixel_to_ndc([400.0, 300.0], (800, 600)), [0.0, 0.0]);
    }

    #[test]
    fn test_vertex_capacity_grows_in_powers_of_two() {
        assert_eq!(vertex_capacity_for(0), MIN_VERTEX_CAPACITY);
        assert_eq!(vertex_capacity_for(MIN_VERTEX_CAPACITY), MIN_VERTEX_CAPACITY);
        assert_eq!(vertex_capacity_for(MIN_VERTEX_CAPACITY + 1), 2 * MIN_VERTEX_CAPACITY);
        assert_eq!(vertex_capacity_for(5000), 8192);
    }

    #[test]
    fn test_surface_format_prefers_srgb() {
        use wgpu::TextureFormat::*;
        assert_eq!(pick_surface_format(&[Rgba8Unorm, Bgra8UnormSrgb]), Bgra8UnormSrgb);
        assert_eq!(pick_surface_format(&[Rgba8Unorm]), Rgba8Unorm);
        assert_eq!(pick_surface_format(&[]), Bgra8UnormSrgb);
    }
}
