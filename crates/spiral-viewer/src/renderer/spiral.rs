//! The spiral ribbon pass: vertex buffer, page texture array, uniforms and
//! the triangle-strip pipeline.

use crate::data::types::{LuminancePage, SpiralUniforms};
use glam::Mat4;
use strata::{SpiralMesh, SpiralVertex};
use wgpu::util::DeviceExt;

pub struct SpiralRenderable {
    pipeline:       wgpu::RenderPipeline,
    bind_group:     wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer:  wgpu::Buffer,
    vertex_count:   u32,
    // Kept alive for the bind group's view.
    _pages:         wgpu::Texture,
    uniforms:       SpiralUniforms,
}

impl SpiralRenderable {
    pub fn new(
        device:    &wgpu::Device,
        queue:     &wgpu::Queue,
        color_fmt: wgpu::TextureFormat,
        mesh:      &SpiralMesh,
        pages:     &[LuminancePage],
    ) -> Self {
        // Static vertex buffer, uploaded once.
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some("Spiral VB"),
            contents: mesh.as_bytes(),
            usage:    wgpu::BufferUsages::VERTEX,
        });

        let uniforms = SpiralUniforms::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some("Spiral Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage:    wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (page_tex, page_view) = upload_pages(device, queue, pages);

        // Columns tile along u across a page, so u repeats; v stays inside the column.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label:          Some("Spiral Page Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter:     wgpu::FilterMode::Linear,
            min_filter:     wgpu::FilterMode::Linear,
            mipmap_filter:  wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label:   Some("Spiral BGL"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding:    0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty:                 wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size:   wgpu::BufferSize::new(
                            std::mem::size_of::<SpiralUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding:    1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type:    wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2Array,
                        multisampled:   false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding:    2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty:         wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count:      None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label:   Some("Spiral Bind Group"),
            layout:  &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding:  0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding:  1,
                    resource: wgpu::BindingResource::TextureView(&page_view),
                },
                wgpu::BindGroupEntry {
                    binding:  2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label:  Some("shaders/spiral.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../shaders/spiral.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label:                Some("Spiral Pipeline Layout"),
            bind_group_layouts:   &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Must match `SpiralVertex` field order.
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpiralVertex>() as u64,
            step_mode:    wgpu::VertexStepMode::Vertex,
            attributes:   &[
                // spiral_pos
                wgpu::VertexAttribute {
                    shader_location: 0,
                    offset:          0,
                    format:          wgpu::VertexFormat::Float32x2,
                },
                // linear_pos
                wgpu::VertexAttribute {
                    shader_location: 1,
                    offset:          8,
                    format:          wgpu::VertexFormat::Float32x2,
                },
                // tex_coord
                wgpu::VertexAttribute {
                    shader_location: 2,
                    offset:          16,
                    format:          wgpu::VertexFormat::Float32x2,
                },
                // page
                wgpu::VertexAttribute {
                    shader_location: 3,
                    offset:          24,
                    format:          wgpu::VertexFormat::Uint32,
                },
            ],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label:  Some("Spiral Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module:              &shader,
                entry_point:         "vs_main",
                buffers:             &[vertex_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module:      &shader,
                entry_point: "fs_main",
                targets:     &[Some(wgpu::ColorTargetState {
                    format:     color_fmt,
                    blend:      None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            // Strip winding alternates, so nothing is culled.
            primitive: wgpu::PrimitiveState {
                topology:  wgpu::PrimitiveTopology::TriangleStrip,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample:   wgpu::MultisampleState::default(),
            multiview:     None,
        });

        log::info!(
            "Spiral uploaded: {} vertices ({} KiB), {} pages",
            mesh.vertex_count(),
            mesh.as_bytes().len() / 1024,
            pages.len()
        );

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            vertex_count: mesh.vertex_count(),
            _pages: page_tex,
            uniforms,
        }
    }

    pub fn set_projection(&mut self, proj: Mat4) {
        self.uniforms.proj = proj.to_cols_array_2d();
    }

    pub fn set_view(&mut self, view: Mat4) {
        self.uniforms.view = view.to_cols_array_2d();
    }

    /// 0 draws the spiral, 1 the straight strip; values between morph.
    pub fn set_blend(&mut self, blend: f32) {
        self.uniforms.blend = blend.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, queue: &wgpu::Queue) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}

/// Uploads all pages as layers of one `R8Unorm` texture array.
fn upload_pages(
    device: &wgpu::Device,
    queue:  &wgpu::Queue,
    pages:  &[LuminancePage],
) -> (wgpu::Texture, wgpu::TextureView) {
    let (width, height) = pages
        .first()
        .map(|p| (p.width.max(1), p.height.max(1)))
        .unwrap_or((1, 1));
    let layers = pages.len().max(1) as u32;

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label:           Some("Spiral Pages"),
        size:            wgpu::Extent3d { width, height, depth_or_array_layers: layers },
        mip_level_count: 1,
        sample_count:    1,
        dimension:       wgpu::TextureDimension::D2,
        format:          wgpu::TextureFormat::R8Unorm,
        usage:           wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats:    &[],
    });

    for (layer, page) in pages.iter().enumerate() {
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture:   &texture,
                mip_level: 0,
                origin:    wgpu::Origin3d { x: 0, y: 0, z: layer as u32 },
                aspect:    wgpu::TextureAspect::All,
            },
            &page.pixels,
            wgpu::ImageDataLayout {
                offset:         0,
                bytes_per_row:  Some(page.width),
                rows_per_image: Some(page.height),
            },
            wgpu::Extent3d { width: page.width, height: page.height, depth_or_array_layers: 1 },
        );
    }

    // Explicit dimension: a single-layer texture would otherwise get a plain D2 view.
    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        label:           Some("Spiral Pages View"),
        dimension:       Some(wgpu::TextureViewDimension::D2Array),
        array_layer_count: Some(layers),
        ..Default::default()
    });

    (texture, view)
}
