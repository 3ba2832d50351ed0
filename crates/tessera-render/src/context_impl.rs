//! `wgpu` implementation of [`RenderContext`].
//!
//! Each [`ShaderProgram`] gets its own pipeline, view-projection uniform and
//! bind group layout. A bind group is built per draw from the call's textures;
//! bindings the call leaves empty are filled with a 1x1 white texture.

use std::sync::Arc;

use parking_lot::Mutex;
use tessera_core::alloc::HashMap;
use tessera_test_utils::{DrawCall, GpuBuffer, GpuTexture, RenderContext, ShaderProgram, Topology};
use wgpu::util::DeviceExt;
use wgpu::{BufferDescriptor, BufferUsages, TextureDescriptor};

use crate::context::GraphicsContext;
use crate::shaders;
use crate::vertex::{CircleVertex, FullscreenVertex, GlyphVertex, LineVertex, QuadVertex};

/// Name of the camera uniform every program declares.
pub const VIEW_PROJECTION_UNIFORM: &str = "view_projection";

struct ProgramResources {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    uniform: wgpu::Buffer,
    texture_count: u32,
}

/// Draws batches into a colour target with `wgpu`.
///
/// Every `draw` records and submits one render pass that loads the current
/// target, so draws compose in submission order. Call
/// [`set_target`](Self::set_target) before the first draw of a frame.
pub struct WgpuRenderContext {
    graphics: Arc<GraphicsContext>,
    programs: HashMap<ShaderProgram, ProgramResources>,
    sampler: wgpu::Sampler,
    fallback: wgpu::TextureView,
    target: Mutex<Option<wgpu::TextureView>>,
}

impl WgpuRenderContext {
    /// Build every program for targets of `target_format` with `slot_limit`
    /// texture bindings per textured program.
    pub fn new(
        graphics: Arc<GraphicsContext>,
        target_format: wgpu::TextureFormat,
        slot_limit: u32,
    ) -> Self {
        let device = &graphics.device;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Batch Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let fallback = device
            .create_texture_with_data(
                &graphics.queue,
                &wgpu::TextureDescriptor {
                    label: Some("Batch Binding Fallback"),
                    size: wgpu::Extent3d {
                        width: 1,
                        height: 1,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8Unorm,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                },
                wgpu::util::TextureDataOrder::LayerMajor,
                &[0xFF; 4],
            )
            .create_view(&wgpu::TextureViewDescriptor::default());

        let programs = ShaderProgram::ALL
            .into_iter()
            .map(|program| {
                let resources = create_program(device, program, target_format, slot_limit);
                (program, resources)
            })
            .collect();

        tracing::info!(
            "Created batch pipelines for {:?} with {} texture slots",
            target_format,
            slot_limit
        );

        Self {
            graphics,
            programs,
            sampler,
            fallback,
            target: Mutex::new(None),
        }
    }

    /// Set the colour target subsequent draws render into.
    pub fn set_target(&self, view: wgpu::TextureView) {
        *self.target.lock() = Some(view);
    }

    pub fn clear_target(&self) {
        *self.target.lock() = None;
    }

    pub fn graphics(&self) -> &Arc<GraphicsContext> {
        &self.graphics
    }
}

fn vertex_layout(program: ShaderProgram) -> wgpu::VertexBufferLayout<'static> {
    match program {
        ShaderProgram::Quad => QuadVertex::layout(),
        ShaderProgram::Circle => CircleVertex::layout(),
        ShaderProgram::Line => LineVertex::layout(),
        ShaderProgram::Text => GlyphVertex::layout(),
        ShaderProgram::Fullscreen => FullscreenVertex::layout(),
    }
}

fn topology(program: ShaderProgram) -> Topology {
    match program {
        ShaderProgram::Line => Topology::LineList,
        ShaderProgram::Fullscreen => Topology::TriangleStrip,
        _ => Topology::TriangleList,
    }
}

fn create_program(
    device: &wgpu::Device,
    program: ShaderProgram,
    target_format: wgpu::TextureFormat,
    slot_limit: u32,
) -> ProgramResources {
    let label = program.label();
    let texture_count = shaders::texture_count(program, slot_limit);

    let mut entries = vec![
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ];
    entries.extend((0..texture_count).map(|slot| wgpu::BindGroupLayoutEntry {
        binding: shaders::FIRST_TEXTURE_BINDING + slot,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }));

    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{} Bind Group Layout", label)),
        entries: &entries,
    });

    let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} View Projection", label)),
        contents: bytemuck::cast_slice(&glam::Mat4::IDENTITY.to_cols_array()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} Shader", label)),
        source: wgpu::ShaderSource::Wgsl(shaders::source(program, slot_limit).into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", label)),
        bind_group_layouts: &[&layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", label)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout(program)],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: topology(program).to_wgpu(),
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    ProgramResources {
        pipeline,
        layout,
        uniform,
        texture_count,
    }
}

impl RenderContext for WgpuRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        GpuBuffer::from_wgpu(self.graphics.device.create_buffer(desc))
    }

    fn create_buffer_init(
        &self,
        label: Option<&str>,
        contents: &[u8],
        usage: BufferUsages,
    ) -> GpuBuffer {
        let buffer = self
            .graphics
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents,
                usage,
            });
        GpuBuffer::from_wgpu(buffer)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        self.graphics
            .queue
            .write_buffer(buffer.as_wgpu(), offset, data);
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        GpuTexture::from_wgpu(self.graphics.device.create_texture(desc))
    }

    fn write_texture(&self, texture: &GpuTexture, data: &[u8]) {
        let wgpu_texture = texture.as_wgpu();
        let bytes_per_pixel = wgpu_texture.format().block_copy_size(None).unwrap_or(4);
        self.graphics.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: wgpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(texture.width() * bytes_per_pixel),
                rows_per_image: Some(texture.height()),
            },
            wgpu::Extent3d {
                width: texture.width(),
                height: texture.height(),
                depth_or_array_layers: 1,
            },
        );
    }

    fn set_uniform_mat4(&self, program: ShaderProgram, name: &str, value: [[f32; 4]; 4]) {
        if name != VIEW_PROJECTION_UNIFORM {
            tracing::warn!("{} program has no uniform named '{}'", program.label(), name);
            return;
        }
        if let Some(resources) = self.programs.get(&program) {
            self.graphics
                .queue
                .write_buffer(&resources.uniform, 0, bytemuck::cast_slice(&value));
        }
    }

    fn draw(&self, call: &DrawCall) {
        let Some(target) = self.target.lock().clone() else {
            tracing::warn!("Dropping {} draw: no render target set", call.program.label());
            return;
        };
        let Some(resources) = self.programs.get(&call.program) else {
            return;
        };
        if call.textures.len() as u32 > resources.texture_count {
            tracing::error!(
                "{} draw binds {} textures but the program has {} slots",
                call.program.label(),
                call.textures.len(),
                resources.texture_count
            );
            return;
        }

        let views: Vec<&wgpu::TextureView> = (0..resources.texture_count as usize)
            .map(|slot| {
                call.textures
                    .get(slot)
                    .map(GpuTexture::view)
                    .unwrap_or(&self.fallback)
            })
            .collect();

        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: resources.uniform.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&self.sampler),
            },
        ];
        entries.extend(views.iter().enumerate().map(|(slot, view)| {
            wgpu::BindGroupEntry {
                binding: shaders::FIRST_TEXTURE_BINDING + slot as u32,
                resource: wgpu::BindingResource::TextureView(view),
            }
        }));

        let device = &self.graphics.device;
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Batch Bind Group"),
            layout: &resources.layout,
            entries: &entries,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Batch Draw Encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Batch Draw Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&resources.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.set_vertex_buffer(0, call.vertex_buffer.as_wgpu().slice(..));
            match &call.index_buffer {
                Some(indices) => {
                    pass.set_index_buffer(indices.as_wgpu().slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..call.count, 0, 0..1);
                }
                None => pass.draw(0..call.count, 0..1),
            }
        }
        self.graphics.queue.submit(Some(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_topologies() {
        assert_eq!(topology(ShaderProgram::Line), Topology::LineList);
        assert_eq!(topology(ShaderProgram::Fullscreen), Topology::TriangleStrip);
        assert_eq!(topology(ShaderProgram::Circle), Topology::TriangleList);
    }

    #[test]
    #[ignore = "requires a GPU adapter"]
    fn test_pipelines_build() {
        let graphics = GraphicsContext::new_owned_sync().unwrap();
        let slots = graphics.max_texture_slots();
        let context = WgpuRenderContext::new(graphics, wgpu::TextureFormat::Rgba8Unorm, slots);
        assert_eq!(context.programs.len(), ShaderProgram::ALL.len());
    }
}
