//! Render a few batched primitives into an offscreen texture.
//!
//! ```sh
//! cargo run -p tessera-render --example offscreen_batch
//! ```

use std::sync::Arc;

use tessera_core::logging;
use tessera_render::{
    BatchRenderer, BatchRendererConfig, CircleParams, Color, GraphicsContext, Mat4, QuadParams,
    RenderContext, RenderThread, Vec2, Vec3, WgpuRenderContext, command_queue,
};

const SIZE: u32 = 256;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let graphics = GraphicsContext::new_owned_sync()?;
    let slots = graphics.max_texture_slots();
    let format = wgpu::TextureFormat::Rgba8Unorm;

    let target = graphics.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let backend = Arc::new(WgpuRenderContext::new(graphics.clone(), format, slots));
    backend.set_target(target.create_view(&wgpu::TextureViewDescriptor::default()));
    let context: Arc<dyn RenderContext> = backend;

    let (queue, receiver) = command_queue();
    let config = BatchRendererConfig::default().with_max_texture_slots(slots);
    let mut renderer = BatchRenderer::new(context.clone(), config, queue)?;
    let render_thread = RenderThread::spawn(context, receiver)?;

    let checker: Vec<u8> = (0..16)
        .flat_map(|i| {
            if (i + i / 4) % 2 == 0 {
                [255, 255, 255, 255]
            } else {
                [40, 40, 40, 255]
            }
        })
        .collect();
    let checker = renderer.create_texture_rgba8(4, 4, &checker);

    let projection = Mat4::orthographic_rh(0.0, SIZE as f32, 0.0, SIZE as f32, -1.0, 1.0);
    {
        let mut frame = renderer.session(projection, Mat4::IDENTITY)?;
        frame.submit_quad_at(
            Vec3::new(64.0, 64.0, 0.0),
            Vec2::splat(96.0),
            0.3,
            &QuadParams::textured(checker).with_tiling(4.0),
        )?;
        frame.submit_circle_at(
            Vec3::new(180.0, 180.0, 0.0),
            Vec2::splat(80.0),
            0.0,
            &CircleParams::tinted(Color::from_hex(0x3fa7d6)).with_thickness(0.2),
        )?;
        frame.submit_line(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(SIZE as f32, SIZE as f32, 0.0),
            Color::RED,
        )?;
        frame.end()?;
    }

    let stats = renderer.stats().frame;
    drop(renderer);
    let executed = render_thread
        .join()
        .map_err(|_| "render thread panicked")?;

    tracing::info!(
        "Frame: {} draw calls, {} vertices; render thread executed {} draws",
        stats.draw_calls,
        stats.vertices,
        executed.draws
    );
    Ok(())
}
