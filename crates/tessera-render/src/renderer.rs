//! The batch renderer: one batch per primitive kind under one session.

use std::sync::Arc;

use tessera_core::math::{Mat4, Vec2, Vec3};
use tessera_core::profiling::profile_function;
use tessera_test_utils::{GpuTexture, RenderContext};

use crate::batch::quad::{QUAD_CORNERS, QuadParams};
use crate::batch::circle::CircleParams;
use crate::batch::{FlushContext, GlyphBatch, LineBatch, ShapeBatch, circle, quad};
use crate::capacity::{CapacityTable, KindCapacity, PrimitiveKind};
use crate::color::Color;
use crate::command::{CommandQueue, RenderCommand};
use crate::config::BatchRendererConfig;
use crate::error::BatchError;
use crate::fullscreen::FullscreenPass;
use crate::session::{FrameBatch, SessionState};
use crate::stats::BatchStats;
use crate::text::{Font, TextParams};
use crate::texture::{TextureHandle, TextureRegistry};
use crate::vertex::{CircleVertex, QuadVertex};

/// Accumulates primitives per kind and turns them into draw commands.
///
/// Each kind is batched strictly in submission order. A batch flushes when it
/// runs out of capacity or texture slots, and at the end of every session, in
/// the fixed order quads, circles, lines, text.
///
/// A kind configured with zero capacity is disabled: nothing is allocated for
/// it and submitting to it returns [`BatchError::KindDisabled`].
pub struct BatchRenderer {
    context: Arc<dyn RenderContext>,
    config: BatchRendererConfig,
    capacities: CapacityTable,
    queue: CommandQueue,
    textures: TextureRegistry,
    quads: Option<ShapeBatch<QuadVertex>>,
    circles: Option<ShapeBatch<CircleVertex>>,
    lines: Option<LineBatch>,
    glyphs: GlyphBatch,
    fullscreen: FullscreenPass,
    session: Option<SessionState>,
    stats: BatchStats,
}

impl BatchRenderer {
    pub fn new(
        context: Arc<dyn RenderContext>,
        config: BatchRendererConfig,
        queue: CommandQueue,
    ) -> Result<Self, BatchError> {
        config.validate()?;
        let capacities = CapacityTable::from_config(&config)?;
        let slot_limit = config.max_texture_slots;
        let ctx = context.as_ref();

        let textures = TextureRegistry::new(TextureRegistry::create_white(ctx));
        let quads = capacities
            .quad
            .is_enabled()
            .then(|| ShapeBatch::new(ctx, PrimitiveKind::Quad, capacities.quad, slot_limit));
        let circles = capacities
            .circle
            .is_enabled()
            .then(|| ShapeBatch::new(ctx, PrimitiveKind::Circle, capacities.circle, slot_limit));
        let lines = capacities
            .line
            .is_enabled()
            .then(|| LineBatch::new(ctx, capacities.line));
        let glyphs = GlyphBatch::new(ctx, capacities.glyph);
        let fullscreen = FullscreenPass::new(ctx);

        tracing::info!(
            "Created batch renderer: {} quads, {} circles, {} lines, {} texture slots",
            config.max_quads,
            config.max_circles,
            config.max_lines,
            slot_limit
        );

        Ok(Self {
            context,
            config,
            capacities,
            queue,
            textures,
            quads,
            circles,
            lines,
            glyphs,
            fullscreen,
            session: None,
            stats: BatchStats::default(),
        })
    }

    // Sessions

    /// Open a session: upload `view_projection` to every allocated kind's
    /// program and rewind every batch.
    pub fn begin_session(&mut self, view_projection: Mat4, view: Mat4) -> Result<(), BatchError> {
        if self.session.is_some() {
            tracing::error!("begin_session called while a session is active");
            return Err(BatchError::SessionAlreadyActive);
        }

        let matrix = view_projection.to_cols_array_2d();
        for kind in PrimitiveKind::ALL {
            if !self.is_allocated(kind) {
                continue;
            }
            self.queue.enqueue(RenderCommand::SetViewProjection {
                program: kind.program(),
                matrix,
            });
        }

        if let Some(quads) = &mut self.quads {
            quads.reset();
        }
        if let Some(circles) = &mut self.circles {
            circles.reset();
        }
        if let Some(lines) = &mut self.lines {
            lines.reset();
        }
        self.glyphs.reset();

        self.session = Some(SessionState::new(view_projection, view));
        Ok(())
    }

    /// Open a session that ends when the returned guard is dropped.
    pub fn session(
        &mut self,
        view_projection: Mat4,
        view: Mat4,
    ) -> Result<FrameBatch<'_>, BatchError> {
        self.begin_session(view_projection, view)?;
        Ok(FrameBatch::new(self))
    }

    /// Flush every kind with pending content and close the session.
    pub fn end_session(&mut self) -> Result<(), BatchError> {
        profile_function!();
        self.require_session()?;

        let mut ctx = FlushContext {
            queue: &self.queue,
            textures: &self.textures,
            stats: &mut self.stats,
        };
        if let Some(quads) = &mut self.quads {
            quads.flush(&mut ctx);
        }
        if let Some(circles) = &mut self.circles {
            circles.flush(&mut ctx);
        }
        if let Some(lines) = &mut self.lines {
            lines.flush(&mut ctx);
        }
        self.glyphs.flush(&mut ctx);

        self.queue.enqueue(RenderCommand::EndFrame);
        self.session = None;
        Ok(())
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_some()
    }

    /// Camera state of the open session.
    pub fn session_state(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    // Quads

    /// Submit a quad whose corners are `transform` applied to [`QUAD_CORNERS`].
    pub fn submit_quad(&mut self, transform: &Mat4, params: &QuadParams) -> Result<(), BatchError> {
        self.require_session()?;
        let batch = self.quads.as_mut().ok_or_else(|| disabled(PrimitiveKind::Quad))?;
        let mut ctx = FlushContext {
            queue: &self.queue,
            textures: &self.textures,
            stats: &mut self.stats,
        };
        batch.submit(&mut ctx, params.texture, |slot| {
            quad::transformed_vertices(transform, params, slot)
        });
        Ok(())
    }

    /// Submit a quad at `position`, scaled by `size` and rotated about Z by
    /// `rotation` radians.
    pub fn submit_quad_at(
        &mut self,
        position: Vec3,
        size: Vec2,
        rotation: f32,
        params: &QuadParams,
    ) -> Result<(), BatchError> {
        self.submit_quad(&quad::quad_transform(position, size, rotation), params)
    }

    /// Submit a quad that faces the session's camera.
    pub fn submit_fixed_view_quad(
        &mut self,
        position: Vec3,
        size: Vec2,
        params: &QuadParams,
    ) -> Result<(), BatchError> {
        let basis = self.require_session()?.basis;
        let batch = self.quads.as_mut().ok_or_else(|| disabled(PrimitiveKind::Quad))?;
        let mut ctx = FlushContext {
            queue: &self.queue,
            textures: &self.textures,
            stats: &mut self.stats,
        };
        batch.submit(&mut ctx, params.texture, |slot| {
            quad::facing_vertices(position, size, &basis, params, slot)
        });
        Ok(())
    }

    // Circles

    pub fn submit_circle(
        &mut self,
        transform: &Mat4,
        params: &CircleParams,
    ) -> Result<(), BatchError> {
        self.require_session()?;
        let batch = self
            .circles
            .as_mut()
            .ok_or_else(|| disabled(PrimitiveKind::Circle))?;
        let mut ctx = FlushContext {
            queue: &self.queue,
            textures: &self.textures,
            stats: &mut self.stats,
        };
        batch.submit(&mut ctx, params.texture, |slot| {
            circle::transformed_vertices(transform, params, slot)
        });
        Ok(())
    }

    pub fn submit_circle_at(
        &mut self,
        position: Vec3,
        size: Vec2,
        rotation: f32,
        params: &CircleParams,
    ) -> Result<(), BatchError> {
        self.submit_circle(&quad::quad_transform(position, size, rotation), params)
    }

    pub fn submit_fixed_view_circle(
        &mut self,
        position: Vec3,
        size: Vec2,
        params: &CircleParams,
    ) -> Result<(), BatchError> {
        let basis = self.require_session()?.basis;
        let batch = self
            .circles
            .as_mut()
            .ok_or_else(|| disabled(PrimitiveKind::Circle))?;
        let mut ctx = FlushContext {
            queue: &self.queue,
            textures: &self.textures,
            stats: &mut self.stats,
        };
        batch.submit(&mut ctx, params.texture, |slot| {
            circle::facing_vertices(position, size, &basis, params, slot)
        });
        Ok(())
    }

    // Lines

    pub fn submit_line(&mut self, p0: Vec3, p1: Vec3, color: Color) -> Result<(), BatchError> {
        self.submit_line_with_id(p0, p1, color, 0)
    }

    pub fn submit_line_with_id(
        &mut self,
        p0: Vec3,
        p1: Vec3,
        color: Color,
        pick_id: u32,
    ) -> Result<(), BatchError> {
        self.require_session()?;
        let batch = self.lines.as_mut().ok_or_else(|| disabled(PrimitiveKind::Line))?;
        let mut ctx = FlushContext {
            queue: &self.queue,
            textures: &self.textures,
            stats: &mut self.stats,
        };
        batch.submit(&mut ctx, p0, p1, color, pick_id);
        Ok(())
    }

    /// Outline of the quad `transform` would produce, as four lines.
    pub fn submit_rect(
        &mut self,
        transform: &Mat4,
        color: Color,
        pick_id: u32,
    ) -> Result<(), BatchError> {
        let corners = QUAD_CORNERS.map(|corner| (*transform * corner).truncate());
        for i in 0..corners.len() {
            let next = (i + 1) % corners.len();
            self.submit_line_with_id(corners[i], corners[next], color, pick_id)?;
        }
        Ok(())
    }

    // Text

    /// Lay out `text` with `font` and stage one glyph per visible character.
    pub fn render_text(
        &mut self,
        text: &str,
        font: &Font,
        params: &TextParams,
    ) -> Result<(), BatchError> {
        self.require_session()?;
        let mut ctx = FlushContext {
            queue: &self.queue,
            textures: &self.textures,
            stats: &mut self.stats,
        };
        self.glyphs.submit_text(&mut ctx, text, font, params);
        Ok(())
    }

    // Full-screen pass

    /// Draw `texture` (or the fallback texture) over the whole target.
    ///
    /// Not part of any session; the draw is enqueued immediately.
    pub fn draw_fullscreen(&mut self, texture: Option<TextureHandle>) {
        let mut ctx = FlushContext {
            queue: &self.queue,
            textures: &self.textures,
            stats: &mut self.stats,
        };
        self.fullscreen.draw(&mut ctx, texture);
    }

    // Capacity

    /// Reallocate the quad batch for `max_quads` quads per draw call. Zero
    /// disables quads.
    pub fn grow_quad_capacity(&mut self, max_quads: u32) -> Result<(), BatchError> {
        self.require_no_session(PrimitiveKind::Quad)?;
        let capacity = self.set_capacity(PrimitiveKind::Quad, max_quads)?;
        self.config.max_quads = max_quads;
        self.quads = capacity.is_enabled().then(|| {
            ShapeBatch::new(
                self.context.as_ref(),
                PrimitiveKind::Quad,
                capacity,
                self.config.max_texture_slots,
            )
        });
        Ok(())
    }

    pub fn grow_circle_capacity(&mut self, max_circles: u32) -> Result<(), BatchError> {
        self.require_no_session(PrimitiveKind::Circle)?;
        let capacity = self.set_capacity(PrimitiveKind::Circle, max_circles)?;
        self.config.max_circles = max_circles;
        self.circles = capacity.is_enabled().then(|| {
            ShapeBatch::new(
                self.context.as_ref(),
                PrimitiveKind::Circle,
                capacity,
                self.config.max_texture_slots,
            )
        });
        Ok(())
    }

    pub fn grow_line_capacity(&mut self, max_lines: u32) -> Result<(), BatchError> {
        self.require_no_session(PrimitiveKind::Line)?;
        let capacity = self.set_capacity(PrimitiveKind::Line, max_lines)?;
        self.config.max_lines = max_lines;
        self.lines = capacity
            .is_enabled()
            .then(|| LineBatch::new(self.context.as_ref(), capacity));
        Ok(())
    }

    pub fn capacities(&self) -> &CapacityTable {
        &self.capacities
    }

    pub fn config(&self) -> &BatchRendererConfig {
        &self.config
    }

    /// Whether a batch exists for `kind`. Glyphs are always allocated.
    pub fn is_allocated(&self, kind: PrimitiveKind) -> bool {
        match kind {
            PrimitiveKind::Quad => self.quads.is_some(),
            PrimitiveKind::Circle => self.circles.is_some(),
            PrimitiveKind::Line => self.lines.is_some(),
            PrimitiveKind::Glyph => true,
        }
    }

    /// Elements of `kind` staged since its last flush.
    pub fn pending_elements(&self, kind: PrimitiveKind) -> u32 {
        match kind {
            PrimitiveKind::Quad => self.quads.as_ref().map_or(0, |b| b.pending()),
            PrimitiveKind::Circle => self.circles.as_ref().map_or(0, |b| b.pending()),
            PrimitiveKind::Line => self.lines.as_ref().map_or(0, |b| b.pending()),
            PrimitiveKind::Glyph => self.glyphs.pending(),
        }
    }

    /// Occupied texture slots of `kind`'s current sub-batch, counting the
    /// fallback slot of the shape kinds. Always zero for lines.
    pub fn occupied_texture_slots(&self, kind: PrimitiveKind) -> u32 {
        match kind {
            PrimitiveKind::Quad => self.quads.as_ref().map_or(0, |b| b.slots().occupied()),
            PrimitiveKind::Circle => self.circles.as_ref().map_or(0, |b| b.slots().occupied()),
            PrimitiveKind::Line => 0,
            PrimitiveKind::Glyph => self.glyphs.pending(),
        }
    }

    // Textures

    pub fn register_texture(&mut self, texture: GpuTexture) -> TextureHandle {
        self.textures.register(texture)
    }

    /// Create an RGBA8 texture from tightly packed pixels and register it.
    pub fn create_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> TextureHandle {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        let texture = self.context.create_texture(&wgpu::TextureDescriptor {
            label: Some("Batch Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.context.write_texture(&texture, pixels);
        self.register_texture(texture)
    }

    /// Remove a texture from the registry.
    ///
    /// Removing a texture that a pending sub-batch still references is a
    /// caller error: that sub-batch will bind the fallback texture instead.
    pub fn remove_texture(&mut self, handle: TextureHandle) -> Result<GpuTexture, BatchError> {
        self.textures
            .remove(handle)
            .ok_or(BatchError::StaleTexture(handle))
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    /// Handle of the fallback texture bound to slot 0.
    pub fn white_texture(&self) -> TextureHandle {
        self.textures.white()
    }

    // Statistics

    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    /// Clear the per-frame counters. Call once per frame.
    pub fn reset_frame_stats(&mut self) {
        self.stats.reset_frame();
    }

    pub fn reset_total_stats(&mut self) {
        self.stats.reset_total();
    }

    pub fn context(&self) -> &Arc<dyn RenderContext> {
        &self.context
    }

    fn require_session(&self) -> Result<&SessionState, BatchError> {
        self.session.as_ref().ok_or_else(|| {
            tracing::error!("Batch submission outside of a session");
            BatchError::SessionNotActive
        })
    }

    fn require_no_session(&self, kind: PrimitiveKind) -> Result<(), BatchError> {
        if self.session.is_some() {
            tracing::error!("Cannot resize the {} batch during a session", kind);
            return Err(BatchError::CapacityChangeDuringSession(kind));
        }
        Ok(())
    }

    fn set_capacity(
        &mut self,
        kind: PrimitiveKind,
        max_elements: u32,
    ) -> Result<KindCapacity, BatchError> {
        let capacity = KindCapacity::new(kind, max_elements)?;
        tracing::info!(
            "Resizing {} batch: {} -> {} elements",
            kind,
            self.capacities.get(kind).max_elements,
            max_elements
        );
        self.capacities.set(kind, capacity);
        Ok(capacity)
    }
}

fn disabled(kind: PrimitiveKind) -> BatchError {
    tracing::error!("Submission to disabled {} batch", kind);
    BatchError::KindDisabled(kind)
}
