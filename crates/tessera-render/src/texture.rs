//! Generation-checked texture handles.
//!
//! Batches refer to textures by [`TextureHandle`] rather than by GPU object, so
//! identity checks stay valid even after a texture is destroyed and its slot
//! reused: the new texture gets a different generation.
//!
//! The registry does not extend the lifetime of a texture that is still
//! referenced by a pending, not-yet-flushed sub-batch. Removing such a texture
//! is a caller error; the flush then binds the fallback texture in its place
//! and logs a warning.

use tessera_core::alloc::{IndexSlot, SparseSet};
use tessera_test_utils::{GpuTexture, RenderContext};

/// A handle to a texture in a [`TextureRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(IndexSlot);

impl TextureHandle {
    pub fn index(&self) -> u32 {
        self.0.index()
    }

    pub fn generation(&self) -> u32 {
        self.0.generation()
    }
}

/// Owns the GPU textures that batches may bind.
///
/// The first entry is always a 1x1 opaque white texture. Shape batches bind it
/// to slot 0 so untextured primitives sample white and need no shader branch.
pub struct TextureRegistry {
    textures: SparseSet<GpuTexture>,
    white: TextureHandle,
}

impl TextureRegistry {
    /// Create a registry whose fallback is `white`.
    pub fn new(white: GpuTexture) -> Self {
        let mut textures = SparseSet::new();
        let white = TextureHandle(textures.push(white));
        Self { textures, white }
    }

    /// Create a 1x1 opaque white RGBA8 texture.
    pub fn create_white(context: &dyn RenderContext) -> GpuTexture {
        let texture = context.create_texture(&wgpu::TextureDescriptor {
            label: Some("Batch White Texture"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        context.write_texture(&texture, &[0xFF; 4]);
        texture
    }

    /// Handle of the fallback texture.
    pub fn white(&self) -> TextureHandle {
        self.white
    }

    pub fn white_texture(&self) -> &GpuTexture {
        // The white entry is never removed.
        self.textures
            .get(self.white.0)
            .expect("fallback texture missing from registry")
    }

    pub fn register(&mut self, texture: GpuTexture) -> TextureHandle {
        let handle = TextureHandle(self.textures.push(texture));
        tracing::trace!(
            "Registered texture {}v{}",
            handle.index(),
            handle.generation()
        );
        handle
    }

    /// Remove a texture. The fallback texture cannot be removed.
    pub fn remove(&mut self, handle: TextureHandle) -> Option<GpuTexture> {
        if handle == self.white {
            tracing::warn!("Refusing to remove the fallback texture");
            return None;
        }
        self.textures.remove(handle.0)
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.textures.get(handle.0)
    }

    pub fn contains(&self, handle: TextureHandle) -> bool {
        self.textures.contains(handle.0)
    }

    /// Number of registered textures, including the fallback.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a handle for binding, substituting the fallback for stale handles.
    pub(crate) fn resolve(&self, handle: TextureHandle) -> GpuTexture {
        match self.get(handle) {
            Some(texture) => texture.clone(),
            None => {
                tracing::warn!(
                    "Texture {}v{} was removed before its batch was flushed; binding fallback",
                    handle.index(),
                    handle.generation()
                );
                self.white_texture().clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_test_utils::MockRenderContext;

    fn registry(ctx: &MockRenderContext) -> TextureRegistry {
        TextureRegistry::new(TextureRegistry::create_white(ctx))
    }

    #[test]
    fn test_white_texture_is_uploaded() {
        let ctx = MockRenderContext::new();
        let registry = registry(&ctx);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.white_texture().width(), 1);
        assert_eq!(ctx.count_texture_creates(), 1);
    }

    #[test]
    fn test_register_and_remove() {
        let ctx = MockRenderContext::new();
        let mut registry = registry(&ctx);
        let texture = TextureRegistry::create_white(&ctx);
        let handle = registry.register(texture.clone());

        assert_ne!(handle, registry.white());
        assert_eq!(registry.get(handle), Some(&texture));
        assert_eq!(registry.remove(handle), Some(texture));
        assert!(!registry.contains(handle));
    }

    #[test]
    fn test_reused_slot_gets_new_identity() {
        let ctx = MockRenderContext::new();
        let mut registry = registry(&ctx);
        let first = registry.register(TextureRegistry::create_white(&ctx));
        registry.remove(first);
        let second = registry.register(TextureRegistry::create_white(&ctx));

        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
    }

    #[test]
    fn test_white_cannot_be_removed() {
        let ctx = MockRenderContext::new();
        let mut registry = registry(&ctx);
        assert!(registry.remove(registry.white()).is_none());
        assert!(registry.contains(registry.white()));
    }

    #[test]
    fn test_resolve_stale_handle_falls_back() {
        let ctx = MockRenderContext::new();
        let mut registry = registry(&ctx);
        let handle = registry.register(TextureRegistry::create_white(&ctx));
        registry.remove(handle);

        assert_eq!(&registry.resolve(handle), registry.white_texture());
    }
}
