//! Texture slot table shared by the textured batch kinds.

use crate::texture::TextureHandle;

/// Fixed-size, ordered table of textures bound for the current sub-batch.
///
/// A table built [`with_fallback`](Self::with_fallback) reserves slot 0 for the
/// registry's white texture; occupied slots are then `[0, next_free)` with
/// `[1, next_free)` holding caller textures. A table built
/// [`without_fallback`](Self::without_fallback) hands out slots from 0.
///
/// The table holds handles only; it never owns or touches the textures.
#[derive(Debug, Clone)]
pub struct TextureSlotTable {
    slots: Vec<TextureHandle>,
    base: u32,
    limit: u32,
}

impl TextureSlotTable {
    /// A table whose slot 0 is the fallback texture.
    pub fn with_fallback(limit: u32) -> Self {
        debug_assert!(limit >= 2, "slot 0 is reserved, need at least 2 slots");
        Self {
            slots: Vec::with_capacity(limit as usize - 1),
            base: 1,
            limit,
        }
    }

    /// A table where every slot is assigned to a caller texture.
    pub fn without_fallback(limit: u32) -> Self {
        Self {
            slots: Vec::with_capacity(limit as usize),
            base: 0,
            limit,
        }
    }

    /// Slot index of `handle` if it is already bound in this sub-batch.
    pub fn find(&self, handle: TextureHandle) -> Option<u32> {
        self.slots
            .iter()
            .position(|bound| *bound == handle)
            .map(|position| position as u32 + self.base)
    }

    /// Bind `handle` to the next free slot and return that slot.
    ///
    /// The caller must flush and [`reset`](Self::reset) a full table first.
    pub fn push(&mut self, handle: TextureHandle) -> u32 {
        debug_assert!(!self.is_full(), "texture slot table overflow");
        let slot = self.next_free();
        self.slots.push(handle);
        slot
    }

    pub fn next_free(&self) -> u32 {
        self.base + self.slots.len() as u32
    }

    /// Number of occupied slots, counting the fallback slot when present.
    pub fn occupied(&self) -> u32 {
        self.next_free()
    }

    pub fn is_full(&self) -> bool {
        self.next_free() >= self.limit
    }

    pub fn has_fallback(&self) -> bool {
        self.base == 1
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Caller textures in slot order, excluding the fallback slot.
    pub fn textures(&self) -> &[TextureHandle] {
        &self.slots
    }

    pub fn reset(&mut self) {
        self.slots.clear();
    }
}
