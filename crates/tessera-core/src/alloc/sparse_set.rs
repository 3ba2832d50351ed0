use crate::profiling::profile_function;
use std::num::NonZeroU64;

/// A generational index into a [`SparseSet`].
///
/// The high 32 bits hold the generation and the low 32 bits hold `index + 1`,
/// so the value is never zero and `Option<IndexSlot>` stays 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexSlot(NonZeroU64);

impl IndexSlot {
    pub fn new(generation: u32, index: u32) -> Self {
        let raw = ((generation as u64) << 32) | (index as u64 + 1);
        // `index + 1` occupies the low half, which is non-zero for every u32 index.
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    pub fn generation(&self) -> u32 {
        (self.0.get() >> 32) as u32
    }

    pub fn index(&self) -> u32 {
        (self.0.get() & u32::MAX as u64) as u32 - 1
    }

    /// The packed 64-bit representation, stable for the lifetime of the slot.
    pub fn to_bits(&self) -> u64 {
        self.0.get()
    }
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage with generation-checked access.
///
/// Removing a value bumps the generation of its slot, so a stale [`IndexSlot`]
/// never resolves to a value inserted later at the same index.
pub struct SparseSet<T> {
    entries: Vec<Entry<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> SparseSet<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn push(&mut self, value: T) -> IndexSlot {
        profile_function!();
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.value = Some(value);
            IndexSlot::new(entry.generation, index)
        } else {
            let index = self.entries.len() as u32;
            self.entries.push(Entry {
                generation: 0,
                value: Some(value),
            });
            IndexSlot::new(0, index)
        }
    }

    pub fn get(&self, slot: IndexSlot) -> Option<&T> {
        self.entries
            .get(slot.index() as usize)
            .filter(|entry| entry.generation == slot.generation())
            .and_then(|entry| entry.value.as_ref())
    }

    pub fn get_mut(&mut self, slot: IndexSlot) -> Option<&mut T> {
        self.entries
            .get_mut(slot.index() as usize)
            .filter(|entry| entry.generation == slot.generation())
            .and_then(|entry| entry.value.as_mut())
    }

    pub fn contains(&self, slot: IndexSlot) -> bool {
        self.get(slot).is_some()
    }

    /// Removes the value behind `slot`, returning `None` if the slot is stale.
    pub fn remove(&mut self, slot: IndexSlot) -> Option<T> {
        profile_function!();
        let index = slot.index();
        let entry = self.entries.get_mut(index as usize)?;
        if entry.generation != slot.generation() {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndexSlot, &T)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            entry
                .value
                .as_ref()
                .map(|value| (IndexSlot::new(entry.generation, index as u32), value))
        })
    }
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_eq_size!(IndexSlot, Option<IndexSlot>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_slot_packing() {
        let slot = IndexSlot::new(7, 42);
        assert_eq!(slot.generation(), 7);
        assert_eq!(slot.index(), 42);

        let max = IndexSlot::new(u32::MAX, u32::MAX - 1);
        assert_eq!(max.generation(), u32::MAX);
        assert_eq!(max.index(), u32::MAX - 1);
    }

    #[test]
    fn test_sparse_set_push() {
        let mut set = SparseSet::<u8>::new();
        let slot = set.push(15);
        assert_eq!(slot.generation(), 0);
        assert_eq!(slot.index(), 0);
        assert_eq!(set.get(slot), Some(&15));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_sparse_set_stale_generation() {
        let mut set = SparseSet::<u8>::new();
        let _ = set.push(15);
        let stale = IndexSlot::new(1, 0);
        assert!(set.get(stale).is_none());
        assert!(set.remove(stale).is_none());
    }

    #[test]
    fn test_sparse_set_reuse_bumps_generation() {
        let mut set = SparseSet::<u8>::new();
        let first = set.push(15);
        assert_eq!(set.remove(first), Some(15));
        let second = set.push(45);

        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
        assert!(set.get(first).is_none());
        assert_eq!(set.get(second), Some(&45));
    }

    #[test]
    fn test_sparse_set_iter_skips_removed() {
        let mut set = SparseSet::<u8>::new();
        let slots: Vec<_> = (0..10).map(|i| set.push(i)).collect();
        set.remove(slots[0]);
        set.remove(slots[5]);

        let values: Vec<u8> = set.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 6, 7, 8, 9]);
        assert_eq!(set.len(), 8);
    }
}
