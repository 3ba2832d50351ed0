//! Host-side vertex staging.

use bytemuck::Pod;

/// A pre-sized host array that vertices are appended to between flushes.
///
/// The backing storage is allocated once with the batch's maximum vertex
/// count and never grows; batches flush before it can overflow.
#[derive(Debug, Clone)]
pub struct StagingBuffer<V: Pod> {
    vertices: Vec<V>,
    capacity: usize,
}

impl<V: Pod> StagingBuffer<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append vertices at the write cursor.
    pub fn extend_from_slice(&mut self, vertices: &[V]) {
        debug_assert!(
            vertices.len() <= self.remaining(),
            "staging buffer overflow: {} + {} > {}",
            self.vertices.len(),
            vertices.len(),
            self.capacity
        );
        self.vertices.extend_from_slice(vertices);
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Staged bytes from the base of the buffer to the write cursor.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Number of staged vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn remaining(&self) -> usize {
        self.capacity - self.vertices.len()
    }

    /// Rewind the write cursor to the base.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}
