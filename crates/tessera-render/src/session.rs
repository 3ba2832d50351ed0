//! Frame batch sessions.

use std::ops::{Deref, DerefMut};

use tessera_core::math::{CameraBasis, Mat4};

use crate::error::BatchError;
use crate::renderer::BatchRenderer;

/// Camera state captured by `begin_session`, valid until `end_session`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionState {
    pub view_projection: Mat4,
    pub view: Mat4,
    /// Right and up axes for camera-facing primitives.
    pub basis: CameraBasis,
}

impl SessionState {
    pub fn new(view_projection: Mat4, view: Mat4) -> Self {
        Self {
            view_projection,
            view,
            basis: CameraBasis::from_view(&view),
        }
    }
}

/// An open session that ends when dropped.
///
/// Holding the renderer mutably borrowed makes a nested session impossible to
/// express. An error from the implicit end on drop is logged at `error`; call
/// [`end`](Self::end) to handle it instead.
pub struct FrameBatch<'a> {
    renderer: &'a mut BatchRenderer,
}

impl<'a> FrameBatch<'a> {
    pub(crate) fn new(renderer: &'a mut BatchRenderer) -> Self {
        Self { renderer }
    }

    pub fn end(self) -> Result<(), BatchError> {
        // Drop then finds the session closed and does nothing.
        self.renderer.end_session()
    }
}

impl Deref for FrameBatch<'_> {
    type Target = BatchRenderer;

    fn deref(&self) -> &Self::Target {
        self.renderer
    }
}

impl DerefMut for FrameBatch<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.renderer
    }
}

impl Drop for FrameBatch<'_> {
    fn drop(&mut self) {
        if !self.renderer.is_session_active() {
            return;
        }
        if let Err(err) = self.renderer.end_session() {
            tracing::error!("Failed to end batch session on drop: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::math::Vec3;

    #[test]
    fn test_basis_from_view() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let state = SessionState::new(Mat4::IDENTITY, view);
        assert!(state.basis.right.abs_diff_eq(Vec3::X, 1e-6));
        assert!(state.basis.up.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_drop_after_manual_end_ends_once() {
        use crate::command::{RenderCommand, command_queue};
        use crate::config::BatchRendererConfig;
        use std::sync::Arc;
        use tessera_test_utils::MockRenderContext;

        let (queue, receiver) = command_queue();
        let mut renderer = BatchRenderer::new(
            Arc::new(MockRenderContext::new()),
            BatchRendererConfig::default(),
            queue,
        )
        .unwrap();

        {
            let mut frame = renderer.session(Mat4::IDENTITY, Mat4::IDENTITY).unwrap();
            frame.end_session().unwrap();
            assert!(!frame.is_session_active());
        }

        let end_frames = receiver
            .drain()
            .into_iter()
            .filter(|command| matches!(command, RenderCommand::EndFrame))
            .count();
        assert_eq!(end_frames, 1);
        assert!(!renderer.is_session_active());
    }
}
