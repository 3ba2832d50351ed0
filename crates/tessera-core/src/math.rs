//! Math types used throughout the renderer.
//!
//! CPU-side math uses the SIMD-friendly [`glam`] types. Vertex data that goes
//! to the GPU is stored as plain arrays in `#[repr(C)]` structs instead.

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// World-space right and up axes of a camera.
///
/// Used to build camera-facing geometry: a corner at `(x, y)` in local space
/// lands at `position + right * x + up * y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
}

impl CameraBasis {
    /// Basis of a camera looking down -Z with +Y up.
    pub const IDENTITY: Self = Self {
        right: Vec3::X,
        up: Vec3::Y,
    };

    /// Extract the basis from a view (world-to-camera) matrix.
    ///
    /// The rotation part of a view matrix is the transpose of the camera's
    /// orientation, so its first two rows are the camera's right and up axes.
    pub fn from_view(view: &Mat4) -> Self {
        Self {
            right: view.row(0).truncate().normalize_or_zero(),
            up: view.row(1).truncate().normalize_or_zero(),
        }
    }
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_from_identity_view() {
        assert_eq!(CameraBasis::from_view(&Mat4::IDENTITY), CameraBasis::IDENTITY);
    }

    #[test]
    fn test_basis_from_rotated_camera() {
        // Camera yawed 90 degrees about +Y: its right axis points along -Z.
        let camera = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let basis = CameraBasis::from_view(&camera.inverse());

        assert!(basis.right.abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(basis.up.abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_basis_ignores_translation() {
        let view = Mat4::from_translation(Vec3::new(5.0, -3.0, 10.0));
        assert_eq!(CameraBasis::from_view(&view), CameraBasis::IDENTITY);
    }
}
