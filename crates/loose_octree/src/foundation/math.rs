//! Math utilities and types
//!
//! Thin aliases over nalgebra so the rest of the crate reads in one
//! vocabulary.

pub use nalgebra::{Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (used for RGBA colors)
pub type Vec4 = Vector4<f32>;

/// Component-wise selection: picks `high` on axes whose bit is set in `mask`
///
/// Bit 0 selects X, bit 1 selects Y, bit 2 selects Z.
pub fn select_by_mask(mask: usize, low: &Vec3, high: &Vec3) -> Vec3 {
    Vec3::new(
        if mask & 1 != 0 { high.x } else { low.x },
        if mask & 2 != 0 { high.y } else { low.y },
        if mask & 4 != 0 { high.z } else { low.z },
    )
}
