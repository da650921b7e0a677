/// Program trait and uniform values

use glam::{Mat4, Vec2, Vec3};

/// Linked GPU program
///
/// Implemented by backend-specific program objects. Destroyed when dropped.
pub trait Program: Send + Sync {
    /// Backend object name, unique among live programs of a device
    fn id(&self) -> u32;
}

/// A value uploaded to a program uniform
///
/// Matrix arrays are borrowed so skin and instance palettes are uploaded
/// without an intermediate copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue<'a> {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Mat4(Mat4),
    Mat4Array(&'a [Mat4]),
}

impl UniformValue<'_> {
    /// Raw bytes in std140-free tight packing (booleans are 32-bit ints)
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            UniformValue::Bool(v) => bytemuck::bytes_of(&(*v as i32)).to_vec(),
            UniformValue::Int(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Float(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec2(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec3(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Mat4(m) => bytemuck::bytes_of(m).to_vec(),
            UniformValue::Mat4Array(ms) => bytemuck::cast_slice(ms).to_vec(),
        }
    }

    /// Number of array elements (1 for scalars, vectors and single matrices)
    pub fn element_count(&self) -> usize {
        match self {
            UniformValue::Mat4Array(ms) => ms.len(),
            _ => 1,
        }
    }
}
