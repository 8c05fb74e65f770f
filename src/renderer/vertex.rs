//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex: pixel position (y down) and colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// `0xRRGGBB` to linear-ish RGBA floats
pub const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
        1.0,
    ]
}

/// Colors for board elements
pub mod colors {
    use super::rgb;

    pub const BACKGROUND: [f32; 4] = rgb(0x000055);
    pub const LIGHT_SQUARE: [f32; 4] = rgb(0xF0D9B5);
    pub const DARK_SQUARE: [f32; 4] = rgb(0xB58863);
    pub const LIGHT_PIECE: [f32; 4] = rgb(0xFFFFFF);
    pub const DARK_PIECE: [f32; 4] = rgb(0x000000);
    pub const PIECE_OUTLINE: [f32; 4] = rgb(0x000000);
    /// Collision circle overlays
    pub const DEBUG_LIGHT: [f32; 4] = rgb(0xFF0000);
    pub const DEBUG_DARK: [f32; 4] = rgb(0x00FF00);
    /// Drag line from press point to the dragged piece
    pub const DRAG_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb() {
        assert_eq!(rgb(0xFF0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0, 1.0]);
        assert!((colors::BACKGROUND[2] - 85.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }
}
