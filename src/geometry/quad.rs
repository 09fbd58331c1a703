//! A textured rectangle for 2D overlays.

/// A vertex of an image quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// A `width × height` rectangle in the `z = 0` plane with its lower-left
/// corner at the origin, showing the texture region `[0, u] × [0, v]`.
///
/// Texture `v` grows downwards (top edge at 0). With `invert_y` the image is
/// flipped vertically, which is what render targets read back bottom-up need.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageQuad {
    pub width: f32,
    pub height: f32,
    pub u: f32,
    pub v: f32,
    pub invert_y: bool,
    vertices: [QuadVertex; 4],
}

const INDICES: [u32; 6] = [0, 2, 3, 0, 1, 2];

impl ImageQuad {
    pub fn new(width: f32, height: f32, invert_y: bool) -> Self {
        let mut quad = ImageQuad {
            width,
            height,
            u: 1.0,
            v: 1.0,
            invert_y,
            vertices: [QuadVertex {
                position: [0.0; 3],
                tex_coords: [0.0; 2],
            }; 4],
        };
        quad.compute();
        quad
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.compute();
    }

    pub fn set_uv(&mut self, u: f32, v: f32) {
        self.u = u;
        self.v = v;
        self.compute();
    }

    /// Corners in bottom-left, bottom-right, top-right, top-left order.
    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &INDICES
    }

    fn compute(&mut self) {
        let invert_y = self.invert_y;
        let flip = move |v: f32| if invert_y { 1.0 - v } else { v };
        let (w, h, u, v) = (self.width, self.height, self.u, self.v);
        self.vertices = [
            QuadVertex {
                position: [0.0, 0.0, 0.0],
                tex_coords: [0.0, flip(v)],
            },
            QuadVertex {
                position: [w, 0.0, 0.0],
                tex_coords: [u, flip(v)],
            },
            QuadVertex {
                position: [w, h, 0.0],
                tex_coords: [u, flip(0.0)],
            },
            QuadVertex {
                position: [0.0, h, 0.0],
                tex_coords: [0.0, flip(0.0)],
            },
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_follow_size_and_uv() {
        let mut quad = ImageQuad::new(4.0, 2.0, false);
        quad.set_uv(0.5, 0.25);
        let top_right = quad.vertices()[2];
        assert_eq!(top_right.position, [4.0, 2.0, 0.0]);
        assert_eq!(top_right.tex_coords, [0.5, 0.0]);
        assert_eq!(quad.vertices()[0].tex_coords, [0.0, 0.25]);
    }

    #[test]
    fn invert_y_flips_v() {
        let quad = ImageQuad::new(1.0, 1.0, true);
        assert_eq!(quad.vertices()[0].tex_coords, [0.0, 0.0]);
        assert_eq!(quad.vertices()[3].tex_coords, [0.0, 1.0]);
    }
}
