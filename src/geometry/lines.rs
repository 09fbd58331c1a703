//! Colored line-list geometry.

use cgmath::{Point3, Vector3};

use crate::color::Color;

/// A vertex of line geometry.
///
/// # Memory Layout
/// The total size is 28 bytes:
/// - `position`: 12 bytes (3 × f32)
/// - `color`: 16 bytes (4 × f32)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// A list of line segments, two vertices per segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lines {
    pub vertices: Vec<ColorVertex>,
    pub indices: Vec<u32>,
}

impl Lines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Adds one segment from `start` to `end`.
    pub fn line(&mut self, start: Point3<f32>, end: Point3<f32>, color: Color) {
        let base = self.vertices.len() as u32;
        let color = color.to_array();
        self.vertices.push(ColorVertex {
            position: start.into(),
            color,
        });
        self.vertices.push(ColorVertex {
            position: end.into(),
            color,
        });
        self.indices.extend_from_slice(&[base, base + 1]);
    }

    /// Adds the edges of the axis-aligned box spanning `min` to `min + size`.
    ///
    /// Edges of zero length are skipped, so a box with a zero height draws as
    /// a single rectangle.
    pub fn box_outline(&mut self, min: Point3<f32>, size: Vector3<f32>, color: Color) {
        let corner = |x: bool, y: bool, z: bool| {
            Point3::new(
                if x { min.x + size.x } else { min.x },
                if y { min.y + size.y } else { min.y },
                if z { min.z + size.z } else { min.z },
            )
        };

        let mut edges = Vec::with_capacity(12);
        for a in [false, true] {
            for b in [false, true] {
                edges.push((corner(false, a, b), corner(true, a, b)));
                edges.push((corner(a, false, b), corner(a, true, b)));
                edges.push((corner(a, b, false), corner(a, b, true)));
            }
        }

        let mut seen: Vec<(Point3<f32>, Point3<f32>)> = Vec::with_capacity(12);
        for (start, end) in edges {
            if start == end || seen.contains(&(start, end)) {
                continue;
            }
            seen.push((start, end));
            self.line(start, end, color);
        }
    }

    pub fn segment_count(&self) -> usize {
        self.indices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_twelve_edges() {
        let mut lines = Lines::new();
        lines.box_outline(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 2.0, 3.0), Color::RED);
        assert_eq!(lines.segment_count(), 12);
        assert_eq!(lines.vertices.len(), 24);
    }

    #[test]
    fn flat_box_is_a_rectangle() {
        let mut lines = Lines::new();
        lines.box_outline(Point3::new(0.0, 5.0, 0.0), Vector3::new(1.0, 0.0, 1.0), Color::BLACK);
        assert_eq!(lines.segment_count(), 4);
        assert!(lines.vertices.iter().all(|v| v.position[1] == 5.0));
    }
}
