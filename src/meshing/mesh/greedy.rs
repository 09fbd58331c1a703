//! Greedy meshing implementation for voxel rendering.
//!
//! This module combines adjacent coplanar faces with the same key into larger
//! quads, reducing the number of vertices needed to draw a chunk.
//!
//! Merging happens in two passes over one layer of a side:
//! 1. Along a row, each face is merged into the previous one with `merge_right`
//! 2. Across rows, each row face is merged into a face left open by the row
//!    before it with `merge_up`, which only succeeds when both span exactly the
//!    same columns
//!
//! Faces are only ever merged with exact neighbors of equal key, so the merged
//! layer covers precisely the cells the unit faces covered.

use super::face::Face;

/// Appends `face` to a row, merging it into the last face of the row if they
/// are adjacent and share a key.
///
/// # Arguments
/// * `row` - Faces of the current row, in increasing "right" order
/// * `face` - The next unit face along the row
pub fn push_merged_right(row: &mut Vec<Face>, face: Face) {
    if let Some(last) = row.last_mut() {
        if let Some(merged) = last.merge_right(&face) {
            *last = merged;
            return;
        }
    }
    row.push(face);
}

/// Merges the rows of one layer upwards.
///
/// # Arguments
/// * `rows` - Row faces in increasing "up" order, each row already merged with
///   `push_merged_right`
///
/// # Returns
/// The merged faces, closed in the order they stop growing.
pub fn merge_rows(rows: Vec<Vec<Face>>) -> Vec<Face> {
    let mut faces_to_make = Vec::new();
    let mut open: Vec<Face> = Vec::new();

    for row in rows {
        let mut still_open = Vec::with_capacity(row.len());
        for face in row {
            let merged = open
                .iter()
                .enumerate()
                .find_map(|(index, before)| before.merge_up(&face).map(|m| (index, m)));
            match merged {
                Some((index, merged_face)) => {
                    open.remove(index);
                    still_open.push(merged_face);
                }
                None => still_open.push(face),
            }
        }
        // Whatever did not grow into this row is finished.
        faces_to_make.append(&mut open);
        open = still_open;
    }

    faces_to_make.append(&mut open);
    faces_to_make
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshing::mesh::face::FaceKey;
    use crate::voxels::block::block_side::BlockSide;
    use crate::voxels::block::Voxel;

    fn unit(i: usize, j: usize, material: u8) -> Face {
        let key = FaceKey {
            voxel: Voxel::new(material),
            light: 255,
        };
        Face::new(i, j, 0, key, BlockSide::FRONT)
    }

    fn row(j: usize, materials: &[u8]) -> Vec<Face> {
        let mut row = Vec::new();
        for (i, &material) in materials.iter().enumerate() {
            if material > 0 {
                push_merged_right(&mut row, unit(i, j, material));
            }
        }
        row
    }

    #[test]
    fn full_square_becomes_one_face() {
        let rows = (0..3).map(|j| row(j, &[1, 1, 1])).collect();
        let faces = merge_rows(rows);
        assert_eq!(faces.len(), 1);
        assert_eq!((faces[0].width(), faces[0].height()), (3, 3));
    }

    #[test]
    fn gaps_and_keys_split_faces() {
        // 1 1 0 2
        // 1 1 0 2
        // 1 0 0 2
        let rows = vec![row(0, &[1, 0, 0, 2]), row(1, &[1, 1, 0, 2]), row(2, &[1, 1, 0, 2])];
        let faces = merge_rows(rows);
        let area: usize = faces.iter().map(|f| f.width() * f.height()).sum();
        assert_eq!(area, 8);
        assert_eq!(faces.len(), 3);
        assert!(faces.iter().any(|f| f.key.voxel.material == 2 && f.height() == 3));
    }
}
