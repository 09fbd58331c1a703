//! # Raycast Module
//!
//! Voxel traversal along a ray (Amanatides & Woo, "A Fast Voxel Traversal
//! Algorithm for Ray Tracing"). The ray visits every voxel it passes through in
//! order, so the first solid one found is the one the ray actually hits.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::world::World;

/// The first solid voxel along a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastHit {
    /// World coordinate of the voxel that was hit.
    pub position: Point3<i32>,
    /// The face the ray entered through. `None` when the ray starts inside the voxel.
    pub side: Option<BlockSide>,
    /// Distance from the origin to the entry point, along the normalized direction.
    pub distance: f32,
}

impl RaycastHit {
    /// The empty voxel in front of the hit face, where a new voxel would be placed.
    pub fn placement(&self) -> Option<Point3<i32>> {
        let [dx, dy, dz] = self.side?.offset();
        Some(Point3::new(
            self.position.x + dx,
            self.position.y + dy,
            self.position.z + dz,
        ))
    }
}

impl World {
    /// Walks the ray from `origin` along `direction` and returns the first solid voxel
    /// within `max_distance`.
    ///
    /// # Returns
    /// `None` if nothing solid is found within range, if the direction is zero, if
    /// any input is NaN or infinite, or once the ray has left the world vertically
    /// and keeps moving away from it.
    pub fn raycast(
        &self,
        max_distance: f32,
        origin: Point3<f32>,
        direction: Vector3<f32>,
    ) -> Option<RaycastHit> {
        let finite = [origin.x, origin.y, origin.z, direction.x, direction.y, direction.z]
            .iter()
            .all(|v| v.is_finite());
        if !finite || !max_distance.is_finite() || direction.magnitude2() == 0.0 {
            return None;
        }
        let direction = direction.normalize();
        let height = self.height();

        let mut voxel = [
            origin.x.floor() as i32,
            origin.y.floor() as i32,
            origin.z.floor() as i32,
        ];
        let origin = [origin.x, origin.y, origin.z];
        let direction = [direction.x, direction.y, direction.z];

        if self.is_solid(voxel[0], voxel[1], voxel[2]) {
            return Some(RaycastHit {
                position: Point3::new(voxel[0], voxel[1], voxel[2]),
                side: None,
                distance: 0.0,
            });
        }

        let mut step = [0i32; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];
        for axis in 0..3 {
            if direction[axis] > 0.0 {
                step[axis] = 1;
                t_max[axis] = (voxel[axis] as f32 + 1.0 - origin[axis]) / direction[axis];
                t_delta[axis] = 1.0 / direction[axis];
            } else if direction[axis] < 0.0 {
                step[axis] = -1;
                t_max[axis] = (voxel[axis] as f32 - origin[axis]) / direction[axis];
                t_delta[axis] = -1.0 / direction[axis];
            }
        }

        loop {
            let axis = if t_max[0] < t_max[1] {
                if t_max[0] < t_max[2] {
                    0
                } else {
                    2
                }
            } else if t_max[1] < t_max[2] {
                1
            } else {
                2
            };

            let distance = t_max[axis];
            if distance > max_distance {
                return None;
            }

            voxel[axis] += step[axis];
            t_max[axis] += t_delta[axis];

            if (voxel[1] < 0 && step[1] <= 0) || (voxel[1] >= height && step[1] >= 0) {
                return None;
            }

            if self.is_solid(voxel[0], voxel[1], voxel[2]) {
                return Some(RaycastHit {
                    position: Point3::new(voxel[0], voxel[1], voxel[2]),
                    side: Some(BlockSide::entered_through(axis, step[axis])),
                    distance,
                });
            }
        }
    }
}
