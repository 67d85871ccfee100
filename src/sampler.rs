//! Field sampler: turns a [`Shape`] into a point cloud.
//!
//! The shape is scanned on a coarse grid over the raster canvas. Every cell
//! whose coverage clears the alpha threshold becomes a candidate; candidates
//! are then picked at an even stride until the requested count is reached,
//! topping up with random picks when the shape is too sparse.
//!
//! ```ignore
//! use prism_field::{FieldSampler, Shape};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let points = FieldSampler::default().sample(&Shape::halo(), 9000, &mut rng);
//! assert_eq!(points.len(), 9000);
//! ```

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::shape::{canvas_center, Shape, CANVAS_SIZE};

/// Raster settings for the field sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Scan every n-th canvas pixel in both axes.
    pub cell_step: u32,
    /// World units per canvas pixel.
    pub world_scale: f32,
    /// Cells with coverage strictly above this are candidates.
    pub alpha_threshold: u8,
    /// Total depth spread; each point gets `z` in `[-depth_range/2, depth_range/2)`.
    pub depth_range: f32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            cell_step: 3,
            world_scale: 0.1,
            alpha_threshold: 128,
            depth_range: 8.0,
        }
    }
}

/// A rest coordinate produced by the sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// `x`, `y` from the shape, `z` randomized depth.
    pub position: Vec3,
}

/// Converts shapes into [`SamplePoint`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSampler {
    raster: RasterConfig,
}

impl FieldSampler {
    pub fn new(raster: RasterConfig) -> Self {
        Self { raster }
    }

    pub fn raster(&self) -> &RasterConfig {
        &self.raster
    }

    /// World-space `(x, y)` of every covered cell, in scan order (rows top to
    /// bottom, columns left to right).
    pub fn coverage_cells(&self, shape: &Shape) -> Vec<Vec2> {
        let step = self.raster.cell_step.max(1) as usize;
        let size = CANVAS_SIZE as u32;
        let center = canvas_center();
        let scale = self.raster.world_scale;

        let mut cells = Vec::new();
        for y in (0..size).step_by(step) {
            for x in (0..size).step_by(step) {
                let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if shape.coverage(pixel) > self.raster.alpha_threshold {
                    cells.push(Vec2::new(
                        (x as f32 - center.x) * scale,
                        (center.y - y as f32) * scale,
                    ));
                }
            }
        }
        cells
    }

    /// Sample exactly `count` points from `shape`.
    ///
    /// Returns an empty set when `count` is zero or the shape covers no cell.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        shape: &Shape,
        count: usize,
        rng: &mut R,
    ) -> Vec<SamplePoint> {
        let cells = self.coverage_cells(shape);
        self.sample_cells(&cells, count, rng)
    }

    /// Pick `count` points from precomputed coverage cells.
    pub fn sample_cells<R: Rng + ?Sized>(
        &self,
        cells: &[Vec2],
        count: usize,
        rng: &mut R,
    ) -> Vec<SamplePoint> {
        if count == 0 {
            return Vec::new();
        }
        if cells.is_empty() {
            log::warn!(
                "shape has no coverage cells above alpha {}; field will be empty",
                self.raster.alpha_threshold
            );
            return Vec::new();
        }

        let stride = (cells.len() / count).max(1);
        let mut points: Vec<SamplePoint> = Vec::with_capacity(count);
        for cell in cells.iter().step_by(stride).take(count) {
            points.push(self.point_at(*cell, rng));
        }

        let filled = count - points.len();
        if filled > 0 {
            log::debug!(
                "{} coverage cells for {} particles; filling {} at random",
                cells.len(),
                count,
                filled
            );
        }
        while points.len() < count {
            let cell = cells[rng.gen_range(0..cells.len())];
            points.push(self.point_at(cell, rng));
        }

        points
    }

    fn point_at<R: Rng + ?Sized>(&self, cell: Vec2, rng: &mut R) -> SamplePoint {
        let z = (rng.gen::<f32>() - 0.5) * self.raster.depth_range;
        SamplePoint {
            position: cell.extend(z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_exact_count_from_dense_shape() {
        let sampler = FieldSampler::default();
        let points = sampler.sample(&Shape::halo(), 9000, &mut rng());
        assert_eq!(points.len(), 9000);
    }

    #[test]
    fn test_points_come_from_coverage_cells() {
        let sampler = FieldSampler::default();
        let shape = Shape::circle(120.0);
        let cells = sampler.coverage_cells(&shape);
        let points = sampler.sample(&shape, 500, &mut rng());

        for p in &points {
            assert!(cells.contains(&p.position.truncate()));
        }
    }

    #[test]
    fn test_depth_within_range() {
        let sampler = FieldSampler::default();
        for p in sampler.sample(&Shape::halo(), 2000, &mut rng()) {
            assert!(p.position.z >= -4.0 && p.position.z < 4.0);
        }
    }

    #[test]
    fn test_sparse_shape_tops_up_randomly() {
        let sampler = FieldSampler::default();
        let shape = Shape::circle(6.0);
        let cells = sampler.coverage_cells(&shape);
        assert!(!cells.is_empty() && cells.len() < 50);

        let points = sampler.sample(&shape, 200, &mut rng());
        assert_eq!(points.len(), 200);
        for p in &points {
            assert!(cells.contains(&p.position.truncate()));
        }
    }

    #[test]
    fn test_stride_spreads_across_shape() {
        let sampler = FieldSampler::default();
        let cells: Vec<Vec2> = (0..100).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let points = sampler.sample_cells(&cells, 10, &mut rng());

        let xs: Vec<f32> = points.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]);
    }

    #[test]
    fn test_empty_shape_yields_no_points() {
        let sampler = FieldSampler::default();
        let shape = Shape::Union(Vec::new());
        assert!(sampler.sample(&shape, 100, &mut rng()).is_empty());
    }

    #[test]
    fn test_zero_count() {
        let sampler = FieldSampler::default();
        assert!(sampler.sample(&Shape::halo(), 0, &mut rng()).is_empty());
    }

    #[test]
    fn test_world_mapping_flips_y() {
        let sampler = FieldSampler::default();
        // Small disc above the canvas centre (smaller y in canvas space).
        let shape = Shape::Circle {
            center: canvas_center() - Vec2::new(0.0, 300.0),
            radius: 20.0,
        };
        let cells = sampler.coverage_cells(&shape);
        assert!(!cells.is_empty());
        for c in cells {
            assert!(c.y > 25.0 && c.y < 35.0, "cell {c:?} should sit near y = 30");
            assert!(c.x.abs() < 2.5);
        }
    }

    #[test]
    fn test_same_seed_same_points() {
        let sampler = FieldSampler::default();
        let shape = Shape::circle(40.0);
        let a = sampler.sample(&shape, 300, &mut rng());
        let b = sampler.sample(&shape, 300, &mut rng());
        assert_eq!(a, b);
    }
}
