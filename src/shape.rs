//! Filled silhouettes for the field sampler.
//!
//! Shapes live in raster canvas space: a square of [`CANVAS_SIZE`] pixels,
//! origin at the top-left corner, y pointing down. Coverage is reported as an
//! 8-bit alpha so that geometric shapes and image masks share one threshold.
//!
//! # Presets
//!
//! - [`Shape::halo`] - the default disc, 500 px radius at the canvas centre
//! - [`Shape::aperture_logo`] - the six-blade aperture mark
//! - [`Shape::aperture_with_halo`] - the mark inside a thin ring

use std::fmt;
use std::path::Path;

use glam::{Affine2, Vec2};
use image::DynamicImage;

use crate::error::ShapeError;

/// Side length of the square raster canvas, in pixels.
pub const CANVAS_SIZE: f32 = 2000.0;

/// Radius of the default halo disc, in canvas pixels.
pub const HALO_RADIUS: f32 = 500.0;

/// Centre of the raster canvas.
pub fn canvas_center() -> Vec2 {
    Vec2::splat(CANVAS_SIZE * 0.5)
}

/// A filled silhouette in canvas pixel space.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Solid disc.
    Circle { center: Vec2, radius: f32 },
    /// Annulus between two radii.
    Ring {
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
    },
    /// Closed polygon, even-odd fill.
    Polygon(Polygon),
    /// Union of several shapes (maximum coverage wins).
    Union(Vec<Shape>),
    /// Alpha mask decoded from an image.
    Mask(AlphaMask),
}

impl Shape {
    /// Solid disc centred on the canvas.
    pub fn circle(radius: f32) -> Self {
        Shape::Circle {
            center: canvas_center(),
            radius,
        }
    }

    /// The default field shape: a [`HALO_RADIUS`] disc at the canvas centre.
    pub fn halo() -> Self {
        Self::circle(HALO_RADIUS)
    }

    /// The aperture logo fitted into a square of `diameter` pixels at the
    /// canvas centre.
    pub fn aperture_logo(diameter: f32) -> Self {
        let scale = diameter / LOGO_VIEWBOX.max_element();
        let offset = canvas_center() - LOGO_VIEWBOX * 0.5 * scale;

        let parts = aperture_polygons()
            .into_iter()
            .map(|points| {
                let fitted = points.into_iter().map(|p| p * scale + offset).collect();
                Shape::Polygon(Polygon::new(fitted))
            })
            .collect();
        Shape::Union(parts)
    }

    /// Aperture logo surrounded by a thin ring at the halo radius.
    pub fn aperture_with_halo() -> Self {
        Shape::Union(vec![
            Self::aperture_logo(760.0),
            Shape::Ring {
                center: canvas_center(),
                inner_radius: HALO_RADIUS - 60.0,
                outer_radius: HALO_RADIUS,
            },
        ])
    }

    /// Load an image and use its alpha (or luminance) as the silhouette.
    pub fn from_mask_file<P: AsRef<Path>>(path: P) -> Result<Self, ShapeError> {
        AlphaMask::open(path).map(Shape::Mask)
    }

    /// Coverage alpha at a canvas point: 0 is empty, 255 is fully inside.
    pub fn coverage(&self, point: Vec2) -> u8 {
        match self {
            Shape::Circle { center, radius } => {
                solid(point.distance_squared(*center) <= radius * radius)
            }
            Shape::Ring {
                center,
                inner_radius,
                outer_radius,
            } => {
                let d2 = point.distance_squared(*center);
                solid(d2 >= inner_radius * inner_radius && d2 <= outer_radius * outer_radius)
            }
            Shape::Polygon(polygon) => solid(polygon.contains(point)),
            Shape::Union(shapes) => {
                let mut best = 0;
                for shape in shapes {
                    best = best.max(shape.coverage(point));
                    if best == u8::MAX {
                        break;
                    }
                }
                best
            }
            Shape::Mask(mask) => mask.coverage(point),
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::halo()
    }
}

#[inline]
fn solid(inside: bool) -> u8 {
    if inside {
        u8::MAX
    } else {
        0
    }
}

/// Closed polygon with a cached bounding box.
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<Vec2>,
    min: Vec2,
    max: Vec2,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        Self { points, min, max }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Even-odd point-in-polygon test.
    pub fn contains(&self, p: Vec2) -> bool {
        if self.points.len() < 3
            || p.x < self.min.x
            || p.x > self.max.x
            || p.y < self.min.y
            || p.y > self.max.y
        {
            return false;
        }

        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Per-pixel coverage decoded from an image, fitted into the canvas.
///
/// The image is scaled uniformly so its longer side spans the canvas and is
/// centred on the other axis.
#[derive(Clone)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
    origin: Vec2,
    pixel_size: f32,
}

impl AlphaMask {
    /// Build a mask from a decoded image.
    ///
    /// Images with an alpha channel use it directly; opaque images use their
    /// luminance, so white-on-black artwork works as-is. Returns `None` for a
    /// zero-sized image.
    pub fn from_image(image: &DynamicImage) -> Option<Self> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return None;
        }

        let alpha = if image.color().has_alpha() {
            image.to_rgba8().pixels().map(|p| p.0[3]).collect()
        } else {
            image.to_luma8().into_raw()
        };

        let pixel_size = CANVAS_SIZE / width.max(height) as f32;
        let extent = Vec2::new(width as f32, height as f32) * pixel_size;
        Some(Self {
            width,
            height,
            alpha,
            origin: (Vec2::splat(CANVAS_SIZE) - extent) * 0.5,
            pixel_size,
        })
    }

    /// Decode a PNG or JPEG file into a mask.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ShapeError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| ShapeError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "loaded mask {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Self::from_image(&image).ok_or_else(|| ShapeError::EmptyImage {
            path: path.to_path_buf(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn coverage(&self, p: Vec2) -> u8 {
        let local = (p - self.origin) / self.pixel_size;
        if local.x < 0.0 || local.y < 0.0 {
            return 0;
        }
        let (x, y) = (local.x as u32, local.y as u32);
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[(y * self.width + x) as usize]
    }
}

impl fmt::Debug for AlphaMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("origin", &self.origin)
            .field("pixel_size", &self.pixel_size)
            .finish()
    }
}

// ============================================================================
// Aperture logo geometry
// ============================================================================

const LOGO_VIEWBOX: Vec2 = Vec2::new(776.0, 791.0);

const TRIANGLE: [[f32; 2]; 3] = [
    [3753.617, 872.418],
    [3968.203, 772.975],
    [3539.518, 772.975],
];

const BLADE_TOP: [[f32; 2]; 4] = [
    [3798.028, 1010.792],
    [3580.428, 1387.687],
    [3496.267, 1241.917],
    [3629.707, 1010.792],
];

const BLADE: [[f32; 2]; 4] = [
    [3802.816, 1002.499],
    [3580.428, 1387.687],
    [3496.267, 1241.917],
    [3634.495, 1002.499],
];

const BLADE_LAST: [[f32; 2]; 4] = [
    [3801.896, 1004.093],
    [3580.428, 1387.687],
    [3496.267, 1241.917],
    [3633.574, 1004.093],
];

/// SVG `matrix(a, b, c, d, e, f)`.
fn svg_matrix(m: [f32; 6]) -> Affine2 {
    Affine2::from_cols_array(&m)
}

/// The twelve logo pieces in viewBox space (776 x 791, y down).
///
/// Each blade and its notch triangle are authored once and placed with the
/// nested group transforms of the source artwork.
fn aperture_polygons() -> Vec<Vec<Vec2>> {
    let root = Affine2::from_translation(Vec2::new(-1309.0, -375.0));
    let inner_triangle =
        svg_matrix([0.141828, 0.245654, -0.918148, 0.530093, 1208.109042, 762.040648]);
    let inner_blade = svg_matrix([-1.0, 0.0, 0.0, 1.0, 4652.028137, 752.907029]);

    let mut parts: Vec<(Affine2, &[[f32; 2]])> = Vec::with_capacity(12);

    let top = root * svg_matrix([-1.0, 0.0, 0.0, -1.0, 2940.159635, 3421.759912]);
    parts.push((
        top * svg_matrix([-0.283657, 0.0, 0.0, -1.060185, 1986.566459, 3586.496467]),
        &TRIANGLE[..],
    ));
    parts.push((
        top * svg_matrix([0.5, -0.866025, -0.866025, -0.5, 272.516857, 6573.584701]),
        &BLADE_TOP[..],
    ));

    let groups = [
        Affine2::from_translation(Vec2::new(928.787789, -1102.416541)),
        svg_matrix([-0.5, 0.866025, -0.866025, -0.5, 3698.609035, 1040.670676]),
        svg_matrix([-1.0, 0.0, 0.0, -1.0, 2466.761155, 2642.583459]),
        svg_matrix([-0.5, -0.866025, 0.866025, -0.5, 460.540474, 2373.330294]),
    ];
    for group in groups {
        let placed = root * group;
        parts.push((placed * inner_triangle, &TRIANGLE[..]));
        parts.push((placed * inner_blade, &BLADE[..]));
    }

    let last = root * svg_matrix([0.5, 0.866025, -0.866025, 0.5, 2946.269668, -894.746835]);
    parts.push((
        last * svg_matrix([0.141828, 0.245654, -0.918148, 0.530093, 1255.802617, 803.432953]),
        &TRIANGLE[..],
    ));
    parts.push((
        last * svg_matrix([-1.0, 0.0, 0.0, 1.0, 4699.721712, 794.299334]),
        &BLADE_LAST[..],
    ));

    parts
        .into_iter()
        .map(|(transform, points)| {
            points
                .iter()
                .map(|&[x, y]| transform.transform_point2(Vec2::new(x, y)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn test_circle_coverage() {
        let shape = Shape::halo();
        let c = canvas_center();
        assert_eq!(shape.coverage(c), 255);
        assert_eq!(shape.coverage(c + Vec2::new(499.0, 0.0)), 255);
        assert_eq!(shape.coverage(c + Vec2::new(501.0, 0.0)), 0);
        assert_eq!(shape.coverage(Vec2::ZERO), 0);
    }

    #[test]
    fn test_ring_has_hole() {
        let shape = Shape::Ring {
            center: canvas_center(),
            inner_radius: 100.0,
            outer_radius: 200.0,
        };
        let c = canvas_center();
        assert_eq!(shape.coverage(c), 0);
        assert_eq!(shape.coverage(c + Vec2::new(150.0, 0.0)), 255);
        assert_eq!(shape.coverage(c + Vec2::new(0.0, 250.0)), 0);
    }

    #[test]
    fn test_polygon_even_odd() {
        let square = Polygon::new(vec![
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(10.0, 20.0),
        ]);
        assert!(square.contains(Vec2::new(15.0, 15.0)));
        assert!(!square.contains(Vec2::new(25.0, 15.0)));
        assert!(!square.contains(Vec2::new(15.0, 5.0)));

        let degenerate = Polygon::new(vec![Vec2::ZERO, Vec2::ONE]);
        assert!(!degenerate.contains(Vec2::splat(0.5)));
    }

    #[test]
    fn test_union_takes_max() {
        let c = canvas_center();
        let shape = Shape::Union(vec![
            Shape::Circle { center: c - Vec2::new(300.0, 0.0), radius: 50.0 },
            Shape::Circle { center: c + Vec2::new(300.0, 0.0), radius: 50.0 },
        ]);
        assert_eq!(shape.coverage(c - Vec2::new(300.0, 0.0)), 255);
        assert_eq!(shape.coverage(c + Vec2::new(300.0, 0.0)), 255);
        assert_eq!(shape.coverage(c), 0);
        assert_eq!(Shape::Union(Vec::new()).coverage(c), 0);
    }

    #[test]
    fn test_logo_fits_requested_diameter() {
        let diameter = 800.0;
        let Shape::Union(parts) = Shape::aperture_logo(diameter) else {
            panic!("logo should be a union");
        };
        assert_eq!(parts.len(), 12);

        let c = canvas_center();
        let half = diameter * 0.5 + 1.0;
        for part in &parts {
            let Shape::Polygon(polygon) = part else {
                panic!("logo parts should be polygons");
            };
            for p in polygon.points() {
                assert!((p.x - c.x).abs() <= half, "x out of box: {:?}", p);
                assert!((p.y - c.y).abs() <= half, "y out of box: {:?}", p);
            }
        }
    }

    #[test]
    fn test_logo_has_coverage() {
        let logo = Shape::aperture_logo(800.0);
        let covered = (0..200)
            .flat_map(|y| (0..200).map(move |x| Vec2::new(x as f32 * 10.0, y as f32 * 10.0)))
            .filter(|&p| logo.coverage(p) > 128)
            .count();
        assert!(covered > 100, "logo covered only {covered} probe points");
    }

    #[test]
    fn test_mask_uses_alpha_channel() {
        let image = RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([255, 255, 255, 0])
            }
        });
        let mask = AlphaMask::from_image(&DynamicImage::ImageRgba8(image)).unwrap();
        let shape = Shape::Mask(mask);

        // 4x4 image spans the whole canvas, 500 px per image pixel.
        assert_eq!(shape.coverage(Vec2::new(100.0, 100.0)), 255);
        assert_eq!(shape.coverage(Vec2::new(1900.0, 100.0)), 0);
        assert_eq!(shape.coverage(Vec2::new(-5.0, 100.0)), 0);
    }

    #[test]
    fn test_mask_falls_back_to_luminance_and_centres() {
        // Wide image: 2:1, centred vertically.
        let image = GrayImage::from_pixel(2, 1, Luma([200]));
        let mask = AlphaMask::from_image(&DynamicImage::ImageLuma8(image)).unwrap();
        let shape = Shape::Mask(mask);

        assert_eq!(shape.coverage(canvas_center()), 200);
        assert_eq!(shape.coverage(Vec2::new(1000.0, 100.0)), 0);
        assert_eq!(shape.coverage(Vec2::new(1000.0, 1900.0)), 0);
    }

    #[test]
    fn test_missing_mask_file_is_an_error() {
        let err = Shape::from_mask_file("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ShapeError::Image { .. }));
    }
}
