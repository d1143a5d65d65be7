use image::imageops::overlay;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;

use crate::error::{RecognitionError, Result};

/// Outer boundary of one connected foreground component.
#[derive(Debug, Clone)]
pub struct GlyphContour {
    /// Position in discovery (raster scan) order
    pub index: usize,
    pub points: Vec<Point<i32>>,
}

impl GlyphContour {
    /// Area enclosed by the boundary chain (shoelace formula)
    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }

    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        arc_length(&self.points, true)
    }
}

/// Inclusive axis-aligned rectangle: `w` and `h` count pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Find the outermost contours of the mask's foreground.
///
/// Holes and anything nested inside a hole (the inside of a "0", a dot
/// drawn in it) are not returned. Pixels outside the frame count as
/// background, so strokes touching the border are traced like any other.
pub fn find_external_contours(mask: &GrayImage) -> Vec<GlyphContour> {
    // find_contours takes the frame itself as the outermost border
    let mut framed = GrayImage::from_pixel(mask.width() + 2, mask.height() + 2, Luma([0]));
    overlay(&mut framed, mask, 1, 1);

    find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .enumerate()
        .map(|(index, c)| GlyphContour {
            index,
            points: c
                .points
                .into_iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect(),
        })
        .collect()
}

pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    (twice as f64 / 2.0).abs()
}

/// Bounding rectangle of the contour's simplified polygon.
///
/// The polygon is simplified first with a tolerance of
/// `epsilon_ratio * perimeter`; chains too short to simplify are used as is.
pub fn bounding_rect(contour: &GlyphContour, epsilon_ratio: f64) -> Result<BoundingRect> {
    let degenerate = RecognitionError::DegenerateContour {
        index: contour.index,
    };

    let epsilon = epsilon_ratio * contour.perimeter();
    let mut approx = Vec::new();
    if contour.points.len() >= 3 && epsilon > 0.0 {
        approx = approximate_polygon_dp(&contour.points, epsilon, true);
    }
    if approx.len() < 3 {
        approx = contour.points.clone();
    }

    let xs = approx.iter().map(|p| p.x);
    let ys = approx.iter().map(|p| p.y);
    let (Some(min_x), Some(max_x)) = (xs.clone().min(), xs.max()) else {
        return Err(degenerate);
    };
    let (Some(min_y), Some(max_y)) = (ys.clone().min(), ys.max()) else {
        return Err(degenerate);
    };
    if min_x < 0 || min_y < 0 {
        return Err(degenerate);
    }

    Ok(BoundingRect {
        x: min_x as u32,
        y: min_y as u32,
        w: (max_x - min_x + 1) as u32,
        h: (max_y - min_y + 1) as u32,
    })
}
