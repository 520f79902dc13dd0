//! Polygon shape.

use super::{FINISH_RADIUS, already_defined, coord, dist, not_defined, pixel};
use crate::error::{ParseError, Result};
use crate::render::{Geometry, RenderPrimitive, ShapeStyle};
use kurbo::{Circle as KurboCircle, Line, Point, Vec2};
use std::f64::consts::PI;
use std::fmt;

/// Minimum number of vertices a polygon needs before it can close.
pub const MIN_VERTICES: usize = 3;

/// A closed polygon built vertex by vertex.
///
/// The first vertex doubles as the closing anchor: clicking near it once at
/// least [`MIN_VERTICES`] are placed finishes the polygon.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Vertices in insertion order.
    points: Vec<Point>,
    /// Rounded centroid, set once the polygon is defined.
    location: Option<Point>,
    finish_radius: f64,
}

impl Default for Polygon {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && self.location == other.location
    }
}

impl Polygon {
    /// Create an empty polygon.
    pub fn new() -> Self {
        Self::with_finish_radius(FINISH_RADIUS)
    }

    /// Create an empty polygon that closes within `finish_radius` of its first vertex.
    pub fn with_finish_radius(finish_radius: f64) -> Self {
        Self {
            points: Vec::new(),
            location: None,
            finish_radius,
        }
    }

    /// Create a defined polygon from its vertices.
    pub fn from_points(points: Vec<Point>) -> Result<Self> {
        if points.len() < MIN_VERTICES {
            return Err(not_defined());
        }
        let mut polygon = Self::new();
        polygon.points = points.into_iter().map(pixel).collect();
        polygon.location = Some(centroid(&polygon.points));
        Ok(polygon)
    }

    pub(super) fn from_fields(fields: &[i64]) -> std::result::Result<Self, ParseError> {
        if fields.len() % 2 != 0 || fields.len() < MIN_VERTICES * 2 {
            return Err(ParseError::FieldCount {
                kind: "POLY",
                found: fields.len(),
            });
        }
        let points = fields
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0] as f64, xy[1] as f64))
            .collect::<Vec<_>>();
        let mut polygon = Self::new();
        polygon.location = Some(centroid(&points));
        polygon.points = points;
        Ok(polygon)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_defined(&self) -> bool {
        self.location.is_some()
    }

    pub fn location(&self) -> Option<Point> {
        self.location
    }

    pub fn finish_radius(&self) -> f64 {
        self.finish_radius
    }

    /// Whether a click at `point` would close the polygon.
    pub fn closes_at(&self, point: Point) -> bool {
        self.points.len() >= MIN_VERTICES
            && self
                .points
                .first()
                .is_some_and(|first| dist(*first, point) <= self.finish_radius)
    }

    pub(super) fn handle_click(&mut self, point: Point) -> Result<()> {
        if self.is_defined() {
            return Err(already_defined());
        }
        let point = pixel(point);
        if self.closes_at(point) {
            let location = centroid(&self.points);
            log::debug!(
                "polygon closed with {} vertices at ({}, {})",
                self.points.len(),
                location.x,
                location.y
            );
            self.location = Some(location);
        } else {
            self.points.push(point);
        }
        Ok(())
    }

    pub(super) fn set_center(&mut self, point: Point) -> Result<()> {
        let location = self.location.ok_or_else(not_defined)?;
        let point = pixel(point);
        let offset = point - location;
        for p in &mut self.points {
            *p += offset;
        }
        // location stays the rounded centroid of the stored points
        self.location = Some(centroid(&self.points));
        Ok(())
    }

    pub(super) fn render_primitives(
        &self,
        mouse: Option<Point>,
        drag_preview: bool,
        style: &ShapeStyle,
    ) -> Vec<RenderPrimitive> {
        if let Some(location) = self.location {
            let offset = match (drag_preview, mouse) {
                (true, Some(mouse)) => mouse - location,
                _ => Vec2::ZERO,
            };
            let points = self.points.iter().map(|p| *p + offset).collect();
            return vec![RenderPrimitive::new(Geometry::Polygon(points), style.stroke)];
        }

        let mut prims: Vec<RenderPrimitive> = self
            .points
            .windows(2)
            .map(|w| RenderPrimitive::new(Geometry::Line(Line::new(w[0], w[1])), style.stroke))
            .collect();

        if let (Some(mouse), Some(last)) = (mouse, self.points.last()) {
            prims.push(RenderPrimitive::new(
                Geometry::Line(Line::new(*last, mouse)),
                style.stroke,
            ));
            if self.closes_at(mouse) {
                prims.push(RenderPrimitive::new(
                    Geometry::Circle(KurboCircle::new(self.points[0], style.finish_radius)),
                    style.closing_ring,
                ));
            }
        }
        prims
    }

    /// Mean pairwise vertex distance scaled to a diameter.
    ///
    /// For a regular polygon the mean vertex distance is about `2/π` of the
    /// circumscribed diameter; `1 - e^(-n/6)` damps the estimate for polygons
    /// with few vertices, where that ratio does not hold.
    pub(super) fn approx_diameter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for (i, a) in self.points.iter().enumerate() {
            for b in &self.points[i + 1..] {
                total += dist(*a, *b);
            }
        }
        let pairs = (n * (n - 1) / 2) as f64;
        let mean = total / pairs;
        mean * PI / 2.0 * (1.0 - (-(n as f64) / 6.0).exp())
    }

    pub(super) fn to_parsable(&self) -> String {
        let mut s = String::from("POLY");
        for p in &self.points {
            s.push_str(&format!(" {} {}", coord(p.x), coord(p.y)));
        }
        s
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let points = self
            .points
            .iter()
            .map(|p| format!("({},{})", coord(p.x), coord(p.y)))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "POLY - points={{{}}}", points)
    }
}

/// Arithmetic mean of the vertices, rounded to whole pixels.
fn centroid(points: &[Point]) -> Point {
    let n = points.len().max(1) as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new((sx / n).round(), (sy / n).round())
}
