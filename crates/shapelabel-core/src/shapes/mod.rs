//! Annotation shapes.
//!
//! Every shape goes through the same construction lifecycle:
//! empty, then partial while clicks accumulate, then defined once the closing
//! click arrives. A defined shape only changes through [`Shape::set_center`].

mod circle;
mod polygon;

pub use circle::Circle;
pub use polygon::Polygon;

use crate::error::{AnnotationError, ParseError, Result};
use crate::render::{RenderPrimitive, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default distance from a polygon's first vertex that closes it.
pub const FINISH_RADIUS: f64 = 5.0;

/// The kinds of shape the annotator can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Polygon,
    Circle,
}

impl ShapeKind {
    /// Tag used in label files.
    pub fn tag(self) -> &'static str {
        match self {
            ShapeKind::Polygon => "POLY",
            ShapeKind::Circle => "CIRC",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "POLY" => Some(ShapeKind::Polygon),
            "CIRC" => Some(ShapeKind::Circle),
            _ => None,
        }
    }
}

/// Euclidean distance between two points.
pub fn dist(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Snap a point onto the pixel grid.
pub(crate) fn pixel(point: Point) -> Point {
    Point::new(point.x.round(), point.y.round())
}

/// Integer form of a pixel coordinate for text output.
pub(crate) fn coord(value: f64) -> i64 {
    value.round() as i64
}

/// A polygon or circle annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon),
    Circle(Circle),
}

impl Shape {
    /// A fresh, empty shape of the given kind.
    pub fn empty(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Polygon => Shape::Polygon(Polygon::new()),
            ShapeKind::Circle => Shape::Circle(Circle::new()),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Circle(_) => ShapeKind::Circle,
        }
    }

    pub fn is_defined(&self) -> bool {
        match self {
            Shape::Polygon(s) => s.is_defined(),
            Shape::Circle(s) => s.is_defined(),
        }
    }

    /// Reference point used for hit-testing and dragging.
    ///
    /// `None` until the shape is defined.
    pub fn location(&self) -> Option<Point> {
        match self {
            Shape::Polygon(s) => s.location(),
            Shape::Circle(s) => s.location(),
        }
    }

    /// Advance construction with a click.
    pub fn handle_click(&mut self, point: Point) -> Result<()> {
        let point = finite(point)?;
        match self {
            Shape::Polygon(s) => s.handle_click(point),
            Shape::Circle(s) => s.handle_click(point),
        }
    }

    /// Translate a defined shape so its reference point lands on `point`.
    pub fn set_center(&mut self, point: Point) -> Result<()> {
        let point = finite(point)?;
        match self {
            Shape::Polygon(s) => s.set_center(point),
            Shape::Circle(s) => s.set_center(point),
        }
    }

    /// Drawing primitives for the shape.
    ///
    /// `drag_preview` draws a defined shape translated so its location sits on
    /// `mouse`, without touching the stored geometry.
    pub fn render_primitives(
        &self,
        mouse: Option<Point>,
        drag_preview: bool,
        style: &ShapeStyle,
    ) -> Vec<RenderPrimitive> {
        match self {
            Shape::Polygon(s) => s.render_primitives(mouse, drag_preview, style),
            Shape::Circle(s) => s.render_primitives(mouse, drag_preview, style),
        }
    }

    /// Rough diameter, used to size the index label.
    pub fn approx_diameter(&self) -> f64 {
        match self {
            Shape::Polygon(s) => s.approx_diameter(),
            Shape::Circle(s) => s.approx_diameter(),
        }
    }

    /// Label-file token for a defined shape, e.g. `CIRC 20 10 10`.
    pub fn to_parsable(&self) -> String {
        match self {
            Shape::Polygon(s) => s.to_parsable(),
            Shape::Circle(s) => s.to_parsable(),
        }
    }

    /// Parse a label-file token back into a defined shape.
    pub fn parse(token: &str) -> std::result::Result<Self, ParseError> {
        let mut parts = token.split_whitespace();
        let tag = parts.next().unwrap_or_default();
        let kind =
            ShapeKind::from_tag(tag).ok_or_else(|| ParseError::UnknownShapeKind(tag.to_string()))?;

        let fields = parts
            .map(|field| {
                field
                    .parse::<i64>()
                    .map_err(|_| ParseError::MalformedField(field.to_string()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match kind {
            ShapeKind::Polygon => Polygon::from_fields(&fields).map(Shape::Polygon),
            ShapeKind::Circle => Circle::from_fields(&fields).map(Shape::Circle),
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Polygon(s) => s.fmt(f),
            Shape::Circle(s) => s.fmt(f),
        }
    }
}

fn finite(point: Point) -> Result<Point> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(AnnotationError::InvalidState("point has a non-finite coordinate"))
    }
}

pub(crate) fn not_defined() -> AnnotationError {
    AnnotationError::InvalidState("shape is not defined yet")
}

pub(crate) fn already_defined() -> AnnotationError {
    AnnotationError::InvalidState("click dispatched to a shape that is already defined")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist() {
        assert!((dist(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(ShapeKind::from_tag("POLY"), Some(ShapeKind::Polygon));
        assert_eq!(ShapeKind::from_tag("CIRC"), Some(ShapeKind::Circle));
        assert_eq!(ShapeKind::from_tag("poly"), None);
        assert_eq!(ShapeKind::Circle.tag(), "CIRC");
    }

    #[test]
    fn test_parse_unknown_kind() {
        assert_eq!(
            Shape::parse("FOO 1 2"),
            Err(ParseError::UnknownShapeKind("FOO".to_string()))
        );
    }

    #[test]
    fn test_parse_malformed_field() {
        assert_eq!(
            Shape::parse("CIRC 1 two 3"),
            Err(ParseError::MalformedField("two".to_string()))
        );
        assert_eq!(
            Shape::parse("POLY 0 0 10 0 5 8.5"),
            Err(ParseError::MalformedField("8.5".to_string()))
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        for token in ["POLY 0 0 10 0 10 10 0 10", "CIRC 20 10 10", "POLY -5 3 7 9 2 -1"] {
            let shape = Shape::parse(token).unwrap();
            assert!(shape.is_defined());
            assert_eq!(shape.to_parsable(), token);
            assert_eq!(Shape::parse(&shape.to_parsable()).unwrap(), shape);
        }
    }

    #[test]
    fn test_display() {
        let poly = Shape::parse("POLY 0 0 10 0 5 8").unwrap();
        assert_eq!(poly.to_string(), "POLY - points={(0,0),(10,0),(5,8)}");
        let circ = Shape::parse("CIRC 20 10 10").unwrap();
        assert_eq!(circ.to_string(), "CIRC - center=(20,10), radius=10");
    }

    #[test]
    fn test_empty_shapes_are_undefined() {
        for kind in [ShapeKind::Polygon, ShapeKind::Circle] {
            let shape = Shape::empty(kind);
            assert_eq!(shape.kind(), kind);
            assert!(!shape.is_defined());
            assert!(shape.location().is_none());
        }
    }

    #[test]
    fn test_non_finite_points_are_rejected() {
        let mut shape = Shape::empty(ShapeKind::Polygon);
        for bad in [Point::new(f64::NAN, 1.0), Point::new(0.0, f64::INFINITY)] {
            let err = shape.handle_click(bad).unwrap_err();
            assert!(matches!(err, AnnotationError::InvalidState(_)));
        }
        assert_eq!(shape.to_parsable(), "POLY");

        let mut circle = Shape::parse("CIRC 20 10 10").unwrap();
        let err = circle.set_center(Point::new(f64::NEG_INFINITY, 0.0)).unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidState(_)));
        assert_eq!(circle.to_parsable(), "CIRC 20 10 10");
    }

    #[test]
    fn test_dragged_polygon_roundtrips() {
        let mut shape = Shape::parse("POLY 0 0 1 0 0 2 1 2").unwrap();
        shape.set_center(Point::new(-1.0, 1.0)).unwrap();
        assert_eq!(shape.to_parsable(), "POLY -2 0 -1 0 -2 2 -1 2");
        assert_eq!(Shape::parse(&shape.to_parsable()).unwrap(), shape);
    }

    #[test]
    fn test_set_center_requires_defined() {
        let mut shape = Shape::empty(ShapeKind::Circle);
        let err = shape.set_center(Point::new(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidState(_)));
    }
}
