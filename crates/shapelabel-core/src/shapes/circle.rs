//! Circle shape.

use super::{already_defined, coord, dist, not_defined, pixel};
use crate::error::{ParseError, Result};
use crate::render::{Geometry, RenderPrimitive, ShapeStyle};
use kurbo::{Circle as KurboCircle, Point};
use std::fmt;

/// A circle defined by two clicks on opposite ends of a diameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Circle {
    center: Point,
    radius: f64,
    /// First click of the construction, cleared once the circle is defined.
    start: Option<Point>,
    defined: bool,
}

impl Circle {
    /// Create an empty circle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a defined circle.
    pub fn from_center(center: Point, radius: f64) -> Self {
        Self {
            center: pixel(center),
            radius: radius.round(),
            start: None,
            defined: true,
        }
    }

    pub(super) fn from_fields(fields: &[i64]) -> std::result::Result<Self, ParseError> {
        match *fields {
            [cx, cy, r] if r >= 0 => Ok(Self::from_center(
                Point::new(cx as f64, cy as f64),
                r as f64,
            )),
            [_, _, r] => Err(ParseError::MalformedField(r.to_string())),
            _ => Err(ParseError::FieldCount {
                kind: "CIRC",
                found: fields.len(),
            }),
        }
    }

    /// Circle whose diameter runs from `a` to `b`, rounded to whole pixels.
    pub fn through(a: Point, b: Point) -> KurboCircle {
        KurboCircle::new(pixel(a.midpoint(b)), (dist(a, b) / 2.0).round())
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Anchor recorded by the first construction click.
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn is_defined(&self) -> bool {
        self.defined
    }

    pub fn location(&self) -> Option<Point> {
        self.defined.then_some(self.center)
    }

    pub(super) fn handle_click(&mut self, point: Point) -> Result<()> {
        if self.defined {
            return Err(already_defined());
        }
        let point = pixel(point);
        match self.start.take() {
            Some(start) => {
                let circle = Self::through(start, point);
                self.center = circle.center;
                self.radius = circle.radius;
                self.defined = true;
                log::debug!(
                    "circle defined at ({}, {}) r={}",
                    self.center.x,
                    self.center.y,
                    self.radius
                );
            }
            None => self.start = Some(point),
        }
        Ok(())
    }

    pub(super) fn set_center(&mut self, point: Point) -> Result<()> {
        if !self.defined {
            return Err(not_defined());
        }
        self.center = pixel(point);
        Ok(())
    }

    pub(super) fn render_primitives(
        &self,
        mouse: Option<Point>,
        drag_preview: bool,
        style: &ShapeStyle,
    ) -> Vec<RenderPrimitive> {
        if self.defined {
            let center = match (drag_preview, mouse) {
                (true, Some(mouse)) => mouse,
                _ => self.center,
            };
            return vec![RenderPrimitive::new(
                Geometry::Circle(KurboCircle::new(center, self.radius)),
                style.stroke,
            )];
        }
        match (self.start, mouse) {
            (Some(start), Some(mouse)) => vec![RenderPrimitive::new(
                Geometry::Circle(Self::through(start, mouse)),
                style.stroke,
            )],
            _ => Vec::new(),
        }
    }

    pub(super) fn approx_diameter(&self) -> f64 {
        if self.defined { 2.0 * self.radius } else { 0.0 }
    }

    pub(super) fn to_parsable(&self) -> String {
        format!(
            "CIRC {} {} {}",
            coord(self.center.x),
            coord(self.center.y),
            coord(self.radius)
        )
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CIRC - center=({},{}), radius={}",
            coord(self.center.x),
            coord(self.center.y),
            coord(self.radius)
        )
    }
}
