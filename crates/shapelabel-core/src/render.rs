//! Backend-agnostic drawing primitives.
//!
//! The core never touches a drawing surface. Shapes and the controller produce
//! lists of [`RenderPrimitive`]s and the host maps them onto whatever canvas it
//! owns.

use kurbo::{Circle, Line, Point};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// RGBA8 color that survives a trip through the JSON config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const ORANGE: Self = Self::rgb(255, 140, 0);
}

impl From<Color> for Rgba8 {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba8> for Color {
    fn from(color: Rgba8) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Outline color and width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgba8,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Rgba8, width: f64) -> Self {
        Self { color, width }
    }
}

/// What a primitive draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Closed outline through the vertices, no fill.
    Polygon(Vec<Point>),
    Line(Line),
    /// Circle outline, no fill.
    Circle(Circle),
    /// Text centered on `anchor`.
    Label {
        anchor: Point,
        text: String,
        font_size: f64,
    },
}

/// One drawable item: geometry plus stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPrimitive {
    pub geometry: Geometry,
    pub color: Rgba8,
    pub width: f64,
}

impl RenderPrimitive {
    pub fn new(geometry: Geometry, stroke: Stroke) -> Self {
        Self {
            geometry,
            color: stroke.color,
            width: stroke.width,
        }
    }

    /// Stroke color as a peniko color for vector backends.
    pub fn peniko_color(&self) -> Color {
        self.color.into()
    }

    pub fn is_label(&self) -> bool {
        matches!(self.geometry, Geometry::Label { .. })
    }
}

/// Styling a shape needs to draw itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    /// Outline of a finished shape, or the segments of one under construction.
    pub stroke: Stroke,
    /// Ring drawn around a polygon's first vertex when a click would close it.
    pub closing_ring: Stroke,
    /// Radius around the first vertex that closes a polygon.
    pub finish_radius: f64,
}
