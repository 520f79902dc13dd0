//! The ordered set of committed shapes for one image.

use crate::error::{AnnotationError, Result};
use crate::shapes::{Shape, dist};
use kurbo::Point;

/// Committed shapes of the current image, in insertion order.
///
/// A shape's index is its position in the set. Indices are never stored, so
/// removing a shape renumbers every shape after it; hosts that show the index
/// (list entries, canvas labels) must refresh everything from the removed index
/// onward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    shapes: Vec<Shape>,
    selected: Option<usize>,
}

impl AnnotationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from already defined shapes, e.g. a decoded label file.
    pub fn from_shapes(shapes: Vec<Shape>) -> Result<Self> {
        if shapes.iter().any(|s| !s.is_defined()) {
            return Err(AnnotationError::InvalidState(
                "annotation sets only hold defined shapes",
            ));
        }
        Ok(Self {
            shapes,
            selected: None,
        })
    }

    /// Append a defined shape and return its index.
    pub fn add(&mut self, shape: Shape) -> Result<usize> {
        if !shape.is_defined() {
            return Err(AnnotationError::InvalidState(
                "only defined shapes can be committed",
            ));
        }
        self.shapes.push(shape);
        Ok(self.shapes.len() - 1)
    }

    /// Remove the shape at `index`; later shapes move down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<Shape> {
        self.check(index)?;
        let shape = self.shapes.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        Ok(shape)
    }

    /// Select the shape at `index`, replacing any previous selection.
    pub fn select_at(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.selected = Some(index);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.and_then(|i| self.shapes.get(i))
    }

    /// Index of the shape whose location is nearest `point`, if within `radius`.
    ///
    /// Ties go to the lowest index.
    pub fn hit_test(&self, point: Point, radius: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, shape) in self.shapes.iter().enumerate() {
            let Some(location) = shape.location() else {
                continue;
            };
            let d = dist(location, point);
            if d <= radius && best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((index, d));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Remove every shape and the selection.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selected = None;
    }

    pub fn get(&self, index: usize) -> Result<&Shape> {
        self.check(index)?;
        Ok(&self.shapes[index])
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Shape> {
        self.check(index)?;
        Ok(&mut self.shapes[index])
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Shape)> {
        self.shapes.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// One list entry per shape: `"<index>: <display>"`.
    pub fn display_labels(&self) -> Vec<String> {
        self.iter()
            .map(|(index, shape)| format!("{}: {}", index, shape))
            .collect()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.shapes.len() {
            Ok(())
        } else {
            Err(AnnotationError::Index {
                index,
                len: self.shapes.len(),
            })
        }
    }
}
