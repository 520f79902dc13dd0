//! Pointer-driven interaction state machine.
//!
//! The controller turns raw pointer events into annotations. With no shape
//! under construction a press either selects the nearest shape (arming a drag)
//! or, when a shape kind is chosen, starts a new shape. While constructing,
//! every press is forwarded to the pending shape until it becomes defined and
//! is committed to the [`AnnotationSet`].
//!
//! The controller never touches storage. Transitions that change the set
//! report a [`Change`] and the caller persists it.

use crate::annotations::AnnotationSet;
use crate::config::AnnotatorConfig;
use crate::error::Result;
use crate::render::{Geometry, RenderPrimitive, Stroke};
use crate::shapes::{Circle, Polygon, Shape, ShapeKind};
use kurbo::{Circle as KurboCircle, Line, Point, Size};

/// What a transition did to the annotation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The set is untouched; only the view may need a redraw.
    Unchanged,
    /// A shape was committed at this index.
    Added(usize),
    /// The shape at this index was removed; every later shape was renumbered.
    Removed(usize),
    /// The shape at this index was dragged to a new location.
    Moved(usize),
    /// Every shape was removed.
    Cleared,
}

impl Change {
    /// Whether the set must be written back to its label file.
    pub fn needs_save(self) -> bool {
        !matches!(self, Change::Unchanged)
    }

    /// First index whose display entry is stale after this change.
    pub fn first_stale_index(self) -> Option<usize> {
        match self {
            Change::Unchanged => None,
            Change::Added(i) | Change::Removed(i) | Change::Moved(i) => Some(i),
            Change::Cleared => Some(0),
        }
    }
}

/// Coarse interaction mode, derived from [`InteractionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Constructing,
    Selected(usize),
    Dragging(usize),
}

/// Ephemeral per-image interaction state.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Shape under construction, not yet part of the set.
    pub pending: Option<Shape>,
    /// Kind of shape a press on empty canvas starts.
    pub kind: Option<ShapeKind>,
    /// A press on a shape is being held.
    pub pressed: bool,
    /// The held press has moved; release commits the new location.
    pub dragging: bool,
    /// Shape a click at the pointer would select.
    pub hover: Option<usize>,
    /// Last known pointer position.
    pub mouse: Option<Point>,
}

/// Drives shape construction, selection and dragging for one image.
#[derive(Debug, Clone)]
pub struct InteractionController {
    annotations: AnnotationSet,
    state: InteractionState,
    config: AnnotatorConfig,
    /// Extent of the displayed image; enables the pointer crosshair.
    canvas: Option<Size>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(AnnotatorConfig::default())
    }
}

impl InteractionController {
    pub fn new(config: AnnotatorConfig) -> Self {
        Self {
            annotations: AnnotationSet::new(),
            state: InteractionState::default(),
            config,
            canvas: None,
        }
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn canvas_size(&self) -> Option<Size> {
        self.canvas
    }

    /// Set the displayed image's extent. `None` turns the crosshair off.
    pub fn set_canvas_size(&mut self, size: Option<Size>) {
        self.canvas = size;
    }

    pub fn pending(&self) -> Option<&Shape> {
        self.state.pending.as_ref()
    }

    pub fn mode(&self) -> Mode {
        if self.state.pending.is_some() {
            return Mode::Constructing;
        }
        match self.annotations.selected() {
            Some(i) if self.state.dragging => Mode::Dragging(i),
            Some(i) => Mode::Selected(i),
            None => Mode::Idle,
        }
    }

    /// Swap in the annotations of a newly opened image.
    ///
    /// All interaction state except the chosen shape kind is dropped.
    pub fn reset(&mut self, annotations: AnnotationSet) {
        self.annotations = annotations;
        self.state = InteractionState {
            kind: self.state.kind,
            ..InteractionState::default()
        };
    }

    /// Choose the kind of shape new presses start. Discards a pending shape.
    pub fn select_kind(&mut self, kind: Option<ShapeKind>) {
        if self.state.pending.take().is_some() {
            log::debug!("pending shape discarded on kind change");
        }
        self.state.kind = kind;
    }

    pub fn pointer_down(&mut self, point: Point) -> Result<Change> {
        self.state.mouse = Some(point);

        if let Some(shape) = self.state.pending.as_mut() {
            shape.handle_click(point)?;
            if shape.is_defined() {
                return self.commit_pending();
            }
            return Ok(Change::Unchanged);
        }

        match self.annotations.hit_test(point, self.config.select_radius) {
            Some(index) if self.annotations.selected() == Some(index) => {
                log::debug!("shape {} deselected", index);
                self.annotations.deselect();
            }
            Some(index) => {
                log::debug!("shape {} selected", index);
                self.annotations.select_at(index)?;
                self.state.pressed = true;
            }
            None => {
                self.annotations.deselect();
                if let Some(kind) = self.state.kind {
                    let mut shape = self.new_shape(kind);
                    shape.handle_click(point)?;
                    self.state.pending = Some(shape);
                }
            }
        }
        Ok(Change::Unchanged)
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.state.mouse = Some(point);
        self.state.hover = self.annotations.hit_test(point, self.config.select_radius);
        if self.state.pressed && self.annotations.selected().is_some() {
            self.state.dragging = true;
        }
    }

    pub fn pointer_up(&mut self, point: Point) -> Result<Change> {
        self.state.mouse = Some(point);
        let was_dragging = self.state.dragging;
        self.state.pressed = false;
        self.state.dragging = false;

        match self.annotations.selected() {
            Some(index) if was_dragging => {
                self.annotations.get_mut(index)?.set_center(point)?;
                log::debug!("shape {} moved to ({}, {})", index, point.x, point.y);
                Ok(Change::Moved(index))
            }
            _ => Ok(Change::Unchanged),
        }
    }

    /// Remove the selected shape, if any.
    pub fn delete_selected(&mut self) -> Result<Change> {
        let Some(index) = self.annotations.selected() else {
            return Ok(Change::Unchanged);
        };
        self.annotations.remove_at(index)?;
        self.state.pressed = false;
        self.state.dragging = false;
        self.state.hover = None;
        log::debug!("shape {} deleted", index);
        Ok(Change::Removed(index))
    }

    /// Drop the pending shape or an in-progress drag.
    ///
    /// Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.state.pending.take().is_some() || self.state.dragging;
        self.state.pressed = false;
        self.state.dragging = false;
        cancelled
    }

    /// Remove every shape.
    pub fn clear(&mut self) -> Change {
        self.reset(AnnotationSet::new());
        Change::Cleared
    }

    pub fn display_labels(&self) -> Vec<String> {
        self.annotations.display_labels()
    }

    /// Everything to draw for the current pointer position.
    ///
    /// Committed shapes come first, each followed by its index label, then the
    /// drag ring and the pending shape's preview. The crosshair, when a canvas
    /// size is set, is drawn last.
    pub fn render_primitives(&self) -> Vec<RenderPrimitive> {
        let style = &self.config.style;
        let mouse = self.state.mouse;
        let selected = self.annotations.selected();
        let mut prims = Vec::new();

        for (index, shape) in self.annotations.iter() {
            let is_selected = selected == Some(index);
            let dragging = is_selected && self.state.dragging && mouse.is_some();
            let stroke = if is_selected {
                style.selected
            } else if self.state.hover == Some(index) {
                style.hover
            } else {
                style.outline
            };
            let shape_style = style.shape_style(stroke, self.config.finish_radius);
            prims.extend(shape.render_primitives(mouse, dragging, &shape_style));

            let anchor = if dragging { mouse } else { shape.location() };
            if let Some(anchor) = anchor {
                prims.push(RenderPrimitive::new(
                    Geometry::Label {
                        anchor,
                        text: index.to_string(),
                        font_size: style.label_font_size(shape.approx_diameter()),
                    },
                    Stroke::new(style.label_color, 1.0),
                ));
            }
        }

        if let (true, Some(mouse)) = (self.state.dragging, mouse) {
            prims.push(RenderPrimitive::new(
                Geometry::Circle(KurboCircle::new(mouse, self.config.select_radius)),
                style.drag_ring,
            ));
        }

        if let Some(pending) = &self.state.pending {
            let shape_style = style.shape_style(style.construction, self.config.finish_radius);
            prims.extend(pending.render_primitives(mouse, false, &shape_style));
        }

        if let (Some(size), Some(mouse)) = (self.canvas, mouse) {
            prims.push(RenderPrimitive::new(
                Geometry::Line(Line::new((0.0, mouse.y), (size.width, mouse.y))),
                style.crosshair,
            ));
            prims.push(RenderPrimitive::new(
                Geometry::Line(Line::new((mouse.x, 0.0), (mouse.x, size.height))),
                style.crosshair,
            ));
        }
        prims
    }

    fn new_shape(&self, kind: ShapeKind) -> Shape {
        match kind {
            ShapeKind::Polygon => {
                Shape::Polygon(Polygon::with_finish_radius(self.config.finish_radius))
            }
            ShapeKind::Circle => Shape::Circle(Circle::new()),
        }
    }

    fn commit_pending(&mut self) -> Result<Change> {
        let Some(shape) = self.state.pending.take() else {
            return Ok(Change::Unchanged);
        };
        let index = self.annotations.add(shape)?;
        log::debug!("shape committed at index {}", index);
        Ok(Change::Added(index))
    }
}
