//! Host-facing annotation session.
//!
//! An [`AnnotationSession`] ties the interaction controller to an image list
//! and a label store. The host forwards pointer and keyboard events to it and
//! reads back render primitives and display labels; the session writes the
//! label file after every change to the annotation set.

use crate::annotations::AnnotationSet;
use crate::codec;
use crate::config::AnnotatorConfig;
use crate::controller::{Change, InteractionController, Mode};
use crate::error::{AnnotationError, Result};
use crate::images;
use crate::render::RenderPrimitive;
use crate::shapes::ShapeKind;
use crate::storage::LabelStore;
use kurbo::Point;
use std::path::{Path, PathBuf};

/// Annotates a list of images, one label file per image.
pub struct AnnotationSession<S: LabelStore> {
    store: S,
    images: Vec<PathBuf>,
    /// Index into `images` of the open image.
    current: Option<usize>,
    /// Label file the open image saves to. `None` when no image is open or its
    /// label file failed to load.
    label_name: Option<String>,
    controller: InteractionController,
}

impl<S: LabelStore> AnnotationSession<S> {
    pub fn new(store: S, config: AnnotatorConfig) -> Self {
        Self {
            store,
            images: Vec::new(),
            current: None,
            label_name: None,
            controller: InteractionController::new(config),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn annotations(&self) -> &AnnotationSet {
        self.controller.annotations()
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_image_path(&self) -> Option<&Path> {
        self.current.map(|i| self.images[i].as_path())
    }

    /// Label file the session currently saves to.
    pub fn label_name(&self) -> Option<&str> {
        self.label_name.as_deref()
    }

    /// `(current, total)` with a 1-based current image, for progress display.
    pub fn position(&self) -> (usize, usize) {
        (self.current.map_or(0, |i| i + 1), self.images.len())
    }

    /// Scan `dir` for images and open the first one.
    ///
    /// Returns the number of images found.
    pub fn load_images(&mut self, dir: &Path) -> Result<usize> {
        let found = images::scan(dir, &self.controller.config().image_extensions)?;
        if found.is_empty() {
            log::warn!("no images found in {}", dir.display());
        } else {
            log::info!("{} images loaded from {}", found.len(), dir.display());
        }
        self.set_images(found)
    }

    /// Replace the image list and open the first image.
    pub fn set_images(&mut self, images: Vec<PathBuf>) -> Result<usize> {
        self.save()?;
        self.images = images;
        self.current = None;
        self.label_name = None;
        self.controller.reset(AnnotationSet::new());
        if !self.images.is_empty() {
            self.open(0)?;
        }
        Ok(self.images.len())
    }

    /// Save the open image and switch to the image at `index`.
    ///
    /// If the new image's label file cannot be parsed, the image is still
    /// opened with an empty set, but nothing is saved for it so the file on
    /// disk stays untouched. The parse error is returned.
    pub fn open(&mut self, index: usize) -> Result<()> {
        if index >= self.images.len() {
            return Err(AnnotationError::Index {
                index,
                len: self.images.len(),
            });
        }
        self.save()?;

        let name = images::label_file_name(&self.images[index]);
        self.current = Some(index);
        self.label_name = None;
        self.controller.reset(AnnotationSet::new());

        let annotations = match self.store.read(&name)? {
            Some(text) => match codec::decode_set(&text) {
                Ok(set) => set,
                Err(e) => {
                    log::warn!("rejected label file {}: {}", name, e);
                    return Err(e);
                }
            },
            None => AnnotationSet::new(),
        };
        log::info!(
            "opened image {}/{} with {} shapes",
            index + 1,
            self.images.len(),
            annotations.len()
        );
        self.controller.reset(annotations);
        self.label_name = Some(name);
        Ok(())
    }

    /// Move to the next image. Returns false when already on the last one.
    pub fn next(&mut self) -> Result<bool> {
        match self.current {
            Some(i) if i + 1 < self.images.len() => self.open(i + 1).map(|_| true),
            _ => {
                self.save()?;
                Ok(false)
            }
        }
    }

    /// Move to the previous image. Returns false when already on the first one.
    pub fn prev(&mut self) -> Result<bool> {
        match self.current {
            Some(i) if i > 0 => self.open(i - 1).map(|_| true),
            _ => {
                self.save()?;
                Ok(false)
            }
        }
    }

    /// Jump to the image at `index`.
    pub fn goto(&mut self, index: usize) -> Result<()> {
        self.open(index)
    }

    /// Write the open image's annotations to its label file.
    ///
    /// Does nothing when no label file is bound.
    pub fn save(&self) -> Result<()> {
        let Some(name) = &self.label_name else {
            return Ok(());
        };
        let text = codec::encode(self.controller.annotations());
        if let Err(e) = self.store.write(name, &text) {
            log::error!("failed to save {}: {}", name, e);
            return Err(e.into());
        }
        log::info!("saved {} ({} shapes)", name, self.controller.annotations().len());
        Ok(())
    }

    pub fn on_pointer_down(&mut self, point: Point) -> Result<Change> {
        let change = self.controller.pointer_down(point)?;
        self.persist(change)
    }

    pub fn on_pointer_up(&mut self, point: Point) -> Result<Change> {
        let change = self.controller.pointer_up(point)?;
        self.persist(change)
    }

    pub fn on_pointer_move(&mut self, point: Point) {
        self.controller.pointer_move(point);
    }

    pub fn on_delete_requested(&mut self) -> Result<Change> {
        let change = self.controller.delete_selected()?;
        self.persist(change)
    }

    pub fn on_cancel_requested(&mut self) -> bool {
        self.controller.cancel()
    }

    pub fn on_shape_type_selected(&mut self, kind: Option<ShapeKind>) {
        self.controller.select_kind(kind);
    }

    /// Remove every shape of the open image.
    pub fn clear_all(&mut self) -> Result<Change> {
        let change = self.controller.clear();
        self.persist(change)
    }

    /// Extent of the displayed image, for the pointer crosshair.
    pub fn set_canvas_size(&mut self, size: Option<kurbo::Size>) {
        self.controller.set_canvas_size(size);
    }

    pub fn render_primitives(&self) -> Vec<RenderPrimitive> {
        self.controller.render_primitives()
    }

    pub fn display_labels(&self) -> Vec<String> {
        self.controller.display_labels()
    }

    /// Save after a change to the set.
    ///
    /// Fails with [`AnnotationError::Unbound`] when the change cannot reach a
    /// label file; the change itself stays applied in memory.
    fn persist(&self, change: Change) -> Result<Change> {
        if !change.needs_save() {
            return Ok(change);
        }
        if self.label_name.is_none() {
            log::warn!("{:?} not saved: no label file bound", change);
            return Err(AnnotationError::Unbound);
        }
        self.save()?;
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryLabelStore;

    fn session(names: &[&str]) -> AnnotationSession<MemoryLabelStore> {
        session_with(names, &[])
    }

    fn session_with(names: &[&str], files: &[(&str, &str)]) -> AnnotationSession<MemoryLabelStore> {
        let store = MemoryLabelStore::new();
        for (name, text) in files {
            store.write(name, text).unwrap();
        }
        let mut session = AnnotationSession::new(store, AnnotatorConfig::default());
        session
            .set_images(names.iter().map(PathBuf::from).collect())
            .unwrap();
        session
    }

    fn click(session: &mut AnnotationSession<MemoryLabelStore>, x: f64, y: f64) -> Change {
        let change = session.on_pointer_down(Point::new(x, y)).unwrap();
        session.on_pointer_up(Point::new(x, y)).unwrap();
        change
    }

    #[test]
    fn test_opens_first_image() {
        let session = session(&["a.png", "b.png"]);
        assert_eq!(session.current_image_path(), Some(Path::new("a.png")));
        assert_eq!(session.label_name(), Some("a.txt"));
        assert_eq!(session.position(), (1, 2));
        // nothing written until something changes
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_commit_saves_immediately() {
        let mut session = session(&["a.png"]);
        session.on_shape_type_selected(Some(ShapeKind::Circle));
        click(&mut session, 10.0, 10.0);
        assert!(session.store().is_empty());
        assert_eq!(click(&mut session, 30.0, 10.0), Change::Added(0));
        assert_eq!(
            session.store().read("a.txt").unwrap().as_deref(),
            Some("1\nCIRC 20 10 10\n")
        );
    }

    #[test]
    fn test_navigation_saves_and_loads() {
        let mut session = session(&["a.png", "b.png"]);
        session.store().write("b.txt", "1\nCIRC 5 5 2\n").unwrap();

        assert!(session.next().unwrap());
        assert_eq!(session.display_labels(), vec!["0: CIRC - center=(5,5), radius=2"]);
        // leaving an image writes its (empty) label file
        assert_eq!(session.store().read("a.txt").unwrap().as_deref(), Some("0\n"));

        assert!(!session.next().unwrap());
        assert!(session.prev().unwrap());
        assert!(session.annotations().is_empty());
        assert!(!session.prev().unwrap());
    }

    #[test]
    fn test_open_out_of_range() {
        let mut session = session(&["a.png"]);
        assert!(matches!(
            session.goto(4),
            Err(AnnotationError::Index { index: 4, len: 1 })
        ));
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn test_corrupt_file_is_not_overwritten() {
        let mut session = session(&["a.png", "b.png"]);
        session.store().write("b.txt", "2\nCIRC 1 1 1\nFOO 1 2\n").unwrap();

        let err = session.next().unwrap_err();
        assert!(matches!(err.parse_error(), Some(crate::error::ParseError::UnknownShapeKind(_))));
        assert_eq!(session.current_index(), Some(1));
        assert!(session.annotations().is_empty());
        assert_eq!(session.label_name(), None);

        session.prev().unwrap();
        assert_eq!(
            session.store().read("b.txt").unwrap().as_deref(),
            Some("2\nCIRC 1 1 1\nFOO 1 2\n")
        );
    }

    #[test]
    fn test_commit_after_corrupt_load_reports_unbound() {
        let mut session = session_with(&["a.png", "b.png"], &[("b.txt", "1\nFOO 1 2\n")]);
        session.next().unwrap_err();
        assert_eq!(session.label_name(), None);

        session.on_shape_type_selected(Some(ShapeKind::Circle));
        click(&mut session, 0.0, 0.0);
        let err = session.on_pointer_down(Point::new(4.0, 0.0)).unwrap_err();
        assert!(matches!(err, AnnotationError::Unbound));
        assert!(!err.is_fatal());
        assert_eq!(session.annotations().len(), 1);
        assert_eq!(
            session.store().read("b.txt").unwrap().as_deref(),
            Some("1\nFOO 1 2\n")
        );
    }

    #[test]
    fn test_clear_all_saves_empty() {
        let mut session = session_with(&["a.png"], &[("a.txt", "1\nCIRC 5 5 2\n")]);
        assert_eq!(session.annotations().len(), 1);
        assert_eq!(session.clear_all().unwrap(), Change::Cleared);
        assert_eq!(session.store().read("a.txt").unwrap().as_deref(), Some("0\n"));
    }

    #[test]
    fn test_delete_saves() {
        let mut session = session_with(&["a.png"], &[("a.txt", "2\nCIRC 5 5 2\nCIRC 50 50 3\n")]);
        click(&mut session, 5.0, 5.0);
        assert_eq!(session.on_delete_requested().unwrap(), Change::Removed(0));
        assert_eq!(
            session.store().read("a.txt").unwrap().as_deref(),
            Some("1\nCIRC 50 50 3\n")
        );
    }

    #[test]
    fn test_no_images() {
        let mut session = session(&[]);
        assert_eq!(session.position(), (0, 0));
        assert!(!session.next().unwrap());
        session.on_shape_type_selected(Some(ShapeKind::Circle));
        click(&mut session, 0.0, 0.0);
        assert!(matches!(
            session.on_pointer_down(Point::new(2.0, 0.0)),
            Err(AnnotationError::Unbound)
        ));
        assert!(session.store().is_empty());
    }
}
