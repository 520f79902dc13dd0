//! shapelabel core library
//!
//! Shape model, pointer interaction state machine and label file persistence
//! for an image annotator. Windowing, image decoding and drawing belong to the
//! host, which talks to the core through [`AnnotationSession`].

pub mod annotations;
pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod images;
pub mod render;
pub mod session;
pub mod shapes;
pub mod storage;

pub use annotations::AnnotationSet;
pub use config::{AnnotatorConfig, SELECT_RADIUS, StyleConfig};
pub use controller::{Change, InteractionController, InteractionState, Mode};
pub use error::{AnnotationError, ParseError, Result};
pub use render::{Geometry, RenderPrimitive, Rgba8, Stroke};
pub use session::AnnotationSession;
pub use shapes::{Circle, FINISH_RADIUS, Polygon, Shape, ShapeKind};
pub use storage::{FileLabelStore, LabelStore, MemoryLabelStore, StorageError};
