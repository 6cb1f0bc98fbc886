//! # Studio Core
//!
//! Editor core for a design and video composition studio: one scene graph
//! shared by a free-form canvas and a horizontal timeline.
//! Compiles to WASM for use behind a browser UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├─────────────────────────────────────────────┤
//! │  Sessions        │  Selection bridge        │
//! │  - Drag          │  - Canvas / element      │
//! │  - 8-handle      │  - Live snapshot         │
//! │    resize        │                          │
//! │  - Clip drag     │  Layering                │
//! │  - Clip resize   │  - Nudge / reorder       │
//! ├─────────────────────────────────────────────┤
//! │  Scene store     │  Timeline                │
//! │  - Pages         │  - Scale                 │
//! │  - Elements      │  - Playhead              │
//! │  - Snapshots     │  - Display list          │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod layering;
pub mod page;
pub mod render;
pub mod selection;
pub mod state;
pub mod store;
pub mod timeline;
pub mod transform;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use command::{Command, CommandOutcome};
pub use config::EditorConfig;
pub use editor::{Editor, Session};
pub use element::{
    coerce_dimension, Clip, Element, ElementId, ElementKind, ElementPatch, ElementTag, Geometry,
    InspectorField, ShapeKind, TextAlign, DEFAULT_CLIP_DURATION, DUPLICATE_OFFSET,
    MIN_CLIP_DURATION, MIN_ELEMENT_SIZE,
};
pub use error::{CanvasError, CanvasResult};
pub use event::{Point, PointerEvent, PointerPhase, PointerTarget};
pub use layering::ZDirection;
pub use page::{Page, PageId};
pub use render::{DisplayItem, DisplayList};
pub use selection::{Selection, SelectionTarget};
pub use state::{CanvasState, MAX_CANVAS_SIZE, MIN_CANVAS_SIZE};
pub use store::SceneStore;
pub use timeline::{ClipEdge, Playhead, TimelineScale};
pub use transform::{ResizeHandle, ResizeSession};

/// Studio core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
