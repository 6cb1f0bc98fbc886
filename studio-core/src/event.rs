//! Pointer input for editor sessions.
//!
//! Events carry page-local coordinates for canvas targets and timeline-local
//! pixels for clip targets. The editor never talks to a windowing API
//! directly: any event source can feed it [`PointerEvent`]s.

use serde::{Deserialize, Serialize};

use crate::timeline::ClipEdge;
use crate::transform::ResizeHandle;
use crate::ElementId;

/// A pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
}

/// What the pointer went down on, as reported by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum PointerTarget {
    /// The page background.
    Canvas,
    /// The body of an element on the canvas.
    Element {
        /// Touched element.
        id: ElementId,
    },
    /// A resize handle of the selected element.
    Handle {
        /// Element owning the handle.
        id: ElementId,
        /// Which handle.
        handle: ResizeHandle,
    },
    /// The body of a clip on the timeline.
    ClipBody {
        /// Element owning the clip.
        id: ElementId,
    },
    /// One edge of a clip on the timeline.
    ClipEdge {
        /// Element owning the clip.
        id: ElementId,
        /// Which edge.
        edge: ClipEdge,
    },
}

/// A pointer event fed to [`crate::Editor::handle_pointer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// Pointer position.
    pub position: Point,
    /// Target under the pointer on `down`. When absent the editor hit-tests
    /// the current page at `position`.
    #[serde(default)]
    pub target: Option<PointerTarget>,
}

impl PointerEvent {
    /// Pointer pressed on an explicit target.
    #[must_use]
    pub const fn down(position: Point, target: PointerTarget) -> Self {
        Self {
            phase: PointerPhase::Down,
            position,
            target: Some(target),
        }
    }

    /// Pointer pressed; the target is found by hit-testing.
    #[must_use]
    pub const fn down_at(position: Point) -> Self {
        Self {
            phase: PointerPhase::Down,
            position,
            target: None,
        }
    }

    /// Pointer moved.
    #[must_use]
    pub const fn moved(position: Point) -> Self {
        Self {
            phase: PointerPhase::Move,
            position,
            target: None,
        }
    }

    /// Pointer released.
    #[must_use]
    pub const fn up(position: Point) -> Self {
        Self {
            phase: PointerPhase::Up,
            position,
            target: None,
        }
    }
}
