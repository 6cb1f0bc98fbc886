//! Transform engine: pointer-driven move and eight-handle resize.
//!
//! A session captures its start state once in `begin` and turns each pointer
//! position into an [`ElementPatch`]. Sessions never write to the store
//! themselves; the editor applies the patch by id, so a session that outlives
//! its element simply stops having an effect.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::event::Point;
use crate::{Element, ElementId, ElementPatch, Geometry, MIN_ELEMENT_SIZE};

/// One of the eight resize handles around the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    /// Top edge.
    N,
    /// Bottom edge.
    S,
    /// Right edge.
    E,
    /// Left edge.
    W,
    /// Top-right corner.
    Ne,
    /// Top-left corner.
    Nw,
    /// Bottom-right corner.
    Se,
    /// Bottom-left corner.
    Sw,
}

impl ResizeHandle {
    /// All handles, clockwise from the top.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
        Self::Nw,
    ];

    /// Whether the handle moves the top edge.
    #[must_use]
    pub const fn north(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Whether the handle moves the bottom edge.
    #[must_use]
    pub const fn south(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    /// Whether the handle moves the right edge.
    #[must_use]
    pub const fn east(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Whether the handle moves the left edge.
    #[must_use]
    pub const fn west(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Position of this handle on the given bounds.
    #[must_use]
    pub fn anchor_point(self, geometry: &Geometry) -> Point {
        let x = if self.west() {
            geometry.x
        } else if self.east() {
            geometry.right()
        } else {
            geometry.x + geometry.width / 2.0
        };
        let y = if self.north() {
            geometry.y
        } else if self.south() {
            geometry.bottom()
        } else {
            geometry.y + geometry.height / 2.0
        };
        Point::new(x, y)
    }
}

/// Error for an unknown handle name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown resize handle: {0}")]
pub struct ParseHandleError(String);

impl FromStr for ResizeHandle {
    type Err = ParseHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" => Ok(Self::N),
            "s" => Ok(Self::S),
            "e" => Ok(Self::E),
            "w" => Ok(Self::W),
            "ne" => Ok(Self::Ne),
            "nw" => Ok(Self::Nw),
            "se" => Ok(Self::Se),
            "sw" => Ok(Self::Sw),
            _ => Err(ParseHandleError(s.to_string())),
        }
    }
}

/// Apply one incremental pointer delta to `geometry` through `handle`.
///
/// Each moved edge clamps the size at [`MIN_ELEMENT_SIZE`]. For the `n` and
/// `w` edges the position shifts by exactly the size change, so the opposite
/// edge keeps its absolute coordinate even while clamped.
#[must_use]
pub fn resize(geometry: Geometry, handle: ResizeHandle, dx: f32, dy: f32) -> Geometry {
    let mut next = geometry;

    if handle.east() {
        next.width = (geometry.width + dx).max(MIN_ELEMENT_SIZE);
    } else if handle.west() {
        next.width = (geometry.width - dx).max(MIN_ELEMENT_SIZE);
        next.x = geometry.x + (geometry.width - next.width);
    }

    if handle.south() {
        next.height = (geometry.height + dy).max(MIN_ELEMENT_SIZE);
    } else if handle.north() {
        next.height = (geometry.height - dy).max(MIN_ELEMENT_SIZE);
        next.y = geometry.y + (geometry.height - next.height);
    }

    next
}

/// A move session: the element follows the pointer at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    id: ElementId,
    offset: Point,
}

impl DragSession {
    /// Start dragging `element` from `pointer`.
    #[must_use]
    pub fn begin(element: &Element, pointer: Point) -> Self {
        let origin = Point::new(element.geometry.x, element.geometry.y);
        Self {
            id: element.id,
            offset: pointer - origin,
        }
    }

    /// The dragged element.
    #[must_use]
    pub const fn element_id(&self) -> ElementId {
        self.id
    }

    /// New position for the pointer at `pointer`. Not clamped to the canvas.
    #[must_use]
    pub fn on_move(&self, pointer: Point) -> ElementPatch {
        let position = pointer - self.offset;
        ElementPatch::position(position.x, position.y)
    }
}

/// A resize session driven by one handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    id: ElementId,
    handle: ResizeHandle,
    last: Point,
}

impl ResizeSession {
    /// Start resizing `id` through `handle` from `pointer`.
    #[must_use]
    pub const fn begin(id: ElementId, handle: ResizeHandle, pointer: Point) -> Self {
        Self {
            id,
            handle,
            last: pointer,
        }
    }

    /// The resized element.
    #[must_use]
    pub const fn element_id(&self) -> ElementId {
        self.id
    }

    /// The handle being dragged.
    #[must_use]
    pub const fn handle(&self) -> ResizeHandle {
        self.handle
    }

    /// Bounds after moving from the previous pointer position to `pointer`.
    ///
    /// The delta is incremental: it is measured from the last move, not from
    /// the session start.
    pub fn on_move(&mut self, pointer: Point, current: Geometry) -> ElementPatch {
        let delta = pointer - self.last;
        self.last = pointer;
        let next = resize(current, self.handle, delta.x, delta.y);
        ElementPatch::bounds(next.x, next.y, next.width, next.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementKind;

    fn square() -> Geometry {
        Geometry {
            x: 100.0,
            y: 100.0,
            width: 150.0,
            height: 150.0,
            z_index: 1,
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_se_grows_without_shift() {
        let g = resize(square(), ResizeHandle::Se, 30.0, -10.0);
        assert!(close(g.width, 180.0));
        assert!(close(g.height, 140.0));
        assert!(close(g.x, 100.0));
        assert!(close(g.y, 100.0));
    }

    #[test]
    fn test_nw_anchors_opposite_corner() {
        let g = resize(square(), ResizeHandle::Nw, 30.0, -10.0);
        assert!(close(g.x, 130.0));
        assert!(close(g.y, 90.0));
        assert!(close(g.width, 120.0));
        assert!(close(g.height, 160.0));
    }

    #[test]
    fn test_w_clamp_keeps_right_edge() {
        let g = resize(square(), ResizeHandle::W, 500.0, 0.0);
        assert!(close(g.width, MIN_ELEMENT_SIZE));
        assert!(close(g.right(), 250.0));
    }

    #[test]
    fn test_n_clamp_keeps_bottom_edge() {
        let g = resize(square(), ResizeHandle::N, 0.0, 1000.0);
        assert!(close(g.height, MIN_ELEMENT_SIZE));
        assert!(close(g.bottom(), 250.0));
    }

    #[test]
    fn test_edge_handles_ignore_other_axis() {
        let g = resize(square(), ResizeHandle::E, 10.0, 99.0);
        assert!(close(g.height, 150.0));
        let g = resize(square(), ResizeHandle::S, 99.0, 10.0);
        assert!(close(g.width, 150.0));
        assert!(close(g.height, 160.0));
    }

    #[test]
    fn test_handle_parse() {
        assert_eq!("ne".parse::<ResizeHandle>(), Ok(ResizeHandle::Ne));
        assert_eq!("SW".parse::<ResizeHandle>(), Ok(ResizeHandle::Sw));
        assert!("x".parse::<ResizeHandle>().is_err());
    }

    #[test]
    fn test_anchor_points() {
        let g = square();
        assert_eq!(ResizeHandle::Nw.anchor_point(&g), Point::new(100.0, 100.0));
        assert_eq!(ResizeHandle::S.anchor_point(&g), Point::new(175.0, 250.0));
        assert_eq!(ResizeHandle::E.anchor_point(&g), Point::new(250.0, 175.0));
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let element = Element::new(ElementKind::text("t")).with_geometry(square());
        let session = DragSession::begin(&element, Point::new(110.0, 120.0));
        let patch = session.on_move(Point::new(-50.0, 20.0));
        assert_eq!(patch.x, Some(-60.0));
        assert_eq!(patch.y, Some(0.0));
    }

    #[test]
    fn test_resize_session_is_incremental() {
        let mut session =
            ResizeSession::begin(ElementId::new(), ResizeHandle::E, Point::new(0.0, 0.0));
        let mut geometry = square();
        for x in [10.0, 20.0, 30.0] {
            let patch = session.on_move(Point::new(x, 0.0), geometry);
            geometry.width = patch.width.expect("width");
        }
        assert!(close(geometry.width, 180.0));
    }
}
