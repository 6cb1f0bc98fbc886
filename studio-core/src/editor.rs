//! The editor: scene store, selection bridge and the one active pointer session.
//!
//! ```text
//!            begin_*                 on_pointer_move          end
//!   idle ──────────────▶ session ─────────────────────▶ ─────────────▶ idle
//!                          │  (drag | resize | clip drag | clip resize)
//!                          └─ patch by id ──▶ SceneStore ──▶ snapshot
//! ```
//!
//! At most one session exists. Starting another while one is active is
//! rejected until the active one ends.

use std::sync::Arc;
use std::time::Duration;

use crate::event::{Point, PointerEvent, PointerPhase, PointerTarget};
use crate::layering::ZDirection;
use crate::timeline::{ClipDragSession, ClipEdge, ClipResizeSession, Playhead, TimelineScale};
use crate::transform::{DragSession, ResizeHandle, ResizeSession};
use crate::{
    CanvasError, CanvasResult, CanvasState, Clip, EditorConfig, Element, ElementId, ElementPatch,
    SceneStore, Selection, SelectionTarget,
};

/// The pointer session currently capturing input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Session {
    /// Moving an element.
    Drag(DragSession),
    /// Resizing an element through a handle.
    Resize(ResizeSession),
    /// Moving a clip on the timeline.
    ClipDrag(ClipDragSession),
    /// Trimming or extending a clip.
    ClipResize(ClipResizeSession),
}

impl Session {
    /// The element the session addresses.
    #[must_use]
    pub const fn element_id(&self) -> ElementId {
        match self {
            Self::Drag(s) => s.element_id(),
            Self::Resize(s) => s.element_id(),
            Self::ClipDrag(s) => s.element_id(),
            Self::ClipResize(s) => s.element_id(),
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Drag(_) => "drag",
            Self::Resize(_) => "resize",
            Self::ClipDrag(_) => "clip drag",
            Self::ClipResize(_) => "clip resize",
        }
    }
}

/// Interactive scene-graph editor shared by the canvas and timeline surfaces.
#[derive(Debug)]
pub struct Editor {
    store: SceneStore,
    session: Option<Session>,
    scale: TimelineScale,
    playhead: Playhead,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty canvas sized from `config`.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let state = CanvasState::new(
            config.default_width,
            config.default_height,
            config.background_color.clone(),
        );
        Self::with_state(state, config)
    }

    /// Create an editor over an existing composition.
    #[must_use]
    pub fn with_state(state: CanvasState, config: EditorConfig) -> Self {
        Self {
            store: SceneStore::new(state),
            session: None,
            scale: TimelineScale::new(config.pixels_per_second),
            playhead: Playhead::new(config.timeline_span_secs),
            config,
        }
    }

    /// The configuration this editor was created with.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &SceneStore {
        &self.store
    }

    /// Mutable access to the underlying store, e.g. to register observers.
    pub fn store_mut(&mut self) -> &mut SceneStore {
        &mut self.store
    }

    /// Read-only snapshot of the composition.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CanvasState> {
        self.store.snapshot()
    }

    /// Timeline scale.
    #[must_use]
    pub const fn scale(&self) -> TimelineScale {
        self.scale
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Add an element to the current page in front of every other element.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        self.store.add_element(element)
    }

    /// Merge a partial update into an element. Missing ids are ignored.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.store.update_element(id, patch)
    }

    /// Remove an element. Missing ids are ignored.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        self.store.remove_element(id)
    }

    /// Duplicate an element with an offset, in front of everything.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        self.store.duplicate_element(id)
    }

    /// Merge a media length reported by the media loader.
    pub fn set_media_duration(&mut self, id: ElementId, seconds: f64) -> bool {
        self.store.set_media_duration(id, seconds)
    }

    /// Swap an element with its z-order neighbor.
    pub fn nudge_z(&mut self, id: ElementId, direction: ZDirection) -> bool {
        self.store.nudge_z(id, direction)
    }

    /// Renumber the current page from a front-to-back list.
    pub fn reorder_z(&mut self, front_to_back: &[ElementId]) -> bool {
        self.store.reorder_z(front_to_back)
    }

    /// Replace the selection.
    pub fn set_selection(&mut self, target: SelectionTarget) {
        self.store.set_selection(target);
    }

    /// The active selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        self.store.selection()
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// The active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether no session is active.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Start moving an element.
    ///
    /// # Errors
    ///
    /// Fails if a session is active, the element is missing, locked, or has
    /// no canvas footprint.
    pub fn begin_drag(&mut self, id: ElementId, pointer: Point) -> CanvasResult<()> {
        let element = self.transformable(id)?;
        let session = DragSession::begin(element, pointer);
        self.start(Session::Drag(session));
        Ok(())
    }

    /// Start resizing an element through one of its handles.
    ///
    /// # Errors
    ///
    /// Fails if a session is active, the element is missing, locked, or has
    /// no canvas footprint.
    pub fn begin_resize(
        &mut self,
        id: ElementId,
        handle: ResizeHandle,
        pointer: Point,
    ) -> CanvasResult<()> {
        self.transformable(id)?;
        self.start(Session::Resize(ResizeSession::begin(id, handle, pointer)));
        Ok(())
    }

    /// Start moving a clip along the timeline.
    ///
    /// # Errors
    ///
    /// Fails if a session is active, the element is missing, locked, or not
    /// on the timeline.
    pub fn begin_clip_drag(&mut self, id: ElementId, pointer: Point) -> CanvasResult<()> {
        let clip = self.scheduled(id)?;
        let session = ClipDragSession::begin(id, &clip, pointer, self.scale);
        self.start(Session::ClipDrag(session));
        Ok(())
    }

    /// Start trimming or extending a clip from one edge.
    ///
    /// # Errors
    ///
    /// Fails if a session is active, the element is missing, locked, or not
    /// on the timeline.
    pub fn begin_clip_resize(
        &mut self,
        id: ElementId,
        edge: ClipEdge,
        pointer: Point,
    ) -> CanvasResult<()> {
        let clip = self.scheduled(id)?;
        let session = ClipResizeSession::begin(
            id,
            &clip,
            edge,
            pointer,
            self.scale,
            self.config.cap_clips_to_media,
        );
        self.start(Session::ClipResize(session));
        Ok(())
    }

    /// Feed a pointer position to the active session.
    ///
    /// Returns `true` if the session's element was updated. Without a session,
    /// or once the element has been deleted, this does nothing.
    pub fn on_pointer_move(&mut self, pointer: Point) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let id = session.element_id();
        let patch = match session {
            Session::Drag(s) => s.on_move(pointer),
            Session::Resize(s) => {
                let Some(current) = self.store.element(id).map(|e| e.geometry) else {
                    return false;
                };
                s.on_move(pointer, current)
            }
            Session::ClipDrag(s) => s.on_move(pointer),
            Session::ClipResize(s) => s.on_move(pointer),
        };
        self.store.update_element(id, &patch)
    }

    /// End the active session, keeping whatever state it produced.
    ///
    /// Returns `false` if no session was active.
    pub fn end(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                tracing::debug!("Ended {} session on {}", session.name(), session.element_id());
                true
            }
            None => false,
        }
    }

    /// Route a raw pointer event.
    ///
    /// `down` selects what it lands on and starts the matching session; a
    /// press on the background selects the canvas. `move` feeds the active
    /// session and `up` ends it. Sessions that cannot start (locked element,
    /// another session active) are logged and skipped.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Down => self.pointer_down(event),
            PointerPhase::Move => {
                self.on_pointer_move(event.position);
            }
            PointerPhase::Up => {
                self.end();
            }
        }
    }

    fn pointer_down(&mut self, event: PointerEvent) {
        let target = event.target.unwrap_or_else(|| {
            let (x, y) = (event.position.x, event.position.y);
            self.store
                .current_page()
                .element_at(x, y)
                .map_or(PointerTarget::Canvas, |id| PointerTarget::Element { id })
        });

        let started = match target {
            PointerTarget::Canvas => {
                if self.is_idle() {
                    self.set_selection(SelectionTarget::Canvas);
                }
                return;
            }
            PointerTarget::Element { id } => {
                self.select_for_session(id);
                self.begin_drag(id, event.position)
            }
            PointerTarget::Handle { id, handle } => {
                self.select_for_session(id);
                self.begin_resize(id, handle, event.position)
            }
            PointerTarget::ClipBody { id } => {
                self.select_for_session(id);
                self.begin_clip_drag(id, event.position)
            }
            PointerTarget::ClipEdge { id, edge } => {
                self.select_for_session(id);
                self.begin_clip_resize(id, edge, event.position)
            }
        };

        if let Err(e) = started {
            tracing::debug!("Pointer down did not start a session: {e}");
        }
    }

    fn select_for_session(&mut self, id: ElementId) {
        if self.is_idle() && self.selection().element_id() != Some(id) {
            self.set_selection(SelectionTarget::Element(id));
        }
    }

    fn start(&mut self, session: Session) {
        tracing::debug!("Began {} session on {}", session.name(), session.element_id());
        self.session = Some(session);
    }

    fn ensure_idle(&self) -> CanvasResult<()> {
        match &self.session {
            Some(active) => {
                tracing::warn!(
                    "Rejecting new session while {} on {} is active",
                    active.name(),
                    active.element_id()
                );
                Err(CanvasError::SessionActive)
            }
            None => Ok(()),
        }
    }

    fn unlocked(&self, id: ElementId) -> CanvasResult<&Element> {
        self.ensure_idle()?;
        let element = self
            .store
            .element(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        if element.locked {
            return Err(CanvasError::ElementLocked(id.to_string()));
        }
        Ok(element)
    }

    fn transformable(&self, id: ElementId) -> CanvasResult<&Element> {
        let element = self.unlocked(id)?;
        if !element.tag().is_spatial() {
            return Err(CanvasError::InvalidOperation(format!(
                "{id} has no canvas footprint"
            )));
        }
        Ok(element)
    }

    fn scheduled(&self, id: ElementId) -> CanvasResult<Clip> {
        self.unlocked(id)?
            .clip
            .ok_or_else(|| CanvasError::NotOnTimeline(id.to_string()))
    }

    // -----------------------------------------------------------------------
    // Pages, canvas and playback
    // -----------------------------------------------------------------------

    /// Append an empty page and make it current.
    pub fn add_page(&mut self) -> usize {
        self.end();
        self.store.add_page()
    }

    /// Duplicate a page and make the copy current.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PageNotFound`] if `index` is out of range.
    pub fn duplicate_page(&mut self, index: usize) -> CanvasResult<usize> {
        self.end();
        self.store.duplicate_page(index)
    }

    /// Remove a page; the last page is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PageNotFound`] if `index` is out of range.
    pub fn remove_page(&mut self, index: usize) -> CanvasResult<bool> {
        self.end();
        self.store.remove_page(index)
    }

    /// Switch the current page.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PageNotFound`] if `index` is out of range.
    pub fn set_current_page(&mut self, index: usize) -> CanvasResult<()> {
        self.end();
        self.store.set_current_page(index)
    }

    /// Resize the canvas (clamped to the allowed range).
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.store.set_canvas_size(width, height);
    }

    /// Change the canvas background color.
    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.store.set_background_color(color);
    }

    /// The playhead.
    #[must_use]
    pub const fn playhead(&self) -> &Playhead {
        &self.playhead
    }

    /// Mutable access to the playhead.
    pub fn playhead_mut(&mut self) -> &mut Playhead {
        &mut self.playhead
    }

    /// Advance the playhead by wall-clock time.
    pub fn tick(&mut self, elapsed: Duration) {
        self.playhead.tick(elapsed);
    }
}
