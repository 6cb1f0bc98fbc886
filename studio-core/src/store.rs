//! Scene storage: the single owner of the composition state.
//!
//! Every consumer reads an immutable [`CanvasState`] snapshot and writes only
//! through the mutators here. A mutation produces a new state version that
//! shares every untouched page with the snapshots already handed out.
//! Mutations addressed to an id that no longer exists are silent no-ops and do
//! not produce a new version.

use std::sync::Arc;

use crate::layering::{self, ZDirection};
use crate::{
    CanvasError, CanvasResult, CanvasState, Element, ElementId, ElementPatch, Page, Selection,
    SelectionTarget, DUPLICATE_OFFSET,
};

/// Callback invoked with every committed state version.
pub type ChangeCallback = Box<dyn FnMut(&Arc<CanvasState>) + Send>;

/// Owned scene storage with a current page and the selection bridge.
///
/// # Example
///
/// ```
/// use studio_core::{Element, ElementKind, ElementPatch, SceneStore};
///
/// let mut store = SceneStore::default();
/// let id = store.add_element(Element::new(ElementKind::text("Hello")));
/// store.update_element(id, &ElementPatch::position(40.0, 60.0));
///
/// let snapshot = store.snapshot();
/// let page = snapshot.page(0).unwrap();
/// assert_eq!(page.get(id).unwrap().geometry.x, 40.0);
/// ```
pub struct SceneStore {
    state: Arc<CanvasState>,
    current_page: usize,
    selection: Selection,
    version: u64,
    on_change: Option<ChangeCallback>,
}

impl std::fmt::Debug for SceneStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStore")
            .field("state", &self.state)
            .field("current_page", &self.current_page)
            .field("selection", &self.selection)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(CanvasState::default())
    }
}

impl SceneStore {
    /// Create a store owning `state`, with the first page current.
    #[must_use]
    pub fn new(state: CanvasState) -> Self {
        Self {
            state: Arc::new(state),
            current_page: 0,
            selection: Selection::Empty,
            version: 0,
            on_change: None,
        }
    }

    /// Register the callback that receives each committed state version.
    pub fn set_on_change<F>(&mut self, callback: F)
    where
        F: FnMut(&Arc<CanvasState>) + Send + 'static,
    {
        self.on_change = Some(Box::new(callback));
    }

    /// The current state version. Cheap: shares the underlying data.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CanvasState> {
        Arc::clone(&self.state)
    }

    /// Read access to the live state.
    #[must_use]
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Number of committed mutations since creation.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Index of the current page.
    #[must_use]
    pub const fn current_page_index(&self) -> usize {
        self.current_page
    }

    /// The current page.
    #[must_use]
    pub fn current_page(&self) -> &Page {
        self.state
            .page(self.current_page)
            .unwrap_or_else(|| unreachable!("current page index is kept in range"))
    }

    /// Find an element on the current page.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.current_page().get(id)
    }

    // -----------------------------------------------------------------------
    // Selection bridge
    // -----------------------------------------------------------------------

    /// The active selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the selection. Element snapshots are taken from the store.
    pub fn set_selection(&mut self, target: SelectionTarget) {
        self.selection = Selection::resolve(target, self.current_page());
    }

    // -----------------------------------------------------------------------
    // Elements
    // -----------------------------------------------------------------------

    /// Add an element to the current page on top of every existing element.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let page = self.current_page;
        self.insert_element(page, element, None)
            .unwrap_or_else(|_| unreachable!("current page index is kept in range"))
    }

    /// Add an element to a page.
    ///
    /// `z_index` defaults to one above the page's current maximum. An element
    /// whose id already exists on the page is given a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PageNotFound`] if `page_index` is out of range.
    pub fn insert_element(
        &mut self,
        page_index: usize,
        mut element: Element,
        z_index: Option<i32>,
    ) -> CanvasResult<ElementId> {
        let page = self
            .state
            .page(page_index)
            .ok_or(CanvasError::PageNotFound(page_index))?;
        if page.contains(element.id) {
            let fresh = ElementId::new();
            tracing::debug!("Element id {} already on page; assigning {fresh}", element.id);
            element.id = fresh;
        }
        element.geometry.z_index = z_index.unwrap_or_else(|| page.next_z_index());

        let id = element.id;
        self.with_page(page_index, |page| page.push(element));
        Ok(id)
    }

    /// Merge `patch` into the element on the current page.
    ///
    /// Returns `false` without touching state if no element matches: a
    /// pointer session may outlive the element it started on.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if !self.current_page().contains(id) {
            tracing::debug!("Ignoring update for missing element {id}");
            return false;
        }
        self.with_current_page(|page| {
            if let Some(element) = page.get_mut(id) {
                element.apply_patch(patch);
            }
        });
        true
    }

    /// Record the media length reported by the media loader.
    pub fn set_media_duration(&mut self, id: ElementId, seconds: f64) -> bool {
        self.update_element(
            id,
            &ElementPatch {
                media_duration: Some(seconds),
                ..ElementPatch::default()
            },
        )
    }

    /// Remove an element from the current page, clearing it from the selection.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        if !self.current_page().contains(id) {
            tracing::debug!("Ignoring removal of missing element {id}");
            return None;
        }
        self.with_current_page(|page| page.remove(id))
    }

    /// Copy an element, offset by [`DUPLICATE_OFFSET`] on both axes, in front
    /// of every existing element.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let page = self.current_page();
        let Some(original) = page.get(id) else {
            tracing::debug!("Ignoring duplicate of missing element {id}");
            return None;
        };

        let count = i32::try_from(page.len()).unwrap_or(i32::MAX);
        let z_index = count.saturating_add(1).max(page.next_z_index());
        let mut copy = original.clone();
        copy.id = ElementId::new();
        copy.geometry.x += DUPLICATE_OFFSET;
        copy.geometry.y += DUPLICATE_OFFSET;

        let page_index = self.current_page;
        self.insert_element(page_index, copy, Some(z_index)).ok()
    }

    /// Swap an element's z-index with its nearest neighbor. No-op without one.
    pub fn nudge_z(&mut self, id: ElementId, direction: ZDirection) -> bool {
        if !self.current_page().contains(id) {
            return false;
        }
        let mut draft = self.current_page().clone();
        if !layering::nudge(&mut draft, id, direction) {
            return false;
        }
        self.with_current_page(|page| *page = draft);
        true
    }

    /// Renumber the current page from a front-to-back list of ids.
    pub fn reorder_z(&mut self, front_to_back: &[ElementId]) -> bool {
        if self.current_page().is_empty() {
            return false;
        }
        self.with_current_page(|page| layering::reorder(page, front_to_back))
    }

    // -----------------------------------------------------------------------
    // Pages and canvas
    // -----------------------------------------------------------------------

    /// Append an empty page and make it current. Returns its index.
    pub fn add_page(&mut self) -> usize {
        let index = self.state.page_count();
        self.commit_state(|state| state.insert_page(index, Page::new()));
        self.switch_page(index);
        index
    }

    /// Insert a deep copy of a page right after it and make the copy current.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PageNotFound`] if `index` is out of range.
    pub fn duplicate_page(&mut self, index: usize) -> CanvasResult<usize> {
        let copy = self
            .state
            .page(index)
            .ok_or(CanvasError::PageNotFound(index))?
            .duplicate();
        let target = index + 1;
        self.commit_state(|state| state.insert_page(target, copy));
        self.switch_page(target);
        Ok(target)
    }

    /// Remove a page. The last remaining page is never removed.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PageNotFound`] if `index` is out of range.
    pub fn remove_page(&mut self, index: usize) -> CanvasResult<bool> {
        let count = self.state.page_count();
        if index >= count {
            return Err(CanvasError::PageNotFound(index));
        }
        if count == 1 {
            tracing::debug!("Refusing to remove the only page");
            return Ok(false);
        }

        let removed_current = index == self.current_page;
        if index < self.current_page || self.current_page == count - 1 {
            self.current_page -= 1;
        }
        self.commit_state(|state| {
            state.remove_page(index);
        });
        if removed_current {
            self.selection = Selection::Empty;
        }
        Ok(true)
    }

    /// Make another page current. Clears the selection.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PageNotFound`] if `index` is out of range.
    pub fn set_current_page(&mut self, index: usize) -> CanvasResult<()> {
        if index >= self.state.page_count() {
            return Err(CanvasError::PageNotFound(index));
        }
        self.switch_page(index);
        Ok(())
    }

    /// Resize the canvas (clamped). Element geometry is not rewritten.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.commit_state(|state| state.set_size(width, height));
    }

    /// Change the background color.
    pub fn set_background_color(&mut self, color: impl Into<String>) {
        let color = color.into();
        self.commit_state(|state| state.background_color = color);
    }

    /// Replace the whole state, e.g. after loading a project.
    pub fn replace(&mut self, state: CanvasState) {
        self.current_page = 0;
        self.selection = Selection::Empty;
        self.commit_state(|current| *current = state);
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn switch_page(&mut self, index: usize) {
        if index != self.current_page {
            tracing::debug!("Switching to page {index}");
        }
        self.current_page = index;
        self.selection = Selection::Empty;
    }

    fn with_current_page<R>(&mut self, f: impl FnOnce(&mut Page) -> R) -> R {
        let index = self.current_page;
        self.with_page(index, f)
    }

    fn with_page<R>(&mut self, index: usize, f: impl FnOnce(&mut Page) -> R) -> R {
        self.commit_state(|state| {
            let page = state
                .page_mut(index)
                .unwrap_or_else(|| unreachable!("page index checked by caller"));
            f(page)
        })
    }

    fn commit_state<R>(&mut self, f: impl FnOnce(&mut CanvasState) -> R) -> R {
        let result = f(Arc::make_mut(&mut self.state));
        self.version += 1;
        if let Some(page) = self.state.page(self.current_page) {
            self.selection.refresh(page);
        }
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.state);
        }
        result
    }
}
