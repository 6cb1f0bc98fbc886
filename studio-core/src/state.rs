//! Canvas state: the root aggregate handed out as snapshots.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, Page};

/// Smallest canvas edge in pixels.
pub const MIN_CANVAS_SIZE: u32 = 100;

/// Largest canvas edge in pixels.
pub const MAX_CANVAS_SIZE: u32 = 5000;

/// The complete composition: canvas settings plus ordered pages.
///
/// Pages sit behind [`Arc`] so a new state version shares every page it did
/// not touch with the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    /// Canvas width in pixels, within [`MIN_CANVAS_SIZE`]..=[`MAX_CANVAS_SIZE`].
    width: u32,
    /// Canvas height in pixels, within [`MIN_CANVAS_SIZE`]..=[`MAX_CANVAS_SIZE`].
    height: u32,
    /// Background color as hex.
    pub background_color: String,
    /// Pages in presentation order; never empty.
    pages: Vec<Arc<Page>>,
}

impl CanvasState {
    /// Create a canvas with one empty page. The size is clamped into range.
    #[must_use]
    pub fn new(width: u32, height: u32, background_color: impl Into<String>) -> Self {
        Self {
            width: clamp_size(width),
            height: clamp_size(height),
            background_color: background_color.into(),
            pages: vec![Arc::new(Page::new())],
        }
    }

    /// Canvas width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Set the canvas size, clamping both edges. Element geometry is untouched.
    pub fn set_size(&mut self, width: u32, height: u32) {
        let (w, h) = (clamp_size(width), clamp_size(height));
        if (w, h) != (width, height) {
            tracing::debug!("Canvas size {width}x{height} clamped to {w}x{h}");
        }
        self.width = w;
        self.height = h;
    }

    /// Get a page by index.
    #[must_use]
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index).map(AsRef::as_ref)
    }

    /// All pages in order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().map(AsRef::as_ref)
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Copy-on-write access to one page: clones it only if a snapshot shares it.
    pub(crate) fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index).map(Arc::make_mut)
    }

    pub(crate) fn insert_page(&mut self, index: usize, page: Page) {
        let index = index.min(self.pages.len());
        self.pages.insert(index, Arc::new(page));
    }

    pub(crate) fn remove_page(&mut self, index: usize) -> Option<Arc<Page>> {
        (index < self.pages.len()).then(|| self.pages.remove(index))
    }

    #[cfg(test)]
    pub(crate) fn shares_page_with(&self, other: &Self, index: usize) -> bool {
        match (self.pages.get(index), other.pages.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Serialize the state to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize a state from JSON, re-applying the size clamp.
    ///
    /// A document without pages gets one empty page.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let mut state: Self = serde_json::from_str(json).map_err(CanvasError::Serialization)?;
        state.set_size(state.width, state.height);
        if state.pages.is_empty() {
            state.pages.push(Arc::new(Page::new()));
        }
        Ok(state)
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(1080, 1080, "#ffffff")
    }
}

fn clamp_size(value: u32) -> u32 {
    value.clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE)
}
