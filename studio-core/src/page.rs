//! Pages: the composition units holding a page's elements.
//!
//! Element storage order is insertion order and carries no meaning beyond
//! breaking z-index ties: among equal z-indices the later-added element is
//! painted last and wins hit tests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Element, ElementId};

/// Unique identifier for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(Uuid);

impl PageId {
    /// Create a new unique page ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page (the video surface calls it a scene) and its elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Stable identifier for the page's lifetime.
    pub id: PageId,
    /// Elements in insertion order.
    elements: Vec<Element>,
}

impl Page {
    /// Create a new empty page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: PageId::new(),
            elements: Vec::new(),
        }
    }

    /// Deep copy of this page with a new page id and every element id rewritten.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: PageId::new(),
            elements: self
                .elements
                .iter()
                .map(|element| Element {
                    id: ElementId::new(),
                    ..element.clone()
                })
                .collect(),
        }
    }

    /// Append an element. The caller guarantees the id is unique on this page.
    pub(crate) fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Remove an element, returning it if present.
    pub(crate) fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Whether an element with this id lives on the page.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// All elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub(crate) fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut()
    }

    /// Get the number of elements on the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Highest z-index on the page.
    #[must_use]
    pub fn max_z_index(&self) -> Option<i32> {
        self.elements.iter().map(|e| e.geometry.z_index).max()
    }

    /// Z-index for a newly added element: one above the current maximum.
    #[must_use]
    pub fn next_z_index(&self) -> i32 {
        self.max_z_index().map_or(1, |z| z.saturating_add(1))
    }

    /// Elements in paint order: ascending z-index, later insertion last on ties.
    #[must_use]
    pub fn render_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        // Stable sort keeps insertion order among equal z-indices.
        ordered.sort_by_key(|e| e.geometry.z_index);
        ordered
    }

    /// Elements in layer-list order: front-most first.
    #[must_use]
    pub fn layer_order(&self) -> Vec<&Element> {
        let mut ordered = self.render_order();
        ordered.reverse();
        ordered
    }

    /// Find the element at the given page coordinates.
    ///
    /// Returns the front-most visible element with a canvas footprint.
    /// Locked elements are included: they stay selectable.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.layer_order()
            .into_iter()
            .find(|e| e.visible && e.tag().is_spatial() && e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Latest clip end time on the page, or zero without clips.
    #[must_use]
    pub fn timeline_end(&self) -> f64 {
        self.elements
            .iter()
            .filter_map(|e| e.clip.map(|c| c.end_time()))
            .fold(0.0, f64::max)
    }

    /// Elements whose clip is active at `time`, in paint order.
    #[must_use]
    pub fn active_at(&self, time: f64) -> Vec<&Element> {
        self.render_order()
            .into_iter()
            .filter(|e| e.clip.is_some_and(|c| c.is_active_at(time)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Clip, ElementKind, Geometry, ShapeKind};

    fn rect(x: f32, y: f32, z: i32) -> Element {
        Element::new(ElementKind::shape(ShapeKind::Rectangle)).with_geometry(Geometry {
            x,
            y,
            width: 100.0,
            height: 100.0,
            z_index: z,
        })
    }

    #[test]
    fn test_page_add_remove() {
        let mut page = Page::new();
        assert!(page.is_empty());

        let element = rect(0.0, 0.0, 1);
        let id = element.id;
        page.push(element);
        assert_eq!(page.len(), 1);
        assert!(page.contains(id));

        assert!(page.remove(id).is_some());
        assert!(page.remove(id).is_none());
        assert!(page.is_empty());
    }

    #[test]
    fn test_render_order_ties_break_by_insertion() {
        let mut page = Page::new();
        let first = rect(0.0, 0.0, 5);
        let second = rect(0.0, 0.0, 5);
        let back = rect(0.0, 0.0, 1);
        let (first_id, second_id, back_id) = (first.id, second.id, back.id);
        page.push(first);
        page.push(second);
        page.push(back);

        let order: Vec<_> = page.render_order().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![back_id, first_id, second_id]);

        // Most recently added wins the hit test on ties.
        assert_eq!(page.element_at(50.0, 50.0), Some(second_id));
    }

    #[test]
    fn test_element_at_skips_hidden_and_audio() {
        let mut page = Page::new();
        let below = rect(0.0, 0.0, 1);
        let mut hidden = rect(0.0, 0.0, 2);
        hidden.visible = false;
        let audio = Element::new(ElementKind::audio("a.mp3"))
            .with_geometry(Geometry { z_index: 3, ..Geometry::new(0.0, 0.0, 100.0, 100.0) });
        let below_id = below.id;
        page.push(below);
        page.push(hidden);
        page.push(audio);

        assert_eq!(page.element_at(10.0, 10.0), Some(below_id));
        assert_eq!(page.element_at(500.0, 10.0), None);
    }

    #[test]
    fn test_duplicate_rewrites_ids() {
        let mut page = Page::new();
        page.push(rect(0.0, 0.0, 1));
        page.push(rect(10.0, 10.0, 2));

        let copy = page.duplicate();
        assert_ne!(copy.id, page.id);
        assert_eq!(copy.len(), 2);
        for element in copy.elements() {
            assert!(!page.contains(element.id));
        }
    }

    #[test]
    fn test_timeline_queries() {
        let mut page = Page::new();
        let early = rect(0.0, 0.0, 1).with_clip(Clip::new(0.0, 2.0));
        let late = rect(0.0, 0.0, 2).with_clip(Clip::new(3.0, 4.0));
        let early_id = early.id;
        page.push(early);
        page.push(late);
        page.push(rect(0.0, 0.0, 3));

        assert!((page.timeline_end() - 7.0).abs() < f64::EPSILON);
        let active: Vec<_> = page.active_at(1.0).iter().map(|e| e.id).collect();
        assert_eq!(active, vec![early_id]);
        assert!(page.active_at(2.5).is_empty());
    }

    #[test]
    fn test_next_z_index() {
        let mut page = Page::new();
        assert_eq!(page.next_z_index(), 1);
        page.push(rect(0.0, 0.0, 7));
        assert_eq!(page.next_z_index(), 8);
    }
}
