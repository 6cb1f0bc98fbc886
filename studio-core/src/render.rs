//! Flattened draw list for a renderer.
//!
//! The editor core does not paint. A renderer asks for a [`DisplayList`] of
//! one page and draws its items in order, back to front.

use serde::{Deserialize, Serialize};

use crate::{CanvasState, ElementId, ElementKind, Geometry};

/// One element to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayItem {
    /// Source element.
    pub id: ElementId,
    /// Bounds and layer.
    pub geometry: Geometry,
    /// What to draw.
    pub kind: ElementKind,
    /// Offset into the clip's media for time-based items, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_time: Option<f64>,
}

/// A page ready to draw, back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Canvas background color.
    pub background: String,
    /// Items in ascending z order.
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    /// Build the draw list for page `page_index`.
    ///
    /// Hidden elements and elements without a canvas footprint are skipped.
    /// With `at_time` set, scheduled elements appear only while their clip is
    /// active; unscheduled elements are always drawn.
    #[must_use]
    pub fn build(state: &CanvasState, page_index: usize, at_time: Option<f64>) -> Option<Self> {
        let page = state.page(page_index)?;
        let items = page
            .render_order()
            .into_iter()
            .filter(|e| e.visible && e.tag().is_spatial())
            .filter_map(|e| {
                let media_time = match (at_time, e.clip) {
                    (Some(t), Some(clip)) if !clip.is_active_at(t) => return None,
                    (Some(t), Some(clip)) => Some(t - clip.start_time),
                    _ => None,
                };
                Some(DisplayItem {
                    id: e.id,
                    geometry: e.geometry,
                    kind: e.kind.clone(),
                    media_time,
                })
            })
            .collect();

        Some(Self {
            width: state.width(),
            height: state.height(),
            background: state.background_color.clone(),
            items,
        })
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Clip, Element, SceneStore};

    #[test]
    fn test_items_back_to_front() {
        let mut store = SceneStore::default();
        let back = store.add_element(Element::new(ElementKind::text("a")));
        let front = store.add_element(Element::new(ElementKind::text("b")));
        store.add_element(Element::new(ElementKind::audio("track.mp3")));

        let list = DisplayList::build(&store.snapshot(), 0, None).expect("page");
        let ids: Vec<_> = list.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![back, front]);
    }

    #[test]
    fn test_clip_filtering() {
        let mut store = SceneStore::default();
        let always = store.add_element(Element::new(ElementKind::text("title")));
        let late = store.add_element(
            Element::new(ElementKind::video("clip.mp4")).with_clip(Clip::new(3.0, 2.0)),
        );

        let early = DisplayList::build(&store.snapshot(), 0, Some(1.0)).expect("page");
        assert_eq!(early.len(), 1);
        assert_eq!(early.items[0].id, always);

        let during = DisplayList::build(&store.snapshot(), 0, Some(4.0)).expect("page");
        let item = during.items.iter().find(|i| i.id == late).expect("video");
        assert!((item.media_time.expect("time") - 1.0).abs() < 1e-9);

        let all = DisplayList::build(&store.snapshot(), 0, None).expect("page");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_missing_page() {
        let store = SceneStore::default();
        assert!(DisplayList::build(&store.snapshot(), 3, None).is_none());
    }
}
