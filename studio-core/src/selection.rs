//! The selection bridge: one authoritative "what is selected" for every panel.
//!
//! The element snapshot carried by [`Selection::Element`] is a read copy.
//! The store refreshes it after every mutation of the current page, so the
//! inspector, layer list and timeline never read stale values.

use serde::{Deserialize, Serialize};

use crate::{Element, ElementId, Page};

/// What a caller asks to select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum SelectionTarget {
    /// Clear the selection.
    None,
    /// Select the page background.
    Canvas,
    /// Select one element.
    Element(ElementId),
    /// Select several elements.
    Multi(Vec<ElementId>),
}

/// The active selection descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Selection {
    /// Nothing selected.
    #[default]
    #[serde(rename = "none")]
    Empty,
    /// The page background is selected.
    Canvas,
    /// One element is selected.
    Element {
        /// Selected element.
        id: ElementId,
        /// Read copy of the element, kept in sync by the store.
        snapshot: Box<Element>,
    },
    /// Several elements are selected.
    Multi {
        /// Selected elements.
        ids: Vec<ElementId>,
    },
}

impl Selection {
    /// Resolve a target against the page, taking the snapshot from the page.
    ///
    /// Ids not on the page are dropped; a target left with nothing resolves to
    /// [`Selection::Empty`].
    #[must_use]
    pub fn resolve(target: SelectionTarget, page: &Page) -> Self {
        let mut selection = match target {
            SelectionTarget::None => Self::Empty,
            SelectionTarget::Canvas => Self::Canvas,
            SelectionTarget::Element(id) => page.get(id).map_or(Self::Empty, |element| {
                Self::Element {
                    id,
                    snapshot: Box::new(element.clone()),
                }
            }),
            SelectionTarget::Multi(ids) => Self::Multi { ids },
        };
        selection.refresh(page);
        selection
    }

    /// Re-read the snapshot (or id list) from the page.
    pub fn refresh(&mut self, page: &Page) {
        let collapsed = match self {
            Self::Element { id, snapshot } => match page.get(*id) {
                Some(element) => {
                    if **snapshot != *element {
                        **snapshot = element.clone();
                    }
                    None
                }
                None => Some(Self::Empty),
            },
            Self::Multi { ids } => {
                let mut seen = std::collections::HashSet::new();
                ids.retain(|id| page.contains(*id) && seen.insert(*id));
                match ids.as_slice() {
                    [] => Some(Self::Empty),
                    [only] => Some(Self::resolve(SelectionTarget::Element(*only), page)),
                    _ => None,
                }
            }
            Self::Empty | Self::Canvas => None,
        };
        if let Some(next) = collapsed {
            *self = next;
        }
    }

    /// The single selected element id, if exactly one element is selected.
    #[must_use]
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            Self::Element { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Read copy of the selected element.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Element> {
        match self {
            Self::Element { snapshot, .. } => Some(snapshot.as_ref()),
            _ => None,
        }
    }

    /// Whether `id` is part of the selection.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        match self {
            Self::Element { id: selected, .. } => *selected == id,
            Self::Multi { ids } => ids.contains(&id),
            Self::Empty | Self::Canvas => false,
        }
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
