//! Z-order layering: neighbor swaps and total renumbering.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{ElementId, Page};

/// Direction of a single-step z-order nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZDirection {
    /// Toward the front (higher z-index).
    Up,
    /// Toward the back (lower z-index).
    Down,
}

/// Swap the z-index of `id` with its nearest neighbor in `direction`.
///
/// Only the two z-index values are exchanged; every other element keeps its
/// own. Returns `false` (and changes nothing) when the element is missing or
/// has no neighbor in that direction.
pub fn nudge(page: &mut Page, id: ElementId, direction: ZDirection) -> bool {
    let Some(z) = page.get(id).map(|e| e.geometry.z_index) else {
        return false;
    };

    let neighbor = {
        let order = page.render_order();
        match direction {
            // min_by_key keeps the first of a tied group: the one directly above.
            ZDirection::Up => order
                .iter()
                .filter(|e| e.geometry.z_index > z)
                .min_by_key(|e| e.geometry.z_index),
            // max_by_key keeps the last of a tied group: the one directly below.
            ZDirection::Down => order
                .iter()
                .filter(|e| e.geometry.z_index < z)
                .max_by_key(|e| e.geometry.z_index),
        }
        .map(|e| (e.id, e.geometry.z_index))
    };

    let Some((neighbor_id, neighbor_z)) = neighbor else {
        return false;
    };

    for element in page.elements_mut() {
        if element.id == id {
            element.geometry.z_index = neighbor_z;
        } else if element.id == neighbor_id {
            element.geometry.z_index = z;
        }
    }
    true
}

/// Renumber every element from an explicit front-to-back ordering.
///
/// The element at position `p` receives `count - p`, so the first listed is
/// front-most. Ids not on the page are skipped and duplicates keep their first
/// position; elements the list omits are appended behind the listed ones in
/// their current layer order, so the result is always a total renumbering.
/// Returns `false` for an empty page.
pub fn reorder(page: &mut Page, front_to_back: &[ElementId]) -> bool {
    if page.is_empty() {
        return false;
    }

    let mut seen = HashSet::new();
    let mut order: Vec<ElementId> = front_to_back
        .iter()
        .copied()
        .filter(|id| page.contains(*id) && seen.insert(*id))
        .collect();
    let omitted: Vec<ElementId> = page
        .layer_order()
        .into_iter()
        .map(|e| e.id)
        .filter(|id| !seen.contains(id))
        .collect();
    if !omitted.is_empty() {
        tracing::debug!("Reorder omitted {} element(s); keeping them at the back", omitted.len());
    }
    order.extend(omitted);

    let count = i32::try_from(order.len()).unwrap_or(i32::MAX);
    for element in page.elements_mut() {
        if let Some(position) = order.iter().position(|id| *id == element.id) {
            let position = i32::try_from(position).unwrap_or(i32::MAX);
            element.geometry.z_index = count - position;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Element, ElementKind, Geometry};

    fn page_with(zs: &[i32]) -> (Page, Vec<ElementId>) {
        let mut page = Page::new();
        let mut ids = Vec::new();
        for &z in zs {
            let element = Element::new(ElementKind::text("t")).with_geometry(Geometry {
                z_index: z,
                ..Geometry::default()
            });
            ids.push(element.id);
            page.push(element);
        }
        (page, ids)
    }

    fn z(page: &Page, id: ElementId) -> i32 {
        page.get(id).map(|e| e.geometry.z_index).expect("element")
    }

    #[test]
    fn test_nudge_up_swaps_with_next_higher() {
        let (mut page, ids) = page_with(&[1, 5, 9]);
        assert!(nudge(&mut page, ids[0], ZDirection::Up));
        assert_eq!(z(&page, ids[0]), 5);
        assert_eq!(z(&page, ids[1]), 1);
        assert_eq!(z(&page, ids[2]), 9);
    }

    #[test]
    fn test_nudge_down_swaps_with_next_lower() {
        let (mut page, ids) = page_with(&[1, 5, 9]);
        assert!(nudge(&mut page, ids[2], ZDirection::Down));
        assert_eq!(z(&page, ids[2]), 5);
        assert_eq!(z(&page, ids[1]), 9);
        assert_eq!(z(&page, ids[0]), 1);
    }

    #[test]
    fn test_nudge_without_neighbor_is_noop() {
        let (mut page, ids) = page_with(&[1, 2]);
        assert!(!nudge(&mut page, ids[1], ZDirection::Up));
        assert!(!nudge(&mut page, ids[0], ZDirection::Down));
        assert_eq!(z(&page, ids[0]), 1);
        assert_eq!(z(&page, ids[1]), 2);
    }

    #[test]
    fn test_nudge_equal_z_has_no_strict_neighbor() {
        let (mut page, ids) = page_with(&[3, 3]);
        assert!(!nudge(&mut page, ids[0], ZDirection::Up));
    }

    #[test]
    fn test_nudge_stale_id_is_noop() {
        let (mut page, _) = page_with(&[1, 2]);
        assert!(!nudge(&mut page, ElementId::new(), ZDirection::Up));
    }

    #[test]
    fn test_reorder_total_renumbering() {
        let (mut page, ids) = page_with(&[10, 20, 30]);
        assert!(reorder(&mut page, &[ids[2], ids[0], ids[1]]));
        assert_eq!(z(&page, ids[2]), 3);
        assert_eq!(z(&page, ids[0]), 2);
        assert_eq!(z(&page, ids[1]), 1);
    }

    #[test]
    fn test_reorder_partial_list_keeps_rest_behind() {
        let (mut page, ids) = page_with(&[1, 2, 3]);
        assert!(reorder(&mut page, &[ids[0], ElementId::new(), ids[0]]));
        assert_eq!(z(&page, ids[0]), 3);
        // Omitted elements follow in their previous front-to-back order.
        assert_eq!(z(&page, ids[2]), 2);
        assert_eq!(z(&page, ids[1]), 1);
    }

    #[test]
    fn test_reorder_empty_page() {
        let mut page = Page::new();
        assert!(!reorder(&mut page, &[]));
    }
}
