// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree navigation: step through an element tree in pre-order.
//!
//! [`adjacent`] is a pure function of tree shape. It is used to escape an
//! inert subtree, so it takes an optional `boundary`: the subtree being
//! escaped is never re-entered from its own root when walking forward.
//!
//! ## Asymmetry
//!
//! Walking backward from an element without a previous sibling yields its
//! parent, even when the element is the boundary. Walking forward never yields
//! an ancestor. This lets Shift+Tab leave an inert region upward, and is kept
//! on purpose.

use crate::direction::Traversal;
use crate::host::ElementTree;

/// Nearest element to `element` in pre-order, moving in `traversal`.
///
/// - Forward: the first child, unless `element` is the `boundary`; otherwise
///   the first next-sibling found while walking up through ancestors.
///   Returns `None` past the end of the tree.
/// - Backward: the deepest last descendant of the previous sibling if there
///   is one; otherwise the parent.
pub fn adjacent<T>(
    tree: &T,
    element: T::Element,
    traversal: Traversal,
    boundary: Option<T::Element>,
) -> Option<T::Element>
where
    T: ElementTree + ?Sized,
{
    match traversal {
        Traversal::Backward => {
            let Some(mut node) = tree.previous_sibling(element) else {
                return tree.parent(element);
            };
            while let Some(last) = tree.last_child(node) {
                node = last;
            }
            Some(node)
        }
        Traversal::Forward => {
            if boundary != Some(element)
                && let Some(first) = tree.first_child(element)
            {
                return Some(first);
            }
            let mut node = element;
            loop {
                if let Some(next) = tree.next_sibling(node) {
                    return Some(next);
                }
                node = tree.parent(node)?;
            }
        }
    }
}

/// Iterator over successive [`adjacent`] elements, excluding the seed.
///
/// ```
/// use understory_inert::direction::Traversal;
/// use understory_inert::document::Document;
/// use understory_inert::navigate::Walk;
///
/// let mut doc = Document::new();
/// let body = doc.body();
/// let a = doc.create_element(body, "section");
/// let a1 = doc.create_element(a, "button");
/// let b = doc.create_element(body, "button");
///
/// let forward: Vec<_> = Walk::new(&doc, body, Traversal::Forward, None).collect();
/// assert_eq!(forward, vec![a, a1, b]);
///
/// // With `a` as the boundary, its children are skipped.
/// let escaped: Vec<_> = Walk::new(&doc, a, Traversal::Forward, Some(a)).collect();
/// assert_eq!(escaped, vec![b]);
/// ```
#[derive(Debug)]
pub struct Walk<'a, T: ElementTree + ?Sized> {
    tree: &'a T,
    current: Option<T::Element>,
    traversal: Traversal,
    boundary: Option<T::Element>,
}

impl<'a, T: ElementTree + ?Sized> Walk<'a, T> {
    /// Walk from `seed` in `traversal`, honoring `boundary`.
    pub fn new(
        tree: &'a T,
        seed: T::Element,
        traversal: Traversal,
        boundary: Option<T::Element>,
    ) -> Self {
        Self {
            tree,
            current: Some(seed),
            traversal,
            boundary,
        }
    }
}

impl<T: ElementTree + ?Sized> Iterator for Walk<'_, T> {
    type Item = T::Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = adjacent(self.tree, self.current?, self.traversal, self.boundary);
        self.current = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, NodeId};
    use alloc::vec;
    use alloc::vec::Vec;

    // body > [a > [a1, a2 > [a21]], b, c]
    fn sample() -> (Document, [NodeId; 7]) {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element(body, "div");
        let a1 = doc.create_element(a, "button");
        let a2 = doc.create_element(a, "div");
        let a21 = doc.create_element(a2, "input");
        let b = doc.create_element(body, "button");
        let c = doc.create_element(body, "button");
        (doc, [body, a, a1, a2, a21, b, c])
    }

    #[test]
    fn forward_is_pre_order() {
        let (doc, [body, a, a1, a2, a21, b, c]) = sample();
        let seen: Vec<_> = Walk::new(&doc, body, Traversal::Forward, None).collect();
        assert_eq!(seen, vec![a, a1, a2, a21, b, c]);
    }

    #[test]
    fn forward_ends_at_tree_top() {
        let (doc, [.., c]) = sample();
        assert_eq!(adjacent(&doc, c, Traversal::Forward, None), None);
    }

    #[test]
    fn forward_climbs_to_first_unvisited_sibling() {
        let (doc, [_, _, _, _, a21, b, _]) = sample();
        assert_eq!(adjacent(&doc, a21, Traversal::Forward, None), Some(b));
    }

    #[test]
    fn boundary_prevents_descent() {
        let (doc, [_, a, a1, _, _, b, _]) = sample();
        assert_eq!(adjacent(&doc, a, Traversal::Forward, None), Some(a1));
        assert_eq!(adjacent(&doc, a, Traversal::Forward, Some(a)), Some(b));
    }

    // The boundary only guards its own root; descendants still descend.
    #[test]
    fn boundary_does_not_apply_to_other_nodes() {
        let (doc, [_, a, _, a2, a21, _, _]) = sample();
        assert_eq!(adjacent(&doc, a2, Traversal::Forward, Some(a)), Some(a21));
    }

    #[test]
    fn backward_descends_into_previous_sibling() {
        let (doc, [_, _, _, _, a21, b, c]) = sample();
        assert_eq!(adjacent(&doc, b, Traversal::Backward, None), Some(a21));
        assert_eq!(adjacent(&doc, c, Traversal::Backward, None), Some(b));
    }

    #[test]
    fn backward_returns_parent_even_past_boundary() {
        let (doc, [body, a, a1, ..]) = sample();
        assert_eq!(adjacent(&doc, a1, Traversal::Backward, Some(a)), Some(a));
        assert_eq!(adjacent(&doc, a, Traversal::Backward, Some(a)), Some(body));
    }

    #[test]
    fn backward_walk_visits_reverse_pre_order_then_ancestors() {
        let (doc, [body, a, a1, a2, a21, b, c]) = sample();
        let seen: Vec<_> = Walk::new(&doc, c, Traversal::Backward, None).collect();
        assert_eq!(seen, vec![b, a21, a2, a1, a, body, doc.root()]);
    }
}
