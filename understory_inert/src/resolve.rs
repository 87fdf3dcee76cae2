// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inertness resolution: which element, if any, makes a given element inert.

use crate::host::ElementTree;

/// Nearest element carrying the inert marker, starting at `element` itself.
///
/// The topmost root (the node without a parent) is never considered, so a
/// marker on it has no effect. Returns `None` when no marked element is found.
/// Runs in O(depth).
///
/// Nested markers are not cumulative: an element inside two marked subtrees
/// resolves to the nearer one and is inert exactly once.
pub fn controlling_inert_ancestor<T>(tree: &T, element: T::Element) -> Option<T::Element>
where
    T: ElementTree + ?Sized,
{
    let mut node = element;
    loop {
        let parent = tree.parent(node)?;
        if tree.has_inert_marker(node) {
            return Some(node);
        }
        node = parent;
    }
}

/// Whether `element` is excluded from focus and pointer interaction.
pub fn is_inert<T>(tree: &T, element: T::Element) -> bool
where
    T: ElementTree + ?Sized,
{
    controlling_inert_ancestor(tree, element).is_some()
}
