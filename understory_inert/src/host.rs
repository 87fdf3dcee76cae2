// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host traits: the tree shape, focus state, and attribute access this crate consumes.
//!
//! The crate never owns elements. A host exposes its element handles through
//! [`ElementTree`], its focus machinery through [`FocusHost`], and the inert
//! attribute through [`InertAttribute`]. Listener registration lives in
//! [`EventHost`](crate::subscription::EventHost).
//!
//! [`Document`](crate::document::Document) implements all of them and is a
//! good starting point when adapting a real toolkit.

use core::fmt::Debug;

use crate::direction::Traversal;
use crate::error::InertError;

/// Read-only view of a live element tree.
///
/// Sibling order is document order. The topmost root is the single node
/// without a parent.
pub trait ElementTree {
    /// Element handle. Cheap to copy and compare.
    type Element: Copy + Eq + Debug;

    /// Parent of `element`, or `None` for the topmost root.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// First child of `element`.
    fn first_child(&self, element: Self::Element) -> Option<Self::Element>;

    /// Last child of `element`.
    fn last_child(&self, element: Self::Element) -> Option<Self::Element>;

    /// Sibling following `element` under the same parent.
    fn next_sibling(&self, element: Self::Element) -> Option<Self::Element>;

    /// Sibling preceding `element` under the same parent.
    fn previous_sibling(&self, element: Self::Element) -> Option<Self::Element>;

    /// Whether `element` itself carries the inert marker.
    ///
    /// This is attribute presence only; inheritance is resolved by
    /// [`controlling_inert_ancestor`](crate::resolve::controlling_inert_ancestor).
    fn has_inert_marker(&self, element: Self::Element) -> bool;
}

/// Focus state and focus operations of a host.
///
/// Implementations deliver focus events synchronously: [`FocusHost::focus`]
/// and [`FocusHost::dispatch_synthetic_tab`] may re-enter the installed
/// interceptor before they return.
pub trait FocusHost: ElementTree {
    /// Element that currently has focus, if any.
    fn active_element(&self) -> Option<Self::Element>;

    /// Whether the document currently holds input focus.
    fn has_focus(&self) -> bool;

    /// Navigation-order value of `element`.
    ///
    /// Negative values exclude the element from sequential navigation; hosts
    /// report `-1` for elements that are not focusable at all.
    fn tab_index(&self, element: Self::Element) -> i32;

    /// Request focus on `element`. Hosts ignore requests they cannot honor.
    fn focus(&mut self, element: Self::Element);

    /// Remove focus from `element` if it holds it.
    fn blur(&mut self, element: Self::Element);

    /// Dispatch a synthetic tab keystroke in the given direction.
    ///
    /// `Ok` means the keystroke was dispatched, not that the host moved focus;
    /// many hosts ignore synthetic keystrokes. Return
    /// [`InertError::UnsupportedSynthesis`] when the keystroke cannot be built.
    fn dispatch_synthetic_tab(&mut self, traversal: Traversal) -> Result<(), InertError>;
}

/// Boolean accessor pair backed by the inert attribute.
///
/// The attribute stays the single source of truth; there is no separate flag.
pub trait InertAttribute: ElementTree {
    /// Add (`true`) or remove (`false`) the inert attribute.
    fn set_inert(&mut self, element: Self::Element, inert: bool) -> Result<(), InertError>;

    /// Whether the attribute is present on `element`.
    fn inert(&self, element: Self::Element) -> bool {
        self.has_inert_marker(element)
    }
}
