// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document: a reference host with no native inert support.
//!
//! [`Document`] is a small element tree with attributes, a navigation-order
//! value per element, an active element, and synchronous event delivery to
//! installed [`InertGuard`]s. It implements every host trait of this crate.
//!
//! ## Host behavior
//!
//! - The tree starts as `html > body`. The `html` element is the topmost root.
//! - An element is focusable when it has a navigation-order value
//!   ([`Document::set_tab_index`]) and is connected to the root. Elements
//!   without one report `-1`.
//! - Disconnected elements (created under a stale parent) take no focus,
//!   pointer presses or clicks.
//! - [`Document::focus`] moves the active element, then delivers the focus
//!   event to focus-capture listeners. If a listener suppresses it, page
//!   handlers never see it (see [`Delivered`]). A redirected focus event is
//!   not suppressed: the log shows the focus of the redirect target first,
//!   then the original focus event for the element that was left.
//! - [`Document::key_down`] with Tab runs sequential navigation in tree order
//!   over elements with a non-negative navigation order. Positive values are
//!   not reordered. Running off either end moves focus out of the document.
//! - [`Document::pointer_down`] focuses the nearest focusable ancestor of the
//!   pressed element, or clears focus when there is none.
//! - Synthetic tab keystrokes follow [`SyntheticTab`].
//!
//! The document does not know about inertness; that is the guard's job.
//!
//! ## Node identifiers
//!
//! [`NodeId`] is a slot index plus a generation. Removing an element frees
//! its slot; a reused slot gets a new generation so stale ids never alias a
//! live element.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::direction::{KeyPress, Traversal};
use crate::error::InertError;
use crate::guard::InertGuard;
use crate::host::{ElementTree, FocusHost, InertAttribute};
use crate::redirect::Disposition;
use crate::style::INERT_ATTRIBUTE;
use crate::subscription::{EventHost, HostEvent, Interest, ListenerId};

/// Identifier for an element of a [`Document`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// How a [`Document`] treats synthetic tab keystrokes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SyntheticTab {
    /// Deliver the keystroke and run sequential navigation.
    Honored,
    /// Deliver the keystroke to listeners but do not move focus.
    #[default]
    Ignored,
    /// Refuse to construct the keystroke.
    Unsupported,
}

/// An event that reached page-level handlers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Delivered {
    /// A focus event was not suppressed.
    ///
    /// Focus redirected away from an inert element still records
    /// `Focus(inert_element)`, after the nested `Focus(redirect_target)`. By
    /// then the inert element is no longer active.
    Focus(NodeId),
    /// An element lost focus.
    Blur(NodeId),
    /// A click was not suppressed.
    Click(NodeId),
}

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: HashMap<String, String>,
    tab_index: Option<i32>,
}

impl Node {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: String::from(tag),
            parent,
            children: Vec::new(),
            attributes: HashMap::new(),
            tab_index: None,
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug)]
struct Listener {
    id: ListenerId,
    interest: Interest,
    guard: Rc<InertGuard>,
}

/// A live element tree with focus state and event delivery.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    has_focus: bool,
    synthetic_tab: SyntheticTab,
    listeners: Vec<Listener>,
    next_listener: u32,
    stylesheets: Vec<String>,
    delivered: Vec<Delivered>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a focused document containing `html > body`.
    pub fn new() -> Self {
        let root = NodeId(0, 1);
        let body = NodeId(1, 1);
        let mut html = Node::new("html", None);
        html.children.push(body);
        let slots = vec![
            Slot {
                generation: 1,
                node: Some(html),
            },
            Slot {
                generation: 1,
                node: Some(Node::new("body", Some(root))),
            },
        ];
        Self {
            slots,
            free: Vec::new(),
            root,
            body,
            active: None,
            has_focus: true,
            synthetic_tab: SyntheticTab::default(),
            listeners: Vec::new(),
            next_listener: 0,
            stylesheets: Vec::new(),
            delivered: Vec::new(),
        }
    }

    /// The `html` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Append a new element under `parent`.
    ///
    /// If `parent` is stale the element is created detached.
    pub fn create_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let parent = self.is_alive(parent).then_some(parent);
        let id = self.alloc(Node::new(tag, parent));
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.push(id);
        }
        id
    }

    /// Remove `element` and its subtree. The root and body cannot be removed.
    ///
    /// Focus inside the removed subtree is dropped without a blur event.
    pub fn remove(&mut self, element: NodeId) -> bool {
        if element == self.root || element == self.body || !self.is_alive(element) {
            return false;
        }
        if let Some(parent) = self.node(element).and_then(|n| n.parent)
            && let Some(parent) = self.node_mut(parent)
        {
            parent.children.retain(|&c| c != element);
        }
        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            let Some(node) = self.slots.get_mut(id.idx()).and_then(|s| s.node.take()) else {
                continue;
            };
            stack.extend(node.children);
            self.free.push(id.0);
            if self.active == Some(id) {
                self.active = None;
            }
        }
        true
    }

    /// Whether `element` refers to a live element.
    pub fn is_alive(&self, element: NodeId) -> bool {
        self.node(element).is_some()
    }

    /// Tag name of `element`.
    pub fn tag(&self, element: NodeId) -> Option<&str> {
        self.node(element).map(|n| n.tag.as_str())
    }

    /// Value of an attribute.
    pub fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.node(element)?.attributes.get(name).map(String::as_str)
    }

    /// Whether an attribute is present.
    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    /// Set an attribute. Returns `false` for stale elements.
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> bool {
        let Some(node) = self.node_mut(element) else {
            return false;
        };
        node.attributes.insert(String::from(name), String::from(value));
        true
    }

    /// Remove an attribute. Returns `true` if it was present.
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> bool {
        self.node_mut(element)
            .is_some_and(|n| n.attributes.remove(name).is_some())
    }

    /// Set the navigation-order value; `None` makes the element unfocusable.
    pub fn set_tab_index(&mut self, element: NodeId, tab_index: Option<i32>) {
        if let Some(node) = self.node_mut(element) {
            node.tab_index = tab_index;
        }
    }

    /// Whether `element` is live and reaches the root through its parents.
    pub fn is_connected(&self, element: NodeId) -> bool {
        let mut node = element;
        loop {
            let Some(n) = self.node(node) else {
                return false;
            };
            match n.parent {
                Some(parent) => node = parent,
                None => return node == self.root,
            }
        }
    }

    /// Whether `element` can receive focus at all.
    pub fn is_focusable(&self, element: NodeId) -> bool {
        self.node(element).is_some_and(|n| n.tab_index.is_some())
            && self.is_connected(element)
    }

    /// Set whether the document holds input focus.
    pub fn set_has_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    /// Whether the document holds input focus.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Choose how synthetic tab keystrokes are treated.
    pub fn set_synthetic_tab(&mut self, synthetic_tab: SyntheticTab) {
        self.synthetic_tab = synthetic_tab;
    }

    /// Currently focused element.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    /// Focus `element` and deliver the focus event.
    ///
    /// Requests for unfocusable or already focused elements are ignored.
    pub fn focus(&mut self, element: NodeId) {
        if !self.is_focusable(element) || self.active == Some(element) {
            return;
        }
        if let Some(previous) = self.active.replace(element) {
            self.delivered.push(Delivered::Blur(previous));
        }
        if self.dispatch(HostEvent::Focus(element)) == Disposition::Continue {
            self.delivered.push(Delivered::Focus(element));
        }
    }

    /// Remove focus from `element` if it is focused.
    pub fn blur(&mut self, element: NodeId) {
        if self.active == Some(element) {
            self.active = None;
            self.delivered.push(Delivered::Blur(element));
        }
    }

    /// Deliver a key press; Tab then runs sequential navigation.
    pub fn key_down(&mut self, press: KeyPress) {
        let disposition = self.dispatch(HostEvent::KeyDown(press));
        if disposition == Disposition::Continue
            && let Some(traversal) = press.traversal()
        {
            self.navigate_sequentially(traversal);
        }
    }

    /// Deliver a pointer press, then focus the nearest focusable ancestor.
    ///
    /// Presses on disconnected elements are dropped.
    pub fn pointer_down(&mut self, element: NodeId) {
        if !self.is_connected(element) {
            trace!(?element, "pointer press on disconnected element dropped");
            return;
        }
        if self.dispatch(HostEvent::PointerDown(element)) == Disposition::Suppress {
            return;
        }
        let mut node = Some(element);
        while let Some(id) = node {
            if self.is_focusable(id) {
                self.focus(id);
                return;
            }
            node = self.node(id).and_then(|n| n.parent);
        }
        if let Some(active) = self.active {
            self.blur(active);
        }
    }

    /// Deliver a click. Returns `true` if its default action ran.
    ///
    /// Clicks on disconnected elements are dropped.
    pub fn click(&mut self, element: NodeId) -> bool {
        if !self.is_connected(element) {
            trace!(?element, "click on disconnected element dropped");
            return false;
        }
        if self.dispatch(HostEvent::Click(element)) == Disposition::Suppress {
            return false;
        }
        self.delivered.push(Delivered::Click(element));
        true
    }

    /// Stylesheets injected so far.
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Events that reached page handlers, oldest first.
    pub fn delivered(&self) -> &[Delivered] {
        &self.delivered
    }

    /// Forget delivered events.
    pub fn clear_delivered(&mut self) {
        self.delivered.clear();
    }

    /// Whether a focus event for `element` reached page handlers.
    pub fn was_focused(&self, element: NodeId) -> bool {
        self.delivered.contains(&Delivered::Focus(element))
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.idx())
            .filter(|s| s.generation == id.1)
            .and_then(|s| s.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.idx())
            .filter(|s| s.generation == id.1)
            .and_then(|s| s.node.as_mut())
    }

    fn order_value(&self, id: NodeId) -> i32 {
        if !self.is_connected(id) {
            return -1;
        }
        self.node(id).and_then(|n| n.tab_index).unwrap_or(-1)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.node = Some(node);
            return NodeId(idx, slot.generation);
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "documents never hold u32::MAX elements"
        )]
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            node: Some(node),
        });
        NodeId(idx, 1)
    }

    fn dispatch(&mut self, event: HostEvent<NodeId>) -> Disposition {
        let interest = event.interest();
        let guards: SmallVec<[Rc<InertGuard>; 2]> = self
            .listeners
            .iter()
            .filter(|l| l.interest.intersects(interest))
            .map(|l| Rc::clone(&l.guard))
            .collect();
        for guard in guards {
            if guard.handle(self, &event) == Disposition::Suppress {
                return Disposition::Suppress;
            }
        }
        Disposition::Continue
    }

    fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    fn navigate_sequentially(&mut self, traversal: Traversal) {
        let order = self.pre_order();
        let position = self.active.and_then(|a| order.iter().position(|&n| n == a));
        let tabbable = |id: &&NodeId| self.order_value(**id) >= 0;
        let next = match (traversal, position) {
            (Traversal::Forward, Some(p)) => order[p + 1..].iter().find(tabbable),
            (Traversal::Forward, None) => order.iter().find(tabbable),
            (Traversal::Backward, Some(p)) => order[..p].iter().rev().find(tabbable),
            (Traversal::Backward, None) => order.iter().rev().find(tabbable),
        }
        .copied();
        match next {
            Some(next) => self.focus(next),
            None => {
                if let Some(active) = self.active {
                    trace!(?active, "sequential navigation left the document");
                    self.blur(active);
                }
            }
        }
    }
}

impl ElementTree for Document {
    type Element = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.node(element)?.parent
    }

    fn first_child(&self, element: NodeId) -> Option<NodeId> {
        self.node(element)?.children.first().copied()
    }

    fn last_child(&self, element: NodeId) -> Option<NodeId> {
        self.node(element)?.children.last().copied()
    }

    fn next_sibling(&self, element: NodeId) -> Option<NodeId> {
        let siblings = &self.node(self.node(element)?.parent?)?.children;
        let i = siblings.iter().position(|&c| c == element)?;
        siblings.get(i + 1).copied()
    }

    fn previous_sibling(&self, element: NodeId) -> Option<NodeId> {
        let siblings = &self.node(self.node(element)?.parent?)?.children;
        let i = siblings.iter().position(|&c| c == element)?;
        siblings.get(i.checked_sub(1)?).copied()
    }

    fn has_inert_marker(&self, element: NodeId) -> bool {
        self.has_attribute(element, INERT_ATTRIBUTE)
    }
}

impl FocusHost for Document {
    fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    fn has_focus(&self) -> bool {
        self.has_focus
    }

    fn tab_index(&self, element: NodeId) -> i32 {
        self.order_value(element)
    }

    fn focus(&mut self, element: NodeId) {
        Self::focus(self, element);
    }

    fn blur(&mut self, element: NodeId) {
        Self::blur(self, element);
    }

    fn dispatch_synthetic_tab(&mut self, traversal: Traversal) -> Result<(), InertError> {
        let press = KeyPress::tab_towards(traversal);
        match self.synthetic_tab {
            SyntheticTab::Unsupported => Err(InertError::UnsupportedSynthesis),
            SyntheticTab::Ignored => {
                self.dispatch(HostEvent::KeyDown(press));
                Ok(())
            }
            SyntheticTab::Honored => {
                self.key_down(press);
                Ok(())
            }
        }
    }
}

impl InertAttribute for Document {
    fn set_inert(&mut self, element: NodeId, inert: bool) -> Result<(), InertError> {
        if !self.is_alive(element) {
            return Err(InertError::AttributeMutation);
        }
        if inert {
            self.set_attribute(element, INERT_ATTRIBUTE, "");
        } else {
            self.remove_attribute(element, INERT_ATTRIBUTE);
        }
        Ok(())
    }
}

impl EventHost for Document {
    fn add_listener(&mut self, interest: Interest, guard: Rc<InertGuard>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener {
            id,
            interest,
            guard,
        });
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    fn inject_stylesheet(&mut self, css: &str) {
        self.stylesheets.push(String::from(css));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabbable(doc: &mut Document, parent: NodeId, tag: &str) -> NodeId {
        let id = doc.create_element(parent, tag);
        doc.set_tab_index(id, Some(0));
        id
    }

    #[test]
    fn starts_with_html_and_body() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some("html"));
        assert_eq!(doc.tag(doc.body()), Some("body"));
        assert_eq!(ElementTree::parent(&doc, doc.body()), Some(doc.root()));
        assert_eq!(ElementTree::parent(&doc, doc.root()), None);
        assert!(doc.has_focus());
    }

    #[test]
    fn siblings_follow_insertion_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element(body, "a");
        let b = doc.create_element(body, "b");
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.previous_sibling(b), Some(a));
        assert_eq!(doc.previous_sibling(a), None);
        assert_eq!(doc.next_sibling(b), None);
        assert_eq!(doc.first_child(body), Some(a));
        assert_eq!(doc.last_child(body), Some(b));
    }

    #[test]
    fn removed_ids_go_stale_and_slots_are_reused() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element(body, "div");
        let a1 = doc.create_element(a, "span");
        assert!(doc.remove(a));
        assert!(!doc.is_alive(a));
        assert!(!doc.is_alive(a1));
        assert_eq!(doc.first_child(body), None);

        let c = doc.create_element(body, "div");
        assert_ne!(c, a);
        assert_ne!(c, a1);
        assert!(!doc.is_alive(a));
        assert!(!doc.remove(doc.body()));
    }

    #[test]
    fn removing_focused_subtree_drops_focus() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element(body, "div");
        let a1 = tabbable(&mut doc, a, "button");
        doc.focus(a1);
        doc.remove(a);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn unfocusable_elements_ignore_focus() {
        let mut doc = Document::new();
        let div = doc.create_element(doc.body(), "div");
        doc.focus(div);
        assert_eq!(doc.active_element(), None);
        assert_eq!(FocusHost::tab_index(&doc, div), -1);
    }

    #[test]
    fn negative_tab_index_is_focusable_by_script() {
        let mut doc = Document::new();
        let div = doc.create_element(doc.body(), "div");
        doc.set_tab_index(div, Some(-1));
        doc.focus(div);
        assert_eq!(doc.active_element(), Some(div));
    }

    #[test]
    fn tab_walks_tabbable_elements_in_tree_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = tabbable(&mut doc, body, "button");
        let skipped = doc.create_element(body, "div");
        doc.set_tab_index(skipped, Some(-1));
        let group = doc.create_element(body, "div");
        let b = tabbable(&mut doc, group, "input");

        doc.key_down(KeyPress::tab());
        assert_eq!(doc.active_element(), Some(a));
        doc.key_down(KeyPress::tab());
        assert_eq!(doc.active_element(), Some(b));
        doc.key_down(KeyPress::shift_tab());
        assert_eq!(doc.active_element(), Some(a));
        // Off the start of the page: focus leaves the document.
        doc.key_down(KeyPress::shift_tab());
        assert_eq!(doc.active_element(), None);
        // Shift+Tab from outside enters at the end.
        doc.key_down(KeyPress::shift_tab());
        assert_eq!(doc.active_element(), Some(b));
    }

    #[test]
    fn pointer_focuses_nearest_focusable_ancestor() {
        let mut doc = Document::new();
        let body = doc.body();
        let button = tabbable(&mut doc, body, "button");
        let label = doc.create_element(button, "span");
        let plain = doc.create_element(body, "p");

        doc.pointer_down(label);
        assert_eq!(doc.active_element(), Some(button));
        doc.pointer_down(plain);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn delivery_log_records_focus_blur_and_click() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = tabbable(&mut doc, body, "button");
        let b = tabbable(&mut doc, body, "button");
        doc.focus(a);
        doc.focus(b);
        assert!(doc.click(b));
        assert_eq!(
            doc.delivered(),
            &[
                Delivered::Focus(a),
                Delivered::Blur(a),
                Delivered::Focus(b),
                Delivered::Click(b),
            ]
        );
        doc.clear_delivered();
        assert!(doc.delivered().is_empty());
    }

    #[test]
    fn disconnected_elements_take_no_interaction() {
        let mut doc = Document::new();
        let gone = doc.create_element(doc.body(), "section");
        doc.remove(gone);
        let orphan = doc.create_element(gone, "div");
        let button = tabbable(&mut doc, orphan, "button");
        assert!(doc.is_alive(button));
        assert!(!doc.is_connected(button));
        assert!(doc.is_connected(doc.body()));
        assert!(!doc.is_focusable(button));
        assert_eq!(FocusHost::tab_index(&doc, button), -1);

        doc.focus(button);
        assert_eq!(doc.active_element(), None);
        doc.pointer_down(button);
        assert_eq!(doc.active_element(), None);
        assert!(!doc.click(button));
        assert!(doc.delivered().is_empty());
    }

    #[test]
    fn inert_accessor_is_attribute_backed() {
        let mut doc = Document::new();
        let div = doc.create_element(doc.body(), "div");
        assert!(!doc.inert(div));
        doc.set_inert(div, true).unwrap();
        assert!(doc.inert(div));
        assert_eq!(doc.attribute(div, INERT_ATTRIBUTE), Some(""));
        doc.set_inert(div, false).unwrap();
        assert!(!doc.has_attribute(div, INERT_ATTRIBUTE));
    }

    #[test]
    fn inert_accessor_rejects_stale_elements() {
        let mut doc = Document::new();
        let div = doc.create_element(doc.body(), "div");
        doc.remove(div);
        assert_eq!(doc.set_inert(div, true), Err(InertError::AttributeMutation));
    }

    #[test]
    fn unsupported_synthetic_tab_is_an_error() {
        let mut doc = Document::new();
        doc.set_synthetic_tab(SyntheticTab::Unsupported);
        assert_eq!(
            doc.dispatch_synthetic_tab(Traversal::Forward),
            Err(InertError::UnsupportedSynthesis)
        );
    }

    #[test]
    fn ignored_synthetic_tab_leaves_focus() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = tabbable(&mut doc, body, "button");
        let _b = tabbable(&mut doc, body, "button");
        doc.focus(a);
        assert_eq!(doc.dispatch_synthetic_tab(Traversal::Forward), Ok(()));
        assert_eq!(doc.active_element(), Some(a));
    }
}
