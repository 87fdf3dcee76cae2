// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registration with an explicit lifetime.
//!
//! [`InertGuard::install`](crate::guard::InertGuard::install) registers one
//! listener per [`Interest`] and hands back a [`Subscription`]. Dropping the
//! subscription does nothing; call [`Subscription::teardown`] to detach.

use alloc::rc::Rc;

use smallvec::SmallVec;
use tracing::debug;

use crate::direction::KeyPress;
use crate::guard::InertGuard;
use crate::host::FocusHost;

bitflags::bitflags! {
    /// Event kinds a listener observes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Interest: u8 {
        /// Key presses, observed at document level.
        const KEY_DOWN      = 0b0000_0001;
        /// Pointer presses, observed at document level.
        const POINTER_DOWN  = 0b0000_0010;
        /// Focus arrivals, observed in the capture phase at the body.
        const FOCUS_CAPTURE = 0b0000_0100;
        /// Clicks, observed in the capture phase at document level.
        const CLICK_CAPTURE = 0b0000_1000;
    }
}

/// An event delivered by a host to an installed guard.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HostEvent<E> {
    /// A key went down.
    KeyDown(KeyPress),
    /// A pointer was pressed on an element.
    PointerDown(E),
    /// Focus arrived on an element.
    Focus(E),
    /// An element was clicked.
    Click(E),
}

impl<E> HostEvent<E> {
    /// Listener interest that receives this event.
    pub fn interest(&self) -> Interest {
        match self {
            Self::KeyDown(_) => Interest::KEY_DOWN,
            Self::PointerDown(_) => Interest::POINTER_DOWN,
            Self::Focus(_) => Interest::FOCUS_CAPTURE,
            Self::Click(_) => Interest::CLICK_CAPTURE,
        }
    }
}

/// Host-assigned listener identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// A host that accepts listeners and stylesheets.
pub trait EventHost: FocusHost {
    /// Register `guard` for the events in `interest`.
    fn add_listener(&mut self, interest: Interest, guard: Rc<InertGuard>) -> ListenerId;

    /// Unregister a listener. Returns `false` if it was not registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Append a stylesheet to the document.
    fn inject_stylesheet(&mut self, css: &str);
}

/// Listeners owned by one installation of a guard.
#[must_use = "listeners stay registered until `teardown` is called"]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subscription {
    ids: SmallVec<[ListenerId; 4]>,
}

impl Subscription {
    pub(crate) fn push(&mut self, id: ListenerId) {
        self.ids.push(id);
    }

    /// Listener identifiers, in registration order.
    pub fn ids(&self) -> &[ListenerId] {
        &self.ids
    }

    /// Number of listeners owned.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no listeners are owned.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Remove every listener from `host`; returns how many were still registered.
    pub fn teardown<H: EventHost + ?Sized>(self, host: &mut H) -> usize {
        let removed = self
            .ids
            .iter()
            .filter(|&&id| host.remove_listener(id))
            .count();
        debug!(removed, "inert listeners torn down");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_event_maps_to_one_interest() {
        assert_eq!(
            HostEvent::<u32>::KeyDown(KeyPress::tab()).interest(),
            Interest::KEY_DOWN
        );
        assert_eq!(HostEvent::PointerDown(1_u32).interest(), Interest::POINTER_DOWN);
        assert_eq!(HostEvent::Focus(1_u32).interest(), Interest::FOCUS_CAPTURE);
        assert_eq!(HostEvent::Click(1_u32).interest(), Interest::CLICK_CAPTURE);
    }

    #[test]
    fn subscription_tracks_ids() {
        let mut sub = Subscription::default();
        assert!(sub.is_empty());
        sub.push(ListenerId(3));
        sub.push(ListenerId(4));
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.ids(), &[ListenerId(3), ListenerId(4)]);
    }
}
