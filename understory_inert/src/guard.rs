// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The installed listener: direction tracking plus focus and click interception.
//!
//! ## Usage
//!
//! 1) Build an [`InertGuard`] from an [`InertConfig`] and wrap it in an `Rc`.
//! 2) [`InertGuard::install`] it on an [`EventHost`]; keep the returned
//!    [`Subscription`].
//! 3) The host routes every [`HostEvent`] matching a registered [`Interest`]
//!    to [`InertGuard::handle`] and honors the returned [`Disposition`].
//! 4) Call [`Subscription::teardown`] to detach.
//!
//! ## Minimal example
//!
//! ```
//! use std::rc::Rc;
//! use understory_inert::document::Document;
//! use understory_inert::guard::{InertConfig, InertGuard};
//! use understory_inert::host::InertAttribute;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let dialog = doc.create_element(body, "dialog");
//! let inside = doc.create_element(dialog, "button");
//! let after = doc.create_element(body, "button");
//! doc.set_tab_index(inside, Some(0));
//! doc.set_tab_index(after, Some(0));
//! doc.set_inert(dialog, true).unwrap();
//!
//! let guard = Rc::new(InertGuard::new(InertConfig::default()));
//! let subscription = guard.install(&mut doc);
//!
//! // Tabbing from the start of the page skips the inert dialog.
//! doc.key_down(understory_inert::direction::KeyPress::tab());
//! assert_eq!(doc.active_element(), Some(after));
//!
//! subscription.teardown(&mut doc);
//! ```

use alloc::rc::Rc;
use core::cell::Cell;

use tracing::debug;

use crate::direction::{KeyPress, TabDirectionTracker};
use crate::host::FocusHost;
use crate::redirect::{Disposition, FocusOutcome, FocusRedirector};
use crate::style::INERT_STYLE_RULE;
use crate::subscription::{EventHost, HostEvent, Interest, Subscription};

/// Guard configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InertConfig {
    /// Focus redirection policy.
    pub redirector: FocusRedirector,
    /// Inject [`INERT_STYLE_RULE`] on first install.
    pub inject_style: bool,
}

impl Default for InertConfig {
    fn default() -> Self {
        Self {
            redirector: FocusRedirector::default(),
            inject_style: true,
        }
    }
}

/// Tracks tab direction and keeps focus and clicks out of inert subtrees.
#[derive(Debug, Default)]
pub struct InertGuard {
    config: InertConfig,
    tracker: TabDirectionTracker,
    styled: Cell<bool>,
}

impl InertGuard {
    /// Create a guard in the neutral direction state.
    pub fn new(config: InertConfig) -> Self {
        Self {
            config,
            tracker: TabDirectionTracker::new(),
            styled: Cell::new(false),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &InertConfig {
        &self.config
    }

    /// Direction state shared by all listeners of this guard.
    pub fn tracker(&self) -> &TabDirectionTracker {
        &self.tracker
    }

    /// Register the key, pointer, focus-capture and click-capture listeners.
    ///
    /// The stylesheet is injected at most once per guard, even across
    /// repeated installs.
    pub fn install<H: EventHost + ?Sized>(self: &Rc<Self>, host: &mut H) -> Subscription {
        if self.config.inject_style && !self.styled.replace(true) {
            host.inject_stylesheet(INERT_STYLE_RULE);
        }
        let mut subscription = Subscription::default();
        for interest in [
            Interest::KEY_DOWN,
            Interest::POINTER_DOWN,
            Interest::FOCUS_CAPTURE,
            Interest::CLICK_CAPTURE,
        ] {
            subscription.push(host.add_listener(interest, Rc::clone(self)));
        }
        debug!(listeners = subscription.len(), "inert guard installed");
        subscription
    }

    /// Handle one event delivered by the host.
    pub fn handle<H>(&self, host: &mut H, event: &HostEvent<H::Element>) -> Disposition
    where
        H: FocusHost + ?Sized,
    {
        match *event {
            HostEvent::KeyDown(ref press) => {
                self.on_key_down(press);
                Disposition::Continue
            }
            HostEvent::PointerDown(_) => {
                self.on_pointer_down();
                Disposition::Continue
            }
            HostEvent::Focus(target) => self.on_focus(host, target).disposition(),
            HostEvent::Click(target) => self.config.redirector.on_click(&*host, target),
        }
    }

    /// Observe a key press.
    pub fn on_key_down(&self, press: &KeyPress) {
        self.tracker.on_key_down(press);
    }

    /// Observe a pointer press.
    pub fn on_pointer_down(&self) {
        self.tracker.on_pointer_down();
    }

    /// Intercept focus arriving on `target`.
    pub fn on_focus<H>(&self, host: &mut H, target: H::Element) -> FocusOutcome<H::Element>
    where
        H: FocusHost + ?Sized,
    {
        let direction = self.tracker.direction();
        self.config.redirector.on_focus(host, target, direction)
    }
}
