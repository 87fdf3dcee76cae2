// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_inert --heading-base-level=0

//! Understory Inert: inert subtrees for hosts that lack them.
//!
//! ## Overview
//!
//! An inert subtree stays visible but takes no focus, pointer, or keyboard
//! interaction. This crate provides that behavior on top of any element tree
//! that exposes parent/child/sibling links, a focus API, and an attribute.
//!
//! Styling is trivial (a single stylesheet rule). The interesting part is
//! focus: when focus is forced onto an inert element by tabbing, script, or a
//! pointer, it must move to the nearest valid element in the direction the
//! user was going, or be dropped.
//!
//! ## Components
//!
//! - [`navigate`]: pre-order tree stepping with a boundary ([`navigate::adjacent`]).
//! - [`resolve`]: the inert ancestor controlling an element
//!   ([`resolve::controlling_inert_ancestor`]).
//! - [`direction`]: the last navigation direction
//!   ([`direction::TabDirectionTracker`]).
//! - [`redirect`]: the focus redirection state machine and click rejection
//!   ([`redirect::FocusRedirector`]).
//! - [`guard`]: the listener object a host dispatches to ([`guard::InertGuard`]).
//! - [`subscription`]: listener registration with explicit teardown.
//! - [`document`]: an in-memory host ([`document::Document`]).
//!
//! ## Host integration
//!
//! Implement [`host::ElementTree`] and [`host::FocusHost`] for your tree, and
//! [`subscription::EventHost`] if you want [`guard::InertGuard::install`] to
//! register listeners for you. Deliver focus events synchronously and in
//! order: the redirector relies on nested focus events being handled before
//! `focus()` returns.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use understory_inert::direction::KeyPress;
//! use understory_inert::document::Document;
//! use understory_inert::guard::{InertConfig, InertGuard};
//! use understory_inert::host::InertAttribute;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let before = doc.create_element(body, "button");
//! let sidebar = doc.create_element(body, "aside");
//! let link = doc.create_element(sidebar, "a");
//! let after = doc.create_element(body, "button");
//! for id in [before, link, after] {
//!     doc.set_tab_index(id, Some(0));
//! }
//! doc.set_inert(sidebar, true).unwrap();
//!
//! let guard = Rc::new(InertGuard::new(InertConfig::default()));
//! let _subscription = guard.install(&mut doc);
//!
//! doc.focus(before);
//! doc.key_down(KeyPress::tab());
//! assert_eq!(doc.active_element(), Some(after));
//!
//! doc.key_down(KeyPress::shift_tab());
//! assert_eq!(doc.active_element(), Some(before));
//!
//! // Clicks inside the sidebar never reach the page.
//! assert!(!doc.click(link));
//! ```
//!
//! ## Logging
//!
//! Decisions are reported through [`tracing`] at `trace` and `debug` level.
//! No subscriber is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod direction;
pub mod document;
pub mod error;
pub mod guard;
pub mod host;
pub mod navigate;
pub mod redirect;
pub mod resolve;
pub mod style;
pub mod subscription;

pub use error::InertError;
