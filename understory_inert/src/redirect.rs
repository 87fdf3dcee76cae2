// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus redirection: keep focus out of inert subtrees.
//!
//! ## States
//!
//! Each focus arrival is handled from scratch:
//!
//! - **Idle**: the target is not inert, focus proceeds ([`FocusOutcome::NotInert`]).
//! - **Intercepted**: the target resolved to an inert root.
//! - **Redirecting**: the document has focus and the direction is known. Two
//!   tiers are tried in order:
//!   1. A synthetic tab keystroke, letting the host's own focus order pick the
//!      next element ([`RedirectTier::SyntheticTab`]).
//!   2. A manual pre-order walk from the inert root
//!      ([`RedirectTier::TreeWalk`]).
//! - **Blurred**: no direction, no document focus, or no candidate; the target
//!   is blurred and the event suppressed ([`FocusOutcome::Blurred`]).
//!
//! ## Re-entrancy
//!
//! Both tiers can make the host deliver nested focus events that land back in
//! [`FocusRedirector::on_focus`]. The redirector keeps no state of its own and
//! never writes the navigation direction, so nesting is safe. Candidates that
//! are themselves inert are rejected before focus is requested.

use tracing::{debug, trace};

use crate::direction::{NavigationDirection, Traversal};
use crate::host::{ElementTree, FocusHost};
use crate::navigate::adjacent;
use crate::resolve::{controlling_inert_ancestor, is_inert};

/// What a listener asks the host to do with the event it just handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Let the event propagate and run its default action.
    Continue,
    /// Prevent the default action and stop propagation.
    Suppress,
}

/// Which redirection tier moved focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RedirectTier {
    /// The host honored a synthetic tab keystroke.
    SyntheticTab,
    /// A manual tree walk found a candidate.
    TreeWalk,
}

/// Why focus was removed instead of redirected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlurReason {
    /// The document did not hold input focus.
    DocumentUnfocused,
    /// No tab keystroke preceded the focus change.
    NeutralDirection,
    /// The walk ran off the tree without finding a focusable element.
    NoCandidate,
}

/// Result of handling one focus arrival.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusOutcome<E> {
    /// The target is not inert.
    NotInert,
    /// Focus moved elsewhere.
    Redirected {
        /// Active element afterwards; `None` if focus left the document.
        to: Option<E>,
        /// Tier that moved focus.
        tier: RedirectTier,
    },
    /// The target was blurred.
    Blurred {
        /// Why no redirection happened.
        reason: BlurReason,
    },
}

impl<E> FocusOutcome<E> {
    /// How the host should treat the focus event.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::Blurred { .. } => Disposition::Suppress,
            Self::NotInert | Self::Redirected { .. } => Disposition::Continue,
        }
    }
}

/// Redirects focus that arrives inside an inert subtree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FocusRedirector {
    /// Try a synthetic tab keystroke before walking the tree.
    pub synthesize_tab: bool,
}

impl Default for FocusRedirector {
    fn default() -> Self {
        Self {
            synthesize_tab: true,
        }
    }
}

impl FocusRedirector {
    /// Handle focus arriving on `target` while the user navigates in `direction`.
    pub fn on_focus<H>(
        &self,
        host: &mut H,
        target: H::Element,
        direction: NavigationDirection,
    ) -> FocusOutcome<H::Element>
    where
        H: FocusHost + ?Sized,
    {
        let Some(inert_root) = controlling_inert_ancestor(&*host, target) else {
            return FocusOutcome::NotInert;
        };
        trace!(?target, ?inert_root, ?direction, "focus intercepted");

        let reason = if !host.has_focus() {
            BlurReason::DocumentUnfocused
        } else if let Some(traversal) = direction.traversal() {
            if let Some(outcome) = self.redirect(host, target, inert_root, traversal) {
                return outcome;
            }
            BlurReason::NoCandidate
        } else {
            BlurReason::NeutralDirection
        };

        host.blur(target);
        debug!(?target, ?reason, "focus blurred");
        FocusOutcome::Blurred { reason }
    }

    /// Reject clicks on inert targets.
    pub fn on_click<T>(&self, tree: &T, target: T::Element) -> Disposition
    where
        T: ElementTree + ?Sized,
    {
        match controlling_inert_ancestor(tree, target) {
            Some(inert_root) => {
                debug!(?target, ?inert_root, "click rejected");
                Disposition::Suppress
            }
            None => Disposition::Continue,
        }
    }

    /// Try both tiers; `None` when the walk runs out of candidates.
    fn redirect<H>(
        &self,
        host: &mut H,
        target: H::Element,
        inert_root: H::Element,
        traversal: Traversal,
    ) -> Option<FocusOutcome<H::Element>>
    where
        H: FocusHost + ?Sized,
    {
        if self.synthesize_tab {
            let previous = host.active_element();
            match host.dispatch_synthetic_tab(traversal) {
                Ok(()) => {
                    let now = host.active_element();
                    if now != previous {
                        debug!(?target, to = ?now, "focus redirected by synthetic tab");
                        return Some(FocusOutcome::Redirected {
                            to: now,
                            tier: RedirectTier::SyntheticTab,
                        });
                    }
                    trace!("synthetic tab ignored by host");
                }
                Err(err) => trace!(%err, "synthetic tab unavailable"),
            }
        }

        let mut candidate = inert_root;
        while let Some(next) = adjacent(&*host, candidate, traversal, Some(inert_root)) {
            candidate = next;
            if try_focus(host, candidate, target) {
                debug!(?target, to = ?candidate, "focus redirected by tree walk");
                return Some(FocusOutcome::Redirected {
                    to: host.active_element(),
                    tier: RedirectTier::TreeWalk,
                });
            }
        }
        None
    }
}

/// Focus `candidate` unless it is out of tab order or inert.
///
/// Success means the active element is no longer `target`.
fn try_focus<H>(host: &mut H, candidate: H::Element, target: H::Element) -> bool
where
    H: FocusHost + ?Sized,
{
    if host.tab_index(candidate) < 0 || is_inert(&*host, candidate) {
        return false;
    }
    host.focus(candidate);
    host.active_element() != Some(target)
}
