// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tab-direction tracking: remember which way the user was navigating.
//!
//! Key presses and focus events reach the host through unrelated listener
//! chains, so the direction of the last tab keystroke has to be remembered
//! between them. [`TabDirectionTracker`] is that memory.
//!
//! ## Transitions
//!
//! - Tab: [`NavigationDirection::Forward`], or [`NavigationDirection::Backward`] with Shift held.
//! - Any other key: [`NavigationDirection::Neutral`].
//! - Any pointer press: [`NavigationDirection::Neutral`].
//!
//! Only the last transition matters.
//!
//! ## Minimal example
//!
//! ```
//! use understory_inert::direction::{Key, KeyPress, Modifiers, NavigationDirection, TabDirectionTracker};
//!
//! let tracker = TabDirectionTracker::new();
//! tracker.on_key_down(&KeyPress::new(Key::Character('a'), Modifiers::empty()));
//! assert_eq!(tracker.direction(), NavigationDirection::Neutral);
//!
//! tracker.on_key_down(&KeyPress::new(Key::Tab, Modifiers::SHIFT));
//! assert_eq!(tracker.direction(), NavigationDirection::Backward);
//!
//! tracker.on_pointer_down();
//! assert_eq!(tracker.direction(), NavigationDirection::Neutral);
//! ```

use core::cell::Cell;

/// Key code hosts use for the Tab key.
pub const TAB_KEY_CODE: u32 = 9;

/// The user's most recent keyboard navigation intent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavigationDirection {
    /// Tab was pressed last.
    Forward,
    /// Shift+Tab was pressed last.
    Backward,
    /// No navigation intent: some other key or a pointer was used last.
    #[default]
    Neutral,
}

impl NavigationDirection {
    /// Direction after observing `press`.
    pub fn after_key(press: &KeyPress) -> Self {
        match press.key {
            Key::Tab if press.modifiers.contains(Modifiers::SHIFT) => Self::Backward,
            Key::Tab => Self::Forward,
            _ => Self::Neutral,
        }
    }

    /// Walking direction, or `None` when neutral.
    pub fn traversal(self) -> Option<Traversal> {
        match self {
            Self::Forward => Some(Traversal::Forward),
            Self::Backward => Some(Traversal::Backward),
            Self::Neutral => None,
        }
    }
}

/// Direction of a tree walk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Document order.
    Forward,
    /// Reverse document order.
    Backward,
}

/// Logical key of a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// The Tab key.
    Tab,
    /// A key producing a character.
    Character(char),
    /// Any other key, by host key code.
    Other(u32),
}

impl Key {
    /// Map a host key code; [`TAB_KEY_CODE`] becomes [`Key::Tab`].
    pub fn from_code(code: u32) -> Self {
        if code == TAB_KEY_CODE {
            Self::Tab
        } else {
            Self::Other(code)
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Windows.
        const META    = 0b0000_1000;
    }
}

/// A key-down observation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyPress {
    /// Key pressed.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Create a key press.
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Tab with no modifiers.
    pub const fn tab() -> Self {
        Self::new(Key::Tab, Modifiers::empty())
    }

    /// Shift+Tab.
    pub const fn shift_tab() -> Self {
        Self::new(Key::Tab, Modifiers::SHIFT)
    }

    /// Walking direction requested by this press, if it is a tab press.
    pub fn traversal(&self) -> Option<Traversal> {
        NavigationDirection::after_key(self).traversal()
    }

    /// Tab press moving in `traversal`.
    pub const fn tab_towards(traversal: Traversal) -> Self {
        match traversal {
            Traversal::Forward => Self::tab(),
            Traversal::Backward => Self::shift_tab(),
        }
    }
}

/// Shared record of the last navigation direction.
///
/// Methods take `&self`: the tracker is written by key and pointer listeners
/// that can fire while a focus event is still being handled (a synthetic
/// keystroke reaches the key listener too). The focus redirector only reads it.
#[derive(Clone, Debug, Default)]
pub struct TabDirectionTracker {
    direction: Cell<NavigationDirection>,
}

impl TabDirectionTracker {
    /// Create a tracker in the neutral state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current direction.
    pub fn direction(&self) -> NavigationDirection {
        self.direction.get()
    }

    /// Observe a key press.
    pub fn on_key_down(&self, press: &KeyPress) {
        self.direction.set(NavigationDirection::after_key(press));
    }

    /// Observe a pointer press.
    pub fn on_pointer_down(&self) {
        self.direction.set(NavigationDirection::Neutral);
    }

    /// Forget the last direction.
    pub fn reset(&self) {
        self.direction.set(NavigationDirection::Neutral);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_neutral() {
        let tracker = TabDirectionTracker::new();
        assert_eq!(tracker.direction(), NavigationDirection::Neutral);
        assert_eq!(tracker.direction().traversal(), None);
    }

    #[test]
    fn tab_moves_forward_and_shift_tab_backward() {
        let tracker = TabDirectionTracker::new();
        tracker.on_key_down(&KeyPress::tab());
        assert_eq!(tracker.direction(), NavigationDirection::Forward);
        tracker.on_key_down(&KeyPress::shift_tab());
        assert_eq!(tracker.direction(), NavigationDirection::Backward);
    }

    #[test]
    fn other_keys_and_pointer_reset() {
        let tracker = TabDirectionTracker::new();
        tracker.on_key_down(&KeyPress::tab());
        tracker.on_key_down(&KeyPress::new(Key::Other(13), Modifiers::empty()));
        assert_eq!(tracker.direction(), NavigationDirection::Neutral);

        tracker.on_key_down(&KeyPress::shift_tab());
        tracker.on_pointer_down();
        assert_eq!(tracker.direction(), NavigationDirection::Neutral);
    }

    // Shift on a non-tab key is still "some other key".
    #[test]
    fn shift_without_tab_is_neutral() {
        let press = KeyPress::new(Key::Character('A'), Modifiers::SHIFT);
        assert_eq!(
            NavigationDirection::after_key(&press),
            NavigationDirection::Neutral
        );
    }

    // Only the last transition matters.
    #[test]
    fn last_write_wins() {
        let tracker = TabDirectionTracker::new();
        tracker.on_key_down(&KeyPress::new(Key::Character('a'), Modifiers::empty()));
        tracker.on_key_down(&KeyPress::shift_tab());
        assert_eq!(tracker.direction(), NavigationDirection::Backward);
    }

    #[test]
    fn control_tab_still_counts_as_tab() {
        let press = KeyPress::new(Key::Tab, Modifiers::CONTROL);
        assert_eq!(
            NavigationDirection::after_key(&press),
            NavigationDirection::Forward
        );
    }

    #[test]
    fn key_codes_map_tab() {
        assert_eq!(Key::from_code(TAB_KEY_CODE), Key::Tab);
        assert_eq!(Key::from_code(65), Key::Other(65));
    }

    #[test]
    fn traversal_round_trips_through_tab_press() {
        for traversal in [Traversal::Forward, Traversal::Backward] {
            let press = KeyPress::tab_towards(traversal);
            assert_eq!(
                NavigationDirection::after_key(&press).traversal(),
                Some(traversal)
            );
        }
    }

    #[test]
    fn reset_forgets_the_last_tab() {
        let tracker = TabDirectionTracker::new();
        tracker.on_key_down(&KeyPress::shift_tab());
        tracker.reset();
        assert_eq!(tracker.direction(), NavigationDirection::Neutral);
        tracker.on_key_down(&KeyPress::tab());
        assert_eq!(tracker.direction(), NavigationDirection::Forward);
    }
}
