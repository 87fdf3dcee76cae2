// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute name and stylesheet rule for inert subtrees.

/// Attribute that marks an element and its subtree inert.
pub const INERT_ATTRIBUTE: &str = "inert";

/// Disables pointer events and text selection on inert subtrees.
///
/// Injected once per guard by
/// [`InertGuard::install`](crate::guard::InertGuard::install).
pub const INERT_STYLE_RULE: &str = "[inert]{-webkit-user-select:none;-moz-user-select:none;-ms-user-select:none;user-select:none;pointer-events:none}";
