// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the host traits and the redirector.

/// Failures a host or the redirector can report.
///
/// None of these escape the focus interceptor. An exhausted tree walk is not
/// an error either: it is reported as [`BlurReason::NoCandidate`].
///
/// [`BlurReason::NoCandidate`]: crate::redirect::BlurReason::NoCandidate
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InertError {
    /// The host cannot construct or dispatch a synthetic tab keystroke.
    #[error("host does not support synthetic keyboard events")]
    UnsupportedSynthesis,
    /// The inert attribute could not be read or written on an element.
    #[error("inert attribute cannot be changed on this element")]
    AttributeMutation,
}
