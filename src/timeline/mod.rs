//! Frame-time plumbing: clocks, sibling windows and clip layout.

/// Read-only frame clock and its descent into nested windows.
pub(crate) mod clock;
/// Clip descriptors, back-to-back layout and boundary cue anchoring.
pub(crate) mod schedule;
/// Ordered windows and active-window queries.
pub(crate) mod sequencer;
