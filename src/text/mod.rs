//! Frame-driven text effects.

/// Typewriter and scramble reveals.
pub(crate) mod reveal;
/// Cycling status lines, blinkers and progress readouts.
pub(crate) mod status;
