//! Per-frame evaluation of a built composition.

/// Frame output types and the single-frame evaluator.
pub(crate) mod evaluator;
/// Stable fingerprints of evaluated frames.
pub(crate) mod fingerprint;
/// Batch evaluation over frame ranges.
pub(crate) mod pipeline;
/// Visual node builders for each scene and overlay kind.
pub(crate) mod scenes;
