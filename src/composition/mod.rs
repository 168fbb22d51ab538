//! Composition description, validation and lowering.

/// Lowering from the JSON description to frame windows.
pub(crate) mod build;
/// JSON boundary model.
pub(crate) mod model;
/// Bundled compositions.
pub mod presets;
/// Lowered scene, overlay and cue payloads.
pub(crate) mod scene;
