//! Clip caption placement and fades.

/// Position tags, layout and per-frame caption state.
pub(crate) mod overlay;
