//! Built-in compositions.

use crate::{
    composition::{build::Composition, model::CompositionDef},
    foundation::error::FramewiseResult,
};

pub(crate) const TEASER_JSON: &str = include_str!("../../presets/teaser.json");

/// The 42-second product teaser: terminal intro, eleven-clip showcase and outro at 30 fps.
pub fn teaser_def() -> FramewiseResult<CompositionDef> {
    CompositionDef::from_json_str(TEASER_JSON)
}

/// [`teaser_def`], built.
pub fn teaser() -> FramewiseResult<Composition> {
    Composition::build(&teaser_def()?)
}
