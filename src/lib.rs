//! Framewise is a frame-exact timeline composition and animation engine for offline video.
//!
//! A composition is a static, declarative description (scenes, clips, captions, overlays and
//! audio cues). Framewise lowers it once into integer frame windows, then evaluates any global
//! frame independently into the set of active visual nodes and audio cues a renderer needs.
//!
//! # Pipeline overview
//!
//! 1. **Describe**: [`CompositionDef`] from JSON (or [`presets::teaser_def`]).
//! 2. **Build**: [`Composition::build`] validates and lays out every window, all-or-nothing.
//! 3. **Evaluate**: [`Evaluator::eval_frame`] turns `Composition + FrameIndex` into a
//!    [`FrameOutput`]; [`eval_frames`] does the same for a range, optionally on a rayon pool.
//!
//! Every step is a pure function of `(frame, configuration)`: frames can be evaluated in any order
//! or concurrently and evaluating the same frame twice yields identical output.
//!
//! Pixel rendering, encoding and media decoding live outside this crate.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod caption;
mod composition;
mod eval;
mod foundation;
mod text;
mod timeline;

pub use animation::ease::Ease;
pub use animation::interpolate::{Extrapolate, InterpolateOpts, KeyframeTable, interpolate};
pub use animation::random::{random, random_glyph, random_index};
pub use animation::spring::{SpringConfig, spring, spring_between};
pub use caption::overlay::{
    CaptionFrame, CaptionLayout, CaptionPosition, CaptionTiming, TextAlign, VerticalAnchor,
    caption_frame,
};
pub use composition::build::{Composition, scene_boundary_cues};
pub use composition::model::{
    CompositionDef, CueDef, DurationDef, MatrixDef, OutroDef, OutroLineDef, OverlayDef,
    OverlayEffectDef, PaintDef, PlacementDef, SceneContentDef, SceneDef, ShowcaseDef, TagDef,
    TeamMemberDef, TerminalDef, TerminalTimingDef, Theme, ThemeSlot,
};
pub use composition::presets;
pub use composition::scene::{
    Cue, FlashTiming, GLITCH_BARS, GlitchBar, GlyphMatrix, OutroLine, OutroScene, Overlay,
    OverlayEffect, Scene, SceneContent, ShowcaseScene, TerminalCues, TerminalScene, TerminalTag,
};
pub use eval::evaluator::{ActiveCue, Evaluator, FrameOutput, VisualKind, VisualNode};
pub use eval::fingerprint::{FrameFingerprint, fingerprint_frame};
pub use eval::pipeline::{EvalStats, EvalThreading, eval_frames, eval_frames_with_stats};
pub use foundation::color::ColorDef;
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rgba8Premul, TimeWindow, Vec2};
pub use foundation::error::{FramewiseError, FramewiseResult};
pub use text::reveal::{SCRAMBLE_ALPHABET, scramble_reveal, typewriter};
pub use text::status::{
    LOADING_LABELS, ProgressReadout, StatusLine, StatusLineState, StatusLineTiming, blink,
};
pub use timeline::clock::{FrameClock, total_frames};
pub use timeline::schedule::{
    BoundaryCues, ClipDescriptor, ClipSchedule, ScheduledClip, boundary_cues, layout_clips,
};
pub use timeline::sequencer::{ActiveWindow, Timeline, active_windows, is_contiguous};
