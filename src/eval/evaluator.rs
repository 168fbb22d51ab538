use kurbo::Point;

use crate::{
    caption::overlay::CaptionLayout,
    composition::{
        build::Composition,
        scene::{OverlayEffect, SceneContent},
    },
    eval::scenes::{NodeSink, eval_flash, eval_outro, eval_showcase, eval_terminal},
    foundation::{
        core::{FrameIndex, Rgba8Premul, Vec2},
        error::FramewiseResult,
    },
    timeline::clock::FrameClock,
};

/// Everything active at one global frame, fully resolved.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameOutput {
    /// Evaluated frame index.
    pub frame: FrameIndex,
    /// Visual nodes in painter's order.
    pub visuals: Vec<VisualNode>,
    /// Audio cues playing at this frame.
    pub audio: Vec<ActiveCue>,
}

impl FrameOutput {
    /// First visual node with `id`.
    pub fn visual(&self, id: &str) -> Option<&VisualNode> {
        self.visuals.iter().find(|n| n.id == id)
    }

    /// Active cue with `id`.
    pub fn cue(&self, id: &str) -> Option<&ActiveCue> {
        self.audio.iter().find(|c| c.id == id)
    }
}

/// One resolved visual element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VisualNode {
    /// Stable id, unique within a frame.
    pub id: String,
    /// What to draw.
    pub kind: VisualKind,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Layout position in canvas pixels.
    pub position: Point,
    /// Animated offset applied on top of `position`.
    pub offset: Vec2,
    /// Uniform scale around the node's own origin.
    pub scale: f64,
    /// Text content, for text-bearing kinds.
    pub text: Option<String>,
    /// Fill color.
    pub color: Rgba8Premul,
}

/// Visual node payloads.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualKind {
    /// A run of text.
    Text {
        /// Font size in pixels.
        font_size: f64,
    },
    /// A single background glyph.
    Glyph,
    /// Cursor, status dot, badge or status icon.
    Indicator,
    /// Full-canvas fill.
    Fill,
    /// Full-width horizontal bar.
    Bar {
        /// Height in pixels.
        height_px: f64,
    },
    /// Progress bar.
    Progress {
        /// Fill fraction in `[0, 1]`.
        progress: f64,
    },
    /// A frame of source video.
    Video {
        /// Asset identifier.
        source: String,
        /// Source playback position in seconds.
        source_time_secs: f64,
        /// Source seconds per displayed second.
        playback_rate: f64,
    },
    /// A clip caption.
    Caption {
        /// Resolved placement and type style.
        layout: CaptionLayout,
    },
}

/// An audio cue playing at the evaluated frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ActiveCue {
    /// Cue id.
    pub id: String,
    /// Audio asset.
    pub asset: String,
    /// Linear gain.
    pub gain: f64,
    /// Playback position in the asset, `trim_before + local / fps` seconds.
    pub source_offset_secs: f64,
    /// Frames since the cue started.
    pub local: FrameIndex,
}

/// Stateless evaluator from a built composition to per-frame output.
pub struct Evaluator;

impl Evaluator {
    /// Evaluate global `frame`; errors if it is outside `0..comp.duration()`.
    #[tracing::instrument(skip(comp))]
    pub fn eval_frame(comp: &Composition, frame: FrameIndex) -> FramewiseResult<FrameOutput> {
        let root = FrameClock::root(frame, comp.fps(), comp.duration())?;
        let mut sink = NodeSink::new(comp.canvas(), comp.theme());

        for (clock, scene) in comp.scenes().descend(&root) {
            match &scene.content {
                SceneContent::Terminal(t) => eval_terminal(t, &clock, &mut sink),
                SceneContent::Showcase(s) => {
                    eval_showcase(s, &clock, comp.caption_timing(), &mut sink)?
                }
                SceneContent::Outro(o) => eval_outro(o, &clock, &mut sink),
            }
        }

        for (clock, overlay) in comp.overlays().descend(&root) {
            match &overlay.effect {
                OverlayEffect::Flash(timing) => eval_flash(&overlay.id, timing, &clock, &mut sink),
            }
        }

        let fps = comp.fps();
        let audio = comp
            .cues()
            .active(frame)
            .map(|(active, cue)| ActiveCue {
                id: cue.id.clone(),
                asset: cue.asset.clone(),
                gain: cue.volume,
                source_offset_secs: cue.trim_before_secs + fps.frames_to_secs(active.local.0),
                local: active.local,
            })
            .collect();

        Ok(FrameOutput {
            frame,
            visuals: sink.finish(),
            audio,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
