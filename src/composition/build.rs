use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::interpolate::KeyframeTable,
    caption::overlay::CaptionTiming,
    composition::{
        model::{
            CompositionDef, CueDef, OutroDef, OverlayDef, OverlayEffectDef, PlacementDef,
            SceneContentDef, TerminalDef, Theme,
        },
        scene::{
            Cue, FlashTiming, GlyphMatrix, OutroLine, OutroScene, Overlay, OverlayEffect, Scene,
            SceneContent, ShowcaseScene, TerminalCues, TerminalScene, TerminalTag,
        },
    },
    foundation::{
        core::{Canvas, FrameIndex, Fps, TimeWindow},
        error::{FramewiseError, FramewiseResult},
    },
    text::status::StatusLine,
    timeline::{
        clock::total_frames,
        schedule::{ClipSchedule, boundary_cues},
        sequencer::Timeline,
    },
};

/// A validated composition, lowered to frames and ready for per-frame evaluation.
///
/// Construction is all-or-nothing: any configuration error rejects the whole description.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    name: String,
    canvas: Canvas,
    fps: Fps,
    duration: u64,
    theme: Theme,
    caption_timing: CaptionTiming,
    scenes: Timeline<Scene>,
    overlays: Timeline<Overlay>,
    cues: Timeline<Cue>,
}

impl Composition {
    /// Validate `def` and lay out every scene, clip, overlay and cue window.
    #[tracing::instrument(skip(def), fields(name = %def.name))]
    pub fn build(def: &CompositionDef) -> FramewiseResult<Self> {
        let fps = Fps::new(def.fps.num, def.fps.den)?;
        if def.canvas.width == 0 || def.canvas.height == 0 {
            return Err(FramewiseError::validation("canvas width/height must be > 0"));
        }
        let duration = total_frames(def.duration_sec, fps)?;
        def.caption_timing.validate()?;

        let scenes = layout_scenes(def, fps, duration)?;
        let anchors = SceneAnchors::collect(&scenes);

        let mut overlays = Timeline::new();
        for overlay in &def.overlays {
            lower_overlay(overlay, &def.theme, fps, duration, &anchors, &mut overlays)?;
        }

        let mut cues = Timeline::new();
        for cue in &def.cues {
            lower_cue(cue, fps, duration, &anchors, &mut cues)?;
        }

        tracing::debug!(
            duration,
            scenes = scenes.len(),
            overlays = overlays.len(),
            cues = cues.len(),
            "composition laid out"
        );

        Ok(Self {
            name: def.name.clone(),
            canvas: def.canvas,
            fps,
            duration,
            theme: def.theme,
            caption_timing: def.caption_timing,
            scenes,
            overlays,
            cues,
        })
    }

    /// Parse and build from a JSON string.
    pub fn from_json_str(s: &str) -> FramewiseResult<Self> {
        Self::build(&CompositionDef::from_json_str(s)?)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Total frames; valid frame indices are `0..duration`.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Palette.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Caption fades.
    pub fn caption_timing(&self) -> &CaptionTiming {
        &self.caption_timing
    }

    /// Top-level scenes, back-to-back from frame 0.
    pub fn scenes(&self) -> &Timeline<Scene> {
        &self.scenes
    }

    /// Overlay windows in global frames.
    pub fn overlays(&self) -> &Timeline<Overlay> {
        &self.overlays
    }

    /// Audio cue windows in global frames.
    pub fn cues(&self) -> &Timeline<Cue> {
        &self.cues
    }

    /// Window of the scene with `id`.
    pub fn scene_window(&self, id: &str) -> Option<TimeWindow> {
        self.scenes
            .iter()
            .find(|(_, s)| s.id == id)
            .map(|(w, _)| *w)
    }
}

fn layout_scenes(def: &CompositionDef, fps: Fps, duration: u64) -> FramewiseResult<Timeline<Scene>> {
    if def.scenes.is_empty() {
        return Err(FramewiseError::validation(
            "composition must declare at least one scene",
        ));
    }

    let mut seen = BTreeSet::new();
    let mut scenes = Timeline::new();
    let mut cursor = 0u64;
    for scene in &def.scenes {
        if !seen.insert(scene.id.as_str()) {
            return Err(FramewiseError::validation(format!(
                "duplicate scene id '{}'",
                scene.id
            )));
        }
        if !scene.duration_sec.is_finite() || scene.duration_sec <= 0.0 {
            return Err(FramewiseError::validation(format!(
                "scene '{}': duration_sec must be finite and > 0",
                scene.id
            )));
        }
        let len = fps.secs_to_frames_floor(scene.duration_sec);
        let window = TimeWindow::new(FrameIndex(cursor), len).map_err(|_| {
            FramewiseError::validation(format!(
                "scene '{}': duration_sec rounds down to 0 frames",
                scene.id
            ))
        })?;
        if window.end().0 > duration {
            return Err(FramewiseError::validation(format!(
                "scene '{}' ends at frame {} past the composition end {duration}",
                scene.id,
                window.end().0
            )));
        }

        let content = match &scene.content {
            SceneContentDef::Terminal(t) => {
                SceneContent::Terminal(Box::new(lower_terminal(t, &def.theme, fps)?))
            }
            SceneContentDef::Showcase(s) => {
                if s.clips.is_empty() {
                    return Err(FramewiseError::validation(format!(
                        "showcase scene '{}' has no clips",
                        scene.id
                    )));
                }
                let schedule = ClipSchedule::new(&s.clips, fps)?;
                if schedule.total_frames() > len {
                    return Err(FramewiseError::validation(format!(
                        "showcase scene '{}': clips span {} frames but the scene has {len}",
                        scene.id,
                        schedule.total_frames()
                    )));
                }
                for c in schedule.clips() {
                    if c.clip.overruns_trim() {
                        tracing::warn!(
                            scene = %scene.id,
                            clip = c.index,
                            source = %c.clip.source,
                            "clip playback runs past trim_end_sec"
                        );
                    }
                }
                SceneContent::Showcase(ShowcaseScene { schedule })
            }
            SceneContentDef::Outro(o) => {
                SceneContent::Outro(lower_outro(o, &def.theme, fps, len)?)
            }
        };

        tracing::debug!(
            id = %scene.id,
            kind = content.kind(),
            start = window.start.0,
            len = window.len,
            "scene window"
        );
        scenes.push(window, Scene {
            id: scene.id.clone(),
            content,
        });
        cursor = window.end().0;
    }
    Ok(scenes)
}

fn lower_terminal(def: &TerminalDef, theme: &Theme, fps: Fps) -> FramewiseResult<TerminalScene> {
    let t = &def.timing;
    let secs = |name: &str, v: f64| -> FramewiseResult<u64> {
        if !v.is_finite() || v < 0.0 {
            return Err(FramewiseError::validation(format!(
                "terminal timing {name} must be finite and >= 0"
            )));
        }
        Ok(fps.secs_to_frames_floor(v))
    };
    t.tag_spring.validate()?;
    if !t.frames_per_char.is_finite() {
        return Err(FramewiseError::validation(
            "terminal frames_per_char must be finite",
        ));
    }

    let subtitle = secs("subtitle_sec", t.subtitle_sec)?;
    let tags_start = secs("tags_sec", t.tags_sec)?;
    let status_start = secs("status_sec", t.status_sec)?;

    let tags = def
        .tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            Ok(TerminalTag {
                text: tag.text.clone(),
                color: theme.resolve(tag.color),
                start: staggered(tags_start, i, t.tag_stagger_frames, "tag_stagger_frames")?,
            })
        })
        .collect::<FramewiseResult<Vec<_>>>()?;

    let status_lines = def
        .team
        .iter()
        .enumerate()
        .map(|(i, member)| {
            Ok(StatusLine {
                name: member.name.clone(),
                final_label: member.action.clone(),
                start: staggered(status_start, i, t.status_stagger_frames, "status_stagger_frames")?,
                timing: t.status,
            })
        })
        .collect::<FramewiseResult<Vec<_>>>()?;

    let cursor_until = subtitle.checked_add(t.cursor_tail_frames).ok_or_else(|| {
        FramewiseError::validation("terminal cursor_tail_frames overflows the frame range")
    })?;

    let m = &def.matrix;
    if m.glyphs.is_empty() || m.columns == 0 || m.rows == 0 {
        return Err(FramewiseError::validation(
            "terminal matrix needs glyphs and at least one row and column",
        ));
    }
    if !(0.0..=1.0).contains(&m.layer_opacity) {
        return Err(FramewiseError::validation(
            "terminal matrix layer_opacity must be in [0, 1]",
        ));
    }

    Ok(TerminalScene {
        title: def.title.clone(),
        subtitle: def.subtitle.clone(),
        tags,
        status_lines,
        progress_label: def.progress_label.clone(),
        reveal_text: def.reveal_text.clone(),
        badge: def.badge.clone(),
        matrix: GlyphMatrix {
            columns: m.columns,
            rows: m.rows,
            glyphs: m.glyphs.chars().collect(),
            hold_frames: m.hold_frames.max(1),
            layer_opacity: m.layer_opacity,
        },
        cues: TerminalCues {
            subtitle,
            frames_per_char: t.frames_per_char,
            cursor_blink: t.cursor_blink_frames,
            cursor_until,
            tag_fade: t.tag_fade_frames,
            tag_spring: t.tag_spring,
            progress: secs("progress_sec", t.progress_sec)?,
            progress_len: secs("progress_duration_sec", t.progress_duration_sec)?,
            reveal: secs("reveal_sec", t.reveal_sec)?,
            reveal_len: t.reveal_frames,
            reveal_fade: t.reveal_fade_frames,
            badge_blink: t.badge_blink_frames,
            tension: secs("tension_sec", t.tension_sec)?,
            tension_blink: t.tension_blink_frames,
        },
    })
}

/// Start of the `index`-th item in a staggered run beginning at `start`.
fn staggered(start: u64, index: usize, stagger: u64, field: &str) -> FramewiseResult<u64> {
    u64::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(stagger))
        .and_then(|d| start.checked_add(d))
        .ok_or_else(|| {
            FramewiseError::validation(format!("terminal {field} overflows the frame range"))
        })
}

fn lower_outro(def: &OutroDef, theme: &Theme, fps: Fps, len: u64) -> FramewiseResult<OutroScene> {
    let frames = |v: f64| fps.as_f64() * v;
    let lines = def
        .lines
        .iter()
        .map(|line| {
            let [a, b] = line.fade_in_sec;
            let fade_in = KeyframeTable::new(vec![frames(a), frames(b)], vec![0.0, 1.0])
                .map_err(|e| {
                    FramewiseError::validation(format!("outro line '{}': fade_in_sec: {e}", line.text))
                })?;
            Ok(OutroLine {
                text: line.text.clone(),
                fade_in,
                ease: line.ease,
                color: theme.resolve(line.color),
                font_size: line.font_size,
            })
        })
        .collect::<FramewiseResult<Vec<_>>>()?;

    if !def.fade_out_sec.is_finite() || def.fade_out_sec <= 0.0 {
        return Err(FramewiseError::validation(
            "outro fade_out_sec must be finite and > 0",
        ));
    }
    let end = len as f64;
    let fade_out = KeyframeTable::new(vec![end - frames(def.fade_out_sec), end], vec![1.0, 0.0])?;

    Ok(OutroScene { lines, fade_out })
}

/// Scene windows and clip boundaries, by scene id.
struct SceneAnchors {
    scenes: BTreeMap<String, (TimeWindow, Option<Vec<TimeWindow>>)>,
}

impl SceneAnchors {
    fn collect(scenes: &Timeline<Scene>) -> Self {
        let scenes = scenes
            .iter()
            .map(|(window, scene)| {
                let clips = match &scene.content {
                    SceneContent::Showcase(s) => {
                        Some(s.schedule.clips().iter().map(|c| c.window).collect())
                    }
                    _ => None,
                };
                (scene.id.clone(), (*window, clips))
            })
            .collect();
        Self { scenes }
    }

    fn scene(&self, id: &str) -> FramewiseResult<TimeWindow> {
        self.scenes
            .get(id)
            .map(|(w, _)| *w)
            .ok_or_else(|| FramewiseError::validation(format!("unknown scene '{id}'")))
    }

    /// Clip windows of a showcase scene, in global frames.
    fn clips(&self, id: &str) -> FramewiseResult<Vec<TimeWindow>> {
        let (scene, clips) = self
            .scenes
            .get(id)
            .ok_or_else(|| FramewiseError::validation(format!("unknown scene '{id}'")))?;
        let clips = clips.as_ref().ok_or_else(|| {
            FramewiseError::validation(format!("scene '{id}' has no clip boundaries"))
        })?;
        Ok(clips.iter().map(|w| w.shift(scene.start.0 as i64)).collect())
    }

    /// Start frames for `placement`, each with an optional id suffix.
    fn resolve(&self, placement: &PlacementDef, fps: Fps) -> FramewiseResult<Vec<(Option<usize>, i64)>> {
        match placement {
            PlacementDef::Frame { frame } => {
                let start = i64::try_from(*frame).map_err(|_| {
                    FramewiseError::validation(format!("cue frame {frame} is out of range"))
                })?;
                Ok(vec![(None, start)])
            }
            PlacementDef::SceneOffset {
                scene,
                offset_sec,
                offset_frames,
            } => {
                let window = self.scene(scene)?;
                if !offset_sec.is_finite() {
                    return Err(FramewiseError::validation("offset_sec must be finite"));
                }
                // `as` saturates, so huge offsets surface as overflow below.
                let secs = (offset_sec * fps.as_f64()).floor() as i64;
                let start = i64::try_from(window.start.0)
                    .ok()
                    .and_then(|base| base.checked_add(secs))
                    .and_then(|s| s.checked_add(*offset_frames))
                    .ok_or_else(|| {
                        FramewiseError::validation(format!(
                            "offset into scene '{scene}' overflows the frame range"
                        ))
                    })?;
                Ok(vec![(None, start)])
            }
            PlacementDef::Boundary { scene, index } => {
                let clips = self.clips(scene)?;
                if *index == 0 || *index >= clips.len() {
                    return Err(FramewiseError::validation(format!(
                        "scene '{scene}' has boundaries 1..{}, got {index}",
                        clips.len().saturating_sub(1)
                    )));
                }
                Ok(vec![(None, clips[*index].start.0 as i64)])
            }
            PlacementDef::EachBoundary { scene } => {
                let clips = self.clips(scene)?;
                Ok(clips
                    .iter()
                    .enumerate()
                    .skip(1)
                    .map(|(i, w)| (Some(i), w.start.0 as i64))
                    .collect())
            }
            PlacementDef::FinalBoundary { scene } => {
                let clips = self.clips(scene)?;
                let last = clips.last().ok_or_else(|| {
                    FramewiseError::validation(format!("scene '{scene}' has no clips"))
                })?;
                Ok(vec![(None, last.start.0 as i64)])
            }
        }
    }
}

/// Window starting at `start` lasting `len` frames (to the end when `None`), cut at `duration`.
fn placed_window(id: &str, start: i64, len: Option<u64>, duration: u64) -> FramewiseResult<TimeWindow> {
    if start < 0 {
        return Err(FramewiseError::validation(format!(
            "'{id}' is placed before frame 0 (at {start})"
        )));
    }
    let start = start as u64;
    if start >= duration {
        return Err(FramewiseError::validation(format!(
            "'{id}' starts at frame {start}, past the composition end {duration}"
        )));
    }
    let len = len.unwrap_or(duration - start);
    let window = TimeWindow::new(FrameIndex(start), len)
        .map_err(|_| FramewiseError::validation(format!("'{id}' has zero length")))?;
    window
        .truncate_to(FrameIndex(duration))
        .ok_or_else(|| FramewiseError::validation(format!("'{id}' is empty after truncation")))
}

fn suffixed(id: &str, n: Option<usize>) -> String {
    match n {
        Some(n) => format!("{id}-{n}"),
        None => id.to_owned(),
    }
}

fn lower_overlay(
    def: &OverlayDef,
    theme: &Theme,
    fps: Fps,
    duration: u64,
    anchors: &SceneAnchors,
    out: &mut Timeline<Overlay>,
) -> FramewiseResult<()> {
    let (len, effect) = match &def.effect {
        OverlayEffectDef::Flash { length, bar_color } => {
            let len = length.to_frames(fps)?;
            let timing = FlashTiming::new(len, theme.resolve(*bar_color))?;
            (len, OverlayEffect::Flash(timing))
        }
    };
    for (n, start) in anchors.resolve(&def.placement, fps)? {
        let id = suffixed(&def.id, n);
        let window = placed_window(&id, start, Some(len), duration)?;
        tracing::debug!(id = %id, start = window.start.0, len = window.len, "overlay window");
        out.push(window, Overlay {
            id,
            effect: effect.clone(),
        });
    }
    Ok(())
}

fn lower_cue(
    def: &CueDef,
    fps: Fps,
    duration: u64,
    anchors: &SceneAnchors,
    out: &mut Timeline<Cue>,
) -> FramewiseResult<()> {
    if !def.volume.is_finite() || def.volume < 0.0 {
        return Err(FramewiseError::validation(format!(
            "cue '{}': volume must be finite and >= 0",
            def.id
        )));
    }
    if !def.trim_before_sec.is_finite() || def.trim_before_sec < 0.0 {
        return Err(FramewiseError::validation(format!(
            "cue '{}': trim_before_sec must be finite and >= 0",
            def.id
        )));
    }
    let len = def.length.map(|l| l.to_frames(fps)).transpose()?;

    for (n, start) in anchors.resolve(&def.placement, fps)? {
        let id = suffixed(&def.id, n);
        let window = placed_window(&id, start, len, duration)?;
        tracing::debug!(id = %id, start = window.start.0, len = window.len, "cue window");
        out.push(window, Cue {
            id,
            asset: def.asset.clone(),
            volume: def.volume,
            trim_before_secs: def.trim_before_sec,
        });
    }
    Ok(())
}

/// Cue windows at each clip boundary of a showcase scene, in global frames.
///
/// Convenience over [`boundary_cues`] for callers holding a built composition.
pub fn scene_boundary_cues(
    comp: &Composition,
    scene_id: &str,
    cue_len: u64,
    final_len: Option<u64>,
) -> FramewiseResult<crate::timeline::schedule::BoundaryCues> {
    let anchors = SceneAnchors::collect(comp.scenes());
    boundary_cues(&anchors.clips(scene_id)?, cue_len, final_len)
}

#[cfg(test)]
#[path = "../../tests/unit/composition/build.rs"]
mod tests;
