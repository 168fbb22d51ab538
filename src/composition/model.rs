use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    animation::{ease::Ease, spring::SpringConfig},
    caption::overlay::CaptionTiming,
    foundation::{
        color::ColorDef,
        core::{Canvas, Fps},
        error::{FramewiseError, FramewiseResult},
    },
    text::status::StatusLineTiming,
    timeline::schedule::ClipDescriptor,
};

/// JSON-facing description of a whole composition.
///
/// This is the human-edited boundary form. [`crate::Composition::build`] validates it and lowers
/// every second-based value to frames exactly once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositionDef {
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Frame rate.
    pub fps: Fps,
    /// Total length in seconds; `floor(duration_sec * fps)` frames are rendered.
    pub duration_sec: f64,
    /// Named palette.
    #[serde(default)]
    pub theme: Theme,
    /// Top-level scenes, played back-to-back from frame 0.
    pub scenes: Vec<SceneDef>,
    /// Short visual windows layered over the scenes.
    #[serde(default)]
    pub overlays: Vec<OverlayDef>,
    /// Audio cues.
    #[serde(default)]
    pub cues: Vec<CueDef>,
    /// Fades shared by every clip caption.
    #[serde(default)]
    pub caption_timing: CaptionTiming,
}

fn default_name() -> String {
    "composition".to_owned()
}

impl CompositionDef {
    /// Parse a composition from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> FramewiseResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FramewiseError::serde(format!("parse composition JSON: {e}")))
    }

    /// Parse a composition from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FramewiseResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            anyhow::Error::new(e).context(format!("open composition JSON '{}'", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse a composition from a JSON string.
    pub fn from_json_str(s: &str) -> FramewiseResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| FramewiseError::serde(format!("parse composition JSON: {e}")))
    }

    /// Serialize back to pretty JSON.
    pub fn to_json_pretty(&self) -> FramewiseResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FramewiseError::serde(format!("serialize composition JSON: {e}")))
    }
}

/// A duration given either in frames or in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationDef {
    /// Exact frame count.
    Frames(u64),
    /// Seconds, floored to frames.
    Secs(f64),
}

impl DurationDef {
    /// Frame count at `fps`.
    pub fn to_frames(self, fps: Fps) -> FramewiseResult<u64> {
        match self {
            Self::Frames(n) => Ok(n),
            Self::Secs(s) if s.is_finite() && s >= 0.0 => Ok(fps.secs_to_frames_floor(s)),
            Self::Secs(_) => Err(FramewiseError::validation(
                "duration in seconds must be finite and >= 0",
            )),
        }
    }
}

/// One top-level scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    /// Unique id, referenced by cue and overlay placements.
    pub id: String,
    /// Length in seconds.
    pub duration_sec: f64,
    /// What the scene shows.
    pub content: SceneContentDef,
}

/// Scene payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneContentDef {
    /// Boot-up terminal intro.
    Terminal(TerminalDef),
    /// Back-to-back video clips with captions.
    Showcase(ShowcaseDef),
    /// Closing text lines.
    Outro(OutroDef),
}

/// Terminal intro scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerminalDef {
    /// Header text followed by a blinking cursor.
    pub title: String,
    /// Line typed out under the title.
    pub subtitle: String,
    /// Pill tags that pop in one after another.
    #[serde(default)]
    pub tags: Vec<TagDef>,
    /// One status line per entry.
    #[serde(default)]
    pub team: Vec<TeamMemberDef>,
    /// Label above the progress bar.
    #[serde(default = "default_progress_label")]
    pub progress_label: String,
    /// Name decrypted by the classified reveal.
    pub reveal_text: String,
    /// Badge text next to the reveal.
    #[serde(default = "default_badge")]
    pub badge: String,
    /// Background glyph matrix.
    #[serde(default)]
    pub matrix: MatrixDef,
    /// Cue points and effect lengths.
    #[serde(default)]
    pub timing: TerminalTimingDef,
}

fn default_progress_label() -> String {
    "COMPILING PROJECT".to_owned()
}

fn default_badge() -> String {
    "CLASSIFIED".to_owned()
}

/// A pill tag in the terminal scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagDef {
    /// Label.
    pub text: String,
    /// Tint.
    #[serde(default = "default_tag_paint")]
    pub color: PaintDef,
}

fn default_tag_paint() -> PaintDef {
    PaintDef::Slot(ThemeSlot::Secondary)
}

/// One status line entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberDef {
    /// Left-hand name.
    pub name: String,
    /// Label locked in on completion.
    pub action: String,
}

/// Glyph rain behind the terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixDef {
    /// Glyph columns.
    pub columns: u32,
    /// Glyph rows.
    pub rows: u32,
    /// Glyph alphabet.
    pub glyphs: String,
    /// Frames a glyph holds before it is re-rolled.
    pub hold_frames: u64,
    /// Opacity of the whole matrix layer.
    pub layer_opacity: f64,
}

impl Default for MatrixDef {
    fn default() -> Self {
        Self {
            columns: 40,
            rows: 20,
            glyphs: "01アイウエオカキクケコサシスセソタチツテトナニヌネノ<>{}[]".to_owned(),
            hold_frames: 3,
            layer_opacity: 0.06,
        }
    }
}

/// Terminal cue points (seconds from scene start) and effect lengths (frames).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalTimingDef {
    /// Subtitle typewriter start.
    pub subtitle_sec: f64,
    /// First tag pop.
    pub tags_sec: f64,
    /// First status line.
    pub status_sec: f64,
    /// Progress bar start.
    pub progress_sec: f64,
    /// Progress bar fill time.
    pub progress_duration_sec: f64,
    /// Classified reveal start.
    pub reveal_sec: f64,
    /// Tension dot start.
    pub tension_sec: f64,
    /// Typewriter speed.
    pub frames_per_char: f64,
    /// Cursor blink period.
    pub cursor_blink_frames: u64,
    /// Cursor stays up this long after the subtitle starts.
    pub cursor_tail_frames: u64,
    /// Delay between consecutive tags.
    pub tag_stagger_frames: u64,
    /// Tag fade-in length.
    pub tag_fade_frames: u64,
    /// Tag pop spring.
    pub tag_spring: SpringConfig,
    /// Delay between consecutive status lines.
    pub status_stagger_frames: u64,
    /// Per-line status timing.
    pub status: StatusLineTiming,
    /// Scramble-to-clear length.
    pub reveal_frames: u64,
    /// Reveal fade-in length.
    pub reveal_fade_frames: u64,
    /// Badge blink period.
    pub badge_blink_frames: u64,
    /// Tension dot blink period.
    pub tension_blink_frames: u64,
}

impl Default for TerminalTimingDef {
    fn default() -> Self {
        Self {
            subtitle_sec: 0.3,
            tags_sec: 0.7,
            status_sec: 1.2,
            progress_sec: 3.4,
            progress_duration_sec: 0.6,
            reveal_sec: 4.1,
            tension_sec: 5.0,
            frames_per_char: 1.0,
            cursor_blink_frames: 8,
            cursor_tail_frames: 10,
            tag_stagger_frames: 3,
            tag_fade_frames: 8,
            tag_spring: SpringConfig::new(15.0, 150.0),
            status_stagger_frames: 6,
            status: StatusLineTiming::default(),
            reveal_frames: 20,
            reveal_fade_frames: 5,
            badge_blink_frames: 15,
            tension_blink_frames: 12,
        }
    }
}

/// Clip sequence scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShowcaseDef {
    /// Clips in play order.
    pub clips: Vec<ClipDescriptor>,
}

/// Closing scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutroDef {
    /// Lines, each with its own fade-in.
    pub lines: Vec<OutroLineDef>,
    /// The whole scene fades out over this many final seconds.
    #[serde(default = "default_outro_fade_out")]
    pub fade_out_sec: f64,
}

fn default_outro_fade_out() -> f64 {
    1.0
}

/// One outro text line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutroLineDef {
    /// Text.
    pub text: String,
    /// Fade-in `[start, end]` in seconds from scene start.
    pub fade_in_sec: [f64; 2],
    /// Curve applied across the fade-in.
    #[serde(default)]
    pub ease: Ease,
    /// Fill.
    #[serde(default = "default_text_paint")]
    pub color: PaintDef,
    /// Font size in pixels.
    #[serde(default = "default_outro_font_size")]
    pub font_size: f64,
}

fn default_text_paint() -> PaintDef {
    PaintDef::Slot(ThemeSlot::Text)
}

fn default_outro_font_size() -> f64 {
    42.0
}

/// Where a cue or overlay starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementDef {
    /// Absolute global frame.
    Frame {
        /// Frame index.
        frame: u64,
    },
    /// Relative to a scene start; `floor(offset_sec * fps) + offset_frames`, may be negative.
    SceneOffset {
        /// Scene id.
        scene: String,
        /// Offset in seconds.
        #[serde(default)]
        offset_sec: f64,
        /// Extra offset in frames.
        #[serde(default)]
        offset_frames: i64,
    },
    /// Start of clip `index` (1-based boundary) of a showcase scene.
    Boundary {
        /// Showcase scene id.
        scene: String,
        /// Boundary number, `1..clips`.
        index: usize,
    },
    /// One placement per boundary between consecutive clips.
    EachBoundary {
        /// Showcase scene id.
        scene: String,
    },
    /// Start of the last clip.
    FinalBoundary {
        /// Showcase scene id.
        scene: String,
    },
}

/// An audio cue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CueDef {
    /// Id; cues placed at several boundaries get a `-{n}` suffix.
    pub id: String,
    /// Audio asset identifier, opaque to the engine.
    pub asset: String,
    /// Start rule.
    pub placement: PlacementDef,
    /// Length; runs to the composition end when absent.
    #[serde(default)]
    pub length: Option<DurationDef>,
    /// Linear gain.
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Seconds skipped at the start of the asset.
    #[serde(default)]
    pub trim_before_sec: f64,
}

fn default_volume() -> f64 {
    1.0
}

/// A short visual overlay window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayDef {
    /// Id.
    pub id: String,
    /// Start rule.
    pub placement: PlacementDef,
    /// Effect.
    pub effect: OverlayEffectDef,
}

/// Overlay effect kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayEffectDef {
    /// White flash with glitch bars.
    Flash {
        /// Effect length.
        #[serde(default = "default_flash_length")]
        length: DurationDef,
        /// Bar tint.
        #[serde(default = "default_flash_bar_paint")]
        bar_color: PaintDef,
    },
}

fn default_flash_length() -> DurationDef {
    DurationDef::Secs(0.4)
}

fn default_flash_bar_paint() -> PaintDef {
    PaintDef::Slot(ThemeSlot::Primary)
}

/// Named palette entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeSlot {
    /// Backdrop.
    Background,
    /// Main accent.
    Primary,
    /// Second accent.
    Secondary,
    /// Third accent.
    Accent,
    /// Body text.
    Text,
    /// De-emphasized text.
    Muted,
    /// Borders and separators.
    Subtle,
}

/// A palette reference or a literal color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaintDef {
    /// Palette entry by name.
    Slot(ThemeSlot),
    /// Literal color.
    Color(ColorDef),
}

/// Named colors every visual node resolves against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Backdrop.
    pub background: ColorDef,
    /// Main accent.
    pub primary: ColorDef,
    /// Second accent.
    pub secondary: ColorDef,
    /// Third accent.
    pub accent: ColorDef,
    /// Body text.
    pub text: ColorDef,
    /// De-emphasized text.
    pub muted: ColorDef,
    /// Borders and separators.
    pub subtle: ColorDef,
}

impl Default for Theme {
    fn default() -> Self {
        fn rgb(r: u8, g: u8, b: u8) -> ColorDef {
            ColorDef::rgba(
                f64::from(r) / 255.0,
                f64::from(g) / 255.0,
                f64::from(b) / 255.0,
                1.0,
            )
        }

        Self {
            background: rgb(0x0a, 0x0a, 0x0a),
            primary: rgb(0x4a, 0xde, 0x80),
            secondary: rgb(0x38, 0xbd, 0xf8),
            accent: rgb(0xa7, 0x8b, 0xfa),
            text: rgb(0xff, 0xff, 0xff),
            muted: rgb(0x71, 0x71, 0x7a),
            subtle: rgb(0x27, 0x27, 0x2a),
        }
    }
}

impl Theme {
    /// Color of a palette slot.
    pub fn slot(&self, slot: ThemeSlot) -> ColorDef {
        match slot {
            ThemeSlot::Background => self.background,
            ThemeSlot::Primary => self.primary,
            ThemeSlot::Secondary => self.secondary,
            ThemeSlot::Accent => self.accent,
            ThemeSlot::Text => self.text,
            ThemeSlot::Muted => self.muted,
            ThemeSlot::Subtle => self.subtle,
        }
    }

    /// Resolve a paint against this palette.
    pub fn resolve(&self, paint: PaintDef) -> ColorDef {
        match paint {
            PaintDef::Slot(slot) => self.slot(slot),
            PaintDef::Color(c) => c,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
