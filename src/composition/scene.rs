use crate::{
    animation::{ease::Ease, interpolate::KeyframeTable, spring::SpringConfig},
    foundation::{
        color::ColorDef,
        error::{FramewiseError, FramewiseResult},
    },
    text::status::StatusLine,
    timeline::schedule::ClipSchedule,
};

/// A lowered top-level scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Scene id.
    pub id: String,
    /// Scene payload.
    pub content: SceneContent,
}

/// Lowered scene payloads. All frame values are scene-local.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneContent {
    /// Terminal intro.
    Terminal(Box<TerminalScene>),
    /// Clip sequence.
    Showcase(ShowcaseScene),
    /// Closing lines.
    Outro(OutroScene),
}

impl SceneContent {
    /// Kind name used in logs and node ids.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Terminal(_) => "terminal",
            Self::Showcase(_) => "showcase",
            Self::Outro(_) => "outro",
        }
    }
}

/// Terminal intro with every cue point already in frames.
#[derive(Clone, Debug, PartialEq)]
pub struct TerminalScene {
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) tags: Vec<TerminalTag>,
    pub(crate) status_lines: Vec<StatusLine>,
    pub(crate) progress_label: String,
    pub(crate) reveal_text: String,
    pub(crate) badge: String,
    pub(crate) matrix: GlyphMatrix,
    pub(crate) cues: TerminalCues,
}

/// Scene-local frames of the terminal beats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalCues {
    pub(crate) subtitle: u64,
    pub(crate) frames_per_char: f64,
    pub(crate) cursor_blink: u64,
    pub(crate) cursor_until: u64,
    pub(crate) tag_fade: u64,
    pub(crate) tag_spring: SpringConfig,
    pub(crate) progress: u64,
    pub(crate) progress_len: u64,
    pub(crate) reveal: u64,
    pub(crate) reveal_len: u64,
    pub(crate) reveal_fade: u64,
    pub(crate) badge_blink: u64,
    pub(crate) tension: u64,
    pub(crate) tension_blink: u64,
}

/// A tag with its resolved tint and start frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TerminalTag {
    pub(crate) text: String,
    pub(crate) color: ColorDef,
    pub(crate) start: u64,
}

/// Background glyph rain.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphMatrix {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) glyphs: Vec<char>,
    pub(crate) hold_frames: u64,
    pub(crate) layer_opacity: f64,
}

/// Clip sequence scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ShowcaseScene {
    /// Laid-out clips.
    pub schedule: ClipSchedule,
}

/// Closing lines with a scene-wide fade-out.
#[derive(Clone, Debug, PartialEq)]
pub struct OutroScene {
    pub(crate) lines: Vec<OutroLine>,
    pub(crate) fade_out: KeyframeTable,
}

/// One outro line.
#[derive(Clone, Debug, PartialEq)]
pub struct OutroLine {
    pub(crate) text: String,
    pub(crate) fade_in: KeyframeTable,
    pub(crate) ease: Ease,
    pub(crate) color: ColorDef,
    pub(crate) font_size: f64,
}

/// A lowered visual overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    /// Overlay id.
    pub id: String,
    /// Effect.
    pub effect: OverlayEffect,
}

/// Lowered overlay effects.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayEffect {
    /// Flash with glitch bars.
    Flash(FlashTiming),
}

/// One horizontal glitch bar of a flash.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlitchBar {
    /// Vertical position as a fraction of canvas height.
    pub top: f64,
    /// Bar height in pixels.
    pub height_px: f64,
    /// Frames after the flash start before the bar lights.
    pub delay: u64,
}

/// Default glitch bar set.
pub const GLITCH_BARS: [GlitchBar; 4] = [
    GlitchBar {
        top: 0.20,
        height_px: 3.0,
        delay: 0,
    },
    GlitchBar {
        top: 0.45,
        height_px: 8.0,
        delay: 2,
    },
    GlitchBar {
        top: 0.70,
        height_px: 2.0,
        delay: 1,
    },
    GlitchBar {
        top: 0.85,
        height_px: 5.0,
        delay: 3,
    },
];

/// Keyframes of a flash of a given length.
#[derive(Clone, Debug, PartialEq)]
pub struct FlashTiming {
    /// Flash length in frames.
    pub len: u64,
    /// Fill opacity, `[0, 3, 0.3 len, len] -> [0, 1, 0.8, 0]`.
    pub fill: KeyframeTable,
    /// Bar pulse, `[0, 2, 6] -> [0, 1, 0]` relative to each bar's delay.
    pub bar_pulse: KeyframeTable,
    /// Bars are drawn while `frame < bar_cutoff`.
    pub bar_cutoff: f64,
    /// Bar opacity multiplier.
    pub bar_gain: f64,
    /// Bar tint.
    pub bar_color: ColorDef,
    /// Bars.
    pub bars: Vec<GlitchBar>,
}

impl FlashTiming {
    const PEAK_FRAME: f64 = 3.0;

    /// Flash lasting `len` frames.
    pub fn new(len: u64, bar_color: ColorDef) -> FramewiseResult<Self> {
        let l = len as f64;
        let hold = 0.3 * l;
        if hold <= Self::PEAK_FRAME {
            return Err(FramewiseError::validation(format!(
                "flash of {len} frames is too short; its hold point must come after frame 3"
            )));
        }
        Ok(Self {
            len,
            fill: KeyframeTable::new(vec![0.0, Self::PEAK_FRAME, hold, l], vec![
                0.0, 1.0, 0.8, 0.0,
            ])?,
            bar_pulse: KeyframeTable::new(vec![0.0, 2.0, 6.0], vec![0.0, 1.0, 0.0])?,
            bar_cutoff: 0.5 * l,
            bar_gain: 0.8,
            bar_color,
            bars: GLITCH_BARS.to_vec(),
        })
    }
}

/// A lowered audio cue.
#[derive(Clone, Debug, PartialEq)]
pub struct Cue {
    /// Cue id.
    pub id: String,
    /// Audio asset.
    pub asset: String,
    /// Linear gain.
    pub volume: f64,
    /// Seconds skipped at the start of the asset.
    pub trim_before_secs: f64,
}
