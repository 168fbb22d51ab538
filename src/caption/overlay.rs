use std::{fmt, str::FromStr};

use kurbo::Point;

use crate::{
    animation::interpolate::{InterpolateOpts, interpolate},
    foundation::{
        core::{Canvas, Vec2},
        error::{FramewiseError, FramewiseResult},
    },
};

/// Where a caption sits on screen.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CaptionPosition {
    /// Centered near the bottom edge.
    #[default]
    BottomCenter,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Dead center, slightly larger type.
    Center,
    /// Dead center, display-size type.
    #[serde(alias = "center-big")]
    CenterLarge,
    /// Vertically centered, right aligned.
    CenterRight,
    /// Horizontally centered near the top.
    CenterTop,
    /// Horizontally centered, above the bottom-center slot.
    CenterBottom,
}

impl CaptionPosition {
    /// Every position, in tag order.
    pub const ALL: [Self; 10] = [
        Self::BottomCenter,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Center,
        Self::CenterLarge,
        Self::CenterRight,
        Self::CenterTop,
        Self::CenterBottom,
    ];

    /// Kebab-case tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::BottomCenter => "bottom-center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Center => "center",
            Self::CenterLarge => "center-large",
            Self::CenterRight => "center-right",
            Self::CenterTop => "center-top",
            Self::CenterBottom => "center-bottom",
        }
    }
}

impl fmt::Display for CaptionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CaptionPosition {
    type Err = FramewiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "center-big" {
            return Ok(Self::CenterLarge);
        }
        Self::ALL
            .into_iter()
            .find(|p| p.tag() == s)
            .ok_or_else(|| FramewiseError::validation(format!("unknown caption position '{s}'")))
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Flush left.
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Which edge of the text block sits on the anchor line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    /// Top edge on the line.
    Top,
    /// Block centered on the line.
    Middle,
    /// Bottom edge on the line.
    Bottom,
}

/// Resolved placement and type style for a caption on a given canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionLayout {
    /// Left edge of the region text is aligned within.
    pub left: f64,
    /// Right edge of that region.
    pub right: f64,
    /// Anchor line, in pixels from the top.
    pub anchor_y: f64,
    /// Which edge of the block sits on `anchor_y`.
    pub vertical: VerticalAnchor,
    /// Horizontal alignment within `left..right`.
    pub align: TextAlign,
    /// Font size in pixels.
    pub font_size: f64,
    /// CSS-style font weight.
    pub font_weight: u16,
    /// Extra tracking in pixels.
    pub letter_spacing: f64,
}

const EDGE_INSET: f64 = 60.0;
const CORNER_INSET_Y: f64 = 170.0;
const CENTER_ROW_INSET_Y: f64 = 190.0;
const CENTER_RIGHT_INSET: f64 = 120.0;

impl CaptionLayout {
    /// Layout for `position` on `canvas`.
    pub fn resolve(position: CaptionPosition, canvas: Canvas) -> Self {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let padded = |left_inset: f64, right_inset: f64| {
            (left_inset + EDGE_INSET, w - right_inset - EDGE_INSET)
        };

        let base = Self {
            left: EDGE_INSET,
            right: w - EDGE_INSET,
            anchor_y: h - CORNER_INSET_Y,
            vertical: VerticalAnchor::Bottom,
            align: TextAlign::Center,
            font_size: 40.0,
            font_weight: 500,
            letter_spacing: -0.5,
        };

        match position {
            CaptionPosition::BottomCenter => base,
            CaptionPosition::TopLeft => {
                let (left, right) = padded(EDGE_INSET, 0.0);
                Self {
                    left,
                    right,
                    anchor_y: CORNER_INSET_Y,
                    vertical: VerticalAnchor::Top,
                    align: TextAlign::Left,
                    ..base
                }
            }
            CaptionPosition::TopRight => {
                let (left, right) = padded(0.0, EDGE_INSET);
                Self {
                    left,
                    right,
                    anchor_y: CORNER_INSET_Y,
                    vertical: VerticalAnchor::Top,
                    align: TextAlign::Right,
                    ..base
                }
            }
            CaptionPosition::BottomLeft => {
                let (left, right) = padded(EDGE_INSET, 0.0);
                Self {
                    left,
                    right,
                    align: TextAlign::Left,
                    ..base
                }
            }
            CaptionPosition::BottomRight => {
                let (left, right) = padded(0.0, EDGE_INSET);
                Self {
                    left,
                    right,
                    align: TextAlign::Right,
                    ..base
                }
            }
            CaptionPosition::Center => Self {
                anchor_y: h / 2.0,
                vertical: VerticalAnchor::Middle,
                font_size: 52.0,
                font_weight: 600,
                ..base
            },
            CaptionPosition::CenterLarge => Self {
                anchor_y: h / 2.0,
                vertical: VerticalAnchor::Middle,
                font_size: 96.0,
                font_weight: 700,
                letter_spacing: 2.0,
                ..base
            },
            // Unpadded, pinned to a fixed right inset.
            CaptionPosition::CenterRight => Self {
                left: 0.0,
                right: w - CENTER_RIGHT_INSET,
                anchor_y: h / 2.0,
                vertical: VerticalAnchor::Middle,
                align: TextAlign::Right,
                ..base
            },
            CaptionPosition::CenterTop => Self {
                anchor_y: CENTER_ROW_INSET_Y,
                vertical: VerticalAnchor::Top,
                ..base
            },
            CaptionPosition::CenterBottom => Self {
                anchor_y: h - CENTER_ROW_INSET_Y,
                ..base
            },
        }
    }

    /// Point the aligned text block attaches to.
    pub fn anchor(&self) -> Point {
        let x = match self.align {
            TextAlign::Left => self.left,
            TextAlign::Center => (self.left + self.right) / 2.0,
            TextAlign::Right => self.right,
        };
        Point::new(x, self.anchor_y)
    }
}

/// Fade and drift constants for clip captions, in clip-local frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionTiming {
    /// Frame the fade-in starts.
    pub fade_in_start: u64,
    /// Frame the caption is fully visible.
    pub fade_in_end: u64,
    /// Fade-out starts this many frames before the clip ends.
    pub fade_out_lead: u64,
    /// Fade-out ends this many frames before the clip ends.
    pub fade_out_tail: u64,
    /// Offset reached at the end of the clip.
    pub drift: Vec2,
}

impl Default for CaptionTiming {
    fn default() -> Self {
        Self {
            fade_in_start: 15,
            fade_in_end: 25,
            fade_out_lead: 20,
            fade_out_tail: 8,
            drift: Vec2::new(6.0, -3.0),
        }
    }
}

impl CaptionTiming {
    /// Both fades need a non-empty ramp.
    pub fn validate(&self) -> FramewiseResult<()> {
        if self.fade_in_end <= self.fade_in_start {
            return Err(FramewiseError::validation(
                "caption fade_in_end must be > fade_in_start",
            ));
        }
        if self.fade_out_lead <= self.fade_out_tail {
            return Err(FramewiseError::validation(
                "caption fade_out_lead must be > fade_out_tail",
            ));
        }
        if !self.drift.x.is_finite() || !self.drift.y.is_finite() {
            return Err(FramewiseError::validation("caption drift must be finite"));
        }
        Ok(())
    }
}

/// Caption appearance at one clip-local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionFrame {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Small positional offset in pixels.
    pub drift: Vec2,
}

/// Opacity and drift of a caption `local` frames into a clip `len` frames long.
///
/// Opacity is the lower of a clamped fade-in ramp and a clamped fade-out ramp anchored at
/// `len`, so short clips where the ramps overlap get a dimmer plateau instead of a special case.
pub fn caption_frame(local: u64, len: u64, timing: &CaptionTiming) -> FramewiseResult<CaptionFrame> {
    let f = local as f64;
    let end = len as f64;
    let fade_in_start = timing.fade_in_start as f64;

    let fade_in = interpolate(
        f,
        &[fade_in_start, timing.fade_in_end as f64],
        &[0.0, 1.0],
        InterpolateOpts::CLAMP,
    )?;
    let fade_out = interpolate(
        f,
        &[
            end - timing.fade_out_lead as f64,
            end - timing.fade_out_tail as f64,
        ],
        &[1.0, 0.0],
        InterpolateOpts::CLAMP,
    )?;

    let drift_end = end.max(fade_in_start + 1.0);
    let t = interpolate(
        f,
        &[fade_in_start, drift_end],
        &[0.0, 1.0],
        InterpolateOpts::CLAMP,
    )?;

    Ok(CaptionFrame {
        opacity: fade_in.min(fade_out),
        drift: timing.drift * t,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/caption/overlay.rs"]
mod tests;
