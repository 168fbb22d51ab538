use crate::foundation::error::{FramewiseError, FramewiseResult};

pub use kurbo::Vec2;

/// Absolute or local frame index, the unit of time.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)` used for batch evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame.
    pub start: FrameIndex,
    /// One past the last frame.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> FramewiseResult<Self> {
        if start.0 > end.0 {
            return Err(FramewiseError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Whether the range holds no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }
}

/// Half-open activation window `[start, start + len)` on a timeline.
///
/// `len` is always `> 0`; a window is active at global frame `g` iff
/// `start <= g < start + len`, and its local frame is `g - start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    /// First active frame.
    pub start: FrameIndex,
    /// Number of active frames.
    pub len: u64,
}

impl TimeWindow {
    /// Build a window, rejecting zero-length windows.
    pub fn new(start: FrameIndex, len: u64) -> FramewiseResult<Self> {
        if len == 0 {
            return Err(FramewiseError::validation("TimeWindow length must be > 0"));
        }
        Ok(Self { start, len })
    }

    /// Exclusive end frame.
    pub fn end(self) -> FrameIndex {
        FrameIndex(self.start.0.saturating_add(self.len))
    }

    /// Whether `frame` falls inside the window.
    pub fn contains(self, frame: FrameIndex) -> bool {
        self.start.0 <= frame.0 && frame.0 < self.end().0
    }

    /// Local frame for `frame`, or `None` when the window is inactive.
    pub fn local_frame(self, frame: FrameIndex) -> Option<FrameIndex> {
        self.contains(frame).then(|| FrameIndex(frame.0 - self.start.0))
    }

    /// Window translated by `delta` frames; the start saturates at zero.
    pub fn shift(self, delta: i64) -> Self {
        let start = if delta >= 0 {
            self.start.0.saturating_add(delta as u64)
        } else {
            self.start.0.saturating_sub(delta.unsigned_abs())
        };
        Self {
            start: FrameIndex(start),
            len: self.len,
        }
    }

    /// Truncate the window so it ends no later than `limit`; `None` if nothing remains.
    pub fn truncate_to(self, limit: FrameIndex) -> Option<Self> {
        if self.start.0 >= limit.0 {
            return None;
        }
        let len = self.len.min(limit.0 - self.start.0);
        Some(Self {
            start: self.start,
            len,
        })
    }
}

/// Fixed frame rate expressed as a rational `num / den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds); must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a frame rate, rejecting zero components.
    pub fn new(num: u32, den: u32) -> FramewiseResult<Self> {
        if den == 0 {
            return Err(FramewiseError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(FramewiseError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Integer frame rate (`num / 1`).
    pub fn integer(fps: u32) -> FramewiseResult<Self> {
        Self::new(fps, 1)
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert a frame count (or fractional frame position) to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// `floor(secs * fps)`, the single seconds-to-frames conversion used everywhere.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
