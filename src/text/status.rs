use crate::animation::interpolate::{InterpolateOpts, interpolate};

/// Labels cycled through while a status line is still loading.
pub const LOADING_LABELS: [&str; 8] = [
    "initializing...",
    "connecting...",
    "authenticating...",
    "loading modules...",
    "syncing data...",
    "compiling...",
    "optimizing...",
    "ready",
];

/// `floor(frame / period) % 2 == 0`. A zero period never blinks.
pub fn blink(frame: u64, period: u64) -> bool {
    if period == 0 {
        return true;
    }
    (frame / period) % 2 == 0
}

/// Timing knobs for [`StatusLine`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StatusLineTiming {
    /// Frames until the dot leader is full; the line completes strictly after this.
    pub settle_frames: u64,
    /// Frames each cycling label stays up.
    pub cycle_frames: u64,
    /// Fade-in length.
    pub fade_in_frames: u64,
    /// Dot leader length once full.
    pub dots: u32,
}

impl Default for StatusLineTiming {
    fn default() -> Self {
        Self {
            settle_frames: 15,
            cycle_frames: 3,
            fade_in_frames: 3,
            dots: 20,
        }
    }
}

/// A "name ........ action" line that cycles through loading labels before settling.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    /// Left-hand label.
    pub name: String,
    /// Label shown once complete.
    pub final_label: String,
    /// Local frame the line appears at.
    pub start: u64,
    /// Timing.
    pub timing: StatusLineTiming,
}

/// Resolved look of a [`StatusLine`] at one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLineState<'a> {
    /// Dot leader length.
    pub dots: u32,
    /// Label currently shown.
    pub label: &'a str,
    /// Whether the final label has locked in.
    pub complete: bool,
    /// Line opacity.
    pub opacity: f64,
}

impl StatusLine {
    /// State at `frame`, or `None` before the line starts.
    pub fn state(&self, frame: u64) -> Option<StatusLineState<'_>> {
        let local = frame.checked_sub(self.start)?;
        let t = self.timing;

        let dots = if t.settle_frames == 0 {
            t.dots
        } else {
            let filled = (local as f64 / t.settle_frames as f64 * f64::from(t.dots)).floor();
            (filled as u32).min(t.dots)
        };
        let complete = local > t.settle_frames;
        let label = if complete {
            self.final_label.as_str()
        } else {
            let step = local / t.cycle_frames.max(1);
            LOADING_LABELS[(step % LOADING_LABELS.len() as u64) as usize]
        };
        let opacity = fade_in(local, t.fade_in_frames);

        Some(StatusLineState {
            dots,
            label,
            complete,
            opacity,
        })
    }
}

/// Progress bar readout at one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressReadout {
    /// Fill fraction in `[0, 1]`.
    pub progress: f64,
    /// `floor(progress * 100)`.
    pub percent: u32,
    /// `floor(progress * 255)`, shown as a hex byte.
    pub byte: u8,
}

impl ProgressReadout {
    /// Readout `local` frames into a bar that fills over `duration` frames.
    pub fn at(local: u64, duration: u64) -> Self {
        let progress = if duration == 0 {
            1.0
        } else {
            (local as f64 / duration as f64).min(1.0)
        };
        Self {
            progress,
            percent: (progress * 100.0).floor() as u32,
            byte: (progress * 255.0).floor() as u8,
        }
    }

    /// `0x1F` style label.
    pub fn hex_label(&self) -> String {
        format!("0x{:02X}", self.byte)
    }

    /// `42%` style label.
    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent)
    }
}

/// Linear 0 -> 1 ramp over `frames`, clamped on the right.
pub(crate) fn fade_in(local: u64, frames: u64) -> f64 {
    if frames == 0 {
        return 1.0;
    }
    interpolate(
        local as f64,
        &[0.0, frames as f64],
        &[0.0, 1.0],
        InterpolateOpts::CLAMP_RIGHT,
    )
    .unwrap_or(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/text/status.rs"]
mod tests;
