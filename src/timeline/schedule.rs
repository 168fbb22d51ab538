use crate::{
    caption::overlay::CaptionPosition,
    foundation::{
        core::{FrameIndex, Fps, TimeWindow},
        error::{FramewiseError, FramewiseResult},
    },
};

/// One source-media clip in a showcase sequence.
///
/// Source timing is in seconds; the display duration is what the clip occupies on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClipDescriptor {
    /// Media source identifier, opaque to the engine.
    pub source: String,
    /// First source second to play.
    #[serde(default)]
    pub trim_start_sec: f64,
    /// Last source second of the usable range.
    pub trim_end_sec: f64,
    /// How long the clip is shown, in seconds.
    pub duration_sec: f64,
    /// Source seconds advanced per displayed second.
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f64,
    /// Caption text shown while the clip is on screen.
    #[serde(default)]
    pub caption: String,
    /// Caption placement.
    #[serde(default)]
    pub caption_position: CaptionPosition,
}

fn default_playback_rate() -> f64 {
    1.0
}

impl ClipDescriptor {
    /// Reject malformed trims, durations and rates.
    pub fn validate(&self) -> FramewiseResult<()> {
        if self.source.trim().is_empty() {
            return Err(FramewiseError::validation("clip source must be non-empty"));
        }
        if !self.trim_start_sec.is_finite() || self.trim_start_sec < 0.0 {
            return Err(FramewiseError::validation(format!(
                "clip '{}': trim_start_sec must be finite and >= 0",
                self.source
            )));
        }
        if !self.trim_end_sec.is_finite() || self.trim_end_sec <= self.trim_start_sec {
            return Err(FramewiseError::validation(format!(
                "clip '{}': trim_end_sec must be > trim_start_sec",
                self.source
            )));
        }
        if !self.duration_sec.is_finite() || self.duration_sec <= 0.0 {
            return Err(FramewiseError::validation(format!(
                "clip '{}': duration_sec must be finite and > 0",
                self.source
            )));
        }
        if !self.playback_rate.is_finite() || self.playback_rate <= 0.0 {
            return Err(FramewiseError::validation(format!(
                "clip '{}': playback_rate must be finite and > 0",
                self.source
            )));
        }
        Ok(())
    }

    /// Displayed length in frames, `floor(duration_sec * fps)`.
    pub fn display_frames(&self, fps: Fps) -> u64 {
        fps.secs_to_frames_floor(self.duration_sec)
    }

    /// Source span consumed by the full display duration.
    pub fn played_source_secs(&self) -> f64 {
        self.duration_sec * self.playback_rate
    }

    /// Whether playback runs past `trim_end_sec` before the clip leaves the screen.
    pub fn overruns_trim(&self) -> bool {
        self.trim_start_sec + self.played_source_secs() > self.trim_end_sec
    }
}

/// Back-to-back windows for `clips`: clip `i` starts at the sum of all earlier display lengths.
///
/// The layout is gap-free and non-overlapping by construction.
pub fn layout_clips(clips: &[ClipDescriptor], fps: Fps) -> FramewiseResult<Vec<TimeWindow>> {
    let mut windows = Vec::with_capacity(clips.len());
    let mut cursor = 0u64;
    for clip in clips {
        clip.validate()?;
        let len = clip.display_frames(fps);
        if len == 0 {
            return Err(FramewiseError::validation(format!(
                "clip '{}': duration_sec rounds down to 0 frames",
                clip.source
            )));
        }
        windows.push(TimeWindow::new(FrameIndex(cursor), len)?);
        cursor = cursor.checked_add(len).ok_or_else(|| {
            FramewiseError::validation("clip sequence length overflows frame index")
        })?;
    }
    Ok(windows)
}

/// A clip paired with its window in the enclosing scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledClip {
    /// Position in the sequence.
    pub index: usize,
    /// Window relative to the enclosing scene.
    pub window: TimeWindow,
    /// The clip.
    pub clip: ClipDescriptor,
}

impl ScheduledClip {
    /// Source playback position at `local` frames into the clip.
    pub fn source_time_secs(&self, local: FrameIndex, fps: Fps) -> f64 {
        self.clip.trim_start_sec + fps.frames_to_secs(local.0) * self.clip.playback_rate
    }
}

/// Clips laid out back-to-back inside one scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipSchedule {
    clips: Vec<ScheduledClip>,
}

impl ClipSchedule {
    /// Validate and lay out `clips`.
    pub fn new(clips: &[ClipDescriptor], fps: Fps) -> FramewiseResult<Self> {
        let windows = layout_clips(clips, fps)?;
        let clips = clips
            .iter()
            .zip(windows)
            .enumerate()
            .map(|(index, (clip, window))| ScheduledClip {
                index,
                window,
                clip: clip.clone(),
            })
            .collect();
        Ok(Self { clips })
    }

    /// Scheduled clips in order.
    pub fn clips(&self) -> &[ScheduledClip] {
        &self.clips
    }

    /// Sum of all display lengths.
    pub fn total_frames(&self) -> u64 {
        self.clips.last().map_or(0, |c| c.window.end().0)
    }

    /// The single clip active at scene-local `frame`, with its local frame.
    pub fn active(&self, frame: FrameIndex) -> Option<(&ScheduledClip, FrameIndex)> {
        // Windows are sorted and disjoint.
        let i = self.clips.partition_point(|c| c.window.end().0 <= frame.0);
        let clip = self.clips.get(i)?;
        clip.window.local_frame(frame).map(|local| (clip, local))
    }

    /// Window starts of every clip after the first.
    pub fn boundaries(&self) -> Vec<FrameIndex> {
        self.clips.iter().skip(1).map(|c| c.window.start).collect()
    }
}

/// Cue windows anchored at clip boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryCues {
    /// One window per boundary between consecutive clips.
    pub transitions: Vec<TimeWindow>,
    /// Window anchored at the start of the last clip.
    pub final_clip: Option<TimeWindow>,
}

/// Fixed-length cue windows at each clip boundary (the first clip's start excluded), plus a
/// distinct window at the last clip's start when `final_len` is given.
pub fn boundary_cues(
    windows: &[TimeWindow],
    cue_len: u64,
    final_len: Option<u64>,
) -> FramewiseResult<BoundaryCues> {
    let transitions = windows
        .iter()
        .skip(1)
        .map(|w| TimeWindow::new(w.start, cue_len))
        .collect::<FramewiseResult<Vec<_>>>()?;
    let final_clip = match (windows.last(), final_len) {
        (Some(last), Some(len)) => Some(TimeWindow::new(last.start, len)?),
        _ => None,
    };
    Ok(BoundaryCues {
        transitions,
        final_clip,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/schedule.rs"]
mod tests;
