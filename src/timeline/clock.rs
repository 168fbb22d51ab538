use crate::foundation::{
    core::{FrameIndex, Fps, TimeWindow},
    error::{FramewiseError, FramewiseResult},
};

/// Read-only time context handed down the composition tree.
///
/// The root clock carries the global frame; every nested clock obtained through
/// [`FrameClock::descend`] carries the local frame of its enclosing window, so depth-N nesting
/// has subtracted N accumulated window offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameClock {
    frame: FrameIndex,
    fps: Fps,
    duration: u64,
}

impl FrameClock {
    /// Root clock for global `frame` of a composition lasting `duration` frames.
    pub fn root(frame: FrameIndex, fps: Fps, duration: u64) -> FramewiseResult<Self> {
        if frame.0 >= duration {
            return Err(FramewiseError::evaluation(format!(
                "frame {} is out of bounds for a composition of {duration} frames",
                frame.0
            )));
        }
        Ok(Self {
            frame,
            fps,
            duration,
        })
    }

    /// Current frame in this clock's coordinate space.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    /// Composition frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Length of the window this clock lives in (total frames for the root clock).
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Current frame in seconds.
    pub fn secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frame.0)
    }

    /// Signed frames elapsed since local frame `start` (negative before it).
    pub fn since(&self, start: u64) -> i64 {
        self.frame.0 as i64 - start as i64
    }

    /// Clock local to `window`, or `None` when the window is inactive at this frame.
    pub fn descend(&self, window: TimeWindow) -> Option<Self> {
        let local = window.local_frame(self.frame)?;
        Some(Self {
            frame: local,
            fps: self.fps,
            duration: window.len,
        })
    }
}

/// `totalFrames = floor(total_secs * fps)`, rejecting empty compositions.
pub fn total_frames(total_secs: f64, fps: Fps) -> FramewiseResult<u64> {
    if !total_secs.is_finite() || total_secs <= 0.0 {
        return Err(FramewiseError::validation(
            "composition duration must be finite and > 0 seconds",
        ));
    }
    let frames = fps.secs_to_frames_floor(total_secs);
    if frames == 0 {
        return Err(FramewiseError::validation(
            "composition duration rounds down to 0 frames",
        ));
    }
    Ok(frames)
}
