use crate::{
    foundation::core::{FrameIndex, TimeWindow},
    timeline::clock::FrameClock,
};

/// One window that is active at the queried frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveWindow {
    /// Position of the window in its timeline.
    pub index: usize,
    /// The window itself.
    pub window: TimeWindow,
    /// `frame - window.start`, always in `[0, window.len)`.
    pub local: FrameIndex,
}

/// Every window of `windows` active at `frame`, in declaration order.
///
/// Inactive windows are absent from the result; callers must not evaluate their subtrees.
pub fn active_windows(frame: FrameIndex, windows: &[TimeWindow]) -> Vec<ActiveWindow> {
    windows
        .iter()
        .enumerate()
        .filter_map(|(index, window)| {
            window.local_frame(frame).map(|local| ActiveWindow {
                index,
                window: *window,
                local,
            })
        })
        .collect()
}

/// `true` when each window starts exactly where the previous one ends.
pub fn is_contiguous(windows: &[TimeWindow]) -> bool {
    windows.windows(2).all(|w| w[0].end() == w[1].start)
}

/// Ordered sibling windows, each carrying an opaque payload.
///
/// Siblings may overlap (sound cues layered over visuals).
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline<T> {
    entries: Vec<(TimeWindow, T)>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Timeline<T> {
    /// Empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a window with its payload.
    pub fn push(&mut self, window: TimeWindow, payload: T) {
        self.entries.push((window, payload));
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the timeline has no windows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Windows in declaration order.
    pub fn windows(&self) -> Vec<TimeWindow> {
        self.entries.iter().map(|(w, _)| *w).collect()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&TimeWindow, &T)> {
        self.entries.iter().map(|(w, p)| (w, p))
    }

    /// Payloads whose windows are active at `frame`, with their activation state.
    pub fn active(&self, frame: FrameIndex) -> impl Iterator<Item = (ActiveWindow, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(move |(index, (window, payload))| {
                let local = window.local_frame(frame)?;
                Some((
                    ActiveWindow {
                        index,
                        window: *window,
                        local,
                    },
                    payload,
                ))
            })
    }

    /// Payloads active under `clock`, each paired with the clock local to its window.
    pub fn descend<'a>(
        &'a self,
        clock: &'a FrameClock,
    ) -> impl Iterator<Item = (FrameClock, &'a T)> + 'a {
        self.entries
            .iter()
            .filter_map(move |(window, payload)| Some((clock.descend(*window)?, payload)))
    }
}

impl<T> FromIterator<(TimeWindow, T)> for Timeline<T> {
    fn from_iter<I: IntoIterator<Item = (TimeWindow, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sequencer.rs"]
mod tests;
