use std::collections::HashSet;

use rayon::prelude::*;

use crate::{
    composition::build::Composition,
    eval::{
        evaluator::{Evaluator, FrameOutput},
        fingerprint::fingerprint_frame,
    },
    foundation::{
        core::{FrameIndex, FrameRange},
        error::{FramewiseError, FramewiseResult},
    },
};

/// How a frame range is evaluated.
#[derive(Clone, Debug)]
pub struct EvalThreading {
    /// Evaluate chunks on a rayon pool.
    pub parallel: bool,
    /// Frames per scheduling chunk.
    pub chunk_size: usize,
    /// Pool size; rayon's default when `None`.
    pub threads: Option<usize>,
}

impl Default for EvalThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Counters for a batch evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Frames evaluated.
    pub frames_total: u64,
    /// Frames with a fingerprint not seen earlier in the range.
    pub frames_unique: u64,
}

/// Evaluate every frame of `range`, in frame order.
pub fn eval_frames(
    comp: &Composition,
    range: FrameRange,
    threading: &EvalThreading,
) -> FramewiseResult<Vec<FrameOutput>> {
    eval_frames_with_stats(comp, range, threading).map(|(frames, _)| frames)
}

/// [`eval_frames`], also counting distinct outputs.
///
/// Output is identical whether or not `threading.parallel` is set.
pub fn eval_frames_with_stats(
    comp: &Composition,
    range: FrameRange,
    threading: &EvalThreading,
) -> FramewiseResult<(Vec<FrameOutput>, EvalStats)> {
    if range.is_empty() {
        return Err(FramewiseError::validation("eval range must be non-empty"));
    }
    if range.end.0 > comp.duration() {
        return Err(FramewiseError::evaluation(format!(
            "eval range ends at {} past the composition end {}",
            range.end.0,
            comp.duration()
        )));
    }

    let mut out = Vec::with_capacity(range.len_frames().min(4096) as usize);
    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };

    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
        tracing::trace!(start = chunk_start, end = chunk_end, "eval chunk");
        let mut frames = match &pool {
            Some(pool) => eval_chunk_parallel(comp, chunk, pool)?,
            None => eval_chunk_sequential(comp, chunk)?,
        };
        out.append(&mut frames);
        chunk_start = chunk_end;
    }

    let mut seen = HashSet::with_capacity(out.len());
    let frames_unique = out
        .iter()
        .filter(|frame| seen.insert(fingerprint_frame(frame)))
        .count() as u64;
    let stats = EvalStats {
        frames_total: out.len() as u64,
        frames_unique,
    };
    tracing::debug!(
        frames_total = stats.frames_total,
        frames_unique = stats.frames_unique,
        "eval range done"
    );
    Ok((out, stats))
}

fn eval_chunk_sequential(comp: &Composition, range: FrameRange) -> FramewiseResult<Vec<FrameOutput>> {
    (range.start.0..range.end.0)
        .map(|f| Evaluator::eval_frame(comp, FrameIndex(f)))
        .collect()
}

fn eval_chunk_parallel(
    comp: &Composition,
    range: FrameRange,
    pool: &rayon::ThreadPool,
) -> FramewiseResult<Vec<FrameOutput>> {
    let frames: Vec<u64> = (range.start.0..range.end.0).collect();
    pool.install(|| {
        frames
            .par_iter()
            .map(|f| Evaluator::eval_frame(comp, FrameIndex(*f)))
            .collect::<FramewiseResult<Vec<_>>>()
    })
}

fn build_thread_pool(threads: Option<usize>) -> FramewiseResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FramewiseError::validation(
            "eval threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FramewiseError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/pipeline.rs"]
mod tests;
