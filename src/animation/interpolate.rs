use crate::{
    animation::ease::Ease,
    foundation::error::{FramewiseError, FramewiseResult},
};

/// Behavior on one side of a keyframe table, outside its declared input range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Hold the boundary value.
    Clamp,
    /// Continue the linear slope of the nearest segment.
    #[default]
    Extend,
}

/// Per-call interpolation contract: extrapolation on each side plus in-segment easing.
///
/// Every animated property states its own policy; the default extends on both sides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InterpolateOpts {
    /// Policy for frames before the first input.
    #[serde(default)]
    pub left: Extrapolate,
    /// Policy for frames after the last input.
    #[serde(default)]
    pub right: Extrapolate,
    /// Easing applied to the fraction inside a segment.
    #[serde(default)]
    pub ease: Ease,
}

impl InterpolateOpts {
    /// Extend on both sides.
    pub const EXTEND: Self = Self {
        left: Extrapolate::Extend,
        right: Extrapolate::Extend,
        ease: Ease::Linear,
    };

    /// Clamp on both sides.
    pub const CLAMP: Self = Self {
        left: Extrapolate::Clamp,
        right: Extrapolate::Clamp,
        ease: Ease::Linear,
    };

    /// Extend on the left, clamp on the right.
    pub const CLAMP_RIGHT: Self = Self {
        left: Extrapolate::Extend,
        right: Extrapolate::Clamp,
        ease: Ease::Linear,
    };

    /// Same policy with a different easing curve.
    pub fn with_ease(self, ease: Ease) -> Self {
        Self { ease, ..self }
    }
}

/// Validated piecewise-linear keyframe table.
///
/// Inputs are strictly increasing frame positions; outputs are the values at those positions.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct KeyframeTable {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl KeyframeTable {
    /// Build a table, rejecting empty, mismatched, non-finite or non-increasing inputs.
    pub fn new(inputs: Vec<f64>, outputs: Vec<f64>) -> FramewiseResult<Self> {
        validate_table(&inputs, &outputs)?;
        Ok(Self { inputs, outputs })
    }

    /// Build a table from `(input, output)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> FramewiseResult<Self> {
        let (inputs, outputs) = pairs.iter().copied().unzip();
        Self::new(inputs, outputs)
    }

    /// Declared input positions.
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    /// Declared output values.
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Evaluate the table at `frame`.
    pub fn sample(&self, frame: f64, opts: InterpolateOpts) -> f64 {
        sample_unchecked(frame, &self.inputs, &self.outputs, opts)
    }
}

impl<'de> serde::Deserialize<'de> for KeyframeTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Pairs(Vec<(f64, f64)>),
            Obj { inputs: Vec<f64>, outputs: Vec<f64> },
        }

        let table = match Repr::deserialize(deserializer)? {
            Repr::Pairs(pairs) => Self::from_pairs(&pairs),
            Repr::Obj { inputs, outputs } => Self::new(inputs, outputs),
        };
        table.map_err(serde::de::Error::custom)
    }
}

/// Evaluate a literal keyframe table at `frame`.
///
/// Inside the declared range this is `v0 + (v1 - v0) * ease((frame - f0) / (f1 - f0))` over the
/// bracketing pair; outside it, `opts.left` / `opts.right` decide between holding the boundary
/// value and continuing the boundary segment's linear slope. A single keyframe is constant.
pub fn interpolate(
    frame: f64,
    inputs: &[f64],
    outputs: &[f64],
    opts: InterpolateOpts,
) -> FramewiseResult<f64> {
    validate_table(inputs, outputs)?;
    Ok(sample_unchecked(frame, inputs, outputs, opts))
}

fn validate_table(inputs: &[f64], outputs: &[f64]) -> FramewiseResult<()> {
    if inputs.is_empty() {
        return Err(FramewiseError::animation(
            "keyframe table must have at least one key",
        ));
    }
    if inputs.len() != outputs.len() {
        return Err(FramewiseError::animation(format!(
            "keyframe table has {} inputs but {} outputs",
            inputs.len(),
            outputs.len()
        )));
    }
    if !inputs.iter().chain(outputs).all(|v| v.is_finite()) {
        return Err(FramewiseError::animation(
            "keyframe table values must be finite",
        ));
    }
    if !inputs.windows(2).all(|w| w[0] < w[1]) {
        return Err(FramewiseError::animation(format!(
            "keyframe inputs must be strictly increasing, got {inputs:?}"
        )));
    }
    Ok(())
}

fn sample_unchecked(frame: f64, inputs: &[f64], outputs: &[f64], opts: InterpolateOpts) -> f64 {
    let n = inputs.len();
    if n == 1 {
        return outputs[0];
    }

    let segment_at = |i: usize, t: f64| outputs[i] + (outputs[i + 1] - outputs[i]) * t;
    let fraction = |i: usize| (frame - inputs[i]) / (inputs[i + 1] - inputs[i]);

    if frame < inputs[0] {
        return match opts.left {
            Extrapolate::Clamp => outputs[0],
            Extrapolate::Extend => segment_at(0, fraction(0)),
        };
    }
    if frame > inputs[n - 1] {
        return match opts.right {
            Extrapolate::Clamp => outputs[n - 1],
            Extrapolate::Extend => segment_at(n - 2, fraction(n - 2)),
        };
    }

    let idx = inputs.partition_point(|&x| x <= frame);
    let seg = idx.saturating_sub(1).min(n - 2);
    segment_at(seg, opts.ease.apply(fraction(seg)))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
