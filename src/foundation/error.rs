/// Convenience result type used across framewise.
pub type FramewiseResult<T> = Result<T, FramewiseError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Configuration problems are always reported before any frame is evaluated; a frame query
/// outside a window's range is never an error (it yields an absent value instead).
#[derive(thiserror::Error, Debug)]
pub enum FramewiseError {
    /// Invalid composition description or timing configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid keyframe tables or spring parameters.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while evaluating a frame of a built composition.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when parsing or serializing composition descriptions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramewiseError {
    /// Build a [`FramewiseError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FramewiseError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`FramewiseError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`FramewiseError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error belongs to the configuration class (rejected at build time).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Animation(_) | Self::Serde(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
