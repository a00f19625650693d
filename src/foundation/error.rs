/// Convenience result type used across memegen.
pub type MemeResult<T> = Result<T, MemeError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// Invalid caller-provided data (frame sizes, overlay fields, colours).
    #[error("validation error: {0}")]
    Validation(String),

    /// Image or font bytes that could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Failures while compositing or encoding a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Transport or non-success reply from the generative model service.
    #[error("service error: {0}")]
    Service(String),

    /// An action was invoked while it is disabled (busy, or preconditions unmet).
    #[error("action unavailable: {0}")]
    Unavailable(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    /// Build a [`MemeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MemeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MemeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MemeError::Service`] value.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Build a [`MemeError::Unavailable`] value.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Build a [`MemeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
