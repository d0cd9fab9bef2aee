/// Convenience result type used across quakelapse.
pub type QuakeResult<T> = Result<T, QuakeError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum QuakeError {
    /// Invalid configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A catalogue row could not be turned into an event.
    #[error("parse error on line {line}: {msg}")]
    Parse {
        /// 1-based line number in the catalogue text (the header is line 1).
        line: u64,
        /// What was wrong with the row.
        msg: String,
    },

    /// The upstream event source failed to deliver a range.
    #[error("source error: {0}")]
    Source(String),

    /// A frame could not be drawn or persisted.
    #[error("render error: {0}")]
    Render(String),

    /// The video stage failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuakeError {
    /// Build a [`QuakeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QuakeError::Parse`] value.
    pub fn parse(line: u64, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            msg: msg.into(),
        }
    }

    /// Build a [`QuakeError::Source`] value.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Build a [`QuakeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`QuakeError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
