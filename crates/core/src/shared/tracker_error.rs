use thiserror::Error;

/// Errors surfaced to the caller of a detect operation.
///
/// None of these are retried internally; the context stays usable after
/// every variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Decoding would read past the declared result view.
    /// The previous frame's faces are kept.
    #[error(
        "result buffer overrun: {face_count} faces need {required_bytes} bytes, \
         only {capacity_bytes} available"
    )]
    BufferOverrun {
        face_count: i32,
        required_bytes: usize,
        capacity_bytes: usize,
    },

    #[error("detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("image plane holds {actual} bytes, expected {expected} (width * height)")]
    InvalidFrame { expected: usize, actual: usize },

    #[error("a detection is already in flight on this tracker")]
    Busy,
}
