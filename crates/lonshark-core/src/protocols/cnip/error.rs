use thiserror::Error;

/// Errors returned by envelope reading.
///
/// # Examples
/// ```
/// use lonshark_core::protocols::cnip::CnipError;
///
/// let err = CnipError::TooShort { needed: 20, actual: 3 };
/// assert!(err.to_string().contains("envelope too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CnipError {
    #[error("envelope too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}
