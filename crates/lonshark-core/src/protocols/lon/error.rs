use thiserror::Error;

/// Errors returned by LON header decoding.
///
/// Offsets in `TooShort` are relative to the first header byte.
///
/// # Examples
/// ```
/// use lonshark_core::protocols::lon::LonError;
///
/// let err = LonError::UnknownFormat { field: "pdu format", value: 7 };
/// assert_eq!(err.to_string(), "unknown pdu format value: 7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LonError {
    #[error("header too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("unknown {field} value: {value}")]
    UnknownFormat { field: &'static str, value: u8 },
}
