use std::fmt;

/// Classification attached to every unresolved fetch result.
///
/// The polling layer inspects the code to decide whether to alert or wait for
/// the next cycle. This crate never retries on its own.
///
/// | Code | Raised when |
/// |------|-------------|
/// | `Unknown` | A constituent broke the fetch contract or the cause is unclassified |
/// | `UpstreamGeneral` | Transport or HTTP-level failure talking to a source |
/// | `DecodeFailure` | Body could not be decoded, or a record could not be converted |
/// | `InvalidScope` | The requested chains do not include the fetcher's chain |
/// | `ValidationFailure` | A merged market map failed structural validation |
/// | `Cancelled` | The fetch context was cancelled or its deadline passed |
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorCode {
    Unknown,
    UpstreamGeneral,
    DecodeFailure,
    InvalidScope,
    ValidationFailure,
    Cancelled,
}

impl ErrorCode {
    /// Stable numeric value, suitable for metrics labels and logs.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Unknown => 1,
            Self::UpstreamGeneral => 2,
            Self::DecodeFailure => 3,
            Self::InvalidScope => 4,
            Self::ValidationFailure => 5,
            Self::Cancelled => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::UpstreamGeneral => "upstream_general",
            Self::DecodeFailure => "decode_failure",
            Self::InvalidScope => "invalid_scope",
            Self::ValidationFailure => "validation_failure",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
