//! Error type shared by the configuration entry points.
//!
//! Configuration is the only place this crate can fail: point mapping and
//! resampling are total once a transform has been built. Out-of-sector
//! samples are not errors; they resolve to the configured default value.

/// Errors raised while configuring transforms or reading acquisition metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanConvertError {
    /// Malformed angle table, radius bounds or axis assignment.
    InvalidGeometry(String),
    /// A setter was called before the state it depends on was supplied.
    PrecedenceViolation(String),
    /// The operation has no meaning for a non-linear point mapping.
    UnsupportedOperation(&'static str),
    /// The operation is part of the capability surface but not provided.
    NotImplemented(&'static str),
    /// Acquisition metadata is missing or cannot be parsed.
    Metadata(String),
}

impl std::fmt::Display for ScanConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGeometry(msg) => write!(f, "invalid geometry: {}", msg),
            Self::PrecedenceViolation(msg) => write!(f, "precedence violation: {}", msg),
            Self::UnsupportedOperation(op) => {
                write!(f, "{} is not applicable to a deformable transform", op)
            }
            Self::NotImplemented(op) => write!(f, "{} has not been implemented", op),
            Self::Metadata(msg) => write!(f, "acquisition metadata: {}", msg),
        }
    }
}

impl std::error::Error for ScanConvertError {}

pub type Result<T> = std::result::Result<T, ScanConvertError>;
