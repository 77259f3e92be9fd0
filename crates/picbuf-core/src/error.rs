//! Error types for picture buffer operations.
//!
//! Every fallible operation in the picbuf crates returns [`Result`], so that
//! callers can pick a fallback strategy (for instance an in-place resize that
//! fails with [`Error::NotExclusive`] is retried as a copy) instead of
//! treating the failure as fatal.
//!
//! # Categories
//!
//! The flat taxonomy is exposed through [`Error::kind`]:
//!
//! - [`ErrorKind::InvalidParameter`] - region or resize arithmetic out of bounds
//! - [`ErrorKind::Alignment`] - violates the macropixel or subsampling grid
//! - [`ErrorKind::UnknownPlane`] - the named chroma is absent
//! - [`ErrorKind::NotExclusive`] - mutation attempted on a shared buffer
//! - [`ErrorKind::Unsupported`] - the manager cannot perform the request
//! - [`ErrorKind::FormatMismatch`] - two buffers disagree on their plane layout
//! - [`ErrorKind::AllocationFailure`] - the manager refused to allocate
//! - [`ErrorKind::MappingFailure`] - a plane could not be mapped or unmapped
//!
//! # Usage
//!
//! ```rust
//! use picbuf_core::{Error, ErrorKind};
//!
//! let err = Error::alignment("hoffset", 3, 2);
//! assert_eq!(err.kind(), ErrorKind::Alignment);
//! assert!(err.to_string().contains("multiple of 2"));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Flat classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Region or resize arithmetic out of bounds.
    InvalidParameter,
    /// Offset or size not on the macropixel/subsampling grid.
    Alignment,
    /// Named chroma does not exist in the buffer.
    UnknownPlane,
    /// Buffer is shared where exclusivity is required.
    NotExclusive,
    /// Manager cannot perform the requested operation.
    Unsupported,
    /// Plane sets or subsampling of two buffers disagree.
    FormatMismatch,
    /// Allocation was refused.
    AllocationFailure,
    /// Mapping or unmapping a plane failed.
    MappingFailure,
}

/// Errors that can occur during picture buffer operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Region or resize parameters fall outside the picture.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A horizontal or vertical quantity is off the alignment grid.
    #[error("{what} {value} is not a multiple of {grid}")]
    Alignment {
        /// Which quantity was checked (`hoffset`, `vsize`, `hskip`...)
        what: &'static str,
        /// Offending value, after sentinel resolution
        value: i64,
        /// Required multiple
        grid: usize,
    },

    /// The named plane does not exist.
    #[error("unknown plane: {chroma}")]
    UnknownPlane {
        /// Chroma name that was looked up
        chroma: String,
    },

    /// The buffer is shared and cannot be mutated.
    #[error("buffer is shared by {refs} handles")]
    NotExclusive {
        /// Reference count observed at the time of the check
        refs: usize,
    },

    /// The buffer manager cannot perform the operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Source and destination buffers disagree on their layout.
    #[error("format mismatch: {0}")]
    FormatMismatch(String),

    /// The buffer manager refused to allocate a picture.
    #[error("failed to allocate {hsize}x{vsize} picture: {reason}")]
    AllocationFailed {
        /// Requested width in pixels
        hsize: usize,
        /// Requested height in lines
        vsize: usize,
        /// Failure reason
        reason: String,
    },

    /// A plane could not be mapped or unmapped.
    #[error("failed to map plane {chroma}")]
    MappingFailed {
        /// Plane being mapped
        chroma: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates an [`Error::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates an [`Error::Alignment`] error.
    #[inline]
    pub fn alignment(what: &'static str, value: i64, grid: usize) -> Self {
        Self::Alignment { what, value, grid }
    }

    /// Creates an [`Error::UnknownPlane`] error.
    #[inline]
    pub fn unknown_plane(chroma: impl Into<String>) -> Self {
        Self::UnknownPlane {
            chroma: chroma.into(),
        }
    }

    /// Creates an [`Error::Unsupported`] error.
    #[inline]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Creates an [`Error::FormatMismatch`] error.
    #[inline]
    pub fn format_mismatch(msg: impl Into<String>) -> Self {
        Self::FormatMismatch(msg.into())
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(hsize: usize, vsize: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            hsize,
            vsize,
            reason: reason.into(),
        }
    }

    /// Wraps `source` into an [`Error::MappingFailed`] for `chroma`.
    #[inline]
    pub fn mapping_failed(chroma: impl Into<String>, source: Error) -> Self {
        Self::MappingFailed {
            chroma: chroma.into(),
            source: Box::new(source),
        }
    }

    /// Returns the flat error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::Alignment { .. } => ErrorKind::Alignment,
            Self::UnknownPlane { .. } => ErrorKind::UnknownPlane,
            Self::NotExclusive { .. } => ErrorKind::NotExclusive,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::FormatMismatch(_) => ErrorKind::FormatMismatch,
            Self::AllocationFailed { .. } => ErrorKind::AllocationFailure,
            Self::MappingFailed { .. } => ErrorKind::MappingFailure,
        }
    }

    /// Returns `true` if the request itself was malformed.
    ///
    /// Such requests fail the same way whichever resize path is taken.
    #[inline]
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidParameter | ErrorKind::Alignment
        )
    }
}
