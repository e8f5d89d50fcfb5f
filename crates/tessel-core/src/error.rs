//! Error types for foreign-array operations.
//!
//! Every fallible operation in the workspace reports one of the four
//! kinds below. All failures are synchronous and fail-fast: bounds and
//! ownership checks happen before any mutation, so a returned error
//! means the array's observable state is unchanged.

use std::error::Error;
use std::fmt;

/// Errors from foreign-array operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// A primary or sub index is beyond the valid extent.
    OutOfRange {
        /// The offending index. Signed so that a host-side negative
        /// index that stays negative after end-wrapping is reported
        /// as given.
        index: isize,
        /// The extent it was checked against (element count, row count,
        /// or unit, depending on the access).
        extent: usize,
    },
    /// A read or write was attempted on a null buffer.
    UnallocatedAccess,
    /// The operation is not legal for this array's role — resizing a
    /// slave, setting up a non-slave, delivering a size change to a
    /// non-slave, or binding a second refinement callback while one is
    /// already active.
    InvalidOperation {
        /// Human-readable description of the violated contract.
        reason: String,
    },
    /// A buffer allocation could not be satisfied. Fatal for the
    /// current operation; there is no memory-pressure recovery in this
    /// numerical context.
    AllocationFailure {
        /// Number of bytes that were requested.
        requested_bytes: usize,
    },
}

impl ArrayError {
    /// Shorthand for [`ArrayError::InvalidOperation`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, extent } => {
                write!(f, "index {index} out of bounds (extent {extent})")
            }
            Self::UnallocatedAccess => write!(f, "array unallocated"),
            Self::InvalidOperation { reason } => write!(f, "{reason}"),
            Self::AllocationFailure { requested_bytes } => {
                write!(f, "buffer allocation of {requested_bytes} bytes failed")
            }
        }
    }
}

impl Error for ArrayError {}
