//! Negative-index resolution for host-language bindings.
//!
//! Scripting hosts index from the end with negative values; the
//! binding surface maps `-1` to the last valid index and so on, and
//! still fails `OutOfRange` when the wrapped result falls outside the
//! extent.

use tessel_core::ArrayError;

/// Resolve a possibly-negative host index against an extent.
///
/// Negative indices wrap once from the end (`-1` ⇒ `extent - 1`).
/// The error reports the index as the host gave it.
pub fn resolve(index: isize, extent: usize) -> Result<usize, ArrayError> {
    let wrapped = if index < 0 {
        index + extent as isize
    } else {
        index
    };
    if wrapped < 0 || wrapped as usize >= extent {
        return Err(ArrayError::OutOfRange { index, extent });
    }
    Ok(wrapped as usize)
}
