//! The typed foreign array: a sized view over an externally-slotted
//! buffer.
//!
//! A [`ForeignArray`] owns no position in the dependency graph itself;
//! master/slave wiring and cascades live in
//! [`ArrayGroup`](crate::group::ArrayGroup). What lives here is the
//! per-array state — the external slots, the row width ("unit"), the
//! retained allocation — and the bounds-checked element accessors.

use std::any::Any;
use std::mem;
use std::os::raw::c_int;

use tessel_core::{ArrayError, Element, Scalar};

use crate::slots::RawSlots;

/// Allocate a zero-initialized buffer, reporting failure instead of
/// aborting. Allocation happens before any observable mutation.
fn alloc_buffer<T: Element>(len: usize) -> Result<Vec<T>, ArrayError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ArrayError::AllocationFailure {
            requested_bytes: len.saturating_mul(mem::size_of::<T>()),
        })?;
    buf.resize(len, T::default());
    Ok(buf)
}

/// A sized, typed view over a buffer whose pointer and element count
/// are stored in external memory.
///
/// The logical shape is `count` rows of `unit` primitive elements;
/// `unit == 1` is a plain one-dimensional array and `unit == 0` (an
/// attribute array with no attributes yet) always has a null buffer.
///
/// Buffers allocated by this wrapper are retained as a `Vec<T>`
/// alongside the array and freed when it is torn down or reallocated.
/// A buffer the external library wrote into the pointer slot is only
/// observed; [`ForeignArray::resync`] detects the overwrite and drops
/// the stale retained allocation.
pub struct ForeignArray<T: Element> {
    slots: RawSlots<T>,
    unit: u32,
    /// Backing storage for the buffer currently in the pointer slot,
    /// if this wrapper allocated it.
    buf: Option<Vec<T>>,
    /// Whether teardown resets the count slot (owned standalone
    /// arrays are the authoritative writer of their count).
    owns_count_slot: bool,
}

impl<T: Element> ForeignArray<T> {
    pub(crate) fn new(slots: RawSlots<T>, unit: u32, owns_count_slot: bool) -> Self {
        Self {
            slots,
            unit,
            buf: None,
            owns_count_slot,
        }
    }

    /// Current logical element count, read from the external count
    /// slot.
    pub fn size(&self) -> usize {
        self.slots.read_count()
    }

    /// Number of primitive elements per logical row.
    pub fn unit(&self) -> u32 {
        self.unit
    }

    /// Whether the buffer pointer is currently non-null.
    pub fn is_allocated(&self) -> bool {
        !self.slots.read_ptr().is_null()
    }

    /// Total number of primitive elements: `size() * unit()`.
    pub fn extent(&self) -> usize {
        self.size().saturating_mul(self.unit as usize)
    }

    /// The buffer as a flat slice.
    ///
    /// Fails `UnallocatedAccess` when the pointer slot is null.
    pub fn as_slice(&self) -> Result<&[T], ArrayError> {
        let ptr = self.slots.read_ptr();
        if ptr.is_null() {
            return Err(ArrayError::UnallocatedAccess);
        }
        // Extent is what the size-sync machinery maintains: either we
        // allocated exactly count*unit, or the external library
        // populated pointer and count together.
        Ok(unsafe { std::slice::from_raw_parts(ptr, self.extent()) })
    }

    fn as_mut_slice(&mut self) -> Result<&mut [T], ArrayError> {
        let ptr = self.slots.read_ptr();
        if ptr.is_null() {
            return Err(ArrayError::UnallocatedAccess);
        }
        Ok(unsafe { std::slice::from_raw_parts_mut(ptr, self.extent()) })
    }

    fn check_flat(&self, index: usize) -> Result<(), ArrayError> {
        let extent = self.extent();
        if index >= extent {
            return Err(ArrayError::OutOfRange {
                index: index as isize,
                extent,
            });
        }
        Ok(())
    }

    fn sub_to_flat(&self, row: usize, col: usize) -> Result<usize, ArrayError> {
        let count = self.size();
        if row >= count {
            return Err(ArrayError::OutOfRange {
                index: row as isize,
                extent: count,
            });
        }
        let unit = self.unit as usize;
        // Checked independently: col == unit must fail even when the
        // flat offset would land inside a later row.
        if col >= unit {
            return Err(ArrayError::OutOfRange {
                index: col as isize,
                extent: unit,
            });
        }
        Ok(row * unit + col)
    }

    /// Read-only reference to the element at a flat index.
    ///
    /// This is the only element access available for structured
    /// (non-[`Scalar`]) element types; the external library manages
    /// their interiors.
    pub fn get_ref(&self, index: usize) -> Result<&T, ArrayError> {
        self.check_flat(index)?;
        Ok(&self.as_slice()?[index])
    }

    pub(crate) fn write_count(&mut self, n: c_int) {
        self.slots.write_count(n);
    }

    /// Drop any retained buffer and point the slot at a fresh
    /// zero-initialized allocation of `count * unit` elements (null
    /// when that product is zero). Contents are not preserved.
    pub(crate) fn realloc(&mut self, count: usize) -> Result<(), ArrayError> {
        let len = count
            .checked_mul(self.unit as usize)
            .ok_or(ArrayError::AllocationFailure {
                requested_bytes: usize::MAX,
            })?;
        if len == 0 {
            self.buf = None;
            self.slots.write_ptr(std::ptr::null_mut());
            return Ok(());
        }
        let mut fresh = alloc_buffer::<T>(len)?;
        self.slots.write_ptr(fresh.as_mut_ptr());
        self.buf = Some(fresh);
        Ok(())
    }

    /// Install a prepared buffer (deep-copy path). The count slot is
    /// managed by the caller.
    pub(crate) fn install(&mut self, buf: Option<Vec<T>>, unit: u32) {
        self.unit = unit;
        match buf {
            Some(mut v) => {
                self.slots.write_ptr(v.as_mut_ptr());
                self.buf = Some(v);
            }
            None => {
                self.buf = None;
                self.slots.write_ptr(std::ptr::null_mut());
            }
        }
    }

    /// Null the pointer slot, freeing the buffer if this wrapper
    /// allocated it. Count slot untouched.
    pub(crate) fn release(&mut self) {
        self.buf = None;
        self.slots.write_ptr(std::ptr::null_mut());
    }

    /// Reconcile after a foreign call: if the external library
    /// replaced the pointer slot, the retained allocation is stale —
    /// free it and observe the foreign buffer from now on.
    pub(crate) fn resync(&mut self) {
        if let Some(v) = &self.buf {
            if self.slots.read_ptr() != v.as_ptr().cast_mut() {
                self.buf = None;
            }
        }
    }

    /// Change the row width and reallocate at the current count.
    /// Existing contents are not preserved.
    pub(crate) fn set_unit(&mut self, unit: u32) -> Result<(), ArrayError> {
        if unit == self.unit {
            return Ok(());
        }
        self.unit = unit;
        self.realloc(self.size())
    }

    /// Change the row width without touching the buffer. Used when the
    /// true width becomes known only after an external computation
    /// populated the buffer directly.
    pub(crate) fn fix_unit(&mut self, unit: u32) {
        self.unit = unit;
    }

    /// Group-drop cleanup: free the retained buffer (nulling the
    /// pointer slot so the record never dangles into freed memory)
    /// and, for the authoritative owner of a count slot, reset it.
    pub(crate) fn teardown(&mut self) {
        if self.buf.take().is_some() {
            self.slots.write_ptr(std::ptr::null_mut());
        }
        if self.owns_count_slot {
            self.slots.write_count(0);
        }
    }
}

impl<T: Scalar> ForeignArray<T> {
    /// Element at a flat index.
    pub fn get(&self, index: usize) -> Result<T, ArrayError> {
        self.check_flat(index)?;
        Ok(self.as_slice()?[index])
    }

    /// Element at `(row, sub_index)`; equivalent to
    /// `get(row * unit + sub_index)` with both coordinates checked
    /// against their own extents.
    pub fn get_sub(&self, row: usize, sub_index: usize) -> Result<T, ArrayError> {
        let flat = self.sub_to_flat(row, sub_index)?;
        Ok(self.as_slice()?[flat])
    }

    /// Write the element at a flat index.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), ArrayError> {
        self.check_flat(index)?;
        self.as_mut_slice()?[index] = value;
        Ok(())
    }

    /// Write the element at `(row, sub_index)`.
    pub fn set_sub(&mut self, row: usize, sub_index: usize, value: T) -> Result<(), ArrayError> {
        let flat = self.sub_to_flat(row, sub_index)?;
        self.as_mut_slice()?[flat] = value;
        Ok(())
    }
}

/// Type-erased surface the group uses to drive cascades over
/// heterogeneous arrays (point coordinates are `f64`, markers are
/// `i32`, facets are structured records).
pub(crate) trait AnyArray: Any {
    fn size(&self) -> usize;
    fn unit(&self) -> u32;
    fn is_allocated(&self) -> bool;
    fn write_count(&mut self, n: c_int);
    fn realloc(&mut self, count: usize) -> Result<(), ArrayError>;
    fn release(&mut self);
    fn resync(&mut self);
    fn set_unit(&mut self, unit: u32) -> Result<(), ArrayError>;
    fn fix_unit(&mut self, unit: u32);
    fn teardown(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Element> AnyArray for ForeignArray<T> {
    fn size(&self) -> usize {
        ForeignArray::size(self)
    }

    fn unit(&self) -> u32 {
        ForeignArray::unit(self)
    }

    fn is_allocated(&self) -> bool {
        ForeignArray::is_allocated(self)
    }

    fn write_count(&mut self, n: c_int) {
        ForeignArray::write_count(self, n);
    }

    fn realloc(&mut self, count: usize) -> Result<(), ArrayError> {
        ForeignArray::realloc(self, count)
    }

    fn release(&mut self) {
        ForeignArray::release(self);
    }

    fn resync(&mut self) {
        ForeignArray::resync(self);
    }

    fn set_unit(&mut self, unit: u32) -> Result<(), ArrayError> {
        ForeignArray::set_unit(self, unit)
    }

    fn fix_unit(&mut self, unit: u32) {
        ForeignArray::fix_unit(self, unit);
    }

    fn teardown(&mut self) {
        ForeignArray::teardown(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
