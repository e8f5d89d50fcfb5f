//! External pointer and count slots.
//!
//! A foreign array does not store its buffer pointer or element count
//! itself: both live in fields of the external library's record
//! (`pointlist` / `numberofpoints` style pairs). [`RawSlots`] captures
//! the addresses of one such pair so the array can observe and update
//! them in place. Several arrays may share one count slot; the group
//! layer guarantees only the authoritative party writes it.

use std::os::raw::c_int;
use std::ptr::NonNull;

/// The externally-stored pointer slot and count slot backing one
/// foreign array.
///
/// # Safety contract
///
/// Constructed via [`RawSlots::new`], which requires that both slots
/// stay valid (and the record they belong to stays pinned) for as long
/// as any array built over them is alive — including the group's drop,
/// which nulls pointer slots and resets owned count slots. The mesh
/// wrappers uphold this by boxing the record and dropping the group
/// first.
#[derive(Debug)]
pub struct RawSlots<T> {
    ptr_slot: NonNull<*mut T>,
    count_slot: NonNull<c_int>,
}

impl<T> RawSlots<T> {
    /// Capture the address of a pointer field and a count field of an
    /// external record.
    ///
    /// # Safety
    ///
    /// Both `ptr_slot` and `count_slot` must be non-null, properly
    /// aligned, and valid for reads and writes for the whole lifetime
    /// of the array group built over them. No other code may write the
    /// slots while a group method is executing (the model is fully
    /// single-threaded; the external library writes them only during a
    /// foreign call, after which [`resync`] reconciles).
    ///
    /// [`resync`]: crate::group::ArrayGroup::resync
    pub unsafe fn new(ptr_slot: *mut *mut T, count_slot: *mut c_int) -> Self {
        debug_assert!(!ptr_slot.is_null() && !count_slot.is_null());
        Self {
            ptr_slot: NonNull::new_unchecked(ptr_slot),
            count_slot: NonNull::new_unchecked(count_slot),
        }
    }

    /// Current value of the pointer slot.
    pub(crate) fn read_ptr(&self) -> *mut T {
        // Valid per the construction contract.
        unsafe { self.ptr_slot.as_ptr().read() }
    }

    /// Overwrite the pointer slot. Never frees what it replaces.
    pub(crate) fn write_ptr(&mut self, p: *mut T) {
        unsafe { self.ptr_slot.as_ptr().write(p) }
    }

    /// Current logical element count.
    ///
    /// A negative foreign value is clamped to zero; some generators
    /// leave uninitialized counts behind on unused record fields.
    pub(crate) fn read_count(&self) -> usize {
        let raw = unsafe { self.count_slot.as_ptr().read() };
        raw.max(0) as usize
    }

    /// Overwrite the count slot.
    pub(crate) fn write_count(&mut self, n: c_int) {
        unsafe { self.count_slot.as_ptr().write(n) }
    }
}
