//! Binding-technology-independent host surface for one array.
//!
//! Host-language bindings expose, per array, a pure index/bounds
//! contract: length, unit, allocated flag, flat and `(row, sub)`
//! get/set, whole-row access, resize, setup, deallocate. [`HostArray`]
//! implements that contract over a group handle so binding glue (out
//! of scope here) reduces to mechanical forwarding. Indices are
//! signed and wrap from the end per scripting convention; the four
//! error kinds stay distinguishable through this surface.

use smallvec::SmallVec;
use tessel_core::{ArrayError, Scalar};

use crate::array::ForeignArray;
use crate::group::{ArrayGroup, ArrayId};
use crate::index;

/// Exclusive host-side view of one scalar array within a group.
pub struct HostArray<'g, T: Scalar> {
    group: &'g mut ArrayGroup,
    id: ArrayId<T>,
}

impl<'g, T: Scalar> HostArray<'g, T> {
    /// Bind a host view to an array. Fails if the handle is stale.
    pub fn new(group: &'g mut ArrayGroup, id: ArrayId<T>) -> Result<Self, ArrayError> {
        group.array(id)?;
        Ok(Self { group, id })
    }

    fn arr(&self) -> Result<&ForeignArray<T>, ArrayError> {
        self.group.array(self.id)
    }

    fn arr_mut(&mut self) -> Result<&mut ForeignArray<T>, ArrayError> {
        self.group.array_mut(self.id)
    }

    /// Logical element count (rows, not primitive elements).
    pub fn len(&self) -> Result<usize, ArrayError> {
        Ok(self.arr()?.size())
    }

    /// Whether the array holds no rows.
    pub fn is_empty(&self) -> Result<bool, ArrayError> {
        Ok(self.arr()?.size() == 0)
    }

    /// Row width.
    pub fn unit(&self) -> Result<u32, ArrayError> {
        Ok(self.arr()?.unit())
    }

    /// Whether the buffer is materialized.
    pub fn allocated(&self) -> Result<bool, ArrayError> {
        Ok(self.arr()?.is_allocated())
    }

    /// Element at a flat signed index, wrapped against the total
    /// primitive-element extent.
    pub fn get(&self, index: isize) -> Result<T, ArrayError> {
        let arr = self.arr()?;
        let flat = index::resolve(index, arr.extent())?;
        arr.get(flat)
    }

    /// Write the element at a flat signed index.
    pub fn set(&mut self, index: isize, value: T) -> Result<(), ArrayError> {
        let flat = index::resolve(index, self.arr()?.extent())?;
        self.arr_mut()?.set(flat, value)
    }

    /// Element at a signed `(row, sub)` pair; the row wraps against
    /// the element count, the sub index against the unit.
    pub fn get_at(&self, row: isize, sub: isize) -> Result<T, ArrayError> {
        let arr = self.arr()?;
        let row = index::resolve(row, arr.size())?;
        let sub = index::resolve(sub, arr.unit() as usize)?;
        arr.get_sub(row, sub)
    }

    /// Write the element at a signed `(row, sub)` pair.
    pub fn set_at(&mut self, row: isize, sub: isize, value: T) -> Result<(), ArrayError> {
        let arr = self.arr()?;
        let row = index::resolve(row, arr.size())?;
        let sub = index::resolve(sub, arr.unit() as usize)?;
        self.arr_mut()?.set_sub(row, sub, value)
    }

    /// Copy of one row. Inline capacity covers mesh row widths
    /// (coordinates, connectivity, region descriptors).
    pub fn row(&self, row: isize) -> Result<SmallVec<[T; 8]>, ArrayError> {
        let arr = self.arr()?;
        let row = index::resolve(row, arr.size())?;
        let unit = arr.unit() as usize;
        let mut out = SmallVec::with_capacity(unit);
        for sub in 0..unit {
            out.push(arr.get_sub(row, sub)?);
        }
        Ok(out)
    }

    /// Overwrite one row. `values` must be exactly one unit long.
    pub fn set_row(&mut self, row: isize, values: &[T]) -> Result<(), ArrayError> {
        let arr = self.arr()?;
        let unit = arr.unit() as usize;
        if values.len() != unit {
            return Err(ArrayError::invalid(
                "row value must be a sequence of length unit",
            ));
        }
        let row = index::resolve(row, arr.size())?;
        let arr = self.arr_mut()?;
        for (sub, value) in values.iter().enumerate() {
            arr.set_sub(row, sub, *value)?;
        }
        Ok(())
    }

    /// Resize the array (standalone arrays only; cascades to slaves).
    pub fn resize(&mut self, count: usize) -> Result<(), ArrayError> {
        self.group.set_size(self.id, count)
    }

    /// Materialize a slave's deferred buffer.
    pub fn setup(&mut self) -> Result<(), ArrayError> {
        self.group.setup(self.id)
    }

    /// Null the buffer pointer, freeing wrapper-allocated memory.
    pub fn deallocate(&mut self) -> Result<(), ArrayError> {
        self.group.deallocate(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::RawSlots;
    use std::os::raw::c_int;
    use std::ptr;

    struct Record {
        list: *mut f64,
        count: c_int,
    }

    fn group_with_points(rec: &mut Record, unit: u32) -> (ArrayGroup, ArrayId<f64>) {
        let mut group = ArrayGroup::new();
        let slots = unsafe { RawSlots::new(&mut rec.list, &mut rec.count) };
        let id = group.insert_owned("points", slots, unit).unwrap();
        (group, id)
    }

    #[test]
    fn negative_flat_indices_wrap_against_the_extent() {
        let mut rec = Record {
            list: ptr::null_mut(),
            count: 0,
        };
        let (mut group, id) = group_with_points(&mut rec, 1);
        let mut host = HostArray::new(&mut group, id).unwrap();
        host.resize(4).unwrap();
        host.set(3, 7.5).unwrap();
        assert_eq!(host.get(-1).unwrap(), 7.5);
        assert_eq!(
            host.get(-5),
            Err(ArrayError::OutOfRange {
                index: -5,
                extent: 4
            })
        );
    }

    #[test]
    fn row_and_sub_indices_wrap_independently() {
        let mut rec = Record {
            list: ptr::null_mut(),
            count: 0,
        };
        let (mut group, id) = group_with_points(&mut rec, 2);
        let mut host = HostArray::new(&mut group, id).unwrap();
        host.resize(3).unwrap();
        host.set_at(-1, -1, 9.0).unwrap();
        assert_eq!(host.get_at(2, 1).unwrap(), 9.0);
        assert_eq!(host.row(-1).unwrap().as_slice(), &[0.0, 9.0]);
    }

    #[test]
    fn set_row_requires_exactly_unit_values() {
        let mut rec = Record {
            list: ptr::null_mut(),
            count: 0,
        };
        let (mut group, id) = group_with_points(&mut rec, 2);
        let mut host = HostArray::new(&mut group, id).unwrap();
        host.resize(2).unwrap();
        assert!(matches!(
            host.set_row(0, &[1.0]),
            Err(ArrayError::InvalidOperation { .. })
        ));
        host.set_row(0, &[1.0, 2.0]).unwrap();
        assert_eq!(host.get(1).unwrap(), 2.0);
    }

    #[test]
    fn error_kinds_stay_distinguishable_through_the_host_surface() {
        let mut rec = Record {
            list: ptr::null_mut(),
            count: 0,
        };
        let (mut group, id) = group_with_points(&mut rec, 1);
        {
            let mut host = HostArray::new(&mut group, id).unwrap();
            host.resize(2).unwrap();
            host.deallocate().unwrap();
            assert_eq!(host.get(0), Err(ArrayError::UnallocatedAccess));
            assert!(matches!(host.setup(), Err(ArrayError::InvalidOperation { .. })));
        }
    }
}
