//! The array group: an arena of foreign arrays plus their dependency
//! graph.
//!
//! One [`ArrayGroup`] is wired over one external record. Arrays are
//! addressed by stable slot handles ([`ArrayId`] / [`RawId`]) rather
//! than back-pointers, so a slave's reference to its master cannot
//! outlive the master and unregistration on removal is automatic.
//!
//! # Roles
//!
//! The construction API admits exactly three role/ownership states:
//!
//! - [`insert_owned`](ArrayGroup::insert_owned) — standalone master
//!   that allocates its buffer and owns its count slot;
//! - [`insert_borrowed`](ArrayGroup::insert_borrowed) — standalone
//!   observer over foreign-populated slots;
//! - [`insert_slave`](ArrayGroup::insert_slave) — count mirrors a
//!   master via the cascade; buffer lifecycle is cascade-driven.
//!
//! An "owned slave" is not constructible: a slave's buffer is never
//! resized directly, so direct ownership has nothing to attach to.
//!
//! Master edges are fixed at construction and may only point at
//! already-inserted arrays, so the dependency graph is acyclic by
//! construction. Cascades run synchronously over registry snapshots
//! and never execute user code, which rules out re-entrant registry
//! mutation mid-broadcast.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::os::raw::c_int;

use indexmap::IndexMap;
use tessel_core::{ArrayError, Element, Registry, Scalar};

use crate::array::{AnyArray, ForeignArray};
use crate::slots::RawSlots;

/// Untyped handle to an array slot within a group.
///
/// Master/slave edges are stored as `RawId`s since they routinely
/// cross element types (integer markers slaved to float coordinates).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawId(u32);

impl RawId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed handle to an array slot within a group.
///
/// Carries the element type so accessors need no turbofish; converts
/// to [`RawId`] wherever only the graph position matters.
pub struct ArrayId<T> {
    raw: RawId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArrayId<T> {
    fn new(raw: RawId) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// The untyped handle.
    pub fn raw(self) -> RawId {
        self.raw
    }
}

// Manual impls: `derive` would put bounds on `T`, which is only a
// marker here.
impl<T> Clone for ArrayId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayId<T> {}

impl<T> PartialEq for ArrayId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for ArrayId<T> {}

impl<T> fmt::Debug for ArrayId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayId({})", self.raw)
    }
}

impl<T> From<ArrayId<T>> for RawId {
    fn from(id: ArrayId<T>) -> Self {
        id.raw
    }
}

fn to_c_int(count: usize) -> Result<c_int, ArrayError> {
    c_int::try_from(count)
        .map_err(|_| ArrayError::invalid("element count exceeds the record's count range"))
}

struct Entry {
    name: String,
    master: Option<RawId>,
    slaves: Registry<RawId>,
    array: Box<dyn AnyArray>,
}

/// An arena of foreign arrays sharing one external record, with the
/// master/slave dependency graph and the synchronous size-change
/// cascade.
///
/// Handles are slot indices; removed slots are never reused, so a
/// handle is valid for the life of the group or until its array is
/// explicitly removed.
#[derive(Default)]
pub struct ArrayGroup {
    entries: Vec<Option<Entry>>,
    names: IndexMap<String, RawId>,
}

impl ArrayGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            names: IndexMap::new(),
        }
    }

    /// Number of live arrays in the group.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the group has no live arrays.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Handle of the array registered under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<RawId> {
        self.names.get(name).copied()
    }

    /// Name the array was registered under.
    pub fn name(&self, id: impl Into<RawId>) -> Result<&str, ArrayError> {
        Ok(&self.entry(id.into())?.name)
    }

    fn entry(&self, id: RawId) -> Result<&Entry, ArrayError> {
        self.entries
            .get(id.index())
            .and_then(|slot| slot.as_ref())
            .ok_or_else(|| ArrayError::invalid(format!("no array at handle {id}")))
    }

    fn entry_mut(&mut self, id: RawId) -> Result<&mut Entry, ArrayError> {
        self.entries
            .get_mut(id.index())
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| ArrayError::invalid(format!("no array at handle {id}")))
    }

    fn push(
        &mut self,
        name: &str,
        master: Option<RawId>,
        array: Box<dyn AnyArray>,
    ) -> Result<RawId, ArrayError> {
        if self.names.contains_key(name) {
            return Err(ArrayError::invalid(format!(
                "an array named '{name}' is already registered"
            )));
        }
        let id = RawId(u32::try_from(self.entries.len())
            .map_err(|_| ArrayError::invalid("array group slot index overflow"))?);
        self.entries.push(Some(Entry {
            name: name.to_owned(),
            master,
            slaves: Registry::new(),
            array,
        }));
        self.names.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Insert an owned standalone array.
    ///
    /// The pointer slot is immediately cleared — the caller guarantees
    /// it did not already own separate memory there — and the array is
    /// sized to zero through the normal resize path.
    pub fn insert_owned<T: Element>(
        &mut self,
        name: &str,
        slots: RawSlots<T>,
        unit: u32,
    ) -> Result<ArrayId<T>, ArrayError> {
        let mut array = ForeignArray::new(slots, unit, true);
        array.release();
        let id = self.push(name, None, Box::new(array))?;
        self.set_size(id, 0)?;
        Ok(ArrayId::new(id))
    }

    /// Insert a borrowed standalone array, wrapping the pre-existing
    /// pointer and count values as-is.
    pub fn insert_borrowed<T: Element>(
        &mut self,
        name: &str,
        slots: RawSlots<T>,
        unit: u32,
    ) -> Result<ArrayId<T>, ArrayError> {
        let array = ForeignArray::new(slots, unit, false);
        let id = self.push(name, None, Box::new(array))?;
        Ok(ArrayId::new(id))
    }

    /// Insert an array slaved to `master`.
    ///
    /// Registers with the master and immediately mirrors its current
    /// count; the buffer starts unmaterialized (or keeps whatever the
    /// record already holds) until [`setup`](ArrayGroup::setup) or a
    /// cascade materializes it.
    pub fn insert_slave<T: Element>(
        &mut self,
        name: &str,
        slots: RawSlots<T>,
        unit: u32,
        master: impl Into<RawId>,
    ) -> Result<ArrayId<T>, ArrayError> {
        let master = master.into();
        let count = self.entry(master)?.array.size();
        let mut array = ForeignArray::new(slots, unit, false);
        array.write_count(to_c_int(count)?);
        let id = self.push(name, Some(master), Box::new(array))?;
        // Infallible at this point: push validated nothing else holds
        // the master slot.
        if let Ok(m) = self.entry_mut(master) {
            m.slaves.register(id);
        }
        Ok(ArrayId::new(id))
    }

    /// Current logical element count of an array.
    pub fn size(&self, id: impl Into<RawId>) -> Result<usize, ArrayError> {
        Ok(self.entry(id.into())?.array.size())
    }

    /// Current row width of an array.
    pub fn unit(&self, id: impl Into<RawId>) -> Result<u32, ArrayError> {
        Ok(self.entry(id.into())?.array.unit())
    }

    /// Whether an array's buffer pointer is non-null.
    pub fn is_allocated(&self, id: impl Into<RawId>) -> Result<bool, ArrayError> {
        Ok(self.entry(id.into())?.array.is_allocated())
    }

    /// The master this array is slaved to, if any.
    pub fn master_of(&self, id: impl Into<RawId>) -> Result<Option<RawId>, ArrayError> {
        Ok(self.entry(id.into())?.master)
    }

    /// Resize a standalone array and cascade the new count through its
    /// slaves, transitively, before returning.
    ///
    /// The old buffer is freed (if this wrapper allocated it), the
    /// count slot updated, and a fresh zero-initialized buffer of
    /// `count * unit` elements installed (null when that product is
    /// zero).
    ///
    /// Fails `InvalidOperation` on a slave: slave counts are driven
    /// only by their master's cascade.
    pub fn set_size(&mut self, id: impl Into<RawId>, count: usize) -> Result<(), ArrayError> {
        let id = id.into();
        if self.entry(id)?.master.is_some() {
            return Err(ArrayError::invalid("sizes of slave arrays cannot be changed"));
        }
        let n = to_c_int(count)?;
        let entry = self.entry_mut(id)?;
        entry.array.write_count(n);
        entry.array.realloc(count)?;
        self.cascade(id, count)
    }

    /// Materialize a slave's buffer at its currently-mirrored count.
    /// No-op when already allocated.
    ///
    /// Fails `InvalidOperation` on a non-slave.
    pub fn setup(&mut self, id: impl Into<RawId>) -> Result<(), ArrayError> {
        let id = id.into();
        if self.entry(id)?.master.is_none() {
            return Err(ArrayError::invalid("cannot setup non-slave array"));
        }
        let entry = self.entry_mut(id)?;
        if !entry.array.is_allocated() {
            let count = entry.array.size();
            entry.array.realloc(count)?;
        }
        Ok(())
    }

    /// Deliver a size-change notification from `master` to `id`.
    ///
    /// This is the cascade's delivery step: the slave mirrors the new
    /// count into its slot, reallocates if it was materialized (and
    /// then cascades onward to its own slaves), or merely remembers
    /// the count if its buffer is still null — deferred materialization
    /// to be realized by [`setup`](ArrayGroup::setup).
    ///
    /// Fails `InvalidOperation` if `id` is not slaved to `master`.
    pub fn notify_size_change(
        &mut self,
        id: impl Into<RawId>,
        master: impl Into<RawId>,
        count: usize,
    ) -> Result<(), ArrayError> {
        let id = id.into();
        let master = master.into();
        match self.entry(id)?.master {
            None => {
                return Err(ArrayError::invalid(
                    "non-slave array should not get size notifications",
                ))
            }
            Some(m) if m != master => {
                return Err(ArrayError::invalid(
                    "size notification from an array that is not this array's master",
                ))
            }
            Some(_) => {}
        }
        let n = to_c_int(count)?;
        let entry = self.entry_mut(id)?;
        entry.array.write_count(n);
        if entry.array.is_allocated() {
            entry.array.realloc(count)?;
            self.cascade(id, count)?;
        }
        Ok(())
    }

    fn cascade(&mut self, id: RawId, count: usize) -> Result<(), ArrayError> {
        let snapshot = self.entry(id)?.slaves.snapshot();
        for slave in snapshot {
            self.notify_size_change(slave, id, count)?;
        }
        Ok(())
    }

    /// Change an array's row width, reallocating at the current count.
    /// Contents are not preserved. Legal on slaves — unit is per-array
    /// and leaves the mirrored count untouched, so no cascade runs.
    pub fn set_unit(&mut self, id: impl Into<RawId>, unit: u32) -> Result<(), ArrayError> {
        self.entry_mut(id.into())?.array.set_unit(unit)
    }

    /// Set an array's row width without touching the buffer, for when
    /// the true width becomes known only after an external computation
    /// populated the record directly.
    pub fn fix_unit(&mut self, id: impl Into<RawId>, unit: u32) -> Result<(), ArrayError> {
        self.entry_mut(id.into())?.array.fix_unit(unit);
        Ok(())
    }

    /// Null an array's buffer pointer, freeing the buffer if this
    /// wrapper allocated it. Count slot untouched.
    pub fn deallocate(&mut self, id: impl Into<RawId>) -> Result<(), ArrayError> {
        self.entry_mut(id.into())?.array.release();
        Ok(())
    }

    /// Reconcile one array after a foreign call (see
    /// [`ForeignArray::resync`]).
    pub fn resync(&mut self, id: impl Into<RawId>) -> Result<(), ArrayError> {
        self.entry_mut(id.into())?.array.resync();
        Ok(())
    }

    /// Reconcile every array in the group after a foreign call.
    pub fn resync_all(&mut self) {
        for slot in self.entries.iter_mut() {
            if let Some(entry) = slot {
                entry.array.resync();
            }
        }
    }

    /// Typed read access to an array.
    pub fn array<T: Element>(&self, id: ArrayId<T>) -> Result<&ForeignArray<T>, ArrayError> {
        self.entry(id.raw())?
            .array
            .as_any()
            .downcast_ref()
            .ok_or_else(|| ArrayError::invalid("array handle element type mismatch"))
    }

    /// Typed write access to an array (element get/set; size and unit
    /// changes go through the group so cascades stay coherent).
    pub fn array_mut<T: Element>(
        &mut self,
        id: ArrayId<T>,
    ) -> Result<&mut ForeignArray<T>, ArrayError> {
        self.entry_mut(id.raw())?
            .array
            .as_any_mut()
            .downcast_mut()
            .ok_or_else(|| ArrayError::invalid("array handle element type mismatch"))
    }

    /// Deep value copy from an array in another group.
    ///
    /// The destination is resized to the source's count (through the
    /// normal cascade when standalone), matched in unit, and the
    /// contents copied — or cleared when the source is unallocated.
    /// All-or-nothing: the copy is staged before any destination
    /// mutation.
    ///
    /// # Panics
    ///
    /// Copying into a slave whose master's count differs from the
    /// source's count is an invariant violation and asserts.
    pub fn copy_array<T: Scalar>(
        &mut self,
        dst: ArrayId<T>,
        src_group: &ArrayGroup,
        src: ArrayId<T>,
    ) -> Result<(), ArrayError> {
        let src_arr = src_group.array(src)?;
        let count = src_arr.size();
        let unit = src_arr.unit();

        let dst_raw = dst.raw();
        let dst_master = self.entry(dst_raw)?.master;
        if let Some(m) = dst_master {
            let master_count = self.entry(m)?.array.size();
            assert!(
                master_count == count,
                "deep copy into a slave whose master count ({master_count}) \
                 differs from the source count ({count})"
            );
        }

        let staged = if src_arr.is_allocated() {
            let slice = src_arr.as_slice()?;
            let mut copy = Vec::new();
            copy.try_reserve_exact(slice.len())
                .map_err(|_| ArrayError::AllocationFailure {
                    requested_bytes: slice.len().saturating_mul(mem::size_of::<T>()),
                })?;
            copy.extend_from_slice(slice);
            (!copy.is_empty()).then_some(copy)
        } else {
            None
        };

        let n = to_c_int(count)?;
        let standalone = dst_master.is_none();
        let arr = self.array_mut(dst)?;
        if standalone {
            arr.write_count(n);
        }
        arr.install(staged, unit);
        if standalone {
            self.cascade(dst_raw, count)?;
        }
        Ok(())
    }

    /// Remove an array from the group: unregisters it from its master
    /// (so later cascades no longer touch it), frees its retained
    /// buffer, and — for an owned standalone array — resets its count
    /// slot to zero.
    ///
    /// Fails `InvalidOperation` while the array still has registered
    /// slaves; their master edges would dangle.
    pub fn remove(&mut self, id: impl Into<RawId>) -> Result<(), ArrayError> {
        let id = id.into();
        if !self.entry(id)?.slaves.is_empty() {
            return Err(ArrayError::invalid(
                "cannot remove an array that still has slaves",
            ));
        }
        let mut entry = match self.entries[id.index()].take() {
            Some(entry) => entry,
            None => return Err(ArrayError::invalid(format!("no array at handle {id}"))),
        };
        if let Some(master) = entry.master {
            if let Ok(m) = self.entry_mut(master) {
                m.slaves.unregister(id);
            }
        }
        entry.array.teardown();
        self.names.shift_remove(&entry.name);
        Ok(())
    }
}

impl Drop for ArrayGroup {
    fn drop(&mut self) {
        // Reverse insertion order: slaves tear down before the masters
        // they mirror.
        for slot in self.entries.iter_mut().rev() {
            if let Some(entry) = slot {
                entry.array.teardown();
            }
        }
    }
}

impl fmt::Debug for ArrayGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayGroup")
            .field("arrays", &self.names.keys().collect::<Vec<_>>())
            .finish()
    }
}
