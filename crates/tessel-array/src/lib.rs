//! Size-synchronized foreign arrays over external mesh records.
//!
//! External mesh generators exchange data through flat C records: a
//! pointer field plus a count field per logical array, with several
//! arrays sharing one count (points, point attributes and point
//! markers all track "number of points"). This crate keeps such a
//! family of buffers coherent: one [`ArrayGroup`] owns every array
//! wired over one record, master/slave edges keep dependent counts in
//! lockstep, and resizing a master cascades synchronously through the
//! whole dependency graph before returning.
//!
//! # Architecture
//!
//! ```text
//! ArrayGroup (arena, one per record)
//! ├── Entry[] (slot-indexed; ArrayId<T> = typed slot handle)
//! │   ├── master edge (Option<RawId>) + slave Registry<RawId>
//! │   └── ForeignArray<T>
//! │       ├── RawSlots<T> (external pointer slot + count slot)
//! │       └── retained Vec<T> (buffers this wrapper allocated)
//! ├── host::HostArray<T> (binding-independent index contract)
//! └── index (negative-index wrapping)
//! ```
//!
//! # Ownership discipline
//!
//! Every buffer the wrapper allocates is a `Vec<T>` retained next to
//! the array; the record's pointer slot holds its data pointer.
//! Buffers populated by the external library are observed and never
//! freed here — releasing them belongs to the library's own
//! deallocator. One allocator on each side, no crossings.
//!
//! This crate is one of two in the workspace that may contain `unsafe`
//! code (along with `tessel-mesh`); it is confined to reading and
//! writing the external record slots in [`slots`] and to forming
//! slices over foreign buffers in [`array`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod array;
pub mod group;
pub mod host;
pub mod index;
pub mod slots;

pub use array::ForeignArray;
pub use group::{ArrayGroup, ArrayId, RawId};
pub use host::HostArray;
pub use slots::RawSlots;

pub use tessel_core::{ArrayError, Element, Scalar};
