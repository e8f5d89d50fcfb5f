//! Tessel: size-synchronized foreign arrays for mesh-generator
//! interop.
//!
//! Mesh generators exchange data through flat C records where one
//! count field is shared by a whole family of buffer pointers. Tessel
//! keeps those records coherent from Rust: each buffer becomes a
//! typed [`array::ForeignArray`] inside an [`array::ArrayGroup`],
//! resizing a master array cascades the new count through every array
//! slaved to it, and the record stays bit-compatible with the foreign
//! entry points throughout.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Tessel sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use tessel::prelude::*;
//!
//! // A planar mesh: a unit right triangle as input geometry.
//! let mut mesh = PlanarMesh::new()?;
//! let points = mesh.points();
//! mesh.group_mut().set_size(points, 3)?;
//! {
//!     let coords = mesh.group_mut().array_mut(points)?;
//!     coords.set_sub(1, 0, 1.0)?;
//!     coords.set_sub(2, 1, 1.0)?;
//! }
//!
//! // The marker array shares the point count but defers its buffer.
//! let markers = mesh.point_markers();
//! assert_eq!(mesh.group().size(markers)?, 3);
//! assert!(!mesh.group().is_allocated(markers)?);
//! mesh.group_mut().setup(markers)?;
//! assert!(mesh.group().is_allocated(markers)?);
//! # Ok::<(), ArrayError>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessel-core` | Error kinds, element traits, the notification registry |
//! | [`array`] | `tessel-array` | `ForeignArray`, `ArrayGroup`, host index surface |
//! | [`mesh`] | `tessel-mesh` | Planar/volume exchange records and the refinement trampoline |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Error kinds, element capability traits, and the notification
/// registry (`tessel-core`).
pub use tessel_core as types;

/// Foreign arrays, the array group, and the host index surface
/// (`tessel-array`).
///
/// Most users only need [`array::ArrayGroup`] and the typed
/// [`array::ArrayId`] handles — both are also in the [`prelude`].
pub use tessel_array as array;

/// Mesh exchange records wired over array groups (`tessel-mesh`).
///
/// [`mesh::PlanarMesh`] and [`mesh::VolumeMesh`] own the C-layout
/// records; [`mesh::refine::with_refinement`] bridges a closure into
/// the planar generator's refinement-callback slot.
pub use tessel_mesh as mesh;

/// Common imports for typical Tessel usage.
///
/// ```rust
/// use tessel::prelude::*;
/// ```
pub mod prelude {
    pub use tessel_array::{ArrayGroup, ArrayId, ForeignArray, HostArray, RawId, RawSlots};
    pub use tessel_core::{ArrayError, Element, Scalar};
    pub use tessel_mesh::{with_refinement, PlanarMesh, SuitabilityFn, VolumeMesh};
}
