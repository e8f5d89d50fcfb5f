//! Mesh-generator exchange surfaces built on size-synchronized
//! foreign arrays.
//!
//! A mesh generator exchanges data through a flat C record: one
//! pointer field per array, one count field shared by each family of
//! arrays. This crate wires those records into
//! [`ArrayGroup`](tessel_array::ArrayGroup)s — [`PlanarMesh`] over the
//! triangulation record, [`VolumeMesh`] over the tetrahedralization
//! record — so that sizes stay coherent on the Rust side while the
//! record remains bit-compatible with the foreign entry points.
//! [`refine::with_refinement`] bridges a closure into the planar
//! generator's C callback slot for the duration of one call.
//!
//! Linking the generators themselves is a downstream concern; this
//! crate owns the records and their coherence, not the FFI imports.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod planar;
pub mod record;
pub mod refine;
pub mod volume;

pub use planar::PlanarMesh;
pub use record::{RawFacet, RawPlanarMesh, RawPolygon, RawVolumeMesh};
pub use refine::{with_refinement, SuitabilityFn};
pub use volume::VolumeMesh;
