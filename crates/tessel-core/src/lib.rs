//! Core types and traits for the Tessel mesh-interop workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the error kinds shared by every array operation, the element
//! capability traits that split scalar from structured buffer access,
//! and the ordered receiver registry underlying size-change cascades.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod error;
pub mod notify;

pub use element::{Element, Scalar};
pub use error::ArrayError;
pub use notify::Registry;
