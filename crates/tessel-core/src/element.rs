//! Element capability traits.
//!
//! A foreign buffer holds either plain numeric values (coordinates,
//! markers, connectivity indices) or structured records whose fields
//! the external library manages itself (e.g. a facet with interior
//! pointer lists). The two cases get different access surfaces,
//! selected at compile time by the trait bound on the array:
//!
//! - [`Scalar`] elements support bounds-checked get/set by value and
//!   the full unit/row addressing scheme.
//! - Plain [`Element`] types (structured records) are limited to
//!   read-only reference access; the wrapper never copies or rewrites
//!   them.

/// A type that can live in a foreign buffer.
///
/// `Default` supplies the zero value used when a buffer is freshly
/// allocated; foreign libraries expect zero-initialized input arrays.
pub trait Element: Clone + Default + 'static {}

/// An element with plain-old-data semantics, supporting get/set by
/// value.
pub trait Scalar: Element + Copy + PartialEq + std::fmt::Debug {}

impl Element for f64 {}
impl Scalar for f64 {}

impl Element for f32 {}
impl Scalar for f32 {}

impl Element for i32 {}
impl Scalar for i32 {}

impl Element for i64 {}
impl Scalar for i64 {}
