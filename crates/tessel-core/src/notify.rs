//! Ordered receiver registry for size-change notification.
//!
//! A master array owns a [`Registry`] of its slaves and, on a size
//! change, informs each registered receiver synchronously in
//! registration order. The registry itself is policy-free: it stores
//! opaque receiver tokens (in practice, array handles) and leaves
//! delivery to the owner.
//!
//! # Broadcast discipline
//!
//! Delivery must iterate over a [`Registry::snapshot`], never over the
//! live vector. Mutating a registry from inside a broadcast triggered
//! on it is unsupported; snapshot iteration keeps an in-flight cascade
//! well-defined even if the owner's storage moves. Callers that drive
//! cascades through `&mut self` methods get this guarantee for free —
//! no user code runs during delivery.

use smallvec::SmallVec;

/// An ordered registry of notification receivers.
///
/// Duplicates are permitted: a receiver registered twice is notified
/// once per occurrence. [`Registry::unregister`] removes only the
/// first matching occurrence, mirroring registration nesting.
#[derive(Clone, Debug, Default)]
pub struct Registry<R> {
    receivers: Vec<R>,
}

impl<R: Copy + PartialEq> Registry<R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            receivers: Vec::new(),
        }
    }

    /// Append a receiver to the registry.
    pub fn register(&mut self, receiver: R) {
        self.receivers.push(receiver);
    }

    /// Remove the first occurrence of `receiver`.
    ///
    /// Removing a receiver that is not registered is a no-op.
    pub fn unregister(&mut self, receiver: R) {
        if let Some(pos) = self.receivers.iter().position(|r| *r == receiver) {
            self.receivers.remove(pos);
        }
    }

    /// A stable copy of the current receiver list, in registration
    /// order. Broadcasts iterate this, not the live registry.
    ///
    /// Inline capacity covers the widest fan-out in the mesh records
    /// (a point master carries at most a handful of slaves).
    pub fn snapshot(&self) -> SmallVec<[R; 8]> {
        self.receivers.iter().copied().collect()
    }

    /// Whether `receiver` has at least one registered occurrence.
    pub fn contains(&self, receiver: R) -> bool {
        self.receivers.contains(&receiver)
    }

    /// Number of registered occurrences (duplicates counted).
    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn snapshot_preserves_registration_order() {
        let mut reg = Registry::new();
        reg.register(3u32);
        reg.register(1);
        reg.register(2);
        assert_eq!(reg.snapshot().as_slice(), &[3, 1, 2]);
    }

    #[test]
    fn duplicates_are_kept_and_notified_per_occurrence() {
        let mut reg = Registry::new();
        reg.register(7u32);
        reg.register(7);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.snapshot().as_slice(), &[7, 7]);
    }

    #[test]
    fn unregister_removes_first_occurrence_only() {
        let mut reg = Registry::new();
        reg.register(1u32);
        reg.register(7);
        reg.register(7);
        reg.unregister(7);
        assert_eq!(reg.snapshot().as_slice(), &[1, 7]);
    }

    #[test]
    fn unregister_of_unknown_receiver_is_noop() {
        let mut reg = Registry::new();
        reg.register(1u32);
        reg.unregister(9);
        assert_eq!(reg.len(), 1);
    }

    proptest! {
        #[test]
        fn unregister_removes_exactly_the_first_occurrence(
            seq in proptest::collection::vec(0u32..5, 0..12),
            target in 0u32..5,
        ) {
            let mut reg = Registry::new();
            for r in &seq {
                reg.register(*r);
            }
            reg.unregister(target);

            let mut expected = seq.clone();
            if let Some(pos) = expected.iter().position(|r| *r == target) {
                expected.remove(pos);
            }
            prop_assert_eq!(reg.snapshot().to_vec(), expected);
        }
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let mut reg = Registry::new();
        reg.register(1u32);
        let snap = reg.snapshot();
        reg.register(2);
        reg.unregister(1);
        assert_eq!(snap.as_slice(), &[1]);
        assert_eq!(reg.snapshot().as_slice(), &[2]);
    }
}
