//! Scoped trampoline for the planar generator's refinement callback.
//!
//! The external library takes a bare C function pointer to decide
//! whether a candidate triangle needs refinement, with no user-data
//! argument to thread a closure through. The bridge is a thread-local
//! slot holding the active callback for exactly the duration of one
//! [`with_refinement`] scope; the slot is cleared on exit even when
//! the scope unwinds, and a second binding attempt on the same thread
//! fails instead of silently replacing the first.

use std::cell::Cell;
use std::os::raw::c_int;
use std::panic::{self, AssertUnwindSafe};
use std::process;

use tessel_core::ArrayError;

/// C signature of the triangle-suitability test: origin, destination
/// and apex vertices (two coordinates each) plus the triangle's area.
/// Returns nonzero when the triangle should be refined.
pub type SuitabilityFn = extern "C" fn(*const f64, *const f64, *const f64, f64) -> c_int;

type DynCallback = dyn FnMut([f64; 2], [f64; 2], [f64; 2], f64) -> bool;

thread_local! {
    static ACTIVE: Cell<Option<*mut DynCallback>> = const { Cell::new(None) };
}

/// Bind `callback` as this thread's refinement test and run `body`
/// with the C trampoline that dispatches to it.
///
/// The binding lasts exactly as long as `body` runs. Fails
/// `InvalidOperation` when a binding is already active on this thread;
/// sequential scopes are fine.
pub fn with_refinement<R>(
    callback: &mut (dyn FnMut([f64; 2], [f64; 2], [f64; 2], f64) -> bool + '_),
    body: impl FnOnce(SuitabilityFn) -> R,
) -> Result<R, ArrayError> {
    struct Reset;
    impl Drop for Reset {
        fn drop(&mut self) {
            ACTIVE.with(|slot| slot.set(None));
        }
    }

    // The lifetime is erased going into the slot; the Reset guard
    // clears it before `callback`'s borrow ends.
    let erased: *mut DynCallback = unsafe {
        std::mem::transmute(
            callback as *mut (dyn FnMut([f64; 2], [f64; 2], [f64; 2], f64) -> bool + '_),
        )
    };
    let installed = ACTIVE.with(|slot| {
        if slot.get().is_some() {
            return false;
        }
        slot.set(Some(erased));
        true
    });
    if !installed {
        return Err(ArrayError::invalid(
            "a refinement callback is already bound on this thread",
        ));
    }
    let _reset = Reset;
    Ok(body(trampoline))
}

extern "C" fn trampoline(org: *const f64, dest: *const f64, apex: *const f64, area: f64) -> c_int {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let cb = match ACTIVE.with(|slot| slot.get()) {
            Some(ptr) => unsafe { &mut *ptr },
            // Called outside any binding scope: refine nothing.
            None => return false,
        };
        let vertex = |p: *const f64| unsafe { [p.read(), p.add(1).read()] };
        cb(vertex(org), vertex(dest), vertex(apex), area)
    }));
    match outcome {
        Ok(true) => 1,
        Ok(false) => 0,
        // Unwinding across the foreign frame is not recoverable.
        Err(_) => process::abort(),
    }
}
