// ── Entry-point dispatch ──────────────────────────────────────────────────────
//
// Every bound function is called through a pointer-width integer signature:
// each argument occupies one register/stack slot and the raw return register
// comes back as `usize`.  The wrapper masks the return to its declared width.

#![allow(unsafe_code)]

/// Largest parameter count the dispatcher supports (`CreateProcessW`).
pub const MAX_ARITY: usize = 10;

macro_rules! dispatch {
    ($entry:expr, $args:expr; $([$($a:ident),*]),* $(,)?) => {
        match $args {
            $(
                [$($a),*] => {
                    let f: unsafe extern "system" fn($(dispatch!(@slot $a)),*) -> usize =
                        std::mem::transmute::<usize, _>($entry);
                    Some(f($(*$a),*))
                }
            )*
            _ => None,
        }
    };
    (@slot $a:ident) => { usize };
}

/// Call the `extern "system"` function at `entry` with `args`.
///
/// Returns `None` when `args` exceeds [`MAX_ARITY`]; the loader rejects such
/// descriptors, so this never happens for a bound function.
///
/// # Safety
///
/// `entry` must be the non-zero address of an `extern "system"` function that
/// takes exactly `args.len()` integer or pointer parameters, none wider than a
/// pointer.  Any pointers passed in `args` must satisfy that function's
/// contract for the duration of the call.
pub(crate) unsafe fn call_entry(entry: usize, args: &[usize]) -> Option<usize> {
    // SAFETY: the caller guarantees `entry` has the pointer-slot signature of
    // the arm selected by `args.len()`.
    unsafe {
        dispatch!(entry, args;
            [],
            [a0],
            [a0, a1],
            [a0, a1, a2],
            [a0, a1, a2, a3],
            [a0, a1, a2, a3, a4],
            [a0, a1, a2, a3, a4, a5],
            [a0, a1, a2, a3, a4, a5, a6],
            [a0, a1, a2, a3, a4, a5, a6, a7],
            [a0, a1, a2, a3, a4, a5, a6, a7, a8],
            [a0, a1, a2, a3, a4, a5, a6, a7, a8, a9],
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
