//! Stack growth for the recursive parts of the engine.
//!
//! Pattern compilation and matching recurse once per nesting level, and a
//! clause body may re-enter its own function through `Frame::call`. None of
//! these paths has a fixed depth, so each recursive step goes through
//! [`ensure_sufficient_stack`], which grows the stack with `stacker` when the
//! remaining space drops below the red zone. On wasm it is a plain call.

/// Grow when less than this much stack remains.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if it is nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
