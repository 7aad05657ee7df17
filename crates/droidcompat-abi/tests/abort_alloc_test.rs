//! `android_set_abort_message` must not touch the heap: the usual message is
//! "heap corruption detected", and a second malloc there can crash again.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use bionic_compat::abort_abi::{android_set_abort_message, droidcompat_abort_message};

struct CountingAlloc;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn allocations() -> usize {
    ALLOCATIONS.with(Cell::get)
}

// SAFETY: forwards to the system allocator; the counter is a const-initialized
// thread-local without a destructor, so it never allocates itself.
unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOCATIONS.with(|n| n.set(n.get() + 1));
        // SAFETY: same contract as the caller's.
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: ptr came from System.alloc with this layout.
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        ALLOCATIONS.with(|n| n.set(n.get() + 1));
        // SAFETY: same contract as the caller's.
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

#[test]
fn abort_hook_does_not_allocate() {
    let before = allocations();
    // SAFETY: valid C strings.
    unsafe {
        android_set_abort_message(c"heap corruption detected".as_ptr());
        android_set_abort_message(c"second report".as_ptr());
    }
    let after = allocations();
    assert_eq!(after - before, 0);

    // SAFETY: the accessor returns a stable pointer or null.
    let kept = unsafe { droidcompat_abort_message() };
    assert!(!kept.is_null());
    // SAFETY: kept points at the NUL-terminated retained copy.
    assert_eq!(unsafe { std::ffi::CStr::from_ptr(kept) }, c"heap corruption detected");
}
