//! Rendering a printf-style message one directive at a time.
//!
//! C variadic arguments cannot be forwarded to the host's `vfprintf` from a
//! Rust variadic function. The format is parsed instead; for each directive
//! the caller pulls one argument of the type the directive names and the
//! host's `snprintf` renders just that directive. Output is therefore the
//! host's formatting, byte for byte.
//!
//! `%Ln`-family long-double conversions cannot be extracted portably: at the
//! first one, rendering stops and the rest of the format is copied verbatim.

use std::ffi::{c_char, c_int, c_long, c_longlong, c_uint, c_void};

use droidcompat_core::log::{MAX_MESSAGE_LEN, MessageBuf};
use droidcompat_core::stdio::{ArgClass, IntWidth, Precision, Segment, Width, parse_format};

/// One extracted argument, typed the way it travels through `...`.
#[derive(Debug, Clone, Copy)]
pub enum HostArg {
    None,
    Int(c_int),
    Uint(c_uint),
    Long(c_long),
    LongLong(c_longlong),
    Size(usize),
    PtrDiff(isize),
    IntMax(i64),
    Double(f64),
    Ptr(*const c_void),
}

/// Pull one argument of the given [`ArgClass`] from a C variadic list.
///
/// Expands to an `unsafe` `next_arg::<T>()` call, so the list's type is never
/// named. Must be used inside an `unsafe` block.
macro_rules! next_arg {
    ($args:expr, $class:expr) => {{
        use ::droidcompat_core::stdio::{ArgClass, IntWidth};
        use $crate::render::HostArg;
        match $class {
            ArgClass::Signed(IntWidth::Int) | ArgClass::Unsigned(IntWidth::Int) | ArgClass::Char => {
                HostArg::Int($args.next_arg::<::std::ffi::c_int>())
            }
            ArgClass::Signed(IntWidth::Long) | ArgClass::Unsigned(IntWidth::Long) => {
                HostArg::Long($args.next_arg::<::std::ffi::c_long>())
            }
            ArgClass::Signed(IntWidth::LongLong) | ArgClass::Unsigned(IntWidth::LongLong) => {
                HostArg::LongLong($args.next_arg::<::std::ffi::c_longlong>())
            }
            ArgClass::Signed(IntWidth::Size) | ArgClass::Unsigned(IntWidth::Size) => {
                HostArg::Size($args.next_arg::<usize>())
            }
            ArgClass::Signed(IntWidth::PtrDiff) | ArgClass::Unsigned(IntWidth::PtrDiff) => {
                HostArg::PtrDiff($args.next_arg::<isize>())
            }
            ArgClass::Signed(IntWidth::IntMax) | ArgClass::Unsigned(IntWidth::IntMax) => {
                HostArg::IntMax($args.next_arg::<i64>())
            }
            ArgClass::WideChar => HostArg::Uint($args.next_arg::<::std::ffi::c_uint>()),
            ArgClass::Double => HostArg::Double($args.next_arg::<f64>()),
            ArgClass::Str | ArgClass::WideStr | ArgClass::Pointer | ArgClass::WriteBack => {
                HostArg::Ptr($args.next_arg::<*const ::std::ffi::c_void>())
            }
            ArgClass::None | ArgClass::LongDouble => HostArg::None,
        }
    }};
}

pub(crate) use next_arg;

/// Call the host `snprintf` with a single-directive `spec` and one argument.
///
/// # Safety
///
/// `spec` must be NUL-terminated and its conversion must match `arg`;
/// `buf` must be writable for `len` bytes.
unsafe fn host_snprintf(buf: *mut c_char, len: usize, spec: *const c_char, arg: HostArg) -> c_int {
    // SAFETY: forwarded from the caller.
    unsafe {
        match arg {
            HostArg::None => libc::snprintf(buf, len, spec),
            HostArg::Int(v) => libc::snprintf(buf, len, spec, v),
            HostArg::Uint(v) => libc::snprintf(buf, len, spec, v),
            HostArg::Long(v) => libc::snprintf(buf, len, spec, v),
            HostArg::LongLong(v) => libc::snprintf(buf, len, spec, v),
            HostArg::Size(v) => libc::snprintf(buf, len, spec, v),
            HostArg::PtrDiff(v) => libc::snprintf(buf, len, spec, v),
            HostArg::IntMax(v) => libc::snprintf(buf, len, spec, v),
            HostArg::Double(v) => libc::snprintf(buf, len, spec, v),
            HostArg::Ptr(v) => libc::snprintf(buf, len, spec, v),
        }
    }
}

/// Render one directive into `out`. A host encoding error renders nothing.
fn format_one(spec: &[u8], arg: HostArg, out: &mut MessageBuf) {
    let spec_ptr = spec.as_ptr().cast::<c_char>();
    let mut stack = [0u8; 256];
    // SAFETY: spec comes from Directive::host_spec (NUL-terminated, typed to
    // match arg); stack is writable for its length.
    let n = unsafe { host_snprintf(stack.as_mut_ptr().cast(), stack.len(), spec_ptr, arg) };
    let Ok(n) = usize::try_from(n) else {
        return;
    };
    if n < stack.len() {
        out.push(&stack[..n]);
        return;
    }
    let mut heap = vec![0u8; n.min(MAX_MESSAGE_LEN) + 1];
    // SAFETY: as above, with heap as the buffer.
    let m = unsafe { host_snprintf(heap.as_mut_ptr().cast(), heap.len(), spec_ptr, arg) };
    if let Ok(m) = usize::try_from(m) {
        out.push(&heap[..m.min(heap.len() - 1)]);
    }
}

fn star_value(arg: HostArg) -> Option<i32> {
    match arg {
        HostArg::Int(v) => Some(v),
        _ => None,
    }
}

/// Render `fmt`, pulling arguments through `next` in directive order.
///
/// `%n` consumes its pointer and writes nothing. `%m` renders the errno
/// value current when rendering started.
pub fn render<F>(fmt: &[u8], mut next: F) -> MessageBuf
where
    F: FnMut(ArgClass) -> HostArg,
{
    // SAFETY: reading this thread's errno cell.
    let entry_errno = unsafe { *libc::__errno_location() };
    let mut out = MessageBuf::new();

    for segment in parse_format(fmt) {
        if out.is_full() {
            break;
        }
        let directive = match segment {
            Segment::Literal(bytes) | Segment::Invalid(bytes) => {
                out.push(bytes);
                continue;
            }
            Segment::Percent => {
                out.push(b"%");
                continue;
            }
            Segment::Directive(directive) => directive,
        };

        let class = directive.arg_class();
        if class == ArgClass::LongDouble {
            out.push(&fmt[directive.offset..]);
            break;
        }
        let int = ArgClass::Signed(IntWidth::Int);
        let width = match directive.width {
            Width::FromArg => star_value(next(int)),
            _ => None,
        };
        let precision = match directive.precision {
            Precision::FromArg => star_value(next(int)),
            _ => None,
        };
        match class {
            ArgClass::WriteBack => {
                next(ArgClass::WriteBack);
            }
            ArgClass::None => {
                // SAFETY: restoring this thread's errno for `%m`.
                unsafe { *libc::__errno_location() = entry_errno };
                format_one(&directive.host_spec(width, precision), HostArg::None, &mut out);
            }
            class => {
                let arg = next(class);
                format_one(&directive.host_spec(width, precision), arg, &mut out);
            }
        }
    }
    out
}
