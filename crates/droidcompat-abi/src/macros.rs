//! Helper macros for ABI function generation.

/// Generate pass-through fortified entry points.
///
/// Each entry names the full bionic parameter list (capacity parameters
/// prefixed with `_`) and the body forwarding to the unchecked host call.
///
/// ```ignore
/// fortified! {
///     /// Doc comment.
///     fn __memcpy_chk(dst: *mut c_void, src: *const c_void, n: size_t, _dst_len: size_t)
///         -> *mut c_void => { libc::memcpy(dst, src, n) }
/// }
/// ```
macro_rules! fortified {
    ($(
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) -> $ret:ty => $body:block
    )*) => {
        $(
            $(#[$meta])*
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn $name( $($arg : $argty),* ) -> $ret {
                unsafe { $body }
            }
        )*
    };
}

pub(crate) use fortified;
