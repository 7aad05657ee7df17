//! Standard I/O support for the shims.
//!
//! - [`layout`]: sizes of the host and source `FILE` objects behind `__sF`.
//! - [`printf`]: printf directive parser used to re-render C variadic
//!   arguments one directive at a time through the host formatter.

pub mod layout;
pub mod printf;

pub use layout::{HOST_FILE_SIZE, HOST_STREAM_SIZE, SOURCE_FILE_SIZE, STANDARD_STREAMS};
pub use printf::{ArgClass, Directive, IntWidth, Precision, Segment, Width, parse_format};
