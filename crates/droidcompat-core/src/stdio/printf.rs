//! printf directive parser.
//!
//! The log bridge receives C variadic arguments it cannot hand to the host's
//! `vfprintf` as a unit. Instead the format string is split into literal runs
//! and single directives; for each directive the caller pulls exactly one
//! argument of the type [`Directive::arg_class`] names and asks the host's
//! `snprintf` to render [`Directive::host_spec`]. Formatting semantics are
//! therefore the host's, byte for byte.
//!
//! Positional arguments (`%1$d`) are not supported and are emitted verbatim.

/// Flags parsed from a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
    pub grouping: bool,     // '\''
}

/// Field width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg,
}

/// Precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg,
}

/// Length modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    None,
    Hh,
    H,
    L,
    Ll,
    Z,
    T,
    J,
    BigL,
}

impl Length {
    fn text(self) -> &'static [u8] {
        match self {
            Self::None => b"",
            Self::Hh => b"hh",
            Self::H => b"h",
            Self::L => b"l",
            Self::Ll => b"ll",
            Self::Z => b"z",
            Self::T => b"t",
            Self::J => b"j",
            Self::BigL => b"L",
        }
    }
}

/// C type an integer argument travels as after default promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    /// `int` (also carries promoted `char`/`short`).
    Int,
    Long,
    LongLong,
    Size,
    PtrDiff,
    IntMax,
}

/// What a directive consumes from the argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgClass {
    /// Consumes nothing (`%m`).
    None,
    Signed(IntWidth),
    Unsigned(IntWidth),
    Double,
    /// `long double`; cannot be extracted portably.
    LongDouble,
    Char,
    /// `wint_t`.
    WideChar,
    Str,
    WideStr,
    Pointer,
    /// `%n`: consumes a pointer, renders nothing.
    WriteBack,
}

/// One parsed conversion directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Byte offset of the introducing `%` in the format string.
    pub offset: usize,
    pub flags: Flags,
    pub width: Width,
    pub precision: Precision,
    pub length: Length,
    pub conversion: u8,
}

/// A piece of a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Bytes emitted verbatim.
    Literal(&'a [u8]),
    /// `%%`.
    Percent,
    Directive(Directive),
    /// A malformed or unsupported directive, emitted verbatim.
    Invalid(&'a [u8]),
}

impl Directive {
    /// Argument type this directive consumes (width/precision `*` excluded).
    #[must_use]
    pub fn arg_class(&self) -> ArgClass {
        let int_width = match self.length {
            Length::None | Length::Hh | Length::H => IntWidth::Int,
            Length::L => IntWidth::Long,
            Length::Ll | Length::BigL => IntWidth::LongLong,
            Length::Z => IntWidth::Size,
            Length::T => IntWidth::PtrDiff,
            Length::J => IntWidth::IntMax,
        };
        match self.conversion {
            b'd' | b'i' => ArgClass::Signed(int_width),
            b'u' | b'o' | b'x' | b'X' => ArgClass::Unsigned(int_width),
            b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {
                if self.length == Length::BigL {
                    ArgClass::LongDouble
                } else {
                    ArgClass::Double
                }
            }
            b'c' if self.length == Length::L => ArgClass::WideChar,
            b'C' => ArgClass::WideChar,
            b'c' => ArgClass::Char,
            b's' if self.length == Length::L => ArgClass::WideStr,
            b'S' => ArgClass::WideStr,
            b's' => ArgClass::Str,
            b'p' => ArgClass::Pointer,
            b'n' => ArgClass::WriteBack,
            _ => ArgClass::None,
        }
    }

    /// Build the NUL-terminated single-directive format handed to the host.
    ///
    /// `width`/`precision` supply the values for `*` fields. A negative width
    /// means left-justify; a negative precision means "no precision".
    #[must_use]
    pub fn host_spec(&self, width: Option<i32>, precision: Option<i32>) -> Vec<u8> {
        let mut out = Vec::with_capacity(16);
        out.push(b'%');
        let mut left = self.flags.left_justify;
        let resolved_width = match self.width {
            Width::None => None,
            Width::Fixed(w) => Some(w),
            Width::FromArg => width.map(|w| {
                if w < 0 {
                    left = true;
                }
                w.unsigned_abs() as usize
            }),
        };
        if left {
            out.push(b'-');
        }
        if self.flags.force_sign {
            out.push(b'+');
        }
        if self.flags.space_sign {
            out.push(b' ');
        }
        if self.flags.alt_form {
            out.push(b'#');
        }
        if self.flags.zero_pad && !left {
            out.push(b'0');
        }
        if self.flags.grouping {
            out.push(b'\'');
        }
        if let Some(w) = resolved_width {
            out.extend_from_slice(w.to_string().as_bytes());
        }
        let resolved_precision = match self.precision {
            Precision::None => None,
            Precision::Fixed(p) => Some(p),
            Precision::FromArg => precision.and_then(|p| usize::try_from(p).ok()),
        };
        if let Some(p) = resolved_precision {
            out.push(b'.');
            out.extend_from_slice(p.to_string().as_bytes());
        }
        out.extend_from_slice(self.length.text());
        out.push(self.conversion);
        out.push(0);
        out
    }
}

fn is_conversion(c: u8) -> bool {
    matches!(
        c,
        b'd' | b'i'
            | b'u'
            | b'o'
            | b'x'
            | b'X'
            | b'f'
            | b'F'
            | b'e'
            | b'E'
            | b'g'
            | b'G'
            | b'a'
            | b'A'
            | b'c'
            | b'C'
            | b's'
            | b'S'
            | b'p'
            | b'n'
            | b'm'
    )
}

fn parse_number(fmt: &[u8], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    let mut value = 0usize;
    while *pos < fmt.len() && fmt[*pos].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add(usize::from(fmt[*pos] - b'0'));
        *pos += 1;
    }
    (*pos > start).then_some(value)
}

/// Parse one directive. `fmt` starts right after the `%`.
///
/// Returns the directive and the number of bytes consumed, or `None` when
/// the directive is malformed, unsupported, or truncated. The returned
/// directive's `offset` is 0; [`parse_format`] fills it in.
#[must_use]
pub fn parse_directive(fmt: &[u8]) -> Option<(Directive, usize)> {
    let mut pos = 0usize;

    let mut flags = Flags::default();
    while pos < fmt.len() {
        match fmt[pos] {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            b'\'' => flags.grouping = true,
            _ => break,
        }
        pos += 1;
    }

    let width = if fmt.get(pos) == Some(&b'*') {
        pos += 1;
        Width::FromArg
    } else {
        match parse_number(fmt, &mut pos) {
            Some(w) => Width::Fixed(w),
            None => Width::None,
        }
    };
    // Positional argument: `%1$d`.
    if fmt.get(pos) == Some(&b'$') {
        return None;
    }

    let precision = if fmt.get(pos) == Some(&b'.') {
        pos += 1;
        if fmt.get(pos) == Some(&b'*') {
            pos += 1;
            Precision::FromArg
        } else {
            Precision::Fixed(parse_number(fmt, &mut pos).unwrap_or(0))
        }
    } else {
        Precision::None
    };

    let length = match (fmt.get(pos), fmt.get(pos + 1)) {
        (Some(b'h'), Some(b'h')) => {
            pos += 2;
            Length::Hh
        }
        (Some(b'l'), Some(b'l')) => {
            pos += 2;
            Length::Ll
        }
        (Some(b'h'), _) => {
            pos += 1;
            Length::H
        }
        (Some(b'l'), _) => {
            pos += 1;
            Length::L
        }
        (Some(b'q'), _) => {
            pos += 1;
            Length::Ll
        }
        (Some(b'z'), _) => {
            pos += 1;
            Length::Z
        }
        (Some(b't'), _) => {
            pos += 1;
            Length::T
        }
        (Some(b'j'), _) => {
            pos += 1;
            Length::J
        }
        (Some(b'L'), _) => {
            pos += 1;
            Length::BigL
        }
        _ => Length::None,
    };

    let conversion = *fmt.get(pos)?;
    if !is_conversion(conversion) {
        return None;
    }
    pos += 1;

    Some((
        Directive {
            offset: 0,
            flags,
            width,
            precision,
            length,
            conversion,
        },
        pos,
    ))
}

/// Split a format string into literal runs and directives.
#[must_use]
pub fn parse_format(fmt: &[u8]) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0usize;
    let mut literal_start = 0usize;

    while pos < fmt.len() {
        if fmt[pos] != b'%' {
            pos += 1;
            continue;
        }
        if pos > literal_start {
            segments.push(Segment::Literal(&fmt[literal_start..pos]));
        }
        if fmt.get(pos + 1) == Some(&b'%') {
            segments.push(Segment::Percent);
            pos += 2;
        } else {
            match parse_directive(&fmt[pos + 1..]) {
                Some((directive, consumed)) => {
                    segments.push(Segment::Directive(Directive {
                        offset: pos,
                        ..directive
                    }));
                    pos += 1 + consumed;
                }
                None => {
                    // Emit the '%' verbatim and resume scanning after it.
                    segments.push(Segment::Invalid(&fmt[pos..pos + 1]));
                    pos += 1;
                }
            }
        }
        literal_start = pos;
    }
    if literal_start < fmt.len() {
        segments.push(Segment::Literal(&fmt[literal_start..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_directive(fmt: &[u8]) -> Directive {
        match parse_format(fmt).as_slice() {
            [Segment::Directive(d)] => d.clone(),
            other => panic!("expected one directive, got {other:?}"),
        }
    }

    #[test]
    fn splits_literals_and_directives() {
        let segs = parse_format(b"room %s has %d users");
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[0], Segment::Literal(b"room "));
        assert!(matches!(&segs[1], Segment::Directive(d) if d.conversion == b's'));
        assert_eq!(segs[2], Segment::Literal(b" has "));
        assert!(matches!(&segs[3], Segment::Directive(d) if d.conversion == b'd'));
    }

    #[test]
    fn trailing_literal_and_percent_escape() {
        let segs = parse_format(b"100%% done");
        assert_eq!(
            segs,
            vec![
                Segment::Literal(b"100"),
                Segment::Percent,
                Segment::Literal(b" done")
            ]
        );
    }

    #[test]
    fn flags_width_precision_length() {
        let d = only_directive(b"%-+08.3lld");
        assert!(d.flags.left_justify);
        assert!(d.flags.force_sign);
        assert!(d.flags.zero_pad);
        assert_eq!(d.width, Width::Fixed(8));
        assert_eq!(d.precision, Precision::Fixed(3));
        assert_eq!(d.length, Length::Ll);
        assert_eq!(d.arg_class(), ArgClass::Signed(IntWidth::LongLong));
    }

    #[test]
    fn star_fields() {
        let d = only_directive(b"%*.*f");
        assert_eq!(d.width, Width::FromArg);
        assert_eq!(d.precision, Precision::FromArg);
        assert_eq!(d.arg_class(), ArgClass::Double);
        assert_eq!(d.host_spec(Some(10), Some(2)), b"%10.2f\0".to_vec());
        assert_eq!(d.host_spec(Some(-4), Some(-1)), b"%-4f\0".to_vec());
    }

    #[test]
    fn zero_pad_dropped_when_left_justified() {
        let d = only_directive(b"%0*d");
        assert_eq!(d.host_spec(Some(-6), None), b"%-6d\0".to_vec());
    }

    #[test]
    fn arg_classes() {
        assert_eq!(only_directive(b"%hhu").arg_class(), ArgClass::Unsigned(IntWidth::Int));
        assert_eq!(only_directive(b"%zx").arg_class(), ArgClass::Unsigned(IntWidth::Size));
        assert_eq!(only_directive(b"%td").arg_class(), ArgClass::Signed(IntWidth::PtrDiff));
        assert_eq!(only_directive(b"%jd").arg_class(), ArgClass::Signed(IntWidth::IntMax));
        assert_eq!(only_directive(b"%ld").arg_class(), ArgClass::Signed(IntWidth::Long));
        assert_eq!(only_directive(b"%Lf").arg_class(), ArgClass::LongDouble);
        assert_eq!(only_directive(b"%c").arg_class(), ArgClass::Char);
        assert_eq!(only_directive(b"%lc").arg_class(), ArgClass::WideChar);
        assert_eq!(only_directive(b"%ls").arg_class(), ArgClass::WideStr);
        assert_eq!(only_directive(b"%p").arg_class(), ArgClass::Pointer);
        assert_eq!(only_directive(b"%n").arg_class(), ArgClass::WriteBack);
        assert_eq!(only_directive(b"%m").arg_class(), ArgClass::None);
    }

    #[test]
    fn host_spec_round_trips_text() {
        assert_eq!(only_directive(b"%#x").host_spec(None, None), b"%#x\0".to_vec());
        assert_eq!(only_directive(b"%.5s").host_spec(None, None), b"%.5s\0".to_vec());
        assert_eq!(only_directive(b"%hhd").host_spec(None, None), b"%hhd\0".to_vec());
        assert_eq!(only_directive(b"%'d").host_spec(None, None), b"%'d\0".to_vec());
        assert_eq!(only_directive(b"%.f").host_spec(None, None), b"%.0f\0".to_vec());
    }

    #[test]
    fn invalid_directives_are_verbatim() {
        let segs = parse_format(b"%1$d");
        assert_eq!(segs[0], Segment::Invalid(b"%"));
        assert_eq!(segs[1], Segment::Literal(b"1$d"));

        let segs = parse_format(b"50%");
        assert_eq!(segs, vec![Segment::Literal(b"50"), Segment::Invalid(b"%")]);

        let segs = parse_format(b"%y");
        assert_eq!(segs, vec![Segment::Invalid(b"%"), Segment::Literal(b"y")]);
    }

    #[test]
    fn directives_record_their_offset() {
        let segs = parse_format(b"ab%dcd%5.2f");
        let offsets: Vec<usize> = segs
            .iter()
            .filter_map(|s| match s {
                Segment::Directive(d) => Some(d.offset),
                _ => None,
            })
            .collect();
        assert_eq!(offsets, [2, 6]);
    }

    #[test]
    fn empty_format() {
        assert!(parse_format(b"").is_empty());
    }
}
