//! Directive parsing and per-directive rendering for the log bridge.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use droidcompat_core::stdio::parse_format;
use droidcompat_liblog::{HostArg, render};

const FORMAT: &[u8] = b"voice %d at %s, rate %.2f Hz, flags %#x, name '%-12s'";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_format", |b| {
        b.iter(|| black_box(parse_format(black_box(FORMAT)).len()));
    });
}

fn bench_render(c: &mut Criterion) {
    c.bench_function("render_five_directives", |b| {
        b.iter(|| {
            let mut args = [
                HostArg::Int(5),
                HostArg::Ptr(c"bank0".as_ptr().cast()),
                HostArg::Double(44_100.0),
                HostArg::Int(0x1f),
                HostArg::Ptr(c"square".as_ptr().cast()),
            ]
            .into_iter();
            let out = render(FORMAT, |_| args.next().unwrap_or(HostArg::None));
            black_box(out.as_bytes().len());
        });
    });
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
