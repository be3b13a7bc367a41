use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fidmark::{read_markups, write_markups, Fiducial, MarkupFile, MarkupPoint};

fn synthetic_file(n: usize) -> MarkupFile {
    (0..n)
        .map(|i| {
            let t = i as f32;
            (
                format!("landmark_{i}"),
                MarkupPoint::new([t * 0.37 - 50.0, 120.0 - t * 0.11, t * 1.5]),
            )
        })
        .collect()
}

fn bench_codec(c: &mut Criterion) {
    let file = synthetic_file(1_000);
    let mut encoded = Vec::new();
    write_markups(&mut encoded, &file).expect("encode");

    c.bench_function("encode_1000", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(encoded.len());
            write_markups(&mut out, black_box(&file)).expect("encode");
            out
        })
    });

    c.bench_function("decode_1000", |b| {
        b.iter(|| read_markups(Cursor::new(black_box(&encoded)), true).expect("decode"))
    });
}

fn bench_fiducial(c: &mut Criterion) {
    c.bench_function("fiducial_pix_mm_cycle", |b| {
        let mut f = Fiducial::with_geometry(&[10.0, -20.0, 30.0], &[0.7, 0.7, 1.25], &[0.0; 3], None)
            .expect("valid fiducial");
        b.iter(|| {
            f.to_pix().to_mm();
            black_box(f.position())
        })
    });
}

criterion_group!(benches, bench_codec, bench_fiducial);
criterion_main!(benches);
