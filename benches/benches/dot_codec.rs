//! Benchmarks per-dot and per-dot-byte encode/decode throughput across the
//! three color-depth modes (shade, primary, secondary).

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use colorsafe_benches::generate_payload;
use colorsafe_core::dot::Dot;
use colorsafe_core::dot_byte::DotByte;

/// One representative `colorDepth` per [`colorsafe_core::dot::DotMode`].
const DEPTHS: [(&str, u16); 3] = [("shade", 1), ("primary", 2), ("secondary", 3)];

fn bench_dot_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("dot_encode");
	for (label, color_depth) in DEPTHS {
		let bits = vec![true; color_depth as usize];
		group.bench_with_input(BenchmarkId::new("mode", label), &bits, |b, bits| {
			b.iter(|| Dot::encode(bits, color_depth));
		});
	}
	group.finish();
}

fn bench_dot_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("dot_decode");
	for (label, color_depth) in DEPTHS {
		let bits = vec![true; color_depth as usize];
		let dot = Dot::encode(&bits, color_depth);
		group.bench_with_input(BenchmarkId::new("mode", label), &dot, |b, dot| {
			b.iter(|| dot.decode(color_depth));
		});
	}
	group.finish();
}

fn bench_dot_byte_throughput(c: &mut Criterion) {
	let mut group = c.benchmark_group("dot_byte_round_trip");
	for (label, color_depth) in DEPTHS {
		let bytes = generate_payload(color_depth as usize, 9);
		group.throughput(Throughput::Bytes(color_depth as u64));
		group.bench_with_input(BenchmarkId::new("mode", label), &bytes, |b, bytes| {
			b.iter(|| {
				let db = DotByte::encode(bytes, color_depth);
				db.decode(color_depth)
			});
		});
	}
	group.finish();
}

criterion_group!(benches, bench_dot_encode, bench_dot_decode, bench_dot_byte_throughput);
criterion_main!(benches);
