//! Benchmarks Reed-Solomon sector encode/decode across a few representative
//! payload sizes and ECC rates.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use colorsafe_benches::{generate_payload, sizes};
use colorsafe_core::sector::Sector;

const HEIGHT: u32 = 64;
const WIDTH: u32 = 64;
const COLOR_DEPTH: u16 = 1;
const ECC_RATE: f64 = 0.2;

fn payload_for_sector(seed: u8) -> Vec<u8> {
	let height = HEIGHT;
	let width = WIDTH;
	let (data_rows, _) = colorsafe_core::sector::split_rows(height, ECC_RATE);
	let capacity = (data_rows * width) as usize * COLOR_DEPTH as usize / 8;
	generate_payload(capacity, seed)
}

fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("sector_encode");
	let data = payload_for_sector(1);
	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_with_input(BenchmarkId::new("encode", data.len()), &data, |b, data| {
		b.iter(|| Sector::encode(data, HEIGHT, WIDTH, COLOR_DEPTH, ECC_RATE).unwrap());
	});
	group.finish();
}

fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("sector_decode");
	let data = payload_for_sector(2);
	let sector = Sector::encode(&data, HEIGHT, WIDTH, COLOR_DEPTH, ECC_RATE).unwrap();
	let rows = sector.all_rows();
	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_with_input(BenchmarkId::new("decode", data.len()), &rows, |b, rows| {
		b.iter(|| Sector::decode(rows, HEIGHT, WIDTH, COLOR_DEPTH, ECC_RATE).unwrap());
	});
	group.finish();
}

fn bench_ecc_rates(c: &mut Criterion) {
	let mut group = c.benchmark_group("sector_encode_by_ecc_rate");
	for &ecc_rate in &[0.1, 0.2, 0.4] {
		let (data_rows, _) = colorsafe_core::sector::split_rows(HEIGHT, ecc_rate);
		let capacity = (data_rows * WIDTH) as usize * COLOR_DEPTH as usize / 8;
		let data = generate_payload(capacity.min(sizes::SMALL), 3);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::from_parameter(ecc_rate), &data, |b, data| {
			b.iter(|| Sector::encode(data, HEIGHT, WIDTH, COLOR_DEPTH, ecc_rate).unwrap());
		});
	}
	group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_ecc_rates);
criterion_main!(benches);
