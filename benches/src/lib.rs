//! Synthetic data generators and size presets shared by the benchmark
//! binaries in `benches/`.

/// Generates `len` bytes of pseudo-random payload, deterministic for a given
/// `seed` so criterion runs are comparable across invocations.
pub fn generate_payload(len: usize, seed: u8) -> Vec<u8> {
	(0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

/// Common benchmark sizes for synthetic payloads, in bytes.
pub mod sizes {
	/// Tiny payload: fits comfortably in a single RS block.
	pub const TINY: usize = 64;
	/// Small payload: a handful of sectors.
	pub const SMALL: usize = 4_096;
	/// Medium payload: tens of sectors.
	pub const MEDIUM: usize = 65_536;
	/// Large payload: hundreds of sectors, multiple pages.
	pub const LARGE: usize = 1_048_576;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generate_payload_is_deterministic() {
		assert_eq!(generate_payload(32, 7), generate_payload(32, 7));
	}

	#[test]
	fn sizes_are_ordered() {
		assert!(sizes::TINY < sizes::SMALL);
		assert!(sizes::SMALL < sizes::MEDIUM);
		assert!(sizes::MEDIUM < sizes::LARGE);
	}
}
