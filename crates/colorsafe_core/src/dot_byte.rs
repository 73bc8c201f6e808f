//! Packs eight [`Dot`]s to carry `colorDepth` bytes.

use crate::dot::Dot;

/// Eight dots, read left-to-right, together encoding `colorDepth` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct DotByte {
	/// The eight dots, in encode/render order.
	pub dots: [Dot; 8],
}

impl DotByte {
	/// Encodes up to `color_depth` source bytes (zero-padded if shorter).
	pub fn encode(bytes: &[u8], color_depth: u16) -> Self {
		debug_assert!(bytes.len() <= color_depth as usize);
		let get_byte = |j: usize| -> u8 { bytes.get(j).copied().unwrap_or(0) };
		let mut dots: Vec<Dot> = Vec::with_capacity(8);
		for i in 0..8u32 {
			let bits: Vec<bool> =
				(0..color_depth as usize).map(|j| (get_byte(j) >> i) & 1 == 1).collect();
			dots.push(Dot::encode(&bits, color_depth));
		}
		Self {
			dots: dots.try_into().unwrap_or_else(|_| unreachable!("exactly 8 dots built")),
		}
	}

	/// Decodes back into `color_depth` bytes.
	pub fn decode(&self, color_depth: u16) -> Vec<u8> {
		let mut out = vec![0u8; color_depth as usize];
		for (i, dot) in self.dots.iter().enumerate() {
			let bits = dot.decode(color_depth);
			for (b, bit) in bits.iter().enumerate() {
				if *bit {
					out[b] |= 1 << i;
				}
			}
		}
		out
	}
}
