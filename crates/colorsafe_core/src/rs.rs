//! Sector-level Reed-Solomon coding: block partitioning and the GF(2^8) codec
//! itself (via the `reed-solomon` crate).

use reed_solomon::{Decoder, Encoder};

/// Symbol size used by the RS code: one byte.
pub const RS_SYMBOL_BITS: u32 = 8;

/// Maximum bytes (message + ECC) a single RS block can carry.
pub const RS_BLOCK_SIZE_MAX: usize = 255;

/// A block's message and ECC byte lengths, derived from its share of
/// `total_bytes` and the sector's data/ECC row ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
	/// Message (payload) bytes in this block.
	pub message_len: usize,
	/// Parity bytes in this block.
	pub ecc_len: usize,
}

impl BlockLayout {
	/// Total bytes (message + ECC) this block occupies.
	pub fn total_len(&self) -> usize {
		self.message_len + self.ecc_len
	}
}

/// Splits `total_bytes` into RS blocks of at most [`RS_BLOCK_SIZE_MAX`] bytes.
///
/// A single short block holds everything if it fits; otherwise full
/// 255-byte blocks are used with any remainder redistributed between the
/// last two blocks so both end up `<= 255` (splitting the combined length
/// into a `(floor, ceil)` pair rather than leaving a short trailing block).
pub fn block_byte_sizes(total_bytes: usize) -> Vec<usize> {
	if total_bytes == 0 {
		return Vec::new();
	}
	if total_bytes <= RS_BLOCK_SIZE_MAX {
		return vec![total_bytes];
	}
	let full_blocks = total_bytes / RS_BLOCK_SIZE_MAX;
	let remainder = total_bytes % RS_BLOCK_SIZE_MAX;
	let mut blocks = vec![RS_BLOCK_SIZE_MAX; full_blocks];
	if remainder == 0 {
		return blocks;
	}
	blocks.push(remainder);
	let last_two_sum = blocks[blocks.len() - 2] + blocks[blocks.len() - 1];
	let len = blocks.len();
	blocks[len - 2] = last_two_sum / 2;
	blocks[len - 1] = last_two_sum - blocks[len - 2];
	blocks
}

/// Computes each block's `(message_len, ecc_len)` split given the sector's
/// data/ECC row counts (`data_rows` and `ecc_rows`, with `data_rows + ecc_rows
/// == height - 1`).
pub fn block_layouts(total_bytes: usize, data_rows: u32, ecc_rows: u32) -> Vec<BlockLayout> {
	let non_magic_rows = (data_rows + ecc_rows) as f64;
	block_byte_sizes(total_bytes)
		.into_iter()
		.map(|block_len| {
			let message_len =
				(block_len as f64 * f64::from(data_rows) / non_magic_rows).floor() as usize;
			let ecc_len = block_len - message_len;
			BlockLayout { message_len, ecc_len }
		})
		.collect()
}

/// Outcome of decoding one RS block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
	/// The block decoded cleanly or was fully corrected.
	Ok,
	/// The block had too many errors to correct; the returned bytes are the
	/// best-effort (uncorrected) message bytes.
	Uncorrectable,
}

/// Encodes `message` (length `layout.message_len`) and returns exactly
/// `layout.ecc_len` parity bytes — "only the trailing `eccLen` parity bytes
/// are retained" per the format spec.
pub fn rs_encode_block(message: &[u8], layout: BlockLayout) -> Vec<u8> {
	if layout.ecc_len == 0 {
		return Vec::new();
	}
	let encoder = Encoder::new(layout.ecc_len);
	let encoded = encoder.encode(message);
	encoded[encoded.len() - layout.ecc_len..].to_vec()
}

/// Corrects `message ++ ecc` (lengths per `layout`) and returns the
/// corrected message bytes plus a status. Never panics on an uncorrectable
/// block — the sector propagates that as a per-block status rather than
/// aborting the whole decode.
pub fn rs_decode_block(message: &[u8], ecc: &[u8], layout: BlockLayout) -> (Vec<u8>, BlockStatus) {
	if layout.ecc_len == 0 {
		return (message.to_vec(), BlockStatus::Ok);
	}
	let mut combined = Vec::with_capacity(layout.total_len());
	combined.extend_from_slice(message);
	combined.extend_from_slice(ecc);

	let decoder = Decoder::new(layout.ecc_len);
	match decoder.correct(&mut combined, None) {
		Ok(buffer) => {
			let data = buffer[..layout.message_len].to_vec();
			(data, BlockStatus::Ok)
		}
		Err(_) => (message.to_vec(), BlockStatus::Uncorrectable),
	}
}
