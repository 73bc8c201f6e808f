//! A rectangular block of [`DotRow`]s: owns Reed-Solomon coding across the
//! data/ECC split and a fixed magic row separating the two.

mod builder;

#[cfg(test)]
mod tests;

use crate::dot_row::DotRow;
use crate::error::CsError;
use crate::rs::{BlockLayout, BlockStatus, block_layouts, rs_decode_block};

pub use builder::split_rows;
use builder::{SectorBuilder, reconcile_layouts};

/// A sector: `height` rows of `width` dots at `color_depth` bits/dot, split
/// into data rows, one magic row, and ECC rows.
#[derive(Debug, Clone)]
pub struct Sector {
	/// Rows per sector, including the magic row.
	pub height: u32,
	/// Dots per row.
	pub width: u32,
	/// Bits carried per dot.
	pub color_depth: u16,
	/// Fraction of non-magic rows reserved for ECC.
	pub ecc_rate: f64,
	/// Decoded (or, for a freshly-encoded sector, zero-padded source) payload
	/// bytes, length `data_row_count * width * color_depth / 8`.
	pub data: Vec<u8>,
	/// Data rows, top to bottom.
	pub data_rows: Vec<DotRow>,
	/// The single magic row separating data rows from ECC rows.
	pub magic_row: DotRow,
	/// ECC rows, top to bottom.
	pub ecc_rows: Vec<DotRow>,
	/// Per-RS-block outcome of the most recent decode (empty until decoded,
	/// all [`BlockStatus::Ok`] immediately after a fresh encode).
	pub block_status: Vec<BlockStatus>,
	/// The `(message_len, ecc_len)` split used for each block in
	/// `block_status`, kept around so [`Sector::rs_errors`] can report
	/// structured per-block detail without recomputing the partition.
	pub block_layouts: Vec<BlockLayout>,
}

impl Sector {
	/// Encodes `data` into a sector of the given geometry, running RS over
	/// block-partitioned message/ECC splits (§4.4).
	pub fn encode(
		data: &[u8],
		height: u32,
		width: u32,
		color_depth: u16,
		ecc_rate: f64,
	) -> Result<Self, CsError> {
		SectorBuilder::new(height, width, color_depth, ecc_rate).build_encoded(data)
	}

	/// Decodes a sector from its rows, in declared order (data rows,
	/// magic row, ECC rows). RS failures are reported per-block rather than
	/// aborting; see [`Sector::block_status`].
	pub fn decode(
		rows: &[DotRow],
		height: u32,
		width: u32,
		color_depth: u16,
		ecc_rate: f64,
	) -> Result<Self, CsError> {
		if width % crate::constants::BYTE_SIZE != 0 {
			return Err(CsError::InvalidDimensions {
				reason: format!("sector width {width} is not a multiple of 8"),
			});
		}
		if rows.len() != height as usize {
			return Err(CsError::InvalidDimensions {
				reason: format!(
					"expected {height} rows for this sector geometry, got {}",
					rows.len()
				),
			});
		}

		let (data_rows_n, ecc_rows_n) = split_rows(height, ecc_rate);
		let data_rows = rows[..data_rows_n as usize].to_vec();
		let magic_row = rows[data_rows_n as usize].clone();
		let ecc_rows = rows[data_rows_n as usize + 1..].to_vec();

		let raw_data: Vec<u8> = data_rows.iter().flat_map(|r| r.decode(color_depth)).collect();
		let raw_ecc: Vec<u8> = ecc_rows.iter().flat_map(|r| r.decode(color_depth)).collect();

		let data_capacity = raw_data.len();
		let ecc_capacity = raw_ecc.len();
		let mut layouts = block_layouts(data_capacity + ecc_capacity, data_rows_n, ecc_rows_n);
		reconcile_layouts(&mut layouts, data_capacity, ecc_capacity);

		let mut data = Vec::with_capacity(data_capacity);
		let mut block_status = Vec::with_capacity(layouts.len());
		let mut data_cursor = 0usize;
		let mut ecc_cursor = 0usize;
		for (index, layout) in layouts.iter().enumerate() {
			let message = &raw_data[data_cursor..data_cursor + layout.message_len];
			let ecc = &raw_ecc[ecc_cursor..ecc_cursor + layout.ecc_len];
			let (corrected, status) = rs_decode_block(message, ecc, *layout);
			if status == BlockStatus::Uncorrectable {
				log::warn!(
					"sector: RS block {index} uncorrectable (message_len={}, ecc_len={})",
					layout.message_len,
					layout.ecc_len
				);
			}
			data.extend(corrected);
			block_status.push(status);
			data_cursor += layout.message_len;
			ecc_cursor += layout.ecc_len;
		}

		Ok(Self {
			height,
			width,
			color_depth,
			ecc_rate,
			data,
			data_rows,
			magic_row,
			ecc_rows,
			block_status,
			block_layouts: layouts,
		})
	}

	/// All rows in on-page render order: data rows, then the magic row, then
	/// ECC rows.
	pub fn all_rows(&self) -> Vec<DotRow> {
		let mut rows = self.data_rows.clone();
		rows.push(self.magic_row.clone());
		rows.extend(self.ecc_rows.clone());
		rows
	}

	/// Whether this sector's payload begins with a magic row, the marker
	/// [`crate::metadata::MetadataSector`] uses to recognize itself without a
	/// separate on-wire flag. A sector whose first data row isn't all
	/// [`crate::constants::MAGIC_BYTE`] is strong evidence it's an ordinary
	/// data sector (§4.4).
	pub fn looks_like_metadata(&self) -> bool {
		let row_capacity = DotRow::byte_capacity(self.color_depth, self.width);
		self.data.len() >= row_capacity
			&& self.data[..row_capacity].iter().all(|&b| b == crate::constants::MAGIC_BYTE)
	}

	/// Whether every RS block in the most recent decode corrected cleanly.
	pub fn fully_corrected(&self) -> bool {
		self.block_status.iter().all(|s| *s == BlockStatus::Ok)
	}

	/// Structured [`CsError::RsUncorrectable`] errors for every block that
	/// failed to correct in the most recent decode, for a caller that wants
	/// per-block detail rather than just the aggregate [`Sector::fully_corrected`]
	/// check. `sector_index` is the caller's index for this sector on its
	/// page; it has no meaning to the sector itself. Does not affect
	/// decoding — per §4.4, an uncorrectable block is reported, not fatal.
	pub fn rs_errors(&self, sector_index: usize) -> Vec<CsError> {
		self.block_status
			.iter()
			.zip(&self.block_layouts)
			.enumerate()
			.filter(|(_, (status, _))| **status == BlockStatus::Uncorrectable)
			.map(|(block_index, (_, layout))| CsError::RsUncorrectable {
				sector_index,
				block_index,
				message_len: layout.message_len,
				ecc_len: layout.ecc_len,
			})
			.collect()
	}
}
