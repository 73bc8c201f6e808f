//! Multi-phase sector construction, expressed as a builder that returns an
//! immutable [`super::Sector`] (§9 design note: "Sector construction has a
//! multi-phase init — express as a builder returning an immutable value").

use crate::dot_row::DotRow;
use crate::error::CsError;
use crate::rs::{BlockLayout, block_layouts, rs_encode_block};

use super::Sector;

/// Splits `height` non-magic rows into `(data_rows, ecc_rows)` per
/// `dataRowCount = floor((height - 1) / (1 + eccRate))`.
pub fn split_rows(height: u32, ecc_rate: f64) -> (u32, u32) {
	let data_rows = (f64::from(height - crate::constants::MAGIC_ROW_HEIGHT)
		/ (1.0 + ecc_rate))
		.floor() as u32;
	let ecc_rows = height - crate::constants::MAGIC_ROW_HEIGHT - data_rows;
	(data_rows, ecc_rows)
}

/// Reconciles rounding drift between the sum of per-block `(message_len,
/// ecc_len)` pairs and the sector's actual fixed-size data/ECC row capacity,
/// by folding any leftover into the last block. Individual block RS math is
/// unaffected; only the very last block absorbs the (typically tiny) delta,
/// which keeps every data/ECC byte accounted for in the fixed row grid.
pub(super) fn reconcile_layouts(
	layouts: &mut [BlockLayout],
	data_capacity: usize,
	ecc_capacity: usize,
) {
	if layouts.is_empty() {
		return;
	}
	let sum_msg: usize = layouts.iter().map(|l| l.message_len).sum();
	let sum_ecc: usize = layouts.iter().map(|l| l.ecc_len).sum();
	let msg_delta = data_capacity as i64 - sum_msg as i64;
	let ecc_delta = ecc_capacity as i64 - sum_ecc as i64;
	let last = layouts.last_mut().expect("checked non-empty above");
	last.message_len = (last.message_len as i64 + msg_delta).max(0) as usize;
	last.ecc_len = (last.ecc_len as i64 + ecc_delta).max(0) as usize;
}

/// Builder driving sector construction phase-by-phase: row-count split,
/// block-size partition, RS encode, row layout.
pub(super) struct SectorBuilder {
	height: u32,
	width: u32,
	color_depth: u16,
	ecc_rate: f64,
}

impl SectorBuilder {
	pub(super) fn new(height: u32, width: u32, color_depth: u16, ecc_rate: f64) -> Self {
		Self { height, width, color_depth, ecc_rate }
	}

	fn validate_width(&self) -> Result<(), CsError> {
		if self.width % crate::constants::BYTE_SIZE != 0 {
			return Err(CsError::InvalidDimensions {
				reason: format!("sector width {} is not a multiple of 8", self.width),
			});
		}
		Ok(())
	}

	/// Encodes `data` (zero-padded to the sector's data capacity) into a
	/// fully-built [`Sector`].
	pub(super) fn build_encoded(self, data: &[u8]) -> Result<Sector, CsError> {
		self.validate_width()?;
		let row_capacity = DotRow::byte_capacity(self.color_depth, self.width);
		let (data_rows_n, ecc_rows_n) = split_rows(self.height, self.ecc_rate);
		let data_capacity = row_capacity * data_rows_n as usize;
		let ecc_capacity = row_capacity * ecc_rows_n as usize;

		if data.len() > data_capacity {
			return Err(CsError::CapacityExceeded { needed: data.len(), available: data_capacity });
		}
		let mut padded = data.to_vec();
		padded.resize(data_capacity, 0);

		let total_bytes = data_capacity + ecc_capacity;
		let mut layouts = block_layouts(total_bytes, data_rows_n, ecc_rows_n);
		reconcile_layouts(&mut layouts, data_capacity, ecc_capacity);

		let mut ecc_buffer = vec![0u8; ecc_capacity];
		let mut data_cursor = 0usize;
		let mut ecc_cursor = 0usize;
		for layout in &layouts {
			let message = &padded[data_cursor..data_cursor + layout.message_len];
			let ecc = rs_encode_block(message, *layout);
			ecc_buffer[ecc_cursor..ecc_cursor + layout.ecc_len].copy_from_slice(&ecc);
			data_cursor += layout.message_len;
			ecc_cursor += layout.ecc_len;
		}

		let data_rows = rows_from_bytes(&padded, self.color_depth, self.width, data_rows_n)?;
		let magic_bytes = vec![crate::constants::MAGIC_BYTE; row_capacity];
		let magic_row = DotRow::encode(&magic_bytes, self.color_depth, self.width, 0)?;
		let ecc_rows = rows_from_bytes(&ecc_buffer, self.color_depth, self.width, ecc_rows_n)?;

		Ok(Sector {
			height: self.height,
			width: self.width,
			color_depth: self.color_depth,
			ecc_rate: self.ecc_rate,
			data: padded,
			data_rows,
			magic_row,
			ecc_rows,
			block_status: vec![crate::rs::BlockStatus::Ok; layouts.len()],
			block_layouts: layouts,
		})
	}
}

fn rows_from_bytes(
	bytes: &[u8],
	color_depth: u16,
	width: u32,
	row_count: u32,
) -> Result<Vec<DotRow>, CsError> {
	let row_capacity = DotRow::byte_capacity(color_depth, width);
	(0..row_count)
		.map(|row_number| {
			let start = row_number as usize * row_capacity;
			let end = start + row_capacity;
			DotRow::encode(&bytes[start..end], color_depth, width, row_number)
		})
		.collect()
}
