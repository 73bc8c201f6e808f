//! Encode/decode tunables collected into one validated, serializable struct.
//!
//! Mirrors how this codebase keeps per-format tunables (block sizes, compression
//! flags) on one struct instead of threading a dozen loose parameters through
//! every call.

use serde::{Deserialize, Serialize};

/// Maximum permitted color depth: `colorDepth` is packed as a single byte
/// field in [`crate::metadata`], so it cannot exceed `u8::MAX`.
pub const MAX_COLOR_DEPTH: u16 = u8::MAX as u16;

/// Every tunable needed to encode a payload into pages of colored dots.
///
/// Construct via [`EncodeConfig::new`] (validates and clamps) or
/// [`EncodeConfig::default`] (reference defaults from the format spec).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeConfig {
	/// Bits carried per dot. Clamped to `[1, 255]`; out-of-range input falls
	/// back to the default of 1.
	pub color_depth: u16,
	/// Fraction of non-magic sector rows reserved for Reed-Solomon parity.
	pub ecc_rate: f64,
	/// Rows per sector, including the magic row.
	pub sector_height: u32,
	/// Dots per sector row; must be a multiple of 8.
	pub sector_width: u32,
	/// Sector rows per page.
	pub sectors_v: u32,
	/// Sector columns per page.
	pub sectors_h: u32,
	/// Border thickness, in dots, drawn around each sector.
	pub border_size: u32,
	/// Gap, in dots, between a sector's border and its first dot.
	pub gap_size: u32,
	/// Physical pixels rendered per dot.
	pub pixels_per_dot: u32,
	/// Pixels of the `pixels_per_dot` square actually filled with color; the
	/// remainder is whitespace split symmetrically around the fill.
	pub dot_fill_pixels: u32,
	/// Source file name, stored in the `NAM` metadata tag.
	pub filename: String,
	/// Source file extension, stored in the `EXT` metadata tag.
	pub file_extension: String,
}

impl Default for EncodeConfig {
	fn default() -> Self {
		Self {
			color_depth: 1,
			ecc_rate: 0.2,
			sector_height: 64,
			sector_width: 64,
			sectors_v: 4,
			sectors_h: 4,
			border_size: 1,
			gap_size: 1,
			pixels_per_dot: 2,
			dot_fill_pixels: 2,
			filename: String::new(),
			file_extension: String::new(),
		}
	}
}

impl EncodeConfig {
	/// Builds a config from the raw, externally-supplied values, validating
	/// and clamping `color_depth` the way [`crate::error::CsError`]'s module
	/// docs describe: the core never silently substitutes values except for
	/// this one documented clamp.
	pub fn new(color_depth: u16, ecc_rate: f64, sector_height: u32, sector_width: u32) -> Self {
		let color_depth = if color_depth == 0 || color_depth > MAX_COLOR_DEPTH {
			1
		} else {
			color_depth
		};
		Self {
			color_depth,
			ecc_rate,
			sector_height,
			sector_width,
			..Self::default()
		}
	}

	/// Number of data rows a sector built with this config holds, per
	/// `floor((height - 1) / (1 + eccRate))`.
	pub fn data_row_count(&self) -> u32 {
		crate::sector::split_rows(self.sector_height, self.ecc_rate).0
	}

	/// Number of ECC rows a sector built with this config holds.
	pub fn ecc_row_count(&self) -> u32 {
		crate::sector::split_rows(self.sector_height, self.ecc_rate).1
	}

	/// Payload bytes a single data sector can carry.
	pub fn sector_capacity_bytes(&self) -> usize {
		self.sector_width as usize * self.color_depth as usize * self.data_row_count() as usize
			/ 8
	}

	/// Sectors tiled on one page.
	pub fn sectors_per_page(&self) -> u32 {
		self.sectors_v * self.sectors_h
	}
}
