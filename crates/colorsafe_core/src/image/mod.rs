//! Rasterizing pages to pixel grids and scanning them back into sectors
//! (§4.8, §4.9).

mod render;
mod scan;

pub use render::{PixelGrid, render_page};
pub use scan::scan_page;

use crate::error::CsError;

/// Scans `grid` back into sectors, discards any that look like metadata
/// (§4.9 step 6), and concatenates the rest — the data half of one page's
/// round trip.
///
/// Per §7, an uncorrectable RS block is reported rather than fatal: the
/// returned payload always includes that sector's best-effort (uncorrected)
/// bytes, and the accompanying `Vec<CsError>` carries one
/// [`CsError::RsUncorrectable`] per failed block so the caller can report
/// partial recovery instead of silently returning corrupted bytes.
pub fn decode_page_payload(
	grid: &PixelGrid,
	config: &crate::config::EncodeConfig,
	page_index: usize,
) -> Result<(Vec<u8>, Vec<CsError>), CsError> {
	let sectors = scan_page(grid, config, page_index)?;
	let mut out = Vec::new();
	let mut errors = Vec::new();
	for (sector_index, sector) in sectors.iter().enumerate() {
		if !sector.looks_like_metadata() {
			out.extend_from_slice(&sector.data);
			errors.extend(sector.rs_errors(sector_index));
		}
	}
	Ok((out, errors))
}
