//! Segments a rendered page back into sectors by thresholding per-row/column
//! "ink" signals, then samples each dot cell with background rejection
//! (§4.9).

use crate::config::EncodeConfig;
use crate::dot::{Dot, DotMode};
use crate::dot_byte::DotByte;
use crate::dot_row::DotRow;
use crate::error::CsError;
use crate::sector::Sector;

use super::render::PixelGrid;

const LOW: f64 = 0.15;
const HIGH: f64 = 0.85;
const MIN_LENGTH_SECTOR: usize = 10;

fn normalize(signal: &[f64]) -> Vec<f64> {
	let min = signal.iter().copied().fold(f64::INFINITY, f64::min);
	let max = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
	if !(max > min) {
		return vec![0.0; signal.len()];
	}
	signal.iter().map(|v| (v - min) / (max - min)).collect()
}

/// Finds `(begin, end)` pixel-index pairs bounding each printed band in
/// `signal` (an "ink" signal: background reads low, any ink — border, gap
/// transition, or data — reads relatively high once normalized).
///
/// Walks the signal once: a begin is a rise above `HIGH` preceded (within
/// the last one or two samples) by a value below `LOW`; an end is a
/// subsequent drop below `LOW`, itself preceded (within the last one or two
/// samples) by a value above `HIGH`, at least `MIN_LENGTH_SECTOR` samples
/// after the matching begin. Requiring the just-came-from-`HIGH` precondition
/// on the end (mirroring the begin's just-came-from-`LOW` precondition) keeps
/// an interior low region — e.g. the all-white padding rows/columns of a
/// zero-padded data sector, which can normalize below `LOW` — from being
/// mistaken for the sector's far edge; only a genuine high-to-low transition
/// counts. Mismatched begin/end counts are truncated to the shorter list.
fn find_bounds(signal: &[f64]) -> Vec<(usize, usize)> {
	if signal.is_empty() {
		return Vec::new();
	}
	let normalized = normalize(signal);
	let scan_limit =
		normalized.iter().rposition(|&v| v < LOW).unwrap_or(normalized.len() - 1);

	let mut begins = Vec::new();
	let mut ends = Vec::new();
	let mut looking_for_begin = true;
	let mut last_begin = 0usize;

	for i in 0..=scan_limit {
		if looking_for_begin {
			let prev_low =
				(i >= 1 && normalized[i - 1] < LOW) || (i >= 2 && normalized[i - 2] < LOW);
			if normalized[i] > HIGH && prev_low {
				begins.push(i);
				last_begin = i;
				looking_for_begin = false;
			}
		} else if normalized[i] < LOW && i >= last_begin + MIN_LENGTH_SECTOR {
			let prev_high =
				(i >= 1 && normalized[i - 1] > HIGH) || (i >= 2 && normalized[i - 2] > HIGH);
			if prev_high {
				ends.push(i);
				looking_for_begin = true;
			}
		}
	}

	let n = begins.len().min(ends.len());
	begins.into_iter().zip(ends).take(n).collect()
}

fn ink_value(grid: &PixelGrid, x: u32, y: u32) -> f64 {
	1.0 - grid.get(x, y).average_shade()
}

fn vertical_signal(grid: &PixelGrid) -> Vec<f64> {
	(0..grid.height())
		.map(|y| (0..grid.width()).map(|x| ink_value(grid, x, y)).sum::<f64>() / grid.width() as f64)
		.collect()
}

fn horizontal_signal(grid: &PixelGrid) -> Vec<f64> {
	(0..grid.width())
		.map(|x| (0..grid.height()).map(|y| ink_value(grid, x, y)).sum::<f64>() / grid.height() as f64)
		.collect()
}

/// Scans `grid` into sectors, in row-major page order, matching how
/// [`crate::page::Page::assemble`] laid its slots out.
pub fn scan_page(
	grid: &PixelGrid,
	config: &EncodeConfig,
	page_index: usize,
) -> Result<Vec<Sector>, CsError> {
	let v_bounds = find_bounds(&vertical_signal(grid));
	let h_bounds = find_bounds(&horizontal_signal(grid));

	if v_bounds.len() != config.sectors_v as usize || h_bounds.len() != config.sectors_h as usize {
		return Err(CsError::SegmentationFailed {
			page_index,
			reason: format!(
				"expected {}x{} sector bound(s), found {}x{}",
				config.sectors_v,
				config.sectors_h,
				v_bounds.len(),
				h_bounds.len()
			),
		});
	}

	let mut sectors = Vec::with_capacity(v_bounds.len() * h_bounds.len());
	for &(v_start, v_end) in &v_bounds {
		for &(h_start, h_end) in &h_bounds {
			sectors.push(decode_sector_rectangle(grid, v_start, v_end, h_start, h_end, config)?);
		}
	}
	Ok(sectors)
}

/// Highest average-shade still considered a real (non-background) sample
/// at the given color depth: `1 - 0.5 / 2^colorDepth` (§4.9 step 5).
fn high_threshold(color_depth: u16) -> f64 {
	1.0 - 0.5 / 2f64.powi(i32::from(color_depth))
}

fn decode_sector_rectangle(
	grid: &PixelGrid,
	v_start: usize,
	v_end: usize,
	h_start: usize,
	h_end: usize,
	config: &EncodeConfig,
) -> Result<Sector, CsError> {
	let border_gap = (config.border_size + config.gap_size) as f64;
	let total_height_dots = config.sector_height as f64 + 2.0 * border_gap;
	let total_width_dots = config.sector_width as f64 + 2.0 * border_gap;
	let height_per_dot = (v_end - v_start) as f64 / total_height_dots;
	let width_per_dot = (h_end - h_start) as f64 / total_width_dots;
	let threshold = high_threshold(config.color_depth);
	let dot_mode = DotMode::for_color_depth(config.color_depth);

	let mut dots = Vec::with_capacity(config.sector_height as usize * config.sector_width as usize);
	for row in 0..config.sector_height {
		for col in 0..config.sector_width {
			let center_y = v_start as f64 + (border_gap + row as f64 + 0.5) * height_per_dot;
			let center_x = h_start as f64 + (border_gap + col as f64 + 0.5) * width_per_dot;
			let half_h = (height_per_dot / 2.0).max(1.0);
			let half_w = (width_per_dot / 2.0).max(1.0);
			let y0 = (center_y - half_h).round().max(0.0) as u32;
			let y1 = ((center_y + half_h).round() as u32).min(grid.height().saturating_sub(1));
			let x0 = (center_x - half_w).round().max(0.0) as u32;
			let x1 = ((center_x + half_w).round() as u32).min(grid.width().saturating_sub(1));

			let mut sample = crate::dot::ColorChannels::WHITE;
			'window: for y in y0..=y1 {
				for x in x0..=x1 {
					let pixel = grid.get(x, y);
					if pixel.average_shade() <= threshold {
						sample = pixel;
						break 'window;
					}
				}
			}
			dots.push(Dot { channels: sample, channel_num: dot_mode_channel_num(dot_mode) });
		}
	}

	let rows: Vec<DotRow> = (0..config.sector_height as usize)
		.map(|row| {
			let start = row * config.sector_width as usize;
			let row_dots = &dots[start..start + config.sector_width as usize];
			let dot_bytes: Vec<DotByte> = row_dots
				.chunks(8)
				.map(|chunk| DotByte {
					dots: chunk.to_vec().try_into().unwrap_or_else(|_| {
						unreachable!("sector width is a multiple of 8")
					}),
				})
				.collect();
			DotRow { dot_bytes, row_number: row as u32, width: config.sector_width }
		})
		.collect();

	Sector::decode(&rows, config.sector_height, config.sector_width, config.color_depth, config.ecc_rate)
}

fn dot_mode_channel_num(mode: DotMode) -> u8 {
	match mode {
		DotMode::Shade => 1,
		DotMode::Primary => 2,
		DotMode::Secondary => 3,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::colorsafe_file::ColorSafeFile;
	use crate::image::render::render_page;

	fn config() -> EncodeConfig {
		EncodeConfig {
			color_depth: 2,
			ecc_rate: 0.2,
			sector_height: 20,
			sector_width: 32,
			sectors_v: 2,
			sectors_h: 2,
			border_size: 1,
			gap_size: 1,
			pixels_per_dot: 2,
			dot_fill_pixels: 2,
			..EncodeConfig::default()
		}
	}

	#[test]
	fn finds_expected_sector_count() {
		let config = config();
		let file = ColorSafeFile::encode(b"scan me please", &config).unwrap();
		let grid = render_page(&file.pages()[0], &config);
		let sectors = scan_page(&grid, &config, 0).unwrap();
		assert_eq!(sectors.len(), (config.sectors_v * config.sectors_h) as usize);
	}

	#[test]
	fn recovers_sector_payload_bytes() {
		let config = config();
		let file = ColorSafeFile::encode(b"0123456789abcdef", &config).unwrap();
		let grid = render_page(&file.pages()[0], &config);
		let scanned = scan_page(&grid, &config, 0).unwrap();

		let original_sectors: Vec<_> = (0..file.pages()[0].slots.len())
			.map(|i| file.pages()[0].sector(i).data.clone())
			.collect();
		let scanned_data: Vec<_> = scanned.iter().map(|s| s.data.clone()).collect();
		assert_eq!(scanned_data, original_sectors);
	}
}
