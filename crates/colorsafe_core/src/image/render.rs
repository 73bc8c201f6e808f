//! Rasterizes a [`Page`] into a pixel grid at a chosen dot scale (§4.8).

use crate::dot::ColorChannels;
use crate::page::Page;
use crate::sector::Sector;

/// A page's rendered pixels: `width x height`, row-major, RGB in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct PixelGrid {
	width: u32,
	height: u32,
	pixels: Vec<ColorChannels>,
}

impl PixelGrid {
	/// A white canvas of the given pixel dimensions.
	pub fn new(width: u32, height: u32) -> Self {
		Self { width, height, pixels: vec![ColorChannels::WHITE; (width * height) as usize] }
	}

	/// Width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// The color at `(x, y)`.
	pub fn get(&self, x: u32, y: u32) -> ColorChannels {
		self.pixels[(y * self.width + x) as usize]
	}

	fn set(&mut self, x: u32, y: u32, color: ColorChannels) {
		self.pixels[(y * self.width + x) as usize] = color;
	}
}

/// Dots-per-side margin of plain background kept around the whole tiled
/// sector grid, so the scan path (§4.9) always has a true background
/// reference to bootstrap its threshold search from — every physically
/// printed page has some blank margin around the print area, and the
/// segmentation algorithm's "ending cap" search needs one on both ends of
/// each signal to work at all.
fn page_margin_dots(config: &crate::config::EncodeConfig) -> u32 {
	config.border_size + config.gap_size
}

/// Renders every sector on `page` into one pixel grid.
pub fn render_page(page: &Page, config: &crate::config::EncodeConfig) -> PixelGrid {
	let border_gap = config.border_size + config.gap_size;
	let sector_total_height_dots = config.sector_height + 2 * border_gap;
	let sector_total_width_dots = config.sector_width + 2 * border_gap;
	let margin = page_margin_dots(config);

	let working_height_dots = sector_total_height_dots * config.sectors_v + 2 * margin;
	let working_width_dots = sector_total_width_dots * config.sectors_h + 2 * margin;
	let working_height_px = working_height_dots * config.pixels_per_dot;
	let working_width_px = working_width_dots * config.pixels_per_dot;

	let mut grid = PixelGrid::new(working_width_px, working_height_px);

	for row in 0..config.sectors_v {
		for col in 0..config.sectors_h {
			let idx = (row * config.sectors_h + col) as usize;
			let sector = page.sector(idx);
			let origin_y_dots = margin + row * sector_total_height_dots;
			let origin_x_dots = margin + col * sector_total_width_dots;
			render_sector(&mut grid, sector, origin_y_dots, origin_x_dots, config);
		}
	}
	grid
}

fn render_sector(
	grid: &mut PixelGrid,
	sector: &Sector,
	origin_y_dots: u32,
	origin_x_dots: u32,
	config: &crate::config::EncodeConfig,
) {
	let border = config.border_size;
	let gap = config.gap_size;
	let ppd = config.pixels_per_dot;
	let fill = config.dot_fill_pixels.min(ppd);
	let pad_before = (ppd - fill) / 2;

	let total_h = config.sector_height + 2 * (border + gap);
	let total_w = config.sector_width + 2 * (border + gap);
	for dy in 0..total_h {
		for dx in 0..total_w {
			let in_border = dy < border || dy >= total_h - border || dx < border || dx >= total_w - border;
			if in_border {
				fill_cell(grid, origin_x_dots + dx, origin_y_dots + dy, ppd, ColorChannels::BLACK);
			}
		}
	}

	for (row_idx, row) in sector.all_rows().iter().enumerate() {
		for (byte_idx, dot_byte) in row.dot_bytes.iter().enumerate() {
			for (bit_idx, dot) in dot_byte.dots.iter().enumerate() {
				let col = byte_idx * 8 + bit_idx;
				let dy = border + gap + row_idx as u32;
				let dx = border + gap + col as u32;
				fill_dot_cell(
					grid,
					origin_x_dots + dx,
					origin_y_dots + dy,
					ppd,
					fill,
					pad_before,
					dot.channels,
				);
			}
		}
	}
}

fn fill_cell(grid: &mut PixelGrid, cell_x: u32, cell_y: u32, ppd: u32, color: ColorChannels) {
	for py in 0..ppd {
		for px in 0..ppd {
			grid.set(cell_x * ppd + px, cell_y * ppd + py, color);
		}
	}
}

fn fill_dot_cell(
	grid: &mut PixelGrid,
	cell_x: u32,
	cell_y: u32,
	ppd: u32,
	fill: u32,
	pad_before: u32,
	color: ColorChannels,
) {
	for py in 0..fill {
		for px in 0..fill {
			grid.set(cell_x * ppd + pad_before + px, cell_y * ppd + pad_before + py, color);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::EncodeConfig;
	use crate::colorsafe_file::ColorSafeFile;

	#[test]
	fn render_dimensions_account_for_margin_border_and_gap() {
		let config = EncodeConfig {
			color_depth: 2,
			sector_height: 20,
			sector_width: 32,
			sectors_v: 2,
			sectors_h: 2,
			border_size: 1,
			gap_size: 1,
			pixels_per_dot: 2,
			dot_fill_pixels: 2,
			..EncodeConfig::default()
		};
		let file = ColorSafeFile::encode(b"hi", &config).unwrap();
		let grid = render_page(&file.pages()[0], &config);

		let border_gap = config.border_size + config.gap_size;
		let margin = page_margin_dots(&config);
		let expected_width_dots =
			(config.sector_width + 2 * border_gap) * config.sectors_h + 2 * margin;
		let expected_height_dots =
			(config.sector_height + 2 * border_gap) * config.sectors_v + 2 * margin;
		assert_eq!(grid.width(), expected_width_dots * config.pixels_per_dot);
		assert_eq!(grid.height(), expected_height_dots * config.pixels_per_dot);
	}

	#[test]
	fn page_margin_stays_white() {
		let config = EncodeConfig {
			color_depth: 2,
			sector_height: 20,
			sector_width: 32,
			sectors_v: 1,
			sectors_h: 1,
			..EncodeConfig::default()
		};
		let file = ColorSafeFile::encode(b"hi", &config).unwrap();
		let grid = render_page(&file.pages()[0], &config);
		assert_eq!(grid.get(0, 0), ColorChannels::WHITE);
	}
}
