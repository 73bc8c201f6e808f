//! The smallest printable element: a colored dot carrying `colorDepth` bits.
//!
//! Three encodings share one wire format depending on `colorDepth` alone (the
//! mode is never stored): secondary (3 shaded channels), primary (a
//! zero-color index plus one shared shade), and shade (a single gray level).
//! Picking among them is normative and order-sensitive — see [`DotMode::for_color_depth`].

mod channels;

pub use channels::ColorChannels;

/// Which of the three per-dot encodings applies for a given `colorDepth`.
///
/// Never stored on the wire; derived purely from `colorDepth` so encoder and
/// decoder always agree without a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotMode {
	/// 3 channels, each an independent shade (`colorDepth % 3 == 0`).
	Secondary,
	/// 2 base-color-selecting bits plus one shared shade (`colorDepth % 2 == 0`).
	Primary,
	/// A single gray shade across all three channels (fallback).
	Shade,
}

impl DotMode {
	/// Selects a mode for `color_depth`. Divisibility by 3 is tested first;
	/// this tie-break order is normative (§4.1 of the format spec).
	pub fn for_color_depth(color_depth: u16) -> Self {
		if color_depth % 3 == 0 {
			DotMode::Secondary
		} else if color_depth % 2 == 0 {
			DotMode::Primary
		} else {
			DotMode::Shade
		}
	}

	/// Stable numeric id for the `DAT` metadata tag. Never stored alongside a
	/// dot itself (that's derived from `colorDepth`); only used so a decoder
	/// can sanity-check the mode its own `colorDepth`-derived math already
	/// picked against what the encoder recorded.
	pub fn id(self) -> u8 {
		match self {
			DotMode::Shade => 0,
			DotMode::Primary => 1,
			DotMode::Secondary => 2,
		}
	}
}

/// A single printable dot: the [`ColorChannels`] it renders as, plus how many
/// of the three RGB channels actively carry information under its mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
	/// Rendered color.
	pub channels: ColorChannels,
	/// Active channel count for this dot's mode: 1 (shade), 2 (primary), or 3 (secondary).
	pub channel_num: u8,
}

/// Base colors selected by a primary-mode dot's two index bits, `(b0, b_half)`.
const PRIMARY_BASES: [(bool, bool, ColorChannels); 4] = [
	(false, false, ColorChannels { r: 1.0, g: 1.0, b: 1.0 }),
	(true, false, ColorChannels { r: 0.0, g: 1.0, b: 1.0 }),
	(false, true, ColorChannels { r: 1.0, g: 0.0, b: 1.0 }),
	(true, true, ColorChannels { r: 1.0, g: 1.0, b: 0.0 }),
];

/// Interprets `bits` (LSB-first, bit `i` at position `i`) as an unsigned
/// integer and maps it onto `[0, 1]` by dividing by the maximum representable
/// value. An empty bit list has no fractional meaning and maps to `1.0` (a
/// zero-length shade field carries no attenuation).
fn bits_to_fraction(bits: &[bool]) -> f64 {
	if bits.is_empty() {
		return 1.0;
	}
	let max = (1u64 << bits.len()) - 1;
	let n: u64 = bits.iter().enumerate().filter(|&(_, &b)| b).map(|(i, _)| 1u64 << i).sum();
	n as f64 / max as f64
}

/// Inverse of [`bits_to_fraction`]: rounds `value * (2^len - 1)` to the
/// nearest integer and unpacks it LSB-first into `len` bits.
fn fraction_to_bits(value: f64, len: usize) -> Vec<bool> {
	if len == 0 {
		return Vec::new();
	}
	let max = (1u64 << len) - 1;
	let n = (value.clamp(0.0, 1.0) * max as f64).round() as u64;
	(0..len).map(|i| (n >> i) & 1 == 1).collect()
}

impl Dot {
	/// Encodes a bit list of length `color_depth` into a single dot.
	pub fn encode(bits: &[bool], color_depth: u16) -> Self {
		debug_assert_eq!(bits.len(), color_depth as usize);
		match DotMode::for_color_depth(color_depth) {
			DotMode::Shade => {
				let value = bits_to_fraction(bits);
				Self { channels: ColorChannels::shade(value), channel_num: 1 }
			}
			DotMode::Secondary => {
				let chunk_len = color_depth as usize / 3;
				let r = bits_to_fraction(&bits[0..chunk_len]);
				let g = bits_to_fraction(&bits[chunk_len..2 * chunk_len]);
				let b = bits_to_fraction(&bits[2 * chunk_len..3 * chunk_len]);
				Self { channels: ColorChannels::new(r, g, b), channel_num: 3 }
			}
			DotMode::Primary => {
				let half_len = color_depth as usize / 2;
				let (first_half, second_half) = bits.split_at(half_len);
				let b0 = first_half[0];
				let b_half = second_half[0];
				let tail: Vec<bool> =
					first_half[1..].iter().chain(second_half[1..].iter()).copied().collect();
				let shade = bits_to_fraction(&tail);
				let base = PRIMARY_BASES
					.iter()
					.find(|(x, y, _)| *x == b0 && *y == b_half)
					.map(|(_, _, c)| *c)
					.unwrap_or(ColorChannels::WHITE);
				let channels =
					ColorChannels::new(base.r * shade, base.g * shade, base.b * shade);
				Self { channels, channel_num: 2 }
			}
		}
	}

	/// Decodes this dot back into a bit list of length `color_depth`,
	/// tolerating degraded (scanned) channel values via mode-specific
	/// thresholds.
	pub fn decode(&self, color_depth: u16) -> Vec<bool> {
		match DotMode::for_color_depth(color_depth) {
			DotMode::Shade => {
				let value = self.channels.average_shade();
				fraction_to_bits(value, color_depth as usize)
			}
			DotMode::Secondary => {
				let chunk_len = color_depth as usize / 3;
				let mut bits = fraction_to_bits(self.channels.r, chunk_len);
				bits.extend(fraction_to_bits(self.channels.g, chunk_len));
				bits.extend(fraction_to_bits(self.channels.b, chunk_len));
				bits
			}
			DotMode::Primary => {
				let threshold = 0.5 / 2f64.powi(i32::from(color_depth) - 2);
				let r_on = self.channels.r >= threshold;
				let g_on = self.channels.g >= threshold;
				let b_on = self.channels.b >= threshold;
				let (b0, b_half, on_values): (bool, bool, Vec<f64>) =
					match (r_on, g_on, b_on) {
						(false, true, true) => (true, false, vec![self.channels.g, self.channels.b]),
						(true, false, true) => (false, true, vec![self.channels.r, self.channels.b]),
						(true, true, false) => (true, true, vec![self.channels.r, self.channels.g]),
						_ => (
							false,
							false,
							vec![self.channels.r, self.channels.g, self.channels.b],
						),
					};
				let shade = if on_values.is_empty() {
					0.0
				} else {
					on_values.iter().sum::<f64>() / on_values.len() as f64
				};
				let half_len = color_depth as usize / 2;
				let tail_len = color_depth as usize - 2;
				let tail = fraction_to_bits(shade, tail_len);
				let (first_tail, second_tail) = tail.split_at(half_len - 1);
				let mut bits = vec![b0];
				bits.extend_from_slice(first_tail);
				bits.push(b_half);
				bits.extend_from_slice(second_tail);
				bits
			}
		}
	}
}
