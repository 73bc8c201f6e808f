//! Metadata sectors: a sector whose data area opens with a magic row (§4.4)
//! and then packs `key || 0x00 || value || 0x00` tag entries instead of raw
//! payload bytes (§4.5, §6).

pub mod tags;

use std::collections::BTreeMap;

use crate::constants::{BYTE_55, BYTE_AA, MAGIC_BYTE};
use crate::dot_row::DotRow;
use crate::error::CsError;
use crate::sector::{Sector, split_rows};

/// The metadata dictionary's fixed scheme id (§4.5 item 4). Only one scheme
/// has ever existed for this format; the field is carried so a future
/// incompatible layout has somewhere to signal itself.
pub const METADATA_SCHEME: u8 = 1;

/// One packed `(tag, value)` entry, plus enough to reconstruct its on-wire
/// framing.
pub type MetadataEntry = (String, Vec<u8>);

/// A decoded or freshly-built metadata sector: the underlying [`Sector`] plus
/// its parsed tag dictionary.
#[derive(Debug, Clone)]
pub struct MetadataSector {
	/// The sector carrying this metadata.
	pub sector: Sector,
	/// Tags present on this sector, in pack order.
	pub entries: Vec<MetadataEntry>,
	/// Color depth used to frame the header fields (§4.5 items 2-5).
	pub color_depth: u16,
}

fn replicated(byte: u8, color_depth: u16) -> Vec<u8> {
	vec![byte; color_depth as usize]
}

/// Builds the fixed, non-tag header bytes that open every metadata sector's
/// data area: the magic row, then the init/color-depth/scheme/end-padding
/// fields, each logical byte replicated `color_depth` times (§4.5 items 1-5).
fn build_header(color_depth: u16, width: u32) -> Vec<u8> {
	let row_capacity = DotRow::byte_capacity(color_depth, width);
	let mut out = vec![MAGIC_BYTE; row_capacity];
	out.extend(replicated(BYTE_AA, color_depth));
	out.extend(replicated((color_depth as u8) ^ BYTE_55, color_depth));
	out.extend(replicated(METADATA_SCHEME ^ BYTE_55, color_depth));
	out.extend(replicated(BYTE_55, color_depth));
	out.extend(replicated(BYTE_55, color_depth));
	out.extend(replicated(BYTE_AA, color_depth));
	out
}

fn header_len(color_depth: u16, width: u32) -> usize {
	DotRow::byte_capacity(color_depth, width) + 6 * color_depth as usize
}

fn serialize_entry(tag: &str, value: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(tag.len() + value.len() + 2);
	out.extend(tag.as_bytes());
	out.push(0x00);
	out.extend(value);
	out.push(0x00);
	out
}

fn serialized_len(entry: &MetadataEntry) -> usize {
	entry.0.len() + entry.1.len() + 2
}

impl MetadataSector {
	/// Packs as many entries out of `pool` as fit in a sector of the given
	/// geometry, in the order described by §4.5: `tags::REQUIRED_IN_ORDER`
	/// keys first (always included), then the remaining pool entries sorted
	/// by descending serialized length, skipping (and leaving for the next
	/// metadata sector) any entry too large for the space left once smaller
	/// ones have already been tried.
	///
	/// Entries consumed are removed from `pool`; whatever doesn't fit stays
	/// behind for the caller to pack into a subsequent metadata sector.
	pub fn pack(
		pool: &mut Vec<MetadataEntry>,
		height: u32,
		width: u32,
		color_depth: u16,
		ecc_rate: f64,
	) -> Result<Self, CsError> {
		let (data_rows_n, _) = split_rows(height, ecc_rate);
		let row_capacity = DotRow::byte_capacity(color_depth, width);
		let data_capacity = row_capacity * data_rows_n as usize;
		let header = build_header(color_depth, width);
		if header.len() > data_capacity {
			return Err(CsError::InvalidDimensions {
				reason: format!(
					"sector geometry too small to hold the metadata header: need {}, have {data_capacity}",
					header.len()
				),
			});
		}
		let mut remaining = data_capacity - header.len();

		let mut included: Vec<MetadataEntry> = Vec::new();
		for tag in tags::REQUIRED_IN_ORDER {
			if let Some(pos) = pool.iter().position(|(k, _)| k == tag) {
				let entry = pool.remove(pos);
				let len = serialized_len(&entry);
				remaining = remaining.saturating_sub(len);
				included.push(entry);
			}
		}

		let mut rest: Vec<MetadataEntry> = std::mem::take(pool);
		rest.sort_by_key(|e| std::cmp::Reverse(serialized_len(e)));

		let mut leftover = Vec::new();
		for entry in rest {
			let len = serialized_len(&entry);
			if len <= remaining {
				remaining -= len;
				included.push(entry);
			} else {
				leftover.push(entry);
			}
		}
		*pool = leftover;

		let mut payload = header;
		for (tag, value) in &included {
			payload.extend(serialize_entry(tag, value));
		}
		payload.resize(data_capacity, 0);

		let sector = Sector::encode(&payload, height, width, color_depth, ecc_rate)?;
		Ok(Self { sector, entries: included, color_depth })
	}

	/// Parses a decoded, RS-corrected [`Sector`] as a metadata sector. The
	/// caller is expected to have already checked [`Sector::looks_like_metadata`].
	pub fn parse(sector: Sector) -> Result<Self, CsError> {
		let color_depth = sector.color_depth;
		let width = sector.width;
		let header_len = header_len(color_depth, width);
		if sector.data.len() < header_len {
			return Err(CsError::MetadataMissing { missing_keys: tags::all_tags().iter().map(|s| s.to_string()).collect() });
		}
		let mut cursor = header_len;
		let mut entries = Vec::new();
		while cursor + 3 <= sector.data.len() {
			let tag_bytes = &sector.data[cursor..cursor + 3];
			if tag_bytes.iter().all(|&b| b == 0) {
				break;
			}
			let tag = String::from_utf8_lossy(tag_bytes).into_owned();
			cursor += 3;
			if cursor >= sector.data.len() || sector.data[cursor] != 0x00 {
				break;
			}
			cursor += 1;

			let value = if let Some(len) = tags::fixed_value_len(&tag) {
				if cursor + len > sector.data.len() {
					break;
				}
				let value = sector.data[cursor..cursor + len].to_vec();
				cursor += len;
				if cursor >= sector.data.len() || sector.data[cursor] != 0x00 {
					break;
				}
				cursor += 1;
				value
			} else {
				let Some(rel_end) = sector.data[cursor..].iter().position(|&b| b == 0x00) else {
					break;
				};
				let value = sector.data[cursor..cursor + rel_end].to_vec();
				cursor += rel_end + 1;
				value
			};
			entries.push((tag, value));
		}

		let found: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
		let missing: Vec<String> = tags::REQUIRED_IN_ORDER
			.iter()
			.filter(|t| !found.contains(t))
			.map(|s| s.to_string())
			.collect();
		if !missing.is_empty() {
			return Err(CsError::MetadataMissing { missing_keys: missing });
		}

		Ok(Self { sector, entries, color_depth })
	}

	/// Looks up a tag's raw value.
	pub fn get(&self, tag: &str) -> Option<&[u8]> {
		self.entries.iter().find(|(k, _)| k == tag).map(|(_, v)| v.as_slice())
	}

	/// Returns the tag dictionary as a lookup map, for callers that want
	/// random access rather than pack-order iteration.
	pub fn as_map(&self) -> BTreeMap<&str, &[u8]> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice())).collect()
	}

	/// Rewrites this sector's `PAG`, `TOT`, and `MET` values (the three
	/// fields only known once a page's full layout is decided) and
	/// re-encodes the underlying sector. All three are fixed-width, so the
	/// rewrite never changes the entry count or packing.
	pub fn update_page_fields(
		&mut self,
		page_number: u64,
		total_pages: u64,
		metadata_sector_count: u8,
	) -> Result<(), CsError> {
		for (tag, new_value) in [
			(tags::PAG, page_number.to_be_bytes().to_vec()),
			(tags::TOT, total_pages.to_be_bytes().to_vec()),
			(tags::MET, vec![metadata_sector_count]),
		] {
			if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == tag) {
				entry.1 = new_value;
			}
		}

		let height = self.sector.height;
		let width = self.sector.width;
		let ecc_rate = self.sector.ecc_rate;
		let (data_rows_n, _) = split_rows(height, ecc_rate);
		let data_capacity = DotRow::byte_capacity(self.color_depth, width) * data_rows_n as usize;

		let mut payload = build_header(self.color_depth, width);
		for (tag, value) in &self.entries {
			payload.extend(serialize_entry(tag, value));
		}
		payload.resize(data_capacity, 0);

		self.sector = Sector::encode(&payload, height, width, self.color_depth, ecc_rate)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_entries() -> Vec<MetadataEntry> {
		vec![
			(tags::ECC.to_string(), vec![1]),
			(tags::DAT.to_string(), vec![0]),
			(tags::PAG.to_string(), 0u64.to_be_bytes().to_vec()),
			(tags::MET.to_string(), vec![1]),
			(tags::NAM.to_string(), b"archive.bin".to_vec()),
			(tags::EXT.to_string(), b"bin".to_vec()),
			(tags::SIZ.to_string(), 12345u64.to_be_bytes().to_vec()),
			(tags::CRC.to_string(), 0xDEAD_BEEFu32.to_be_bytes().to_vec()),
			(tags::TIM.to_string(), 1_700_000_000u64.to_be_bytes().to_vec()),
			(tags::ECR.to_string(), 0.2f64.to_bits().to_be_bytes().to_vec()),
			(tags::AMB.to_string(), vec![0]),
			(tags::MAJ.to_string(), vec![0]),
			(tags::MIN.to_string(), vec![1]),
			(tags::REV.to_string(), vec![0]),
			(tags::TOT.to_string(), 1u64.to_be_bytes().to_vec()),
		]
	}

	#[test]
	fn packs_required_in_order_keys_first() {
		let mut pool = sample_entries();
		let built = MetadataSector::pack(&mut pool, 40, 64, 2, 0.2).unwrap();
		let packed_tags: Vec<&str> = built.entries.iter().map(|(k, _)| k.as_str()).collect();
		assert_eq!(&packed_tags[..4], &tags::REQUIRED_IN_ORDER);
	}

	#[test]
	fn round_trip_through_sector_rows() {
		let mut pool = sample_entries();
		let built = MetadataSector::pack(&mut pool, 40, 64, 2, 0.2).unwrap();
		assert!(pool.is_empty(), "small dictionary should fit in one sector");

		let rows = built.sector.all_rows();
		let decoded_sector = Sector::decode(&rows, 40, 64, 2, 0.2).unwrap();
		assert!(decoded_sector.looks_like_metadata());

		let parsed = MetadataSector::parse(decoded_sector).unwrap();
		assert_eq!(parsed.get(tags::NAM), Some(b"archive.bin".as_slice()));
		assert_eq!(parsed.get(tags::CRC), Some(0xDEAD_BEEFu32.to_be_bytes().as_slice()));
	}

	#[test]
	fn overflow_spills_into_pool_for_next_sector() {
		let mut pool = sample_entries();
		pool.push((tags::NAM.to_string(), "x".repeat(10_000).into_bytes()));
		// Replace the short NAM with a long one; keep the dictionary otherwise small.
		pool.retain(|(k, v)| k != tags::NAM || v.len() > 100);

		let built = MetadataSector::pack(&mut pool, 12, 16, 1, 0.2).unwrap();
		assert!(!pool.is_empty(), "oversized entry should not fit a tiny sector");
		assert!(built.entries.iter().all(|(k, _)| k != tags::NAM));
	}

	#[test]
	fn update_page_fields_round_trips() {
		let mut pool = sample_entries();
		let mut built = MetadataSector::pack(&mut pool, 40, 64, 2, 0.2).unwrap();
		built.update_page_fields(3, 9, 2).unwrap();

		let rows = built.sector.all_rows();
		let decoded_sector = Sector::decode(&rows, 40, 64, 2, 0.2).unwrap();
		let parsed = MetadataSector::parse(decoded_sector).unwrap();
		assert_eq!(parsed.get(tags::PAG), Some(3u64.to_be_bytes().as_slice()));
		assert_eq!(parsed.get(tags::TOT), Some(9u64.to_be_bytes().as_slice()));
		assert_eq!(parsed.get(tags::MET), Some([2u8].as_slice()));
	}
}
