//! A page: a grid of [`Sector`]s with deterministic metadata placement
//! (§4.6). Intra-page placement is seeded by the page number; cross-page
//! distribution (which metadata sectors land on which page) is seeded by a
//! fixed global seed of 0, so both are reproducible without storing a
//! placement header anywhere on the wire.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::error::CsError;
use crate::metadata::MetadataSector;
use crate::sector::Sector;

/// One occupied slot on a page: either an ordinary data sector or a
/// metadata sector.
#[derive(Debug, Clone)]
pub enum PageSlot {
	/// A sector carrying payload bytes.
	Data(Sector),
	/// A sector carrying the typed metadata dictionary.
	Metadata(MetadataSector),
}

impl PageSlot {
	/// The underlying sector, regardless of slot kind.
	pub fn sector(&self) -> &Sector {
		match self {
			PageSlot::Data(s) => s,
			PageSlot::Metadata(m) => &m.sector,
		}
	}
}

/// A `sectorsV x sectorsH` grid of sectors, row-major.
#[derive(Debug, Clone)]
pub struct Page {
	/// This page's number; also the per-page placement RNG seed.
	pub page_number: u64,
	/// Sector rows per page.
	pub sectors_v: u32,
	/// Sector columns per page.
	pub sectors_h: u32,
	/// Occupied slots, row-major, length `sectors_v * sectors_h`.
	pub slots: Vec<PageSlot>,
}

impl Page {
	/// Builds one page by placing `metadata_sectors` at a permutation of
	/// slots seeded with `page_number`, filling everything else with
	/// `data_chunks` encoded into fresh sectors in slot order.
	pub fn assemble(
		height: u32,
		width: u32,
		color_depth: u16,
		ecc_rate: f64,
		sectors_v: u32,
		sectors_h: u32,
		page_number: u64,
		data_chunks: &[Vec<u8>],
		metadata_sectors: Vec<MetadataSector>,
	) -> Result<Self, CsError> {
		let total_slots = (sectors_v * sectors_h) as usize;
		let metadata_count = metadata_sectors.len();
		if data_chunks.len() + metadata_count != total_slots {
			return Err(CsError::InvalidDimensions {
				reason: format!(
					"page {page_number}: {} data chunk(s) + {metadata_count} metadata sector(s) != {total_slots} slot(s)",
					data_chunks.len()
				),
			});
		}

		let mut rng = SmallRng::seed_from_u64(page_number);
		let mut order: Vec<usize> = (0..total_slots).collect();
		order.shuffle(&mut rng);

		log::debug!(
			"page {page_number}: placing {metadata_count} metadata sector(s) at slots {:?}",
			&order[..metadata_count]
		);

		let mut slots: Vec<Option<PageSlot>> = (0..total_slots).map(|_| None).collect();
		for (slot, metadata_sector) in order.into_iter().take(metadata_count).zip(metadata_sectors)
		{
			slots[slot] = Some(PageSlot::Metadata(metadata_sector));
		}

		let mut data_iter = data_chunks.iter();
		for slot in &mut slots {
			if slot.is_none() {
				let chunk = data_iter.next().expect("slot/data_chunks length checked above");
				let sector = Sector::encode(chunk, height, width, color_depth, ecc_rate)?;
				*slot = Some(PageSlot::Data(sector));
			}
		}

		Ok(Self {
			page_number,
			sectors_v,
			sectors_h,
			slots: slots.into_iter().map(|s| s.expect("every slot filled above")).collect(),
		})
	}

	/// The sector at row-major index `idx`.
	pub fn sector(&self, idx: usize) -> &Sector {
		self.slots[idx].sector()
	}

	/// Every metadata sector placed on this page.
	pub fn metadata_sectors(&self) -> impl Iterator<Item = &MetadataSector> {
		self.slots.iter().filter_map(|s| match s {
			PageSlot::Metadata(m) => Some(m),
			PageSlot::Data(_) => None,
		})
	}
}

/// Assigns each of `metadata_sectors` to one of `total_pages` pages,
/// spreading them with a fixed, globally-seeded (seed `0`) shuffle rather
/// than simple round-robin, so the distribution is reproducible but not
/// trivially predictable from page number alone (§4.6).
///
/// Every page is guaranteed at least one entry in the returned grouping;
/// pages left without one after distribution receive an empty metadata
/// sector (header only, no tags) built fresh for that page's geometry.
pub fn distribute_across_pages(
	total_pages: u64,
	metadata_sectors: Vec<MetadataSector>,
	height: u32,
	width: u32,
	color_depth: u16,
	ecc_rate: f64,
) -> Result<Vec<Vec<MetadataSector>>, CsError> {
	let total_pages = total_pages.max(1) as usize;
	let mut by_page: Vec<Vec<MetadataSector>> = (0..total_pages).map(|_| Vec::new()).collect();

	let mut rng = SmallRng::seed_from_u64(0);
	let mut page_order: Vec<usize> = (0..total_pages).collect();
	page_order.shuffle(&mut rng);

	for (i, metadata_sector) in metadata_sectors.into_iter().enumerate() {
		let page_index = page_order[i % total_pages];
		by_page[page_index].push(metadata_sector);
	}

	for (page_index, group) in by_page.iter_mut().enumerate() {
		if group.is_empty() {
			let mut empty_pool = Vec::new();
			let filler =
				MetadataSector::pack(&mut empty_pool, height, width, color_depth, ecc_rate)?;
			log::debug!("page {page_index}: no metadata sector assigned, padding with an empty one");
			group.push(filler);
		}
	}

	Ok(by_page)
}
