//! Top-level file assembly: splits a payload into data sectors, synthesizes
//! and packs the metadata dictionary, and tiles everything into pages
//! (§4.7).

use crc::{CRC_32_ISCSI, Crc};

use crate::config::EncodeConfig;
use crate::dot::DotMode;
use crate::error::CsError;
use crate::metadata::{MetadataEntry, MetadataSector, tags};
use crate::page::{self, Page};

const CRC32C: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// One ECC scheme id exists today; carried so a future incompatible RS
/// profile has somewhere to announce itself.
const ECC_MODE_ID: u8 = 1;

/// A fully-assembled ColorSafe archive: an ordered list of pages, each ready
/// to be rasterized by [`crate::image`].
#[derive(Debug, Clone)]
pub struct ColorSafeFile {
	pages: Vec<Page>,
}

fn synthesize_entries(config: &EncodeConfig, data: &[u8]) -> Vec<MetadataEntry> {
	let dot_mode = DotMode::for_color_depth(config.color_depth);
	let crc = CRC32C.checksum(data);
	let created_at = std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0);

	vec![
		(tags::ECC.to_string(), vec![ECC_MODE_ID]),
		(tags::DAT.to_string(), vec![dot_mode.id()]),
		(tags::PAG.to_string(), 0u64.to_be_bytes().to_vec()),
		(tags::MET.to_string(), vec![0]),
		(tags::AMB.to_string(), vec![0]),
		(tags::CRC.to_string(), crc.to_be_bytes().to_vec()),
		(tags::TIM.to_string(), created_at.to_be_bytes().to_vec()),
		(tags::ECR.to_string(), config.ecc_rate.to_bits().to_be_bytes().to_vec()),
		(tags::EXT.to_string(), config.file_extension.clone().into_bytes()),
		(tags::SIZ.to_string(), (data.len() as u64).to_be_bytes().to_vec()),
		(tags::NAM.to_string(), config.filename.clone().into_bytes()),
		(tags::MAJ.to_string(), vec![env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0)]),
		(tags::MIN.to_string(), vec![env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0)]),
		(tags::REV.to_string(), vec![env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0)]),
		(tags::TOT.to_string(), 0u64.to_be_bytes().to_vec()),
	]
}

fn pack_all_metadata_sectors(
	mut pool: Vec<MetadataEntry>,
	height: u32,
	width: u32,
	color_depth: u16,
	ecc_rate: f64,
) -> Result<Vec<MetadataSector>, CsError> {
	let mut sectors = Vec::new();
	loop {
		let before = pool.len();
		let sector = MetadataSector::pack(&mut pool, height, width, color_depth, ecc_rate)?;
		sectors.push(sector);
		if pool.is_empty() {
			break;
		}
		if pool.len() == before {
			return Err(CsError::CapacityExceeded { needed: before, available: 0 });
		}
	}
	Ok(sectors)
}

impl ColorSafeFile {
	/// Encodes `data` into a sequence of pages per `config`.
	pub fn encode(data: &[u8], config: &EncodeConfig) -> Result<Self, CsError> {
		let sector_capacity = config.sector_capacity_bytes();
		let mut data_chunks: Vec<Vec<u8>> = data
			.chunks(sector_capacity)
			.map(|chunk| {
				let mut padded = chunk.to_vec();
				padded.resize(sector_capacity, 0);
				padded
			})
			.collect();
		if data_chunks.is_empty() {
			data_chunks.push(vec![0u8; sector_capacity]);
		}
		log::info!("colorsafe_file: {} data sector(s) built", data_chunks.len());

		let entries = synthesize_entries(config, data);
		let metadata_sectors = pack_all_metadata_sectors(
			entries,
			config.sector_height,
			config.sector_width,
			config.color_depth,
			config.ecc_rate,
		)?;
		log::debug!("colorsafe_file: {} metadata sector(s) built", metadata_sectors.len());

		let sectors_per_page = config.sectors_per_page() as usize;
		if sectors_per_page < 2 {
			return Err(CsError::InvalidDimensions {
				reason: format!("sectorsV*sectorsH must be >= 2, got {sectors_per_page}"),
			});
		}

		let total_sectors_estimate = data_chunks.len() + metadata_sectors.len();
		let mut total_pages: u64 = if total_sectors_estimate <= 1 {
			1
		} else {
			(((total_sectors_estimate - 1) as f64) / ((sectors_per_page - 1) as f64)).ceil() as u64
		};

		let mut grouped = page::distribute_across_pages(
			total_pages,
			metadata_sectors.clone(),
			config.sector_height,
			config.sector_width,
			config.color_depth,
			config.ecc_rate,
		)?;

		// The ceiling above is provably sufficient once every page's padding
		// settles (see DESIGN.md); this loop is defensive insurance against
		// that proof being wrong for some geometry this crate didn't test.
		let mut guard = 0;
		loop {
			let total_metadata_final: usize = grouped.iter().map(|g| g.len()).sum();
			let grid_total = total_pages as usize * sectors_per_page;
			if grid_total >= data_chunks.len() + total_metadata_final || guard > 8 {
				break;
			}
			total_pages += 1;
			grouped = page::distribute_across_pages(
				total_pages,
				metadata_sectors.clone(),
				config.sector_height,
				config.sector_width,
				config.color_depth,
				config.ecc_rate,
			)?;
			guard += 1;
		}

		let total_metadata_final: usize = grouped.iter().map(|g| g.len()).sum();
		let required_data = (total_pages as usize * sectors_per_page).saturating_sub(total_metadata_final);
		if required_data < data_chunks.len() {
			return Err(CsError::CapacityExceeded { needed: data_chunks.len(), available: required_data });
		}
		data_chunks.resize(required_data, vec![0u8; sector_capacity]);

		let mut data_iter = data_chunks.into_iter();
		let mut pages = Vec::with_capacity(total_pages as usize);
		for (page_index, mut metadata_for_page) in grouped.into_iter().enumerate() {
			for metadata_sector in &mut metadata_for_page {
				metadata_sector.update_page_fields(
					page_index as u64,
					total_pages,
					metadata_for_page.len() as u8,
				)?;
			}
			let data_needed = sectors_per_page - metadata_for_page.len();
			let data_for_page: Vec<Vec<u8>> = (&mut data_iter).take(data_needed).collect();

			let page = Page::assemble(
				config.sector_height,
				config.sector_width,
				config.color_depth,
				config.ecc_rate,
				config.sectors_v,
				config.sectors_h,
				page_index as u64,
				&data_for_page,
				metadata_for_page,
			)?;
			pages.push(page);
		}
		log::info!("colorsafe_file: assembled {} page(s)", pages.len());

		Ok(Self { pages })
	}

	/// The assembled pages, in page-number order.
	pub fn pages(&self) -> &[Page] {
		&self.pages
	}

	/// Reconstructs the original payload from already-decoded pages (e.g.
	/// ones just produced by [`ColorSafeFile::encode`], or by
	/// [`crate::image`]'s scan path), concatenating data-sector bytes in
	/// page/slot order and trimming the zero padding from the final sector.
	pub fn reassemble(pages: &[Page]) -> Vec<u8> {
		let mut out = Vec::new();
		for page in pages {
			for slot in &page.slots {
				if let page::PageSlot::Data(sector) = slot {
					out.extend_from_slice(&sector.data);
				}
			}
		}
		while out.last() == Some(&0) {
			out.pop();
		}
		out
	}
}
