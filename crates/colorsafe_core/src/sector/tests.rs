//! Unit tests for sector encode/decode and RS integration.

use super::*;
use test_log::test;

#[test]
fn round_trip_clean_sector() {
	let height = 20;
	let width = 32;
	let color_depth = 2;
	let ecc_rate = 0.2;
	let capacity = {
		let (data_rows, _) = split_rows(height, ecc_rate);
		DotRow::byte_capacity(color_depth, width) * data_rows as usize
	};
	let payload: Vec<u8> = (0..capacity as u32).map(|i| (i * 13 + 7) as u8).collect();

	let sector = Sector::encode(&payload, height, width, color_depth, ecc_rate).unwrap();
	let rows = sector.all_rows();
	let decoded = Sector::decode(&rows, height, width, color_depth, ecc_rate).unwrap();

	assert_eq!(decoded.data, payload);
	assert!(decoded.fully_corrected());
}

#[test]
fn magic_row_is_constant() {
	let sector = Sector::encode(&[1, 2, 3], 20, 32, 1, 0.2).unwrap();
	let magic_bytes = sector.magic_row.decode(sector.color_depth);
	assert!(magic_bytes.iter().all(|&b| b == crate::constants::MAGIC_BYTE));
}

#[test]
fn rejects_non_multiple_of_eight_width() {
	let err = Sector::encode(&[0u8; 4], 20, 15, 1, 0.2).unwrap_err();
	assert!(matches!(err, CsError::InvalidDimensions { .. }));
}

#[test]
fn rejects_oversized_payload() {
	let err = Sector::encode(&[0u8; 1_000_000], 10, 16, 1, 0.2).unwrap_err();
	assert!(matches!(err, CsError::CapacityExceeded { .. }));
}

#[test]
fn detects_metadata_first_row() {
	let (data_rows, _) = split_rows(20, 0.2);
	let row_capacity = DotRow::byte_capacity(2, 32);
	let mut payload = vec![crate::constants::MAGIC_BYTE; row_capacity];
	payload.resize(row_capacity * data_rows as usize, 0);
	let sector = Sector::encode(&payload, 20, 32, 2, 0.2).unwrap();
	assert!(sector.looks_like_metadata());
}

#[test]
fn ordinary_data_does_not_look_like_metadata() {
	let payload = vec![0x42u8; 64];
	let sector = Sector::encode(&payload, 20, 32, 2, 0.2).unwrap();
	assert!(!sector.looks_like_metadata());
}

#[test]
fn recovers_from_corrupted_data_bytes() {
	let height = 20;
	let width = 32;
	let color_depth = 2;
	let ecc_rate = 0.2;
	let capacity = {
		let (data_rows, _) = split_rows(height, ecc_rate);
		DotRow::byte_capacity(color_depth, width) * data_rows as usize
	};
	let payload: Vec<u8> = (0..capacity as u32).map(|i| i as u8).collect();
	let sector = Sector::encode(&payload, height, width, color_depth, ecc_rate).unwrap();
	let mut rows = sector.all_rows();

	// Flip a couple of bits deep in a data row to simulate scan noise.
	if let Some(first_row) = rows.first_mut() {
		let mut bytes = first_row.decode(color_depth);
		bytes[0] ^= 0xFF;
		*first_row = DotRow::encode(&bytes, color_depth, width, first_row.row_number).unwrap();
	}

	let decoded = Sector::decode(&rows, height, width, color_depth, ecc_rate).unwrap();
	assert_eq!(decoded.data, payload);
}

#[test]
fn rs_errors_reports_uncorrectable_blocks() {
	let height = 20;
	let width = 32;
	let color_depth = 2;
	let ecc_rate = 0.2;
	let capacity = {
		let (data_rows, _) = split_rows(height, ecc_rate);
		DotRow::byte_capacity(color_depth, width) * data_rows as usize
	};
	let payload: Vec<u8> = (0..capacity as u32).map(|i| i as u8).collect();
	let sector = Sector::encode(&payload, height, width, color_depth, ecc_rate).unwrap();
	let mut rows = sector.all_rows();

	// Corrupt enough data rows to blow past this sector's single RS block's
	// correction capacity, forcing `BlockStatus::Uncorrectable`.
	for row in rows.iter_mut().take(3) {
		let mut bytes = row.decode(color_depth);
		for byte in &mut bytes {
			*byte ^= 0xFF;
		}
		*row = DotRow::encode(&bytes, color_depth, width, row.row_number).unwrap();
	}

	let decoded = Sector::decode(&rows, height, width, color_depth, ecc_rate).unwrap();
	assert!(!decoded.fully_corrected());

	let errors = decoded.rs_errors(7);
	assert!(!errors.is_empty());
	assert!(errors.iter().all(|e| matches!(e, CsError::RsUncorrectable { sector_index, .. } if *sector_index == 7)));
}
