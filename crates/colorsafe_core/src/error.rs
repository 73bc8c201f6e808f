//! Error types for the ColorSafe codec pipeline.

use thiserror::Error;

/// Unified error type spanning every module's failure modes.
///
/// Lower-level errors (`#[from]`) compose through `?` without manual mapping,
/// the way the rest of this codebase's per-format error enums do.
#[derive(Debug, Error)]
pub enum CsError {
	/// Width not a multiple of 8, or a non-positive size, was supplied.
	#[error("invalid dimensions: {reason}")]
	InvalidDimensions {
		/// Human-readable description of which dimension failed and why.
		reason: String,
	},

	/// Payload is larger than the target sector/page grid can hold.
	#[error("capacity exceeded: {needed} bytes needed, {available} bytes available")]
	CapacityExceeded {
		/// Bytes the caller asked to store.
		needed: usize,
		/// Bytes actually available in the target region.
		available: usize,
	},

	/// Reed-Solomon decoding could not recover a block.
	///
	/// This is informational context attached to a [`crate::sector::BlockStatus`];
	/// the decode pipeline itself never aborts on this condition, it only
	/// surfaces it (see `RSUncorrectable`'s propagation rules in the module docs).
	#[error("sector {sector_index}, block {block_index}: Reed-Solomon could not correct {message_len}+{ecc_len} byte block")]
	RsUncorrectable {
		/// Index of the sector on its page.
		sector_index: usize,
		/// Index of the RS block within the sector.
		block_index: usize,
		/// Message length of the failed block.
		message_len: usize,
		/// ECC length of the failed block.
		ecc_len: usize,
	},

	/// Image segmentation could not locate a beginning or ending cap on a signal.
	#[error("segmentation failed on page {page_index}: {reason}")]
	SegmentationFailed {
		/// Index of the page being segmented.
		page_index: usize,
		/// Which signal failed and how.
		reason: String,
	},

	/// One or more required-in-order metadata keys were absent after decode.
	#[error("metadata missing required keys: {missing_keys:?}")]
	MetadataMissing {
		/// The required keys that were not found.
		missing_keys: Vec<String>,
	},
}
