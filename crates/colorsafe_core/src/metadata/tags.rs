//! The fixed 3-byte ASCII metadata tag set (§6) and each tag's on-wire value
//! shape.

/// ECC mode id.
pub const ECC: &str = "ECC";
/// Data (dot) mode id.
pub const DAT: &str = "DAT";
/// Page number.
pub const PAG: &str = "PAG";
/// Metadata-sector count on this page.
pub const MET: &str = "MET";
/// Ambiguous-row flag.
pub const AMB: &str = "AMB";
/// CRC-32C of the payload.
pub const CRC: &str = "CRC";
/// Creation time (epoch seconds).
pub const TIM: &str = "TIM";
/// ECC rate.
pub const ECR: &str = "ECR";
/// File extension.
pub const EXT: &str = "EXT";
/// Payload size in bytes.
pub const SIZ: &str = "SIZ";
/// File name.
pub const NAM: &str = "NAM";
/// Major version.
pub const MAJ: &str = "MAJ";
/// Minor version.
pub const MIN: &str = "MIN";
/// Patch/revision version.
pub const REV: &str = "REV";
/// Total page count.
pub const TOT: &str = "TOT";

/// Keys packed first, in this exact order, on every metadata sector.
pub const REQUIRED_IN_ORDER: [&str; 4] = [ECC, DAT, PAG, MET];

/// Every other required key, packed after the in-order four, largest first.
pub const REQUIRED_UNORDERED: [&str; 10] =
	[AMB, CRC, TIM, ECR, EXT, SIZ, NAM, MAJ, MIN, REV];

/// Fixed wire-length of a tag's value, or `None` for a variable-length,
/// NUL-terminated ASCII value (`NAM`, `EXT`).
///
/// Fixed lengths let the parser skip straight to the next tag instead of
/// scanning for a `0x00` terminator inside a binary field — `PAG`/`TOT`/`TIM`
/// are big-endian integers that may legitimately contain `0x00` bytes, so a
/// terminator-only scan would misparse them.
pub fn fixed_value_len(tag: &str) -> Option<usize> {
	match tag {
		ECC | DAT | MET | AMB | MAJ | MIN | REV => Some(1),
		CRC => Some(4),
		PAG | TIM | ECR | SIZ | TOT => Some(8),
		_ => None,
	}
}

/// All tags this crate knows how to synthesize, in the canonical pack order
/// this module presents them in before the descending-length sort is
/// applied to the unordered subset.
pub fn all_tags() -> Vec<&'static str> {
	REQUIRED_IN_ORDER.iter().chain(REQUIRED_UNORDERED.iter()).copied().collect()
}
