#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `colorsafe` encodes arbitrary binary files as a grid of colored dots on
//! printable pages, and decodes them back from scanned images.
//!
//! This crate is a thin facade over [`colorsafe_core`], which holds the
//! encode/decode pipeline: dot bit-packing, sector-level Reed-Solomon coding,
//! metadata-sector placement, and image rendering/segmentation. File I/O,
//! PNG/PDF rasterization, and CLI concerns are deliberately left to callers.
//!
//! # Examples
//!
//! ```
//! use colorsafe::prelude::*;
//!
//! let config = EncodeConfig::default();
//! let file = ColorSafeFile::encode(b"hello, archive", &config).unwrap();
//! assert!(!file.pages().is_empty());
//! ```
pub use colorsafe_core::*;
