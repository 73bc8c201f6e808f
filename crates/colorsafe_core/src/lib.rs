//! Core data types and algorithms for the ColorSafe format: a binary-to-image
//! archival codec that maps bytes onto grids of colored dots, tiled into
//! sectors and pages, with per-sector Reed-Solomon error correction.
//!
//! # Examples
//!
//! ```
//! use colorsafe_core::prelude::*;
//!
//! let config = EncodeConfig::default();
//! let file = ColorSafeFile::encode(b"hello, archive", &config).unwrap();
//! assert!(!file.pages().is_empty());
//! ```

pub mod colorsafe_file;
pub mod config;
pub mod constants;
pub mod dot;
pub mod dot_byte;
pub mod dot_row;
pub mod error;
pub mod image;
pub mod metadata;
pub mod page;
pub mod prelude;
pub mod rs;
pub mod sector;

pub use colorsafe_file::ColorSafeFile;
pub use config::EncodeConfig;
pub use error::CsError;
pub use page::Page;
pub use sector::Sector;
