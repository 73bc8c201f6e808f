//! Commonly-needed types, re-exported for a single glob import.

pub use crate::colorsafe_file::ColorSafeFile;
pub use crate::config::EncodeConfig;
pub use crate::dot::{ColorChannels, Dot, DotMode};
pub use crate::dot_byte::DotByte;
pub use crate::dot_row::DotRow;
pub use crate::error::CsError;
pub use crate::image::{PixelGrid, render_page};
pub use crate::metadata::MetadataSector;
pub use crate::page::Page;
pub use crate::sector::Sector;
