//! Core library for the crunch texture atlas packer.
//!
//! - Pipeline: decode/trim/dedup bitmaps, MaxRects bin-packing onto
//!   fixed-size pages, composited RGBA pages plus XML/JSON/binary manifests.
//! - Incremental builds: a content+options fingerprint gates repacks.
//!
//! Quick example:
//! ```ignore
//! use crunch_core::{pack_bitmaps, Bitmap, PackConfig};
//! # fn main() -> crunch_core::Result<()> {
//! let bitmaps = vec![
//!     Bitmap::load("a.png".as_ref(), "a", false, true)?,
//!     Bitmap::load("b.png".as_ref(), "b", false, true)?,
//! ];
//! let cfg = PackConfig { size: 1024, ..Default::default() };
//! let out = pack_bitmaps(bitmaps, &cfg)?;
//! println!("pages: {}", out.pages.len());
//! # Ok(()) }
//! ```

pub mod bitmap;
pub mod config;
pub mod error;
pub mod export;
pub mod fingerprint;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use bitmap::Bitmap;
pub use config::{PackConfig, MAX_PADDING, PAGE_SIZES};
pub use error::{CrunchError, Result};
pub use model::{Page, Placement, Rect};
pub use pipeline::{pack_bitmaps, OutputPage, PackOutput};

/// Convenience prelude for common types and functions.
pub mod prelude {
    pub use crate::bitmap::Bitmap;
    pub use crate::config::PackConfig;
    pub use crate::error::{CrunchError, Result};
    pub use crate::model::{Page, Placement, Rect};
    pub use crate::packer::{maxrects::MaxRectsBin, PagePacker};
    pub use crate::pipeline::{pack_bitmaps, OutputPage, PackOutput};
}
