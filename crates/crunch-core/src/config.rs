use crate::error::{CrunchError, Result};
use serde::{Deserialize, Serialize};

/// Page sizes accepted by `--size`.
pub const PAGE_SIZES: &[u32] = &[64, 128, 256, 512, 1024, 2048, 4096];

/// Largest padding accepted by `--pad`.
pub const MAX_PADDING: u32 = 16;

/// Packing options, threaded explicitly through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackConfig {
    /// Page width and height in pixels (pages are square).
    pub size: u32,
    /// Pixels of separation between placements and at the right/bottom
    /// page edges.
    pub padding: u32,
    /// Premultiply color channels by alpha at load time.
    pub premultiply: bool,
    /// Trim bitmaps to their opaque bounding box.
    pub trim: bool,
    /// Coalesce bitmaps with byte-identical pixel content.
    pub unique: bool,
    /// Allow 90 degree clockwise rotation of placements.
    pub rotate: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            size: 4096,
            padding: 1,
            premultiply: false,
            trim: false,
            unique: false,
            rotate: false,
        }
    }
}

impl PackConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if !PAGE_SIZES.contains(&self.size) {
            return Err(CrunchError::InvalidOptionValue {
                flag: "--size".into(),
                value: self.size.to_string(),
            });
        }
        if self.padding > MAX_PADDING {
            return Err(CrunchError::InvalidOptionValue {
                flag: "--pad".into(),
                value: self.padding.to_string(),
            });
        }
        Ok(())
    }
}
