use crate::bitmap::Bitmap;
use crate::config::PackConfig;
use crate::error::{CrunchError, Result};
use crate::model::Page;
use crate::packer::PagePacker;
use image::RgbaImage;
use tracing::{debug, info, instrument};

/// One composited page and its logical record.
#[derive(Debug)]
pub struct OutputPage {
    pub page: Page,
    pub rgba: RgbaImage,
}

/// Result of a packing run. Placements reference `bitmaps` by index.
#[derive(Debug)]
pub struct PackOutput {
    pub bitmaps: Vec<Bitmap>,
    pub pages: Vec<OutputPage>,
}

#[instrument(skip_all)]
/// Packs `bitmaps` into as many pages as needed.
///
/// Bitmaps are placed in descending trimmed-area order (ties broken by name
/// so runs are deterministic). Fails when a single bitmap cannot fit on an
/// empty page even rotated.
pub fn pack_bitmaps(mut bitmaps: Vec<Bitmap>, cfg: &PackConfig) -> Result<PackOutput> {
    if bitmaps.is_empty() {
        return Err(CrunchError::Empty);
    }
    cfg.validate()?;

    bitmaps.sort_by(|a, b| {
        (b.width() * b.height())
            .cmp(&(a.width() * a.height()))
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut remaining: Vec<usize> = (0..bitmaps.len()).collect();
    let mut pages: Vec<OutputPage> = Vec::new();

    while !remaining.is_empty() {
        debug!(remaining = remaining.len(), page = pages.len(), "packing page");
        let mut packer = PagePacker::new(cfg.size, cfg.padding);
        let unfit = packer.pack(&bitmaps, &remaining, cfg.unique, cfg.rotate);

        if packer.placements().is_empty() {
            // Nothing fit on an empty page: the largest remaining bitmap can
            // never be placed.
            let b = &bitmaps[remaining[0]];
            return Err(CrunchError::PackingImpossible {
                name: b.name.clone(),
                width: b.width(),
                height: b.height(),
                page_size: cfg.size,
            });
        }

        let rgba = packer.render(&bitmaps);
        let page = packer.into_page(pages.len());
        info!(
            page = page.id,
            width = page.width,
            height = page.height,
            placed = page.placements.len(),
            "finished page"
        );
        pages.push(OutputPage { page, rgba });
        remaining = unfit;
    }

    Ok(PackOutput { bitmaps, pages })
}
