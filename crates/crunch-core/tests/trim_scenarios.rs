use crunch_core::prelude::*;
use image::{Rgba, RgbaImage};

#[test]
fn opaque_image_packs_at_origin_with_full_frame() {
    // 10x10 fully opaque, page 64, pad 1.
    let cfg = PackConfig {
        size: 64,
        padding: 1,
        trim: true,
        ..Default::default()
    };
    let img = RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]));
    let out = pack_bitmaps(vec![Bitmap::from_image("a", img, false, cfg.trim)], &cfg).expect("pack");

    assert_eq!(out.pages.len(), 1);
    let p = &out.pages[0].page.placements[0];
    assert_eq!((p.x, p.y), (0, 0));
    let b = &out.bitmaps[p.bitmap];
    assert_eq!((b.width(), b.height()), (10, 10));
    assert_eq!((b.frame_x, b.frame_y, b.frame_w, b.frame_h), (0, 0, 10, 10));
}

#[test]
fn trimmed_image_records_its_frame_offset() {
    // 20x20 where only [5..14]x[6..15] is opaque.
    let mut img = RgbaImage::new(20, 20);
    for y in 6..16 {
        for x in 5..15 {
            img.put_pixel(x, y, Rgba([1, 2, 3, 255]));
        }
    }
    let cfg = PackConfig {
        size: 64,
        padding: 1,
        trim: true,
        ..Default::default()
    };
    let out = pack_bitmaps(vec![Bitmap::from_image("b", img, false, cfg.trim)], &cfg).expect("pack");

    let b = &out.bitmaps[out.pages[0].page.placements[0].bitmap];
    assert_eq!((b.width(), b.height()), (10, 10));
    assert_eq!((b.frame_x, b.frame_y, b.frame_w, b.frame_h), (5, 6, 10, 10));
}

#[test]
fn fully_transparent_image_still_gets_a_placement() {
    let cfg = PackConfig {
        size: 64,
        padding: 1,
        trim: true,
        ..Default::default()
    };
    let out = pack_bitmaps(
        vec![Bitmap::from_image("ghost", RgbaImage::new(30, 30), false, cfg.trim)],
        &cfg,
    )
    .expect("pack");
    let b = &out.bitmaps[out.pages[0].page.placements[0].bitmap];
    assert_eq!((b.width(), b.height()), (1, 1));
    assert_eq!((b.frame_w, b.frame_h), (0, 0));
}
