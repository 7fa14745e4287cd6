use crunch_core::export;
use crunch_core::prelude::*;
use image::{Rgba, RgbaImage};

struct BinImage {
    name: String,
    x: i16,
    y: i16,
    w: i16,
    h: i16,
    frame: (i16, i16, i16, i16),
    rotated: u8,
}

struct BinPage {
    name: String,
    images: Vec<BinImage>,
}

fn read_i16(data: &[u8], pos: &mut usize) -> i16 {
    let v = i16::from_le_bytes([data[*pos], data[*pos + 1]]);
    *pos += 2;
    v
}

fn read_str(data: &[u8], pos: &mut usize) -> String {
    let start = *pos;
    while data[*pos] != 0 {
        *pos += 1;
    }
    let s = String::from_utf8(data[start..*pos].to_vec()).expect("utf8");
    *pos += 1;
    s
}

fn read_bin(data: &[u8]) -> Vec<BinPage> {
    let mut pos = 0;
    let num_pages = read_i16(data, &mut pos);
    let mut pages = Vec::new();
    for _ in 0..num_pages {
        let name = read_str(data, &mut pos);
        let num_images = read_i16(data, &mut pos);
        let mut images = Vec::new();
        for _ in 0..num_images {
            images.push(BinImage {
                name: read_str(data, &mut pos),
                x: read_i16(data, &mut pos),
                y: read_i16(data, &mut pos),
                w: read_i16(data, &mut pos),
                h: read_i16(data, &mut pos),
                frame: (
                    read_i16(data, &mut pos),
                    read_i16(data, &mut pos),
                    read_i16(data, &mut pos),
                    read_i16(data, &mut pos),
                ),
                rotated: {
                    let b = data[pos];
                    pos += 1;
                    b
                },
            });
        }
        pages.push(BinPage { name, images });
    }
    assert_eq!(pos, data.len(), "trailing bytes in binary manifest");
    pages
}

fn inputs() -> Vec<Bitmap> {
    let opaque = RgbaImage::from_pixel(10, 10, Rgba([50, 60, 70, 255]));
    let mut offset = RgbaImage::new(20, 20);
    for y in 6..16 {
        for x in 5..15 {
            offset.put_pixel(x, y, Rgba([200, 0, 0, 255]));
        }
    }
    vec![
        Bitmap::from_image("sprites/solid", opaque.clone(), false, true),
        Bitmap::from_image("sprites/offset", offset, false, true),
        Bitmap::from_image("sprites/solid_copy", opaque, false, true),
    ]
}

#[test]
fn xml_json_and_bin_manifests_agree() {
    let cfg = PackConfig {
        size: 64,
        padding: 1,
        trim: true,
        unique: true,
        rotate: true,
        ..Default::default()
    };
    let out = pack_bitmaps(inputs(), &cfg).expect("pack");
    let prefix = "out/atlas";

    let mut bin = Vec::new();
    export::write_bin(&mut bin, &out, prefix, &cfg).unwrap();
    let mut xml = Vec::new();
    export::write_xml(&mut xml, &out, prefix, &cfg).unwrap();
    let xml = String::from_utf8(xml).unwrap();
    let mut json = Vec::new();
    export::write_json(&mut json, &out, prefix, &cfg).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&json).unwrap();

    let bin_pages = read_bin(&bin);
    let json_pages = json["textures"].as_array().unwrap();
    assert_eq!(bin_pages.len(), json_pages.len());
    assert_eq!(bin_pages.len(), out.pages.len());

    for (bp, jp) in bin_pages.iter().zip(json_pages) {
        assert_eq!(bp.name, jp["name"].as_str().unwrap());
        let j_images = jp["images"].as_array().unwrap();
        assert_eq!(bp.images.len(), j_images.len());

        for (bi, ji) in bp.images.iter().zip(j_images) {
            assert_eq!(bi.name, ji["n"].as_str().unwrap());
            assert_eq!(i64::from(bi.x), ji["x"].as_i64().unwrap());
            assert_eq!(i64::from(bi.y), ji["y"].as_i64().unwrap());
            assert_eq!(i64::from(bi.w), ji["w"].as_i64().unwrap());
            assert_eq!(i64::from(bi.h), ji["h"].as_i64().unwrap());
            assert_eq!(i64::from(bi.frame.0), ji["fx"].as_i64().unwrap());
            assert_eq!(i64::from(bi.frame.1), ji["fy"].as_i64().unwrap());
            assert_eq!(i64::from(bi.frame.2), ji["fw"].as_i64().unwrap());
            assert_eq!(i64::from(bi.frame.3), ji["fh"].as_i64().unwrap());
            // JSON and XML carry "r" only when rotated; the binary always
            // writes the byte when rotation is enabled.
            assert_eq!(i64::from(bi.rotated), ji["r"].as_i64().unwrap_or(0));

            // The XML writer emits one <img .../> per placement with the
            // same attribute values.
            let mut expected = format!(
                "<img n=\"{}\" x=\"{}\" y=\"{}\" w=\"{}\" h=\"{}\" fx=\"{}\" fy=\"{}\" fw=\"{}\" fh=\"{}\"",
                bi.name, bi.x, bi.y, bi.w, bi.h, bi.frame.0, bi.frame.1, bi.frame.2, bi.frame.3
            );
            if bi.rotated != 0 {
                expected.push_str(" r=\"1\"");
            }
            expected.push_str("/>");
            assert!(xml.contains(&expected), "xml missing: {expected}");
        }
    }

    // The dedup pair shares coordinates in every manifest.
    let all: Vec<&BinImage> = bin_pages.iter().flat_map(|p| p.images.iter()).collect();
    let solid = all.iter().find(|i| i.name == "sprites/solid").unwrap();
    let copy = all.iter().find(|i| i.name == "sprites/solid_copy").unwrap();
    assert_eq!((solid.x, solid.y, solid.rotated), (copy.x, copy.y, copy.rotated));
}

#[test]
fn manifests_without_trim_and_rotate_omit_those_fields() {
    let cfg = PackConfig {
        size: 64,
        padding: 0,
        ..Default::default()
    };
    let img = RgbaImage::from_pixel(4, 4, Rgba([1, 1, 1, 255]));
    let out = pack_bitmaps(vec![Bitmap::from_image("only", img, false, false)], &cfg).unwrap();

    let mut bin = Vec::new();
    export::write_bin(&mut bin, &out, "atlas", &cfg).unwrap();
    // num_pages + page name + num_images + img name + 4 coords, no frame, no
    // rotated byte.
    let expected_len = 2 + "atlas0".len() + 1 + 2 + "only".len() + 1 + 8;
    assert_eq!(bin.len(), expected_len);

    let mut xml = Vec::new();
    export::write_xml(&mut xml, &out, "atlas", &cfg).unwrap();
    let xml = String::from_utf8(xml).unwrap();
    assert!(xml.contains("<img n=\"only\" x=\"0\" y=\"0\" w=\"4\" h=\"4\"/>"));
    assert!(!xml.contains("fx="));

    let json = export::manifest_json(&out, "atlas", &cfg);
    let img = &json["textures"][0]["images"][0];
    assert!(img.get("fx").is_none());
    assert!(img.get("r").is_none());
}
