//! Manifest writers: XML, JSON, and the binary layout.
//!
//! All three formats carry the same fields for every image; page names are
//! `<prefix><index>` where `prefix` is the extensionless output path.

use crate::config::PackConfig;
use crate::model::Placement;
use crate::pipeline::PackOutput;
use serde_json::{json, Value};
use std::io::{self, Write};

/// Builds the JSON manifest value:
/// `{ "textures": [ { "name", "images": [ { "n", "x", "y", "w", "h", ... } ] } ] }`.
pub fn manifest_json(out: &PackOutput, prefix: &str, cfg: &PackConfig) -> Value {
    let textures: Vec<Value> = out
        .pages
        .iter()
        .map(|op| {
            let images: Vec<Value> = op
                .page
                .placements
                .iter()
                .map(|p| {
                    let b = &out.bitmaps[p.bitmap];
                    let mut img = serde_json::Map::new();
                    img.insert("n".into(), json!(b.name));
                    img.insert("x".into(), json!(p.x));
                    img.insert("y".into(), json!(p.y));
                    img.insert("w".into(), json!(b.width()));
                    img.insert("h".into(), json!(b.height()));
                    if cfg.trim {
                        img.insert("fx".into(), json!(b.frame_x));
                        img.insert("fy".into(), json!(b.frame_y));
                        img.insert("fw".into(), json!(b.frame_w));
                        img.insert("fh".into(), json!(b.frame_h));
                    }
                    if cfg.rotate && p.rotated {
                        img.insert("r".into(), json!(1));
                    }
                    Value::Object(img)
                })
                .collect();
            json!({
                "name": format!("{}{}", prefix, op.page.id),
                "images": images,
            })
        })
        .collect();
    json!({ "textures": textures })
}

pub fn write_json<W: Write>(w: &mut W, out: &PackOutput, prefix: &str, cfg: &PackConfig) -> io::Result<()> {
    let value = manifest_json(out, prefix, cfg);
    serde_json::to_writer_pretty(&mut *w, &value)?;
    Ok(())
}

pub fn write_xml<W: Write>(w: &mut W, out: &PackOutput, prefix: &str, cfg: &PackConfig) -> io::Result<()> {
    let mut s = String::new();
    s.push_str("<atlas>\n");
    for op in &out.pages {
        s.push_str(&format!(
            "\t<tex n=\"{}{}\">\n",
            xml_escape(prefix),
            op.page.id
        ));
        for p in &op.page.placements {
            let b = &out.bitmaps[p.bitmap];
            s.push_str(&format!(
                "\t\t<img n=\"{}\" x=\"{}\" y=\"{}\" w=\"{}\" h=\"{}\"",
                xml_escape(&b.name),
                p.x,
                p.y,
                b.width(),
                b.height()
            ));
            if cfg.trim {
                s.push_str(&format!(
                    " fx=\"{}\" fy=\"{}\" fw=\"{}\" fh=\"{}\"",
                    b.frame_x, b.frame_y, b.frame_w, b.frame_h
                ));
            }
            if cfg.rotate && p.rotated {
                s.push_str(" r=\"1\"");
            }
            s.push_str("/>\n");
        }
        s.push_str("\t</tex>\n");
    }
    s.push_str("</atlas>");
    w.write_all(s.as_bytes())
}

/// Binary layout: signed 16-bit little-endian integers, null-terminated
/// UTF-8 strings. Frame fields only with `--trim`, the rotated byte only
/// with `--rotate`.
pub fn write_bin<W: Write>(w: &mut W, out: &PackOutput, prefix: &str, cfg: &PackConfig) -> io::Result<()> {
    write_i16(w, out.pages.len() as i16)?;
    for op in &out.pages {
        write_str(w, &format!("{}{}", prefix, op.page.id))?;
        write_i16(w, op.page.placements.len() as i16)?;
        for p in &op.page.placements {
            write_image(w, out, p, cfg)?;
        }
    }
    Ok(())
}

fn write_image<W: Write>(w: &mut W, out: &PackOutput, p: &Placement, cfg: &PackConfig) -> io::Result<()> {
    let b = &out.bitmaps[p.bitmap];
    write_str(w, &b.name)?;
    write_i16(w, p.x as i16)?;
    write_i16(w, p.y as i16)?;
    write_i16(w, b.width() as i16)?;
    write_i16(w, b.height() as i16)?;
    if cfg.trim {
        write_i16(w, b.frame_x as i16)?;
        write_i16(w, b.frame_y as i16)?;
        write_i16(w, b.frame_w as i16)?;
        write_i16(w, b.frame_h as i16)?;
    }
    if cfg.rotate {
        w.write_all(&[u8::from(p.rotated)])?;
    }
    Ok(())
}

fn write_i16<W: Write>(w: &mut W, v: i16) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_str<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    w.write_all(s.as_bytes())?;
    w.write_all(&[0])
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
