use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrunchError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("invalid value for {flag}: {value}")]
    InvalidOptionValue { flag: String, value: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("could not fit bitmap '{name}' ({width}x{height}) into a {page_size}x{page_size} page")]
    PackingImpossible {
        name: String,
        width: u32,
        height: u32,
        page_size: u32,
    },

    #[error("nothing to pack: no .png files found in the inputs")]
    Empty,
}

pub type Result<T> = std::result::Result<T, CrunchError>;
