use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use crunch_core::config::{MAX_PADDING, PAGE_SIZES};
use crunch_core::{export, fingerprint, pack_bitmaps, Bitmap, CrunchError, PackConfig};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Everything the run needs, parsed from argv. Raw tokens are kept because
/// each one is a fingerprint contributor.
#[derive(Debug, Clone)]
struct CliOptions {
    output: PathBuf,
    inputs: Vec<PathBuf>,
    xml: bool,
    binary: bool,
    json: bool,
    verbose: bool,
    force: bool,
    config: PackConfig,
}

const USAGE: &str = "expected: crunch <OUTPUT> <INPUT1[,INPUT2,...]> [OPTIONS]";

/// Parses the crunch argument grammar. `-p` alone is `--premultiply`;
/// `-p<N>` is `--pad<N>`, disambiguated by the trailing numeric suffix.
fn parse_args(tokens: &[String]) -> Result<CliOptions, CrunchError> {
    if tokens.len() < 2 {
        return Err(CrunchError::InvalidArguments(USAGE.into()));
    }

    let output = PathBuf::from(&tokens[0]);
    let inputs: Vec<PathBuf> = tokens[1]
        .split(',')
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();
    if inputs.is_empty() {
        return Err(CrunchError::InvalidArguments(USAGE.into()));
    }

    let mut opts = CliOptions {
        output,
        inputs,
        xml: false,
        binary: false,
        json: false,
        verbose: false,
        force: false,
        config: PackConfig::default(),
    };

    for arg in &tokens[2..] {
        match arg.as_str() {
            "-d" | "--default" => {
                opts.xml = true;
                opts.config.premultiply = true;
                opts.config.trim = true;
                opts.config.unique = true;
            }
            "-x" | "--xml" => opts.xml = true,
            "-b" | "--binary" => opts.binary = true,
            "-j" | "--json" => opts.json = true,
            "-p" | "--premultiply" => opts.config.premultiply = true,
            "-t" | "--trim" => opts.config.trim = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-f" | "--force" => opts.force = true,
            "-u" | "--unique" => opts.config.unique = true,
            "-r" | "--rotate" => opts.config.rotate = true,
            other => {
                if let Some(v) = other.strip_prefix("--size") {
                    opts.config.size = parse_size(v)?;
                } else if let Some(v) = other.strip_prefix("-s") {
                    opts.config.size = parse_size(v)?;
                } else if let Some(v) = other.strip_prefix("--pad") {
                    opts.config.padding = parse_padding(v)?;
                } else if let Some(v) = other.strip_prefix("-p") {
                    opts.config.padding = parse_padding(v)?;
                } else {
                    return Err(CrunchError::InvalidArguments(format!(
                        "unexpected argument: {other}"
                    )));
                }
            }
        }
    }
    Ok(opts)
}

fn parse_size(v: &str) -> Result<u32, CrunchError> {
    let invalid = || CrunchError::InvalidOptionValue {
        flag: "--size".into(),
        value: v.into(),
    };
    let n: u32 = v.parse().map_err(|_| invalid())?;
    if PAGE_SIZES.contains(&n) {
        Ok(n)
    } else {
        Err(invalid())
    }
}

fn parse_padding(v: &str) -> Result<u32, CrunchError> {
    let invalid = || CrunchError::InvalidOptionValue {
        flag: "--pad".into(),
        value: v.into(),
    };
    let n: u32 = v.parse().map_err(|_| invalid())?;
    if n <= MAX_PADDING {
        Ok(n)
    } else {
        Err(invalid())
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

fn is_png(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// All `.png` files under `input` (or `input` itself when it is a file),
/// sorted lexicographically by full path so fingerprints and load order are
/// reproducible across hosts.
fn collect_pngs(input: &Path) -> Vec<PathBuf> {
    let mut list = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && is_png(p) {
                list.push(p.to_path_buf());
            }
        }
        list.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    } else if input.is_file() && is_png(input) {
        list.push(input.to_path_buf());
    }
    list
}

/// Relative identifier for a bitmap under `root`: prefix stripped,
/// extensionless, forward slashes.
fn bitmap_name(root: &Path, path: &Path) -> String {
    let stemless = path.with_extension("");
    let rel = stemless.strip_prefix(root).unwrap_or(&stemless).to_path_buf();
    rel.to_string_lossy()
        .replace('\\', "/")
        .trim_start_matches('/')
        .to_string()
}

fn remove_stale(path: &Path) {
    // Missing files are fine.
    let _ = fs::remove_file(path);
}

fn main() -> anyhow::Result<()> {
    let tokens: Vec<String> = env::args().skip(1).collect();
    let opts = parse_args(&tokens)?;
    init_tracing(opts.verbose);
    run(&opts, &tokens)
}

fn run(opts: &CliOptions, tokens: &[String]) -> anyhow::Result<()> {
    let prefix = opts
        .output
        .with_extension("")
        .to_string_lossy()
        .replace('\\', "/");
    let hash_path = PathBuf::from(format!("{prefix}.hash"));

    info!(
        size = opts.config.size,
        padding = opts.config.padding,
        premultiply = opts.config.premultiply,
        trim = opts.config.trim,
        unique = opts.config.unique,
        rotate = opts.config.rotate,
        "options"
    );

    // Fingerprint: every CLI token, then every input PNG's bytes.
    let mut hash = 0u64;
    for token in tokens {
        fingerprint::combine_str(&mut hash, token);
    }
    for input in &opts.inputs {
        if !input.exists() {
            warn!(input = %input.display(), "input does not exist");
        }
        for path in collect_pngs(input) {
            fingerprint::combine_file(&mut hash, &path)?;
        }
    }

    if !opts.force {
        if let Some(old) = fingerprint::load(&hash_path) {
            if old == hash {
                println!("atlas is unchanged: {prefix}");
                return Ok(());
            }
        }
    }

    remove_stale(&hash_path);
    for ext in ["bin", "xml", "json"] {
        remove_stale(&PathBuf::from(format!("{prefix}.{ext}")));
    }
    for i in 0..16 {
        remove_stale(&PathBuf::from(format!("{prefix}{i}.png")));
    }

    info!("loading images");
    let mut bitmaps: Vec<Bitmap> = Vec::new();
    for input in &opts.inputs {
        let root: &Path = if input.is_dir() {
            input
        } else {
            input.parent().unwrap_or(Path::new(""))
        };
        for path in collect_pngs(input) {
            let name = bitmap_name(root, &path);
            info!(path = %path.display(), name = %name, "loading");
            bitmaps.push(Bitmap::load(
                &path,
                name,
                opts.config.premultiply,
                opts.config.trim,
            )?);
        }
    }

    info!(count = bitmaps.len(), "packing");
    let out = pack_bitmaps(bitmaps, &opts.config)?;

    if let Some(parent) = opts.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output directory {}", parent.display()))?;
        }
    }

    for op in &out.pages {
        let path = PathBuf::from(format!("{prefix}{}.png", op.page.id));
        info!(path = %path.display(), "writing page");
        op.rgba.save(&path).map_err(|source| CrunchError::Encode {
            path: path.clone(),
            source,
        })?;
    }

    if opts.binary {
        write_manifest(&prefix, "bin", |w, path| {
            export::write_bin(w, &out, &prefix, &opts.config).map_err(|source| {
                CrunchError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })
        })?;
    }
    if opts.xml {
        write_manifest(&prefix, "xml", |w, path| {
            export::write_xml(w, &out, &prefix, &opts.config).map_err(|source| {
                CrunchError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })
        })?;
    }
    if opts.json {
        write_manifest(&prefix, "json", |w, path| {
            export::write_json(w, &out, &prefix, &opts.config).map_err(|source| {
                CrunchError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })
        })?;
    }

    fingerprint::save(&hash_path, hash)?;
    info!(pages = out.pages.len(), "done");
    Ok(())
}

fn write_manifest<F>(prefix: &str, ext: &str, write: F) -> Result<(), CrunchError>
where
    F: FnOnce(&mut BufWriter<fs::File>, &Path) -> Result<(), CrunchError>,
{
    let path = PathBuf::from(format!("{prefix}.{ext}"));
    info!(path = %path.display(), "writing manifest");
    let file = fs::File::create(&path).map_err(|source| CrunchError::Write {
        path: path.clone(),
        source,
    })?;
    let mut w = BufWriter::new(file);
    write(&mut w, &path)?;
    w.flush().map_err(|source| CrunchError::Write { path, source })
}
