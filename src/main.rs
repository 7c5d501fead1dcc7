//! objscene - Wavefront OBJ to renderer-ready buffer converter
//!
//! Imports the position/normal subset of OBJ and reports the vertex and
//! element buffers each file produces. Stands in for a scene loader: the
//! same buffers it prints (and can dump to YAML) are what a platform
//! adapter would hand to its rendering API.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use itertools::Itertools;
use rayon::prelude::*;

use objscene::{import_obj_file, GeometryBuffers, ImportOptions, PrimitiveType};

#[derive(Parser)]
#[command(
    name = "objscene",
    version,
    about = "Convert Wavefront OBJ geometry into renderer-ready index and attribute buffers"
)]
struct Cli {
    /// OBJ files to import
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Keep faces at source arity and pack an arity-prefixed polygon stream
    /// instead of triangulating quads
    #[arg(long)]
    polygons: bool,

    /// Share vertex slots between corners naming the same position//normal
    /// pair
    #[arg(long)]
    weld: bool,

    /// Write one <stem>.yaml description of the produced buffers per input
    #[arg(long, value_name = "DIR")]
    dump: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> ImportOptions {
        ImportOptions {
            primitive: if self.polygons {
                PrimitiveType::Polygon
            } else {
                PrimitiveType::Triangles
            },
            weld: self.weld,
        }
    }
}

struct ImportReport {
    path: PathBuf,
    vertex_count: usize,
    primitive: PrimitiveType,
    primitive_count: u32,
    index_bytes: usize,
}

impl ImportReport {
    fn new(path: &Path, buffers: &GeometryBuffers) -> Self {
        Self {
            path: path.to_path_buf(),
            vertex_count: buffers.vertex_count(),
            primitive: buffers.element.primitive,
            primitive_count: buffers.element.count,
            index_bytes: buffers.element.byte_len(),
        }
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let primitive = match self.primitive {
            PrimitiveType::Triangles => "triangles",
            PrimitiveType::Polygon => "polygons",
        };
        write!(
            f,
            "{}: {} vertex slots, {} {}, {} index bytes",
            self.path.display(),
            self.vertex_count,
            self.primitive_count,
            primitive,
            self.index_bytes
        )
    }
}

fn import_one(path: &Path, options: ImportOptions, dump: Option<&Path>) -> Result<ImportReport> {
    let buffers = import_obj_file(path, options)?;
    if let Some(dir) = dump {
        dump_yaml(dir, path, &buffers)?;
    }
    Ok(ImportReport::new(path, &buffers))
}

/// Two inputs sharing a file stem would dump to the same `<stem>.yaml`,
/// with the last parallel writer winning. Refuse the overlap up front.
fn ensure_distinct_dump_stems(files: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<OsString, &PathBuf> = HashMap::new();
    for file in files {
        let stem = file.file_stem().unwrap_or_default().to_os_string();
        if let Some(previous) = seen.insert(stem, file) {
            bail!(
                "{} and {} share a file stem and would write the same dump file",
                previous.display(),
                file.display()
            );
        }
    }
    Ok(())
}

fn dump_yaml(dir: &Path, input: &Path, buffers: &GeometryBuffers) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create dump directory {}", dir.display()))?;
    let stem = input.file_stem().unwrap_or_default();
    let out = dir.join(stem).with_extension("yaml");
    let yaml = serde_yaml::to_string(buffers)
        .with_context(|| format!("failed to serialize buffers for {}", input.display()))?;
    fs::write(&out, yaml).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let options = cli.options();
    if cli.dump.is_some() {
        ensure_distinct_dump_stems(&cli.files)?;
    }

    let results: Vec<(&PathBuf, Result<ImportReport>)> = cli
        .files
        .par_iter()
        .map(|path| (path, import_one(path, options, cli.dump.as_deref())))
        .collect();

    let mut failures: Vec<&PathBuf> = Vec::new();
    for (path, result) in results {
        match result {
            Ok(report) => println!("{report}"),
            Err(err) => {
                eprintln!("{}: {err:#}", path.display());
                failures.push(path);
            }
        }
    }

    if !failures.is_empty() {
        bail!(
            "{} of {} imports failed: {}",
            failures.len(),
            cli.files.len(),
            failures.iter().map(|path| path.display()).join(", ")
        );
    }
    Ok(())
}
