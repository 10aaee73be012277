//! h5xdmf command-line interface.
//!
//! Generates XDMF metadata for a directory of HDF5 time series files.
#![allow(clippy::uninlined_format_args)]

use clap::{Parser, Subcommand, ValueEnum};

use h5xdmf_core::{AxisSelection, DatasetKind, GenerationRequest, LoadRequest};
use h5xdmf_io::{GenerationReport, NodeKind};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    H5xdmfIo(#[from] h5xdmf_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] h5xdmf_core::Error),
}

/// Dataset kind selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    /// Scattered particles with per-file coordinates
    Particles,
    /// Values on a static co-rectilinear grid
    Fields,
}

impl From<Kind> for DatasetKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Particles => DatasetKind::Particles,
            Kind::Fields => DatasetKind::Fields,
        }
    }
}

/// XDMF metadata generator for HDF5 simulation time series.
#[derive(Parser)]
#[command(name = "h5xdmf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dataset keys of the first .h5 file in a directory
    Keys {
        /// Series directory
        dir: PathBuf,
    },

    /// Show the group/dataset tree of one HDF5 file
    Preview {
        /// HDF5 file
        file: PathBuf,
    },

    /// Generate fresh fragments and the XDMF document
    Generate {
        /// JSON request file (replaces the flags below)
        #[arg(long, conflicts_with_all = ["kind", "dir", "name", "x", "y", "z", "attributes", "count_key"])]
        request: Option<PathBuf>,

        /// Dataset kind
        #[arg(short, long, value_enum, required_unless_present = "request")]
        kind: Option<Kind>,

        /// Series directory
        #[arg(short, long, required_unless_present = "request")]
        dir: Option<PathBuf>,

        /// Base name of the output files
        #[arg(short, long, required_unless_present = "request")]
        name: Option<String>,

        /// Dataset key of the X axis
        #[arg(short, required_unless_present = "request")]
        x: Option<String>,

        /// Dataset key of the Y axis
        #[arg(short, required_unless_present = "request")]
        y: Option<String>,

        /// Dataset key of the Z axis (omit for 2D data)
        #[arg(short)]
        z: Option<String>,

        /// Attribute dataset key (repeat for several)
        #[arg(short, long = "attr", required_unless_present = "request")]
        attributes: Vec<String>,

        /// Dataset whose shape gives the particle count
        #[arg(long)]
        count_key: Option<String>,

        /// Output directory (defaults to the series directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Do not write the header/body/footer parts
        #[arg(long)]
        no_parts: bool,
    },

    /// Re-render saved header/body/footer parts for a series
    Load {
        /// JSON request file (replaces the flags below)
        #[arg(long, conflicts_with_all = ["kind", "dir", "name", "header", "body", "footer", "count_key"])]
        request: Option<PathBuf>,

        /// Dataset kind
        #[arg(short, long, value_enum, required_unless_present = "request")]
        kind: Option<Kind>,

        /// Series directory
        #[arg(short, long, required_unless_present = "request")]
        dir: Option<PathBuf>,

        /// Base name of the output document
        #[arg(short, long, required_unless_present = "request")]
        name: Option<String>,

        /// Header part
        #[arg(long, required_unless_present = "request")]
        header: Option<PathBuf>,

        /// Body part
        #[arg(long, required_unless_present = "request")]
        body: Option<PathBuf>,

        /// Footer part
        #[arg(long, required_unless_present = "request")]
        footer: Option<PathBuf>,

        /// Dataset whose shape gives the particle count (particles only)
        #[arg(long)]
        count_key: Option<String>,

        /// Output directory (defaults to the series directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Keys { dir } => {
            for key in h5xdmf_io::dataset_keys(&dir)? {
                println!("{}", key);
            }
        }

        Commands::Preview { file } => {
            println!("{}", file.display());
            for entry in h5xdmf_io::describe_tree(&file)? {
                let indent = "  ".repeat(entry.depth + 1);
                let name = entry.path.rsplit('/').next().unwrap_or(&entry.path);
                match entry.node {
                    NodeKind::Group => println!("{}{}/", indent, name),
                    NodeKind::Dataset { shape } => println!("{}{} {:?}", indent, name, shape),
                }
            }
        }

        Commands::Generate {
            request,
            kind,
            dir,
            name,
            x,
            y,
            z,
            attributes,
            count_key,
            output_dir,
            no_parts,
        } => {
            let mut request = match request {
                Some(path) => GenerationRequest::from_file(path)?,
                None => GenerationRequest {
                    kind: kind.map_or(DatasetKind::Fields, DatasetKind::from),
                    directory: dir.unwrap_or_default(),
                    base_name: name.unwrap_or_default(),
                    axes: AxisSelection::new(x.unwrap_or_default(), y.unwrap_or_default(), z),
                    attributes,
                    count_key,
                    output_dir: None,
                    write_parts: true,
                },
            };
            if output_dir.is_some() {
                request.output_dir = output_dir;
            }
            if no_parts {
                request.write_parts = false;
            }

            let start = Instant::now();
            let report = h5xdmf_io::generate(&request)?;
            print_report(&report, start);
        }

        Commands::Load {
            request,
            kind,
            dir,
            name,
            header,
            body,
            footer,
            count_key,
            output_dir,
        } => {
            let mut request = match request {
                Some(path) => LoadRequest::from_file(path)?,
                None => LoadRequest {
                    kind: kind.map_or(DatasetKind::Fields, DatasetKind::from),
                    directory: dir.unwrap_or_default(),
                    base_name: name.unwrap_or_default(),
                    header: header.unwrap_or_default(),
                    body: body.unwrap_or_default(),
                    footer: footer.unwrap_or_default(),
                    count_key,
                    output_dir: None,
                },
            };
            if output_dir.is_some() {
                request.output_dir = output_dir;
            }

            let start = Instant::now();
            let report = h5xdmf_io::regenerate(&request)?;
            print_report(&report, start);
        }
    }

    Ok(())
}

fn print_report(report: &GenerationReport, start: Instant) {
    println!(
        "Wrote {} ({} timesteps) in {:.2}s",
        report.document.display(),
        report.timesteps,
        start.elapsed().as_secs_f64()
    );
    for part in &report.fragments {
        println!("Wrote {}", part.display());
    }
}
