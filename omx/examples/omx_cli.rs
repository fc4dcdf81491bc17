//! Inspect and repack OMX containers from the command line
//!
//! ```text
//! cargo run --example omx_cli -- init skims.omx --shape 5x5
//! cargo run --example omx_cli -- info skims.omx
//! cargo run --example omx_cli -- query skims.omx timeperiod=am mode=hwy
//! RUST_LOG=omx=debug cargo run --example omx_cli -- repack old.omx new.omx
//! ```

use clap::{Parser, Subcommand};
use omx::{
    first_duplicate, parse_predicate_term, parse_shape, MatrixCollection, OmxFile, OpenMode,
    Predicate,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "OMX CLI - inspect matrices, mappings and attributes of OMX containers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty container, optionally fixing its shape
    Init {
        /// Container file
        file: PathBuf,

        /// Shape (format: rowsxcols, e.g. 5x5)
        #[arg(long)]
        shape: Option<String>,
    },
    /// Show version, shape, matrices and mappings
    Info {
        /// Container file
        file: PathBuf,
    },
    /// List matrix names
    List {
        /// Container file
        file: PathBuf,
    },
    /// Show attributes of one matrix, or every attribute key in use
    Attrs {
        /// Container file
        file: PathBuf,

        /// Matrix name
        #[arg(long)]
        matrix: Option<String>,
    },
    /// Find matrices whose attributes match every key=value term
    Query {
        /// Container file
        file: PathBuf,

        /// Terms such as timeperiod=am or year=2010
        terms: Vec<String>,
    },
    /// List mappings, or show one mapping's entries
    Mappings {
        /// Container file
        file: PathBuf,

        /// Mapping name
        #[arg(long)]
        name: Option<String>,
    },
    /// Copy every matrix and mapping into a fresh container
    Repack {
        /// Source container
        src: PathBuf,

        /// Destination container
        dst: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let start_time = std::time::Instant::now();

    match cli.command {
        Commands::Init { file, shape } => {
            let shape = shape
                .map(|s| parse_shape(&s))
                .transpose()
                .map_err(|e| format!("bad shape: {e}"))?;
            let mut container = OmxFile::open(&file, OpenMode::WriteCreate, shape)?;
            container.close()?;
            println!("Created {}", file.display());
        }
        Commands::Info { file } => {
            let mut container = OmxFile::open(&file, OpenMode::Read, None)?;
            print!("{}", container.summary()?);
        }
        Commands::List { file } => {
            let container = OmxFile::open(&file, OpenMode::Read, None)?;
            for name in container.list_matrices()? {
                println!("{name}");
            }
        }
        Commands::Attrs { file, matrix } => {
            let container = OmxFile::open(&file, OpenMode::Read, None)?;
            match matrix {
                Some(name) => {
                    for (key, value) in container.matrix_attributes(&name)?.iter() {
                        println!("{key} = {value}");
                    }
                }
                None => {
                    for key in container.list_all_attributes()? {
                        println!("{key}");
                    }
                }
            }
        }
        Commands::Query { file, terms } => {
            let predicate = terms
                .iter()
                .map(|term| parse_predicate_term(term))
                .collect::<Result<Predicate, _>>()
                .map_err(|e| format!("bad query term: {e}"))?;
            let container = OmxFile::open(&file, OpenMode::Read, None)?;
            let names = container.query_names(&predicate)?;
            for name in &names {
                let matrix = container.get(name)?;
                println!("{name} [{}, {}]", matrix.data_type(), matrix.shape());
            }
            println!("{} of {} matrices matched", names.len(), container.len()?);
        }
        Commands::Mappings { file, name } => {
            let container = OmxFile::open(&file, OpenMode::Read, None)?;
            match name {
                Some(name) => {
                    let mapping = container.get_mapping(&name)?;
                    if let Some(dup) = first_duplicate(mapping.entries()) {
                        eprintln!("warning: value {dup} appears more than once in {name}");
                    }
                    for (offset, value) in mapping.entries().iter().enumerate() {
                        println!("{offset}\t{value}");
                    }
                }
                None => {
                    for name in container.list_mappings()? {
                        let mapping = container.get_mapping(&name)?;
                        println!("{name} ({} entries)", mapping.len());
                    }
                }
            }
        }
        Commands::Repack { src, dst } => {
            OmxFile::repack(&src, &dst)?;
            println!("Repacked {} -> {}", src.display(), dst.display());
        }
    }

    let elapsed = start_time.elapsed();
    eprintln!("Completed in {elapsed:.2?}");

    Ok(())
}
