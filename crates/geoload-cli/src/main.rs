//! Command-line interface for `GeoLoad`, a tool that imports geographic
//! data files into SpatiaLite-enabled SQLite databases.
//!
//! This binary provides a user-friendly CLI over the [`geoload_core`]
//! library. It is built using [`clap`] for argument parsing and
//! [`tracing`] for structured logging: a thin façade that parses
//! arguments, configures logging, and delegates to command handlers.
//!
//! # Available Commands
//!
//! - `geojson` - Import GeoJSON files into a SpatiaLite database
//! - `shapefile` - Import ESRI Shapefiles into a SpatiaLite database
//! - `info` - Display dataset information and the schema an import would use
//! - `drivers` - List all available format drivers and their capabilities

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use tabled::Table;
use tracing::{Level, info};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use geoload_core::drivers::get_available_drivers;
use geoload_core::utils::files_from_paths;
use geoload_core::{ImportOptions, WriteMode, dataset_info, import_geojson, import_shapefile};

mod display;
use display::{DriverRow, display_dataset_info};

#[derive(Parser)]
#[command(
    name = "geoload",
    version,
    about = "Import GeoJSON and Shapefile data into SpatiaLite databases",
    long_about = "GeoLoad reads GeoJSON files and ESRI Shapefiles and loads their features\n\
                  into tables of a SQLite database with the SpatiaLite extension enabled,\n\
                  with control over table naming, primary keys, SRIDs and write modes."
)]
/// Command-line arguments and options for the `GeoLoad` CLI.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by both import subcommands.
#[derive(Args)]
struct ImportArgs {
    /// Paths to individual source files or to directories containing them.
    #[arg(value_name = "PATHS", required = true, num_args = 1..)]
    paths: Vec<PathBuf>,

    /// Name of the SQLite database file.
    #[arg(value_name = "DBNAME")]
    dbname: String,

    /// Table to use (instead of using the source file name).
    #[arg(short, long, value_name = "NAME")]
    table: Option<String>,

    /// Column to use as the primary key (repeat for a composite key).
    #[arg(long = "primary-key", value_name = "COLUMN")]
    primary_key: Vec<String>,

    /// Spatial Reference ID (SRID) geometries are stored in.
    #[arg(short, long, value_name = "SRID", default_value_t = 4326)]
    srid: i32,

    /// SRID of the source coordinates, overriding detection.
    #[arg(long, value_name = "SRID")]
    source_srid: Option<i32>,

    /// How to treat a pre-existing destination table.
    #[arg(long, value_name = "MODE", default_value = "create")]
    write_mode: String,

    /// Geometry column type to declare (e.g. POINT), overriding detection.
    #[arg(long, value_name = "TYPE")]
    geom_type: Option<String>,

    /// Path to the mod_spatialite extension module.
    #[arg(long, value_name = "PATH")]
    spatialite_extension: Option<PathBuf>,
}

/// Available subcommands for the `GeoLoad` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Imports GeoJSON files into a SpatiaLite database.
    Geojson(ImportArgs),

    /// Imports ESRI Shapefiles into a SpatiaLite database.
    Shapefile(ImportArgs),

    /// Displays information about a geospatial dataset.
    Info {
        /// Path to the input geospatial dataset.
        #[arg(value_name = "DATASET")]
        input: PathBuf,
    },

    /// Lists all available geospatial drivers and their capabilities.
    Drivers,
}

/// The source format an import subcommand handles.
#[derive(Clone, Copy)]
enum ImportFormat {
    GeoJson,
    Shapefile,
}

impl ImportFormat {
    fn extension(self) -> &'static str {
        match self {
            ImportFormat::GeoJson => "geojson",
            ImportFormat::Shapefile => "shp",
        }
    }

    fn import(
        self,
        db: &Path,
        source: &Path,
        options: &ImportOptions,
    ) -> geoload_core::Result<geoload_core::ImportSummary> {
        match self {
            ImportFormat::GeoJson => import_geojson(db, source, options),
            ImportFormat::Shapefile => import_shapefile(db, source, options),
        }
    }
}

/// Entry point for the `GeoLoad` command-line interface.
///
/// # Errors
///
/// Returns an error if command execution fails or if the logging system
/// cannot be initialized.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true) // Show module paths for better context
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Geojson(args) => handle_import(ImportFormat::GeoJson, &args),
        Commands::Shapefile(args) => handle_import(ImportFormat::Shapefile, &args),
        Commands::Info { input } => handle_info(&input),
        Commands::Drivers => handle_drivers(),
    }
}

/// Normalizes the database name: append `.db` when no extension was given,
/// and reject names that look like a source file (swapped arguments).
fn resolve_dbname(dbname: &str, source_extension: &str) -> Result<PathBuf> {
    if dbname.ends_with(&format!(".{source_extension}")) {
        bail!("DBNAME must not end with .{source_extension}");
    }
    if dbname.contains('.') {
        Ok(PathBuf::from(dbname))
    } else {
        Ok(PathBuf::from(format!("{dbname}.db")))
    }
}

fn handle_import(format: ImportFormat, args: &ImportArgs) -> Result<()> {
    let db = resolve_dbname(&args.dbname, format.extension())?;

    let files = files_from_paths(&args.paths, format.extension());
    if files.is_empty() {
        bail!("failed to match any files");
    }
    if files.len() > 1 && args.table.is_some() {
        bail!("--table may not be used with more than one source file");
    }

    let write_mode: WriteMode = args.write_mode.parse().map_err(|e: String| anyhow!(e))?;

    for (name, path) in files {
        let options = ImportOptions {
            table_name: Some(args.table.clone().unwrap_or(name)),
            srid: Some(args.srid),
            source_srid: args.source_srid,
            primary_key: args.primary_key.clone(),
            write_mode,
            geometry_type: args.geom_type.clone(),
            spatialite_extension: args.spatialite_extension.clone(),
        };

        info!("Importing {} into {}", path.display(), db.display());
        match format.import(&db, &path, &options) {
            Ok(summary) => {
                println!(
                    "Imported {} into {} (table '{}', {} features)",
                    path.display(),
                    db.display(),
                    summary.table,
                    summary.features
                );
            },
            Err(err) => {
                eprintln!("{}", err.user_message());
                if let Some(hint) = err.recovery_suggestion() {
                    eprintln!("hint: {hint}");
                }
                return Err(err.into());
            },
        }
    }

    Ok(())
}

fn handle_info(input: &Path) -> Result<()> {
    let info = dataset_info(input)?;
    display_dataset_info(&info);
    Ok(())
}

/// Handles the `drivers` subcommand by displaying a formatted table of
/// available drivers.
#[allow(clippy::unnecessary_wraps)] // Result for consistency with the other handlers
fn handle_drivers() -> Result<()> {
    let drivers = get_available_drivers();

    println!("\nAvailable Drivers ({} total):\n", drivers.len());

    let rows: Vec<DriverRow> = drivers
        .iter()
        .map(|d| DriverRow {
            short_name: d.short_name.to_string(),
            long_name: d.long_name.to_string(),
            info: d.capabilities.info.as_str().to_string(),
            read: d.capabilities.read.as_str().to_string(),
            write: d.capabilities.write.as_str().to_string(),
        })
        .collect();

    let table = Table::new(rows).to_string();
    println!("{table}");

    Ok(())
}
