use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use openlcs::application::dto::OutputFormat;
use openlcs::compliance::policies::{FailurePolicy, ProvidesDisambiguation};

/// License and copyright compliance tracking for product releases
#[derive(Parser, Debug)]
#[command(name = "openlcs")]
#[command(version)]
#[command(
    about = "License and copyright compliance tracking for product releases",
    long_about = None
)]
pub struct Args {
    /// Path to a config file (defaults to ./openlcs.config.yml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. info or openlcs=debug (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack a source directory into a reproducible tar.gz and remove the directory
    Pack {
        /// Directory to pack
        src_dir: PathBuf,
        /// Archive to write
        dest: PathBuf,
    },

    /// Unpack a tarball and remove the archive
    Extract {
        archive: PathBuf,
        /// Destination directory (defaults to the archive's directory)
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },

    /// Print the sha256 checksum of a file
    Checksum { file: PathBuf },

    /// Print the MIME type of a file
    Mime { path: PathBuf },

    /// Submit package imports to the scan workers
    Import(ImportArgs),

    /// Render the compliance report of a product release
    Report(ReportArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ImportArgs {
    /// Package NVR to import; repeat or space-separate for several
    #[arg(long = "nvr", value_name = "NVR", required = true, num_args = 1..)]
    pub nvrs: Vec<String>,

    /// Product release the packages belong to
    #[arg(long, value_name = "NAME")]
    pub release: Option<String>,

    /// Directory holding the source RPMs
    #[arg(long, value_name = "DIR")]
    pub srpm_dir: Option<String>,

    #[arg(long)]
    pub no_license_scan: bool,

    #[arg(long)]
    pub no_copyright_scan: bool,

    /// Id of the user submitting the import
    #[arg(long, value_name = "ID")]
    pub owner: Option<u64>,

    /// Component data file or directory defining the known releases
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalogs: Vec<PathBuf>,

    /// Base url of the Flower API fronting the workers
    #[arg(long, value_name = "URL")]
    pub dispatcher_url: Option<String>,

    /// Task flow to dispatch
    #[arg(long, value_name = "NAME")]
    pub task_flow: Option<String>,

    /// What to do after a dispatch fails: continue or stop
    #[arg(long, value_name = "POLICY")]
    pub failure_policy: Option<FailurePolicy>,

    /// Maximum concurrent dispatches
    #[arg(long, value_name = "N")]
    pub max_in_flight: Option<usize>,
}

#[derive(ClapArgs, Debug)]
pub struct ReportArgs {
    /// Component data file or directory to load
    #[arg(long = "catalog", value_name = "FILE", required = true)]
    pub catalogs: Vec<PathBuf>,

    /// Release name, e.g. rhel-8.6.0
    #[arg(long, value_name = "NAME")]
    pub release: String,

    /// Output format: json or markdown
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How to pick a component's node when a release holds several: shallowest or strict
    #[arg(long, value_name = "POLICY")]
    pub provides: Option<ProvidesDisambiguation>,
}
