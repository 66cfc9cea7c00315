mod cli;
mod config;

use clap::Parser;
use cli::{Args, Command, ImportArgs, ReportArgs};
use config::ConfigFile;
use openlcs::adapters::outbound::console::StderrProgressReporter;
use openlcs::adapters::outbound::filesystem::{self, JsonComponentDataReader, StdoutPresenter};
use openlcs::adapters::outbound::network::FlowerTaskDispatcher;
use openlcs::adapters::outbound::persistence::MemoryStore;
use openlcs::application::dto::NvrImportRequest;
use openlcs::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use openlcs::application::use_cases::{
    BuildReleaseReportUseCase, ImportSettings, LoadComponentsUseCase, SubmitImportUseCase,
    DEFAULT_MAX_IN_FLIGHT, DEFAULT_TASK_FLOW,
};
use openlcs::compliance::domain::{ComponentTree, ProductTree};
use openlcs::ports::outbound::OutputPresenter;
use openlcs::shared::error::ExitCode;
use openlcs::shared::logging::init_logging;
use openlcs::shared::Result;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

const DEFAULT_DISPATCHER_URL: &str = "http://localhost:5555";

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;

    let log_level = args.log_level.as_deref().or(config.log_level.as_deref());
    init_logging(log_level)?;
    config::warn_unknown_fields(&config);

    match args.command {
        Command::Pack { src_dir, dest } => {
            filesystem::pack(&dest, &src_dir)?;
            let digest = filesystem::checksum(&dest)?;
            eprintln!("✅ Packed {} into {}", src_dir.display(), dest.display());
            StdoutPresenter::new().present(&format!("{}\n", digest))?;
        }
        Command::Extract { archive, dest } => {
            let dest = filesystem::extract(&archive, dest.as_deref())?;
            eprintln!("✅ Extracted {}", archive.display());
            StdoutPresenter::new().present(&format!("{}\n", dest.display()))?;
        }
        Command::Checksum { file } => {
            let digest = filesystem::checksum(&file)?;
            StdoutPresenter::new().present(&format!("{}\n", digest))?;
        }
        Command::Mime { path } => match filesystem::detect_mime_type(&path) {
            Some(mime) => StdoutPresenter::new().present(&format!("{}\n", mime))?,
            None => eprintln!("⚠️  Could not determine the MIME type of {}", path.display()),
        },
        Command::Import(import) => return run_import(import, &config).await,
        Command::Report(report) => run_report(report, &config)?,
    }

    Ok(ExitCode::Success)
}

/// Explicit `--config` wins; otherwise look for the file in the working directory
fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => config::load_config_from_path(path),
        None => Ok(config::discover_config(Path::new("."))?.unwrap_or_default()),
    }
}

/// Loads component data into a fresh store and pair of trees
fn load_catalogs(
    catalogs: &[PathBuf],
    store: &MemoryStore,
) -> Result<(ProductTree, ComponentTree)> {
    let mut product_tree = ProductTree::new();
    let mut component_tree = ComponentTree::new();
    let loader = LoadComponentsUseCase::new(
        JsonComponentDataReader::new(),
        store.clone(),
        store.clone(),
        StderrProgressReporter::new(),
    );
    for catalog in catalogs {
        loader.execute(catalog, &mut product_tree, &mut component_tree)?;
    }
    Ok((product_tree, component_tree))
}

async fn run_import(args: ImportArgs, config: &ConfigFile) -> Result<ExitCode> {
    let store = MemoryStore::new();
    load_catalogs(&args.catalogs, &store)?;

    let url = args
        .dispatcher_url
        .as_deref()
        .or(config.dispatcher_url())
        .unwrap_or(DEFAULT_DISPATCHER_URL);
    let timeout = config
        .dispatcher_timeout_secs()
        .unwrap_or(FlowerTaskDispatcher::DEFAULT_TIMEOUT_SECS);
    let dispatcher = FlowerTaskDispatcher::with_timeout(url, Duration::from_secs(timeout))?;

    let settings = ImportSettings {
        task_flow: args
            .task_flow
            .or_else(|| config.task_flow.clone())
            .unwrap_or_else(|| DEFAULT_TASK_FLOW.to_string()),
        failure_policy: args
            .failure_policy
            .or(config.failure_policy())
            .unwrap_or_default(),
        max_in_flight: args
            .max_in_flight
            .or(config.max_in_flight())
            .unwrap_or(DEFAULT_MAX_IN_FLIGHT),
    };

    let request = NvrImportRequest {
        package_nvrs: args.nvrs,
        license_scan: !args.no_license_scan,
        copyright_scan: !args.no_copyright_scan,
        srpm_dir: args.srpm_dir,
        product_release: args.release,
    };
    let batch = request.into_batch()?;

    let use_case = SubmitImportUseCase::new(
        dispatcher,
        store.clone(),
        store.clone(),
        StderrProgressReporter::new(),
        settings,
    );
    let owner_id = args.owner.or(config.owner_id);
    let submission = use_case.execute(batch, owner_id).await?;

    let mut output = serde_json::to_string_pretty(&submission)?;
    output.push('\n');
    StdoutPresenter::new().present(&output)?;

    if submission.is_complete() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::PartialFailure)
    }
}

fn run_report(args: ReportArgs, config: &ConfigFile) -> Result<()> {
    let store = MemoryStore::new();
    let (product_tree, _) = load_catalogs(&args.catalogs, &store)?;

    let disambiguation = args
        .provides
        .or(config.provides_disambiguation)
        .unwrap_or_default();
    let use_case = BuildReleaseReportUseCase::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        disambiguation,
    );
    let report = use_case.execute(&args.release, &product_tree)?;

    eprintln!("{}", FormatterFactory::progress_message(args.format));
    let formatter = FormatterFactory::create(args.format);
    let output = formatter.format(&report)?;

    let presenter = PresenterFactory::create(PresenterType::from(args.output));
    presenter.present(&output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(&path, "owner_id: 3\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.owner_id, Some(3));
    }

    #[test]
    fn test_load_config_explicit_path_missing() {
        assert!(load_config(Some(Path::new("/nonexistent/openlcs.yml"))).is_err());
    }

    #[test]
    fn test_load_catalogs_without_files() {
        let store = MemoryStore::new();
        let (product_tree, component_tree) = load_catalogs(&[], &store).unwrap();
        assert!(product_tree.is_empty());
        assert!(component_tree.is_empty());
    }
}
