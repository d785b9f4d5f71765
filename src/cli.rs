use crate::collector::{collect, log_summary, RunSummary};
use crate::config::{ResolvedConfig, ResolvedConfigFile};
use crate::errors::{AppError, AppResult};
use crate::generator::{generate_archives, GeneratorConfig};
use crate::models::EntryPolicy;
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the command tree.
///
/// - `collect`: extract a directory of archives into two CSV files
/// - `toml`: same, driven by a TOML run file
/// - `generate`: fill a directory with random archives for testing and benchmarking
pub fn build_command() -> Command {
    Command::new("docs-collector")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("collect")
                .about("Extract documents and objects from every archive in a directory")
                .after_help("Example:\n  docs-collector collect documents -d docs.csv -o objs.csv --workers 8")
                .arg(
                    Arg::new("source")
                        .help("Directory holding the archives")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("documents")
                        .short('d')
                        .long("documents")
                        .help("Output CSV for id,level rows")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("objects")
                        .short('o')
                        .long("objects")
                        .help("Output CSV for id,name rows")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("workers")
                        .short('w')
                        .long("workers")
                        .help("Worker threads (0 = one per CPU, 1 = sequential)")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("sequential")
                        .long("sequential")
                        .help("Process archives one at a time in listing order")
                        .conflicts_with("workers")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no_headers")
                        .long("no-headers")
                        .help("Do not write the header rows")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("entry_policy")
                        .long("entry-policy")
                        .help("On a bad entry: 'fail-fast' drops the archive, 'skip-entry' drops only the entry")
                        .ignore_case(true)
                        .value_parser(PossibleValuesParser::new(EntryPolicy::aliases()))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("extension")
                        .long("extension")
                        .help("Archive file extension")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("entry_suffix")
                        .long("entry-suffix")
                        .help("Suffix of archive entries holding documents")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("no_progress")
                        .long("no-progress")
                        .help("Hide the progress bar")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("toml")
                .about("Run a collection described by a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Fill a directory with archives of random documents")
                .arg(
                    Arg::new("dir")
                        .help("Target directory (existing contents are removed)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("archives")
                        .short('a')
                        .long("archives")
                        .help("Number of archives")
                        .default_value("50")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("documents")
                        .short('n')
                        .long("documents")
                        .help("Documents per archive")
                        .default_value("100")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
}

/// Parses the process arguments and executes the selected subcommand.
pub fn cli() -> AppResult<()> {
    run_with_args(std::env::args_os())
}

/// Parses `args` and executes the selected subcommand.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the run hits a fatal error.
/// Archives that fail individually are reported in the logs, not as an error.
pub fn run_with_args<I, T>(args: I) -> AppResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd_for_help = build_command();
    let matches = build_command()
        .try_get_matches_from(args)
        .map_err(|e| match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                e.exit()
            }
            _ => AppError::InvalidInput(e.to_string()),
        })?;

    match matches.subcommand() {
        Some(("collect", sub)) => {
            let source = required_path(sub, "source")?;
            let documents = required_path(sub, "documents")?;
            let objects = required_path(sub, "objects")?;
            let resolved_config = config_from_matches(sub)?;
            run_collection(&source, &documents, &objects, &resolved_config)?;
        }
        Some(("toml", sub)) => {
            let config_path = required_path(sub, "config")?;
            let file_config = ResolvedConfigFile::from_toml_file(&config_path)?;
            run_collection(
                &file_config.source_dir,
                &file_config.documents_path,
                &file_config.objects_path,
                &file_config.resolved,
            )?;
        }
        Some(("generate", sub)) => {
            let dir = required_path(sub, "dir")?;
            let archives = sub.get_one::<usize>("archives").copied().unwrap_or(50);
            let documents = sub.get_one::<usize>("documents").copied().unwrap_or(100);
            let paths = generate_archives(&dir, archives, documents, &GeneratorConfig::default())?;
            info!(dir = %dir.display(), archives = paths.len(), "Generation completed");
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

fn required_path(matches: &ArgMatches, id: &str) -> AppResult<PathBuf> {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .ok_or_else(|| AppError::InvalidInput(format!("Missing argument: {id}")))
}

/// Applies `collect` flags on top of the default configuration.
fn config_from_matches(sub: &ArgMatches) -> AppResult<ResolvedConfig> {
    let mut resolved_config = ResolvedConfig::default();
    if let Some(&workers) = sub.get_one::<usize>("workers") {
        resolved_config.workers = workers;
    }
    if sub.get_flag("sequential") {
        resolved_config.workers = 1;
    }
    if sub.get_flag("no_headers") {
        resolved_config.write_headers = false;
    }
    if let Some(policy) = sub.get_one::<String>("entry_policy") {
        resolved_config.entry_policy = policy.parse()?;
    }
    if let Some(extension) = sub.get_one::<String>("extension") {
        resolved_config.archive_extension = extension.clone();
    }
    if let Some(suffix) = sub.get_one::<String>("entry_suffix") {
        resolved_config.entry_suffix = suffix.clone();
    }
    if sub.get_flag("no_progress") {
        resolved_config.progress = false;
    }
    Ok(resolved_config)
}

fn run_collection(
    source: &Path,
    documents_path: &Path,
    objects_path: &Path,
    resolved_config: &ResolvedConfig,
) -> AppResult<RunSummary> {
    let documents_file = create_output(documents_path)?;
    let objects_file = create_output(objects_path)?;

    let summary = collect(source, documents_file, objects_file, resolved_config)?;
    log_summary(&summary);
    Ok(summary)
}

fn create_output(path: &Path) -> AppResult<File> {
    File::create(path).map_err(|e| {
        AppError::IoError(format!("Failed to create output {}: {e}", path.display()))
    })
}
