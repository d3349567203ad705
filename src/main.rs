use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use repodoc::cli::{commands, logging};
use repodoc::config::ConfigLoader;
use repodoc::constants::paths;

#[derive(Parser)]
#[command(name = "repodoc")]
#[command(
    version,
    about = "AI-driven per-file documentation reports for source repositories"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, default_value = paths::SETTINGS_FILE)]
    config: PathBuf,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Document every file of a repository
    Scan {
        #[arg(value_name = "REPO_TO_SCAN", help = "Directory to scan")]
        repo: PathBuf,
    },

    /// Render JSON reports to Markdown
    Render {
        #[arg(long, short, help = "Directory of JSON reports (default: paths.reports_dir)")]
        input: Option<PathBuf>,
        #[arg(long, short, help = "Markdown output directory (default: paths.markdown_dir)")]
        output: Option<PathBuf>,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mrepodoc encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    ConfigLoader::load_env_file(Path::new(paths::ENV_FILE))?;

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    match cli.command {
        Commands::Scan { repo } => {
            // checked before settings, the log file or output directories are touched
            if !repo.is_dir() {
                logging::init(level, None)?;
                return Err(commands::scan::invalid_root(&repo).into());
            }

            let settings = ConfigLoader::load(&cli.config)?;
            let log_path = logging::scan_log_path(&settings.paths.logs_dir);
            logging::init(level, Some(&log_path))?;

            commands::scan::run(&settings, &repo)?;
        }
        Commands::Render { input, output } => {
            let settings = ConfigLoader::load(&cli.config)?;
            logging::init(level, None)?;

            commands::render::run(&settings, input, output)?;
        }
    }

    Ok(())
}
