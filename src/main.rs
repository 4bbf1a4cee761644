//! walk - walk directory trees and print pathnames matching search terms.
//!
//! Usage:
//!   walk [OPTIONS] [PATHS]...      Walk down from each path (default: .)
//!   walk -u [OPTIONS] [PATHS]...   Walk up from each path (default: cwd)
//!   walk --help                    Show help

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::TypedValueParser;
use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Context, Result};

use pathwalk_core::{Direction, WalkConfig, WalkError};
use pathwalk_scan::Walker;

/// Exit status for command-line usage errors, as in sysexits.h.
const EX_USAGE: u8 = 64;

#[derive(Parser)]
#[command(
    name = "walk",
    version,
    about = "walk directory trees and print pathnames matching search terms",
    after_help = "Patterns are case-insensitive regular expressions matched against the whole pathname.\n\n\
                  Date-times are in the format %Y-%m-%d %H:%M:%S, %Y-%m-%d, or %H:%M:%S (today), local time.\n\n\
                  File types is a string containing 1 or more of 'd'irectory, 'f'ile, or 's'ymbolic link characters.\n\n\
                  Sizes can be given in any base (0x hex, leading 0 octal), optionally with a K, M, G, or T suffix."
)]
struct Cli {
    /// Pathnames to walk from
    #[arg(value_parser = clap::builder::OsStringValueParser::new().map(PathBuf::from))]
    paths: Vec<PathBuf>,

    /// Delimit output records with NUL instead of newline
    #[arg(short = '0', long = "nul-terminate")]
    nul: bool,

    /// Walk hidden files too
    #[arg(short = 'A', long = "walk-hidden")]
    all: bool,

    /// Match files modified after DATETIME
    #[arg(short = 'a', long, value_name = "DATETIME", allow_hyphen_values = true)]
    after: Option<String>,

    /// Match files modified before DATETIME
    #[arg(short = 'b', long, value_name = "DATETIME", allow_hyphen_values = true)]
    before: Option<String>,

    /// Descend at most DEPTH directory levels below the argument(s)
    #[arg(short = 'd', long = "max-depth", value_name = "DEPTH", allow_hyphen_values = true)]
    max_depth: Option<String>,

    /// Match files whose pathnames match PATTERN
    #[arg(short = 'm', long, value_name = "PATTERN", allow_hyphen_values = true)]
    pattern: Option<String>,

    /// Match files larger than SIZE bytes
    #[arg(short = 'S', long = "larger-than", value_name = "SIZE", allow_hyphen_values = true)]
    larger_than: Option<String>,

    /// Match files smaller than SIZE bytes
    #[arg(short = 's', long = "smaller-than", value_name = "SIZE", allow_hyphen_values = true)]
    smaller_than: Option<String>,

    /// Match files of the given file TYPES
    #[arg(short = 't', long, value_name = "TYPES", allow_hyphen_values = true)]
    types: Option<String>,

    /// Search up the directory hierarchy rather than down
    #[arg(short = 'u', long)]
    upward: bool,

    /// Do not cross a device boundary when walking
    #[arg(short = 'x', long = "no-cross-device")]
    one_device: bool,

    /// Log more detail to stderr (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Collect the options into a walk configuration.
    fn into_config(self) -> Result<WalkConfig, WalkError> {
        let mut builder = WalkConfig::builder();
        builder
            .roots(self.paths)
            .direction(if self.upward { Direction::Up } else { Direction::Down })
            .walk_hidden(self.all)
            .no_cross_device(self.one_device)
            .nul_terminate(self.nul);

        if let Some(after) = self.after {
            builder.after(after);
        }
        if let Some(before) = self.before {
            builder.before(before);
        }
        if let Some(depth) = self.max_depth {
            builder.max_depth(depth);
        }
        if let Some(pattern) = self.pattern {
            builder.pattern(pattern);
        }
        if let Some(size) = self.larger_than {
            builder.larger_than(size);
        }
        if let Some(size) = self.smaller_than {
            builder.smaller_than(size);
        }
        if let Some(types) = self.types {
            builder.types(types);
        }

        Ok(builder.build()?)
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too, on stdout with status 0.
            let code = if err.use_stderr() { EX_USAGE } else { 0 };
            err.print()?;
            return Ok(ExitCode::from(code));
        }
    };

    init_tracing(cli.verbose);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => return Ok(usage_error(&err)),
    };

    let stdout = io::stdout();
    let mut walker = match Walker::from_config(&config, BufWriter::new(stdout.lock())) {
        Ok(walker) => walker,
        Err(err) if err.is_usage() => return Ok(usage_error(&err)),
        Err(err) => return Err(err).context("Invalid configuration"),
    };

    let roots = config
        .effective_roots()
        .context("Cannot determine the starting directory")?;

    match walker.run(&roots) {
        Ok(summary) if summary.all_roots_failed() => Ok(ExitCode::FAILURE),
        Ok(_) => Ok(ExitCode::SUCCESS),
        // The reader went away (e.g. `walk | head`); nothing left to do.
        Err(WalkError::Output(err)) if err.kind() == io::ErrorKind::BrokenPipe => {
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Err(err).context("Walk failed"),
    }
}

/// Report a bad option value along with the usage line.
fn usage_error(err: &WalkError) -> ExitCode {
    eprintln!("walk: {err}");
    eprintln!("{}", Cli::command().render_usage());
    ExitCode::from(EX_USAGE)
}

/// Initialize tracing subscriber.
///
/// Warnings about unreadable directories and failed lookups go to stderr by
/// default; `RUST_LOG` overrides the level.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}
