//! thmenv CLI - Pandoc JSON filter for custom theorem environments
//!
//! Pandoc runs JSON filters with the target format as the first argument,
//! the document on stdin and the result on stdout:
//!
//! ```text
//! pandoc paper.md --filter thmenv -o paper.pdf
//! ```

#[cfg(feature = "cli")]
use clap::{ArgAction, Parser};
#[cfg(feature = "cli")]
use log::{LevelFilter, Log, Metadata, Record};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use thmenv::{
    environments_from_yaml, filter_json_with_report, FilterOptions, FilterResult, OutputFormat,
    DEFAULT_METADATA_KEY,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "thmenv")]
#[command(version)]
#[command(about = "Pandoc filter for custom theorem-like environments", long_about = None)]
struct Cli {
    /// Target format (Pandoc passes the writer name here)
    #[arg(default_value = "html")]
    format: String,

    /// Input JSON file (reads from stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Metadata entry holding the environment declarations
    #[arg(long, default_value = DEFAULT_METADATA_KEY)]
    metadata_key: String,

    /// YAML file with environment declarations, used when the document has none
    #[arg(long)]
    environments: Option<String>,

    /// Pretty print the output JSON
    #[arg(short, long)]
    pretty: bool,

    /// Write a JSON report of rendered blocks and references to this path
    #[arg(long)]
    report: Option<String>,

    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[cfg(feature = "cli")]
struct StderrLogger;

#[cfg(feature = "cli")]
impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[thmenv {}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

#[cfg(feature = "cli")]
static LOGGER: StderrLogger = StderrLogger;

#[cfg(feature = "cli")]
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> FilterResult<()> {
    let input = match cli.input {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut options = FilterOptions::default().with_metadata_key(cli.metadata_key.as_str());
    if let Some(ref path) = cli.environments {
        let text = fs::read_to_string(path)?;
        let environments = environments_from_yaml(&text, &options.metadata_key)?;
        options = options.with_fallback_environments(environments);
    }

    let format = OutputFormat::from_writer(&cli.format);
    let (output, report) = filter_json_with_report(&input, format, &options, cli.pretty)?;

    if let Some(ref path) = cli.report {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }
    for id in &report.unresolved_references {
        log::warn!("reference to `{}` could not be numbered", id);
    }

    match cli.output {
        Some(path) => {
            let mut file = fs::File::create(&path)?;
            writeln!(file, "{}", output)?;
            log::info!("output written to {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", output)?;
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("thmenv: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install thmenv --features cli");
    eprintln!("  thmenv [FORMAT] [OPTIONS]");
}
