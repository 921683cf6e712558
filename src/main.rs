//! bindery - compile a book into an HPub archive

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bindery::{ExportConfig, HpubExporter, JsonBookProvider};

#[derive(Parser)]
#[command(name = "bindery")]
#[command(version, about = "Compile a book into an HPub archive", long_about = None)]
#[command(after_help = "EXAMPLES:
    bindery book.json                      Write <title>-<time>.hpub to the current directory
    bindery book.json -o dist              Write the archive into dist/
    bindery book.json --config hpub.json   Load build settings from a JSON file")]
struct Cli {
    /// Book document with "metadata" and "contents" keys
    #[arg(value_name = "BOOK_JSON")]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Build settings (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stylesheet to ship instead of the bundled one
    #[arg(long, value_name = "FILE")]
    stylesheet: Option<PathBuf>,

    /// Network timeout for asset fetches, in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Public URL of the book site, used to recognise internal links
    #[arg(long, value_name = "URL")]
    site_url: Option<String>,

    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(path) => {
            if !cli.quiet {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> bindery::Result<ExportConfig> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::from_file(path)?,
        None => ExportConfig::new(),
    };
    if let Some(dir) = &cli.output {
        config = config.with_output_dir(dir);
    }
    if let Some(path) = &cli.stylesheet {
        config = config.with_stylesheet(path);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout_secs(secs);
    }
    if let Some(url) = &cli.site_url {
        config = config.with_site_url(url);
    }
    Ok(config)
}

fn run(cli: &Cli) -> bindery::Result<PathBuf> {
    let config = load_config(cli)?;
    let provider = JsonBookProvider::from_path(&cli.input)?;
    HpubExporter::new().with_config(config).convert(&provider)
}
